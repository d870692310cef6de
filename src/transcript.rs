//! The persisted conversation transcript.
//!
//! A transcript is a JSON array of `{role, content, timestamp}` objects,
//! written with two-space indentation and replaced wholesale on every save.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use serde_json::from_reader;

use crate::error::{Error, Result};
use crate::observability::{TRANSCRIPT_LOAD_ERRORS, TRANSCRIPT_SAVES};
use crate::types::{Content, Message};

/// Default transcript file, relative to the working directory.
pub const DEFAULT_TRANSCRIPT_PATH: &str = "chat_history.json";

/// Ordered conversation history.
///
/// Insertion order is conversation order.  Alternating user/assistant roles
/// are expected but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message stamped now and returns it.
    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::user(content))
    }

    /// Appends an assistant message stamped now and returns it.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::assistant(content))
    }

    /// Appends an arbitrary message.
    pub fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Drops every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The messages in conversation order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The transcript in the shape the Gemini API expects, timestamps dropped.
    pub fn to_contents(&self) -> Vec<Content> {
        self.messages.iter().map(Content::from).collect()
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl From<Transcript> for Vec<Message> {
    fn from(transcript: Transcript) -> Self {
        transcript.messages
    }
}

/// Reads and writes a transcript at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptStore {
    path: PathBuf,
}

impl TranscriptStore {
    /// Creates a store for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the transcript.
    ///
    /// A missing file is an empty transcript.  An unreadable or malformed
    /// file is an [`Error::HistoryLoad`].
    pub fn load(&self) -> Result<Transcript> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Transcript::new()),
            Err(err) => {
                return Err(Error::history_load(
                    format!("failed to open {}: {err}", self.path.display()),
                    Some(Box::new(err)),
                ));
            }
        };
        let messages: Vec<Message> = from_reader(BufReader::new(file)).map_err(|err| {
            Error::history_load(
                format!("failed to parse {}: {err}", self.path.display()),
                Some(Box::new(err)),
            )
        })?;
        Ok(Transcript::from(messages))
    }

    /// Loads the transcript, handing any error to `on_error` and returning an
    /// empty transcript in its place.
    pub fn load_or_empty(&self, on_error: impl FnOnce(&Error)) -> Transcript {
        match self.load() {
            Ok(transcript) => transcript,
            Err(err) => {
                TRANSCRIPT_LOAD_ERRORS.click();
                on_error(&err);
                Transcript::new()
            }
        }
    }

    /// The transcript a run starts from.
    ///
    /// With `fresh` the file is not read at all and an empty transcript is
    /// returned; the file stays as it is until the next save.  Otherwise this
    /// is [`TranscriptStore::load_or_empty`].
    pub fn initial(&self, fresh: bool, on_error: impl FnOnce(&Error)) -> Transcript {
        if fresh {
            return Transcript::new();
        }
        self.load_or_empty(on_error)
    }

    /// Overwrites the file with the full transcript.
    ///
    /// The document is written to a sibling temporary file and renamed into
    /// place, so the file on disk is always either the old or the new
    /// transcript.
    pub fn save(&self, transcript: &Transcript) -> Result<()> {
        let mut json = serde_json::to_vec_pretty(transcript.messages()).map_err(|err| {
            Error::serialization("failed to serialize transcript", Some(Box::new(err)))
        })?;
        json.push(b'\n');

        let tmp = self.temp_path();
        let write = || -> io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        };
        write().map_err(|err| {
            let _ = fs::remove_file(&tmp);
            Error::io(
                format!("failed to write {}: {err}", self.path.display()),
                err,
            )
        })?;
        TRANSCRIPT_SAVES.click();
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| DEFAULT_TRANSCRIPT_PATH.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSCRIPT_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageRole;
    use time::macros::datetime;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "gemini-chat-{name}-{}-{}.json",
            std::process::id(),
            time::OffsetDateTime::now_utc().unix_timestamp_nanos()
        ))
    }

    fn sample() -> Transcript {
        Transcript::from(vec![
            Message::new(
                MessageRole::User,
                "hello",
                datetime!(2024-05-01 12:00:00.123456789 UTC),
            ),
            Message::new(
                MessageRole::Assistant,
                "hi there\n\n* one\n* two",
                datetime!(2024-05-01 12:00:01 UTC),
            ),
            Message::new(MessageRole::User, "ünïcödé ✓", datetime!(2024-05-01 12:01:00 UTC)),
        ])
    }

    #[test]
    fn round_trip() {
        for len in 0..=3 {
            let path = scratch_path("round-trip");
            let store = TranscriptStore::new(&path);
            let transcript = Transcript::from(sample().messages()[..len].to_vec());
            store.save(&transcript).unwrap();
            assert_eq!(store.load().unwrap(), transcript);
            let _ = fs::remove_file(&path);
        }
    }

    #[test]
    fn save_is_idempotent() {
        let path = scratch_path("idempotent");
        let store = TranscriptStore::new(&path);
        let transcript = sample();
        store.save(&transcript).unwrap();
        let first = fs::read(&path).unwrap();
        store.save(&transcript).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn save_writes_indented_array() {
        let path = scratch_path("format");
        let store = TranscriptStore::new(&path);
        store.save(&Transcript::from(sample().messages()[..1].to_vec())).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "[\n  {\n    \"role\": \"user\",\n    \"content\": \"hello\",\n    \"timestamp\": \"2024-05-01T12:00:00.123456789Z\"\n  }\n]\n"
        );
        assert!(!store.temp_path().exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_empty() {
        let store = TranscriptStore::new(scratch_path("missing"));
        assert!(store.load().unwrap().is_empty());
        let mut called = false;
        assert!(store.load_or_empty(|_| called = true).is_empty());
        assert!(!called);
    }

    #[test]
    fn corrupt_file_is_recovered() {
        let path = scratch_path("corrupt");
        fs::write(&path, "[{\"role\": \"user\", \"content\": ").unwrap();
        let store = TranscriptStore::new(&path);

        let err = store.load().unwrap_err();
        assert!(err.is_history_load());

        let mut reported = None;
        let transcript = store.load_or_empty(|err| reported = Some(err.to_string()));
        assert!(transcript.is_empty());
        assert!(reported.unwrap().starts_with("Error loading chat history"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn loads_files_without_offsets() {
        let path = scratch_path("naive");
        fs::write(
            &path,
            r#"[
  {"role": "user", "content": "hello", "timestamp": "2024-05-01T12:00:00.000001"},
  {"role": "assistant", "content": "hi there", "timestamp": "2024-05-01T12:00:02.5"}
]"#,
        )
        .unwrap();
        let transcript = TranscriptStore::new(&path).load().unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[1].role, MessageRole::Assistant);
        assert_eq!(
            transcript.messages()[1].timestamp,
            datetime!(2024-05-01 12:00:02.5 UTC)
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn accepts_any_role_order() {
        let mut transcript = Transcript::new();
        transcript.push_assistant("unprompted");
        transcript.push_user("a");
        transcript.push_user("b");
        assert_eq!(transcript.len(), 3);
        let contents = transcript.to_contents();
        assert_eq!(contents[0], Content::model("unprompted"));
        assert_eq!(contents[2], Content::user("b"));
    }

    #[test]
    fn loads_files_without_timestamps() {
        let path = scratch_path("no-timestamps");
        fs::write(
            &path,
            r#"[{"role":"user","content":"old question"},{"role":"assistant","content":"old answer"}]"#,
        )
        .unwrap();
        let store = TranscriptStore::new(&path);
        let transcript = store.initial(false, |err| panic!("unexpected error: {err}"));
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].content, "old question");
        assert_eq!(transcript.messages()[1].role, MessageRole::Assistant);

        // Saving writes the timestamps back.
        store.save(&transcript).unwrap();
        assert_eq!(store.load().unwrap(), transcript);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn fresh_start_skips_saved_transcript() {
        let path = scratch_path("fresh");
        let store = TranscriptStore::new(&path);
        store.save(&sample()).unwrap();
        let before = fs::read(&path).unwrap();

        let transcript = store.initial(true, |err| panic!("unexpected error: {err}"));
        assert!(transcript.is_empty());
        assert_eq!(fs::read(&path).unwrap(), before);

        let transcript = store.initial(false, |err| panic!("unexpected error: {err}"));
        assert_eq!(transcript, sample());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn fresh_start_ignores_corrupt_file() {
        let path = scratch_path("fresh-corrupt");
        fs::write(&path, "not json").unwrap();
        let store = TranscriptStore::new(&path);
        let mut reported = false;
        assert!(store.initial(true, |_| reported = true).is_empty());
        assert!(!reported);
        assert!(store.initial(false, |_| reported = true).is_empty());
        assert!(reported);
        let _ = fs::remove_file(&path);
    }
}
