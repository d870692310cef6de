use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemini_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("gemini_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemini_chat.client.request_duration_seconds");
pub(crate) static CLIENT_MODEL_LIST_PAGES: Counter =
    Counter::new("gemini_chat.client.model_list_pages");

pub(crate) static CHAT_TURNS: Counter = Counter::new("gemini_chat.chat.turns");
pub(crate) static CHAT_TURN_FAILURES: Counter = Counter::new("gemini_chat.chat.turn_failures");
pub(crate) static CHAT_SESSION_STARTS: Counter = Counter::new("gemini_chat.chat.session_starts");

pub(crate) static TRANSCRIPT_SAVES: Counter = Counter::new("gemini_chat.transcript.saves");
pub(crate) static TRANSCRIPT_LOAD_ERRORS: Counter =
    Counter::new("gemini_chat.transcript.load_errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);
    collector.register_counter(&CLIENT_MODEL_LIST_PAGES);

    collector.register_counter(&CHAT_TURNS);
    collector.register_counter(&CHAT_TURN_FAILURES);
    collector.register_counter(&CHAT_SESSION_STARTS);

    collector.register_counter(&TRANSCRIPT_SAVES);
    collector.register_counter(&TRANSCRIPT_LOAD_ERRORS);
}
