//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the chat loop
//! never writes to the terminal directly.  The default implementation styles
//! output with ANSI escape codes and renders assistant replies from markdown.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// ANSI escape code for bold text.
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text.
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text.
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code for underlined text (used for top-level headings).
const ANSI_UNDERLINE: &str = "\x1b[4m";

/// ANSI escape code for strikethrough text.
const ANSI_STRIKE: &str = "\x1b[9m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for green text (used for the assistant label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for yellow text (used for notices and headers).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for blue text (used for the user label).
const ANSI_BLUE: &str = "\x1b[34m";

/// ANSI escape code for cyan text (used for code).
const ANSI_CYAN: &str = "\x1b[36m";

/// Width of horizontal rules.
const RULE_WIDTH: usize = 40;

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Styled terminal output with markdown rendering
/// - Plain text without styling (for piping/redirecting)
/// - Recording renderers in tests
pub trait Renderer: Send {
    /// Print the startup banner.
    fn print_banner(&mut self, model: &str, commands: &str);

    /// Print a section header such as "Previous Conversation".
    fn print_header(&mut self, title: &str);

    /// Print a message the user wrote.
    fn print_user_message(&mut self, text: &str);

    /// Print an assistant reply.  Replies are markdown.
    fn print_assistant_message(&mut self, markdown: &str);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print a hint or warning that accompanies an error.
    fn print_warning(&mut self, warning: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a confirmation that something succeeded.
    fn print_success(&mut self, message: &str);

    /// Called before a remote call starts.
    fn start_waiting(&mut self, label: &str) {
        _ = label;
    }

    /// Called after a remote call finishes, successfully or not.
    fn stop_waiting(&mut self) {}
}

/// Plain text renderer with optional ANSI styling.
///
/// This renderer outputs text directly to stdout (errors to stderr) and
/// shows a spinner on stderr while waiting for a reply.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    spinner: Option<ProgressBar>,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            spinner: None,
        }
    }

    /// Flushes stdout to ensure immediate display.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_banner(&mut self, model: &str, commands: &str) {
        let title = self.styled(&format!("{ANSI_BOLD}{ANSI_GREEN}"), "Gemini AI Chatbot");
        let hint = self.styled(ANSI_ITALIC, commands);
        let first = format!("Gemini AI Chatbot (Using model: {model})");
        let width = first.chars().count().max(commands.chars().count());
        let border = "─".repeat(width + 2);
        println!("╭{border}╮");
        println!(
            "│ {title} (Using model: {model}){} │",
            " ".repeat(width - first.chars().count())
        );
        println!(
            "│ {hint}{} │",
            " ".repeat(width - commands.chars().count())
        );
        println!("╰{border}╯");
        self.flush();
    }

    fn print_header(&mut self, title: &str) {
        println!(
            "{}",
            self.styled(&format!("{ANSI_BOLD}{ANSI_YELLOW}"), &format!("--- {title} ---"))
        );
    }

    fn print_user_message(&mut self, text: &str) {
        println!("{}", self.styled(&format!("{ANSI_BOLD}{ANSI_BLUE}"), "You:"));
        println!("{text}");
    }

    fn print_assistant_message(&mut self, markdown: &str) {
        println!("{}", self.styled(&format!("{ANSI_BOLD}{ANSI_GREEN}"), "AI:"));
        println!("{}", render_markdown(markdown, self.use_color));
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.stop_waiting();
        eprintln!("{}", self.styled(&format!("{ANSI_BOLD}{ANSI_RED}"), error));
    }

    fn print_warning(&mut self, warning: &str) {
        eprintln!("{}", self.styled(ANSI_YELLOW, warning));
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }

    fn print_success(&mut self, message: &str) {
        println!("{}", self.styled(&format!("{ANSI_BOLD}{ANSI_GREEN}"), message));
    }

    fn start_waiting(&mut self, label: &str) {
        if !self.use_color {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_waiting(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

///////////////////////////////////////// Markdown /////////////////////////////////////////

/// Render markdown as terminal text.
///
/// With `use_color` the result carries ANSI styling; without it the result is
/// plain text with the markdown syntax removed.  Trailing whitespace is
/// trimmed.
pub fn render_markdown(markdown: &str, use_color: bool) -> String {
    let mut writer = MarkdownWriter::new(use_color);
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    for event in Parser::new_ext(markdown, options) {
        writer.event(event);
    }
    writer.finish()
}

struct MarkdownWriter {
    out: String,
    use_color: bool,
    styles: Vec<&'static str>,
    // One entry per open list: the next ordinal for ordered lists.
    lists: Vec<Option<u64>>,
    in_code_block: bool,
    link_targets: Vec<String>,
}

impl MarkdownWriter {
    fn new(use_color: bool) -> Self {
        Self {
            out: String::new(),
            use_color,
            styles: Vec::new(),
            lists: Vec::new(),
            in_code_block: false,
            link_targets: Vec::new(),
        }
    }

    fn push_style(&mut self, style: &'static str) {
        self.styles.push(style);
        if self.use_color {
            self.out.push_str(style);
        }
    }

    fn pop_style(&mut self) {
        self.styles.pop();
        if self.use_color {
            self.out.push_str(ANSI_RESET);
            for style in &self.styles {
                self.out.push_str(style);
            }
        }
    }

    fn block_break(&mut self) {
        if self.out.is_empty() {
            return;
        }
        while self.out.ends_with(' ') {
            self.out.pop();
        }
        if !self.out.ends_with("\n\n") {
            if self.out.ends_with('\n') {
                self.out.push('\n');
            } else {
                self.out.push_str("\n\n");
            }
        }
    }

    fn line_break(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.lists.len().saturating_sub(1))
    }

    fn text(&mut self, text: &str) {
        if self.in_code_block {
            for line in text.split_inclusive('\n') {
                if self.out.is_empty() || self.out.ends_with('\n') {
                    self.out.push_str("    ");
                }
                self.out.push_str(line);
            }
        } else {
            self.out.push_str(text);
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.push_style(ANSI_CYAN);
                if !self.use_color {
                    self.out.push('`');
                }
                self.out.push_str(&code);
                if !self.use_color {
                    self.out.push('`');
                }
                self.pop_style();
            }
            Event::Html(html) | Event::InlineHtml(html) => self.out.push_str(&html),
            Event::SoftBreak => self.out.push(' '),
            Event::HardBreak => {
                self.out.push('\n');
                let indent = self.indent();
                if !self.lists.is_empty() {
                    self.out.push_str(&indent);
                    self.out.push_str("  ");
                }
            }
            Event::Rule => {
                self.block_break();
                let rule = "─".repeat(RULE_WIDTH);
                self.push_style(ANSI_DIM);
                self.out.push_str(&rule);
                self.pop_style();
                self.block_break();
            }
            Event::TaskListMarker(checked) => {
                self.out.push_str(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.block_break();
                }
            }
            Tag::Heading { level, .. } => {
                self.block_break();
                self.push_style(ANSI_BOLD);
                if level == HeadingLevel::H1 {
                    self.push_style(ANSI_UNDERLINE);
                }
                if !self.use_color {
                    let hashes = "#".repeat(heading_depth(level));
                    self.out.push_str(&hashes);
                    self.out.push(' ');
                }
            }
            Tag::CodeBlock(kind) => {
                self.block_break();
                if let CodeBlockKind::Fenced(lang) = &kind
                    && !lang.is_empty()
                {
                    self.push_style(ANSI_DIM);
                    self.out.push_str(&format!("    [{lang}]"));
                    self.pop_style();
                    self.out.push('\n');
                }
                self.in_code_block = true;
                self.push_style(ANSI_CYAN);
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.block_break();
                } else {
                    self.line_break();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.line_break();
                let indent = self.indent();
                self.out.push_str(&indent);
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let bullet = format!("{n}. ");
                        *n += 1;
                        bullet
                    }
                    _ => "• ".to_string(),
                };
                self.out.push_str(&bullet);
            }
            Tag::Emphasis => self.push_style(ANSI_ITALIC),
            Tag::Strong => self.push_style(ANSI_BOLD),
            Tag::Strikethrough => self.push_style(ANSI_STRIKE),
            Tag::Link { dest_url, .. } => {
                self.link_targets.push(dest_url.to_string());
                self.push_style(ANSI_UNDERLINE);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.block_break();
                }
            }
            TagEnd::Heading(level) => {
                if level == HeadingLevel::H1 {
                    self.pop_style();
                }
                self.pop_style();
                self.block_break();
            }
            TagEnd::CodeBlock => {
                self.pop_style();
                self.in_code_block = false;
                self.block_break();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.block_break();
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(target) = self.link_targets.pop() {
                    self.push_style(ANSI_DIM);
                    self.out.push_str(&format!(" ({target})"));
                    self.pop_style();
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> String {
        let trimmed = self.out.trim_end().len();
        self.out.truncate(trimmed);
        if self.use_color && !self.out.is_empty() {
            self.out.push_str(ANSI_RESET);
        }
        self.out
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color);
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color);
        assert_eq!(renderer.styled(ANSI_RED, "x"), "x");
    }

    #[test]
    fn plain_paragraphs() {
        assert_eq!(
            render_markdown("hello\nworld\n\nsecond paragraph\n", false),
            "hello world\n\nsecond paragraph"
        );
    }

    #[test]
    fn plain_lists() {
        let md = "Steps:\n\n1. first\n2. second\n   * nested\n\n- a\n- b\n";
        assert_eq!(
            render_markdown(md, false),
            "Steps:\n\n1. first\n2. second\n  • nested\n\n• a\n• b"
        );
    }

    #[test]
    fn plain_code() {
        let md = "Use `ls`:\n\n```sh\nls -la\npwd\n```\n";
        assert_eq!(
            render_markdown(md, false),
            "Use `ls`:\n\n    [sh]\n    ls -la\n    pwd"
        );
    }

    #[test]
    fn plain_headings_and_links() {
        let md = "# Title\n\nSee [docs](https://example.com).";
        assert_eq!(
            render_markdown(md, false),
            "# Title\n\nSee docs (https://example.com)."
        );
    }

    #[test]
    fn colored_emphasis_restores_outer_style() {
        let out = render_markdown("**bold *both* bold**", true);
        assert_eq!(
            out,
            format!(
                "{ANSI_BOLD}bold {ANSI_ITALIC}both{ANSI_RESET}{ANSI_BOLD} bold{ANSI_RESET}{ANSI_RESET}"
            )
        );
    }

    #[test]
    fn empty_markdown() {
        assert_eq!(render_markdown("", true), "");
        assert_eq!(render_markdown("   \n", false), "");
    }
}
