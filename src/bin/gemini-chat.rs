//! Interactive chat application for conversing with Gemini.
//!
//! The conversation is saved to `chat_history.json` and picked up again on
//! the next run.
//!
//! # Usage
//!
//! ```bash
//! # Continue the saved conversation
//! gemini-chat
//!
//! # Start over without touching the saved file
//! gemini-chat --new
//!
//! # Pick a model
//! gemini-chat --model gemini-2.0-flash
//!
//! # See which models the key can use
//! gemini-chat --list-models
//! ```
//!
//! # Commands
//!
//! - `exit` - Save and quit
//! - `save` - Save the conversation
//! - `clear` - Start a fresh conversation
//! - `list models` - Show available models

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use dialoguer::Password;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use gemini_chat::chat::{
    ChatApp, ChatArgs, ChatConfig, Flow, PlainTextRenderer, Renderer, help_text, print_models,
    resolve_api_key,
};
use gemini_chat::{API_KEY_ENV, Error, Gemini, JsonLinesLogger, TranscriptStore};

/// Main entry point for the gemini-chat application.
#[tokio::main]
async fn main() -> ExitCode {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemini-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    let client = match connect(&config) {
        Ok(client) => client,
        Err(err) => {
            renderer.print_error(&err.to_string());
            renderer.print_warning("Try running with --list-models to see available models");
            return ExitCode::FAILURE;
        }
    };
    let client = match &config.log_path {
        Some(path) => match JsonLinesLogger::open(path) {
            Ok(logger) => client.with_logger(Arc::new(logger)),
            Err(err) => {
                renderer.print_warning(&format!("Client logging disabled: {err}"));
                client
            }
        },
        None => client,
    };

    if config.list_models {
        return match client.list_all_models().await {
            Ok(models) => {
                print_models(&mut renderer, &models);
                ExitCode::SUCCESS
            }
            Err(err) => {
                renderer.print_error(&Error::model_list(err).to_string());
                ExitCode::FAILURE
            }
        };
    }

    renderer.print_banner(&config.model.to_string(), help_text());

    let store = TranscriptStore::new(config.transcript_path.clone());
    let transcript = store.initial(config.fresh, |err| {
        renderer.print_error(&format!("{err}. Starting fresh."));
    });

    // Flag for abandoning a pending reply
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    if let Err(err) = ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    }) {
        renderer.print_warning(&format!("Ctrl-C handling unavailable: {err}"));
    }

    let mut app = ChatApp::new(client, config.model.clone(), store, transcript)
        .with_interrupt(interrupted);
    app.replay(&mut renderer);

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            renderer.print_error(&format!("Input error: {err}"));
            return ExitCode::FAILURE;
        }
    };

    loop {
        println!();
        match rl.readline("You: ") {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim());
                }
                if app.handle_line(&line, &mut renderer).await == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - save and exit
                app.finish(&mut renderer);
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                app.finish(&mut renderer);
                break;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Resolves the API key and builds the client.
fn connect(config: &ChatConfig) -> Result<Gemini, Error> {
    let api_key = resolve_api_key(config.api_key.clone(), env::var(API_KEY_ENV).ok(), || {
        Password::new()
            .with_prompt("Enter your Gemini API key")
            .interact()
            .map_err(|err| Error::remote_init(format!("could not read API key: {err}")))
    })?;
    Gemini::with_options(Some(api_key), None, config.timeout)
}
