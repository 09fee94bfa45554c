//! Main chat loop orchestration.
//!
//! Restores the local conversation, prints the banner, then alternates
//! between reading input and running turns on the controller. While a turn
//! is pending the loop keeps reading input so `/stop` or Ctrl+C can abandon it.

use std::future::Future;
use std::path::PathBuf;

use console::style;
use medassist_infra::filesystem::read_attachment;
use medassist_types::chat::ChatMessage;
use medassist_types::error::ChatError;

use crate::cli::conversation::export_to;
use crate::cli::pins::{pin_path, print_pins};
use crate::cli::render;
use crate::state::{AppState, ConcreteController};

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

type TurnOutcome = Option<Result<Option<ChatMessage>, ChatError>>;

/// Run the interactive chat loop until `/exit` or Ctrl+D.
pub async fn run_chat_loop(state: &AppState, ephemeral: bool) -> anyhow::Result<()> {
    let mut controller = state.controller().await;

    print_welcome_banner(
        &state.config.api_base_url,
        controller.session_id(),
        controller.messages().len(),
        ephemeral,
    );

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            if !run_command(&mut controller, &mut chat_input, cmd).await {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            continue;
        }

        // An empty line retries a restored draft or sends pending attachments.
        if text.is_empty() {
            if controller.input().trim().is_empty() && controller.attachments().is_empty() {
                continue;
            }
        } else {
            controller.set_input(text);
        }

        let outcome = await_turn(&mut chat_input, controller.submit()).await;
        report_outcome(&mut controller, outcome, "Nothing to send.");
    }

    chat_input.flush();
    Ok(())
}

/// Run one slash command. Returns `false` when the loop should end.
async fn run_command(
    controller: &mut ConcreteController,
    chat_input: &mut ChatInput,
    cmd: ChatCommand,
) -> bool {
    match cmd {
        ChatCommand::Help => commands::print_help(),
        ChatCommand::Exit => return false,
        ChatCommand::Clear => match controller.clear().await {
            Ok(()) => render::print_success("Conversation cleared"),
            Err(e) => render::print_error("Failed to clear conversation", &e),
        },
        ChatCommand::Regen => {
            let outcome = await_turn(chat_input, controller.regenerate_last()).await;
            report_outcome(
                controller,
                outcome,
                "Need at least one question and one reply to regenerate.",
            );
        }
        ChatCommand::Attach(path) => match read_attachment(&path).await {
            Ok(file) => {
                println!(
                    "\n  {} Attached {} ({}); it will be sent with your next message.\n",
                    style("+").green().bold(),
                    style(&file.name).cyan(),
                    file.category()
                );
                controller.attach(file);
            }
            Err(e) => render::print_error(&format!("Cannot attach {}", path.display()), &e),
        },
        ChatCommand::Pin(path) => match pin_path(controller.pins_mut(), &path).await {
            Ok((file, true)) => render::print_success(&format!("Pinned {}", style(&file.name).cyan())),
            Ok((file, false)) => println!("\n  {} {} is already pinned\n", style("i").blue().bold(), file.name),
            Err(e) => render::print_error("Pin failed", &e),
        },
        ChatCommand::Pins => print_pins(controller.pins().files()),
        ChatCommand::Unpin => match controller.pins_mut().unpin_all().await {
            Ok(()) => render::print_success("Pinned files removed"),
            Err(e) => render::print_error("Failed to remove pinned files", &e),
        },
        ChatCommand::Export { format, path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(format.file_name()));
            match export_to(controller.messages(), format, &path).await {
                Ok(count) => render::print_success(&format!(
                    "Exported {count} messages to {}",
                    style(path.display()).cyan()
                )),
                Err(e) => render::print_error("Export failed", &e),
            }
        }
        ChatCommand::History => render::print_conversation(controller.messages()),
        ChatCommand::Stop => {
            controller.stop();
            println!("\n  {}\n", style("Nothing is pending.").dim());
        }
        ChatCommand::Unknown(message) => {
            println!(
                "\n  {} {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(message).dim()
            );
        }
    }
    true
}

/// Await a turn while still reading input. `/stop`, Ctrl+C, or Ctrl+D
/// abandon the turn and yield `None`; the turn future is dropped on return.
async fn await_turn<F: Future>(chat_input: &mut ChatInput, turn: F) -> Option<F::Output> {
    let spinner = render::spinner("thinking...");
    tokio::pin!(turn);

    let outcome = loop {
        tokio::select! {
            result = &mut turn => break Some(result),
            event = chat_input.read_line() => match event {
                InputEvent::Interrupted | InputEvent::Eof => break None,
                InputEvent::Message(text) if commands::parse(&text) == Some(ChatCommand::Stop) => break None,
                InputEvent::Message(_) => {
                    spinner.println("  Still waiting for the reply; /stop or Ctrl+C to stop waiting.");
                }
            },
        }
    };

    spinner.finish_and_clear();
    outcome
}

fn report_outcome(controller: &mut ConcreteController, outcome: TurnOutcome, empty_message: &str) {
    match outcome {
        None => {
            controller.stop();
            println!("\n  {}\n", style("Stopped waiting for the reply.").dim());
        }
        Some(Ok(Some(reply))) => {
            render::print_message(&reply);
            println!();
        }
        Some(Ok(None)) => println!("\n  {} {empty_message}\n", style("i").blue().bold()),
        Some(Err(ChatError::Busy)) => {
            println!(
                "\n  {} A reply is still pending. Use /stop first.\n",
                style("!").yellow().bold()
            );
        }
        Some(Err(e)) => {
            render::print_error("Message not sent", &e);
            println!(
                "  {}\n",
                style("Your message was kept. Press Enter to retry or type a new one.").dim()
            );
        }
    }
}
