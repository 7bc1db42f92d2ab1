use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::http::GatewayClient;
use super::transcript::Transcript;
use crate::models::{HealthState, ModelsResponse};

/// One line of user input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    Clear,
    Model(Option<String>),
    Models,
    Health,
    Help,
    Quit,
    Unknown(String),
}

/// Interpret a line typed at the prompt; `None` for blank lines
pub fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix(':') else {
        return Some(Input::Message(line.to_string()));
    };

    let parts: Vec<&str> = command.split_whitespace().collect();
    let input = match parts.first().copied() {
        Some("clear") => Input::Clear,
        Some("model") => Input::Model(parts.get(1).map(|m| m.to_string())),
        Some("models") => Input::Models,
        Some("health") => Input::Health,
        Some("help") | Some("h") => Input::Help,
        Some("quit") | Some("q") => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    };
    Some(input)
}

const HELP: &str = "Commands:
  :clear - Clear chat history
  :model [name] - Switch model or show current
  :models - List the models the gateway supports
  :health - Show gateway status
  :help/:h - Show this help
  :quit/:q - Leave the chat";

/// Interactive chat loop against a running gateway.
///
/// Returns the transcript as it stood when the loop ended.
pub async fn run_chat<R, W>(
    client: &GatewayClient,
    mut model: Option<String>,
    input: R,
    out: &mut W,
) -> Result<Transcript>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut transcript = Transcript::new();
    let mut lines = input.lines();

    writeln!(out, "Chatting via {} (type :help for commands)", client.base_url())?;

    loop {
        write!(out, "{} ", ">".bold())?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(input) = parse_input(&line) else {
            continue;
        };

        match input {
            Input::Message(content) => {
                transcript.push_user(content);
                match client.chat(transcript.messages(), model.as_deref()).await {
                    Ok(response) => {
                        transcript.record_reply(&response);
                        let usage = response.usage;
                        writeln!(out, "{}", response.response)?;
                        writeln!(
                            out,
                            "{}",
                            format!(
                                "[{}] prompt {} | completion {} | total {} (session {})",
                                response.model,
                                usage.prompt_tokens,
                                usage.completion_tokens,
                                usage.total_tokens,
                                transcript.total_usage().total_tokens
                            )
                            .dimmed()
                        )?;
                    }
                    // The user turn stays in the transcript; no assistant turn is added
                    Err(e) => writeln!(out, "{} {}", "Error:".red().bold(), e)?,
                }
            }
            Input::Clear => {
                transcript.reset();
                writeln!(out, "Conversation cleared.")?;
            }
            Input::Model(None) => {
                let current = model.as_deref().unwrap_or("gateway default");
                writeln!(out, "Current model: {}", current.green())?;
            }
            Input::Model(Some(id)) => {
                writeln!(out, "Switched to model {}", id.green())?;
                model = Some(id);
            }
            Input::Models => match client.models().await {
                Ok(models) => print_models(out, &models)?,
                Err(e) => writeln!(out, "{} {}", "Error:".red().bold(), e)?,
            },
            Input::Health => match client.health().await {
                Ok(health) => {
                    let status = match health.status {
                        HealthState::Healthy => "healthy".green(),
                        HealthState::Degraded => "degraded".yellow(),
                    };
                    writeln!(
                        out,
                        "Gateway {} | default model {} | version {}",
                        status, health.model, health.version
                    )?;
                }
                Err(e) => writeln!(out, "{} {}", "Error:".red().bold(), e)?,
            },
            Input::Help => writeln!(out, "{}", HELP)?,
            Input::Quit => break,
            Input::Unknown(command) => {
                writeln!(out, "Unknown command: {}", command)?;
                writeln!(out, "{}", HELP)?;
            }
        }
    }

    Ok(transcript)
}

/// Render a model listing
pub fn print_models<W: Write>(out: &mut W, models: &ModelsResponse) -> std::io::Result<()> {
    writeln!(out, "Available models ({}):", models.count)?;
    for model in &models.available_models {
        match &model.description {
            Some(description) => writeln!(
                out,
                "  • {} - {}",
                model.name.green(),
                description
            )?,
            None => writeln!(out, "  • {}", model.name.green())?,
        }
    }
    Ok(())
}
