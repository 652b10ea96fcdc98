//! Command-line argument parsing for the chatstream CLI.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ChatConfig;

pub const USAGE: &str = "\
Usage:
  chatstream replay [FILE]
  chatstream send --conversation ID [--model M] [--url U] [--token T] MESSAGE
  chatstream --version

Environment:
  CHATSTREAM_BASE_URL, CHATSTREAM_TOKEN, CHATSTREAM_MODEL
  RUST_LOG (log filter, default: warn)";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Reassemble a recorded event stream from a file, or stdin when `None`
    Replay { path: Option<PathBuf> },
    /// Post a message and stream the reply
    Send(SendArgs),
}

/// Arguments of the `send` command.
#[derive(Debug, Clone, PartialEq)]
pub struct SendArgs {
    pub conversation_id: i64,
    pub message: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub token: Option<String>,
}

impl SendArgs {
    /// Layer the command-line overrides on top of `config`.
    pub fn apply(&self, mut config: ChatConfig) -> ChatConfig {
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        config
    }
}

/// Invalid command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid conversation id: {0}")]
    InvalidConversation(String),

    #[error("send requires --conversation ID")]
    MissingConversation,

    #[error("send requires a message")]
    MissingMessage,
}

/// Parse command-line arguments and return the command to execute.
///
/// The first item is the program name and is skipped.
///
/// # Examples
///
/// ```
/// use chatstream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatstream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);
    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };

    match command.as_str() {
        "--version" | "-V" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "replay" => parse_replay(args),
        "send" => parse_send(args).map(CliCommand::Send),
        other => Err(ArgsError::UnknownCommand(other.to_string())),
    }
}

fn parse_replay<I>(mut args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let path = match args.next() {
        None => None,
        Some(arg) if arg == "-" => None,
        Some(arg) if arg.starts_with('-') => return Err(ArgsError::UnexpectedArgument(arg)),
        Some(arg) => Some(PathBuf::from(arg)),
    };
    if let Some(extra) = args.next() {
        return Err(ArgsError::UnexpectedArgument(extra));
    }
    Ok(CliCommand::Replay { path })
}

fn parse_send<I>(mut args: I) -> Result<SendArgs, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut conversation_id = None;
    let mut model = None;
    let mut base_url = None;
    let mut token = None;
    let mut words = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--conversation" | "-c" => {
                let value = flag_value(&mut args, &arg)?;
                let id = value
                    .parse::<i64>()
                    .map_err(|_| ArgsError::InvalidConversation(value.clone()))?;
                conversation_id = Some(id);
            }
            "--model" | "-m" => model = Some(flag_value(&mut args, &arg)?),
            "--url" => base_url = Some(flag_value(&mut args, &arg)?),
            "--token" => token = Some(flag_value(&mut args, &arg)?),
            "--" => {
                words.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => {
                return Err(ArgsError::UnexpectedArgument(flag.to_string()));
            }
            _ => words.push(arg),
        }
    }

    let conversation_id = conversation_id.ok_or(ArgsError::MissingConversation)?;
    let message = words.join(" ");
    if message.trim().is_empty() {
        return Err(ArgsError::MissingMessage);
    }

    Ok(SendArgs {
        conversation_id,
        message,
        model,
        base_url,
        token,
    })
}

fn flag_value<I>(args: &mut I, flag: &str) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| ArgsError::MissingValue(flag.to_string()))
}
