//! CLI module for chatstream.
//!
//! - Argument parsing
//! - Version display
//! - `replay`: reassemble a recorded event stream from a file or stdin
//! - `send`: post a message to the backend and print the reply as it streams
//!
//! # Usage
//!
//! ```ignore
//! use chatstream::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args())?;
//! run_cli_command(command)?;
//! ```

pub mod args;
pub mod replay;
pub mod send;
pub mod sink;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, SendArgs, USAGE};
pub use replay::{handle_replay_command, replay, replay_to};
pub use send::handle_send_command;
pub use sink::PrintSink;
pub use version::{handle_version_command, VERSION};

use color_eyre::Result;

use crate::config::ChatConfig;

/// Run a parsed CLI command.
///
/// Configuration comes from the environment; `send` flags override it.
pub fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => {
            handle_version_command();
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Replay { path } => {
            handle_replay_command(path.as_deref(), &ChatConfig::from_env())
        }
        CliCommand::Send(args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(handle_send_command(&args, ChatConfig::from_env()))
        }
    }
}
