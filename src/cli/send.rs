//! Send command: post a message and stream the reply to stdout.

use std::io;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;

use super::args::SendArgs;
use super::sink::PrintSink;
use crate::client::ChatClient;
use crate::config::ChatConfig;
use crate::conversation::TurnOutcome;

/// Handle the `send` command.
///
/// Flags in `args` override values from `config`.
pub async fn handle_send_command(args: &SendArgs, config: ChatConfig) -> Result<()> {
    let config = args.apply(config);
    let client = ChatClient::from_config(config);

    let mut sink = PrintSink::new(io::stdout());
    let outcome = client
        .run_turn(args.conversation_id, &args.message, &mut sink)
        .await;
    sink.finish().wrap_err("Failed to write output")?;

    match outcome {
        TurnOutcome::Completed { .. } => Ok(()),
        TurnOutcome::Failed { error, .. } => Err(error).wrap_err_with(|| {
            format!("Sending to conversation {} failed", args.conversation_id)
        }),
    }
}
