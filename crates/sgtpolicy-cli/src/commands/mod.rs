//! Command dispatch: bridges CLI args -> API client calls -> output formatting.

pub mod config_cmd;
pub mod contract;
pub mod deploy;
pub mod policy;
pub mod sgt;
pub mod util;

use sgtpolicy_api::DnacClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &DnacClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sgt(args) => sgt::handle(client, args, global).await,
        Command::Contract(args) => contract::handle(client, args, global).await,
        Command::Policy(args) => policy::handle(client, args, global).await,
        Command::Deploy(args) => deploy::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
