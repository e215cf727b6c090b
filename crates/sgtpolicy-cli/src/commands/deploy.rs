//! ACA deploy command handlers.

use sgtpolicy_api::{DeployVerify, DnacClient};

use crate::cli::{DeployArgs, DeployCommand, GlobalOpts, VerifyArg};
use crate::error::CliError;
use crate::output;

impl From<VerifyArg> for DeployVerify {
    fn from(arg: VerifyArg) -> Self {
        match arg {
            VerifyArg::Done => DeployVerify::Done,
            VerifyArg::NoRequest => DeployVerify::NoRequest,
            VerifyArg::Any => DeployVerify::Any,
        }
    }
}

pub async fn handle(
    client: &DnacClient,
    args: DeployArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DeployCommand::Push { verify } => {
            client.push_security_groups(verify.into()).await?;
            output::print_status("Security groups pushed to the network", global);
            Ok(())
        }

        DeployCommand::Run { verify, attempts } => {
            client
                .deploy_security_groups(verify.into(), attempts)
                .await?;
            output::print_status("Group-based policy deployed", global);
            Ok(())
        }
    }
}
