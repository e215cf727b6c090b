//! Group-based policy command handlers.

use tabled::Tabled;

use sgtpolicy_api::models::PolicyName;
use sgtpolicy_api::{DnacClient, PolicyMode};

use crate::cli::{GlobalOpts, PolicyArgs, PolicyCommand, PolicyModeArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PolicyRow {
    #[tabled(rename = "Policy")]
    name: String,
    #[tabled(rename = "Contract")]
    contract: String,
}

impl From<&PolicyName> for PolicyRow {
    fn from(p: &PolicyName) -> Self {
        Self {
            name: p.name.clone(),
            contract: p.contract.clone(),
        }
    }
}

impl From<PolicyModeArg> for PolicyMode {
    fn from(mode: PolicyModeArg) -> Self {
        match mode {
            PolicyModeArg::Enabled => PolicyMode::Enabled,
            PolicyModeArg::Disabled => PolicyMode::Disabled,
            PolicyModeArg::Monitor => PolicyMode::Monitor,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DnacClient,
    args: PolicyArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PolicyCommand::List => {
            let policies = client.policy_names().await?;
            let out = output::render_list(
                &global.output,
                &policies,
                |p| PolicyRow::from(p),
                |p| p.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PolicyCommand::Create {
            name,
            producer,
            consumer,
            contract,
        } => {
            client
                .create_policy(&name, &producer, &consumer, &contract)
                .await?;
            output::print_status(
                &format!("Policy '{name}' created: {producer} -> {consumer} ({contract})"),
                global,
            );
            Ok(())
        }

        PolicyCommand::Update {
            producer,
            consumer,
            mode,
            contract,
        } => {
            client
                .update_policy(
                    &producer,
                    &consumer,
                    mode.map(PolicyMode::from),
                    contract.as_deref(),
                )
                .await?;
            output::print_status(
                &format!("Policy {producer} -> {consumer} updated"),
                global,
            );
            Ok(())
        }

        PolicyCommand::Delete { producer, consumer } => {
            if !util::confirm(
                &format!("Delete policy {producer} -> {consumer}?"),
                "policy delete",
                global.yes,
            )? {
                return Ok(());
            }
            client.delete_policy(&producer, &consumer).await?;
            output::print_status(
                &format!("Policy {producer} -> {consumer} deleted"),
                global,
            );
            Ok(())
        }

        PolicyCommand::Count => {
            let count = client.policy_count().await?;
            output::print_output(&count.to_string(), global.quiet);
            Ok(())
        }

        PolicyCommand::Check { names, absent } => {
            client.check_policies(&names, !absent).await?;
            let expectation = if absent { "absent" } else { "present" };
            output::print_status(&format!("All named policies are {expectation}"), global);
            Ok(())
        }
    }
}
