//! Access contract command handlers.

use tabled::Tabled;

use sgtpolicy_api::DnacClient;
use sgtpolicy_api::models::{AccessContract, ClauseAccess, ContractClause};

use crate::cli::{ClauseAction, ContractArgs, ContractCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ContractRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Clauses")]
    clauses: usize,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&AccessContract> for ContractRow {
    fn from(c: &AccessContract) -> Self {
        Self {
            name: c.name.clone(),
            description: c.description.clone(),
            clauses: c.clause.len(),
            id: c.id.clone().unwrap_or_default(),
        }
    }
}

fn detail(c: &AccessContract) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "Name:        {}", c.name);
    let _ = writeln!(out, "Description: {}", c.description);
    if let Some(ref id) = c.id {
        let _ = writeln!(out, "ID:          {id}");
    }
    for (i, clause) in c.clause.iter().enumerate() {
        let _ = writeln!(out, "Clause {i}:    {:?}", clause.access);
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DnacClient,
    args: ContractArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ContractCommand::List => {
            let contracts = client.list_contracts().await?;
            let out = output::render_list(
                &global.output,
                &contracts,
                |c| ContractRow::from(c),
                |c| c.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ContractCommand::Show { name } => {
            let contracts = client.contracts_by_name(&name).await?;
            let contract = contracts.first().ok_or_else(|| CliError::NotFound {
                resource_type: "contract".into(),
                identifier: name,
                list_command: "contract list".into(),
            })?;
            let out = output::render_single(&global.output, contract, detail, |c| {
                c.id.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ContractCommand::Create {
            name,
            description,
            action,
            file,
        } => {
            let contract = match file {
                Some(path) => util::read_json_file::<AccessContract>(&path)?,
                None => {
                    let access = match action {
                        ClauseAction::Permit => ClauseAccess::Permit,
                        ClauseAction::Deny => ClauseAccess::Deny,
                    };
                    AccessContract::new(
                        name.clone(),
                        description,
                        vec![ContractClause::access_only(access)],
                    )
                }
            };
            client.create_contract(&contract).await?;
            output::print_status(&format!("Contract '{name}' created"), global);
            Ok(())
        }

        ContractCommand::Update { name, file } => {
            let contract = util::read_json_file::<AccessContract>(&file)?;
            client.update_contract(&name, contract).await?;
            output::print_status(&format!("Contract '{name}' updated"), global);
            Ok(())
        }

        ContractCommand::Delete { name } => {
            if !util::confirm(
                &format!("Delete contract '{name}'?"),
                "contract delete",
                global.yes,
            )? {
                return Ok(());
            }
            client.delete_contract(&name).await?;
            output::print_status(&format!("Contract '{name}' deleted"), global);
            Ok(())
        }

        ContractCommand::DeleteAll { exclusions } => {
            if !util::confirm(
                "Delete ALL non-reserved contracts?",
                "contract delete-all",
                global.yes,
            )? {
                return Ok(());
            }
            client.delete_all_contracts(&exclusions).await?;
            output::print_status("Non-reserved contracts deleted", global);
            Ok(())
        }

        ContractCommand::Count => {
            let count = client.contract_count().await?;
            output::print_output(&count.to_string(), global.quiet);
            Ok(())
        }

        ContractCommand::Check { names, absent } => {
            client.check_contracts(&names, !absent).await?;
            let expectation = if absent { "absent" } else { "present" };
            output::print_status(&format!("All named contracts are {expectation}"), global);
            Ok(())
        }
    }
}
