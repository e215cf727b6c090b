//! Security group (SGT) command handlers.

use tabled::Tabled;

use sgtpolicy_api::models::SecurityGroup;
use sgtpolicy_api::{DnacClient, SecurityGroupUpdate};

use crate::cli::{GlobalOpts, SgtArgs, SgtCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SgtRow {
    #[tabled(rename = "Tag")]
    tag: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&SecurityGroup> for SgtRow {
    fn from(g: &SecurityGroup) -> Self {
        Self {
            tag: g.security_group_tag,
            name: g.name.clone(),
            description: g.description.clone(),
            id: g.id.clone(),
        }
    }
}

fn detail(g: &SecurityGroup) -> String {
    use std::fmt::Write;
    let mut out = String::new();
    let _ = writeln!(out, "Name:        {}", g.name);
    let _ = writeln!(out, "Tag:         {}", g.security_group_tag);
    let _ = writeln!(out, "Description: {}", g.description);
    let _ = writeln!(out, "ID:          {}", g.id);
    if let Some(ref kind) = g.scalable_group_type {
        let _ = writeln!(out, "Type:        {kind}");
    }
    if let Some(aci) = g.propagate_to_aci {
        let _ = writeln!(out, "ACI:         {aci}");
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &DnacClient,
    args: SgtArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SgtCommand::List => {
            let groups = client.list_security_groups().await?;
            let out = output::render_list(
                &global.output,
                &groups,
                |g| SgtRow::from(g),
                |g| g.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SgtCommand::Show { name } => {
            let groups = client.security_groups_by_name(&name).await?;
            let group = groups.first().ok_or_else(|| CliError::NotFound {
                resource_type: "security group".into(),
                identifier: name,
                list_command: "sgt list".into(),
            })?;
            let out = output::render_single(&global.output, group, detail, |g| g.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SgtCommand::Create {
            name,
            tag,
            description,
            virtual_networks,
        } => {
            client
                .create_security_group(&name, tag, &description, &virtual_networks)
                .await?;
            output::print_status(&format!("Security group '{name}' created (tag {tag})"), global);
            Ok(())
        }

        SgtCommand::Update {
            name,
            tag,
            description,
            propagate_to_aci,
            virtual_networks,
        } => {
            let update = SecurityGroupUpdate {
                security_group_tag: tag,
                description,
                propagate_to_aci,
                virtual_networks,
            };
            client.update_security_group(&name, update).await?;
            output::print_status(&format!("Security group '{name}' updated"), global);
            Ok(())
        }

        SgtCommand::Delete { name, tag } => match (name, tag) {
            (Some(name), None) => {
                if !util::confirm(
                    &format!("Delete security group '{name}'?"),
                    "sgt delete",
                    global.yes,
                )? {
                    return Ok(());
                }
                client.delete_security_group_by_name(&name).await?;
                output::print_status(&format!("Security group '{name}' deleted"), global);
                Ok(())
            }
            (None, Some(tag)) => {
                if !util::confirm(
                    &format!("Delete security group with tag {tag}?"),
                    "sgt delete",
                    global.yes,
                )? {
                    return Ok(());
                }
                client.delete_security_group_by_tag(tag).await?;
                output::print_status(&format!("Security group with tag {tag} deleted"), global);
                Ok(())
            }
            _ => Err(CliError::Validation {
                field: "name".into(),
                reason: "provide either a group name or --tag".into(),
            }),
        },

        SgtCommand::AttachVn {
            name,
            virtual_networks,
        } => {
            client
                .add_to_virtual_networks(&name, &virtual_networks)
                .await?;
            output::print_status(
                &format!("Security group '{name}' attached to {virtual_networks:?}"),
                global,
            );
            Ok(())
        }

        SgtCommand::Count => {
            let count = client.security_group_count().await?;
            output::print_output(&count.to_string(), global.quiet);
            Ok(())
        }

        SgtCommand::Check { names, absent } => {
            client.check_security_groups(&names, !absent).await?;
            let expectation = if absent { "absent" } else { "present" };
            output::print_status(&format!("All named security groups are {expectation}"), global);
            Ok(())
        }
    }
}
