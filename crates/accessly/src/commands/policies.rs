//! Access-policy command handlers.

use tabled::Tabled;

use accessly_core::model::AccessPolicy;
use accessly_core::{AccessDirectory, CreateAccessPolicyRequest};

use crate::cli::{GlobalOpts, PoliciesArgs, PoliciesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PolicyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Doors")]
    doors: usize,
    #[tabled(rename = "Groups")]
    groups: usize,
}

impl From<&AccessPolicy> for PolicyRow {
    fn from(p: &AccessPolicy) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            schedule: util::dash(p.schedule_id.as_deref()),
            doors: p.door_ids.len(),
            groups: p.door_group_ids.len(),
        }
    }
}

fn detail(p: &AccessPolicy) -> String {
    [
        format!("ID:          {}", p.id),
        format!("Name:        {}", p.name),
        format!("Schedule:    {}", util::dash(p.schedule_id.as_deref())),
        format!("Doors:       {}", p.door_ids.join(", ")),
        format!("Door groups: {}", p.door_group_ids.join(", ")),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    directory: &AccessDirectory,
    args: PoliciesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PoliciesCommand::List(list) => {
            let policies = directory.access_policies(list.limit, list.offset).await?;
            let out = output::render_list(&global.output, &policies, |p| PolicyRow::from(p), |p| {
                p.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoliciesCommand::Get { id } => {
            let policy = directory.access_policy(&id).await?;
            let out = output::render_single(&global.output, &policy, detail, |p| p.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PoliciesCommand::Create {
            name,
            description,
            schedule,
            doors,
            door_groups,
        } => {
            let policy = directory
                .create_access_policy(&CreateAccessPolicyRequest {
                    name,
                    description,
                    schedule_id: schedule,
                    holiday_group_id: None,
                    door_ids: doors.unwrap_or_default(),
                    door_group_ids: door_groups.unwrap_or_default(),
                })
                .await?;
            if !global.quiet {
                eprintln!("policy {} created ({})", policy.name, policy.id);
            }
            Ok(())
        }
    }
}
