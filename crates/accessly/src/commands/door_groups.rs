//! Door-group command handlers.

use tabled::Tabled;

use accessly_core::AccessDirectory;
use accessly_core::model::DoorGroup;

use crate::cli::{DoorGroupsArgs, DoorGroupsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DoorGroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Doors")]
    doors: usize,
}

impl From<&DoorGroup> for DoorGroupRow {
    fn from(g: &DoorGroup) -> Self {
        Self {
            id: g.id.clone(),
            name: g.name.clone(),
            doors: g.door_ids.len(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    directory: &AccessDirectory,
    args: DoorGroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DoorGroupsCommand::List(list) => {
            let groups = directory.door_groups(list.limit, list.offset).await?;
            let out = output::render_list(&global.output, &groups, |g| DoorGroupRow::from(g), |g| {
                g.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DoorGroupsCommand::Create {
            name,
            description,
            doors,
        } => {
            let group = directory
                .create_door_group(
                    &name,
                    description.as_deref(),
                    &doors.unwrap_or_default(),
                )
                .await?;
            if !global.quiet {
                eprintln!("door group {} created ({})", group.name, group.id);
            }
            Ok(())
        }
    }
}
