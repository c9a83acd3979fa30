//! Door command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use accessly_core::AccessDirectory;
use accessly_core::model::Door;

use crate::cli::{ColorMode, DoorsArgs, DoorsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DoorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Lock")]
    lock: String,
    #[tabled(rename = "Online")]
    online: &'static str,
    #[tabled(rename = "Location")]
    location: String,
}

fn lock_state(door: &Door, color: &ColorMode) -> String {
    let label = if door.is_locked { "locked" } else { "unlocked" };
    if output::should_color(color) {
        if door.is_locked {
            label.green().to_string()
        } else {
            label.yellow().to_string()
        }
    } else {
        label.to_owned()
    }
}

fn to_row(door: &Door, color: &ColorMode) -> DoorRow {
    DoorRow {
        id: door.id.clone(),
        name: door.name.clone(),
        lock: lock_state(door, color),
        online: if door.is_online { "yes" } else { "no" },
        location: util::dash(door.location.as_deref()),
    }
}

fn detail(door: &Door) -> String {
    [
        format!("ID:        {}", door.id),
        format!("Name:      {}", door.name),
        format!(
            "Lock:      {}",
            if door.is_locked { "locked" } else { "unlocked" }
        ),
        format!("Online:    {}", door.is_online),
        format!("Hub:       {}", door.device_id),
        format!("Location:  {}", util::dash(door.location.as_deref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    directory: &AccessDirectory,
    args: DoorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DoorsCommand::List(list) => {
            let doors = directory.doors(list.limit, list.offset).await?;
            let out = output::render_list(
                &global.output,
                &doors,
                |d| to_row(d, &global.color),
                |d| d.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DoorsCommand::Get { id } => {
            let door = directory.door(&id).await?;
            let out = output::render_single(&global.output, &door, detail, |d| d.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
