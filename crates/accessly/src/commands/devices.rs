//! Device command handlers.

use tabled::Tabled;

use accessly_core::AccessDirectory;
use accessly_core::model::Device;

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    device_type: &'static str,
    #[tabled(rename = "Door")]
    door: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            device_type: d.device_type.as_str(),
            door: util::dash(d.door_id.as_deref()),
        }
    }
}

fn detail(d: &Device) -> String {
    [
        format!("ID:     {}", d.id),
        format!("Name:   {}", d.name),
        format!("Type:   {}", d.device_type.as_str()),
        format!("Online: {}", d.is_online),
        format!("Door:   {}", util::dash(d.door_id.as_deref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    directory: &AccessDirectory,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List(list) => {
            let devices = directory.devices(list.limit, list.offset).await?;
            let out =
                output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| d.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let device = directory.device(&id).await?;
            let out = output::render_single(&global.output, &device, detail, |d| d.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
