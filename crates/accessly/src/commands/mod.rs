//! Command handlers, one module per resource family.

pub mod config_cmd;
pub mod devices;
pub mod door_groups;
pub mod doors;
pub mod events;
pub mod policies;
pub mod probe;
pub mod users;
pub mod util;
pub mod visitors;

use accessly_core::AccessDirectory;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Command,
    directory: &AccessDirectory,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::Users(args) => users::handle(directory, args, global).await,
        Command::Visitors(args) => visitors::handle(directory, args, global).await,
        Command::Doors(args) => doors::handle(directory, args, global).await,
        Command::Devices(args) => devices::handle(directory, args, global).await,
        Command::DoorGroups(args) => door_groups::handle(directory, args, global).await,
        Command::Policies(args) => policies::handle(directory, args, global).await,
        Command::Events(args) => events::handle(directory, args, global).await,
        Command::Probe(args) => probe::handle(directory, args, global).await,
        // Handled before a connection is established.
        Command::Config(_) | Command::Completions(_) => unreachable!("dispatched in main"),
    }
}
