//! User command handlers.

use tabled::Tabled;

use accessly_core::model::{User, UserRole};
use accessly_core::{AccessDirectory, CreateUserRequest};

use crate::cli::{GlobalOpts, RoleArg, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<RoleArg> for UserRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => UserRole::Admin,
            RoleArg::User => UserRole::User,
            RoleArg::Visitor => UserRole::Visitor,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: &'static str,
    #[tabled(rename = "Active")]
    active: &'static str,
    #[tabled(rename = "Credentials")]
    credentials: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.full_name(),
            email: util::dash(u.email.as_deref()),
            role: u.role.as_str(),
            active: if u.is_active { "yes" } else { "no" },
            credentials: format!(
                "{} card(s), {} pin(s)",
                u.nfc_cards.len(),
                u.pin_codes.len()
            ),
        }
    }
}

fn detail(u: &User) -> String {
    [
        format!("ID:        {}", u.id),
        format!("Name:      {}", u.full_name()),
        format!("Email:     {}", util::dash(u.email.as_deref())),
        format!("Phone:     {}", util::dash(u.phone.as_deref())),
        format!("Role:      {}", u.role.as_str()),
        format!("Active:    {}", u.is_active),
        format!("Policies:  {}", u.access_policy_ids.join(", ")),
        format!("Cards:     {}", u.nfc_cards.len()),
        format!("PINs:      {}", u.pin_codes.len()),
        format!("Valid:     {} .. {}", util::dash_time(u.start_date), util::dash_time(u.end_date)),
        format!("Created:   {}", util::dash_time(u.created_at)),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    directory: &AccessDirectory,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(list) => {
            let users = directory.users(list.limit, list.offset).await?;
            let out = output::render_list(&global.output, &users, |u| UserRow::from(u), |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = directory.user(&id).await?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            first_name,
            last_name,
            email,
            phone,
            role,
            policies,
        } => {
            let user = directory
                .create_user(&CreateUserRequest {
                    first_name,
                    last_name,
                    email,
                    phone,
                    role: role.into(),
                    access_policy_ids: policies.unwrap_or_default(),
                    start_date: None,
                    end_date: None,
                })
                .await?;

            if !global.quiet {
                eprintln!("user {} created ({})", user.full_name(), user.id);
            }
            Ok(())
        }
    }
}
