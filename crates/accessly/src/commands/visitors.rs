//! Visitor command handlers.

use chrono::{Duration, Utc};
use tabled::Tabled;

use accessly_core::model::Visitor;
use accessly_core::{AccessDirectory, CreateVisitorRequest, UpdateVisitorRequest};

use crate::cli::{GlobalOpts, VisitorsArgs, VisitorsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VisitorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Valid")]
    valid: &'static str,
    #[tabled(rename = "Sponsor")]
    sponsor: String,
}

impl From<&Visitor> for VisitorRow {
    fn from(v: &Visitor) -> Self {
        Self {
            id: v.id.clone(),
            name: v.full_name(),
            window: format!(
                "{} .. {}",
                v.start_date.format("%Y-%m-%d %H:%M"),
                v.end_date.format("%Y-%m-%d %H:%M")
            ),
            valid: if v.is_valid() { "yes" } else { "no" },
            sponsor: util::dash(v.sponsor_user_id.as_deref()),
        }
    }
}

fn detail(v: &Visitor) -> String {
    [
        format!("ID:       {}", v.id),
        format!("Name:     {}", v.full_name()),
        format!("Email:    {}", util::dash(v.email.as_deref())),
        format!("Phone:    {}", util::dash(v.phone.as_deref())),
        format!(
            "Window:   {} .. {}",
            v.start_date.format("%Y-%m-%d %H:%M"),
            v.end_date.format("%Y-%m-%d %H:%M")
        ),
        format!("Active:   {}", v.is_active),
        format!("Valid:    {}", v.is_valid()),
        format!("Policies: {}", v.access_policy_ids.join(", ")),
        format!("Cards:    {}", v.nfc_cards.len()),
        format!("PIN set:  {}", !v.pin_codes.is_empty()),
        format!("Sponsor:  {}", util::dash(v.sponsor_user_id.as_deref())),
        format!("Notes:    {}", util::dash(v.notes.as_deref())),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    directory: &AccessDirectory,
    args: VisitorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VisitorsCommand::List(list) => {
            let visitors = directory.visitors(list.limit, list.offset).await?;
            let out = output::render_list(&global.output, &visitors, |v| VisitorRow::from(v), |v| {
                v.id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VisitorsCommand::Get { id } => {
            let visitor = directory.visitor(&id).await?;
            let out = output::render_single(&global.output, &visitor, detail, |v| v.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        VisitorsCommand::Create {
            first_name,
            last_name,
            start,
            hours,
            email,
            phone,
            policies,
            sponsor,
            notes,
        } => {
            let start_date = match start {
                Some(ref raw) => util::parse_timestamp("start", raw)?,
                None => Utc::now(),
            };
            let end_date = start_date + Duration::hours(i64::from(hours));

            let visitor = directory
                .create_visitor(&CreateVisitorRequest {
                    first_name,
                    last_name,
                    start_date,
                    end_date,
                    email,
                    phone,
                    access_policy_ids: policies.unwrap_or_default(),
                    sponsor_user_id: sponsor,
                    notes,
                })
                .await?;

            if !global.quiet {
                eprintln!(
                    "visitor {} created ({}), window until {}",
                    visitor.full_name(),
                    visitor.id,
                    visitor.end_date.format("%Y-%m-%d %H:%M")
                );
            }
            Ok(())
        }

        VisitorsCommand::Update {
            id,
            end,
            active,
            notes,
        } => {
            let end_date = end
                .as_deref()
                .map(|raw| util::parse_timestamp("end", raw))
                .transpose()?;

            let visitor = directory
                .update_visitor(
                    &id,
                    &UpdateVisitorRequest {
                        end_date,
                        is_active: active,
                        notes,
                        ..UpdateVisitorRequest::default()
                    },
                )
                .await?;

            if !global.quiet {
                eprintln!("visitor {} updated", visitor.id);
            }
            Ok(())
        }

        VisitorsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete visitor {id}?"), global.yes)? {
                return Ok(());
            }
            directory.delete_visitor(&id).await?;
            if !global.quiet {
                eprintln!("visitor deleted");
            }
            Ok(())
        }

        VisitorsCommand::SetPin { id, pin } => {
            if directory.set_visitor_pin(&id, &pin).await? {
                if !global.quiet {
                    eprintln!("PIN assigned");
                }
                Ok(())
            } else {
                Err(CliError::ApiError {
                    message: "controller did not acknowledge the PIN assignment".into(),
                    status: None,
                })
            }
        }

        VisitorsCommand::AddCard {
            id,
            card_number,
            facility_code,
        } => {
            let card = directory
                .add_visitor_nfc_card(&id, &card_number, facility_code.as_deref())
                .await?;
            if !global.quiet {
                eprintln!("card {} enrolled ({})", card.card_number, card.id);
            }
            Ok(())
        }
    }
}
