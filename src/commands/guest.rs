use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use eventplan_core::GuestStatus;
use eventplan_core::validation::{parse_bulk_guests, validate_guest};
use owo_colors::OwoColorize;

use super::{Store, ensure_found, find_event, not_found};
use crate::render::Render;

#[derive(Subcommand)]
pub enum GuestCommand {
    /// List an event's guests
    List { event: String },
    /// Invite one guest
    Add {
        event: String,

        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        /// Phone with area code, e.g. "(11) 98765-4321"
        #[arg(short, long)]
        phone: String,
    },
    /// Invite guests from a file with one "Name, Email, Phone" per line ("-" for stdin)
    Import { event: String, file: PathBuf },
    /// Record a guest's RSVP
    Status {
        event: String,
        guest: String,
        /// pending, confirmed or declined
        status: GuestStatus,
    },
    /// Remove a guest from an event
    Remove { event: String, guest: String },
}

pub fn run(store: &mut Store, command: GuestCommand) -> Result<()> {
    match command {
        GuestCommand::List { event } => {
            let event = find_event(store, &event)?;
            println!(
                "{} of {} confirmed",
                event.confirmed_guests, event.total_guests
            );
            for guest in &event.guests {
                println!("   {}", guest.render());
            }
            Ok(())
        }
        GuestCommand::Add {
            event,
            name,
            email,
            phone,
        } => {
            let guest = validate_guest(&name, &email, &phone)?;
            let rendered = guest.render();

            ensure_found(store.add_guests(&event, vec![guest])?, "Event", &event)?;
            println!("Invited {}", rendered);
            Ok(())
        }
        GuestCommand::Import { event, file } => {
            let text = read_input(&file)?;
            let guests = parse_bulk_guests(&text)?;
            let count = guests.len();

            ensure_found(store.add_guests(&event, guests)?, "Event", &event)?;
            println!("Invited {} {}", count, if count == 1 { "guest" } else { "guests" });
            Ok(())
        }
        GuestCommand::Status {
            event,
            guest,
            status,
        } => {
            let current = find_event(store, &event)?
                .guest(&guest)
                .ok_or_else(|| not_found("Guest", &guest))?
                .clone();
            let updated = current.with_status(status);
            let rendered = updated.render();

            ensure_found(store.update_guest(&event, &guest, updated)?, "Guest", &guest)?;
            println!("{}", rendered);
            Ok(())
        }
        GuestCommand::Remove { event, guest } => {
            let name = find_event(store, &event)?
                .guest(&guest)
                .ok_or_else(|| not_found("Guest", &guest))?
                .name
                .clone();

            ensure_found(store.remove_guest(&event, &guest)?, "Guest", &guest)?;
            println!("Removed {}", name.bold());
            Ok(())
        }
    }
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read guests from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}
