use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use eventplan_core::event::FULL_DATE_FORMAT;
use eventplan_core::validation::require;
use eventplan_core::{Event, EventKind, EventPatch};
use owo_colors::OwoColorize;

use super::{Store, ensure_found, find_event};
use crate::render::{Render, render_event_detail};

#[derive(Subcommand)]
pub enum EventCommand {
    /// List all events
    List {
        /// Print the stored JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Show an event with its guests, items and costs
    Show {
        id: String,

        /// Print the stored JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Create a new event
    Add {
        title: String,

        /// "festa" (party) or "colaborativo" (costs shared among confirmed guests)
        #[arg(short, long, default_value = "festa")]
        kind: EventKind,

        /// Date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(short, long)]
        date: String,

        /// Start time (HH:MM)
        #[arg(short, long)]
        time: String,

        #[arg(short, long)]
        location: String,

        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change an event's details
    Update {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        kind: Option<EventKind>,

        /// Date (YYYY-MM-DD or DD/MM/YYYY)
        #[arg(short, long)]
        date: Option<String>,

        /// Start time (HH:MM)
        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Delete an event
    Remove { id: String },
}

pub fn run(store: &mut Store, command: EventCommand) -> Result<()> {
    match command {
        EventCommand::List { json } => list(store, json),
        EventCommand::Show { id, json } => {
            let event = find_event(store, &id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(event)?);
            } else {
                println!("{}", render_event_detail(event));
            }
            Ok(())
        }
        EventCommand::Add {
            title,
            kind,
            date,
            time,
            location,
            description,
        } => add(store, title, kind, date, time, location, description),
        EventCommand::Update {
            id,
            title,
            kind,
            date,
            time,
            location,
            description,
        } => {
            let mut patch = EventPatch {
                title: title.map(|t| require("Title", &t)).transpose()?,
                kind,
                time: time.map(|t| parse_time(&t)).transpose()?,
                location: location.map(|l| require("Location", &l)).transpose()?,
                description,
                ..Default::default()
            };
            if let Some(date) = date {
                let (display, full) = parse_date(&date)?;
                patch.date = Some(display);
                patch.full_date = Some(full);
            }

            if patch.is_empty() {
                anyhow::bail!("Nothing to update. Pass at least one of --title, --kind, --date, --time, --location, --description");
            }

            ensure_found(store.update_event(&id, patch)?, "Event", &id)?;
            println!("Updated event {}", id.dimmed());
            Ok(())
        }
        EventCommand::Remove { id } => {
            let title = find_event(store, &id)?.title.clone();
            ensure_found(store.remove_event(&id)?, "Event", &id)?;
            println!("Removed event {}", title.bold());
            Ok(())
        }
    }
}

fn list(store: &Store, json: bool) -> Result<()> {
    let events = store.store().events();

    if json {
        println!("{}", serde_json::to_string_pretty(events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("{}", "No events yet. Create one with `eventplan event add`.".dimmed());
        return Ok(());
    }

    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| e.parsed_date());

    for event in sorted {
        println!("{}", event.render());
    }
    Ok(())
}

fn add(
    store: &mut Store,
    title: String,
    kind: EventKind,
    date: String,
    time: String,
    location: String,
    description: String,
) -> Result<()> {
    let (display, full) = parse_date(&date)?;

    let mut event = Event::new(&require("Title", &title)?, kind);
    event.date = display;
    event.full_date = Some(full);
    event.time = parse_time(&time)?;
    event.location = require("Location", &location)?;
    event.description = description.trim().to_string();

    let id = event.id.clone();
    let title = event.title.clone();
    store.add_event(event)?;

    println!("Created {} {}", title.bold(), id.dimmed());
    Ok(())
}

/// Returns the display date and the `dd/mm/yyyy` form.
fn parse_date(input: &str) -> Result<(String, String)> {
    let input = input.trim();
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, FULL_DATE_FORMAT))
        .with_context(|| format!("Invalid date '{input}'. Expected YYYY-MM-DD or DD/MM/YYYY"))?;

    Ok((
        date.format("%A, %d %B %Y").to_string(),
        date.format(FULL_DATE_FORMAT).to_string(),
    ))
}

fn parse_time(input: &str) -> Result<String> {
    let time = NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .with_context(|| format!("Invalid time '{input}'. Expected HH:MM"))?;
    Ok(time.format("%H:%M").to_string())
}
