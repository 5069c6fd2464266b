//! Terminal rendering for eventplan types.
//!
//! Extension traits that add colored output to eventplan-core types using
//! owo_colors.

use eventplan_core::cost::{CostSummary, format_brl, rsvp_progress};
use eventplan_core::{Event, EventKind, Guest, GuestStatus, Item};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for GuestStatus {
    fn render(&self) -> String {
        match self {
            GuestStatus::Confirmed => "✓ confirmed".green().to_string(),
            GuestStatus::Pending => "… pending".yellow().to_string(),
            GuestStatus::Declined => "✗ declined".red().to_string(),
        }
    }
}

impl Render for EventKind {
    fn render(&self) -> String {
        match self {
            EventKind::Party => "🎉 Festa".to_string(),
            EventKind::Collaborative => "🤝 Colaborativo".to_string(),
        }
    }
}

impl Render for Guest {
    fn render(&self) -> String {
        format!(
            "{} {}  {}  {}  {}",
            self.status.render(),
            self.name.bold(),
            self.email.dimmed(),
            self.phone.dimmed(),
            self.id.dimmed()
        )
    }
}

impl Render for Item {
    fn render(&self) -> String {
        let assigned = if self.is_assigned() {
            self.assignees()
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
                .cyan()
                .to_string()
        } else {
            "unassigned".dimmed().to_string()
        };

        format!(
            "{}  {}  {}  {}",
            self.name.bold(),
            format_brl(self.price),
            assigned,
            self.id.dimmed()
        )
    }
}

impl Render for Event {
    /// One-line summary used by `event list`.
    fn render(&self) -> String {
        let when = [self.full_date.as_deref().unwrap_or(""), self.time.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let mut line = format!(
            "{} {}  {}  {}/{} confirmed",
            self.kind.render(),
            self.title.bold(),
            when.dimmed(),
            self.confirmed_guests,
            self.total_guests
        );

        if self.is_collaborative() {
            let summary = CostSummary::for_event(self);
            line.push_str(&format!("  {}/person", format_brl(summary.per_confirmed_guest)));
        }

        line.push_str(&format!("  {}", self.id.dimmed()));
        line
    }
}

/// Full view of an event for `event show`.
pub fn render_event_detail(event: &Event) -> String {
    let mut lines = vec![format!("{} {}", event.kind.render(), event.title.bold())];

    if !event.date.is_empty() || !event.time.is_empty() {
        lines.push(format!("   📅 {} {}", event.date, event.time));
    }
    if !event.location.is_empty() {
        lines.push(format!("   📍 {}", event.location));
    }
    if !event.description.is_empty() {
        lines.push(format!("   {}", event.description.dimmed()));
    }
    lines.push(format!("   {}", event.id.dimmed()));

    lines.push(String::new());
    lines.push(format!(
        "   Guests: {} of {} confirmed ({:.0}%)",
        event.confirmed_guests,
        event.total_guests,
        rsvp_progress(event)
    ));
    if event.guests.is_empty() {
        lines.push(format!("      {}", "No guests yet".dimmed()));
    }
    for guest in &event.guests {
        lines.push(format!("      {}", guest.render()));
    }

    lines.push(String::new());
    lines.push("   Items:".to_string());
    if event.items.is_empty() {
        lines.push(format!("      {}", "No items yet".dimmed()));
    }
    for item in &event.items {
        lines.push(format!("      {}", item.render()));
    }

    if event.is_collaborative() {
        let summary = CostSummary::for_event(event);
        lines.push(String::new());
        lines.push(format!("   Total: {}", format_brl(summary.total).bold()));
        lines.push(format!(
            "   Per confirmed guest: {}",
            format_brl(summary.per_confirmed_guest)
        ));
        if summary.unassigned_total > 0.0 {
            lines.push(format!(
                "   Unassigned: {}",
                format_brl(summary.unassigned_total).yellow()
            ));
        }
        for share in &summary.shares {
            lines.push(format!("      {}: {}", share.person.name, format_brl(share.amount)));
        }
    }

    lines.join("\n")
}
