//! Cost totals and per-person splits for an event's items.

use crate::event::{Event, Person};

/// What one person owes for the items assigned to them.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonShare {
    pub person: Person,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostSummary {
    /// Sum of all item prices.
    pub total: f64,
    /// `total` divided among confirmed guests (0 when nobody confirmed).
    pub per_confirmed_guest: f64,
    /// Sum of prices of items nobody has been assigned to.
    pub unassigned_total: f64,
    /// Each assigned item's price divided evenly among its assignees,
    /// accumulated per person in first-seen order.
    pub shares: Vec<PersonShare>,
}

impl CostSummary {
    pub fn for_event(event: &Event) -> Self {
        let total: f64 = event.items.iter().map(|i| i.price).sum();

        let per_confirmed_guest = if event.confirmed_guests > 0 {
            total / f64::from(event.confirmed_guests)
        } else {
            0.0
        };

        let mut unassigned_total = 0.0;
        let mut shares: Vec<PersonShare> = Vec::new();

        for item in &event.items {
            let assignees = item.assignees();
            if assignees.is_empty() {
                unassigned_total += item.price;
                continue;
            }

            let split = item.price / assignees.len() as f64;
            for person in assignees {
                match shares.iter_mut().find(|s| s.person.id == person.id) {
                    Some(share) => share.amount += split,
                    None => shares.push(PersonShare {
                        person: person.clone(),
                        amount: split,
                    }),
                }
            }
        }

        CostSummary {
            total,
            per_confirmed_guest,
            unassigned_total,
            shares,
        }
    }
}

/// Percentage of invited guests who confirmed.
pub fn rsvp_progress(event: &Event) -> f64 {
    if event.total_guests == 0 {
        return 0.0;
    }
    f64::from(event.confirmed_guests) / f64::from(event.total_guests) * 100.0
}

/// `R$ 12.50`
pub fn format_brl(amount: f64) -> String {
    format!("R$ {:.2}", amount)
}
