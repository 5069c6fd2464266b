//! Event, guest and item types.
//!
//! An `Event` owns its guests and items by value. The JSON shape (camelCase
//! field names, `"Festa"`/`"Colaborativo"` kinds) is the one the persisted
//! store blob uses, so these types serialize straight into it.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Date format stored in `full_date` (day/month/year).
pub const FULL_DATE_FORMAT: &str = "%d/%m/%Y";

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A party: guests are invited, nobody shares costs.
    #[serde(rename = "Festa")]
    Party,
    /// Item costs are divided among confirmed guests.
    #[serde(rename = "Colaborativo")]
    Collaborative,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventKind::Party => write!(f, "Festa"),
            EventKind::Collaborative => write!(f, "Colaborativo"),
        }
    }
}

impl FromStr for EventKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "festa" | "party" => Ok(EventKind::Party),
            "colaborativo" | "collaborative" => Ok(EventKind::Collaborative),
            _ => Err(ValidationError::InvalidKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestStatus {
    Pending,
    Confirmed,
    Declined,
}

impl GuestStatus {
    pub fn is_confirmed(self) -> bool {
        self == GuestStatus::Confirmed
    }
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GuestStatus::Pending => write!(f, "pending"),
            GuestStatus::Confirmed => write!(f, "confirmed"),
            GuestStatus::Declined => write!(f, "declined"),
        }
    }
}

impl FromStr for GuestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(GuestStatus::Pending),
            "confirmed" => Ok(GuestStatus::Confirmed),
            "declined" => Ok(GuestStatus::Declined),
            _ => Err(ValidationError::InvalidStatus(s.to_string())),
        }
    }
}

/// Someone an item is assigned to. Either free text or a copy of a guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
}

impl Person {
    pub fn named(name: &str) -> Self {
        Person {
            id: new_id(),
            name: name.trim().to_string(),
        }
    }
}

impl From<&Guest> for Person {
    fn from(guest: &Guest) -> Self {
        Person {
            id: guest.id.clone(),
            name: guest.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub price: f64,
    /// `None` when nobody has been assigned yet.
    #[serde(default)]
    pub assigned_to: Option<Vec<Person>>,
    /// Opaque encoded image reference (e.g. a data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Item {
    pub fn new(name: &str, price: f64) -> Self {
        Item {
            id: new_id(),
            name: name.trim().to_string(),
            price,
            assigned_to: None,
            image: None,
        }
    }

    /// A copy of this item with its assignment set replaced.
    /// An empty set is stored as no assignment at all.
    pub fn with_assignees(&self, persons: Vec<Person>) -> Item {
        Item {
            assigned_to: if persons.is_empty() { None } else { Some(persons) },
            ..self.clone()
        }
    }

    pub fn assignees(&self) -> &[Person] {
        self.assigned_to.as_deref().unwrap_or(&[])
    }

    pub fn is_assigned(&self) -> bool {
        !self.assignees().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub status: GuestStatus,
}

impl Guest {
    /// A new invitee. Guests always start out pending.
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Guest {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            status: GuestStatus::Pending,
        }
    }

    pub fn with_status(&self, status: GuestStatus) -> Guest {
        Guest {
            status,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Human-readable date, e.g. "Sábado, 15 de Junho".
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    /// Parseable date (`dd/mm/yyyy`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_date: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub confirmed_guests: u32,
    #[serde(default)]
    pub total_guests: u32,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub guests: Vec<Guest>,
}

impl Event {
    pub fn new(title: &str, kind: EventKind) -> Self {
        Event {
            id: new_id(),
            title: title.trim().to_string(),
            kind,
            date: String::new(),
            time: String::new(),
            full_date: None,
            location: String::new(),
            description: String::new(),
            confirmed_guests: 0,
            total_guests: 0,
            items: Vec::new(),
            guests: Vec::new(),
        }
    }

    pub fn is_collaborative(&self) -> bool {
        self.kind == EventKind::Collaborative
    }

    pub fn counted_confirmed(&self) -> u32 {
        count_confirmed(&self.guests)
    }

    pub fn counted_total(&self) -> u32 {
        saturating_count(self.guests.len())
    }

    /// Whether the stored counters agree with the guest list.
    pub fn counters_consistent(&self) -> bool {
        self.confirmed_guests == self.counted_confirmed()
            && self.total_guests == self.counted_total()
    }

    /// Overwrite the counters with values recomputed from the guest list.
    pub fn recount(&mut self) {
        self.confirmed_guests = self.counted_confirmed();
        self.total_guests = self.counted_total();
    }

    pub fn guest(&self, guest_id: &str) -> Option<&Guest> {
        self.guests.iter().find(|g| g.id == guest_id)
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.full_date.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), FULL_DATE_FORMAT).ok()
    }

    fn apply(&mut self, patch: EventPatch) {
        let EventPatch {
            title,
            kind,
            date,
            time,
            full_date,
            location,
            description,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(kind) = kind {
            self.kind = kind;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(time) = time {
            self.time = time;
        }
        if let Some(full_date) = full_date {
            self.full_date = Some(full_date);
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(description) = description {
            self.description = description;
        }
    }

    /// A copy of this event with the patch merged in.
    pub fn merged(&self, patch: EventPatch) -> Event {
        let mut event = self.clone();
        event.apply(patch);
        event
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

pub(crate) fn count_confirmed(guests: &[Guest]) -> u32 {
    saturating_count(guests.iter().filter(|g| g.status.is_confirmed()).count())
}

/// Guest counters are `u32`; anything larger pins at `u32::MAX`.
pub(crate) fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Descriptive fields of an event that `update_event` may overwrite.
///
/// Counters, guests and items are absent on purpose: they only change
/// through the guest and item operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub kind: Option<EventKind>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub full_date: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_original_field_names() {
        let mut event = Event::new("Churrasco", EventKind::Collaborative);
        event.full_date = Some("15/06/2024".to_string());
        event.items.push(Item::new("Carvão", 25.0));

        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "Colaborativo");
        assert_eq!(json["fullDate"], "15/06/2024");
        assert_eq!(json["confirmedGuests"], 0);
        assert_eq!(json["totalGuests"], 0);
        assert!(json["items"][0]["assignedTo"].is_null());
    }

    #[test]
    fn deserializes_stored_event() {
        let json = r#"{
            "id": "2",
            "title": "Aniversário da Maria",
            "type": "Festa",
            "date": "Domingo, 23 de Junho",
            "time": "14:00",
            "fullDate": "23/06/2024",
            "location": "Salão de Festas Primavera",
            "description": "",
            "confirmedGuests": 1,
            "totalGuests": 2,
            "items": [
                {"id": "1", "name": "Carne", "price": 150, "assignedTo": [{"id": "p1", "name": "João"}], "image": null}
            ],
            "guests": [
                {"id": "1", "name": "João", "email": "joao@example.com", "phone": "(11) 98765-4321", "status": "confirmed"},
                {"id": "2", "name": "Ana", "email": "ana@example.com", "phone": "(11) 95555-4444", "status": "pending"}
            ]
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.kind, EventKind::Party);
        assert_eq!(event.items[0].price, 150.0);
        assert_eq!(event.items[0].assignees()[0].name, "João");
        assert_eq!(event.guests[1].status, GuestStatus::Pending);
        assert!(event.counters_consistent());
        assert_eq!(event.parsed_date(), NaiveDate::from_ymd_opt(2024, 6, 23));
    }

    #[test]
    fn guests_start_pending() {
        let guest = Guest::new("Ana", "ana@example.com", "(11) 95555-4444");
        assert_eq!(guest.status, GuestStatus::Pending);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("Confirmed".parse::<GuestStatus>(), Ok(GuestStatus::Confirmed));
        assert_eq!(" declined ".parse::<GuestStatus>(), Ok(GuestStatus::Declined));
        assert!("maybe".parse::<GuestStatus>().is_err());
    }

    #[test]
    fn kind_parses_both_spellings() {
        assert_eq!("Festa".parse::<EventKind>(), Ok(EventKind::Party));
        assert_eq!("collaborative".parse::<EventKind>(), Ok(EventKind::Collaborative));
        assert!("picnic".parse::<EventKind>().is_err());
    }

    #[test]
    fn empty_assignment_is_stored_as_none() {
        let item = Item::new("Bebidas", 120.0).with_assignees(vec![Person::named("Maria")]);
        assert!(item.is_assigned());

        let cleared = item.with_assignees(Vec::new());
        assert_eq!(cleared.assigned_to, None);
        assert_eq!(cleared.id, item.id);
    }

    #[test]
    fn person_from_guest_keeps_guest_id() {
        let guest = Guest::new("Pedro", "pedro@example.com", "11999999999");
        let person = Person::from(&guest);
        assert_eq!(person.id, guest.id);
        assert_eq!(person.name, "Pedro");
    }

    #[test]
    fn merge_only_touches_patched_fields() {
        let mut event = Event::new("Festa", EventKind::Party);
        event.location = "Rua das Flores, 123".to_string();

        let merged = event.merged(EventPatch {
            title: Some("Festa Junina".to_string()),
            ..Default::default()
        });

        assert_eq!(merged.title, "Festa Junina");
        assert_eq!(merged.location, "Rua das Flores, 123");
        assert_eq!(merged.id, event.id);
    }

    #[test]
    fn counts_saturate_at_u32_max() {
        assert_eq!(saturating_count(0), 0);
        assert_eq!(saturating_count(15), 15);
        assert_eq!(saturating_count(u32::MAX as usize), u32::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(saturating_count(u32::MAX as usize + 1), u32::MAX);
    }

    #[test]
    fn unparseable_full_date_is_none() {
        let mut event = Event::new("x", EventKind::Party);
        assert_eq!(event.parsed_date(), None);
        event.full_date = Some("2024-06-15".to_string());
        assert_eq!(event.parsed_date(), None);
    }
}
