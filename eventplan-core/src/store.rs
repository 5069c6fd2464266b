//! In-memory event store.
//!
//! `EventStore` is the only thing that mutates events. It keeps
//! `confirmed_guests` and `total_guests` in step with the guest list on every
//! guest operation, so readers can trust the counters without recounting.
//!
//! Operations addressed to an id that does not exist change nothing and
//! return `false`. They never error; deciding whether that is worth
//! reporting is left to the caller.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::event::{Event, EventPatch, Guest, Item, count_confirmed, saturating_count};

/// Everything the store holds. This is also the persisted shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    state: StoreState,
}

impl EventStore {
    pub fn new() -> Self {
        EventStore::default()
    }

    pub fn from_state(state: StoreState) -> Self {
        EventStore { state }
    }

    pub fn events(&self) -> &[Event] {
        &self.state.events
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// An owned copy of the whole store, independent of later mutations.
    pub fn snapshot(&self) -> StoreState {
        self.state.clone()
    }

    pub fn len(&self) -> usize {
        self.state.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.events.is_empty()
    }

    /// Recompute counters for events whose counters disagree with their
    /// guest list. Returns how many events were repaired.
    pub fn reconcile_counters(&mut self) -> usize {
        let mut repaired = 0;
        for event in self.state.events.iter_mut().filter(|e| !e.counters_consistent()) {
            warn!(
                event = %event.id,
                confirmed = event.confirmed_guests,
                total = event.total_guests,
                "guest counters out of step with guest list, recounting"
            );
            event.recount();
            repaired += 1;
        }
        repaired
    }

    // EVENTS:

    /// Append an event. Ids are not checked for uniqueness; with duplicates,
    /// lookups see the most recently added one.
    pub fn add_event(&mut self, mut event: Event) {
        if !event.counters_consistent() {
            debug!(event = %event.id, "recounting guests of incoming event");
            event.recount();
        }
        debug!(event = %event.id, title = %event.title, "add event");
        self.state.events.push(event);
    }

    pub fn update_event(&mut self, id: &str, patch: EventPatch) -> bool {
        let applied = self.for_each_event(id, |event| {
            *event = event.merged(patch.clone());
            true
        });
        if applied {
            debug!(event = %id, "update event");
        }
        applied
    }

    pub fn remove_event(&mut self, id: &str) -> bool {
        let before = self.state.events.len();
        self.state.events.retain(|e| e.id != id);
        let applied = self.state.events.len() != before;
        if applied {
            debug!(event = %id, "remove event");
        }
        applied
    }

    pub fn get_event_by_id(&self, id: &str) -> Option<&Event> {
        self.state.events.iter().rfind(|e| e.id == id)
    }

    // ITEMS:

    pub fn add_item(&mut self, event_id: &str, item: Item) -> bool {
        let applied = self.for_each_event(event_id, |event| {
            event.items.push(item.clone());
            true
        });
        if applied {
            debug!(event = %event_id, item = %item.id, "add item");
        }
        applied
    }

    /// Replace an item wholesale, keeping its position in the list.
    pub fn update_item(&mut self, event_id: &str, item_id: &str, item: Item) -> bool {
        let applied = self.for_each_event(event_id, |event| {
            let mut found = false;
            for slot in event.items.iter_mut().filter(|i| i.id == item_id) {
                *slot = item.clone();
                found = true;
            }
            found
        });
        if applied {
            debug!(event = %event_id, item = %item_id, "update item");
        }
        applied
    }

    pub fn remove_item(&mut self, event_id: &str, item_id: &str) -> bool {
        let applied = self.for_each_event(event_id, |event| {
            let before = event.items.len();
            event.items.retain(|i| i.id != item_id);
            event.items.len() != before
        });
        if applied {
            debug!(event = %event_id, item = %item_id, "remove item");
        }
        applied
    }

    // GUESTS:

    /// Append a batch of guests. Input is not validated here.
    pub fn add_guests(&mut self, event_id: &str, guests: Vec<Guest>) -> bool {
        let added = saturating_count(guests.len());
        let confirmed = count_confirmed(&guests);

        let applied = self.for_each_event(event_id, |event| {
            event.guests.extend(guests.iter().cloned());
            event.total_guests = event.total_guests.saturating_add(added);
            event.confirmed_guests = event.confirmed_guests.saturating_add(confirmed);
            true
        });
        if applied {
            debug!(event = %event_id, added, "add guests");
        }
        applied
    }

    /// Replace a guest record. The confirmed counter moves by the difference
    /// between the old and new status.
    pub fn update_guest(&mut self, event_id: &str, guest_id: &str, guest: Guest) -> bool {
        let applied = self.for_each_event(event_id, |event| {
            let Some(pos) = event.guests.iter().position(|g| g.id == guest_id) else {
                return false;
            };

            let was = event.guests[pos].status.is_confirmed();
            let now = guest.status.is_confirmed();
            match (was, now) {
                (true, false) => event.confirmed_guests = event.confirmed_guests.saturating_sub(1),
                (false, true) => event.confirmed_guests += 1,
                _ => {}
            }

            event.guests[pos] = guest.clone();
            true
        });
        if applied {
            debug!(event = %event_id, guest = %guest_id, status = %guest.status, "update guest");
        }
        applied
    }

    pub fn remove_guest(&mut self, event_id: &str, guest_id: &str) -> bool {
        let applied = self.for_each_event(event_id, |event| {
            let Some(pos) = event.guests.iter().position(|g| g.id == guest_id) else {
                return false;
            };

            let removed = event.guests.remove(pos);
            event.total_guests = event.total_guests.saturating_sub(1);
            if removed.status.is_confirmed() {
                event.confirmed_guests = event.confirmed_guests.saturating_sub(1);
            }
            true
        });
        if applied {
            debug!(event = %event_id, guest = %guest_id, "remove guest");
        }
        applied
    }

    /// Run `f` on every event carrying `id`; true if any call reported a change.
    fn for_each_event<F>(&mut self, id: &str, mut f: F) -> bool
    where
        F: FnMut(&mut Event) -> bool,
    {
        let mut applied = false;
        for event in self.state.events.iter_mut().filter(|e| e.id == id) {
            applied |= f(event);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, GuestStatus, Person};

    fn guest(id: &str, status: GuestStatus) -> Guest {
        Guest {
            id: id.to_string(),
            name: format!("Guest {id}"),
            email: format!("{id}@example.com"),
            phone: "(11) 98765-4321".to_string(),
            status,
        }
    }

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            ..Event::new("Churrasco", EventKind::Collaborative)
        }
    }

    fn store_with_two_guests() -> EventStore {
        let mut store = EventStore::new();
        store.add_event(event("e1"));
        store.add_guests(
            "e1",
            vec![guest("g1", GuestStatus::Confirmed), guest("g2", GuestStatus::Pending)],
        );
        store
    }

    fn assert_counters(store: &EventStore, id: &str) {
        let event = store.get_event_by_id(id).unwrap();
        assert!(
            event.counters_consistent(),
            "confirmed={} total={} guests={:?}",
            event.confirmed_guests,
            event.total_guests,
            event.guests
        );
    }

    #[test]
    fn confirm_then_remove_guest() {
        let mut store = store_with_two_guests();
        let e = store.get_event_by_id("e1").unwrap();
        assert_eq!((e.total_guests, e.confirmed_guests), (2, 1));

        assert!(store.update_guest("e1", "g2", guest("g2", GuestStatus::Confirmed)));
        assert_eq!(store.get_event_by_id("e1").unwrap().confirmed_guests, 2);

        assert!(store.remove_guest("e1", "g2"));
        let e = store.get_event_by_id("e1").unwrap();
        assert_eq!((e.total_guests, e.confirmed_guests), (1, 1));
    }

    #[test]
    fn counters_hold_over_mixed_sequence() {
        let mut store = store_with_two_guests();

        store.add_guests(
            "e1",
            vec![guest("g3", GuestStatus::Declined), guest("g4", GuestStatus::Pending)],
        );
        assert_counters(&store, "e1");

        store.update_guest("e1", "g1", guest("g1", GuestStatus::Declined));
        assert_counters(&store, "e1");

        store.update_guest("e1", "g3", guest("g3", GuestStatus::Confirmed));
        store.update_guest("e1", "g4", guest("g4", GuestStatus::Confirmed));
        assert_counters(&store, "e1");

        store.update_guest("e1", "g4", guest("g4", GuestStatus::Confirmed));
        assert_counters(&store, "e1");

        store.remove_guest("e1", "g1");
        store.remove_guest("e1", "g3");
        assert_counters(&store, "e1");

        store.remove_guest("e1", "missing");
        assert_counters(&store, "e1");

        let e = store.get_event_by_id("e1").unwrap();
        assert_eq!((e.total_guests, e.confirmed_guests), (2, 1));
    }

    #[test]
    fn confirmed_guests_in_batch_are_counted() {
        let mut store = EventStore::new();
        store.add_event(event("e1"));
        store.add_guests("e1", vec![guest("g1", GuestStatus::Confirmed)]);
        assert_counters(&store, "e1");
        assert_eq!(store.get_event_by_id("e1").unwrap().confirmed_guests, 1);
    }

    #[test]
    fn add_event_recounts_inconsistent_counters() {
        let mut store = EventStore::new();
        let mut e = event("e1");
        e.guests.push(guest("g1", GuestStatus::Confirmed));
        e.total_guests = 15;
        e.confirmed_guests = 12;

        store.add_event(e);
        assert_counters(&store, "e1");
    }

    #[test]
    fn update_item_replaces_in_place() {
        let mut store = EventStore::new();
        store.add_event(event("e1"));

        let carne = Item::new("Carne", 150.0);
        let carvao = Item::new("Carvão", 25.0);
        let bebidas = Item::new("Bebidas", 120.0);
        for item in [&carne, &carvao, &bebidas] {
            assert!(store.add_item("e1", item.clone()));
        }

        let replacement = Item {
            price: 30.0,
            ..carvao.clone()
        };
        assert!(store.update_item("e1", &carvao.id, replacement));

        let items = &store.get_event_by_id("e1").unwrap().items;
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Carne", "Carvão", "Bebidas"]);
        assert_eq!(items[1].price, 30.0);
        assert_eq!(items[0].price, 150.0);
    }

    #[test]
    fn assignment_replaces_the_whole_set() {
        let mut store = EventStore::new();
        store.add_event(event("e1"));
        let item = Item::new("Bebidas", 120.0);
        store.add_item("e1", item.clone());

        let first = item.with_assignees(vec![Person::named("João"), Person::named("Maria")]);
        store.update_item("e1", &item.id, first);

        let second = item.with_assignees(vec![Person::named("Pedro")]);
        store.update_item("e1", &item.id, second);

        let stored = store.get_event_by_id("e1").unwrap().item(&item.id).unwrap();
        let names: Vec<_> = stored.assignees().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Pedro"]);
    }

    #[test]
    fn remove_item() {
        let mut store = EventStore::new();
        store.add_event(event("e1"));
        let item = Item::new("Carvão", 25.0);
        store.add_item("e1", item.clone());

        assert!(store.remove_item("e1", &item.id));
        assert!(!store.remove_item("e1", &item.id));
        assert!(store.get_event_by_id("e1").unwrap().items.is_empty());
    }

    #[test]
    fn missing_ids_are_noops() {
        let mut store = store_with_two_guests();
        let before = store.snapshot();

        assert!(store.get_event_by_id("nope").is_none());
        assert!(!store.update_event("nope", EventPatch::default()));
        assert!(!store.remove_event("nope"));
        assert!(!store.add_item("nope", Item::new("x", 1.0)));
        assert!(!store.update_item("e1", "nope", Item::new("x", 1.0)));
        assert!(!store.remove_item("e1", "nope"));
        assert!(!store.add_guests("nope", vec![guest("g9", GuestStatus::Pending)]));
        assert!(!store.update_guest("e1", "nope", guest("nope", GuestStatus::Confirmed)));
        assert!(!store.remove_guest("e1", "nope"));

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn update_and_remove_event() {
        let mut store = EventStore::new();
        store.add_event(event("e1"));
        store.add_event(event("e2"));

        let patch = EventPatch {
            location: Some("Salão de Festas".to_string()),
            ..Default::default()
        };
        assert!(store.update_event("e2", patch));
        assert_eq!(store.get_event_by_id("e2").unwrap().location, "Salão de Festas");
        assert_eq!(store.get_event_by_id("e1").unwrap().location, "");

        assert!(store.remove_event("e1"));
        assert_eq!(store.len(), 1);
        assert!(store.get_event_by_id("e1").is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_latest() {
        let mut store = EventStore::new();
        store.add_event(Event {
            title: "first".to_string(),
            ..event("dup")
        });
        store.add_event(Event {
            title: "second".to_string(),
            ..event("dup")
        });

        assert_eq!(store.len(), 2);
        assert_eq!(store.get_event_by_id("dup").unwrap().title, "second");
    }

    #[test]
    fn snapshot_is_independent() {
        let mut store = store_with_two_guests();
        let snapshot = store.snapshot();

        store.remove_guest("e1", "g1");

        assert_eq!(snapshot.events[0].guests.len(), 2);
        assert_eq!(store.events()[0].guests.len(), 1);
    }

    #[test]
    fn reconcile_repairs_only_broken_events() {
        let mut good = event("good");
        good.guests.push(guest("g1", GuestStatus::Confirmed));
        good.recount();
        let mut bad = event("bad");
        bad.guests.push(guest("g2", GuestStatus::Pending));
        bad.total_guests = 7;

        let mut store = EventStore::from_state(StoreState {
            events: vec![good, bad],
        });

        assert_eq!(store.reconcile_counters(), 1);
        assert_counters(&store, "bad");
        assert_eq!(store.reconcile_counters(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(Vec<GuestStatus>),
            /// `None` targets a guest id that is not in the list.
            Update(Option<usize>, GuestStatus),
            Remove(Option<usize>),
        }

        fn arb_status() -> impl Strategy<Value = GuestStatus> {
            prop_oneof![
                Just(GuestStatus::Pending),
                Just(GuestStatus::Confirmed),
                Just(GuestStatus::Declined),
            ]
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                proptest::collection::vec(arb_status(), 0..5).prop_map(Op::Add),
                (proptest::option::of(any::<usize>()), arb_status())
                    .prop_map(|(target, status)| Op::Update(target, status)),
                proptest::option::of(any::<usize>()).prop_map(Op::Remove),
            ]
        }

        fn target_id(store: &EventStore, target: Option<usize>) -> String {
            let guests = &store.get_event_by_id("e1").unwrap().guests;
            match target {
                Some(i) if !guests.is_empty() => guests[i % guests.len()].id.clone(),
                _ => "missing".to_string(),
            }
        }

        proptest! {
            #[test]
            fn counters_hold_for_any_sequence(ops in proptest::collection::vec(arb_op(), 0..40)) {
                let mut store = EventStore::new();
                store.add_event(event("e1"));
                let mut next = 0;

                for op in ops {
                    match op {
                        Op::Add(statuses) => {
                            let batch = statuses
                                .into_iter()
                                .map(|status| {
                                    next += 1;
                                    guest(&format!("g{next}"), status)
                                })
                                .collect();
                            store.add_guests("e1", batch);
                        }
                        Op::Update(target, status) => {
                            let id = target_id(&store, target);
                            store.update_guest("e1", &id, guest(&id, status));
                        }
                        Op::Remove(target) => {
                            let id = target_id(&store, target);
                            store.remove_guest("e1", &id);
                        }
                    }

                    let event = store.get_event_by_id("e1").unwrap();
                    prop_assert!(
                        event.counters_consistent(),
                        "confirmed={} total={} guests={:?}",
                        event.confirmed_guests,
                        event.total_guests,
                        event.guests
                    );
                }
            }
        }
    }
}
