use anyhow::Result;
use clap::Subcommand;
use eventplan_core::validation::{parse_price, require};
use eventplan_core::{Event, Item, Person};
use owo_colors::OwoColorize;

use super::{Store, ensure_found, find_event, not_found};
use crate::render::Render;

#[derive(Subcommand)]
pub enum ItemCommand {
    /// Add an item to an event
    Add {
        event: String,

        #[arg(short, long)]
        name: String,

        /// Price in R$, e.g. "25" or "12,50"
        #[arg(short, long)]
        price: String,

        /// Encoded image reference (e.g. a data URL)
        #[arg(long)]
        image: Option<String>,
    },
    /// Change an item's name, price or image
    Update {
        event: String,
        item: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        price: Option<String>,

        /// Replace the encoded image reference
        #[arg(long)]
        image: Option<String>,

        /// Drop the item's image
        #[arg(long, conflicts_with = "image")]
        clear_image: bool,
    },
    /// Replace who is responsible for an item (no people clears it)
    Assign {
        event: String,
        item: String,

        /// Guest id to assign (repeatable)
        #[arg(short, long = "guest")]
        guests: Vec<String>,

        /// Free-text name to assign (repeatable)
        #[arg(short, long = "person")]
        persons: Vec<String>,
    },
    /// Remove an item from an event
    Remove { event: String, item: String },
}

pub fn run(store: &mut Store, command: ItemCommand) -> Result<()> {
    match command {
        ItemCommand::Add {
            event,
            name,
            price,
            image,
        } => {
            let mut item = Item::new(&require("Name", &name)?, parse_price(&price)?);
            item.image = image;
            let rendered = item.render();

            ensure_found(store.add_item(&event, item)?, "Event", &event)?;
            println!("Added {}", rendered);
            Ok(())
        }
        ItemCommand::Update {
            event,
            item,
            name,
            price,
            image,
            clear_image,
        } => {
            let edit = ItemEdit {
                name,
                price,
                image,
                clear_image,
            };
            if edit.is_empty() {
                anyhow::bail!("Nothing to update. Pass --name, --price, --image or --clear-image");
            }

            let current = find_item(find_event(store, &event)?, &item)?;
            let updated = edit.apply(current)?;
            let rendered = updated.render();

            ensure_found(store.update_item(&event, &item, updated)?, "Item", &item)?;
            println!("Updated {}", rendered);
            Ok(())
        }
        ItemCommand::Assign {
            event,
            item,
            guests,
            persons,
        } => {
            let target = find_event(store, &event)?;
            let current = find_item(target, &item)?;
            let assignees = resolve_assignees(target, &guests, &persons)?;
            let updated = current.with_assignees(assignees);
            let rendered = updated.render();

            ensure_found(store.update_item(&event, &item, updated)?, "Item", &item)?;
            println!("{}", rendered);
            Ok(())
        }
        ItemCommand::Remove { event, item } => {
            let name = find_item(find_event(store, &event)?, &item)?.name.clone();

            ensure_found(store.remove_item(&event, &item)?, "Item", &item)?;
            println!("Removed {}", name.bold());
            Ok(())
        }
    }
}

/// Field changes for `item update`. Unset fields keep their current value.
#[derive(Debug, Default)]
struct ItemEdit {
    name: Option<String>,
    price: Option<String>,
    image: Option<String>,
    clear_image: bool,
}

impl ItemEdit {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.image.is_none() && !self.clear_image
    }

    fn apply(self, current: &Item) -> Result<Item> {
        let image = match (self.image, self.clear_image) {
            (_, true) => None,
            (Some(image), false) => Some(require("Image", &image)?),
            (None, false) => current.image.clone(),
        };

        Ok(Item {
            name: match self.name {
                Some(n) => require("Name", &n)?,
                None => current.name.clone(),
            },
            price: match self.price {
                Some(p) => parse_price(&p)?,
                None => current.price,
            },
            image,
            ..current.clone()
        })
    }
}

fn find_item<'a>(event: &'a Event, item_id: &str) -> Result<&'a Item> {
    event.item(item_id).ok_or_else(|| not_found("Item", item_id).into())
}

/// Guests keep their id; free-text names get a fresh one. A person listed
/// twice (same guest id or same name) is only assigned once.
fn resolve_assignees(event: &Event, guest_ids: &[String], names: &[String]) -> Result<Vec<Person>> {
    let mut persons: Vec<Person> = Vec::new();

    for id in guest_ids {
        let guest = event.guest(id).ok_or_else(|| not_found("Guest", id))?;
        if !persons.iter().any(|p| p.id == guest.id) {
            persons.push(Person::from(guest));
        }
    }

    for name in names {
        let name = require("Person name", name)?;
        if !persons.iter().any(|p| p.name == name) {
            persons.push(Person::named(&name));
        }
    }

    Ok(persons)
}
