// Random item generation for seeding the database.
//
// `templates` builds the item_templates catalog from fixed vocabularies,
// `loot` builds ready-to-insert inventory items with weighted rarity.

pub mod loot;
pub mod templates;

use rand::Rng;

/// Uniformly pick one entry of a non-empty constant table.
pub(crate) fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}
