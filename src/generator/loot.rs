// Inventory loot generation with weighted rarity.

use lazy_static::lazy_static;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde_json::Value;

use super::pick;
use crate::db::NewInventoryItem;

/// Number of items a loot seeding run appends unless told otherwise.
pub const DEFAULT_LOOT_COUNT: usize = 50;

pub struct BaseItem {
    pub name: &'static str,
    pub symbol: &'static str,
    pub description: &'static str,
}

pub struct LootCategory {
    pub name: &'static str,
    pub items: &'static [BaseItem],
}

pub struct Rarity {
    pub name: &'static str,
    pub weight: u32,
    pub prefixes: &'static [&'static str],
    pub colors: &'static [&'static str],
}

const fn base(name: &'static str, symbol: &'static str, description: &'static str) -> BaseItem {
    BaseItem {
        name,
        symbol,
        description,
    }
}

pub const RARITIES: &[Rarity] = &[
    Rarity {
        name: "common",
        weight: 60,
        prefixes: &["Basic", "Simple", "Crude", "Plain", "Ordinary"],
        colors: &["#aaaaaa", "#cccccc", "#dddddd"],
    },
    Rarity {
        name: "uncommon",
        weight: 25,
        prefixes: &["Decent", "Solid", "Sturdy", "Refined", "Quality"],
        colors: &["#55cc55", "#77dd77", "#88ee88"],
    },
    Rarity {
        name: "rare",
        weight: 10,
        prefixes: &["Superior", "Exceptional", "Remarkable", "Excellent", "Valuable"],
        colors: &["#5555ff", "#7777ff", "#8888ff"],
    },
    Rarity {
        name: "epic",
        weight: 4,
        prefixes: &["Exquisite", "Magnificent", "Astounding", "Wondrous", "Mythical"],
        colors: &["#aa55cc", "#bb66dd", "#cc77ee"],
    },
    Rarity {
        name: "legendary",
        weight: 1,
        prefixes: &["Ancient", "Legendary", "Divine", "Celestial", "Transcendent"],
        colors: &["#ffaa00", "#ffbb33", "#ffcc55"],
    },
];

pub const LOOT_CATEGORIES: &[LootCategory] = &[
    LootCategory {
        name: "mineral",
        items: &[
            base("Iron Ore", "⛏", "A common metal ore"),
            base("Copper Ore", "⛏", "A conductive metal ore"),
            base("Gold Nugget", "⛏", "A precious metal"),
            base("Silver Chunk", "⛏", "A shiny metal"),
            base("Coal", "⛏", "A fossil fuel"),
            base("Uranium", "☢", "A radioactive element"),
        ],
    },
    LootCategory {
        name: "tech",
        items: &[
            base("Circuit Board", "⚙", "Electronic component"),
            base("Power Cell", "🔋", "Energy storage device"),
            base("Memory Chip", "⚙", "Data storage component"),
            base("Quantum Processor", "⚙", "Advanced computing unit"),
            base("Nano Fabricator", "⚙", "Microscopic manufacturing device"),
        ],
    },
    LootCategory {
        name: "artifact",
        items: &[
            base("Ancient Tablet", "📜", "Inscribed with unknown symbols"),
            base("Strange Device", "🔮", "Purpose unknown"),
            base("Alien Relic", "👽", "Not of this world"),
            base("Lost Technology", "⚙", "Advanced beyond current understanding"),
            base("Time Capsule", "⏱", "Contains items from another era"),
        ],
    },
    LootCategory {
        name: "fossil",
        items: &[
            base("Dinosaur Bone", "🦴", "Prehistoric remains"),
            base("Amber", "💎", "Fossilized tree resin"),
            base("Petrified Wood", "🌳", "Wood turned to stone"),
            base("Ancient Shell", "🐚", "Remains of prehistoric sea creature"),
            base("Trilobite", "🦂", "Ancient arthropod"),
        ],
    },
    LootCategory {
        name: "crystal",
        items: &[
            base("Quartz", "💎", "Common crystal"),
            base("Amethyst", "💎", "Purple variety of quartz"),
            base("Emerald", "💎", "Green gemstone"),
            base("Ruby", "💎", "Red gemstone"),
            base("Sapphire", "💎", "Blue gemstone"),
            base("Diamond", "💎", "Hardest natural substance"),
        ],
    },
    LootCategory {
        name: "tool",
        items: &[
            base("Wrench", "🔧", "Mechanical tool"),
            base("Hammer", "🔨", "Striking tool"),
            base("Screwdriver", "🔩", "Fastening tool"),
            base("Drill", "⚒", "Boring tool"),
            base("Saw", "⚒", "Cutting tool"),
        ],
    },
    LootCategory {
        name: "gem",
        items: &[
            base("Ruby", "💎", "Red precious stone"),
            base("Sapphire", "💎", "Blue precious stone"),
            base("Emerald", "💎", "Green precious stone"),
            base("Diamond", "💎", "Clear precious stone"),
            base("Topaz", "💎", "Yellow precious stone"),
        ],
    },
    LootCategory {
        name: "relic",
        items: &[
            base("Ancient Coin", "🪙", "Currency from a lost civilization"),
            base("Mysterious Key", "🔑", "Opens an unknown lock"),
            base("Sacred Amulet", "📿", "Holds unknown powers"),
            base("Forgotten Crown", "👑", "Once worn by royalty"),
            base("Ancient Scroll", "📜", "Contains lost knowledge"),
        ],
    },
];

lazy_static! {
    static ref RARITY_WEIGHTS: WeightedIndex<u32> =
        WeightedIndex::new(RARITIES.iter().map(|r| r.weight)).unwrap();
}

pub fn pick_rarity<R: Rng + ?Sized>(rng: &mut R) -> &'static Rarity {
    &RARITIES[RARITY_WEIGHTS.sample(rng)]
}

pub fn generate_loot<R: Rng + ?Sized>(rng: &mut R) -> NewInventoryItem {
    let category = &LOOT_CATEGORIES[rng.gen_range(0..LOOT_CATEGORIES.len())];
    let rarity = pick_rarity(rng);
    let template = &category.items[rng.gen_range(0..category.items.len())];

    NewInventoryItem {
        name: Some(Value::from(template.name)),
        item_type: Some(Value::from(category.name)),
        prefix: Some(Value::from(pick(rng, rarity.prefixes))),
        color: Some(Value::from(pick(rng, rarity.colors))),
        symbol: Some(Value::from(template.symbol)),
        rarity: Some(Value::from(rarity.name)),
        description: Some(Value::from(template.description)),
        category: Some(Value::from(category.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn rarity_by_name(name: &str) -> Option<&'static Rarity> {
        RARITIES.iter().find(|r| r.name == name)
    }

    fn text(value: &Option<Value>) -> &str {
        value.as_ref().and_then(Value::as_str).unwrap()
    }

    #[test]
    fn test_loot_uses_rarity_tables() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let item = generate_loot(&mut rng);
            let rarity = rarity_by_name(text(&item.rarity)).unwrap();
            assert!(rarity.prefixes.contains(&text(&item.prefix)));
            assert!(rarity.colors.contains(&text(&item.color)));
            assert_eq!(item.item_type, item.category);

            let category = LOOT_CATEGORIES
                .iter()
                .find(|c| c.name == text(&item.category))
                .unwrap();
            assert!(category.items.iter().any(|b| b.name == text(&item.name)));
        }
    }

    #[test]
    fn test_rarity_weighting() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(pick_rarity(&mut rng).name).or_insert(0) += 1;
        }
        let common = counts["common"];
        let uncommon = counts["uncommon"];
        let rare = counts.get("rare").copied().unwrap_or(0);
        // Expected roughly 6000 / 2500 / 1000.
        assert!(common > 5500 && common < 6500, "common = {common}");
        assert!(uncommon > 2100 && uncommon < 2900, "uncommon = {uncommon}");
        assert!(rare > 750 && rare < 1250, "rare = {rare}");
        assert!(common > uncommon && uncommon > rare);
    }

    #[test]
    fn test_rarity_lookup() {
        assert_eq!(rarity_by_name("epic").unwrap().weight, 4);
        assert!(rarity_by_name("mythic").is_none());
    }
}
