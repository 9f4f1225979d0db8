// Item template generation: vocabulary, category inference, descriptions.

use rand::Rng;

use super::pick;
use crate::db::NewItemTemplate;

/// Number of templates a seeding run produces unless told otherwise.
pub const DEFAULT_TEMPLATE_COUNT: usize = 500;

pub const CATEGORIES: &[&str] = &[
    "sci-fi",
    "fantasy",
    "mechanical",
    "scientific",
    "ancient",
    "futuristic",
    "magical",
    "technological",
    "alien",
    "mystical",
];

pub const RARITY_LEVELS: &[&str] = &[
    "Common",
    "Uncommon",
    "Rare",
    "Epic",
    "Legendary",
    "Mythic",
    "Unique",
];

pub const ITEM_TYPES: &[&str] = &[
    // sci-fi
    "Quantum Processor", "Plasma Converter", "Neural Interface", "Holographic Projector",
    "Anti-Gravity Module", "Warp Drive Component", "Cloaking Device", "Energy Cell",
    "Nanite Cluster", "Tachyon Emitter", "Fusion Core", "Teleportation Matrix",
    "Singularity Containment", "Phase Shifter", "Temporal Stabilizer", "Photonic Crystal",
    "Subspace Beacon", "Graviton Lens", "Positronic Brain", "Antimatter Capsule",
    // fantasy
    "Dragon Scale", "Phoenix Feather", "Unicorn Horn", "Elven Rune", "Dwarven Gear",
    "Enchanted Gem", "Fairy Dust", "Wizard's Crystal", "Mermaid Pearl", "Goblin Trinket",
    "Troll Tooth", "Witch's Charm", "Spectral Essence", "Druidic Totem", "Celestial Fragment",
    "Arcane Sigil", "Fey Artifact", "Necromantic Relic", "Elemental Core", "Mystic Scroll",
    // mechanical
    "Precision Gear", "Hydraulic Piston", "Clockwork Mechanism", "Steam Valve", "Sprocket Wheel",
    "Pressure Gauge", "Flywheel Assembly", "Mechanical Lever", "Tension Spring", "Rotary Encoder",
    "Differential Gear", "Camshaft", "Crankshaft", "Ball Bearing", "Pulley System",
    "Solenoid Actuator", "Turbine Blade", "Piston Ring", "Mechanical Relay", "Harmonic Balancer",
    // scientific
    "Microscope Lens", "Chemical Catalyst", "Laboratory Flask", "Experimental Compound",
    "Research Sample", "Spectrum Analyzer", "Isotope Container", "Genetic Sequence",
    "Crystalline Structure", "Molecular Sieve", "Atomic Clock Component", "Laser Crystal",
    "Superconductor Coil", "Particle Filter", "Vacuum Tube", "Radiation Sensor",
    "Electromagnet Core", "Optical Prism", "Seismic Detector", "Barometric Cell",
    // ancient
    "Fossilized Amber", "Hieroglyphic Tablet", "Prehistoric Tool", "Antediluvian Coin",
    "Primordial Artifact", "Ancestral Medallion", "Forgotten Relic", "Tribal Mask",
    "Stone Age Implement", "Antique Mechanism", "Archaic Symbol", "Primitive Circuit",
    "Lost Technology", "Ancient Power Source", "Timeworn Device", "Prehistoric Data Storage",
    "Proto-Mechanical Part", "First Civilization Tool", "Forgotten Knowledge Crystal",
    "Ancestral Power Core",
    // alien
    "Xenomorph Tissue", "Extraterrestrial Alloy", "Non-Euclidean Object",
    "Alien Communication Device", "Otherworldly Crystal", "Interstellar Spore",
    "Unknown Element Sample", "Exobiological Specimen", "Alien Navigation Chart",
    "Xenotech Component", "Cosmic Entity Remnant", "Extradimensional Fragment",
    "Alien Power Source", "Stellar Cartography Tool", "Xenoarchaeological Artifact",
    "Alien Propulsion Part", "Extraterrestrial Data Core", "Unknown Symbiotic Organism",
    "Alien Terraforming Seed", "Interdimensional Beacon",
];

pub const ITEM_PREFIXES: &[&str] = &[
    // common
    "Ancient", "Rusty", "Glowing", "Mysterious", "Tiny", "Broken", "Golden", "Crystal", "Dark",
    "Alien",
    // sci-fi
    "Quantum", "Nano", "Cybernetic", "Holographic", "Plasma", "Ionic", "Gravitonic", "Temporal",
    "Subspace", "Photonic", "Positronic", "Antimatter", "Warp", "Fusion", "Tachyon",
    "Singularity", "Dimensional", "Hyperspace", "Synthetic", "Bionic",
    // fantasy
    "Enchanted", "Arcane", "Magical", "Cursed", "Blessed", "Ethereal", "Spectral", "Eldritch",
    "Fey", "Celestial", "Infernal", "Draconic", "Elemental", "Runic", "Mystic", "Divine",
    "Demonic", "Astral", "Primordial", "Necromantic",
    // mechanical
    "Precision", "Clockwork", "Steam-Powered", "Hydraulic", "Mechanical", "Automated", "Geared",
    "Articulated", "Reinforced", "Calibrated", "Pressurized", "Balanced", "Tensioned",
    "Motorized", "Pneumatic", "Gyroscopic", "Oscillating", "Reciprocating", "Machined",
    "Turbocharged",
    // scientific
    "Experimental", "Prototype", "Theoretical", "Unstable", "Catalytic", "Radioactive",
    "Cryogenic", "Molecular", "Chemical", "Crystalline", "Isotopic", "Electromagnetic",
    "Quantum-Entangled", "Superconductive", "Thermodynamic", "Biochemical", "Genetic",
    "Relativistic", "Particle", "Atomic",
    // condition
    "Pristine", "Damaged", "Corroded", "Weathered", "Polished", "Tarnished", "Cracked",
    "Restored", "Preserved", "Deteriorated",
    // origin
    "Forgotten", "Lost", "Recovered", "Unearthed", "Salvaged", "Discovered", "Inherited",
    "Stolen", "Forbidden", "Legendary", "Mythical", "Fabled", "Renowned", "Infamous", "Revered",
    "Sacred", "Profane", "Contraband", "Classified", "Restricted",
];

pub const DESCRIPTION_TEMPLATES: &[&str] = &[
    "A {prefix} {type} from an unknown civilization.",
    "This {prefix} {type} emits a strange energy signature.",
    "The {prefix} {type} has unusual markings on its surface.",
    "A remarkably well-preserved {prefix} {type}.",
    "This {prefix} {type} appears to be of {category} origin.",
    "The {prefix} {type} hums softly when held.",
    "A {prefix} {type} with intricate designs etched into it.",
    "This {prefix} {type} seems to defy conventional physics.",
    "The {prefix} {type} is warm to the touch despite its environment.",
    "A {prefix} {type} that occasionally flickers in and out of existence.",
    "This {prefix} {type} contains microscopic circuitry of unknown purpose.",
    "The {prefix} {type} appears to be made of an unidentifiable material.",
    "A {prefix} {type} that seems to be much lighter than it should be.",
    "This {prefix} {type} has symbols that rearrange themselves when not observed directly.",
    "The {prefix} {type} gives off a faint scent of ozone.",
    "A {prefix} {type} that appears to be partially phased into another dimension.",
    "This {prefix} {type} has components that move on their own.",
    "The {prefix} {type} contains a liquid that defies gravity.",
    "A {prefix} {type} covered in symbols from a lost language.",
    "This {prefix} {type} changes color depending on who is holding it.",
];

/// Keyword sets checked in order; the first set with a substring hit wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "sci-fi",
        &["quantum", "plasma", "neural", "holographic", "gravity", "warp", "energy", "tachyon", "fusion"],
    ),
    (
        "fantasy",
        &["dragon", "phoenix", "unicorn", "elven", "dwarven", "enchanted", "fairy", "wizard", "mermaid"],
    ),
    (
        "mechanical",
        &["gear", "piston", "clockwork", "valve", "wheel", "spring", "bearing", "shaft", "turbine"],
    ),
    (
        "scientific",
        &[
            "microscope", "chemical", "laboratory", "experimental", "research", "spectrum",
            "isotope", "genetic", "crystalline",
        ],
    ),
    (
        "ancient",
        &[
            "fossilized", "hieroglyphic", "prehistoric", "antediluvian", "primordial", "ancestral",
            "forgotten", "tribal", "stone", "antique",
        ],
    ),
    (
        "alien",
        &[
            "xenomorph", "extraterrestrial", "alien", "otherworldly", "interstellar", "cosmic",
            "stellar", "xenotech", "interdimensional",
        ],
    ),
];

/// Category implied by keywords in the type name, if any.
pub fn infer_category(item_type: &str) -> Option<&'static str> {
    let lower = item_type.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
}

/// Fill a description template. Prefix and type are lower-cased.
pub fn render_description(template: &str, prefix: &str, item_type: &str, category: &str) -> String {
    template
        .replace("{prefix}", &prefix.to_lowercase())
        .replace("{type}", &item_type.to_lowercase())
        .replace("{category}", category)
}

pub fn generate_template<R: Rng + ?Sized>(rng: &mut R) -> NewItemTemplate {
    let item_type = pick(rng, ITEM_TYPES);
    let prefix = pick(rng, ITEM_PREFIXES);
    let category = match infer_category(item_type) {
        Some(category) => category,
        None => pick(rng, CATEGORIES),
    };
    let rarity = pick(rng, RARITY_LEVELS);
    let description = render_description(pick(rng, DESCRIPTION_TEMPLATES), prefix, item_type, category);

    NewItemTemplate {
        name: format!("{prefix} {item_type}"),
        item_type: item_type.to_string(),
        prefix: prefix.to_string(),
        rarity: rarity.to_string(),
        description,
        category: category.to_string(),
    }
}

pub fn generate_templates<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<NewItemTemplate> {
    (0..count).map(|_| generate_template(rng)).collect()
}
