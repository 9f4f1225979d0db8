// Seed the database with generated item templates or inventory loot.

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

use blipp_backend::config::DEFAULT_DATABASE_URL;
use blipp_backend::db::{Database, GroupColumn};
use blipp_backend::generator::loot::{generate_loot, DEFAULT_LOOT_COUNT};
use blipp_backend::generator::templates::{generate_templates, DEFAULT_TEMPLATE_COUNT};

#[derive(Parser)]
#[command(name = "seed-items", about = "Populate the Blipp game database")]
struct Cli {
    /// SQLite connection string.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL, global = true)]
    database_url: String,
    /// Fixed RNG seed for reproducible output.
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replace the whole item template catalog.
    Templates {
        #[arg(long, default_value_t = DEFAULT_TEMPLATE_COUNT)]
        count: usize,
    },
    /// Append random loot to the inventory.
    Inventory {
        #[arg(long, default_value_t = DEFAULT_LOOT_COUNT)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    blipp_backend::init_tracing();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("Using database at: {}", cli.database_url);
    let db = Database::new(&cli.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", cli.database_url))?;

    match cli.command {
        Command::Templates { count } => seed_templates(&db, &mut rng, count).await?,
        Command::Inventory { count } => seed_inventory(&db, &mut rng, count).await?,
    }

    db.close().await;
    Ok(())
}

async fn seed_templates(db: &Database, rng: &mut StdRng, count: usize) -> anyhow::Result<()> {
    let templates = generate_templates(rng, count);
    let inserted = db
        .replace_item_templates(&templates)
        .await
        .context("Failed to replace item templates")?;
    println!("Successfully added {inserted} item templates to the database.");

    let sample = db.list_item_templates(10, None).await?;
    println!("\nSample templates:");
    for t in sample {
        println!(
            "  ID: {}, Name: {}, Rarity: {}, Category: {}",
            t.id,
            t.name.unwrap_or_default(),
            t.rarity.unwrap_or_default(),
            t.category.unwrap_or_default()
        );
    }
    Ok(())
}

async fn seed_inventory(db: &Database, rng: &mut StdRng, count: usize) -> anyhow::Result<()> {
    let mut added = 0;
    for _ in 0..count {
        let item = generate_loot(rng);
        match db.add_inventory_item(&item).await {
            Ok(_) => added += 1,
            Err(e) => tracing::error!("Error adding item {:?}: {e}", item.name),
        }
    }
    println!("Successfully added {added} items to the database.");

    let stats = db.database_stats().await?;
    println!("\nInventory items in database: {}", stats.inventory_items);

    for (label, column) in [("Rarity", GroupColumn::Rarity), ("Category", GroupColumn::Category)] {
        let rows = db.inventory_distribution(column).await?;
        if !rows.is_empty() {
            println!("\n{label} distribution:");
            for (key, n) in rows {
                println!("  {key}: {n} items");
            }
        }
    }

    let sample = db.sample_inventory_items(5).await?;
    if !sample.is_empty() {
        println!("\nSample items:");
        for item in sample {
            println!(
                "  {} {} ({})",
                item.prefix.unwrap_or_default(),
                item.name.unwrap_or_default(),
                item.rarity.unwrap_or_default()
            );
        }
    }
    Ok(())
}
