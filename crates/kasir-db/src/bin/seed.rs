//! # Seed Data Generator
//!
//! Populates an empty database with a starter catalogue for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```

use std::env;

use kasir_core::validation::validate_new_item;
use kasir_core::{Money, NewItem};
use kasir_db::{Database, DbConfig};

/// Starter catalogue: (name, price, stock).
const CATALOGUE: &[(&str, i64, i64)] = &[
    ("Indomie Goreng", 3500, 100),
    ("Teh Botol Sosro", 5000, 50),
    ("Aqua 600ml", 4000, 200),
    ("Kopi Kapal Api Sachet", 1500, 150),
    ("Roti Tawar Sari Roti", 16000, 20),
    ("Susu Ultra Milk 250ml", 6500, 60),
    ("Chitato Sapi Panggang", 11000, 40),
    ("Gula Pasir 1kg", 17500, 25),
    ("Beras Pandan Wangi 5kg", 78000, 10),
    ("Minyak Goreng Bimoli 1L", 21000, 30),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = env::var("DB_CONN").unwrap_or_else(|_| String::from("./kasir.db"));

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $DB_CONN or ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} items", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Inserting items...");

    let mut inserted = 0;
    for (name, price, stock) in CATALOGUE {
        let item = NewItem {
            name: name.to_string(),
            price: *price,
            stock: *stock,
        };
        validate_new_item(&item)?;

        match db.items().insert(&item).await {
            Ok(created) => {
                println!(
                    "  #{:<3} {:<28} {:>8} x {}",
                    created.id,
                    created.name,
                    Money::new(created.price).to_string(),
                    created.stock
                );
                inserted += 1;
            }
            Err(e) => eprintln!("Failed to insert {}: {}", item.name, e),
        }
    }

    println!();
    println!("✓ Seed complete! {} items inserted", inserted);

    db.close().await;
    Ok(())
}
