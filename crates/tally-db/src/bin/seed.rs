//! # Seed Data Generator
//!
//! Populates the database with demo shops and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./tally_dev.db
//! cargo run -p tally-db --bin seed
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- --db ./data/tally.db
//! ```
//!
//! ## Generated Data
//! - A handful of shops with phone numbers and addresses
//! - Products across a few categories, each in several pack sizes,
//!   with a cost at 60-80% of the selling price

use std::env;
use tally_core::{Money, NewProduct, NewShop};
use tally_db::{Database, DbConfig};

/// Demo shops: (name, phone, address)
const SHOPS: &[(&str, &str, &str)] = &[
    ("Lanka Stores", "011-2345678", "12 Galle Road, Colombo 03"),
    ("Green Leaf Grocers", "081-2233445", "45 Peradeniya Road, Kandy"),
    ("Sunrise Mini Mart", "091-2234567", "7 Matara Road, Galle"),
    ("City Traders", "", "101 Main Street, Negombo"),
    ("Hill Top Retail", "052-2223344", ""),
];

/// Product families with a base price in cents
const PRODUCTS: &[(&str, i64)] = &[
    ("Ceylon Tea", 45000),
    ("Basmati Rice", 32000),
    ("Coconut Oil", 68000),
    ("Red Lentils", 29000),
    ("Milk Powder", 115000),
    ("Sugar", 26000),
    ("Wheat Flour", 21000),
    ("Biscuits", 18000),
    ("Soap Bar", 12000),
    ("Detergent", 54000),
];

/// Pack sizes with a price multiplier in percent
const SIZES: &[(&str, i64)] = &[("250g", 100), ("500g", 190), ("1kg", 360)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./tally_dev.db");

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
                println!("Tally POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./tally_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Tally POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.shops().count().await? + db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has shops or products");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (name, phone, address) in SHOPS {
        let shop = NewShop {
            name: name.to_string(),
            phone: non_empty(phone),
            address: non_empty(address),
        };
        db.shops().create(&shop).await?;
    }
    println!("✓ Created {} shops", SHOPS.len());

    let mut generated = 0;
    for (seed, (name, base_cents)) in PRODUCTS.iter().enumerate() {
        for (size, multiplier) in SIZES {
            let product = generate_product(name, size, base_cents * multiplier / 100, seed);

            if let Err(e) = db.products().create(&product).await {
                eprintln!("Failed to insert {}: {}", product.name, e);
                continue;
            }
            generated += 1;
        }
    }
    println!("✓ Created {} products", generated);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a product with a cost at 60-80% of its price.
fn generate_product(name: &str, size: &str, price_cents: i64, seed: usize) -> NewProduct {
    let cost_pct = 60 + ((seed * 7) % 21) as i64;

    NewProduct {
        name: format!("{} {}", name, size),
        cost_price: Money::from_cents(price_cents * cost_pct / 100),
        selling_price: Money::from_cents(price_cents),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
