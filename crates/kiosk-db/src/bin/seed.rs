//! # Seed Data Generator
//!
//! Populates the catalog with grocery products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 products (default)
//! cargo run -p kiosk-db --bin seed
//!
//! # Generate custom amount into a specific database
//! cargo run -p kiosk-db --bin seed -- --db ./data/kiosk.db --count 200
//! ```
//!
//! ## Generated Products
//! Products are spread across kirana-store categories. Each has:
//! - Name with pack size: `Toor Dal 500g`
//! - Price: ₹10.00 - ₹249.00 plus a size addon
//! - Stock: 5 - 104
//! - Category GST rate, or no override (owner default) for some

use anyhow::Context;
use kiosk_core::{Money, TaxRate};
use kiosk_db::{Database, DbConfig, NewProduct};
use std::env;

/// Product categories with their usual GST slab (basis points).
/// `None` leaves the product on the owner default rate.
const CATEGORIES: &[(&str, Option<u32>, &[&str])] = &[
    (
        "Staples",
        Some(500),
        &[
            "Basmati Rice",
            "Sona Masoori Rice",
            "Toor Dal",
            "Moong Dal",
            "Chana Dal",
            "Atta",
            "Besan",
            "Sugar",
            "Rock Salt",
            "Poha",
        ],
    ),
    (
        "Snacks",
        Some(1200),
        &[
            "Parle-G",
            "Good Day",
            "Bourbon",
            "Marie Gold",
            "Haldiram Bhujia",
            "Kurkure",
            "Lays Magic Masala",
            "Banana Chips",
            "Khakhra",
            "Namkeen Mix",
        ],
    ),
    (
        "Beverages",
        None,
        &[
            "Tata Tea",
            "Red Label",
            "Bru Coffee",
            "Bournvita",
            "Horlicks",
            "Frooti",
            "Maaza",
            "Thums Up",
            "Bisleri",
            "Rasna",
        ],
    ),
    (
        "Dairy",
        Some(0),
        &[
            "Amul Milk",
            "Amul Butter",
            "Paneer",
            "Curd",
            "Ghee",
            "Cheese Slices",
            "Lassi",
            "Buttermilk",
            "Khoa",
            "Cream",
        ],
    ),
    (
        "Personal Care",
        Some(1800),
        &[
            "Lifebuoy Soap",
            "Dettol Soap",
            "Colgate",
            "Pepsodent",
            "Clinic Plus",
            "Parachute Oil",
            "Vaseline",
            "Fair Lotion",
            "Shaving Cream",
            "Talc",
        ],
    ),
];

/// Pack sizes with the price addon they carry (paise).
const SIZES: &[(&str, i64)] = &[("100g", 0), ("500g", 4000), ("1kg", 9000)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./kiosk.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1]
                        .parse()
                        .with_context(|| format!("invalid --count value: {}", args[i + 1]))?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Smart Kiosk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file or sqlite:// URL (default: ./kiosk.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Smart Kiosk Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::from_url(&db_path))
        .await
        .context("failed to open database")?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    let catalog = CATEGORIES.iter().flat_map(|(category, rate, names)| {
        names.iter().flat_map(move |name| {
            SIZES
                .iter()
                .map(move |(size, addon)| (*category, *rate, *name, *size, *addon))
        })
    });

    for (seed, (category, rate, name, size, addon)) in catalog.take(count).enumerate() {
        let product = generate_product(category, rate, name, size, addon, seed);

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!("✓ Generated {} products in {:?}", generated, start.elapsed());

    println!();
    println!("Verifying search...");
    let results = db.products().list(Some("dal")).await?;
    println!("  Search 'dal': {} results", results.len());

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with deterministic pseudo-random data.
fn generate_product(
    category: &str,
    rate_bps: Option<u32>,
    name: &str,
    size: &str,
    price_addon: i64,
    seed: usize,
) -> NewProduct {
    // ₹10.00 - ₹249.00, whole rupees
    let base_price = 1000 + ((seed * 37) % 240) as i64 * 100;

    NewProduct {
        name: format!("{} {}", name, size),
        category: category.to_string(),
        price: Money::from_cents(base_price + price_addon),
        stock: 5 + (seed % 100) as i64,
        gst_rate: rate_bps.map(TaxRate::from_bps),
    }
}
