//! Demo data seeding command.
//!
//! Inserts a small catalog (categories, products, variants) for local
//! development. Idempotent: re-running skips rows that already exist.

use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{CommandError, database_url};

struct DemoProduct {
    name: &'static str,
    category_slug: &'static str,
    description: &'static str,
    brand: Option<&'static str>,
    original_price: &'static str,
    selling_price: &'static str,
    stock: i32,
    top_featured: bool,
    /// (name, price, stock) per variant.
    variants: &'static [(&'static str, &'static str, i32)],
}

const DEMO_CATEGORIES: &[(&str, &str)] = &[
    ("Electronics", "electronics"),
    ("Clothing", "clothing"),
    ("Home & Kitchen", "home-kitchen"),
];

const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        name: "Wireless Earbuds",
        category_slug: "electronics",
        description: "Bluetooth 5.3 earbuds with charging case.",
        brand: Some("Soundline"),
        original_price: "2999.00",
        selling_price: "2499.00",
        stock: 40,
        top_featured: true,
        variants: &[],
    },
    DemoProduct {
        name: "Smart Watch",
        category_slug: "electronics",
        description: "Fitness tracking watch with heart-rate monitor.",
        brand: Some("Pulsar"),
        original_price: "3950.00",
        selling_price: "3950.00",
        stock: 25,
        top_featured: false,
        variants: &[("Black", "3950.00", 15), ("Silver", "4150.00", 10)],
    },
    DemoProduct {
        name: "Cotton T-Shirt",
        category_slug: "clothing",
        description: "Plain crew-neck t-shirt, 100% cotton.",
        brand: None,
        original_price: "550.00",
        selling_price: "450.00",
        stock: 120,
        top_featured: true,
        variants: &[
            ("S", "450.00", 30),
            ("M", "450.00", 40),
            ("L", "450.00", 30),
            ("XL", "480.00", 20),
        ],
    },
    DemoProduct {
        name: "Denim Jacket",
        category_slug: "clothing",
        description: "Classic fit denim jacket.",
        brand: None,
        original_price: "1850.00",
        selling_price: "1850.00",
        stock: 35,
        top_featured: false,
        variants: &[("M", "1850.00", 15), ("L", "1850.00", 12), ("XL", "1900.00", 8)],
    },
    DemoProduct {
        name: "Non-stick Frying Pan",
        category_slug: "home-kitchen",
        description: "28cm non-stick frying pan, induction compatible.",
        brand: Some("Kitchenio"),
        original_price: "1400.00",
        selling_price: "1200.00",
        stock: 50,
        top_featured: false,
        variants: &[],
    },
    DemoProduct {
        name: "Ceramic Dinner Set",
        category_slug: "home-kitchen",
        description: "16-piece ceramic dinner set for four.",
        brand: None,
        original_price: "3200.00",
        selling_price: "3200.00",
        stock: 18,
        top_featured: true,
        variants: &[],
    },
];

/// Seed the database with demo catalog data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
#[allow(clippy::print_stdout)]
pub async fn run() -> Result<(), CommandError> {
    let url = database_url()?;
    let pool = PgPoolOptions::new().max_connections(2).connect(&url).await?;

    seed_categories(&pool).await?;
    seed_products(&pool).await?;

    tracing::info!("Seeding complete");
    println!("Seeding complete");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), CommandError> {
    for (name, slug) in DEMO_CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (name, slug, status) VALUES ($1, $2, 'active')
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?;
    }

    tracing::info!("Seeded {} categories", DEMO_CATEGORIES.len());
    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), CommandError> {
    for product in DEMO_PRODUCTS {
        let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM products WHERE name = $1")
            .bind(product.name)
            .fetch_optional(pool)
            .await?;

        if existing.is_some() {
            continue;
        }

        let original_price = parse_price(product.original_price, product.name)?;
        let selling_price = parse_price(product.selling_price, product.name)?;

        let product_id: i32 = sqlx::query_scalar(
            "INSERT INTO products
                 (name, description, original_price, selling_price, category_id,
                  is_active, brand, stock, top_featured)
             SELECT $2, $3, $4, $5, c.id, TRUE, $6, $7, $8
             FROM categories c WHERE c.slug = $1
             RETURNING id",
        )
        .bind(product.category_slug)
        .bind(product.name)
        .bind(product.description)
        .bind(original_price)
        .bind(selling_price)
        .bind(product.brand)
        .bind(product.stock)
        .bind(product.top_featured)
        .fetch_one(pool)
        .await?;

        for (variant_name, price, stock) in product.variants {
            sqlx::query(
                "INSERT INTO product_variants (product_id, name, price, stock)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(product_id)
            .bind(variant_name)
            .bind(parse_price(price, product.name)?)
            .bind(stock)
            .execute(pool)
            .await?;
        }

        tracing::info!("Seeded product {}", product.name);
    }

    Ok(())
}

fn parse_price(value: &str, product: &str) -> Result<Decimal, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::InvalidInput(format!("bad price for {product}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_prices_parse() {
        for p in DEMO_PRODUCTS {
            assert!(parse_price(p.original_price, p.name).is_ok());
            assert!(parse_price(p.selling_price, p.name).is_ok());
            for (_, price, _) in p.variants {
                assert!(parse_price(price, p.name).is_ok());
            }
        }
    }

    #[test]
    fn test_demo_category_slugs_resolve() {
        for p in DEMO_PRODUCTS {
            assert!(
                DEMO_CATEGORIES.iter().any(|(_, slug)| *slug == p.category_slug),
                "product {} references unknown category {}",
                p.name,
                p.category_slug
            );
        }
    }
}
