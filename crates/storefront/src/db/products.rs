//! Catalog repository: products, variants, categories and offers.

use sqlx::PgPool;

use gambo_core::{ProductId, VariantId};

use super::RepositoryError;
use crate::models::catalog::{Category, Offer, Product, ProductVariant};

const PRODUCT_COLUMNS: &str = "id, name, description, original_price, selling_price, \
     category_id, is_active, brand, stock, top_featured, created_at";

/// Pagination window for product listings.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub number: i64,
    pub per_page: i64,
}

impl Page {
    /// Clamp untrusted query input into a sane window.
    #[must_use]
    pub fn clamped(number: i64, per_page: i64) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    const fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }
}

/// Repository for read-mostly catalog data.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, newest first, optionally filtered by
    /// category slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(
        &self,
        page: Page,
        category_slug: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as(&format!(
            "SELECT p.{}
             FROM products p
             JOIN categories c ON c.id = p.category_id
             WHERE p.is_active
               AND ($1::text IS NULL OR c.slug = $1)
             ORDER BY p.created_at DESC
             LIMIT $2 OFFSET $3",
            PRODUCT_COLUMNS.replace(", ", ", p.")
        ))
        .bind(category_slug)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get an active product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Variants of a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variants_of(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductVariant>, RepositoryError> {
        let variants = sqlx::query_as(
            "SELECT id, product_id, name, price, stock
             FROM product_variants
             WHERE product_id = $1
             ORDER BY id",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(variants)
    }

    /// Get a variant that belongs to the given product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_variant(
        &self,
        product_id: ProductId,
        variant_id: VariantId,
    ) -> Result<Option<ProductVariant>, RepositoryError> {
        let variant = sqlx::query_as(
            "SELECT id, product_id, name, price, stock
             FROM product_variants
             WHERE id = $1 AND product_id = $2",
        )
        .bind(variant_id)
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(variant)
    }

    /// Active categories, alphabetical.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as(
            "SELECT id, name, slug, status
             FROM categories
             WHERE status = 'active'
             ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Offers that are active and inside their start/end window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_available_offers(&self) -> Result<Vec<Offer>, RepositoryError> {
        let offers = sqlx::query_as(
            "SELECT id, title, description, offer_type, discount_value,
                    buy_quantity, get_quantity, starts_at, ends_at,
                    is_active, min_purchase_amount, usage_limit
             FROM offers
             WHERE is_active AND starts_at <= NOW() AND ends_at >= NOW()
             ORDER BY starts_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_clamping() {
        let page = Page::clamped(0, 0);
        assert_eq!(page.number, 1);
        assert_eq!(page.per_page, 1);

        let page = Page::clamped(3, 500);
        assert_eq!(page.number, 3);
        assert_eq!(page.per_page, 100);
        assert_eq!(page.offset(), 200);
    }
}
