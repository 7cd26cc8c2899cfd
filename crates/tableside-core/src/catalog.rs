//! # Catalog
//!
//! The menu: products and the options they offer.
//!
//! The order core only reads from the catalog. Order lines copy the product
//! when they are created, so [`Catalog::upsert_product`] and
//! [`Catalog::remove_product`] never reach orders already placed.

use crate::error::{CoreError, CoreResult};
use crate::types::{Product, ProductOption};
use crate::validation::validate_product;

/// In-memory product list, in menu order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog, validating every product.
    pub fn new(products: Vec<Product>) -> CoreResult<Self> {
        let mut catalog = Catalog::default();
        for product in products {
            catalog.upsert_product(product)?;
        }
        Ok(catalog)
    }

    pub fn list_products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, product_id: &str) -> CoreResult<&Product> {
        self.products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Distinct categories in the order they first appear on the menu.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Inserts a new product or replaces the one with the same id in place.
    pub fn upsert_product(&mut self, product: Product) -> CoreResult<()> {
        validate_product(&product)?;
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
        Ok(())
    }

    /// Removes a product from the menu.
    pub fn remove_product(&mut self, product_id: &str) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        Ok(self.products.remove(index))
    }

    /// Maps selected option ids to the product's options, keeping the
    /// caller's order.
    pub fn resolve_options(
        product: &Product,
        option_ids: &[String],
    ) -> CoreResult<Vec<ProductOption>> {
        option_ids
            .iter()
            .map(|id| {
                product
                    .option(id)
                    .cloned()
                    .ok_or_else(|| CoreError::OptionNotOffered {
                        product_id: product.id.clone(),
                        option_id: id.clone(),
                    })
            })
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
