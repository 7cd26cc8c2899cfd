//! # Sample Menu
//!
//! The built-in menu used when no catalog file is configured. Product ids
//! "1".."6" are stable so demo scripts and tests can refer to them.

use tableside_core::{Catalog, CoreResult, Money, Product, ProductOption};

/// (id, name, price in cents, category, description)
const PRODUCTS: &[(&str, &str, i64, &str, &str)] = &[
    ("1", "Burger Deluxe", 1299, "Main Course", "Beef burger with cheese, lettuce, tomato"),
    ("2", "Caesar Salad", 899, "Salads", "Fresh romaine with caesar dressing"),
    ("3", "Margherita Pizza", 1499, "Pizza", "Classic tomato, mozzarella, basil"),
    ("4", "Coca Cola", 299, "Beverages", "330ml can"),
    ("5", "Grilled Chicken", 1699, "Main Course", "Grilled chicken breast with vegetables"),
    ("6", "French Fries", 499, "Sides", "Crispy golden fries"),
];

/// (product id, option id, option name, modifier in cents)
const OPTIONS: &[(&str, &str, &str, i64)] = &[
    ("1", "extra-cheese", "Extra Cheese", 150),
    ("1", "bacon", "Bacon", 200),
    ("1", "no-onions", "No Onions", 0),
    ("2", "add-chicken", "Add Chicken", 400),
    ("3", "extra-mozzarella", "Extra Mozzarella", 200),
    ("3", "gluten-free", "Gluten-free Base", 300),
    ("4", "large", "Large", 100),
    ("5", "half-portion", "Half Portion", -400),
    ("6", "cheese-sauce", "Cheese Sauce", 125),
];

/// The sample products in menu order.
pub fn sample_products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|&(id, name, cents, category, description)| Product {
            id: id.to_string(),
            name: name.to_string(),
            base_price: Money::from_cents(cents),
            category: category.to_string(),
            description: Some(description.to_string()),
            options: OPTIONS
                .iter()
                .filter(|(product_id, ..)| *product_id == id)
                .map(|&(_, option_id, option_name, modifier)| ProductOption {
                    id: option_id.to_string(),
                    name: option_name.to_string(),
                    price_modifier: Money::from_cents(modifier),
                })
                .collect(),
        })
        .collect()
}

pub fn sample_catalog() -> CoreResult<Catalog> {
    Catalog::new(sample_products())
}
