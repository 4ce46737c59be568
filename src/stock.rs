// src/stock.rs
use crate::models::Product;

/// Produkty, których stan magazynowy spadł do progu lub poniżej.
/// Najpierw najmniejszy stan, przy remisie alfabetycznie.
pub fn low_stock(products: &[Product], threshold: i64) -> Vec<&Product> {
    let mut low: Vec<&Product> = products.iter().filter(|p| p.stock <= threshold).collect();
    low.sort_by(|a, b| a.stock.cmp(&b.stock).then_with(|| a.name.cmp(&b.name)));
    low
}

pub fn is_out_of_stock(product: &Product) -> bool {
    product.stock <= 0
}
