// src/storefront.rs
use std::collections::BTreeSet;

use crate::api::ShopApi;
use crate::errors::ClientError;
use crate::models::Product;
use crate::transport::Transport;

pub const HOME_SECTION_LIMIT: u32 = 5;

#[derive(Debug, Clone, Default)]
pub struct HomeFeed {
    pub newest: Vec<Product>,
    pub best_sellers: Vec<Product>,
    pub total_count: usize,
}

impl HomeFeed {
    /// Produkt pokazywany w sekcji hero (pierwszy bestseller).
    pub fn featured(&self) -> Option<&Product> {
        self.best_sellers.first()
    }
}

/// Pobiera trzy sekcje strony głównej jednocześnie.
pub async fn load_home_feed<T: Transport>(
    api: &ShopApi<T>,
    limit: u32,
) -> Result<HomeFeed, ClientError> {
    let (newest, best_sellers, all) = futures::try_join!(
        api.newest_products(limit),
        api.most_sold_products(limit),
        api.list_products()
    )?;
    tracing::info!(
        "Strona główna: {} nowości, {} bestsellerów, {} produktów łącznie",
        newest.len(),
        best_sellers.len(),
        all.len()
    );
    Ok(HomeFeed {
        newest,
        best_sellers,
        total_count: all.len(),
    })
}

/// Ulubione produkty trzymane tylko po stronie klienta.
#[derive(Debug, Clone, Default)]
pub struct Favorites {
    ids: BTreeSet<i64>,
}

impl Favorites {
    /// Zwraca `true`, jeśli produkt jest teraz ulubiony.
    pub fn toggle(&mut self, product_id: i64) -> bool {
        if self.ids.remove(&product_id) {
            false
        } else {
            self.ids.insert(product_id);
            true
        }
    }

    pub fn contains(&self, product_id: i64) -> bool {
        self.ids.contains(&product_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
