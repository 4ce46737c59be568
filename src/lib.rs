// src/lib.rs

pub mod api; // klient REST
pub mod config;
pub mod dashboard;
pub mod editor; // edytor produktu w panelu
pub mod errors;
pub mod forms;
pub mod images;
pub mod models;
pub mod notifications;
pub mod pagination;
pub mod session;
pub mod stock;
pub mod storefront;
pub mod transport;

pub use api::ShopApi;
pub use config::ClientConfig;
pub use errors::ClientError;
pub use session::AuthContext;
