// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub id: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, alias = "image_path")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub description: String,
    #[serde(deserialize_with = "flexible_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "flexible_i64")]
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Równoległa lista adresów, którą backend czasem dokleja obok `images`.
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, EnumString, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Admin,
    Customer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub user: Option<UserPublic>,
}

// --- PAYLOADY WYSYŁANE DO API ---

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub password_confirmation: String,
    pub newsletter: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAdminPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAdminPayload {
    pub name: String,
    pub email: String,
}

// --- STATYSTYKI DASHBOARDU ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardMetrics {
    pub total_admins: i64,
    pub total_products: i64,
    #[serde(deserialize_with = "flexible_f64")]
    pub total_sales: f64,
    pub todays_orders: i64,
    pub low_stock_products: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyVisits {
    pub date: NaiveDate,
    pub visits: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisitorAnalytics {
    pub days: u32,
    pub total_visits: i64,
    pub unique_visitors: i64,
    pub daily: Vec<DailyVisits>,
}

// Backend potrafi zwrócić liczby jako stringi (np. "9.99"), więc akceptujemy oba warianty.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(n) => Ok(n as f64),
        NumberOrString::Float(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid number: '{}'", s))),
    }
}

fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(n) => Ok(n),
        NumberOrString::Float(n) if n.fract() == 0.0 => Ok(n as i64),
        NumberOrString::Float(n) => Err(serde::de::Error::custom(format!(
            "expected integer, got {}",
            n
        ))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: '{}'", s))),
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    #[test]
    fn product_accepts_string_numbers_and_null_description() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "name": "Mug",
            "description": null,
            "price": "9.99",
            "stock": "50",
            "images": [{ "id": 101, "image_path": "products/mug.jpg" }]
        }))
        .unwrap();

        assert_eq!(product.price, 9.99);
        assert_eq!(product.stock, 50);
        assert_eq!(product.description, "");
        assert_eq!(product.images[0].path.as_deref(), Some("products/mug.jpg"));
        assert!(product.image_urls.is_empty());
    }

    #[test]
    fn fractional_stock_is_rejected() {
        let result = serde_json::from_value::<Product>(json!({
            "id": 1, "name": "Cup", "price": 1, "stock": 2.5
        }));
        assert!(result.is_err());
    }

    #[test]
    fn metrics_default_missing_fields() {
        let metrics: DashboardMetrics =
            serde_json::from_value(json!({ "total_products": 12, "total_sales": "12450.50" }))
                .unwrap();
        assert_eq!(metrics.total_products, 12);
        assert_eq!(metrics.total_sales, 12450.5);
        assert_eq!(metrics.todays_orders, 0);
    }

    #[test]
    fn auth_session_accepts_access_token_alias() {
        let session: AuthSession = serde_json::from_value(json!({
            "access_token": "tok",
            "user": { "id": 1, "email": "admin@mystore.com", "role": "admin" }
        }))
        .unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.user.unwrap().role, Some(Role::Admin));
        assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
        assert_eq!(Role::Customer.to_string(), "customer");
    }
}
