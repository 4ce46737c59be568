// src/pagination.rs
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ClientError;
use crate::models::{Admin, Product};

/// Klucze sprawdzane po kolei, gdy odpowiedź nie jest gołą tablicą.
const PRODUCT_KEYS: &[&str] = &["data", "products"];
const ADMIN_KEYS: &[&str] = &["data", "users", "admins"];

/// Sprowadza listę produktów do `Vec<Product>` niezależnie od opakowania:
/// tablica, potem `{ "data": [...] }` (paginacja), potem `{ "products": [...] }`.
pub fn normalize_products(body: Value) -> Result<Vec<Product>, ClientError> {
    normalize_collection(body, PRODUCT_KEYS)
}

pub fn normalize_admins(body: Value) -> Result<Vec<Admin>, ClientError> {
    normalize_collection(body, ADMIN_KEYS)
}

pub fn normalize_collection<T: DeserializeOwned>(
    body: Value,
    keys: &[&str],
) -> Result<Vec<T>, ClientError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let found = keys.iter().find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            });
            match found {
                Some(items) => items,
                None => {
                    tracing::warn!(
                        "Odpowiedź nie zawiera listy pod żadnym z kluczy {:?}",
                        keys
                    );
                    return Err(ClientError::UnexpectedShape(format!(
                        "expected an array or one of {:?}",
                        keys
                    )));
                }
            }
        }
        other => {
            return Err(ClientError::UnexpectedShape(format!(
                "expected an array, got {}",
                type_name(&other)
            )));
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ClientError::from))
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
