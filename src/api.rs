// src/api.rs

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::{
    Admin, AuthSession, CreateAdminPayload, DashboardMetrics, LoginPayload, Product,
    RegistrationPayload, UpdateAdminPayload, VisitorAnalytics,
};
use crate::pagination::{normalize_admins, normalize_products};
use crate::session::AuthContext;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, MultipartPayload, Transport};

/// Klient REST sklepu. Token sesji przychodzi z zewnątrz w `AuthContext`.
pub struct ShopApi<T: Transport> {
    transport: T,
}

impl<T: Transport> ShopApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // --- PRODUKTY ---

    pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        tracing::info!("Pobieranie listy produktów");
        let body = self.send_json(ApiRequest::get("/api/products")).await?;
        normalize_products(body)
    }

    pub async fn newest_products(&self, limit: u32) -> Result<Vec<Product>, ClientError> {
        let request = ApiRequest::get("/api/products/newest").query("limit", limit);
        normalize_products(self.send_json(request).await?)
    }

    pub async fn most_sold_products(&self, limit: u32) -> Result<Vec<Product>, ClientError> {
        let request = ApiRequest::get("/api/products/most-sold").query("limit", limit);
        normalize_products(self.send_json(request).await?)
    }

    /// Wysyła formularz produktu. `product_id` = `None` tworzy nowy produkt,
    /// w przeciwnym razie celujemy w endpoint aktualizacji (POST + `_method`).
    pub async fn save_product(
        &self,
        auth: &AuthContext,
        product_id: Option<i64>,
        payload: MultipartPayload,
    ) -> Result<Value, ClientError> {
        let token = auth.bearer()?;
        let path = match product_id {
            Some(id) => format!("/api/products/{}", id),
            None => "/api/products".to_string(),
        };
        tracing::info!("Zapisywanie produktu: POST {}", path);
        let request = ApiRequest::post(path).bearer(token).multipart(payload);
        self.send_json(request).await
    }

    pub async fn delete_product(&self, auth: &AuthContext, id: i64) -> Result<(), ClientError> {
        let token = auth.bearer()?;
        tracing::info!("Usuwanie produktu o ID: {}", id);
        let request = ApiRequest::delete(format!("/api/products/{}", id)).bearer(token);
        self.send_json(request).await.map(|_| ())
    }

    // --- AUTORYZACJA ---

    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthSession, ClientError> {
        tracing::info!("Logowanie użytkownika: {}", payload.email);
        let request = ApiRequest::post("/api/auth/login").json(serde_json::to_value(payload)?);
        self.send_typed(request).await
    }

    pub async fn register(&self, payload: &RegistrationPayload) -> Result<AuthSession, ClientError> {
        tracing::info!("Rejestracja użytkownika: {}", payload.email);
        let request =
            ApiRequest::post("/api/auth/register").json(serde_json::to_value(payload)?);
        self.send_typed(request).await
    }

    // --- ADMINISTRATORZY ---

    pub async fn list_admins(&self, auth: &AuthContext) -> Result<Vec<Admin>, ClientError> {
        let token = auth.bearer()?;
        let body = self
            .send_json(ApiRequest::get("/api/admin/users").bearer(token))
            .await?;
        normalize_admins(body)
    }

    pub async fn create_admin(
        &self,
        auth: &AuthContext,
        payload: &CreateAdminPayload,
    ) -> Result<Admin, ClientError> {
        let token = auth.bearer()?;
        tracing::info!("Tworzenie administratora: {}", payload.email);
        let request = ApiRequest::post("/api/admin/users/create-admin")
            .bearer(token)
            .json(serde_json::to_value(payload)?);
        let body = self.send_json(request).await?;
        unwrap_record(body, &["user", "admin", "data"])
    }

    pub async fn update_admin(
        &self,
        auth: &AuthContext,
        id: i64,
        payload: &UpdateAdminPayload,
    ) -> Result<Admin, ClientError> {
        let token = auth.bearer()?;
        let request = ApiRequest::put(format!("/api/admin/users/{}", id))
            .bearer(token)
            .json(serde_json::to_value(payload)?);
        let body = self.send_json(request).await?;
        unwrap_record(body, &["user", "admin", "data"])
    }

    pub async fn delete_admin(&self, auth: &AuthContext, id: i64) -> Result<(), ClientError> {
        let token = auth.bearer()?;
        tracing::info!("Usuwanie administratora o ID: {}", id);
        let request = ApiRequest::delete(format!("/api/admin/users/{}", id)).bearer(token);
        self.send_json(request).await.map(|_| ())
    }

    // --- STATYSTYKI ---

    pub async fn metrics(&self, auth: &AuthContext) -> Result<DashboardMetrics, ClientError> {
        let token = auth.bearer()?;
        let body = self
            .send_json(ApiRequest::get("/api/admin/metrics").bearer(token))
            .await?;
        unwrap_record(body, &["data"])
    }

    pub async fn visitor_analytics(
        &self,
        auth: &AuthContext,
        days: u32,
    ) -> Result<VisitorAnalytics, ClientError> {
        let token = auth.bearer()?;
        let request = ApiRequest::get("/api/admin/visitor-analytics")
            .query("days", days)
            .bearer(token);
        let mut analytics: VisitorAnalytics = unwrap_record(self.send_json(request).await?, &["data"])?;
        if analytics.days == 0 {
            analytics.days = days;
        }
        Ok(analytics)
    }

    // --- WSPÓLNE ---

    async fn send_typed<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ClientError> {
        let body = self.send_json(request).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Wykonuje żądanie i zwraca ciało jako JSON. Status spoza 2xx zamieniamy
    /// na `ClientError::Api` z komunikatem serwera.
    async fn send_json(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let method = request.method.clone();
        let path = request.path.clone();
        let response = self.transport.execute(request).await?;

        if !response.is_success() {
            let message = error_message(&response);
            tracing::error!(
                "{} {} zakończone błędem: Status={}, Komunikat={}",
                method,
                path,
                response.status,
                message
            );
            return Err(ClientError::Api {
                status: response.status,
                message,
            });
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| {
            tracing::error!("Błąd deserializacji odpowiedzi {} {}: {}", method, path, e);
            ClientError::from(e)
        })
    }
}

/// Komunikat błędu z ciała odpowiedzi: `message`, potem `error`, potem tekst ogólny.
pub fn error_message(response: &ApiResponse) -> String {
    let from_body = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            ["message", "error"].iter().find_map(|key| {
                body.get(*key)
                    .and_then(Value::as_str)
                    .filter(|m| !m.trim().is_empty())
                    .map(str::to_string)
            })
        });
    from_body.unwrap_or_else(|| format!("Request failed with status {}", response.status.as_u16()))
}

/// Rekord bywa opakowany (`{ "user": {...} }`), a bywa zwracany wprost.
fn unwrap_record<R: DeserializeOwned>(body: Value, keys: &[&str]) -> Result<R, ClientError> {
    let inner = match &body {
        Value::Object(map) => keys
            .iter()
            .find_map(|key| map.get(*key).filter(|v| v.is_object()).cloned()),
        _ => None,
    };
    Ok(serde_json::from_value(inner.unwrap_or(body))?)
}

impl ShopApi<HttpTransport> {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}
