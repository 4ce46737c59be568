// src/dashboard.rs

use std::time::Instant;

use crate::api::ShopApi;
use crate::config::ClientConfig;
use crate::editor::{ProductEditor, SubmitOutcome};
use crate::errors::ClientError;
use crate::forms::NewAdminForm;
use crate::models::{Admin, DashboardMetrics, Product, UpdateAdminPayload, VisitorAnalytics};
use crate::notifications::NotificationCenter;
use crate::session::AuthContext;
use crate::stock::low_stock;
use crate::transport::Transport;

#[derive(Debug, Clone, Default)]
pub struct Overview {
    pub metrics: DashboardMetrics,
    pub analytics: VisitorAnalytics,
}

/// Stan panelu administratora: listy z serwera, edytor produktu i powiadomienia.
pub struct AdminDashboard<T: Transport> {
    api: ShopApi<T>,
    auth: AuthContext,
    products: Vec<Product>,
    admins: Vec<Admin>,
    overview: Option<Overview>,
    editor: ProductEditor,
    notifications: NotificationCenter,
    low_stock_threshold: i64,
}

impl<T: Transport> AdminDashboard<T> {
    pub fn new(api: ShopApi<T>, auth: AuthContext, config: &ClientConfig) -> Self {
        Self {
            api,
            auth,
            products: Vec::new(),
            admins: Vec::new(),
            overview: None,
            editor: ProductEditor::new(config.storage_base_url.clone()),
            notifications: NotificationCenter::new(config.notification_ttl),
            low_stock_threshold: config.low_stock_threshold,
        }
    }

    pub fn api(&self) -> &ShopApi<T> {
        &self.api
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn admins(&self) -> &[Admin] {
        &self.admins
    }

    pub fn overview(&self) -> Option<&Overview> {
        self.overview.as_ref()
    }

    pub fn editor(&self) -> &ProductEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut ProductEditor {
        &mut self.editor
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    pub fn low_stock_products(&self) -> Vec<&Product> {
        low_stock(&self.products, self.low_stock_threshold)
    }

    // --- PRODUKTY ---

    pub async fn refresh_products(&mut self) -> Result<(), ClientError> {
        let result = self.api.list_products().await;
        let products = self.report(result, None)?;
        self.replace_products(products);
        Ok(())
    }

    fn replace_products(&mut self, products: Vec<Product>) {
        // Produkt mógł zniknąć w międzyczasie (usunięty z innej karty)
        if let Some(id) = self.editor.mode().product_id() {
            if !products.iter().any(|p| p.id == id) {
                self.editor.forget_product(id);
            }
        }
        self.products = products;
        let low = self.low_stock_products().len();
        if low > 0 {
            tracing::info!(
                "{} produktów ma niski stan magazynowy (próg {})",
                low,
                self.low_stock_threshold
            );
        }
    }

    pub fn start_create_product(&mut self) {
        self.editor.start_create();
    }

    pub fn start_edit_product(&mut self, id: i64) -> Result<(), ClientError> {
        let result = self
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("Product {}", id)));
        let product = self.report(result, None)?;
        self.editor.start_edit(&product);
        Ok(())
    }

    pub async fn submit_product(&mut self) -> Result<SubmitOutcome, ClientError> {
        let result = self.editor.submit(&self.api, &self.auth).await;
        let message = match &result {
            Ok(outcome) if outcome.mode.product_id().is_some() => "Product updated successfully",
            _ => "Product created successfully",
        };
        let outcome = self.report(result, Some(message))?;
        if let Some(products) = &outcome.products {
            self.replace_products(products.clone());
        }
        Ok(outcome)
    }

    pub async fn delete_product(&mut self, id: i64) -> Result<(), ClientError> {
        let result = self.api.delete_product(&self.auth, id).await;
        self.report(result, Some("Product deleted"))?;
        self.products.retain(|p| p.id != id);
        self.editor.forget_product(id);
        Ok(())
    }

    // --- ADMINISTRATORZY ---

    pub async fn refresh_admins(&mut self) -> Result<(), ClientError> {
        let result = self.api.list_admins(&self.auth).await;
        self.admins = self.report(result, None)?;
        Ok(())
    }

    pub async fn create_admin(&mut self, form: NewAdminForm) -> Result<Admin, ClientError> {
        let result = match form.into_payload() {
            Ok(payload) => self.api.create_admin(&self.auth, &payload).await,
            Err(e) => Err(e),
        };
        let admin = self.report(result, Some("Admin created"))?;
        self.admins.push(admin.clone());
        Ok(admin)
    }

    pub async fn update_admin(&mut self, id: i64, name: &str, email: &str) -> Result<Admin, ClientError> {
        let payload = UpdateAdminPayload {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
        };
        let result = if payload.name.is_empty() || payload.email.is_empty() {
            Err(ClientError::validation("name", "Name and email are required."))
        } else {
            self.api.update_admin(&self.auth, id, &payload).await
        };
        let admin = self.report(result, Some("Admin updated"))?;
        if let Some(existing) = self.admins.iter_mut().find(|a| a.id == id) {
            *existing = admin.clone();
        }
        Ok(admin)
    }

    pub async fn delete_admin(&mut self, id: i64) -> Result<(), ClientError> {
        let result = self.api.delete_admin(&self.auth, id).await;
        self.report(result, Some("Admin deleted"))?;
        self.admins.retain(|a| a.id != id);
        Ok(())
    }

    // --- STATYSTYKI ---

    /// Metryki i analityka odwiedzin pobierane równolegle.
    pub async fn load_overview(&mut self, days: u32) -> Result<&Overview, ClientError> {
        let result = futures::try_join!(
            self.api.metrics(&self.auth),
            self.api.visitor_analytics(&self.auth, days)
        );
        let (metrics, analytics) = self.report(result, None)?;
        Ok(self.overview.insert(Overview { metrics, analytics }))
    }

    /// Usuwa powiadomienia, którym minął czas wyświetlania.
    pub fn tick(&mut self, now: Instant) -> usize {
        self.notifications.prune_expired(now)
    }

    /// Każdy błąd trafia do powiadomień jako tekst dla użytkownika.
    fn report<R>(
        &mut self,
        result: Result<R, ClientError>,
        success: Option<&str>,
    ) -> Result<R, ClientError> {
        self.tick(Instant::now());
        match &result {
            Ok(_) => {
                if let Some(message) = success {
                    self.notifications.success(message);
                }
            }
            Err(e) => {
                tracing::warn!("Operacja panelu nie powiodła się: {}", e);
                self.notifications.error(e.user_message());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationKind;
    use crate::transport::testing::RecordingTransport;
    use serde_json::json;

    fn dashboard(transport: RecordingTransport) -> AdminDashboard<RecordingTransport> {
        AdminDashboard::new(
            ShopApi::new(transport),
            AuthContext::with_token("admin-token"),
            &ClientConfig::default(),
        )
    }

    fn products_body() -> serde_json::Value {
        json!([
            { "id": 1, "name": "Mug", "price": 9.99, "stock": 50 },
            { "id": 2, "name": "Teapot", "price": 24.5, "stock": 2 },
            { "id": 3, "name": "Bowl", "price": 12, "stock": 0 }
        ])
    }

    #[tokio::test]
    async fn refresh_feeds_low_stock_detection() {
        let mut dash = dashboard(RecordingTransport::new().respond(200, products_body()));
        dash.refresh_products().await.unwrap();

        let low: Vec<&str> = dash.low_stock_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low, vec!["Bowl", "Teapot"]);
    }

    #[tokio::test]
    async fn deleting_edited_product_discards_session() {
        let mut dash = dashboard(
            RecordingTransport::new()
                .respond(200, products_body())
                .respond(200, json!({ "message": "Deleted" })),
        );
        dash.refresh_products().await.unwrap();
        dash.start_edit_product(2).unwrap();
        dash.editor_mut().set_name("Teapot XL");

        dash.delete_product(2).await.unwrap();
        assert_eq!(dash.editor().mode(), crate::editor::EditMode::Create);
        assert_eq!(dash.editor().form().name, "");
        assert_eq!(dash.products().len(), 2);
        assert_eq!(dash.notifications().latest().unwrap().message, "Product deleted");
    }

    #[tokio::test]
    async fn product_vanishing_on_refresh_discards_session() {
        let mut dash = dashboard(
            RecordingTransport::new()
                .respond(200, products_body())
                .respond(200, json!([{ "id": 1, "name": "Mug", "price": 9.99, "stock": 50 }])),
        );
        dash.refresh_products().await.unwrap();
        dash.start_edit_product(3).unwrap();
        dash.refresh_products().await.unwrap();
        assert_eq!(dash.editor().mode(), crate::editor::EditMode::Create);
    }

    #[tokio::test]
    async fn submit_updates_cached_products() {
        let mut dash = dashboard(
            RecordingTransport::new()
                .respond(200, products_body())
                .respond(200, json!({ "message": "Updated" }))
                .respond(
                    200,
                    json!([{ "id": 2, "name": "Teapot", "price": 24.5, "stock": 40 }]),
                ),
        );
        dash.refresh_products().await.unwrap();
        dash.start_edit_product(2).unwrap();
        dash.editor_mut().set_stock("40");

        dash.submit_product().await.unwrap();
        assert_eq!(dash.products().len(), 1);
        assert!(dash.low_stock_products().is_empty());
        let note = dash.notifications().latest().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.message, "Product updated successfully");
    }

    #[tokio::test]
    async fn failures_become_error_notifications() {
        let mut dash = dashboard(
            RecordingTransport::new().respond(500, json!({ "error": "Database unavailable" })),
        );
        assert!(dash.refresh_admins().await.is_err());
        let note = dash.notifications().latest().unwrap();
        assert_eq!(note.kind, NotificationKind::Error);
        assert_eq!(note.message, "Database unavailable");

        assert!(matches!(
            dash.start_edit_product(42),
            Err(ClientError::NotFound(_))
        ));
        assert_eq!(dash.notifications().latest().unwrap().message, "Product 42 not found");
    }

    #[tokio::test]
    async fn expired_notifications_are_dismissed() {
        let mut transport = RecordingTransport::new();
        for _ in 0..5 {
            transport = transport.respond(500, json!({ "error": "Database unavailable" }));
        }
        let config = ClientConfig {
            notification_ttl: std::time::Duration::from_millis(1),
            ..ClientConfig::default()
        };
        let mut dash = AdminDashboard::new(
            ShopApi::new(transport),
            AuthContext::with_token("admin-token"),
            &config,
        );

        for _ in 0..4 {
            assert!(dash.refresh_admins().await.is_err());
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        // Kolejna operacja najpierw sprząta wygasłe powiadomienia
        assert!(dash.refresh_admins().await.is_err());
        assert_eq!(dash.notifications().active().len(), 1);

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(dash.tick(Instant::now()), 1);
        assert!(dash.notifications().active().is_empty());
    }

    #[tokio::test]
    async fn invalid_admin_form_skips_network() {
        let mut dash = dashboard(RecordingTransport::new());
        let form = NewAdminForm {
            name: "Ola".into(),
            email: "not-an-email".into(),
            password: "longenough".into(),
        };
        assert!(dash.create_admin(form).await.is_err());
        assert_eq!(dash.api().transport().request_count(), 0);
        assert!(dash.admins().is_empty());
    }

    #[tokio::test]
    async fn admin_crud_keeps_local_list_in_sync() {
        let mut dash = dashboard(
            RecordingTransport::new()
                .respond(200, json!([{ "id": 1, "name": "Main Admin", "email": "admin@mystore.com" }]))
                .respond(201, json!({ "user": { "id": 2, "name": "Ola", "email": "ola@mystore.com" } }))
                .respond(200, json!({ "id": 2, "name": "Ola K", "email": "ola@mystore.com" }))
                .respond(200, json!({ "message": "Deleted" })),
        );
        dash.refresh_admins().await.unwrap();
        dash.create_admin(NewAdminForm {
            name: " Ola ".into(),
            email: "ola@mystore.com".into(),
            password: "longenough".into(),
        })
        .await
        .unwrap();
        assert_eq!(dash.admins().len(), 2);

        dash.update_admin(2, "Ola K", "ola@mystore.com").await.unwrap();
        assert_eq!(dash.admins()[1].name, "Ola K");

        dash.delete_admin(1).await.unwrap();
        let ids: Vec<i64> = dash.admins().iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn overview_loads_metrics_and_analytics() {
        let mut dash = dashboard(
            RecordingTransport::new()
                .respond(200, json!({ "total_admins": 1, "total_products": 3, "total_sales": 12450, "todays_orders": 27 }))
                .respond(200, json!({ "data": { "total_visits": 300, "unique_visitors": 120, "daily": [] } })),
        );
        let overview = dash.load_overview(30).await.unwrap();
        assert_eq!(overview.metrics.todays_orders, 27);
        assert_eq!(overview.analytics.unique_visitors, 120);
        assert_eq!(overview.analytics.days, 30);
    }
}
