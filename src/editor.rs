// src/editor.rs

use serde_json::Value;

use crate::api::ShopApi;
use crate::errors::ClientError;
use crate::images::resolve_url;
use crate::models::Product;
use crate::session::AuthContext;
use crate::transport::{MultipartPayload, StagedFile, Transport};

pub const FIELD_IMAGES: &str = "images[]";
pub const FIELD_REMOVE_IMAGE_IDS: &str = "remove_image_ids[]";
pub const FIELD_METHOD_OVERRIDE: &str = "_method";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Create,
    Edit(i64),
}

impl EditMode {
    pub fn product_id(&self) -> Option<i64> {
        match self {
            EditMode::Create => None,
            EditMode::Edit(id) => Some(*id),
        }
    }
}

/// Pola formularza dokładnie tak, jak je wpisano.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExistingImage {
    pub id: i64,
    pub url: String,
    pub path: Option<String>,
}

/// Stan edycji żyjący tylko po stronie klienta.
///
/// Obrazek jest albo w `existing_images`, albo w `removed_images`, nigdy w obu.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    mode: EditMode,
    form: ProductForm,
    existing_images: Vec<ExistingImage>,
    removed_images: Vec<ExistingImage>,
    staged_files: Vec<StagedFile>,
}

#[derive(Debug, Clone, PartialEq)]
struct ValidatedFields {
    name: String,
    description: String,
    price: f64,
    stock: u64,
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub mode: EditMode,
    /// Produkt odesłany przez serwer, jeśli dało się go odczytać.
    pub saved: Option<Product>,
    /// Świeża lista produktów; `None`, gdy ponowne pobranie się nie udało.
    pub products: Option<Vec<Product>>,
}

pub struct ProductEditor {
    session: EditSession,
    storage_base: String,
}

impl ProductEditor {
    pub fn new(storage_base: impl Into<String>) -> Self {
        Self {
            session: EditSession::default(),
            storage_base: storage_base.into(),
        }
    }

    pub fn start_create(&mut self) {
        self.session = EditSession::default();
    }

    pub fn start_edit(&mut self, product: &Product) {
        tracing::debug!("Rozpoczęto edycję produktu o ID: {}", product.id);
        let existing_images = product
            .images
            .iter()
            .enumerate()
            .map(|(index, image)| ExistingImage {
                id: image.id,
                url: resolve_url(image, index, &product.image_urls, &self.storage_base),
                path: image.path.clone(),
            })
            .collect();

        self.session = EditSession {
            mode: EditMode::Edit(product.id),
            form: ProductForm {
                name: product.name.clone(),
                description: product.description.clone(),
                price: product.price.to_string(),
                // Ujemny stan z serwera i tak nie przeszedłby walidacji
                stock: product.stock.max(0).to_string(),
            },
            existing_images,
            removed_images: Vec::new(),
            staged_files: Vec::new(),
        };
    }

    /// Przenosi obrazek z listy wyświetlanych do zbioru do usunięcia.
    /// Zwraca `false`, gdy obrazka nie ma na liście (np. drugie kliknięcie).
    pub fn mark_image_for_removal(&mut self, image_id: i64) -> bool {
        let Some(position) = self
            .session
            .existing_images
            .iter()
            .position(|img| img.id == image_id)
        else {
            tracing::debug!("Obrazek {} nie jest wyświetlany, pomijam", image_id);
            return false;
        };
        let image = self.session.existing_images.remove(position);
        self.session.removed_images.push(image);
        true
    }

    /// Cofa oznaczenie obrazka do usunięcia, dopóki formularz nie został wysłany.
    pub fn restore_image(&mut self, image_id: i64) -> bool {
        let Some(position) = self
            .session
            .removed_images
            .iter()
            .position(|img| img.id == image_id)
        else {
            return false;
        };
        let image = self.session.removed_images.remove(position);
        self.session.existing_images.push(image);
        true
    }

    /// Ostatni wybór plików zastępuje poprzedni.
    pub fn attach_files(&mut self, files: Vec<StagedFile>) {
        self.session.staged_files = files;
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.session.form.name = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.session.form.description = value.into();
    }

    pub fn set_price(&mut self, value: impl Into<String>) {
        self.session.form.price = value.into();
    }

    pub fn set_stock(&mut self, value: impl Into<String>) {
        self.session.form.stock = value.into();
    }

    pub fn cancel(&mut self) {
        self.start_create();
    }

    /// Porzuca sesję, jeśli edytowany produkt został właśnie usunięty.
    pub fn forget_product(&mut self, product_id: i64) -> bool {
        if self.session.mode == EditMode::Edit(product_id) {
            tracing::info!(
                "Edytowany produkt {} został usunięty, czyszczę formularz",
                product_id
            );
            self.start_create();
            true
        } else {
            false
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn mode(&self) -> EditMode {
        self.session.mode
    }

    pub fn form(&self) -> &ProductForm {
        &self.session.form
    }

    pub fn existing_images(&self) -> &[ExistingImage] {
        &self.session.existing_images
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        &self.session.staged_files
    }

    pub fn removed_image_ids(&self) -> Vec<i64> {
        self.session.removed_images.iter().map(|img| img.id).collect()
    }

    /// Waliduje formularz, wysyła jedno żądanie multipart i po sukcesie
    /// czyści sesję oraz pobiera ponownie listę produktów.
    pub async fn submit<T: Transport>(
        &mut self,
        api: &ShopApi<T>,
        auth: &AuthContext,
    ) -> Result<SubmitOutcome, ClientError> {
        let fields = self.validate()?;
        auth.bearer()?;

        let mode = self.session.mode;
        let payload = self.build_payload(&fields);
        let body = api.save_product(auth, mode.product_id(), payload).await?;

        let saved = parse_saved_product(body);
        tracing::info!("Zapisano produkt '{}' ({:?})", fields.name, mode);
        self.session = EditSession::default();

        let products = match api.list_products().await {
            Ok(products) => Some(products),
            Err(e) => {
                tracing::warn!("Nie udało się odświeżyć listy produktów po zapisie: {:?}", e);
                None
            }
        };

        Ok(SubmitOutcome {
            mode,
            saved,
            products,
        })
    }

    fn validate(&self) -> Result<ValidatedFields, ClientError> {
        let form = &self.session.form;

        let name = form.name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("name", "Product name is required."));
        }

        let price = form
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| {
                ClientError::validation("price", "Price must be a valid non-negative number.")
            })?;

        let stock = form.stock.trim().parse::<u64>().map_err(|_| {
            ClientError::validation("stock", "Stock must be a valid non-negative whole number.")
        })?;

        Ok(ValidatedFields {
            name: name.to_string(),
            description: form.description.clone(),
            price,
            stock,
        })
    }

    fn build_payload(&self, fields: &ValidatedFields) -> MultipartPayload {
        let mut payload = MultipartPayload::new()
            .text("name", fields.name.clone())
            .text("description", fields.description.clone())
            .text("price", fields.price.to_string())
            .text("stock", fields.stock.to_string());

        for file in &self.session.staged_files {
            payload = payload.file(FIELD_IMAGES, file.clone());
        }

        // Tworzenie nigdy nie wysyła usunięć
        if let EditMode::Edit(_) = self.session.mode {
            payload = payload.text(FIELD_METHOD_OVERRIDE, "PUT");
            for image in &self.session.removed_images {
                payload = payload.text(FIELD_REMOVE_IMAGE_IDS, image.id.to_string());
            }
        }
        payload
    }
}

fn parse_saved_product(body: Value) -> Option<Product> {
    let record = match body {
        Value::Object(mut map) => {
            let inner = ["data", "product"]
                .iter()
                .find_map(|key| map.remove(*key).filter(Value::is_object));
            inner.unwrap_or(Value::Object(map))
        }
        _ => return None,
    };
    serde_json::from_value(record).ok()
}
