// src/transport.rs

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, multipart};
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::errors::ClientError;

/// Plik wybrany lokalnie, jeszcze nie wysłany na serwer.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("Nie można odczytać pliku {}: {}", path.display(), e);
            ClientError::from(e)
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = guess_image_mime(&file_name);
        tracing::debug!(
            "Przygotowano plik {} ({}, {} bajtów)",
            file_name,
            content_type,
            bytes.len()
        );
        Ok(Self::new(file_name, content_type, bytes))
    }
}

fn guess_image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(StagedFile),
}

/// Treść multipart w postaci, którą da się obejrzeć przed wysłaniem.
/// Kolejność pól jest zachowana.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    fields: Vec<(String, FormValue)>,
}

impl MultipartPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields
            .push((name.to_string(), FormValue::Text(value.into())));
        self
    }

    pub fn file(mut self, name: &str, file: StagedFile) -> Self {
        self.fields.push((name.to_string(), FormValue::File(file)));
        self
    }

    pub fn fields(&self) -> &[(String, FormValue)] {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Pierwsza wartość tekstowa pola.
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.texts(name).into_iter().next()
    }

    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|(n, v)| match v {
                FormValue::Text(t) if n == name => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn files(&self, name: &str) -> Vec<&StagedFile> {
        self.fields
            .iter()
            .filter_map(|(n, v)| match v {
                FormValue::File(f) if n == name => Some(f),
                _ => None,
            })
            .collect()
    }

    pub fn into_form(self) -> Result<multipart::Form, ClientError> {
        let mut form = multipart::Form::new();
        for (name, value) in self.fields {
            form = match value {
                FormValue::Text(text) => form.text(name, text),
                FormValue::File(file) => {
                    let part = multipart::Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|e| {
                            tracing::error!("Błąd ustawiania typu MIME: {}", e);
                            ClientError::from(e)
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(MultipartPayload),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, payload: MultipartPayload) -> Self {
        self.body = RequestBody::Multipart(payload);
        self
    }

    pub fn multipart_payload(&self) -> Option<&MultipartPayload> {
        match &self.body {
            RequestBody::Multipart(payload) => Some(payload),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError>;
}

/// Transport HTTP oparty o `reqwest`.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        // Bez końcowego "/" Url::join podmieniłby ostatni segment bazy
        let base_url = Url::parse(&format!("{}/", config.api_base_url.trim_end_matches('/')))?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let url = self.url_for(&request.path)?;
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(payload) => builder.multipart(payload.into_form()?),
        };

        let response = builder.send().await.map_err(|e| {
            tracing::error!(
                "Błąd sieci podczas {} {}: {:?}",
                request.method,
                request.path,
                e
            );
            ClientError::from(e)
        })?;
        let status = response.status();
        let body = response.text().await?;
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Transport w pamięci: oddaje przygotowane odpowiedzi i zapamiętuje żądania.
    #[derive(Default)]
    pub struct RecordingTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, ClientError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: Value) -> Self {
            self.respond_raw(status, &body.to_string())
        }

        pub fn respond_raw(self, status: u16, body: &str) -> Self {
            self.responses.lock().unwrap().push_back(Ok(ApiResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: body.to_string(),
            }));
            self
        }

        /// Kolejne żądanie zakończy się błędem transportu zamiast odpowiedzi.
        pub fn fail(self, error: ClientError) -> Self {
            self.responses.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
            let summary = format!("{} {}", request.method, request.path);
            self.requests.lock().unwrap().push(request);
            let response = self.responses.lock().unwrap().pop_front();
            response.unwrap_or_else(|| panic!("brak przygotowanej odpowiedzi dla {summary}"))
        }
    }

    /// Prawdziwy `reqwest::Error`, bez sieci: budowanie żądania z błędnym adresem.
    pub fn network_error() -> ClientError {
        let err = Client::new()
            .get("not a url")
            .build()
            .expect_err("adres bez schematu musi się nie zbudować");
        ClientError::from(err)
    }
}
