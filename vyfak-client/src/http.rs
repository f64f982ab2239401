//! HTTP client for the Vyfakturuj.cz REST API
//!
//! Every call is Basic-authenticated JSON against the configured endpoint.
//! Non-2xx answers are returned as data; only transport failures are errors.

use crate::config::normalize_endpoint;
use crate::{ApiReply, ApiResponse, ClientResult, ProviderConfig, RequestInfo};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::Mutex;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use shared::models::InvoicePayload;
use std::time::Duration;

/// Invoice operations the order workflow depends on
#[async_trait]
pub trait InvoiceApi: Send + Sync {
    /// Credentials / liveness check
    async fn test(&self) -> ClientResult<ApiReply>;
    async fn create_invoice(&self, payload: &InvoicePayload) -> ClientResult<ApiReply>;
    async fn get_invoice(&self, id: &str) -> ClientResult<ApiReply>;
    /// Generate the PDF and email it
    async fn send_invoice_mail(&self, id: &str, data: &Value) -> ClientResult<ApiResponse>;
    /// Validate a send-mail body without sending
    async fn send_invoice_mail_test(&self, id: &str, data: &Value) -> ClientResult<ApiResponse>;
    /// Status code and body of the most recent request
    fn last_info(&self) -> Option<RequestInfo>;
}

/// Basic-authenticated JSON client
#[derive(Debug)]
pub struct VyfakClient {
    client: Client,
    endpoint_url: String,
    login: String,
    api_key: String,
    last_info: Mutex<Option<RequestInfo>>,
}

impl VyfakClient {
    pub fn new(config: &ProviderConfig) -> ClientResult<Self> {
        let endpoint_url = normalize_endpoint(&config.endpoint_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            endpoint_url,
            login: config.login.clone(),
            api_key: config.api_key.clone(),
            last_info: Mutex::new(None),
        })
    }

    /// Base URL every path is appended to
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Point the client at another endpoint, e.g. a sandbox
    pub fn set_endpoint_url(&mut self, url: &str) -> ClientResult<()> {
        self.endpoint_url = normalize_endpoint(url)?;
        Ok(())
    }

    /// `Basic base64(login:key)`
    pub fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.login, self.api_key);
        format!("Basic {}", STANDARD.encode(credentials))
    }

    async fn fetch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        data: Option<Value>,
    ) -> ClientResult<ApiReply> {
        Ok(self.exchange(method, path, query, data).await?.reply)
    }

    /// Send one request; the answer carries its own status code
    async fn exchange(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        data: Option<Value>,
    ) -> ClientResult<ApiResponse> {
        let url = format!("{}{}", self.endpoint_url, path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, self.auth_header());

        if !query.is_empty() {
            request = request.query(query);
        }

        // Bodies only travel with POST/PUT, and never empty
        if let Some(body) = data.as_ref().filter(|b| has_content(b))
            && (method == Method::POST || method == Method::PUT)
        {
            request = request.json(body);
        }

        tracing::debug!(method = %method, url = %url, "Provider request");

        let response = request.send().await?;
        let http_code = response.status().as_u16();
        let body = response.text().await?;

        let info = RequestInfo {
            http_code,
            data_sent: data,
        };
        *self.last_info.lock() = Some(info.clone());

        tracing::debug!(http_code, "Provider response");
        Ok(ApiResponse {
            info,
            reply: ApiReply::from_body(&body),
        })
    }

    async fn get(&self, path: &str) -> ClientResult<ApiReply> {
        self.fetch(Method::GET, path, &[], None).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<ApiReply> {
        let data = serde_json::to_value(body)?;
        self.fetch(Method::POST, path, &[], Some(data)).await
    }

    // ========== Invoices ==========

    /// List invoices, `args` become the query string
    pub async fn list_invoices(&self, args: &[(&str, &str)]) -> ClientResult<ApiReply> {
        self.fetch(Method::GET, "invoice/", args, None).await
    }

    // ========== Contacts ==========

    pub async fn create_contact<B: Serialize + Sync + ?Sized>(
        &self,
        data: &B,
    ) -> ClientResult<ApiReply> {
        self.post("contact/", data).await
    }

    pub async fn get_contact(&self, id: &str) -> ClientResult<ApiReply> {
        self.get(&format!("contact/{}/", id)).await
    }

    pub async fn list_contacts(&self, args: &[(&str, &str)]) -> ClientResult<ApiReply> {
        self.fetch(Method::GET, "contact/", args, None).await
    }
}

#[async_trait]
impl InvoiceApi for VyfakClient {
    async fn test(&self) -> ClientResult<ApiReply> {
        self.get("test/").await
    }

    async fn create_invoice(&self, payload: &InvoicePayload) -> ClientResult<ApiReply> {
        self.post("invoice/", payload).await
    }

    async fn get_invoice(&self, id: &str) -> ClientResult<ApiReply> {
        self.get(&format!("invoice/{}/", id)).await
    }

    async fn send_invoice_mail(&self, id: &str, data: &Value) -> ClientResult<ApiResponse> {
        let path = format!("invoice/{}/do/send-mail/", id);
        self.exchange(Method::POST, &path, &[], Some(data.clone()))
            .await
    }

    async fn send_invoice_mail_test(&self, id: &str, data: &Value) -> ClientResult<ApiResponse> {
        self.send_invoice_mail(id, &with_test_flag(data)).await
    }

    fn last_info(&self) -> Option<RequestInfo> {
        self.last_info.lock().clone()
    }
}

/// Empty objects, arrays and null are not sent
fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

/// Copy of a send-mail body with `"test": true`
pub fn with_test_flag(data: &Value) -> Value {
    let mut data = match data {
        Value::Object(_) => data.clone(),
        _ => Value::Object(Default::default()),
    };
    if let Value::Object(map) = &mut data {
        map.insert("test".into(), Value::Bool(true));
    }
    data
}
