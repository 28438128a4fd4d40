// ABOUTME: HTTP implementation of the adapter client.
// ABOUTME: Speaks JSON to the adapter's /v1/services and /v1/metadata endpoints.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{AdapterClient, AdapterError, Service};
use crate::blueprint::Image;
use crate::context::OpContext;
use crate::types::ServiceId;

/// Pooled HTTP client used to reach the adapter.
pub type HttpClient = Client<HttpConnector, Full<Bytes>>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a pooled client. Owned by whoever constructs the adapter.
pub fn http_client(pool_idle_timeout: Duration) -> HttpClient {
    Client::builder(TokioExecutor::new())
        .pool_timer(TokioTimer::new())
        .pool_idle_timeout(pool_idle_timeout)
        .build_http()
}

/// Adapter reached over HTTP.
#[derive(Clone)]
pub struct HttpAdapter {
    endpoint: String,
    client: HttpClient,
    timeout: Duration,
}

impl std::fmt::Debug for HttpAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAdapter")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpAdapter {
    /// Create an adapter for `endpoint` (e.g. `http://adapter:8001`).
    pub fn new(endpoint: &str, client: HttpClient) -> Result<Self, AdapterError> {
        let endpoint = endpoint.trim_end_matches('/');
        let uri: Uri = endpoint
            .parse()
            .map_err(|e| AdapterError::InvalidEndpoint(format!("{endpoint}: {e}")))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => {
                return Err(AdapterError::InvalidEndpoint(format!(
                    "unsupported scheme '{other}' in {endpoint}"
                )));
            }
            None => {
                return Err(AdapterError::InvalidEndpoint(format!(
                    "missing scheme in {endpoint}"
                )));
            }
        }
        if uri.host().is_none() {
            return Err(AdapterError::InvalidEndpoint(format!(
                "missing host in {endpoint}"
            )));
        }

        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn service_path(id: &ServiceId) -> String {
        format!("/v1/services/{}", urlencoding::encode(id.as_str()))
    }

    /// Send one request and collect the whole response body.
    async fn send(
        &self,
        ctx: &OpContext,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<(StatusCode, Bytes), AdapterError> {
        ctx.check()?;

        let uri = format!("{}{}", self.endpoint, path);
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(&uri)
            .header(ACCEPT, "application/json");
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .map_err(|e| AdapterError::InvalidEndpoint(format!("{uri}: {e}")))?;

        tracing::debug!(%method, %uri, "calling adapter");

        let call = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| AdapterError::Transport(e.to_string()))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| AdapterError::Transport(e.to_string()))?
                .to_bytes();
            Ok::<_, AdapterError>((status, body))
        };

        match ctx.bound(tokio::time::timeout(self.timeout, call)).await? {
            Ok(result) => result,
            Err(_) => Err(AdapterError::Timeout(self.timeout)),
        }
    }
}

fn expect_success(status: StatusCode, body: &Bytes) -> Result<(), AdapterError> {
    if status.is_success() {
        return Ok(());
    }
    Err(AdapterError::Status {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).trim().to_string(),
    })
}

fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, AdapterError> {
    serde_json::from_slice(body).map_err(|e| AdapterError::Decode(e.to_string()))
}

#[async_trait]
impl AdapterClient for HttpAdapter {
    async fn create_services(
        &self,
        ctx: &OpContext,
        images: &[Image],
    ) -> Result<Vec<Service>, AdapterError> {
        let payload = serde_json::to_vec(images).map_err(|e| AdapterError::Encode(e.to_string()))?;
        let (status, body) = self
            .send(ctx, Method::POST, "/v1/services", Some(payload))
            .await?;
        expect_success(status, &body)?;

        let services: Vec<Service> = decode(&body)?;
        if services.len() != images.len() {
            return Err(AdapterError::CountMismatch {
                expected: images.len(),
                actual: services.len(),
            });
        }

        Ok(services
            .into_iter()
            .map(|service| Service::new(service.id, service.actual_state))
            .collect())
    }

    async fn get_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<Service, AdapterError> {
        let (status, body) = self
            .send(ctx, Method::GET, &Self::service_path(id), None)
            .await?;

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(service = %id, "adapter does not know service");
            return Ok(Service::unobserved(id.clone()));
        }
        expect_success(status, &body)?;

        let service: Service = decode(&body)?;
        Ok(Service::new(service.id, service.actual_state))
    }

    async fn delete_service(&self, ctx: &OpContext, id: &ServiceId) -> Result<(), AdapterError> {
        let (status, body) = self
            .send(ctx, Method::DELETE, &Self::service_path(id), None)
            .await?;
        expect_success(status, &body)
    }

    async fn fetch_metadata(&self, ctx: &OpContext) -> Result<serde_json::Value, AdapterError> {
        let (status, body) = self.send(ctx, Method::GET, "/v1/metadata", None).await?;
        expect_success(status, &body)?;
        decode(&body)
    }
}
