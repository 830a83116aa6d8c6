//! Gateway speaking the REST contract over HTTP.

use std::fmt;
use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hyper::body::to_bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Body, Method, Request, StatusCode, Uri};
use hyper_multipart_rfc7578::client::multipart;
use mime::Mime;
use prompt_config::ClientConfig;
use prompt_store::images::validate_filename;
use prompt_primitives::wire::{
    ApiResponse, CategoryRequest, FilenameRequest, IndexRequest, SaveRequest, Status,
};
use prompt_primitives::{CategoryLabel, NewPrompt, PromptIndex, PromptRecord, routes};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tracing::debug;

use crate::http_client::{HyperClient, build_client};
use crate::traits::{GatewayError, GatewayResult, ImageUpload, PromptGateway};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8188/";

/// Configuration for the HTTP gateway.
#[derive(Clone, Debug)]
pub struct HttpGatewayConfig {
    base_url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl HttpGatewayConfig {
    /// Creates a configuration pointing at the default local backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from the `client` section of the manager
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] when the section fails
    /// validation or its URL cannot be parsed.
    pub fn from_client_config(client: &ClientConfig) -> GatewayResult<Self> {
        client
            .validate()
            .map_err(|err| GatewayError::configuration(err.to_string()))?;
        Ok(Self::new()
            .with_base_url(&client.base_url)?
            .with_timeout(client.timeout()))
    }

    /// Overrides the backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> GatewayResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the timeout applied to each request, response body included.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the TCP connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns the normalised base URL (always ending in `/`).
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Gateway calling a remote prompt manager backend.
pub struct HttpGateway {
    client: HyperClient,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Constructs a gateway from the supplied configuration.
    #[must_use]
    pub fn new(config: HttpGatewayConfig) -> Self {
        Self {
            client: build_client(config.connect_timeout),
            base_url: config.base_url,
            timeout: config.timeout,
        }
    }

    fn uri(&self, path: &str) -> GatewayResult<Uri> {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
            .parse::<Uri>()
            .map_err(|err| GatewayError::configuration(format!("invalid endpoint {path}: {err}")))
    }

    async fn send(&self, request: Request<Body>) -> GatewayResult<(StatusCode, Bytes)> {
        let method = request.method().clone();
        let uri = request.uri().clone();
        let exchange = async {
            let response = self.client.request(request).await?;
            let status = response.status();
            let body = to_bytes(response.into_body()).await?;
            Ok::<_, hyper::Error>((status, body))
        };

        let (status, body) = timeout(self.timeout, exchange)
            .await
            .map_err(|_| GatewayError::transport(format!("{method} {uri} timed out")))?
            .map_err(|err| GatewayError::transport(format!("{method} {uri} failed: {err}")))?;

        debug!(%method, %uri, %status, bytes = body.len(), "backend response");
        if status.is_success() {
            Ok((status, body))
        } else {
            Err(error_from_body(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let request = Request::get(self.uri(path)?)
            .body(Body::empty())
            .map_err(|err| GatewayError::transport(format!("failed to build request: {err}")))?;
        let (_, body) = self.send(request).await?;
        decode(&body)
    }

    async fn call<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        payload: &B,
    ) -> GatewayResult<ApiResponse> {
        let body = serde_json::to_vec(payload)
            .map_err(|err| GatewayError::decode(format!("failed to encode request: {err}")))?;
        let request = Request::builder()
            .method(method)
            .uri(self.uri(path)?)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(|err| GatewayError::transport(format!("failed to build request: {err}")))?;
        let (status, body) = self.send(request).await?;
        let envelope: ApiResponse = decode(&body)?;
        if envelope.status == Status::Error {
            return Err(GatewayError::Response {
                status: status.as_u16(),
                reason: envelope.message.unwrap_or_default(),
            });
        }
        Ok(envelope)
    }
}

#[async_trait]
impl PromptGateway for HttpGateway {
    async fn list_prompts(&self) -> GatewayResult<Vec<PromptRecord>> {
        self.get_json(routes::PROMPTS).await
    }

    async fn list_categories(&self) -> GatewayResult<Vec<CategoryLabel>> {
        self.get_json(routes::CATEGORIES).await
    }

    async fn add_prompt(&self, new: &NewPrompt) -> GatewayResult<PromptIndex> {
        self.call(Method::POST, routes::ADD, new)
            .await?
            .index
            .ok_or_else(|| GatewayError::decode("add response carried no index"))
    }

    async fn update_prompt(&self, record: &PromptRecord) -> GatewayResult<()> {
        self.call(Method::POST, routes::UPDATE, record).await?;
        Ok(())
    }

    async fn delete_prompt(&self, index: PromptIndex) -> GatewayResult<()> {
        self.call(Method::DELETE, routes::DELETE, &IndexRequest { index })
            .await?;
        Ok(())
    }

    async fn add_category(&self, category: &str) -> GatewayResult<()> {
        let payload = CategoryRequest {
            category: category.to_owned(),
        };
        self.call(Method::POST, routes::CATEGORY_ADD, &payload).await?;
        Ok(())
    }

    async fn delete_category(&self, category: &str) -> GatewayResult<()> {
        let payload = CategoryRequest {
            category: category.to_owned(),
        };
        self.call(Method::DELETE, routes::CATEGORY_DELETE, &payload)
            .await?;
        Ok(())
    }

    async fn upload_image(
        &self,
        index: PromptIndex,
        image: &ImageUpload,
    ) -> GatewayResult<String> {
        let mime = image
            .content_type()
            .parse::<Mime>()
            .map_err(|err| GatewayError::configuration(format!("invalid image type: {err}")))?;
        let mut form = multipart::Form::default();
        form.add_reader_file_with_mime(
            "file",
            Cursor::new(image.data().clone()),
            image.file_name(),
            mime,
        );
        form.add_text("index", index.to_string());

        let request = form
            .set_body_convert::<Body, multipart::Body>(Request::post(self.uri(routes::UPLOAD_IMAGE)?))
            .map_err(|err| GatewayError::transport(format!("failed to build request: {err}")))?;
        let (_, body) = self.send(request).await?;
        let envelope: ApiResponse = decode(&body)?;
        envelope
            .filename
            .ok_or_else(|| GatewayError::decode("upload response carried no filename"))
    }

    async fn fetch_image(&self, filename: &str) -> GatewayResult<Bytes> {
        let filename = validate_filename(filename)?;
        let request = Request::get(self.uri(&routes::image_path(filename))?)
            .body(Body::empty())
            .map_err(|err| GatewayError::transport(format!("failed to build request: {err}")))?;
        let (_, body) = self.send(request).await?;
        Ok(body)
    }

    async fn delete_image(&self, filename: &str) -> GatewayResult<()> {
        let payload = FilenameRequest {
            filename: filename.to_owned(),
        };
        self.call(Method::DELETE, routes::IMAGE_DELETE, &payload)
            .await?;
        Ok(())
    }

    async fn save_all(&self, prompts: &[PromptRecord]) -> GatewayResult<usize> {
        let payload = SaveRequest {
            prompts: prompts.to_vec(),
        };
        let envelope = self.call(Method::POST, routes::SAVE, &payload).await?;
        Ok(envelope.count.unwrap_or(prompts.len()))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> GatewayResult<T> {
    serde_json::from_slice(body).map_err(|err| GatewayError::decode(err.to_string()))
}

fn error_from_body(status: StatusCode, body: &[u8]) -> GatewayError {
    let reason = serde_json::from_slice::<ApiResponse>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_owned());
    GatewayError::Response {
        status: status.as_u16(),
        reason,
    }
}

fn sanitize_base_url(input: &str) -> GatewayResult<String> {
    let mut base = input.trim().to_owned();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(GatewayError::configuration(
            "backend URL must start with http:// or https://",
        ));
    }
    if !base.ends_with('/') {
        base.push('/');
    }
    base.parse::<Uri>()
        .map_err(|err| GatewayError::configuration(format!("invalid backend URL: {err}")))?;
    Ok(base)
}
