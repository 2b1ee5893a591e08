//! File API contract and its HTTP implementation.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | [`FileApi::info`] | `GET {prefix}/{path}?info` → JSON [`FileEntry`] |
//! | [`FileApi::read`] | `GET {prefix}/{path}` → [`Content`] |
//! | [`FileApi::read_url`] | `GET {url}` (entry URLs, description URLs) |
//! | [`FileApi::create`] | `POST {prefix}/{path}` without body → new directory |
//! | [`FileApi::delete`] | `DELETE {prefix}/{path}` |
//! | [`FileApi::upload`] | `POST {prefix}/{dir}` multipart, field `file` |
//!
//! Any non-2xx response becomes [`AppError::Http`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, warn};

use super::entry::FileEntry;
use super::ApiBase;
use crate::error::{AppError, Result};

/// Object-safe boxed future returned by [`FileApi`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// `application/json`: parsed.
    Json(serde_json::Value),
    /// `text/json`: handed back verbatim.
    Text(String),
    /// Anything else: raw payload.
    Bytes(Vec<u8>),
}

impl Content {
    /// Best-effort text view of the body.
    pub fn into_text(self) -> String {
        match self {
            Content::Json(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
            Content::Text(text) => text,
            Content::Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(s) => s,
                Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
            },
        }
    }

    /// Raw bytes of the body (JSON is re-serialized).
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Content::Json(value) => value.to_string().into_bytes(),
            Content::Text(text) => text.into_bytes(),
            Content::Bytes(bytes) => bytes,
        }
    }
}

/// Pick a decoding from the response `Content-Type`.
pub fn decode_content(content_type: Option<&str>, body: Vec<u8>) -> Result<Content> {
    let content_type = content_type.unwrap_or("");
    if content_type.starts_with("application/json") {
        return Ok(Content::Json(serde_json::from_slice(&body)?));
    }
    if content_type.starts_with("text/json") {
        return Ok(Content::Text(match String::from_utf8(body) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }));
    }
    Ok(Content::Bytes(body))
}

/// Interpret an `?info` body as a listing.
pub fn decode_listing(content: Content) -> Result<FileEntry> {
    match content {
        Content::Json(value) => Ok(serde_json::from_value(value)?),
        Content::Text(text) => Ok(serde_json::from_str(&text)?),
        Content::Bytes(bytes) => Ok(serde_json::from_slice(&bytes)?),
    }
}

/// Remote file service used by the browser.
pub trait FileApi: Send + Sync {
    /// Fetch the listing (or single-file info) for `path`.
    fn info<'a>(&'a self, path: &'a str) -> ApiFuture<'a, FileEntry>;

    /// Fetch the raw content of `path`.
    fn read<'a>(&'a self, path: &'a str) -> ApiFuture<'a, Content>;

    /// Fetch an absolute URL previously derived from a listing.
    fn read_url<'a>(&'a self, url: &'a str) -> ApiFuture<'a, Content>;

    /// Create a directory at `path`.
    fn create<'a>(&'a self, path: &'a str) -> ApiFuture<'a, ()>;

    /// Delete the file or directory at `path`.
    fn delete<'a>(&'a self, path: &'a str) -> ApiFuture<'a, ()>;

    /// Upload `bytes` as `file_name` into directory `dir`.
    fn upload<'a>(
        &'a self,
        dir: &'a str,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> ApiFuture<'a, ()>;
}

/// [`FileApi`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFileApi {
    client: Client,
    base: ApiBase,
}

impl HttpFileApi {
    pub fn new(base: ApiBase, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    fn info_url(&self, path: &str) -> Result<Url> {
        let mut url = self.base.request_url(path)?;
        url.set_query(Some("info"));
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Content> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "file api request failed");
            return Err(AppError::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();
        debug!(%url, bytes = body.len(), content_type = ?content_type, "file api response");
        decode_content(content_type.as_deref(), body)
    }
}

impl FileApi for HttpFileApi {
    fn info<'a>(&'a self, path: &'a str) -> ApiFuture<'a, FileEntry> {
        Box::pin(async move {
            let content = self.send(self.client.get(self.info_url(path)?)).await?;
            decode_listing(content)
        })
    }

    fn read<'a>(&'a self, path: &'a str) -> ApiFuture<'a, Content> {
        Box::pin(async move { self.send(self.client.get(self.base.request_url(path)?)).await })
    }

    fn read_url<'a>(&'a self, url: &'a str) -> ApiFuture<'a, Content> {
        Box::pin(async move { self.send(self.client.get(self.base.resolve_url(url)?)).await })
    }

    fn create<'a>(&'a self, path: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.send(self.client.post(self.base.request_url(path)?)).await?;
            Ok(())
        })
    }

    fn delete<'a>(&'a self, path: &'a str) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            self.send(self.client.delete(self.base.request_url(path)?)).await?;
            Ok(())
        })
    }

    fn upload<'a>(
        &'a self,
        dir: &'a str,
        file_name: &'a str,
        bytes: Vec<u8>,
    ) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let part = Part::bytes(bytes).file_name(file_name.to_string());
            let form = Form::new().part("file", part);
            self.send(self.client.post(self.base.request_url(dir)?).multipart(form))
                .await?;
            Ok(())
        })
    }
}
