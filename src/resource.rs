use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

pub const URI_SCHEME: &str = "ui://";
pub const GRAPH_URI_PREFIX: &str = "ui://desmos-graph/";
pub const ERROR_URI: &str = "ui://desmos-graph/error";
pub const HTML_MIME_TYPE: &str = "text/html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UiContent {
    #[serde(rename_all = "camelCase")]
    RawHtml { html_string: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Encoding {
    Blob,
}

/// A renderable document addressed by a `ui://` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UiResource {
    pub uri: String,
    pub content: UiContent,
    pub encoding: Encoding,
}

impl UiResource {
    /// Blob-encoded raw HTML, without any validation.
    pub fn raw_html(uri: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            content: UiContent::RawHtml {
                html_string: html.into(),
            },
            encoding: Encoding::Blob,
        }
    }

    pub fn html(&self) -> &str {
        match &self.content {
            UiContent::RawHtml { html_string } => html_string,
        }
    }

    /// The `resource` content item carried in a tool result.
    pub fn to_content_item(&self) -> Value {
        let resource = match self.encoding {
            Encoding::Blob => json!({
                "uri": self.uri,
                "mimeType": HTML_MIME_TYPE,
                "blob": STANDARD.encode(self.html()),
            }),
        };
        json!({
            "type": "resource",
            "resource": resource
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("resource uri must start with ui:// (got {0})")]
    InvalidUri(String),
    #[error("resource document is empty")]
    EmptyDocument,
}

/// Packages an HTML document as a UI resource.
pub trait ResourceFactory {
    fn create(&self, uri: &str, html: String) -> Result<UiResource, ResourceError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RawHtmlFactory;

impl ResourceFactory for RawHtmlFactory {
    fn create(&self, uri: &str, html: String) -> Result<UiResource, ResourceError> {
        if !uri.starts_with(URI_SCHEME) {
            return Err(ResourceError::InvalidUri(uri.to_string()));
        }
        if html.trim().is_empty() {
            return Err(ResourceError::EmptyDocument);
        }
        Ok(UiResource::raw_html(uri, html))
    }
}

pub fn graph_uri(timestamp_millis: i64) -> String {
    format!("{GRAPH_URI_PREFIX}{timestamp_millis}")
}
