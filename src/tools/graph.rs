use crate::config::ServerConfig;
use crate::document;
use crate::input::{GraphRequest, parse_graph_request};
use crate::resource::{self, ERROR_URI, RawHtmlFactory, ResourceFactory, UiResource};
use crate::tools::error_result;
use chrono::Utc;
use serde_json::{Value, json};

pub const FALLBACK_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Result of one graph call. Both variants are successful tool responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphOutcome {
    Rendered(UiResource),
    RenderedError(UiResource),
}

impl GraphOutcome {
    pub fn resource(&self) -> &UiResource {
        match self {
            GraphOutcome::Rendered(resource) | GraphOutcome::RenderedError(resource) => resource,
        }
    }

    pub fn into_tool_result(self) -> Value {
        let resource = self.resource();
        json!({
            "content": [resource.to_content_item()],
            "structuredContent": {
                "uri": resource.uri,
                "encoding": resource.encoding
            },
            "isError": false
        })
    }
}

pub fn call(args: &Value, config: &ServerConfig) -> Value {
    let request = match parse_graph_request(args) {
        Ok(request) => request,
        Err(err) => return error_result(err.kind, err.message, None),
    };

    render(&request, config, &RawHtmlFactory).into_tool_result()
}

pub fn render(
    request: &GraphRequest,
    config: &ServerConfig,
    factory: &impl ResourceFactory,
) -> GraphOutcome {
    let html = document::graph_document(request, &config.widget, config.escape);
    let uri = resource::graph_uri(Utc::now().timestamp_millis());

    match factory.create(&uri, html) {
        Ok(resource) => {
            tracing::debug!(
                uri = %resource.uri,
                functions = request.functions.len(),
                "graph rendered"
            );
            GraphOutcome::Rendered(resource)
        }
        Err(err) => {
            tracing::warn!(error = %err, "graph construction failed; returning error page");
            recover(&err.to_string(), config)
        }
    }
}

fn recover(message: &str, config: &ServerConfig) -> GraphOutcome {
    let message = if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE
    } else {
        message
    };
    let html = document::error_document(message, config.escape);
    GraphOutcome::RenderedError(UiResource::raw_html(ERROR_URI, html))
}
