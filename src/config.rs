use clap::ValueEnum;

pub const DEFAULT_WIDGET_URL: &str = "https://www.desmos.com/api/v1.11/calculator.js";
/// Public demo key published with the widget's API documentation.
pub const DEFAULT_API_KEY: &str = "dcb31709b452b1cf9dc26972add0fda6";

/// How caller-supplied text is placed into the generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EscapeMode {
    /// Interpolate titles, expressions and error messages verbatim.
    #[default]
    Permissive,
    /// Escape HTML text and script string literals.
    Strict,
}

/// Location of the remote graphing widget script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl WidgetConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    pub fn script_url(&self) -> String {
        format!("{}?apiKey={}", self.endpoint, self.api_key)
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WIDGET_URL, DEFAULT_API_KEY)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Connection-time debug switch. Only affects log verbosity.
    pub debug: bool,
    pub widget: WidgetConfig,
    pub escape: EscapeMode,
}
