use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;
use tracing_subscriber::EnvFilter;

mod config;
mod document;
mod input;
mod mcp;
mod resource;
mod tools;

use config::{DEFAULT_API_KEY, DEFAULT_WIDGET_URL, EscapeMode, ServerConfig, WidgetConfig};

#[derive(Parser)]
#[command(name = "mcp-graph")]
#[command(
    version,
    about = "MCP server that plots functions in an interactive graphing calculator"
)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct GlobalOptions {
    /// Enable debug logging
    #[arg(
        long,
        global = true,
        env = "MCP_GRAPH_DEBUG",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    debug: bool,
    /// Graphing widget script endpoint
    #[arg(long, global = true, env = "MCP_GRAPH_WIDGET_URL", default_value = DEFAULT_WIDGET_URL)]
    widget_url: String,
    /// Graphing widget API key
    #[arg(long, global = true, env = "MCP_GRAPH_API_KEY", default_value = DEFAULT_API_KEY)]
    api_key: String,
    /// How titles and expressions are placed into the page
    #[arg(long, global = true, value_enum, env = "MCP_GRAPH_ESCAPE", default_value_t = EscapeMode::Permissive)]
    escape: EscapeMode,
}

impl GlobalOptions {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            debug: self.debug,
            widget: WidgetConfig::new(&self.widget_url, &self.api_key),
            escape: self.escape,
        }
    }
}

#[derive(Args, Clone)]
struct RenderArgs {
    /// Function to plot (repeatable, in order)
    #[arg(long = "function", allow_hyphen_values = true)]
    functions: Vec<String>,
    /// Page title
    #[arg(long)]
    title: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    x_min: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    x_max: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    y_min: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    y_max: Option<f64>,
    /// Show graph paper (true/false)
    #[arg(long)]
    show_grid: Option<bool>,
    /// Show the keypad (true/false)
    #[arg(long)]
    show_keypad: Option<bool>,
    /// Show the expression list (true/false)
    #[arg(long)]
    show_expressions: Option<bool>,
    /// Print the UI resource as JSON instead of HTML
    #[arg(long)]
    json: bool,
    /// Write the HTML document to this path
    #[arg(long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP stdio server
    Serve {
        /// Serve MCP over stdio (NDJSON)
        #[arg(long)]
        stdio: bool,
    },
    /// Render a graph page without starting the server
    Render(RenderArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.options.debug);
    let config = cli.options.server_config();

    match cli.command {
        Commands::Serve { stdio } => {
            if stdio {
                run_stdio_server(&config)
            } else {
                anyhow::bail!("only --stdio transport is supported")
            }
        }
        Commands::Render(args) => run_render(args, &config),
    }
}

fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_render(args: RenderArgs, config: &ServerConfig) -> Result<()> {
    let map = build_graph_args(&args);
    let request = match input::parse_graph_request(&Value::Object(map)) {
        Ok(request) => request,
        Err(err) => {
            eprintln!("{}", err.message);
            process::exit(1);
        }
    };

    let outcome = tools::graph::render(&request, config, &resource::RawHtmlFactory);
    let resource = outcome.resource();

    if let Some(path) = &args.output {
        fs::write(path, resource.html())
            .with_context(|| format!("failed to write output: {path}"))?;
        tracing::info!(path = %path, uri = %resource.uri, "graph written");
    }

    if args.json {
        let output = serde_json::to_string_pretty(resource)?;
        println!("{output}");
    } else if args.output.is_none() {
        print!("{}", resource.html());
    }
    Ok(())
}

fn build_graph_args(args: &RenderArgs) -> Map<String, Value> {
    let mut map = Map::new();
    if !args.functions.is_empty() {
        map.insert("functions".to_string(), json!(args.functions));
    }
    if let Some(title) = &args.title {
        map.insert("title".to_string(), json!(title));
    }
    let numbers = [
        ("xMin", args.x_min),
        ("xMax", args.x_max),
        ("yMin", args.y_min),
        ("yMax", args.y_max),
    ];
    for (name, value) in numbers {
        if let Some(value) = value {
            map.insert(name.to_string(), json!(value));
        }
    }
    let flags = [
        ("showGrid", args.show_grid),
        ("showKeypad", args.show_keypad),
        ("showExpressions", args.show_expressions),
    ];
    for (name, value) in flags {
        if let Some(value) = value {
            map.insert(name.to_string(), json!(value));
        }
    }
    map
}

fn run_stdio_server(config: &ServerConfig) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let reader = stdin.lock().lines();
    let mut writer = io::BufWriter::new(stdout.lock());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        debug = config.debug,
        escape = ?config.escape,
        "serving MCP over stdio"
    );

    for line in reader {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let request: serde_json::Value = match serde_json::from_str(&line) {
            Ok(value) => value,
            Err(err) => {
                let Some(id) = recover_message_id(&line) else {
                    tracing::warn!(error = %err, "skipping unparseable message");
                    continue;
                };
                tracing::warn!(error = %err, "replying with parse error");
                write_response(
                    &mut writer,
                    &json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "error": {
                            "code": mcp::errors::PARSE_ERROR,
                            "message": format!("parse error: {err}")
                        }
                    }),
                )?;
                continue;
            }
        };

        let method = request.get("method").and_then(|value| value.as_str());
        let id = request.get("id").filter(|id| !id.is_null()).cloned();
        tracing::debug!(method = ?method, "received message");

        let response = match (method, id) {
            (Some("initialize"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "protocolVersion": mcp::contracts::PROTOCOL_VERSION,
                    "capabilities": {
                        "tools": {}
                    },
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }
            })),
            (Some("ping"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {}
            })),
            (Some("tools/list"), Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": {
                    "tools": mcp::tool_definitions()
                }
            })),
            (Some("tools/call"), Some(id)) => {
                let result = handle_tool_call(&request, config);
                Some(json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": result
                }))
            }
            (method, Some(id)) => Some(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {
                    "code": mcp::errors::METHOD_NOT_FOUND,
                    "message": format!("method not found: {}", method.unwrap_or(""))
                }
            })),
            _ => None,
        };

        if let Some(response) = response {
            write_response(&mut writer, &response)?;
        }
    }

    tracing::info!("stdin closed; shutting down");
    Ok(())
}

fn write_response(writer: &mut impl Write, response: &Value) -> Result<()> {
    let serialized = serde_json::to_string(response).context("failed to serialize response")?;
    writeln!(writer, "{serialized}").context("failed to write response")?;
    writer.flush().context("failed to flush response")?;
    Ok(())
}

#[derive(Deserialize)]
struct MessageId {
    #[serde(default)]
    id: Option<Value>,
}

/// Pulls the `id` out of a line that failed full parsing (e.g. an out-of-range
/// number elsewhere in the message). Other fields are skipped without being decoded.
fn recover_message_id(line: &str) -> Option<Value> {
    serde_json::from_str::<MessageId>(line)
        .ok()
        .and_then(|message| message.id)
        .filter(|id| !id.is_null())
}

fn handle_tool_call(request: &serde_json::Value, config: &ServerConfig) -> serde_json::Value {
    let params = request.get("params");
    let Some(params) = params.and_then(|value| value.as_object()) else {
        return tools::error_result(mcp::errors::INVALID_INPUT, "params must be an object", None);
    };

    let name = params.get("name").and_then(|value| value.as_str());
    let Some(name) = name else {
        return tools::error_result(
            mcp::errors::INVALID_INPUT,
            "params.name must be a string",
            None,
        );
    };

    let args = params
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    match name {
        mcp::contracts::TOOL_GRAPH => tools::graph::call(&args, config),
        _ => tools::error_result(
            mcp::errors::INVALID_INPUT,
            format!("tool not implemented: {name}"),
            Some(name),
        ),
    }
}
