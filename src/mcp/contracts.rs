use serde_json::json;

pub const TOOL_GRAPH: &str = "graph";

pub const PROTOCOL_VERSION: &str = "2025-11-25";

pub const MIN_FUNCTIONS: usize = 1;
pub const MAX_FUNCTIONS: usize = 10;

pub const DEFAULT_TITLE: &str = "Function Graph";

pub fn graph_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "functions": {
                "type": "array",
                "items": { "type": "string" },
                "minItems": MIN_FUNCTIONS,
                "maxItems": MAX_FUNCTIONS,
                "description": "Functions to plot, in LaTeX form (e.g. \"y=x^2\", \"x=3\", \"\\\\sin(x)\")"
            },
            "title": {
                "type": "string",
                "description": "Page title for the graph",
                "default": DEFAULT_TITLE
            },
            "xMin": { "type": "number", "description": "Left edge of the viewport" },
            "xMax": { "type": "number", "description": "Right edge of the viewport" },
            "yMin": { "type": "number", "description": "Bottom edge of the viewport" },
            "yMax": { "type": "number", "description": "Top edge of the viewport" },
            "showGrid": { "type": "boolean", "default": true },
            "showKeypad": { "type": "boolean", "default": true },
            "showExpressions": { "type": "boolean", "default": true }
        },
        "required": ["functions"]
    })
}
