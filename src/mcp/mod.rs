use serde_json::json;

pub mod contracts;
pub mod errors;

pub fn tool_definitions() -> Vec<serde_json::Value> {
    vec![json!({
        "name": contracts::TOOL_GRAPH,
        "description": "Plot one or more mathematical functions in an interactive graphing calculator. \
                        Bounds are applied only when xMin, xMax, yMin and yMax are all given.",
        "inputSchema": contracts::graph_schema()
    })]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_tool_is_listed_with_schema() {
        let tools = tool_definitions();
        assert_eq!(tools.len(), 1);
        let tool = &tools[0];
        assert_eq!(tool["name"], "graph");
        let schema = &tool["inputSchema"];
        assert_eq!(schema["required"], json!(["functions"]));
        assert_eq!(schema["properties"]["functions"]["minItems"], 1);
        assert_eq!(schema["properties"]["functions"]["maxItems"], 10);
        assert_eq!(schema["properties"]["title"]["default"], "Function Graph");
    }
}
