use crate::mcp::contracts::{DEFAULT_TITLE, MAX_FUNCTIONS, MIN_FUNCTIONS};
use crate::mcp::errors;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphRequest {
    pub functions: Vec<String>,
    pub title: String,
    pub bounds: Option<ViewportBounds>,
    pub show_grid: bool,
    pub show_keypad: bool,
    pub show_expressions: bool,
}

impl GraphRequest {
    pub fn new(functions: Vec<String>) -> Self {
        Self {
            functions,
            title: DEFAULT_TITLE.to_string(),
            bounds: None,
            show_grid: true,
            show_keypad: true,
            show_expressions: true,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct InputError {
    pub kind: &'static str,
    pub message: String,
}

impl InputError {
    fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: errors::INVALID_INPUT,
            message: message.into(),
        }
    }
}

pub fn parse_graph_request(args: &Value) -> Result<GraphRequest, InputError> {
    let obj = args
        .as_object()
        .ok_or_else(|| InputError::invalid_input("arguments must be an object"))?;

    let mut request = GraphRequest::new(parse_functions(field(obj, "functions"))?);
    if let Some(title) = parse_string(obj, "title")? {
        request.title = title;
    }

    let x_min = parse_number(obj, "xMin")?;
    let x_max = parse_number(obj, "xMax")?;
    let y_min = parse_number(obj, "yMin")?;
    let y_max = parse_number(obj, "yMax")?;
    request.bounds = match (x_min, x_max, y_min, y_max) {
        (Some(x_min), Some(x_max), Some(y_min), Some(y_max)) => Some(ViewportBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }),
        (None, None, None, None) => None,
        _ => {
            tracing::debug!("partial viewport bounds ignored");
            None
        }
    };

    if let Some(show_grid) = parse_bool(obj, "showGrid")? {
        request.show_grid = show_grid;
    }
    if let Some(show_keypad) = parse_bool(obj, "showKeypad")? {
        request.show_keypad = show_keypad;
    }
    if let Some(show_expressions) = parse_bool(obj, "showExpressions")? {
        request.show_expressions = show_expressions;
    }

    Ok(request)
}

/// Looks up a field, treating an explicit `null` as absent.
fn field<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    obj.get(name).filter(|value| !value.is_null())
}

fn parse_functions(value: Option<&Value>) -> Result<Vec<String>, InputError> {
    let Some(value) = value else {
        return Err(InputError::invalid_input("functions is required"));
    };
    let Some(items) = value.as_array() else {
        return Err(InputError::invalid_input("functions must be an array"));
    };
    if items.len() < MIN_FUNCTIONS || items.len() > MAX_FUNCTIONS {
        return Err(InputError::invalid_input(format!(
            "functions must contain {MIN_FUNCTIONS} to {MAX_FUNCTIONS} entries (got {})",
            items.len()
        )));
    }
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                InputError::invalid_input(format!("functions[{index}] must be a string"))
            })
        })
        .collect()
}

fn parse_string(obj: &Map<String, Value>, name: &str) -> Result<Option<String>, InputError> {
    let Some(value) = field(obj, name) else {
        return Ok(None);
    };
    value
        .as_str()
        .map(|text| Some(text.to_string()))
        .ok_or_else(|| InputError::invalid_input(format!("{name} must be a string")))
}

fn parse_number(obj: &Map<String, Value>, name: &str) -> Result<Option<f64>, InputError> {
    let Some(value) = field(obj, name) else {
        return Ok(None);
    };
    value
        .as_f64()
        .map(Some)
        .ok_or_else(|| InputError::invalid_input(format!("{name} must be a number")))
}

fn parse_bool(obj: &Map<String, Value>, name: &str) -> Result<Option<bool>, InputError> {
    let Some(value) = field(obj, name) else {
        return Ok(None);
    };
    value
        .as_bool()
        .map(Some)
        .ok_or_else(|| InputError::invalid_input(format!("{name} must be a boolean")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_applied() {
        let request = parse_graph_request(&json!({"functions": ["y=x"]})).expect("request");
        assert_eq!(request.functions, vec!["y=x".to_string()]);
        assert_eq!(request.title, "Function Graph");
        assert_eq!(request.bounds, None);
        assert!(request.show_grid);
        assert!(request.show_keypad);
        assert!(request.show_expressions);
    }

    #[test]
    fn all_bounds_applied() {
        let args = json!({
            "functions": ["y=x"],
            "xMin": -5, "xMax": 5, "yMin": -2.5, "yMax": 2.5
        });
        let request = parse_graph_request(&args).expect("request");
        assert_eq!(
            request.bounds,
            Some(ViewportBounds {
                x_min: -5.0,
                x_max: 5.0,
                y_min: -2.5,
                y_max: 2.5
            })
        );
    }

    #[test]
    fn three_of_four_bounds_dropped() {
        let args = json!({"functions": ["y=x"], "xMin": -5, "xMax": 5, "yMin": -5});
        let request = parse_graph_request(&args).expect("request");
        assert_eq!(request.bounds, None);
    }

    #[test]
    fn flags_and_title_respected() {
        let args = json!({
            "functions": ["y=x"],
            "title": "Wave",
            "showGrid": false,
            "showKeypad": false,
            "showExpressions": null
        });
        let request = parse_graph_request(&args).expect("request");
        assert_eq!(request.title, "Wave");
        assert!(!request.show_grid);
        assert!(!request.show_keypad);
        assert!(request.show_expressions);
    }

    #[test]
    fn missing_functions() {
        let err = parse_graph_request(&json!({})).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
        assert!(err.message.contains("required"));
    }

    #[test]
    fn empty_functions() {
        let err = parse_graph_request(&json!({"functions": []})).expect_err("error");
        assert_eq!(err.kind, errors::INVALID_INPUT);
    }

    #[test]
    fn too_many_functions() {
        let functions: Vec<String> = (0..11).map(|i| format!("y={i}")).collect();
        let err = parse_graph_request(&json!({ "functions": functions })).expect_err("error");
        assert!(err.message.contains("got 11"));
    }

    #[test]
    fn ten_functions_accepted() {
        let functions: Vec<String> = (0..10).map(|i| format!("y={i}")).collect();
        let request = parse_graph_request(&json!({ "functions": functions })).expect("request");
        assert_eq!(request.functions.len(), 10);
    }

    #[test]
    fn non_string_function() {
        let err = parse_graph_request(&json!({"functions": ["y=x", 3]})).expect_err("error");
        assert_eq!(err.message, "functions[1] must be a string");
    }

    #[test]
    fn wrong_bound_type() {
        let args = json!({"functions": ["y=x"], "xMin": "left"});
        let err = parse_graph_request(&args).expect_err("error");
        assert_eq!(err.message, "xMin must be a number");
    }

    #[test]
    fn arguments_not_object() {
        let err = parse_graph_request(&json!(["y=x"])).expect_err("error");
        assert_eq!(err.to_string(), "invalid_input: arguments must be an object");
    }
}
