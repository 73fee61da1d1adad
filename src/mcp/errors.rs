pub const INVALID_INPUT: &str = "invalid_input";

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
