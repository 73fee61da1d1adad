use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn cli_render_prints_html() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-graph"))
        .args([
            "render",
            "--function",
            "y=x^2",
            "--function",
            "x=3",
            "--x-min",
            "-10",
            "--x-max",
            "10",
            "--y-min",
            "-1",
            "--y-max",
            "20",
            "--show-keypad",
            "false",
        ])
        .output()?;

    assert!(output.status.success());
    let html = String::from_utf8(output.stdout)?;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Function Graph</title>"));
    assert!(html.contains("keypad: false,"));
    assert!(html.contains("calculator.setMathBounds({ left: -10, right: 10, bottom: -1, top: 20 });"));
    assert!(html.contains("calculator.setExpression({ id: 'function0', latex: 'x^2' });"));
    assert!(html.contains("calculator.setExpression({ id: 'function1', latex: 'x=3' });"));
    Ok(())
}

#[test]
fn cli_render_json_and_output_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let file_path = dir.path().join("graph.html");

    let output = Command::new(env!("CARGO_BIN_EXE_mcp-graph"))
        .args([
            "render",
            "--function",
            "y=cos(x)",
            "--title",
            "Cosine",
            "--json",
            "--output",
            file_path.to_string_lossy().as_ref(),
        ])
        .output()?;

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value.get("encoding").and_then(|v| v.as_str()), Some("blob"));
    assert_eq!(
        value
            .get("content")
            .and_then(|content| content.get("type"))
            .and_then(|v| v.as_str()),
        Some("rawHtml")
    );
    let html = value
        .get("content")
        .and_then(|content| content.get("htmlString"))
        .and_then(|v| v.as_str())
        .expect("htmlString present");
    assert!(html.contains("<title>Cosine</title>"));
    assert_eq!(fs::read_to_string(&file_path)?, html);
    Ok(())
}

#[test]
fn cli_render_requires_functions() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-graph"))
        .arg("render")
        .output()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("functions is required"));
    Ok(())
}

#[test]
fn serve_requires_stdio_flag() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-graph"))
        .arg("serve")
        .output()?;

    assert!(!output.status.success());
    Ok(())
}

#[test]
fn debug_env_accepts_numeric_switch() -> Result<(), Box<dyn std::error::Error>> {
    for value in ["1", "0", "yes", "true"] {
        let output = Command::new(env!("CARGO_BIN_EXE_mcp-graph"))
            .env("MCP_GRAPH_DEBUG", value)
            .args(["render", "--function", "y=x"])
            .output()?;

        assert!(output.status.success(), "MCP_GRAPH_DEBUG={value} failed");
        let html = String::from_utf8(output.stdout)?;
        assert!(html.contains("calculator.setExpression({ id: 'function0', latex: 'x' });"));
    }
    Ok(())
}
