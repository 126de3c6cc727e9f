//! Result Formatter Tests

use serde_json::json;
use toolfence::{ToolCallParser, ToolResult, ToolResultFormatter};

fn sample(id: Option<&str>, name: &str) -> ToolResult {
    ToolResult {
        tool_call_id: id.map(String::from),
        tool_name: name.to_string(),
        result: Some(json!({"ok": true})),
        is_error: false,
    }
}

#[test]
fn test_single_result_fence() {
    let text = ToolResultFormatter::format_results(&[ToolResult {
        tool_call_id: Some("1".to_string()),
        tool_name: "t".to_string(),
        result: Some(json!({"x": 1})),
        is_error: false,
    }]);

    assert!(text.starts_with("```tool_result\n"));
    assert!(text.ends_with("\n```"));
    assert!(text.contains(r#""id":"1""#));
    assert!(text.contains(r#""name":"t""#));
    assert!(text.contains(r#""result":{"x":1}"#));
    assert!(text.contains(r#""error":false"#));
}

#[test]
fn test_one_line_per_record() {
    let text =
        ToolResultFormatter::format_results(&[sample(Some("1"), "a"), sample(None, "b")]);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "```tool_result");
    assert!(lines[1].contains(r#""name":"a""#));
    assert!(lines[2].contains(r#""name":"b""#));
    assert!(!lines[2].contains(r#""id""#));
    assert_eq!(lines[3], "```");
}

#[test]
fn test_empty_input_no_fence() {
    let text = ToolResultFormatter::format_results(&[]);
    assert_eq!(text, "");
    assert!(!text.contains("```"));
}

#[test]
fn test_format_result_matches_batch_of_one() {
    let record = sample(Some("7"), "solo");
    assert_eq!(
        ToolResultFormatter::format_result(&record),
        ToolResultFormatter::format_results(std::slice::from_ref(&record))
    );
}

#[test]
fn test_extraction_roundtrip_recovers_line_set() {
    let results = vec![
        sample(Some("1"), "first"),
        ToolResult {
            tool_call_id: None,
            tool_name: "second".to_string(),
            result: None,
            is_error: true,
        },
    ];
    let formatted = ToolResultFormatter::format_results(&results);

    // Re-extracting the fence from surrounding conversation text recovers
    // the exact serialized line set.
    let conversation = format!("assistant said things\n{}\nmore text", formatted);
    let span = ToolCallParser::default()
        .extract_fence(&conversation)
        .unwrap();
    assert_eq!(span, formatted);

    let inner: Vec<&str> = span.lines().skip(1).take(results.len()).collect();
    let original: Vec<&str> = formatted.lines().skip(1).take(results.len()).collect();
    assert_eq!(inner, original);
}
