//! System Prompt Builder Tests

use serde_json::json;
use toolfence::{PromptOptions, SystemPromptBuilder, ToolDefinition};

fn tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_weather".to_string(),
            description: Some("Look up the current weather".to_string()),
            input_schema: Some(json!({
                "type": "object",
                "properties": {"city": {"type": "string"}},
                "required": ["city"]
            })),
        },
        ToolDefinition::new("undocumented"),
    ]
}

#[test]
fn test_empty_tool_list_is_identity() {
    let builder = SystemPromptBuilder::default();
    assert_eq!(builder.build(None, &[]), "");
    assert_eq!(builder.build(Some("Original"), &[]), "Original");
    assert_eq!(builder.build(Some("  \n \t"), &[]), "");
}

#[test]
fn test_prompt_names_exact_fence_tokens() {
    let prompt = SystemPromptBuilder::default().build(None, &tools());
    assert!(prompt.contains("```tool_call"));
    assert!(prompt.contains("```tool_result"));
}

#[test]
fn test_tool_listing() {
    let prompt = SystemPromptBuilder::default().build(None, &tools());
    assert!(prompt.contains("get_weather"));
    assert!(prompt.contains("Look up the current weather"));
    assert!(prompt.contains(r#""required":["city"]"#));
    assert!(prompt.contains("undocumented"));
    assert!(prompt.contains("No description provided."));

    // Declaration order is preserved in the listing.
    let first = prompt.find("get_weather").unwrap();
    let second = prompt.find("undocumented").unwrap();
    assert!(first < second);
}

#[test]
fn test_sequential_default() {
    let prompt = SystemPromptBuilder::default().build(None, &tools());
    assert!(prompt.contains("at most one tool at a time"));
    assert!(!prompt.contains("second_tool"));
}

#[test]
fn test_parallel_option_includes_two_call_example() {
    let builder = SystemPromptBuilder::new(PromptOptions {
        allow_parallel_tool_calls: true,
    });
    let prompt = builder.build(None, &tools());
    assert!(prompt.contains("first_tool"));
    assert!(prompt.contains("second_tool"));
    assert!(!prompt.contains("at most one tool at a time"));
}

#[test]
fn test_prior_prompt_prepended_trimmed() {
    let prompt = SystemPromptBuilder::default().build(Some("  Be terse.  "), &tools());
    assert!(prompt.starts_with("Be terse.\n\n"));
    assert!(prompt.contains("```tool_call"));
}

#[test]
fn test_result_field_documentation() {
    let prompt = SystemPromptBuilder::default().build(None, &tools());
    for field in ["`id`", "`name`", "`result`", "`error`"] {
        assert!(prompt.contains(field), "missing {}", field);
    }
    assert!(prompt.contains("boolean"));
}
