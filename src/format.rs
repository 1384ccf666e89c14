//! Cosmetic shaping of streamed tool arguments.
//!
//! Streaming fragments carry raw argument text (often partial JSON). For the
//! known tool families the panel shows a tag-wrapped form instead, so the
//! detail view reads like the persisted transcript. This is display shaping
//! only; nothing downstream parses the shaped text.

use serde_json::Value;

/// Tool families whose raw arguments get tag-wrapped for display.
pub const SHAPED_FAMILIES: [&str; 5] = [
    "execute-command",
    "create-file",
    "delete-file",
    "full-file-rewrite",
    "edit-file",
];

/// Shape raw streamed arguments for display.
///
/// Arguments that already look tag-wrapped pass through untouched, as does
/// any tool outside the known families. For shell execution the `command`
/// field becomes the tag body; for the file family a `file_path` argument
/// becomes a tag attribute.
pub fn shape_arguments(tool_name: &str, arguments: &str) -> String {
    if !SHAPED_FAMILIES.contains(&tool_name) {
        return arguments.to_string();
    }
    if arguments.trim_start().starts_with('<') {
        return arguments.to_string();
    }

    let parsed: Option<Value> = serde_json::from_str(arguments).ok();
    match tool_name {
        "execute-command" => {
            let body = parsed
                .as_ref()
                .and_then(|v| v.get("command"))
                .and_then(|v| v.as_str())
                .unwrap_or(arguments);
            format!("<execute-command>{body}</execute-command>")
        }
        _ => {
            let path = parsed
                .as_ref()
                .and_then(|v| v.get("file_path").or_else(|| v.get("path")))
                .and_then(|v| v.as_str());
            let body = parsed
                .as_ref()
                .and_then(|v| v.get("file_contents").or_else(|| v.get("contents")))
                .and_then(|v| v.as_str())
                .unwrap_or(arguments);
            match path {
                Some(path) => format!("<{tool_name} file_path=\"{path}\">{body}</{tool_name}>"),
                None => format!("<{tool_name}>{body}</{tool_name}>"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_passes_through() {
        assert_eq!(shape_arguments("web-search", r#"{"query": "x"}"#), r#"{"query": "x"}"#);
    }

    #[test]
    fn test_already_wrapped_passes_through() {
        let wrapped = "<execute-command>ls</execute-command>";
        assert_eq!(shape_arguments("execute-command", wrapped), wrapped);
    }

    #[test]
    fn test_execute_command_extracts_command() {
        let shaped = shape_arguments("execute-command", r#"{"command": "cargo build"}"#);
        assert_eq!(shaped, "<execute-command>cargo build</execute-command>");
    }

    #[test]
    fn test_execute_command_partial_json_wraps_raw() {
        let shaped = shape_arguments("execute-command", r#"{"comma"#);
        assert_eq!(shaped, r#"<execute-command>{"comma</execute-command>"#);
    }

    #[test]
    fn test_create_file_with_path_attribute() {
        let shaped = shape_arguments(
            "create-file",
            r#"{"file_path": "src/index.html", "file_contents": "<html/>"}"#,
        );
        assert_eq!(
            shaped,
            "<create-file file_path=\"src/index.html\"><html/></create-file>"
        );
    }

    #[test]
    fn test_delete_file_without_path_wraps_raw() {
        let shaped = shape_arguments("delete-file", "old.txt");
        assert_eq!(shaped, "<delete-file>old.txt</delete-file>");
    }
}
