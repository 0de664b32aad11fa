use serde_json::Value;

/// Flattens an editor document to plain text for indexing/embedding.
///
/// The editor persists a JSON tree whose leaves are `"text"`-typed nodes;
/// container nodes carry an ordered `children` array. Leaf texts are
/// concatenated depth-first with no separator. Input that does not parse
/// as JSON is treated as already-plain text and returned verbatim.
/// Malformed nodes contribute nothing; this never fails.
pub fn extract_plain_text(content: &str) -> String {
    let parsed: Value = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) => return content.to_string(),
    };
    let mut out = String::new();
    match parsed.get("root") {
        Some(root) => walk(root, &mut out),
        None => walk(&parsed, &mut out),
    }
    out
}

fn walk(node: &Value, out: &mut String) {
    if node.get("type").and_then(Value::as_str) == Some("text") {
        if let Some(text) = node.get("text").and_then(Value::as_str) {
            out.push_str(text);
            return;
        }
    }
    if let Some(children) = node.get("children").and_then(Value::as_array) {
        for child in children {
            walk(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_text_leaves_in_document_order() {
        let doc = r#"{"root":{"children":[{"type":"paragraph","children":[
            {"type":"text","text":"Hello"},{"type":"text","text":" world"}
        ]}]}}"#;
        assert_eq!(extract_plain_text(doc), "Hello world");
    }

    #[test]
    fn nested_containers_flatten_depth_first() {
        let doc = r#"{"root":{"children":[
            {"type":"heading","children":[{"type":"text","text":"A"}]},
            {"type":"list","children":[
                {"type":"listitem","children":[{"type":"text","text":"B"}]},
                {"type":"listitem","children":[{"type":"text","text":"C"}]}
            ]}
        ]}}"#;
        assert_eq!(extract_plain_text(doc), "ABC");
    }

    #[test]
    fn non_json_input_is_returned_verbatim() {
        assert_eq!(extract_plain_text("just some prose"), "just some prose");
    }

    #[test]
    fn json_without_root_is_walked_directly() {
        let doc = r#"{"children":[{"type":"text","text":"loose"}]}"#;
        assert_eq!(extract_plain_text(doc), "loose");
    }

    #[test]
    fn malformed_nodes_contribute_nothing() {
        let doc = r#"{"root":{"children":[
            {"type":"text"},
            {"type":"image","src":"x.png"},
            {"type":"text","text":"kept"},
            {"children":"not-an-array"}
        ]}}"#;
        assert_eq!(extract_plain_text(doc), "kept");
    }

    #[test]
    fn extraction_is_deterministic() {
        let doc = r#"{"root":{"children":[{"type":"text","text":"stable"}]}}"#;
        assert_eq!(extract_plain_text(doc), extract_plain_text(doc));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(extract_plain_text(""), "");
    }
}
