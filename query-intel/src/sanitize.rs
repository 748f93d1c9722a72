//! Tolerant extraction of a JSON object from model output.

/// Remove markdown fences and pre/post-text; extract the first JSON object.
/// Deliberately tolerant: we accept `{...}` anywhere in the string.
pub fn extract_json_object(s: &str) -> String {
    let no_fence = s
        .replace("```json", "")
        .replace("```", "")
        .replace('\u{feff}', "") // BOM
        .trim()
        .to_string();

    if let (Some(start), Some(end)) = (no_fence.find('{'), no_fence.rfind('}')) {
        if start < end {
            let candidate = &no_fence[start..=end];
            if candidate.contains(':') {
                return candidate.to_string();
            }
        }
    }
    // Fallback: return as-is; the caller will attempt a JSON parse and log.
    no_fence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_code_fences() {
        let raw = "```json\n{\"intent\": \"code\"}\n```";
        assert_eq!(extract_json_object(raw), "{\"intent\": \"code\"}");
    }

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let raw = "Sure! Here is the JSON you asked for:\n{\"intent\": \"news\"} Hope it helps.";
        assert_eq!(extract_json_object(raw), "{\"intent\": \"news\"}");
    }

    #[test]
    fn passes_through_plain_object() {
        let raw = r#"{"intent":"general","expanded_query":"x"}"#;
        assert_eq!(extract_json_object(raw), raw);
    }

    #[test]
    fn leaves_hopeless_input_for_the_parser() {
        assert_eq!(extract_json_object("no json here"), "no json here");
    }
}
