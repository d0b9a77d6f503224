//! Read access over the loosely-typed parameter bag.
//!
//! Slot values arrive as strings, numbers, arrays of either, or objects;
//! unfilled slots are usually `""` or absent. These helpers flatten that
//! into "a non-empty trimmed string, or nothing".

use serde_json::{Map, Value};

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy)]
pub struct ParamBag<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> ParamBag<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        ParamBag { map }
    }

    /// Raw value under `key`, skipping JSON nulls.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Trimmed, non-empty text under `key` (first element if it's an array).
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| scalar_text(pick_first(v)))
    }

    /// Text of the first key that has any.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.text(key))
    }
}

/// Arrays stand for "one or more"; only the first entry is used.
pub fn pick_first(value: &Value) -> &Value {
    match value {
        Value::Array(items) => items.first().unwrap_or(&NULL),
        other => other,
    }
}

/// Strings, numbers and booleans as trimmed text. Objects and empties give None.
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn scalars_and_arrays() {
        let map = bag(json!({
            "title": "  Quiz 2 ",
            "number": 3,
            "list": ["first", "second"],
            "empty": "",
            "blank_list": [],
            "nothing": null,
            "obj": { "a": 1 }
        }));
        let params = ParamBag::new(&map);
        assert_eq!(params.text("title").as_deref(), Some("Quiz 2"));
        assert_eq!(params.text("number").as_deref(), Some("3"));
        assert_eq!(params.text("list").as_deref(), Some("first"));
        assert_eq!(params.text("empty"), None);
        assert_eq!(params.text("blank_list"), None);
        assert_eq!(params.text("nothing"), None);
        assert_eq!(params.text("obj"), None);
        assert_eq!(params.text("missing"), None);
        assert!(params.get("nothing").is_none());
    }

    #[test]
    fn first_text_skips_empty_candidates() {
        let map = bag(json!({ "title": "", "task": [""], "tugas": "Laporan" }));
        let params = ParamBag::new(&map);
        assert_eq!(params.first_text(&["title", "task", "tugas"]).as_deref(), Some("Laporan"));
        assert_eq!(params.first_text(&["title", "task"]), None);
    }
}
