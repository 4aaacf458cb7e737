//! Typed access to tool call arguments.

use crate::error::CrewError;

/// Wrapper around tool call arguments providing typed extraction.
///
/// Arguments come from crew templates, so most values arrive as strings;
/// the numeric and list getters accept both native JSON and string forms.
#[derive(Debug, Clone)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a non-empty string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, CrewError> {
        self.get_str_opt(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| CrewError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value.get(key).and_then(|v| v.as_str())
    }

    /// Get an optional non-negative integer, from a number or a numeric string.
    pub fn get_usize_opt(&self, key: &str) -> Result<Option<usize>, CrewError> {
        let invalid = || CrewError::InvalidArgument(format!("Invalid integer argument: {key}"));
        match self.value.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .map(|n| Some(n as usize))
                .ok_or_else(invalid),
            Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(serde_json::Value::String(s)) => {
                s.trim().parse().map(Some).map_err(|_| invalid())
            }
            Some(_) => Err(invalid()),
        }
    }

    /// Get a list of strings from a JSON array or a comma-separated string.
    /// Missing keys yield an empty list.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        let items: Vec<String> = match self.value.get(key) {
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Null => None,
                    other => Some(other.to_string()),
                })
                .collect(),
            Some(serde_json::Value::String(s)) => s.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };
        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_strings_count_as_missing() {
        let args = ToolArguments::new(json!({"caption": "  ", "image_path": "a.jpg"}));
        assert!(args.get_str("caption").is_err());
        assert_eq!(args.get_str("image_path").unwrap(), "a.jpg");
        assert_eq!(args.get_str_opt("caption"), Some("  "));
    }

    #[test]
    fn integers_from_numbers_or_strings() {
        let args = ToolArguments::new(json!({"a": 3, "b": " 7 ", "c": "", "d": "x", "e": -1}));
        assert_eq!(args.get_usize_opt("a").unwrap(), Some(3));
        assert_eq!(args.get_usize_opt("b").unwrap(), Some(7));
        assert_eq!(args.get_usize_opt("c").unwrap(), None);
        assert_eq!(args.get_usize_opt("missing").unwrap(), None);
        assert!(args.get_usize_opt("d").is_err());
        assert!(args.get_usize_opt("e").is_err());
    }

    #[test]
    fn lists_from_arrays_or_csv() {
        let args = ToolArguments::new(json!({
            "tags": ["#ai", " ml ", ""],
            "users": "@a, @b,,",
        }));
        assert_eq!(args.get_list("tags"), vec!["#ai", "ml"]);
        assert_eq!(args.get_list("users"), vec!["@a", "@b"]);
        assert!(args.get_list("missing").is_empty());
    }
}
