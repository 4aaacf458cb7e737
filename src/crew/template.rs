//! `{placeholder}` interpolation for task descriptions and arguments.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{CrewError, Result};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder regex must compile")
});

/// Replace every placeholder; an unknown name is an error.
pub fn interpolate(template: &str, vars: &BTreeMap<String, String>) -> Result<String> {
    if let Some(missing) = placeholders(template).find(|name| !vars.contains_key(*name)) {
        return Err(CrewError::MissingInput(missing.to_string()));
    }
    Ok(interpolate_lenient(template, vars))
}

/// Replace known placeholders and leave unknown ones untouched.
pub fn interpolate_lenient(template: &str, vars: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names referenced by `template`, in order of appearance.
pub fn placeholders(template: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// The placeholder name when the whole template is exactly one placeholder.
pub fn sole_placeholder(template: &str) -> Option<&str> {
    let caps = PLACEHOLDER.captures(template.trim())?;
    let whole = caps.get(0)?;
    if whole.as_str().len() == template.trim().len() {
        caps.get(1).map(|m| m.as_str())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn interpolates_known_values() {
        let vars = vars(&[("topic", "AI"), ("year", "2025")]);
        assert_eq!(
            interpolate("{topic} trends in {year}", &vars).unwrap(),
            "AI trends in 2025"
        );
    }

    #[test]
    fn strict_interpolation_reports_missing_name() {
        let err = interpolate("about {topic}", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, CrewError::MissingInput(name) if name == "topic"));
    }

    #[test]
    fn lenient_interpolation_keeps_unknowns() {
        let vars = vars(&[("topic", "AI")]);
        assert_eq!(interpolate_lenient("{topic} at {time}", &vars), "AI at {time}");
    }

    #[test]
    fn json_like_braces_are_not_placeholders() {
        assert_eq!(placeholders(r#"{"a": 1} { spaced }"#).count(), 0);
    }

    #[test]
    fn detects_sole_placeholder() {
        assert_eq!(sole_placeholder("{code}"), Some("code"));
        assert_eq!(sole_placeholder(" {code} "), Some("code"));
        assert_eq!(sole_placeholder("code: {code}"), None);
        assert_eq!(sole_placeholder("{a}{b}"), None);
    }
}
