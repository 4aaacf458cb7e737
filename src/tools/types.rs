//! Tool-related types: parameter schemas and tool reports.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::arguments::ToolArguments;
use crate::error::CrewError;

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    /// JSON Schema object describing the parameters.
    pub schema: serde_json::Value,
}

impl ToolParameters {
    /// Create an empty parameter schema (no parameters).
    pub fn empty() -> Self {
        Self::object().build()
    }

    /// Builder: create an object schema with properties.
    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// Names of the required parameters.
    pub fn required(&self) -> Vec<&str> {
        self.schema["required"]
            .as_array()
            .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
            .unwrap_or_default()
    }

    /// Names of all parameters.
    pub fn names(&self) -> Vec<&str> {
        self.properties()
            .map(|properties| properties.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn properties(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.schema["properties"].as_object()
    }

    /// Check that every required argument is present and not blank, and that
    /// integer arguments hold a non-negative integer or a numeric string.
    pub fn validate(&self, args: &ToolArguments) -> Result<(), CrewError> {
        for name in self.required() {
            let present = match args.raw().get(name) {
                None | Some(serde_json::Value::Null) => false,
                Some(serde_json::Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(CrewError::InvalidArgument(format!(
                    "Missing required argument: {name}"
                )));
            }
        }
        for (name, schema) in self.properties().into_iter().flatten() {
            if schema["type"] == "integer" {
                args.get_usize_opt(name)?;
            }
        }
        Ok(())
    }
}

/// Builder for constructing tool parameter schemas.
pub struct ParameterBuilder {
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    fn property(mut self, name: impl Into<String>, schema: serde_json::Value, required: bool) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), schema);
        if required {
            self.required.push(name);
        }
        self
    }

    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "string", "description": description.into() }),
            required,
        )
    }

    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "integer", "minimum": 0, "description": description.into() }),
            required,
        )
    }

    pub fn string_enum(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: &[&str],
        required: bool,
    ) -> Self {
        self.property(
            name,
            serde_json::json!({ "type": "string", "description": description.into(), "enum": values }),
            required,
        )
    }

    /// Array of strings; a comma-separated string is accepted too.
    pub fn string_list(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.property(
            name,
            serde_json::json!({
                "type": ["array", "string"],
                "items": { "type": "string" },
                "description": description.into(),
            }),
            required,
        )
    }

    pub fn build(self) -> ToolParameters {
        ToolParameters {
            schema: serde_json::json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}

/// How a tool call went, from the crew's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolStatus {
    Ok,
    /// The user has to do something (e.g. open an authorization URL).
    ActionRequired,
    Error,
}

/// Human-readable outcome returned by the Instagram tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReport {
    pub status: ToolStatus,
    pub message: String,
}

impl ToolReport {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Ok,
            message: message.into(),
        }
    }

    pub fn action_required(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::ActionRequired,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ToolStatus::Error,
            message: message.into(),
        }
    }

    pub fn into_value(self) -> serde_json::Value {
        serde_json::json!({ "status": self.status, "message": self.message })
    }

    /// Read a report back from a tool's JSON output. Outputs that are not
    /// reports count as successful, with strings used verbatim.
    pub fn from_value(value: &serde_json::Value) -> Self {
        if let Ok(report) = serde_json::from_value::<ToolReport>(value.clone()) {
            return report;
        }
        match value {
            serde_json::Value::String(text) => Self::ok(text.clone()),
            other => Self::ok(other.to_string()),
        }
    }
}
