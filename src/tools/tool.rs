//! The `Tool` trait and a closure-backed implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::error::CrewError;

/// Something an agent can do for a task.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name referenced by crew definitions.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters(&self) -> &ToolParameters;

    /// Run with arguments that already satisfy [`Tool::parameters`].
    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, CrewError>;

    /// Check `args` against the parameter schema, then execute.
    async fn call(&self, args: &ToolArguments) -> Result<serde_json::Value, CrewError> {
        self.parameters().validate(args)?;
        self.execute(args).await
    }
}

type BoxedRun =
    dyn Fn(ToolArguments) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, CrewError>> + Send>>
        + Send
        + Sync;

/// A tool whose behavior is an async closure over its arguments.
pub struct FnTool {
    name: String,
    description: String,
    parameters: ToolParameters,
    run: Arc<BoxedRun>,
}

impl FnTool {
    pub fn new<F, Fut>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ToolParameters,
        run: F,
    ) -> Self
    where
        F: Fn(ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<serde_json::Value, CrewError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            run: Arc::new(move |args| Box::pin(run(args))),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, CrewError> {
        (self.run)(args.clone()).await
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("parameters", &self.parameters.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn count_tool() -> FnTool {
        FnTool::new(
            "count",
            "Count words",
            ToolParameters::object()
                .string("text", "Text to count", true)
                .integer("limit", "Upper bound", false)
                .build(),
            |args| async move {
                let words = args.get_str("text")?.split_whitespace().count();
                Ok(json!(words))
            },
        )
    }

    #[tokio::test]
    async fn call_runs_valid_arguments() {
        let value = count_tool()
            .call(&ToolArguments::new(json!({"text": "one two three", "limit": "5"})))
            .await
            .unwrap();
        assert_eq!(value, json!(3));
    }

    #[tokio::test]
    async fn call_rejects_arguments_the_schema_forbids() {
        let tool = count_tool();
        let missing = tool.call(&ToolArguments::new(json!({"text": " "}))).await.unwrap_err();
        assert_eq!(missing.to_string(), "Invalid argument: Missing required argument: text");

        let not_a_number = tool
            .call(&ToolArguments::new(json!({"text": "a", "limit": "many"})))
            .await
            .unwrap_err();
        assert_eq!(
            not_a_number.to_string(),
            "Invalid argument: Invalid integer argument: limit"
        );
    }

    #[tokio::test]
    async fn execute_skips_validation() {
        let err = count_tool().execute(&ToolArguments::new(json!({}))).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Missing string argument: text");
    }
}
