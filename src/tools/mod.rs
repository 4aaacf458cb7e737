//! Tool system: the seam between agents and the Instagram operations.

pub mod arguments;
pub mod instagram;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use tool::{FnTool, Tool};
pub use types::{ToolParameters, ToolReport, ToolStatus};
