//! CLI entry point for instacrew.

pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::logging::LogFormat;

/// Instagram automation crew
#[derive(Parser, Debug)]
#[command(name = "instacrew", version, about = "Instagram automation crew")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log output format (text, json, pretty)
    #[arg(long, global = true, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the crew once
    Run(RunArgs),
    /// Run the crew repeatedly and save the scored outputs
    Train(TrainArgs),
    /// Re-run the crew from a task of the latest run
    Replay(ReplayArgs),
    /// Run the crew repeatedly and print task scores
    Test(TestArgs),
    /// List the crew's tasks in execution order
    Tasks,
}

/// Inputs that override or extend the user preferences.
#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    /// Image to post
    #[arg(long = "image")]
    pub image_path: Option<PathBuf>,

    /// Publish time (RFC 3339 or `YYYY-MM-DD HH:MM`); next optimal slot when omitted
    #[arg(long)]
    pub scheduled_time: Option<String>,

    /// Short description appended to the caption
    #[arg(long)]
    pub image_description: Option<String>,

    /// Caption tone (engaging, professional, casual, funny)
    #[arg(long)]
    pub tone: Option<String>,

    /// Caption topic; defaults to the first preferred content topic
    #[arg(long)]
    pub topic: Option<String>,

    /// Number of hashtags to add to the caption
    #[arg(long)]
    pub hashtags_count: Option<usize>,
}

/// Arguments for `instacrew run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Arguments for `instacrew train`.
#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// Number of training iterations
    pub n_iterations: usize,
    /// Output file (must end in .json)
    pub filename: PathBuf,
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Arguments for `instacrew replay`.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Task id (or task name) from the latest run
    pub task_id: String,
}

/// Arguments for `instacrew test`.
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Number of test iterations
    pub n_iterations: usize,
    /// Evaluator model the scores are reported for
    pub model_name: String,
    #[command(flatten)]
    pub inputs: InputArgs,
}
