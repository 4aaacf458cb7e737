//! CLI command handlers for run, train, replay, test and tasks.

use std::path::Path;

use chrono::{Datelike, Local};

use super::InputArgs;
use crate::config::preferences::UserPreferences;
use crate::config::CrewConfig;
use crate::crew::template::interpolate_lenient;
use crate::crew::{Crew, CrewInputs, CrewOutput, KickoffLog, TestReport, TrainingData};
use crate::error::CrewError;
use crate::tools::Tool;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Crew inputs from the preference file, the configured app credentials and
/// the command line, in increasing precedence.
pub fn build_inputs(
    config: &CrewConfig,
    preferences: &UserPreferences,
    args: &InputArgs,
    current_year: i32,
) -> CrewInputs {
    let mut inputs = preferences.to_inputs(current_year);

    let credentials = [
        ("client_id", &config.client_id),
        ("client_secret", &config.client_secret),
        ("redirect_uri", &config.redirect_uri),
        ("code", &config.auth_code),
    ];
    for (key, value) in credentials {
        if let Some(value) = value {
            inputs.insert(key.to_string(), value.clone());
        }
    }

    if let Some(topic) = &args.topic {
        inputs.insert("topic".into(), topic.clone());
    }
    if let Some(tone) = &args.tone {
        inputs.insert("tone".into(), tone.clone());
    }
    if let Some(count) = args.hashtags_count {
        inputs.insert("hashtags_count".into(), count.to_string());
    }
    if let Some(path) = &args.image_path {
        inputs.insert("image_path".into(), path.display().to_string());
    }
    if let Some(time) = &args.scheduled_time {
        inputs.insert("scheduled_time".into(), time.clone());
    }
    if let Some(description) = &args.image_description {
        inputs.insert("image_description".into(), description.clone());
    }
    inputs
}

fn load_inputs(config: &CrewConfig, args: &InputArgs) -> Result<CrewInputs, CrewError> {
    let preferences = UserPreferences::load(&config.preferences_path)?;
    Ok(build_inputs(config, &preferences, args, Local::now().year()))
}

async fn run_crew(config: &CrewConfig, args: &InputArgs) -> Result<CrewOutput, CrewError> {
    let crew = Crew::from_config(config)?;
    crew.kickoff(&load_inputs(config, args)?).await
}

async fn train_crew(
    config: &CrewConfig,
    n_iterations: usize,
    filename: &Path,
    args: &InputArgs,
) -> Result<TrainingData, CrewError> {
    let crew = Crew::from_config(config)?;
    crew.train(n_iterations, filename, &load_inputs(config, args)?)
        .await
}

async fn replay_crew(config: &CrewConfig, task_id: &str) -> Result<CrewOutput, CrewError> {
    Crew::from_config(config)?.replay(task_id).await
}

async fn test_crew(
    config: &CrewConfig,
    n_iterations: usize,
    model_name: &str,
    args: &InputArgs,
) -> Result<TestReport, CrewError> {
    let crew = Crew::from_config(config)?;
    crew.test(n_iterations, model_name, &load_inputs(config, args)?)
        .await
}

fn failed(action: &str) -> impl FnOnce(CrewError) -> String + '_ {
    move |e| format!("An error occurred while {action} the crew: {e}")
}

fn print_output(output: &CrewOutput) {
    for task in &output.tasks {
        println!("[{}] {} ({})", task.status, task.task, task.task_id);
        for line in task.raw.lines() {
            println!("    {line}");
        }
    }
}

/// Handle `instacrew run`.
pub async fn handle_run(config: &CrewConfig, args: &InputArgs) -> CommandResult {
    let output = run_crew(config, args).await.map_err(failed("running"))?;
    print_output(&output);
    Ok(())
}

/// Handle `instacrew train <n_iterations> <filename>`.
pub async fn handle_train(
    config: &CrewConfig,
    n_iterations: usize,
    filename: &Path,
    args: &InputArgs,
) -> CommandResult {
    let data = train_crew(config, n_iterations, filename, args)
        .await
        .map_err(failed("training"))?;
    for agent in &data.agents {
        println!(
            "{}: {} runs, average score {:.1}",
            agent.agent, agent.runs, agent.average_score
        );
    }
    println!(
        "Saved {} training iterations to {}",
        data.iterations.len(),
        filename.display()
    );
    Ok(())
}

/// Handle `instacrew replay <task_id>`.
pub async fn handle_replay(config: &CrewConfig, task_id: &str) -> CommandResult {
    let output = replay_crew(config, task_id).await.map_err(failed("replaying"))?;
    print_output(&output);
    Ok(())
}

/// Handle `instacrew test <n_iterations> <model_name>`.
pub async fn handle_test(
    config: &CrewConfig,
    n_iterations: usize,
    model_name: &str,
    args: &InputArgs,
) -> CommandResult {
    let report = test_crew(config, n_iterations, model_name, args)
        .await
        .map_err(failed("testing"))?;
    println!("{report}");
    Ok(())
}

/// Lines describing each task: its agent and tool, the agent's goal with
/// `inputs` filled in, the tool's arguments (`*` marks required ones) and the
/// task's status in `latest`. `verbose` adds the agent backstory.
fn task_listing(
    crew: &Crew,
    latest: Option<&KickoffLog>,
    inputs: &CrewInputs,
    verbose: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, task) in crew.tasks().iter().enumerate() {
        let agent = crew.agents().iter().find(|agent| agent.name() == task.agent);
        let role = agent.map_or(task.agent.as_str(), |agent| agent.role());
        lines.push(format!("{}. {} ({role}, {})", index + 1, task.name, task.tool));

        let Some(agent) = agent else { continue };
        if !agent.goal().is_empty() {
            lines.push(format!("   goal: {}", interpolate_lenient(agent.goal(), inputs)));
        }
        if verbose && !agent.backstory().is_empty() {
            lines.push(format!("   backstory: {}", agent.backstory().replace('\n', " ")));
        }
        if let Some(tool) = agent.tool(&task.tool) {
            lines.push(format!("   tool: {}", tool.description()));
            let parameters = tool.parameters();
            let required = parameters.required();
            let arguments: Vec<String> = parameters
                .names()
                .into_iter()
                .map(|name| {
                    if required.contains(&name) {
                        format!("{name}*")
                    } else {
                        name.to_string()
                    }
                })
                .collect();
            if !arguments.is_empty() {
                lines.push(format!("   arguments: {}", arguments.join(", ")));
            }
        }

        let last = latest.and_then(|log| log.outputs.iter().find(|o| o.task == task.name));
        if let Some(output) = last {
            lines.push(format!("   last run: {} [{}]", output.task_id, output.status));
        }
    }
    lines
}

/// Handle `instacrew tasks`: the crew's tasks, with ids from the latest run
/// when one exists.
pub fn handle_tasks(config: &CrewConfig, verbose: bool) -> CommandResult {
    let crew = Crew::from_config(config).map_err(failed("loading"))?;
    let latest = crew.storage().load().map_err(failed("loading"))?;
    let inputs = load_inputs(config, &InputArgs::default()).map_err(failed("loading"))?;

    for line in task_listing(&crew, latest.as_ref(), &inputs, verbose) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ClientCredentials;
    use std::path::PathBuf;

    #[test]
    fn cli_inputs_override_preferences() {
        let preferences = UserPreferences::parse(
            "## Content Preferences\nContent Topics: Rust, AI\nTone: professional\n",
        );
        let config = CrewConfig::new()
            .with_client(ClientCredentials::new("id", "secret", "https://localhost/cb"));
        let args = InputArgs {
            image_path: Some(PathBuf::from("img/post.jpg")),
            tone: Some("casual".into()),
            ..InputArgs::default()
        };

        let inputs = build_inputs(&config, &preferences, &args, 2026);
        assert_eq!(inputs["topic"], "Rust");
        assert_eq!(inputs["tone"], "casual");
        assert_eq!(inputs["current_year"], "2026");
        assert_eq!(inputs["client_id"], "id");
        assert_eq!(inputs["image_path"], "img/post.jpg");
        assert!(!inputs.contains_key("code"));
        assert!(!inputs.contains_key("scheduled_time"));
    }

    #[test]
    fn task_listing_fills_goals_and_lists_arguments() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = CrewConfig::new().with_base_dir(dir.path());
        let crew = Crew::from_config(&config).unwrap();
        let inputs = CrewInputs::from([("topic".to_string(), "travel".to_string())]);

        let lines = task_listing(&crew, None, &inputs, false);
        assert_eq!(
            lines[0],
            "1. authenticate_user (Instagram Authentication Specialist, instagram_auth)"
        );
        assert!(lines
            .iter()
            .any(|l| l == "   goal: Track the hashtags and accounts that matter for travel"));
        assert!(lines
            .iter()
            .any(|l| l == "   arguments: caption*, image_path*, scheduled_time"));
        assert!(lines.iter().all(|l| !l.contains('{')));
        assert!(lines.iter().all(|l| !l.starts_with("   backstory:")));

        let verbose = task_listing(&crew, None, &inputs, true);
        assert!(verbose.iter().any(|l| l.starts_with("   backstory: You handle OAuth")));
    }

    #[test]
    fn error_messages_name_the_action() {
        let message = failed("replaying")(CrewError::InvalidArgument("bad".into()));
        assert_eq!(
            message,
            "An error occurred while replaying the crew: Invalid argument: bad"
        );
    }
}
