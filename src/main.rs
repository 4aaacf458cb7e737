//! instacrew CLI binary entry point.

use clap::Parser;
use instacrew::cli::{commands, Cli, Commands};
use instacrew::config::CrewConfig;
use instacrew::logging::LoggingConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    LoggingConfig::new(cli.log_format, "info", cli.verbose).init();

    let config = CrewConfig::from_env();
    let result = match &cli.command {
        Commands::Run(args) => commands::handle_run(&config, &args.inputs).await,
        Commands::Train(args) => {
            commands::handle_train(&config, args.n_iterations, &args.filename, &args.inputs).await
        }
        Commands::Replay(args) => commands::handle_replay(&config, &args.task_id).await,
        Commands::Test(args) => {
            commands::handle_test(&config, args.n_iterations, &args.model_name, &args.inputs)
                .await
        }
        Commands::Tasks => commands::handle_tasks(&config, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
