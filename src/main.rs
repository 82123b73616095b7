use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};

use job_board::cli::{self, Cli, Outcome};
use job_board::{config, db, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(&config.log_dir) {
        eprintln!("Failed to initialize logging in {}: {}", config.log_dir, e);
        return ExitCode::FAILURE;
    }

    info!("Configuration loaded: max database connections={}", config.max_db_connections);

    let pool = match db::connection::get_connection(&config.database_url, config.max_db_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("Database connection pool established");

    let result = cli::run(pool.clone(), cli.command).await;

    info!("Closing database connection pool...");
    pool.close().await;

    match result {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Found(value)) => match serde_json::to_string_pretty(&value) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to render output: {}", e);
                ExitCode::FAILURE
            }
        },
        Ok(Outcome::Missing(message)) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("Command failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
