//! scorm - SCORM package ingestion and learner runtime
//!
//! This is the command line front end. It wires configuration, storage and
//! state together and dispatches every command to the ops crate.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use crate::setup::SystemSetup;
use clap::Parser;
use scorm_config::Config;
use scorm_events::{EventReceiver, EventSender};
use scorm_ops::{OperationResult, OpsContextBuilder, OpsCtx, Schedule, SubmitRequest};
use scorm_types::{BlockLocation, CmiRequest, ColorChoice, OutputFormat};
use std::path::Path;
use std::process;
use tokio::select;
use tracing::{error, info};

const LOGS_DIR: &str = "scorm-data/logs";

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting scorm v{}", env!("CARGO_PKG_VERSION"));

    // File config (or defaults), then environment, then CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    if let Some(color) = cli.global.color {
        config.general.color = color;
    }

    let setup = SystemSetup::initialize(&config).await?;

    let (event_sender, event_receiver) = scorm_events::channel();
    let ops_ctx = build_ops_context(&setup, event_sender, config.clone())?;

    let renderer =
        OutputRenderer::new(json_output(cli.global.json, &config), config.general.color);

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug);

    let result =
        execute_command_with_events(cli.command, ops_ctx, event_receiver, &mut event_handler)
            .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, ops_ctx));

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Submit {
            org,
            course,
            block_type,
            block_id,
            file,
            display_name,
            weight,
            has_score,
            width,
            height,
        } => {
            let mut request = SubmitRequest::new(BlockLocation::new(
                org, course, block_type, block_id,
            ));
            request.display_name = display_name;
            request.weight = weight;
            request.has_score = has_score;
            request.width = width;
            request.height = height;
            if let Some(path) = file {
                let bytes = tokio::fs::read(&path).await?;
                request = request.with_package(upload_name(&path)?, bytes);
            }
            let report = scorm_ops::studio_submit(&ctx, request).await?;
            Ok(OperationResult::Submit(report))
        }

        Commands::Get {
            block_id,
            learner_id,
            name,
        } => {
            let response =
                scorm_ops::get_value(&ctx, &block_id, &learner_id, &CmiRequest::get(name)).await?;
            Ok(OperationResult::Value(response))
        }

        Commands::Set {
            block_id,
            learner_id,
            name,
            value,
        } => {
            let request = CmiRequest {
                name: Some(name),
                value: value.map(|raw| parse_cli_value(&raw)),
            };
            let response = scorm_ops::set_value(&ctx, &block_id, &learner_id, request).await?;
            Ok(OperationResult::SetResult(response))
        }

        Commands::Rescore {
            block_id,
            learner_id,
            raw_earned,
        } => {
            if !raw_earned.is_finite() {
                return Err(CliError::InvalidArguments(format!(
                    "raw score must be a finite number, got {raw_earned}"
                )));
            }
            let state = scorm_ops::set_score(&ctx, &block_id, &learner_id, raw_earned).await?;
            Ok(OperationResult::LearnerState(state))
        }

        Commands::Proxy {
            block_id,
            hash,
            file,
            output,
        } => {
            let response =
                scorm_ops::proxy_media(&ctx, &block_id, hash.as_deref(), &file).await?;
            if let Some(output) = output {
                tokio::fs::write(&output, &response.body).await?;
            }
            Ok(OperationResult::Proxied(response))
        }

        Commands::View {
            block_id,
            learner_id,
        } => {
            let view = scorm_ops::student_view(&ctx, &block_id, &learner_id).await?;
            Ok(OperationResult::StudentView(view))
        }

        Commands::Author { block_id } => {
            let message = scorm_ops::author_message(&ctx, &block_id).await?;
            Ok(OperationResult::AuthorMessage(message))
        }

        Commands::Schedule {
            block_id,
            due,
            grace_seconds,
        } => {
            let settings = scorm_ops::schedule(
                &ctx,
                &block_id,
                Schedule {
                    due,
                    grace_period_secs: grace_seconds,
                },
            )
            .await?;
            Ok(OperationResult::Block(Box::new(settings)))
        }
    }
}

/// Build operations context with all required components
fn build_ops_context(
    setup: &SystemSetup,
    event_sender: EventSender,
    config: Config,
) -> Result<OpsCtx, CliError> {
    let ctx = OpsContextBuilder::new()
        .with_store(setup.store())
        .with_state(setup.state().clone())
        .with_event_sender(event_sender)
        .with_config(config)
        .build()?;

    Ok(ctx)
}

/// `--json` wins, otherwise the configured default output format decides
fn json_output(json_flag: bool, config: &Config) -> bool {
    json_flag || config.general.default_output == OutputFormat::Json
}

/// File name recorded as the package's original name
fn upload_name(path: &Path) -> Result<String, CliError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CliError::InvalidArguments(format!("{} is not a file", path.display()))
        })
}

/// Values are JSON when they parse as JSON, plain strings otherwise
fn parse_cli_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Path::new(LOGS_DIR);
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "scorm-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| {
                                tracing_subscriber::EnvFilter::new(
                                    "info,scorm=debug,scorm_ops=info",
                                )
                            },
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // Keep stdout and stderr clean for machine consumers
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,scorm=warn,scorm_ops=warn")
                }),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cli_value() {
        assert_eq!(parse_cli_value("20"), json!(20));
        assert_eq!(parse_cli_value("passed"), json!("passed"));
        assert_eq!(parse_cli_value(r#"{"slide":3}"#), json!({"slide": 3}));
        assert_eq!(parse_cli_value("\"quoted\""), json!("quoted"));
    }

    #[test]
    fn test_json_output_resolution() {
        let mut config = Config::default();
        assert!(!json_output(false, &config));
        assert!(json_output(true, &config));

        config.general.default_output = OutputFormat::Json;
        assert!(json_output(false, &config));

        config.general.default_output = OutputFormat::Plain;
        assert!(json_output(true, &config));
        assert!(!json_output(false, &config));
    }

    #[test]
    fn test_upload_name() {
        assert_eq!(
            upload_name(Path::new("/tmp/course.zip")).unwrap(),
            "course.zip"
        );
        assert!(upload_name(Path::new("/")).is_err());
    }
}
