// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Scalr Control CLI
//!
//! CLI tool for inspecting and driving Scalr runs.
//!
//! Usage:
//!   scalr-ctl <command> [options]
//!
//! Commands:
//!   run <run_id>                  Show a run with its status history
//!   create-run --workspace <id> --configuration-version <id>
//!   apply <run_id> [--comment <text>] [--apply-at <rfc3339>]
//!   cancel <run_id> [--comment <text>]
//!   discard <run_id> [--comment <text>]
//!   wait <run_id>                 Wait for a run to finish
//!   state-version <sv_id>
//!   current-state-version <workspace_id>

use std::process::ExitCode;
use std::time::Duration;

use chrono::{DateTime, Utc};
use scalr_sdk::{
    RunApplyOptions, RunCancelOptions, RunCreateOptions, RunDiscardOptions, ScalrClient,
    SdkConfig, WaitOptions,
};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!(
        r#"Usage: scalr-ctl <command> [options]

Inspect and drive Scalr runs and state versions.

COMMANDS:
    run <run_id>                          Show a run and its status history
    create-run                            Queue a new run
    apply <run_id>                        Apply a run waiting for confirmation
    cancel <run_id>                       Cancel a planning or applying run
    discard <run_id>                      Discard a run waiting for confirmation
    wait <run_id>                         Wait until a run reaches a final status
    state-version <state_version_id>      Show a state version
    current-state-version <workspace_id>  Show the current state of a workspace

CREATE-RUN OPTIONS:
    --workspace <id>                      Workspace ID (required)
    --configuration-version <id>          Configuration version ID (required)

APPLY/CANCEL/DISCARD OPTIONS:
    --comment <text>                      Comment recorded with the action
    --apply-at <rfc3339>                  Schedule the apply (apply only)

WAIT OPTIONS:
    --poll <ms>                           Poll interval in ms (default: 2000)
    --timeout <seconds>                   Give up after this many seconds

ENVIRONMENT:
    SCALR_ADDRESS                         Account address (default: https://scalr.io)
    SCALR_TOKEN                           API token
    SCALR_SKIP_CERT_VERIFICATION          Skip TLS verification (default: false)
    RUST_LOG                              Log filter (default: warn)

EXAMPLES:
    # Queue a run and wait for it
    scalr-ctl create-run --workspace ws-abc123 --configuration-version cv-abc123
    scalr-ctl wait run-abc123 --timeout 1800

    # Confirm a planned run
    scalr-ctl apply run-abc123 --comment "lgtm"
"#
    );
}

#[derive(Debug, PartialEq)]
enum Command {
    Run {
        run_id: String,
    },
    CreateRun {
        workspace_id: String,
        configuration_version_id: String,
    },
    Apply {
        run_id: String,
        comment: Option<String>,
        apply_at: Option<DateTime<Utc>>,
    },
    Cancel {
        run_id: String,
        comment: Option<String>,
    },
    Discard {
        run_id: String,
        comment: Option<String>,
    },
    Wait {
        run_id: String,
        poll_ms: u64,
        timeout_secs: Option<u64>,
    },
    StateVersion {
        state_version_id: String,
    },
    CurrentStateVersion {
        workspace_id: String,
    },
}

fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = std::env::args().collect();
    parse_args_from_vec(&args)
}

/// Parse `--comment <text>` plus any extra flags accepted by `extra`.
fn parse_comment_flags(
    args: &[String],
    start: usize,
    mut extra: impl FnMut(&str, Option<&String>) -> Result<bool, String>,
) -> Result<Option<String>, String> {
    let mut comment = None;
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--comment" => {
                i += 1;
                comment = Some(args.get(i).ok_or("--comment requires a value")?.clone());
            }
            arg => {
                if !extra(arg, args.get(i + 1))? {
                    return Err(format!("Unknown argument: {}", arg));
                }
                i += 1;
            }
        }
        i += 1;
    }
    Ok(comment)
}

fn parse_args_from_vec(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => {
            print_usage();
            std::process::exit(0);
        }
        "run" => {
            let run_id = args.get(2).ok_or("Run ID required")?.clone();
            Ok(Command::Run { run_id })
        }
        "create-run" => {
            let mut workspace_id: Option<String> = None;
            let mut configuration_version_id: Option<String> = None;

            let mut i = 2;
            while i < args.len() {
                match args[i].as_str() {
                    "--workspace" => {
                        i += 1;
                        workspace_id =
                            Some(args.get(i).ok_or("--workspace requires an ID")?.clone());
                    }
                    "--configuration-version" => {
                        i += 1;
                        configuration_version_id = Some(
                            args.get(i)
                                .ok_or("--configuration-version requires an ID")?
                                .clone(),
                        );
                    }
                    arg => return Err(format!("Unknown argument: {}", arg)),
                }
                i += 1;
            }

            Ok(Command::CreateRun {
                workspace_id: workspace_id.ok_or("--workspace is required")?,
                configuration_version_id: configuration_version_id
                    .ok_or("--configuration-version is required")?,
            })
        }
        "apply" => {
            let run_id = args.get(2).ok_or("Run ID required")?.clone();
            let mut apply_at = None;
            let comment = parse_comment_flags(args, 3, |flag, value| match flag {
                "--apply-at" => {
                    let raw = value.ok_or("--apply-at requires a timestamp")?;
                    let parsed = DateTime::parse_from_rfc3339(raw)
                        .map_err(|e| format!("Invalid --apply-at: {}", e))?;
                    apply_at = Some(parsed.with_timezone(&Utc));
                    Ok(true)
                }
                _ => Ok(false),
            })?;
            Ok(Command::Apply {
                run_id,
                comment,
                apply_at,
            })
        }
        "cancel" => {
            let run_id = args.get(2).ok_or("Run ID required")?.clone();
            let comment = parse_comment_flags(args, 3, |_, _| Ok(false))?;
            Ok(Command::Cancel { run_id, comment })
        }
        "discard" => {
            let run_id = args.get(2).ok_or("Run ID required")?.clone();
            let comment = parse_comment_flags(args, 3, |_, _| Ok(false))?;
            Ok(Command::Discard { run_id, comment })
        }
        "wait" => {
            let run_id = args.get(2).ok_or("Run ID required")?.clone();
            let mut poll_ms: u64 = 2000;
            let mut timeout_secs: Option<u64> = None;

            let mut i = 3;
            while i < args.len() {
                match args[i].as_str() {
                    "--poll" => {
                        i += 1;
                        poll_ms = args
                            .get(i)
                            .ok_or("--poll requires a number")?
                            .parse()
                            .map_err(|_| "Invalid poll interval")?;
                    }
                    "--timeout" => {
                        i += 1;
                        timeout_secs = Some(
                            args.get(i)
                                .ok_or("--timeout requires a number")?
                                .parse()
                                .map_err(|_| "Invalid timeout")?,
                        );
                    }
                    arg => return Err(format!("Unknown argument: {}", arg)),
                }
                i += 1;
            }

            Ok(Command::Wait {
                run_id,
                poll_ms,
                timeout_secs,
            })
        }
        "state-version" => {
            let state_version_id = args.get(2).ok_or("State version ID required")?.clone();
            Ok(Command::StateVersion { state_version_id })
        }
        "current-state-version" => {
            let workspace_id = args.get(2).ok_or("Workspace ID required")?.clone();
            Ok(Command::CurrentStateVersion { workspace_id })
        }
        cmd => Err(format!("Unknown command: {}", cmd)),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = match parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    init_logging();

    let config = match SdkConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match ScalrClient::new(config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match execute_command(&client, cmd).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(|e| e.to_string())?
    );
    Ok(())
}

async fn execute_command(client: &ScalrClient, cmd: Command) -> Result<(), String> {
    match cmd {
        Command::Run { run_id } => {
            let run = client.runs().read(&run_id).await.map_err(|e| e.to_string())?;
            print_json(&run)?;
        }

        Command::CreateRun {
            workspace_id,
            configuration_version_id,
        } => {
            let run = client
                .runs()
                .create(RunCreateOptions::new(workspace_id, configuration_version_id))
                .await
                .map_err(|e| e.to_string())?;
            print_json(&run)?;
        }

        Command::Apply {
            run_id,
            comment,
            apply_at,
        } => {
            let options = RunApplyOptions {
                comment,
                apply_at,
            };
            client
                .runs()
                .apply(&run_id, options)
                .await
                .map_err(|e| e.to_string())?;
            println!("Apply requested for {}", run_id);
        }

        Command::Cancel { run_id, comment } => {
            client
                .runs()
                .cancel(&run_id, RunCancelOptions { comment })
                .await
                .map_err(|e| e.to_string())?;
            println!("Cancel requested for {}", run_id);
        }

        Command::Discard { run_id, comment } => {
            client
                .runs()
                .discard(&run_id, RunDiscardOptions { comment })
                .await
                .map_err(|e| e.to_string())?;
            println!("Discard requested for {}", run_id);
        }

        Command::Wait {
            run_id,
            poll_ms,
            timeout_secs,
        } => {
            let mut options = WaitOptions::new().with_poll_interval(Duration::from_millis(poll_ms));
            if let Some(secs) = timeout_secs {
                options = options.with_timeout(Duration::from_secs(secs));
            }
            let run = client
                .runs()
                .wait_for_terminal(&run_id, options)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&run)?;
        }

        Command::StateVersion { state_version_id } => {
            let sv = client
                .state_versions()
                .read(&state_version_id)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&sv)?;
        }

        Command::CurrentStateVersion { workspace_id } => {
            let sv = client
                .state_versions()
                .read_current_for_workspace(&workspace_id)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&sv)?;
        }
    }

    Ok(())
}
