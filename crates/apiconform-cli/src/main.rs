//! apiconform CLI - check recorded HTTP responses against an OpenAPI spec

mod responses;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use apiconform_core::{CheckReport, CheckSummary, Config, Polarity, VerdictStatus};
use apiconform_engine::ResponseValidator;

#[derive(Parser)]
#[command(name = "apiconform")]
#[command(about = "Check recorded HTTP responses against an OpenAPI spec")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output. Repeat for more (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check recorded responses (JSON files, one object or an array each)
    Check {
        /// Response files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// OpenAPI spec (overrides the config file)
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Config file (default: .apiconform.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Assert that the responses do NOT satisfy the spec
        #[arg(long)]
        not: bool,
    },

    /// List routes, methods and declared statuses
    Routes {
        /// OpenAPI spec (overrides the config file)
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Config file (default: .apiconform.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema for the check report format
    Schema,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Commands::Check {
            files,
            spec,
            config,
            not,
        } => {
            let cfg = resolve_config(config.as_deref(), spec)?;
            let validator = load_validator(&cfg)?;
            let polarity = Polarity::from_negated(not);

            let mut reports = Vec::new();
            for file in &files {
                for recorded in responses::read_file(file)? {
                    let outcome = validator.evaluate(&recorded.input);
                    let verdict = apiconform_core::judge(&outcome, polarity);
                    tracing::debug!(
                        source = %recorded.source,
                        outcome = ?outcome.kind(),
                        verdict = %verdict.status,
                        "checked response"
                    );
                    reports.push(CheckReport::new(
                        recorded.source,
                        &recorded.input,
                        &outcome,
                        verdict,
                    ));
                }
            }
            let summary = CheckSummary::from_reports(reports);

            match cli.output {
                OutputFormat::Terminal => print_terminal(&summary, polarity),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Silent => {}
            }

            Ok(match summary.status() {
                VerdictStatus::Pass => 0,
                VerdictStatus::Fail => 1,
            })
        }

        Commands::Routes { spec, config } => {
            let cfg = resolve_config(config.as_deref(), spec)?;
            let validator = load_validator(&cfg)?;
            let document = validator.document();

            match cli.output {
                OutputFormat::Json => {
                    let routes: Vec<_> = document
                        .paths
                        .iter()
                        .map(|item| {
                            let operations: serde_json::Map<_, _> = item
                                .operations
                                .iter()
                                .map(|(method, op)| {
                                    let statuses: Vec<String> =
                                        op.responses.iter().map(|(k, _)| k.to_string()).collect();
                                    (method.to_string(), serde_json::json!(statuses))
                                })
                                .collect();
                            serde_json::json!({
                                "template": item.template(),
                                "operations": operations,
                            })
                        })
                        .collect();
                    let out = serde_json::json!({
                        "openapi": document.openapi,
                        "base_paths": document.base_paths,
                        "routes": routes,
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                OutputFormat::Terminal => {
                    println!("OpenAPI {}", document.openapi);
                    if !document.base_paths.is_empty() {
                        println!("Base paths: {}", document.base_paths.join(", "));
                    }
                    for item in &document.paths {
                        println!("\n{}", item.template());
                        for (method, op) in &item.operations {
                            let statuses: Vec<String> =
                                op.responses.iter().map(|(k, _)| k.to_string()).collect();
                            println!("  {:<7} {}", method.as_str(), statuses.join(" "));
                        }
                    }
                }
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::Init => {
            let config_path = ".apiconform.toml";
            if Path::new(config_path).exists() {
                eprintln!("{config_path} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())
                .with_context(|| format!("writing {config_path}"))?;
            println!("Created {config_path}");
            println!("\nEdit the file to configure:");
            println!("  - spec: path to your OpenAPI spec");
            println!("  - ignore_servers: match paths without server base paths");
            println!("  - validate_formats: enforce string formats");
            Ok(0)
        }

        Commands::Schema => {
            println!("{}", apiconform_core::report::generate_schema());
            Ok(0)
        }
    }
}

/// Config from `--config` or the default location, with `--spec` applied on top.
fn resolve_config(config: Option<&Path>, spec: Option<PathBuf>) -> Result<Config> {
    let mut cfg = match config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    if let Some(spec) = spec {
        cfg.spec = spec;
    }
    Ok(cfg)
}

fn load_validator(cfg: &Config) -> Result<ResponseValidator> {
    let validator = ResponseValidator::from_config(cfg)
        .with_context(|| format!("loading spec {}", cfg.spec.display()))?;
    tracing::info!(
        spec = %cfg.spec.display(),
        routes = validator.document().paths.len(),
        "spec loaded"
    );
    Ok(validator)
}

fn print_terminal(summary: &CheckSummary, polarity: Polarity) {
    for report in &summary.reports {
        let target = report.route.as_deref().unwrap_or(report.path.as_str());
        println!(
            "{}  {} {} -> {}  ({})",
            report.verdict, report.method, target, report.status, report.source
        );
        if let Some(msg) = &report.message {
            for line in msg.lines() {
                println!("      {line}");
            }
        }
    }

    let mode = if polarity.is_negated() {
        " (negated)"
    } else {
        ""
    };
    println!(
        "\n{}{mode}: {} checked, {} passed, {} failed",
        summary.status(),
        summary.total,
        summary.passed,
        summary.failed
    );
}
