//! modrunner CLI entry point
//!
//! Usage:
//!   modrunner assemble      Assemble every module in the current directory
//!   modrunner test          Test every module in the current directory
//!   modrunner list          List discovered modules
//!   modrunner config        Show configuration

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use modrunner::cli::{
    commands::{ConfigArgs, ListArgs},
    BatchArgs, Cli, Commands, OutputFormat,
};
use modrunner::config::{find_config_files, load_config, Config};
use modrunner::error::BatchError;
use modrunner::modules::discover_modules;
use modrunner::runner::{Action, BatchRunner, BuildTool, GradleTool};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            if let Some(suggestion) = e.downcast_ref::<BatchError>().and_then(|b| b.suggestion()) {
                eprintln!("{}: {}", "hint".yellow(), suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so stdout only carries progress lines
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let modules_dir = resolve_modules_dir(cli.dir.as_deref())?;

    match cli.command {
        Commands::Assemble(args) => {
            run_batch(Action::Assemble, args, config, &modules_dir, cli.verbose)
        }
        Commands::Test(args) => run_batch(Action::Test, args, config, &modules_dir, cli.verbose),
        Commands::List(args) => list_modules(args, &config, &modules_dir),
        Commands::Config(args) => show_config(args, &config, &modules_dir),
    }
}

/// Run one action across every module, stopping at the first failure
fn run_batch(
    action: Action,
    args: BatchArgs,
    mut config: Config,
    modules_dir: &Path,
    verbose: bool,
) -> Result<()> {
    args.apply(&mut config);

    let modules = discover_modules(modules_dir, &config.modules)?;
    let tool = GradleTool::from_config(&config.runner, modules_dir);

    if verbose {
        eprintln!(
            "{}: {} module(s) in {}",
            action.task_name().cyan(),
            modules.len(),
            modules_dir.display()
        );
    }

    let mut out = std::io::stdout().lock();
    let mut err = std::io::stderr().lock();
    let summary = BatchRunner::new(&tool).run(&modules, action, &mut out, &mut err)?;
    out.flush()?;

    if verbose {
        eprintln!(
            "{}: {} module(s) {} in {}ms",
            "success".green(),
            summary.modules,
            action,
            summary.duration_ms
        );
    }

    Ok(())
}

/// List discovered modules and the command each would run
fn list_modules(args: ListArgs, config: &Config, modules_dir: &Path) -> Result<()> {
    let modules = discover_modules(modules_dir, &config.modules)?;
    let tool = GradleTool::from_config(&config.runner, modules_dir);

    match args.format {
        OutputFormat::Json => {
            let entries: Vec<_> = modules
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "name": m.display_name(),
                        "path": m.path.display().to_string(),
                        "task": tool.task_path(m, args.action).to_string_lossy(),
                        "command": tool.command_line(m, args.action),
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "modules_dir": modules_dir.display().to_string(),
                "action": args.action,
                "modules": entries,
            }))?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            for module in &modules {
                println!("{}", module.display_name());
            }
        }
        OutputFormat::Table => {
            println!("{}: {}", "Modules".cyan(), modules_dir.display());
            println!();
            if modules.is_empty() {
                println!("No modules found.");
            } else {
                let width = modules
                    .iter()
                    .map(|m| m.display_name().chars().count())
                    .max()
                    .unwrap_or(10);
                for module in &modules {
                    println!(
                        "  {:width$}  {}",
                        module.display_name().green(),
                        tool.command_line(module, args.action),
                        width = width
                    );
                }
            }
        }
    }

    Ok(())
}

/// Show the resolved configuration and where it came from
fn show_config(args: ConfigArgs, config: &Config, modules_dir: &Path) -> Result<()> {
    let files = find_config_files();

    match args.format {
        OutputFormat::Json => {
            let files: Vec<String> = files.iter().map(|f| f.display().to_string()).collect();
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "modules_dir": modules_dir.display().to_string(),
                "config_files": files,
                "config": config,
            }))?;
            println!("{}", json);
        }
        OutputFormat::Plain | OutputFormat::Table => {
            println!("{}: {}", "Modules Directory".cyan(), modules_dir.display());
            println!("{}: {}", "Build Tool".cyan(), config.runner.build_tool);
            println!("{}: {}", "Working Directory".cyan(), config.runner.working_dir);
            println!("{}: {}", "Project Prefix".cyan(), config.runner.project_prefix);
            if !config.runner.extra_args.is_empty() {
                println!("{}: {}", "Extra Args".cyan(), config.runner.extra_args.join(" "));
            }
            if config.runner.timeout > 0 {
                println!("{}: {}s", "Timeout".cyan(), config.runner.timeout);
            }
            println!("{}: {:?}", "Output".cyan(), config.runner.output);
            for (key, value) in &config.runner.env {
                println!("{}: {}={}", "Env".cyan(), key, value);
            }
            if !config.modules.exclude.is_empty() {
                println!("{}: {}", "Exclude".cyan(), config.modules.exclude.join(", "));
            }
            println!("{}: {}", "Include Hidden".cyan(), config.modules.include_hidden);

            println!();
            println!("{}:", "Config Files".cyan());
            if files.is_empty() {
                println!("  None (defaults)");
            } else {
                for file in &files {
                    println!("  - {}", file.display());
                }
            }
        }
    }

    Ok(())
}

/// Absolute modules directory, from `-C` or the current directory
fn resolve_modules_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    dir.canonicalize()
        .with_context(|| format!("Modules directory '{}' not found", dir.display()))
}
