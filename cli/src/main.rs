mod config;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use command_option_core::{OptionNode, OptionRecord, validate_options};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{DEFAULT_CONFIG_FILE, RenderConfig};

#[derive(Debug, Parser)]
#[command(name = "option-schema")]
#[command(about = "Validate and render command option schemas")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate one or more option schema files (JSON or YAML).
    Validate(ValidateArgs),
    /// Render an option schema file as wire JSON.
    Render(RenderArgs),
    /// Write a default configuration file.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files to validate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Schema file to render.
    #[arg(long)]
    input: PathBuf,
    /// Output file (defaults to stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Configuration file (defaults to .option-schema.yml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Emit compact JSON regardless of configuration.
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Where to write the configuration.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    output: PathBuf,
}

/// Options loaded from one schema file.
struct LoadedSchema {
    nodes: Vec<OptionNode>,
    /// The file held a single record rather than a list.
    single: bool,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Render(args) => run_render(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded; ignore that case.
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mut failed = 0;
    for path in &args.inputs {
        let schema = match load_schema(path) {
            Ok(schema) => schema,
            Err(err) => {
                failed += 1;
                eprintln!("{err}");
                continue;
            }
        };
        let errors = validate_options(&schema.nodes);
        if errors.is_empty() {
            info!(path = %path.display(), options = schema.nodes.len(), "schema is valid");
            continue;
        }
        failed += 1;
        for error in errors {
            eprintln!("{}: {error}", path.display());
        }
    }

    if failed > 0 {
        return Err(format!("{failed} schema file(s) failed validation"));
    }
    println!("Validated {} schema file(s).", args.inputs.len());
    Ok(())
}

fn run_render(args: RenderArgs) -> Result<(), String> {
    let config = RenderConfig::resolve(args.config.as_deref())?;
    let schema = load_schema(&args.input)?;

    if config.validation.enabled {
        let errors = validate_options(&schema.nodes);
        if !errors.is_empty() {
            if !config.validation.allow_invalid {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                return Err(format!(
                    "'{}' failed validation: {}",
                    args.input.display(),
                    messages.join("; ")
                ));
            }
            for error in &errors {
                warn!(path = %args.input.display(), %error, "rendering invalid schema");
            }
        }
    }

    let wire = if schema.single {
        serde_json::to_value(&schema.nodes[0])
    } else {
        serde_json::to_value(&schema.nodes)
    }
    .map_err(|err| format!("Failed to serialize schema: {err}"))?;

    let raw = if config.output.pretty && !args.compact {
        serde_json::to_string_pretty(&wire)
    } else {
        serde_json::to_string(&wire)
    }
    .map_err(|err| format!("Failed to serialize schema: {err}"))?;

    match args.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|err| {
                        format!(
                            "Failed to create output directory '{}': {err}",
                            parent.display()
                        )
                    })?;
                }
            }
            fs::write(&output, raw)
                .map_err(|err| format!("Failed to write '{}': {err}", output.display()))?;
            println!(
                "Rendered {} option(s) into '{}'.",
                schema.nodes.len(),
                output.display()
            );
        }
        None => println!("{raw}"),
    }
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.output.exists() {
        return Err(format!("'{}' already exists", args.output.display()));
    }
    RenderConfig::default().save(&args.output)?;
    println!("Wrote default configuration to '{}'.", args.output.display());
    Ok(())
}

fn load_schema(path: &Path) -> Result<LoadedSchema, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let value: Value = if is_yaml {
        serde_yaml::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?
    };

    let single = !value.is_array();
    let records: Vec<OptionRecord> = if single {
        vec![serde_json::from_value(value).map_err(|err| invalid_record(path, err))?]
    } else {
        serde_json::from_value(value).map_err(|err| invalid_record(path, err))?
    };
    debug!(path = %path.display(), records = records.len(), "loaded option records");

    let nodes = records
        .into_iter()
        .map(OptionNode::try_from_record)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("Invalid option in '{}': {err}", path.display()))?;

    Ok(LoadedSchema { nodes, single })
}

fn invalid_record(path: &Path, err: serde_json::Error) -> String {
    format!("Invalid option record in '{}': {err}", path.display())
}
