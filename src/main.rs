//! Batch Extensions CLI
//!
//! Entry point for the `batch-ext` command-line tool.

use batch_extensions::{ExtendedJobParameter, ReservedAttributes};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "batch-ext")]
#[command(about = "Validate extended batch job documents", version)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode and validate a job JSON file
    Validate {
        /// Path to the job JSON document
        file: PathBuf,

        /// Path to a reserved-attribute config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the job field map
    Fields {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the effective reserved-for-templates set
    Reserved {
        /// Path to a reserved-attribute config file
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate { file, config, json } => {
            run_validate(&file, config, json);
        }
        Commands::Fields { json } => {
            run_fields(json);
        }
        Commands::Reserved { config } => {
            run_reserved(config);
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_reserved(config_path: Option<PathBuf>) -> ReservedAttributes {
    match config_path {
        Some(path) => match ReservedAttributes::from_file(&path) {
            Ok(reserved) => reserved,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                process::exit(2);
            }
        },
        None => ReservedAttributes::builtin().clone(),
    }
}

fn run_validate(file: &Path, config_path: Option<PathBuf>, json: bool) {
    let reserved = load_reserved(config_path);

    let contents = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading {}: {}", file.display(), e);
            process::exit(2);
        }
    };

    let result = serde_json::from_str::<serde_json::Value>(&contents)
        .map_err(batch_extensions::ExtensionError::from)
        .and_then(|value| ExtendedJobParameter::from_wire_with(value, &reserved))
        .and_then(|job| job.fingerprint().map(|fingerprint| (job, fingerprint)));

    match result {
        Ok((job, fingerprint)) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": true,
                        "id": job.id(),
                        "templated": job.is_templated(),
                        "task_factory": job.task_factory().map(|f| f.kind()),
                        "fingerprint": fingerprint,
                    })
                );
            } else {
                println!("Job valid: {}", job.id());
                println!("  Templated: {}", job.is_templated());
                if let Some(factory) = job.task_factory() {
                    println!("  Task factory: {}", factory.kind());
                }
                println!("  Fingerprint: {}", fingerprint);
            }
        }
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "error": e.to_string(),
                        "reserved_fields": e.reserved_fields(),
                    })
                );
            } else {
                eprintln!("Job invalid: {}", e);
            }
            process::exit(1);
        }
    }
}

fn run_fields(json: bool) {
    let map = ExtendedJobParameter::attribute_map();

    if json {
        let fields: Vec<serde_json::Value> = map
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "name": spec.name,
                    "key": spec.key,
                    "type": spec.ty.to_string(),
                    "required": spec.required,
                })
            })
            .collect();
        println!("{}", serde_json::Value::Array(fields));
    } else {
        for spec in map {
            let marker = if spec.required { "required" } else { "optional" };
            println!("{:<28} {:<28} {:<24} {}", spec.name, spec.key, spec.ty.to_string(), marker);
        }
    }
}

fn run_reserved(config_path: Option<PathBuf>) {
    let reserved = load_reserved(config_path);
    for name in reserved.iter() {
        println!("{}", name);
    }
}
