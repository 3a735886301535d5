//! sdkgen: load a model description, synthesize method bodies and render them
//!
//! Usage:
//!   sdkgen synthesize api.json
//!   sdkgen outline api.json --out generated/ --backend go --indexers
//!   sdkgen validate api.json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};

use sdkgen_codegen::generators::{BackendProfile, GeneratorConfig};
use sdkgen_codegen::{generate_outline_from_file, CodeGenerator};

#[derive(Parser, Debug)]
#[clap(name = "sdkgen")]
#[clap(about = "Synthesize SDK method bodies from a model description")]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Generator configuration file (JSON)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend name; overrides the configured backend
    #[clap(short, long, global = true)]
    backend: Option<String>,

    /// The backend has keyed-access syntax, so indexers are kept
    #[clap(long, global = true)]
    indexers: bool,

    /// Models keep their values in a backing store
    #[clap(long, global = true)]
    backing_store: bool,

    /// Log debug output
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the synthesized programs as JSON
    Synthesize {
        description: PathBuf,
    },
    /// Write one outline file per class
    Outline {
        description: PathBuf,
        /// Output directory
        #[clap(short, long, default_value = "generated")]
        out: PathBuf,
    },
    /// Load and validate a description without synthesizing
    Validate {
        description: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "debug"
    } else {
        "info,sdkgen_codegen=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;

    match &args.command {
        Command::Synthesize { description } => {
            let codegen = load(description, config)?;
            let synthesis = codegen.synthesize()?;
            let tree = codegen.tree();

            let classes: Vec<_> = synthesis
                .classes
                .iter()
                .map(|class| {
                    json!({
                        "class": tree.qualified_name(class.class),
                        "strategy": class.resolution.strategy,
                        "programs": class.programs,
                        "failures": class
                            .failures
                            .iter()
                            .map(|f| json!({ "element": f.element, "error": f.error.to_string() }))
                            .collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&classes)?);

            for failure in synthesis.failures() {
                warn!(element = %failure.element, "{}", failure.error);
            }
        }
        Command::Outline { description, out } => {
            let files = generate_outline_from_file(description, out, config)?;
            info!(files, out = %out.display(), "wrote outline");
        }
        Command::Validate { description } => {
            let codegen = load(description, config)?;
            let tree = codegen.tree();
            info!(
                elements = tree.len(),
                classes = tree.classes().len(),
                "description is valid"
            );
        }
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::from_json_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(name) = &args.backend {
        config.backend = if args.indexers {
            BackendProfile::with_indexers(name.clone())
        } else {
            BackendProfile::without_indexers(name.clone())
        };
    } else if args.indexers {
        config.backend.supports_indexers = true;
    }
    if args.backing_store {
        config.uses_backing_store = true;
    }
    Ok(config)
}

fn load(path: &Path, config: GeneratorConfig) -> Result<CodeGenerator> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading description {}", path.display()))?;
    let codegen = CodeGenerator::from_description(&json, config)?;
    info!(
        description = %path.display(),
        classes = codegen.tree().classes().len(),
        "loaded description"
    );
    Ok(codegen)
}
