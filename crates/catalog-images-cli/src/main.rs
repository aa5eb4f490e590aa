use anyhow::Context;
use catalog_images_core::discovery::collect_candidates;
use catalog_images_core::identity::identities_of;
use catalog_images_core::{logging, validate, Config, ImageCollection, ValidationReport};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "catalog-images")]
#[command(about = "Validate and stage product listing images")]
#[command(version)]
struct Cli {
    /// Write logs to a rotating file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify files as valid, duplicate or invalid
    Validate {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Files already accepted, used for duplicate detection
        #[arg(long, num_args = 1..)]
        existing: Vec<PathBuf>,
    },

    /// Add files to an image collection, one batch per path
    Stage {
        /// Files or directories, each submitted as its own batch
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Override the collection capacity
        #[arg(long)]
        capacity: Option<usize>,

        /// File name of the image to feature
        #[arg(long)]
        feature: Option<String>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "catalog-images.json")]
        path: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn print_report(report: &ValidationReport) {
    for valid in &report.valid {
        println!("  valid      {}  [{}]", valid.file.name, valid.identity);
    }
    for duplicate in &report.duplicates {
        println!("  duplicate  {}  ({:?})", duplicate.name, duplicate.kind);
    }
    for invalid in &report.invalid {
        println!("  invalid    {}  ({})", invalid.name, invalid.reason);
    }
    for notice in report.notices() {
        println!("! {}", notice);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match &cli.log_dir {
        Some(dir) => logging::init_logger(dir, config.log_level.to_level_filter())?,
        None => env_logger::init(),
    }

    match cli.command {
        Commands::Validate { paths, existing } => {
            let candidates = collect_candidates(&paths)?;
            let existing_files = collect_candidates(&existing)?;
            let existing = identities_of(&existing_files, config.validator.identity);

            info!(
                "Validating {} files against {} existing",
                candidates.len(),
                existing.len()
            );
            let report = validate(&candidates, &config.validator, &existing);
            print_report(&report);
            Ok(())
        }

        Commands::Stage {
            paths,
            capacity,
            feature,
        } => {
            let mut config = config;
            if let Some(capacity) = capacity {
                config.capacity = capacity;
            }
            config.validate()?;

            let collection = ImageCollection::new(config);
            for path in &paths {
                let batch = collect_candidates(&[path])?;
                println!("Batch {}", path.display());
                match collection.add_files(batch) {
                    Ok(outcome) => {
                        print_report(&outcome.report);
                        if outcome.truncated > 0 {
                            println!("! {} files skipped, collection is full", outcome.truncated);
                        }
                    }
                    Err(e) => println!("! {}", e),
                }
            }

            if let Some(name) = feature {
                let target = collection.entries().into_iter().find(|entry| {
                    entry
                        .source_file
                        .as_ref()
                        .map(|file| file.name == name)
                        .unwrap_or(false)
                });
                match target {
                    Some(entry) => {
                        collection.set_featured(&entry.id);
                    }
                    None => println!("! No staged image named {}", name),
                }
            }

            println!("Collection ({}/{})", collection.len(), collection.config().capacity);
            for entry in collection.entries() {
                let name = entry
                    .source_file
                    .as_ref()
                    .map(|file| file.name.as_str())
                    .unwrap_or("");
                println!(
                    "{} {:<10} {:<16} {}",
                    if entry.is_featured { "*" } else { " " },
                    entry.id,
                    entry.display_url,
                    name
                );
            }
            Ok(())
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}
