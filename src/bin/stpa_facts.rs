//! STPA Facts CLI
//!
//! Extracts the control structure of a Capella project into a Prolog-style
//! fact file and inspects project representations.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stpa_facts::model::parse_analysis;
use stpa_facts::{ExtractConfig, Pipeline, Project};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stpa-facts")]
#[command(about = "Extract STPA control-flow facts from Capella projects")]
struct Cli {
    /// Configuration file (defaults: stpa.toml, .stpa.toml, config/stpa.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract facts and (re)write the fact file
    Extract {
        /// Project directory containing <name>.afm and <name>.aird
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Diagram display name
        #[arg(short, long)]
        diagram: Option<String>,

        /// Output fact file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// SQLite knowledge base for protocol enrichment
        #[arg(long)]
        database: Option<PathBuf>,

        /// Do not require the STPA/cybersecurity viewpoints
        #[arg(long)]
        skip_plugin_check: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List views and representation descriptors of a project
    Diagrams {
        /// Project directory
        #[arg(short, long)]
        project: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config {
        /// Write it to this file instead of stdout
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref().map(|p| p.to_string_lossy().into_owned());
    let mut config =
        ExtractConfig::load_from(config_path.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Extract {
            project,
            diagram,
            output,
            database,
            skip_plugin_check,
            json,
        } => {
            if let Some(project) = project {
                config.project.dir = project;
            }
            if let Some(diagram) = diagram {
                config.project.diagram = diagram;
            }
            if let Some(output) = output {
                config.project.output = output;
            }
            if database.is_some() {
                config.database.path = database;
            }
            if skip_plugin_check {
                config.plugins.check = false;
            }

            let summary = Pipeline::new(config).run()?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                if !summary.diagram_found {
                    println!("⚠️  Diagram not found: {}", summary.diagram);
                }
                println!("✅ Wrote {} facts to {:?}", summary.total(), summary.output);
                println!("   controlFlow:           {}", summary.control_flow);
                println!("   physicalLayer:         {}", summary.physical_layer);
                println!("   weaknessPhysicalLayer: {}", summary.weakness_physical_layer);
                println!("   attackGoal:            {}", summary.attack_goal);
                if !summary.protocols.is_empty() {
                    println!("   protocols: {}", summary.protocols.join(", "));
                }
            }
            Ok(())
        }

        Commands::Diagrams { project } => {
            let dir = project.unwrap_or(config.project.dir);
            let project = Project::load(&dir)?;
            let analysis = parse_analysis(project.analysis_root());

            for resource in &analysis.semantic_resources {
                println!("📦 {}", resource);
            }
            for view in &analysis.views {
                println!(
                    "📁 {} ({})",
                    view.uid.as_deref().unwrap_or("<no uid>"),
                    view.viewpoint.as_deref().unwrap_or("no viewpoint")
                );
                for descriptor in &view.descriptors {
                    println!("   {} -> {}", descriptor.name, descriptor.ref_path);
                }
            }
            Ok(())
        }

        Commands::Config { save } => {
            match save {
                Some(path) => {
                    config
                        .save(&path.to_string_lossy())
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("✅ Saved configuration to {:?}", path);
                }
                None => print!("{}", config.to_toml()?),
            }
            Ok(())
        }
    }
}
