mod shell;

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use querygen_config::AppConfig;
use querygen_core::{io, sql, templates, RelationshipGraph, SchemaEditor};

/// Design database tables and generate CREATE TABLE statements.
#[derive(Parser, Debug)]
#[command(name = "querygen", version, about)]
struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print CREATE TABLE statements for a schema file.
    Sql { file: PathBuf },
    /// List the built-in schema templates.
    Templates,
    /// Write a built-in template as schema JSON.
    Template {
        name: String,
        /// Output file; prints to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the relationship graph of a schema file in Graphviz DOT format.
    Graph { file: PathBuf },
    /// Edit a schema interactively, starting from FILE or an empty schema.
    Shell { file: Option<PathBuf> },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(AppConfig::config_path);
    tracing::debug!("Using config at {}", config_path.display());
    let config = AppConfig::load_or_create(&config_path);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Sql { file } => {
            let schema = io::read_file(&file)?;
            if schema.is_empty() {
                anyhow::bail!("{} contains no tables", file.display());
            }
            writeln!(out, "{}", sql::generate(&schema))?;
        }
        Command::Templates => {
            for template in templates::all() {
                writeln!(
                    out,
                    "{:<12} {} ({}: {})",
                    template.key,
                    template.name,
                    template.summary(),
                    template.table_names().join(", ")
                )?;
            }
        }
        Command::Template { name, output } => {
            let template = templates::find(&name)
                .with_context(|| format!("unknown template '{name}'"))?;
            match output {
                Some(path) => io::write_file(&path, &template.schema, config.pretty_export)?,
                None => {
                    let json = io::to_json(&template.schema, config.pretty_export)
                        .context("Failed to serialize template")?;
                    writeln!(out, "{json}")?;
                }
            }
        }
        Command::Graph { file } => {
            let schema = io::read_file(&file)?;
            write!(out, "{}", RelationshipGraph::from_schema(&schema).to_dot())?;
        }
        Command::Shell { file } => {
            let initial = match file {
                Some(path) => io::read_file(&path)?,
                None => Default::default(),
            };
            tracing::info!("Starting querygen shell");
            let stdin = std::io::stdin();
            let prompt = stdin.is_terminal();
            let mut shell = shell::Shell::new(SchemaEditor::new(initial), config, out);
            shell.run(stdin.lock(), prompt)?;
            tracing::info!(
                "Shell closed with {} table(s)",
                shell.editor().schema().len()
            );
        }
    }

    Ok(())
}
