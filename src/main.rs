use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apiscribe::cli::commands;
use apiscribe::pipeline::DocumentSelection;

#[derive(Parser)]
#[command(name = "apiscribe")]
#[command(
    version,
    about = "Generate PDF and notebook documentation for discovery-catalog APIs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web form and download server
    Serve {
        #[arg(long, help = "Bind host (overrides config)")]
        host: Option<String>,
        #[arg(long, short, help = "Bind port (overrides config)")]
        port: Option<u16>,
    },

    /// List APIs published by the discovery directory
    Catalog {
        #[arg(long, short, default_value = "text", value_parser = ["text", "json"])]
        format: String,
        #[arg(long, help = "Only show APIs whose name or title contains this text")]
        filter: Option<String>,
    },

    /// Generate documentation for one API
    Generate {
        #[arg(long, short, help = "API name from the catalog (e.g. drive)")]
        api: String,
        #[arg(long, help = "Version shown in the documents (defaults to the catalog version)")]
        version: Option<String>,
        #[arg(
            long,
            env = "GEMINI_API_KEY",
            hide_env_values = true,
            help = "Text-generation credential"
        )]
        api_key: Option<String>,
        #[arg(long, env = "OPENAI_API_KEY", hide = true, hide_env_values = true)]
        openai_api_key: Option<String>,
        #[arg(long, conflicts_with = "notebook_only", help = "Only render the PDF")]
        pdf_only: bool,
        #[arg(long, help = "Only render the notebook")]
        notebook_only: bool,
        #[arg(long, short, help = "Output directory (overrides config)")]
        output: Option<PathBuf>,
        #[arg(long, help = "Reuse generated text across both documents")]
        reuse_content: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show {
        #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Initialize the global config instead of the project")]
        global: bool,
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mapiscribe encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // RUST_BACKTRACE=1 still prints through the default hook
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::serve::run(host, port))?;
        }
        Commands::Catalog { format, filter } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::catalog::run(&format, filter.as_deref()))?;
        }
        Commands::Generate {
            api,
            version,
            api_key,
            openai_api_key,
            pdf_only,
            notebook_only,
            output,
            reuse_content,
        } => {
            let documents = if pdf_only {
                DocumentSelection::PdfOnly
            } else if notebook_only {
                DocumentSelection::NotebookOnly
            } else {
                DocumentSelection::Both
            };

            let options = commands::generate::GenerateOptions {
                api,
                version,
                gemini_key: api_key,
                openai_key: openai_api_key,
                documents,
                output_dir: output,
                reuse_content,
                quiet: cli.quiet,
            };
            let rt = Runtime::new()?;
            rt.block_on(commands::generate::run(options))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => commands::config::show(&format)?,
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { global, force } => commands::config::init(global, force)?,
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pdf_and_notebook_only_conflict() {
        let result = Cli::try_parse_from([
            "apiscribe",
            "generate",
            "--api",
            "drive",
            "--pdf-only",
            "--notebook-only",
        ]);
        assert!(result.is_err());
    }
}
