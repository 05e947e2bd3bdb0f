mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use commands::show::Format;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-kit")]
#[command(version, about = "Site configuration for the blog's static site generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize a site directory with the built-in configuration
    Init {
        /// Path to create the site directory
        path: PathBuf,
    },

    /// Validate site.toml against the site's pages and assets
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Preview the site shell locally with hot reload
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Deployment base path (e.g. /blog/)
        #[arg(long)]
        base: Option<String>,
    },

    /// Write the generator configuration and shell page
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: PathBuf,

        /// Deployment base path (e.g. /blog/)
        #[arg(long)]
        base: Option<String>,
    },

    /// Print the built-in site configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Toml)]
        format: Format,

        /// Deployment base path, JSON output only
        #[arg(long)]
        base: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Preview { path, port, base } => commands::preview::run(path, port, base).await,
        Command::Build { path, output, base } => commands::build::run(path, output, base).await,
        Command::Show { format, base } => commands::show::run(format, base).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "blog-kit", &mut io::stdout());
            Ok(())
        }
    }
}
