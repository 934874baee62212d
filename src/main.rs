use anyhow::Result;
use clap::{Parser, Subcommand};
use deep_automock::cli::{self, DefaultValueArg, ReportFormat, TreeFormat};
use deep_automock::demo::DemoSubject;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "automock",
    version,
    about = "Build objects with every dependency resolved, mocking interfaces automatically"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Demo type to work on
    #[arg(long, global = true, value_enum, default_value = "SystemOrchestrator")]
    subject: DemoSubject,

    /// JSON resolver config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the node-count ceiling
    #[arg(long, global = true)]
    max_nodes: Option<usize>,

    /// Override what unconfigured sequence-returning mock calls yield
    #[arg(long, global = true, value_enum)]
    default_value: Option<DefaultValueArg>,

    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dependency tree of the subject
    Tree {
        #[arg(long, value_enum, default_value_t = TreeFormat::Text)]
        format: TreeFormat,
    },
    /// Resolve the subject and print how each dependency was produced
    Resolve {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Also print the equivalent setup statements
        #[arg(long)]
        script: bool,
    },
    /// Print the strategy of every registered type
    Classify {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli::load_config(cli.config.as_deref(), cli.max_nodes, cli.default_value)?;
    let output = match cli.command {
        Commands::Tree { format } => cli::render_tree(cli.subject, config, format)?,
        Commands::Resolve { format, script } => {
            cli::render_resolution(cli.subject, config, format, script)?
        }
        Commands::Classify { format } => cli::render_classification(format)?,
    };
    print!("{}", output);
    Ok(())
}
