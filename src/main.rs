use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Forge - Manage AI agents, rules, and skills from a centralized registry
#[derive(Parser)]
#[command(name = "forge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logs on stderr (same as FORGE_LOG=forge=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .forge/config.yaml here, or scaffold a registry with --registry
    Init {
        /// Comma-separated project types: data, backend, frontend, infra, product
        #[arg(short, long, default_value = "backend")]
        project_type: String,

        /// Registry Git URL [default: registry.default_url from ~/.forge/config.toml]
        #[arg(short, long)]
        registry_url: Option<String>,

        /// Registry branch or tag [default: registry.default_ref, usually main]
        #[arg(long)]
        registry_ref: Option<String>,

        /// Scaffold a registry repo instead of a project config
        #[arg(long)]
        registry: bool,

        /// Add minimal example items (only with --registry)
        #[arg(long, requires = "registry")]
        with_examples: bool,
    },

    /// List items available in the registry
    List {
        /// Filter by kind: agent, rule, skill, bundle, workflow, prompt
        #[arg(short, long)]
        category: Option<String>,

        /// Override the project's types (comma-separated)
        #[arg(short, long, conflicts_with = "all")]
        project_type: Option<String>,

        /// Show every item regardless of project type
        #[arg(short, long)]
        all: bool,

        /// Show installed items instead of the registry
        #[arg(short, long)]
        installed: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Install an agent, rule, skill, or bundle
    Install {
        /// agent, rule, skill, or bundle
        kind: String,

        /// Item id
        id: String,
    },

    /// Remove an installed agent, rule, or skill
    Remove {
        /// agent, rule, or skill
        kind: String,

        /// Item id
        id: String,
    },

    /// Reinstall items from the latest registry
    Update {
        /// agent, rule, or skill (omit to update everything)
        kind: Option<String>,

        /// Item id
        id: Option<String>,
    },

    /// Show details of a registry item
    Describe {
        /// Item kind
        kind: String,

        /// Item id
        id: String,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Initialize tracing on stderr so stdout stays clean for command output
fn init_tracing(verbose: bool) {
    let default = if verbose { "forge=debug" } else { "forge=warn" };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("FORGE_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init {
            project_type,
            registry_url,
            registry_ref,
            registry,
            with_examples,
        } => commands::init::run(
            project_type,
            registry_url,
            registry_ref,
            registry,
            with_examples,
        ),
        Commands::List {
            category,
            project_type,
            all,
            installed,
            json,
        } => commands::list::run(category, project_type, all, installed, json),
        Commands::Install { kind, id } => commands::install::run(kind, id),
        Commands::Remove { kind, id } => commands::remove::run(kind, id),
        Commands::Update { kind, id } => commands::update::run(kind, id),
        Commands::Describe { kind, id, json } => commands::describe::run(kind, id, json),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "forge", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
