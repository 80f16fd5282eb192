use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reportdraft::cli::OutputFormat;
use reportdraft::cli::commands;

#[derive(Parser)]
#[command(name = "reportdraft")]
#[command(
    version,
    about = "Grounded section drafting for engineering reports"
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
    /// Draft a single section
    Section {
        #[arg(help = "Free-text drafting request")]
        request: String,
        #[arg(long, short = 'c', env = "REPORTDRAFT_COMPANY", help = "Company id")]
        company: String,
        #[arg(long, help = "Override the inferred doc type")]
        doc_type: Option<String>,
        #[arg(long, help = "Override the inferred section type")]
        section_type: Option<String>,
        #[arg(long = "function", help = "Override the inferred engineering function")]
        function: Option<String>,
        #[arg(long, help = "Restrict retrieval to one source artifact")]
        artifact: Option<String>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json, yaml")]
        format: OutputFormat,
    },

    /// Draft a full report section by section
    Report {
        #[arg(help = "Free-text drafting request")]
        request: String,
        #[arg(long, short = 'c', env = "REPORTDRAFT_COMPANY", help = "Company id")]
        company: String,
        #[arg(long, help = "Doc type (inferred from the request when omitted)")]
        doc_type: Option<String>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json, yaml")]
        format: OutputFormat,
    },

    /// Show the section order a report would use
    Order {
        #[arg(long, short = 'c', env = "REPORTDRAFT_COMPANY", help = "Company id")]
        company: String,
        #[arg(long, help = "Doc type (default: design_report)")]
        doc_type: Option<String>,
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json, yaml")]
        format: OutputFormat,
    },

    /// List built-in templates
    Templates {
        #[arg(short = 'f', long, default_value = "text", help = "Output format: text, json, yaml")]
        format: OutputFormat,
    },

    /// Load historical chunks from a JSON Lines file
    Ingest {
        #[arg(help = "Path to a .jsonl file, one chunk per line")]
        path: PathBuf,
        #[arg(long, short = 'c', help = "Company id for chunks that lack one")]
        company: Option<String>,
    },

    /// Store the section order template for a company and doc type
    TemplateSet {
        #[arg(long, short = 'c', help = "Company id")]
        company: String,
        #[arg(long, help = "Doc type")]
        doc_type: String,
        #[arg(required = true, help = "Section types in order")]
        sections: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(short = 'g', long, help = "Show global config file only")]
        global: bool,
        #[arg(long, help = "Print JSON instead of TOML")]
        json: bool,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

fn main() -> ExitCode {
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
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Section {
            request,
            company,
            doc_type,
            section_type,
            function,
            artifact,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::section::run(commands::section::SectionArgs {
                request,
                company,
                doc_type,
                section_type,
                function,
                artifact,
                format,
            }))?;
        }
        Commands::Report {
            request,
            company,
            doc_type,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::report::run(
                &request,
                &company,
                doc_type.as_deref(),
                format,
            ))?;
        }
        Commands::Order {
            company,
            doc_type,
            format,
        } => {
            commands::order::run(&company, doc_type.as_deref(), format)?;
        }
        Commands::Templates { format } => {
            commands::templates::run(format)?;
        }
        Commands::Ingest { path, company } => {
            commands::ingest::run(&path, company.as_deref())?;
        }
        Commands::TemplateSet {
            company,
            doc_type,
            sections,
        } => {
            commands::ingest::set_template(&company, &doc_type, &sections)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { global, json } => commands::config::show(global, json)?,
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { global, force } => commands::config::init(global, force)?,
        },
    }

    Ok(())
}
