//! vcardgen CLI
//!
//! Commands: generate, encode, filename
//! Outputs JSON (or the card itself) to stdout, logs to stderr
//! Returns 1 on configuration or data errors, 2 on write failures

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vcardgen_core::{
    derive_filename, nodes_at, resolve_json, CardPipeline, CollisionPolicy, ContactRecord,
    EscapeMode, GeneratorConfig, JsonFileProvider, PipelineError, PluginOptions,
};

#[derive(Parser)]
#[command(name = "vcardgen-cli")]
#[command(about = "vcardgen CLI - contact records to vCard files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root; logo, photo and output paths are relative to it
    #[arg(short, long, default_value = ".")]
    project_root: PathBuf,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one vCard per contact node
    Generate {
        /// Options file (query, organization, logo, url)
        #[arg(short, long)]
        options: PathBuf,

        /// Exported query result (JSON)
        #[arg(short, long)]
        data: PathBuf,

        /// JSON pointer to the node list, e.g. /allTeamMember/nodes
        #[arg(short, long)]
        nodes: String,

        /// Output root under the project root
        #[arg(long, default_value = vcardgen_core::config::DEFAULT_OUTPUT_ROOT)]
        output_root: PathBuf,

        /// Escape ; , \ and newlines in text values
        #[arg(long)]
        escape: bool,

        /// Fail when two contacts map to the same filename
        #[arg(long)]
        reject_collisions: bool,
    },

    /// Encode a single contact and print the card
    Encode {
        /// JSON payload (ContactRecord)
        #[arg(short = 'j', long)]
        payload: String,

        /// Options file for the organization fields
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Escape ; , \ and newlines in text values
        #[arg(long)]
        escape: bool,
    },

    /// Print the filename derived from a name
    Filename {
        #[arg(long)]
        first: String,

        #[arg(long)]
        last: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn escape_mode(escape: bool) -> EscapeMode {
    if escape {
        EscapeMode::Text
    } else {
        EscapeMode::None
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::Generate {
            options,
            data,
            nodes,
            output_root,
            escape,
            reject_collisions,
        } => {
            let options = match PluginOptions::load(&cli.project_root.join(&options)) {
                Ok(o) => o,
                Err(e) => {
                    println!("{}", serde_json::json!({"success": false, "error": e.to_string()}));
                    return ExitCode::FAILURE;
                }
            };

            let collisions = if reject_collisions {
                CollisionPolicy::Reject
            } else {
                CollisionPolicy::Overwrite
            };
            let config = GeneratorConfig::new(options, &cli.project_root)
                .with_output_root(output_root)
                .with_escape(escape_mode(escape))
                .with_collisions(collisions);

            let pipeline = CardPipeline::new(config);
            let provider = JsonFileProvider::new(cli.project_root.join(&data));

            match pipeline.run_with(&provider, |d| nodes_at(d, &nodes), resolve_json) {
                Ok(report) => {
                    let output = serde_json::json!({
                        "success": true,
                        "report": report,
                    });
                    println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!(error = %e, "generation aborted");
                    let output = serde_json::json!({
                        "success": false,
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string(&output).unwrap());
                    match e {
                        PipelineError::Write(_) => ExitCode::from(2),
                        _ => ExitCode::FAILURE,
                    }
                }
            }
        }

        Commands::Encode {
            payload,
            options,
            escape,
        } => {
            let contact: ContactRecord = match serde_json::from_str(&payload) {
                Ok(c) => c,
                Err(e) => {
                    println!("{}", serde_json::json!({"success": false, "error": format!("Invalid payload: {}", e)}));
                    return ExitCode::FAILURE;
                }
            };

            let options = match options {
                Some(path) => match PluginOptions::load(&cli.project_root.join(path)) {
                    Ok(o) => o,
                    Err(e) => {
                        println!("{}", serde_json::json!({"success": false, "error": e.to_string()}));
                        return ExitCode::FAILURE;
                    }
                },
                None => PluginOptions::default(),
            };

            let config = GeneratorConfig::new(options, &cli.project_root).with_escape(escape_mode(escape));
            let pipeline = CardPipeline::new(config);
            let logo = pipeline.load_logo();
            let (card, _) = pipeline.encode_contact(&contact, logo.as_ref());

            print!("{}", card);
            ExitCode::SUCCESS
        }

        Commands::Filename { first, last } => {
            println!("{}", derive_filename(&first, &last));
            ExitCode::SUCCESS
        }
    }
}
