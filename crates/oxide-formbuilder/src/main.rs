//! oxide-formbuilder CLI
//!
//! Renders and validates forms described by JSON definitions.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_formbuilder::{
    FormContext, FormDefinition, SessionTokens, SubmittedData, UploadedFiles, ValidatorRegistry,
};

/// Declarative HTML forms with ordered validator chains.
#[derive(Parser)]
#[command(name = "oxide-formbuilder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a form as HTML.
    Render {
        /// Form definition file (JSON).
        #[arg(short, long)]
        definition: PathBuf,

        /// Submitted data, URL-encoded (`name=value&...`).
        #[arg(long, default_value = "")]
        data: String,
    },

    /// Validate submitted data and print a JSON report.
    Validate {
        /// Form definition file (JSON).
        #[arg(short, long)]
        definition: PathBuf,

        /// Submitted data, URL-encoded (`name=value&...`).
        #[arg(long)]
        data: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let registry = ValidatorRegistry::with_builtins();
    let tokens = SessionTokens::new();
    let files = UploadedFiles::new();

    match cli.command {
        Commands::Render { definition, data } => {
            let definition = FormDefinition::from_path(&definition)?;
            let data = SubmittedData::from_urlencoded(&data);
            let ctx = FormContext::new(&registry, &data, &files).with_anti_forgery(&tokens);

            let form = definition.build(ctx);
            debug!(fields = form.inputs().len(), "rendering form");
            form.render_to(io::stdout().lock())?;
            println!();
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate { definition, data } => {
            let definition = FormDefinition::from_path(&definition)?;
            let data = SubmittedData::from_urlencoded(&data);
            let ctx = FormContext::new(&registry, &data, &files).with_anti_forgery(&tokens);

            let mut form = definition.build(ctx);
            let valid = form.validate()?;
            let errors = form.errors();
            let report = json!({
                "valid": valid,
                "values": form.get_safe_values()?,
                "errors": errors.iter().collect::<BTreeMap<_, _>>(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);

            if valid {
                info!("Submission is valid.");
                Ok(ExitCode::SUCCESS)
            } else {
                info!("{} field(s) failed validation.", errors.len());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
