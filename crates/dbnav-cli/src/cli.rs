//! dbnav - generate backend statements from the command line

mod args;
mod logging;
mod output;
mod settings;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dbnav_core::BackendKind;
use dbnav_dialects::DialectRegistry;

use args::{Cli, Command, GenerateArgs, OutputFormat};
use logging::LoggingConfig;

/// Generation or configuration failed
const EXIT_FAILURE: u8 = 1;
/// The backend cannot express the requested operation
const EXIT_UNSUPPORTED: u8 = 2;

enum Outcome {
    Done,
    Unsupported,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match logging::init(LoggingConfig::for_verbosity(cli.verbose, cli.log_file)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("dbnav: warning: logging unavailable: {e:#}");
            None
        }
    };

    match run(cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Unsupported) => ExitCode::from(EXIT_UNSUPPORTED),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("dbnav: error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<Outcome> {
    let config = settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(Outcome::Done)
        }
        Command::Backends => {
            let registry = DialectRegistry::with_config(&config)?;
            println!("{}", output::backends_table(&registry)?);
            Ok(Outcome::Done)
        }
        Command::Capabilities { backend } => {
            let registry = DialectRegistry::with_config(&config)?;
            match backend {
                Some(tag) => {
                    let dialect = registry.resolve_tag(&tag)?;
                    println!("{}", output::capability_list(dialect.as_ref()));
                }
                None => println!("{}", output::capability_matrix(&registry)?),
            }
            Ok(Outcome::Done)
        }
        Command::Generate(args) => generate(&DialectRegistry::with_config(&config)?, &args),
    }
}

fn generate(registry: &DialectRegistry, args: &GenerateArgs) -> Result<Outcome> {
    let kind = BackendKind::from_tag(&args.backend)?;
    let request = args.to_request()?;
    let dialect = registry.resolve(kind)?;

    tracing::debug!(backend = %kind, operation = %request.operation(), "generating statement");
    let result = dialect.generate(&request).with_context(|| {
        format!(
            "{} cannot generate {}",
            kind.display_name(),
            request.operation()
        )
    })?;

    let text = output::format_result(&result, args.format)?;
    if result.is_unsupported() {
        match args.format {
            OutputFormat::Json => println!("{text}"),
            OutputFormat::Text => eprintln!("dbnav: {text}"),
        }
        return Ok(Outcome::Unsupported);
    }

    println!("{text}");
    Ok(Outcome::Done)
}
