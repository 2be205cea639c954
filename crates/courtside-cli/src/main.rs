//! courtside CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use courtside_availability::{AvailabilityResolver, ServiceConfig};
use courtside_core::{TracingConfig, init_tracing};
use tracing::debug;

use courtside_cli::cli::{Cli, Command, ConfigAction};
use courtside_cli::commands::{availability, config};
use courtside_cli::error::{CliError, CliResult};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::for_cli(cli.debug, cli.log_format.into())) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Lookup(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ServiceConfig::default_path);
    let mut service_config = match cli.config {
        Some(ref path) => ServiceConfig::load_from(path)?,
        None => ServiceConfig::load()?,
    };
    if cli.debug {
        service_config.debug = true;
    }
    debug!(path = %config_path.display(), "loaded configuration");

    let pretty = cli.pretty;
    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Dump => config::dump(&service_config, &config_path),
            ConfigAction::Validate => config::validate(&service_config),
            ConfigAction::Path => config::path(&config_path),
        },
        Command::Providers => availability::providers(pretty),
        command => {
            service_config.validate()?;
            let resolver = AvailabilityResolver::from_config(&service_config)?;
            dispatch(&resolver, command, pretty).await
        }
    }
}

async fn dispatch(
    resolver: &AvailabilityResolver,
    command: Command,
    pretty: bool,
) -> CliResult<()> {
    match command {
        Command::Availability { provider_id, dates } => {
            availability::availability(resolver, &provider_id, dates.to_params(), pretty).await
        }
        Command::Today {
            provider_id,
            facility_external_id,
            include_tomorrow,
        } => {
            availability::today(
                resolver,
                &provider_id,
                facility_external_id.as_deref(),
                include_tomorrow,
                pretty,
            )
            .await
        }
        Command::Local { facility_id, dates } => {
            availability::local(resolver, &facility_id, &dates, pretty).await
        }
        Command::HasTemplates { facility_id } => {
            availability::has_templates(resolver, &facility_id, pretty).await
        }
        Command::Resolve {
            facility_id,
            provider,
            dates,
        } => {
            availability::resolve(
                resolver,
                &facility_id,
                provider.as_deref(),
                dates.to_params(),
                pretty,
            )
            .await
        }
        Command::Next {
            facility_id,
            provider,
            dates,
            count,
        } => {
            availability::next(
                resolver,
                &facility_id,
                provider.as_deref(),
                dates.to_params(),
                count,
                pretty,
            )
            .await
        }
        Command::Providers | Command::Config { .. } => Ok(()),
    }
}
