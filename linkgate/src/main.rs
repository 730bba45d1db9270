mod config;
mod telemetry;

use clap::Parser;
use config::{Config, ConfigError};
use deeplink::config::Config as DeepLinkConfig;
use deeplink::device::{DeviceDescriptor, classify};
use deeplink::errors::DeepLinkError;
use deeplink::resource::{ResourceKind, ResourceRequest, RouteError, parse_query, route};
use deeplink::strategy::{Strategy, select};
use deeplink::targets::AppTargets;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
enum CliCommand {
    /// Serve deep links over HTTP
    Serve {
        #[arg(long)]
        config: PathBuf,
    },
    /// Print how a User-Agent is classified
    Classify { user_agent: String },
    /// Print the strategy selected for a path, without starting a server
    Resolve {
        /// Request path, optionally with a query string
        path: String,
        #[arg(long, default_value = "")]
        user_agent: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Serve(#[from] DeepLinkError),
    #[error("could not set up metrics: {0}")]
    Metrics(String),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct Resolution {
    resource: ResourceKind,
    device: DeviceDescriptor,
    #[serde(flatten)]
    strategy: Option<Strategy>,
}

fn main() -> ExitCode {
    let cli = CliCommand::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: CliCommand) -> Result<(), CliError> {
    match cli {
        CliCommand::Serve { config } => serve(Config::load(&config)?),
        CliCommand::Classify { user_agent } => {
            println!("{}", serde_json::to_string_pretty(&classify(&user_agent))?);
            Ok(())
        }
        CliCommand::Resolve {
            path,
            user_agent,
            config,
        } => {
            let deeplink_config = match config {
                Some(path) => Config::load(&path)?.deeplink,
                None => DeepLinkConfig::default(),
            };
            let resolution = resolve(&path, &user_agent, &deeplink_config)?;
            println!("{}", serde_json::to_string_pretty(&resolution)?);
            Ok(())
        }
    }
}

fn serve(config: Config) -> Result<(), CliError> {
    let _sentry = telemetry::init_logging(
        config.common.logging.as_ref(),
        config.deeplink.deployment.environment,
    );
    if let Some(metrics) = &config.common.metrics {
        telemetry::init_metrics(metrics).map_err(CliError::Metrics)?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(deeplink::run(config.deeplink))?;

    Ok(())
}

fn resolve(
    path_and_query: &str,
    user_agent: &str,
    config: &DeepLinkConfig,
) -> Result<Resolution, RouteError> {
    let (path, query) = match path_and_query.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_and_query, None),
    };
    let resource = route(path, &parse_query(query))?;
    let device = classify(user_agent);

    let strategy = match &resource {
        ResourceRequest::Link(link) => {
            Some(select(link, &device, &AppTargets::from_config(config)))
        }
        ResourceRequest::Home | ResourceRequest::Health | ResourceRequest::NotFound => None,
    };

    Ok(Resolution {
        resource: resource.kind(),
        device,
        strategy,
    })
}
