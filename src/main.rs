use anyhow::{anyhow, Result};
use ddnscrab::{Config, PipeBackend, Shared};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Backend,
    Web,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut first_args = std::env::args().take(3);
    let (program_name, command, config_file) = (
        first_args.next().unwrap_or("ddnscrab".to_string()),
        first_args.next(),
        first_args.next(),
    );

    let command = command_init(&program_name, command.as_deref())?;
    let config = config_init(&program_name, config_file)?;
    let host_store = config.host_store()?;

    match command {
        Command::Backend => {
            // stdout belongs to PowerDNS from here on; logs go to stderr.
            tracing::info!("starting pipe backend for {}", &config.domain);
            let backend = PipeBackend::new(config.zone()?, host_store, config.verbose);
            backend
                .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
        }
        Command::Web => {
            tracing::info!("API listening on {}", &config.api_bind_addr);
            let api_server = ddnscrab::api::new(config.clone(), host_store);
            let api_handle = tokio::spawn(api_server);

            tokio::select! {
                _ = signal::ctrl_c() => {
                    tracing::info!("quitting from signal");
                },
                Ok(api_res) = api_handle => {
                    if let Err(err) = api_res {
                        return Err(err.into())
                    }
                }
            }
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ddnscrab=info".into()),
        )
        .init();
}

fn usage(program_name: &str) -> anyhow::Error {
    anyhow!("usage: {program_name} [backend|web] /path/to/config.json")
}

fn command_init(program_name: &str, command: Option<&str>) -> Result<Command> {
    match command {
        Some("backend") => Ok(Command::Backend),
        Some("web") => Ok(Command::Web),
        _ => Err(usage(program_name)),
    }
}

fn config_init(program_name: &str, config_file: Option<String>) -> Result<Shared> {
    match config_file {
        None => Err(usage(program_name)),
        Some(config_file) => {
            let config = Config::try_from_file(&config_file)?;
            tracing::debug!("loaded config from {config_file}");
            Ok(Arc::new(config))
        }
    }
}
