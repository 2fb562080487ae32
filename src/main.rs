//! PADT stub entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use padt_stub::config::Config;
use padt_stub::metrics;
use padt_stub::server;
use padt_stub::template::{Template, TemplateSource};

/// HTTP test double for the PADT endpoint.
#[derive(Parser, Debug)]
#[command(name = "padt-stub")]
#[command(about = "Answers PADT requests with a templated XML response")]
#[command(version)]
struct Args {
    /// Server listen address, e.g. ":5000" or "127.0.0.1:5000".
    #[arg(long, global = true)]
    listen_addr: Option<String>,

    /// Response template to serve.
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Include logging of request details.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve requests until Ctrl+C or SIGTERM (default).
    Serve,

    /// Check configuration validity.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let loaded = Config::load();

    // Initialize logging before surfacing config errors so they are reported.
    let directive = log_directive(args.debug, &loaded);
    let filter = if args.debug || loaded.as_ref().is_ok_and(|c| c.debug) {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(listen_addr) = args.listen_addr {
        config.listen_addr = listen_addr;
    }
    if let Some(file) = args.file {
        config.file = file;
    }
    if args.debug {
        config.debug = true;
    }

    match args.command {
        Some(Command::CheckConfig) => cmd_check_config(&config).await,
        Some(Command::Serve) | None => cmd_serve(&config).await,
    }
}

/// Log filter directive used when `RUST_LOG` does not apply.
fn log_directive(debug: bool, loaded: &padt_stub::Result<Config>) -> &str {
    match loaded {
        Ok(config) if debug || config.debug => "padt_stub=debug,info",
        Ok(config) => config.log_level.as_str(),
        Err(_) if debug => "padt_stub=debug,info",
        Err(_) => "info",
    }
}

/// Run the stub server.
async fn cmd_serve(config: &Config) -> anyhow::Result<()> {
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
    }

    metrics::init_metrics();

    info!("Serving file {}", config.file.display());
    info!("Server is starting...");

    server::run(config).await.map_err(|e| {
        error!("Server failed on {}: {}", config.listen_addr, e);
        e
    })?;

    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config(config: &Config) -> anyhow::Result<()> {
    println!("======================================================================");
    println!("PADT STUB - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {}", e);
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    print!("Reading response file... ");
    let source = match Template::from_file(&config.file).await {
        Ok(template) => {
            println!("OK");
            println!("  {} bytes", template.as_bytes().len());
            template.source()
        }
        Err(e) => {
            println!("UNREADABLE");
            println!("  Error: {}", e);
            println!("  The built-in default response will be served instead.");
            TemplateSource::Fallback
        }
    };

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Listen Address: {}", config.listen_addr);
    println!("  Response File: {} ({})", config.file.display(), source);
    println!("  Debug: {}", config.debug);
    println!("  Request Timeout: {}s", config.request_timeout_secs);
    println!("  Shutdown Timeout: {}s", config.shutdown_timeout_secs);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use padt_stub::StubError;

    #[test]
    fn directive_follows_loaded_config() {
        let config = Config {
            log_level: "warn".to_string(),
            ..Config::default()
        };
        assert_eq!(log_directive(false, &Ok(config.clone())), "warn");
        assert_eq!(log_directive(true, &Ok(config)), "padt_stub=debug,info");
    }

    #[test]
    fn directive_survives_a_config_load_failure() {
        let loaded = Err(StubError::InvalidConfig("PADT_DEBUG=yes".to_string()));

        assert_eq!(log_directive(false, &loaded), "info");
        assert_eq!(log_directive(true, &loaded), "padt_stub=debug,info");
    }

    #[test]
    fn cli_flags_parse() {
        let args = Args::parse_from([
            "padt-stub",
            "--listen-addr",
            "127.0.0.1:5001",
            "--file",
            "reply.xml",
            "--debug",
            "check-config",
        ]);

        assert_eq!(args.listen_addr.as_deref(), Some("127.0.0.1:5001"));
        assert_eq!(args.file, Some(PathBuf::from("reply.xml")));
        assert!(args.debug);
        assert!(matches!(args.command, Some(Command::CheckConfig)));
    }
}
