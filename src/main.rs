//! # PortScout 🔎
//!
//! Herramienta de línea de comandos que lista los puertos TCP/UDP abiertos
//! y los procesos que los usan, en Linux, macOS y Windows.
//!
//! ## Uso
//! ```text
//! portscout list -P tcp -s listen
//! portscout stats --json
//! portscout kill 1234
//! ```

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;

use portscout::cli::{Cli, Command, ListArgs};
use portscout::command::SystemRunner;
use portscout::config::Config;
use portscout::{filter_records, format, killer, port_scanner, Platform, ScanSummary};

#[cfg(all(feature = "tray", target_os = "linux"))]
mod tray;

/// Desvincula el proceso de la terminal que lo inició.
///
/// Llama a `setsid()` para crear una nueva sesión de proceso sin
/// terminal de control. Esto evita que la bandeja reciba SIGHUP
/// cuando la terminal padre se cierra.
#[cfg(all(feature = "tray", target_os = "linux"))]
fn daemonize() {
    // setsid() falla si el proceso ya es líder de sesión; en ese caso
    // ya está desenganchado
    if let Err(err) = nix::unistd::setsid() {
        log::debug!("setsid() no aplicable en este contexto: {err}");
    }
}

/// Inicializa el logging: `warn` por defecto (`info` para la bandeja),
/// `debug` con `--verbose`, siempre sobreescribible con RUST_LOG.
fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else {
        match cli.command {
            #[cfg(all(feature = "tray", target_os = "linux"))]
            Command::Tray => "info",
            _ => "warn",
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    log::debug!("PortScout v{} iniciando...", env!("CARGO_PKG_VERSION"));

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::List(args) => list(&args),
        Command::Stats { json } => stats(json),
        Command::Kill { pid, demo } => {
            let mut config = Config::from_env();
            config.demo_mode |= demo;
            let platform = Platform::current()?;
            killer::kill_process(&SystemRunner, pid, platform, &config)?;
            println!("Proceso {pid} terminado");
            Ok(())
        }
        #[cfg(all(feature = "tray", target_os = "linux"))]
        Command::Tray => {
            // Desengancharse de la terminal para sobrevivir al cierre de la sesión
            daemonize();
            tray::run_tray(Config::from_env());
            Ok(())
        }
    }
}

fn list(args: &ListArgs) -> Result<(), Box<dyn Error>> {
    let result = port_scanner::scan()?;
    let records = filter_records(&result.records, &args.filter_spec());

    if args.json {
        println!("{}", format::format_json(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", format::EMPTY_MESSAGE);
    } else {
        format::build_table(&records).printstd();
    }
    if !args.no_summary {
        println!("{}", format::format_summary(&ScanSummary::from_records(&records)));
    }
    Ok(())
}

fn stats(json: bool) -> Result<(), Box<dyn Error>> {
    let result = port_scanner::scan()?;
    let summary = ScanSummary::from_records(&result.records);

    if json {
        let report = serde_json::json!({
            "platform": result.platform,
            "timestamp": result.timestamp,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Plataforma: {}", result.platform);
        println!("Escaneo: {}", result.timestamp.to_rfc3339());
        println!("{}", format::format_summary(&summary));
    }
    Ok(())
}
