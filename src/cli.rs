//! Argumentos de línea de comandos de PortScout.
use clap::{Parser, Subcommand, ValueEnum};

use crate::record::{FilterSpec, Protocol};

#[derive(Parser, Debug)]
#[command(name = "portscout", version)]
#[command(about = "Lista los puertos abiertos del sistema y los procesos que los usan", long_about = None)]
pub struct Cli {
    /// Muestra mensajes de depuración (equivale a RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lista los puertos abiertos
    List(ListArgs),

    /// Muestra estadísticas del escaneo
    Stats {
        /// Salida en JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Termina el proceso con el PID indicado
    Kill {
        /// PID del proceso
        pid: u32,

        /// Activa el modo demo: rechaza la terminación
        #[arg(long)]
        demo: bool,
    },

    /// Inicia el icono en la bandeja del sistema
    #[cfg(all(feature = "tray", target_os = "linux"))]
    Tray,
}

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    /// Filtra por número de puerto
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Filtra por protocolo
    #[arg(short = 'P', long, value_enum)]
    pub protocol: Option<ProtocolArg>,

    /// Filtra por estado (LISTEN, ESTABLISHED...)
    #[arg(short, long)]
    pub state: Option<String>,

    /// Filtra por nombre de proceso
    #[arg(short = 'n', long = "process")]
    pub process: Option<String>,

    /// Filtra por ruta del ejecutable
    #[arg(short = 'S', long)]
    pub source: Option<String>,

    /// Salida en JSON
    #[arg(short, long)]
    pub json: bool,

    /// Oculta el resumen
    #[arg(long)]
    pub no_summary: bool,
}

impl ListArgs {
    /// Traduce los flags de filtrado a un `FilterSpec`.
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            port: self.port,
            protocol: self.protocol.map(Protocol::from),
            state: self.state.clone(),
            process_name: self.process.clone(),
            source: self.source.clone(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProtocolArg {
    Tcp,
    Udp,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Tcp => Protocol::Tcp,
            ProtocolArg::Udp => Protocol::Udp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_flags_to_filter_spec() {
        let cli = Cli::try_parse_from([
            "portscout", "list", "-p", "8080", "-P", "tcp", "-n", "node", "--json",
        ])
        .unwrap();

        let Command::List(args) = cli.command else {
            panic!("se esperaba el subcomando list");
        };
        assert!(args.json);
        let spec = args.filter_spec();
        assert_eq!(spec.port, Some(8080));
        assert_eq!(spec.protocol, Some(Protocol::Tcp));
        assert_eq!(spec.process_name.as_deref(), Some("node"));
        assert_eq!(spec.state, None);
    }

    #[test]
    fn test_list_without_flags_is_empty_filter() {
        assert!(ListArgs::default().filter_spec().is_empty());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["portscout", "list", "-p", "70000"]).is_err());
    }
}
