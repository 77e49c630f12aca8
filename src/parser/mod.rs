//! Parsers de los tres dialectos de texto soportados.
//!
//! Son transformaciones puras texto → registros: no invocan procesos,
//! no deduplican y nunca fallan. Una línea que no se entiende se salta.

mod fields;
mod lsof;
mod netstat;
mod ss;

pub use lsof::parse_lsof_output;
pub use netstat::parse_netstat_output;
pub use ss::parse_ss_output;

use crate::platform::Platform;
use crate::record::SocketRecord;

/// Formato de salida de una herramienta de inspección de red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `ss` (Linux moderno)
    SocketStatistics,
    /// `netstat` (tabla de conexiones clásica)
    ConnectionTable,
    /// `lsof` (ficheros abiertos por proceso)
    OpenFiles,
}

/// Parsea `output` con el parser que corresponde al dialecto.
///
/// `platform` solo se usa para elegir la variante de columnas de netstat.
pub fn parse(dialect: Dialect, output: &str, platform: Platform) -> Vec<SocketRecord> {
    match dialect {
        Dialect::SocketStatistics => parse_ss_output(output),
        Dialect::ConnectionTable => parse_netstat_output(output, platform),
        Dialect::OpenFiles => parse_lsof_output(output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Protocol;

    /// Todo registro emitido tiene puerto, protocolo y estado
    #[test]
    fn test_every_dialect_fills_required_fields() {
        let samples = [
            (
                Dialect::SocketStatistics,
                "tcp LISTEN 0 128 127.0.0.1:8080 *:* users:((\"node\",pid=1234,fd=20))\nudp UNCONN 0 0 *:5353 *:*",
                Platform::Linux,
            ),
            (
                Dialect::ConnectionTable,
                "tcp 0 0 0.0.0.0:22 0.0.0.0:* LISTEN 987/sshd\nudp 0 0 0.0.0.0:68 0.0.0.0:*",
                Platform::Linux,
            ),
            (
                Dialect::OpenFiles,
                "sshd 987 root 3u IPv4 0x0 0t0 TCP *:22 (LISTEN)\nmdns 1 root 6u IPv4 0x0 0t0 UDP *:5353",
                Platform::MacOs,
            ),
        ];

        for (dialect, output, platform) in samples {
            let records = parse(dialect, output, platform);
            assert_eq!(records.len(), 2, "{dialect:?}");
            for record in &records {
                assert!(!record.state.is_empty());
                assert!(matches!(record.protocol, Protocol::Tcp | Protocol::Udp));
                assert!(record.source.is_none());
            }
        }
    }

    #[test]
    fn test_empty_output_yields_nothing() {
        for dialect in [
            Dialect::SocketStatistics,
            Dialect::ConnectionTable,
            Dialect::OpenFiles,
        ] {
            assert!(parse(dialect, "", Platform::Linux).is_empty());
        }
    }
}
