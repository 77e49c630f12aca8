/// Formateo de registros para la línea de comandos.
use prettytable::{format, Cell, Row, Table};

use crate::filter::ScanSummary;
use crate::record::{Protocol, SocketRecord};

/// Mensaje mostrado cuando ningún registro coincide con el filtro.
pub const EMPTY_MESSAGE: &str = "No se encontraron puertos que coincidan con los criterios.";

const HEADERS: [&str; 9] = [
    "PORT",
    "PROTO",
    "STATE",
    "PID",
    "PROCESS",
    "USER",
    "LOCAL ADDR",
    "REMOTE ADDR",
    "SOURCE",
];

/// Construye la tabla de registros.
///
/// Los colores (estilos `F*` de prettytable) solo se ven al imprimir en
/// una terminal con `printstd`.
pub fn build_table(records: &[SocketRecord]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    table.set_titles(Row::new(
        HEADERS.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
    ));

    for record in records {
        table.add_row(Row::new(vec![
            Cell::new(&record.port.to_string()).style_spec("Fc"),
            Cell::new(record.protocol.as_str()).style_spec(protocol_style(record.protocol)),
            Cell::new(&record.state).style_spec(state_style(&record.state)),
            Cell::new(&optional(record.pid.map(|pid| pid.to_string()).as_deref())),
            Cell::new(&optional(record.process_name.as_deref())).style_spec("Fy"),
            Cell::new(&optional(record.user.as_deref())),
            Cell::new(&record.local_address),
            Cell::new(&optional(record.remote_address.as_deref())),
            Cell::new(&optional(record.source.as_deref())).style_spec("Fm"),
        ]));
    }

    table
}

/// Serializa los registros como JSON con sangría.
pub fn format_json(records: &[SocketRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Resumen de conteos que acompaña a la tabla.
pub fn format_summary(summary: &ScanSummary) -> String {
    format!(
        "\nResumen:\n  Total de puertos: {}\n  TCP: {} | UDP: {}\n  Escuchando: {} | Establecidos: {}\n  Procesos: {}",
        summary.total,
        summary.tcp,
        summary.udp,
        summary.listening,
        summary.established,
        summary.processes
    )
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn protocol_style(protocol: Protocol) -> &'static str {
    match protocol {
        Protocol::Tcp => "Fg",
        Protocol::Udp => "Fb",
    }
}

fn state_style(state: &str) -> &'static str {
    match state.to_ascii_uppercase().as_str() {
        "LISTEN" | "LISTENING" => "Fg",
        "ESTABLISHED" => "Fb",
        "TIME_WAIT" | "CLOSE_WAIT" => "Fy",
        "CLOSED" => "Fr",
        _ => "Fw",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SocketRecord {
        let mut record = SocketRecord::new(8080, Protocol::Tcp, "127.0.0.1");
        record.state = "LISTEN".to_string();
        record.pid = Some(1234);
        record.process_name = Some("node".to_string());
        record
    }

    #[test]
    fn test_table_contains_headers_and_values() {
        let rendered = build_table(&[sample()]).to_string();
        assert!(rendered.contains("PORT"));
        assert!(rendered.contains("REMOTE ADDR"));
        assert!(rendered.contains("8080"));
        assert!(rendered.contains("node"));
        assert!(rendered.contains("127.0.0.1"));
    }

    #[test]
    fn test_json_uses_nulls() {
        let json = format_json(&[sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["port"], 8080);
        assert_eq!(value[0]["pid"], 1234);
        assert!(value[0]["source"].is_null());
    }

    #[test]
    fn test_summary_text() {
        let summary = ScanSummary::from_records(&[sample()]);
        let text = format_summary(&summary);
        assert!(text.contains("Total de puertos: 1"));
        assert!(text.contains("TCP: 1 | UDP: 0"));
        assert!(text.contains("Escuchando: 1"));
        assert!(text.contains("Procesos: 1"));
    }
}
