/// Parser de la salida de `lsof -iTCP -iUDP -n -P` (macOS).
///
/// ```text
/// COMMAND  PID USER FD  TYPE DEVICE SIZE/OFF NODE NAME
/// sshd     987 root 3u  IPv4 0x0    0t0      TCP  *:22 (LISTEN)
/// ```
use super::fields;
use crate::record::{Protocol, SocketRecord};

/// Columnas mínimas: la novena es el inicio de NAME.
const MIN_COLUMNS: usize = 9;

/// Índice donde empieza la columna NAME (puede contener espacios).
const NAME_COLUMN: usize = 8;

/// Parsea la salida completa de lsof.
///
/// # Arguments
/// * `output` - Salida cruda del comando lsof
///
/// # Returns
/// Vector con un registro por socket TCP/UDP, en el orden de entrada.
pub fn parse_lsof_output(output: &str) -> Vec<SocketRecord> {
    output
        .lines()
        .filter(|line| !line.trim_start().starts_with("COMMAND"))
        .filter_map(parse_single_line)
        .collect()
}

fn parse_single_line(line: &str) -> Option<SocketRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_COLUMNS {
        log::trace!("Línea de lsof descartada (columnas insuficientes): {line}");
        return None;
    }

    let name = parts[NAME_COLUMN..].join(" ");
    let protocol = detect_protocol(&parts, &name)?;
    let (local_address, port) = first_endpoint(&name)?;

    let mut record = SocketRecord::new(port, protocol, local_address);
    record.process_name = Some(parts[0].to_string());
    record.pid = parts[1].parse().ok();
    record.user = Some(parts[2].to_string());
    record.remote_address = fields::remote_arrow(&name);
    if let Some(state) = fields::parenthesized_state(&name) {
        record.state = state.to_string();
    }

    Some(record)
}

/// Busca `TCP`/`UDP` en TYPE, NODE o NAME; las líneas sin ninguno se descartan.
fn detect_protocol(parts: &[&str], name: &str) -> Option<Protocol> {
    let columns = [parts[4], parts[7], name];
    if columns.iter().any(|column| column.contains("TCP")) {
        Some(Protocol::Tcp)
    } else if columns.iter().any(|column| column.contains("UDP")) {
        Some(Protocol::Udp)
    } else {
        None
    }
}

/// Primer token `host:puerto` de NAME, cortando en la flecha `->` si la hay.
fn first_endpoint(name: &str) -> Option<(String, u16)> {
    name.split_whitespace()
        .map(|token| token.split("->").next().unwrap_or(token))
        .find_map(fields::split_host_port)
        .map(|(host, port)| (host.to_string(), port))
}
