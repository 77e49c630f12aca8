/// Parser de la salida de `ss -tulnp` (Linux moderno).
///
/// Formato esperado:
/// ```text
/// Netid State  Recv-Q Send-Q Local Address:Port Peer Address:Port Process
/// tcp   LISTEN 0      128    127.0.0.1:8080     *:*               users:(("node",pid=1234,fd=20))
/// ```
use super::fields;
use crate::record::{Protocol, SocketRecord};

/// Parsea la salida completa de `ss`, una fila por socket.
///
/// La cabecera se reconoce por su contenido (`Netid` / `State`), así que
/// también se aceptan salidas obtenidas con `-H`.
///
/// # Arguments
/// * `output` - Salida cruda del comando ss
///
/// # Returns
/// Vector con un registro por línea válida, en el orden de entrada.
pub fn parse_ss_output(output: &str) -> Vec<SocketRecord> {
    output
        .lines()
        .filter(|line| !is_header(line))
        .filter_map(parse_single_line)
        .collect()
}

fn is_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("Netid") || trimmed.starts_with("State")
}

/// Parsea una línea individual de la salida de `ss`.
///
/// Campos: `[Netid, Estado, RecvQ, SendQ, DirLocal, DirRemota, Proceso...]`.
///
/// # Returns
/// `Some(SocketRecord)` si la dirección local tiene puerto, `None` en caso contrario.
fn parse_single_line(line: &str) -> Option<SocketRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 5 {
        log::trace!("Línea de ss descartada (columnas insuficientes): {line}");
        return None;
    }

    let (local_address, port) = fields::split_host_port(parts[4])?;

    let mut record = SocketRecord::new(port, parse_protocol(parts[0]), local_address);
    record.state = parts[1].to_string();
    record.remote_address = fields::normalize_remote(parts.get(5).copied());

    // La sección users:((...)) puede contener espacios, se reconstruye entera
    let process_info = parts.get(6..).map(|rest| rest.join(" ")).unwrap_or_default();
    record.pid = fields::extract_pid(&process_info);
    record.process_name = fields::extract_quoted_name(&process_info);
    record.user = fields::extract_users_token(&process_info);

    Some(record)
}

/// Protocolo según la columna Netid; cualquier valor desconocido cae a TCP.
fn parse_protocol(netid: &str) -> Protocol {
    match netid.to_ascii_lowercase().as_str() {
        "tcp" => Protocol::Tcp,
        "udp" => Protocol::Udp,
        other => {
            log::debug!("Netid desconocido en ss ({other}), se asume tcp");
            Protocol::Tcp
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verifica que el parser maneja líneas vacías correctamente
    #[test]
    fn test_parse_empty_line() {
        assert!(parse_single_line("").is_none());
        assert!(parse_single_line("   ").is_none());
    }

    /// Verifica el parsing de una línea real de ss
    #[test]
    fn test_parse_ss_line() {
        let line = r#"tcp LISTEN 0 128 127.0.0.1:8080 *:* users:(("node",pid=1234,fd=20))"#;
        let records = parse_ss_output(line);
        assert_eq!(records.len(), 1);

        let info = &records[0];
        assert_eq!(info.port, 8080);
        assert_eq!(info.protocol, Protocol::Tcp);
        assert_eq!(info.state, "LISTEN");
        assert_eq!(info.local_address, "127.0.0.1");
        assert_eq!(info.remote_address, None);
        assert_eq!(info.pid, Some(1234));
        assert_eq!(info.process_name.as_deref(), Some("node"));
        assert_eq!(info.source, None);
    }

    /// La cabecera se descarta y el orden de entrada se conserva
    #[test]
    fn test_parse_with_header() {
        let output = "\
Netid State  Recv-Q Send-Q Local Address:Port Peer Address:Port Process
udp   UNCONN 0      0      0.0.0.0:68         0.0.0.0:*
tcp   ESTAB  0      0      10.0.0.2:51234     140.82.112.4:443  users:((\"firefox\",pid=4242,fd=88))
tcp   LISTEN 0      4096   [::]:22            [::]:*
";
        let records = parse_ss_output(output);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].protocol, Protocol::Udp);
        assert_eq!(records[0].port, 68);
        assert_eq!(records[0].state, "UNCONN");
        assert_eq!(records[0].pid, None);
        assert_eq!(records[0].remote_address, None);

        assert_eq!(records[1].remote_address.as_deref(), Some("140.82.112.4:443"));
        assert_eq!(records[1].pid, Some(4242));

        assert_eq!(records[2].local_address, "[::]");
        assert_eq!(records[2].port, 22);
        assert_eq!(records[2].remote_address, None);
    }

    /// Las líneas con menos de 5 columnas se descartan sin error
    #[test]
    fn test_short_line_is_dropped() {
        let output = "tcp LISTEN 0 128\ntcp LISTEN 0 128 0.0.0.0:80 *:*";
        let records = parse_ss_output(output);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].port, 80);
    }

    /// Sin sufijo numérico de puerto no hay registro
    #[test]
    fn test_line_without_port_is_dropped() {
        assert!(parse_ss_output("tcp LISTEN 0 128 0.0.0.0:* *:*").is_empty());
    }

    #[test]
    fn test_unknown_netid_defaults_to_tcp() {
        let records = parse_ss_output("raw UNCONN 0 0 0.0.0.0:255 0.0.0.0:*");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].protocol, Protocol::Tcp);
    }

    /// Sin sección de procesos (ss sin privilegios) los campos quedan ausentes
    #[test]
    fn test_missing_process_section() {
        let records = parse_ss_output("tcp LISTEN 0 128 0.0.0.0:5432 0.0.0.0:*");
        assert_eq!(records[0].pid, None);
        assert_eq!(records[0].process_name, None);
        assert_eq!(records[0].user, None);
    }
}
