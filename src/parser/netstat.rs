/// Parser de la salida de `netstat` en sus tres variantes de plataforma.
///
/// ```text
/// Windows (netstat -ano):   TCP  0.0.0.0:135  0.0.0.0:0  LISTENING  1234
/// Linux   (netstat -tulnp): tcp  0 0  0.0.0.0:22  0.0.0.0:*  LISTEN  987/sshd
/// macOS   (netstat -an):    tcp4 0 0  *.8080      *.*        LISTEN
/// ```
use super::fields;
use crate::platform::Platform;
use crate::record::{Protocol, SocketRecord};

/// Prefijos de las líneas de cabecera que netstat intercala en la salida.
const HEADER_PREFIXES: [&str; 3] = ["Proto", "Active", "Internet"];

/// Columnas mínimas para considerar una línea.
const MIN_COLUMNS: usize = 4;

/// Disposición de columnas de cada variante de netstat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `[proto, local, remote, state, pid]`
    ProtoLocalRemoteStatePid,
    /// `[proto, recvQ, sendQ, local, remote, state, pid/program]`
    QueuesWithProgram,
    /// `[proto, recvQ, sendQ, local, remote, state]`
    QueuesOnly,
}

impl Layout {
    fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Layout::ProtoLocalRemoteStatePid,
            Platform::Linux => Layout::QueuesWithProgram,
            Platform::MacOs => Layout::QueuesOnly,
        }
    }
}

/// Parsea la salida completa de netstat según la plataforma de origen.
///
/// # Arguments
/// * `output` - Salida cruda del comando netstat
/// * `platform` - Plataforma que determina la disposición de columnas
///
/// # Returns
/// Vector con un registro por línea válida, en el orden de entrada.
pub fn parse_netstat_output(output: &str, platform: Platform) -> Vec<SocketRecord> {
    let layout = Layout::for_platform(platform);
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !HEADER_PREFIXES.iter().any(|prefix| line.starts_with(prefix)))
        .filter_map(|line| parse_single_line(line, layout))
        .collect()
}

fn parse_single_line(line: &str, layout: Layout) -> Option<SocketRecord> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_COLUMNS {
        log::trace!("Línea de netstat descartada (columnas insuficientes): {line}");
        return None;
    }

    let protocol = parse_protocol(parts[0]);
    let (local_column, remote_column) = match layout {
        Layout::ProtoLocalRemoteStatePid => (1, 2),
        Layout::QueuesWithProgram | Layout::QueuesOnly => (3, 4),
    };

    let (local_address, port) = fields::split_host_port_any(parts[local_column])?;
    let mut record = SocketRecord::new(port, protocol, local_address);
    record.remote_address = fields::normalize_remote(parts.get(remote_column).copied());

    let (state, pid) = match layout {
        Layout::ProtoLocalRemoteStatePid => windows_state_and_pid(&parts),
        Layout::QueuesWithProgram => linux_state_and_pid(&parts),
        Layout::QueuesOnly => (parts.get(5).copied(), None),
    };
    if let Some(state) = state {
        record.state = state.to_string();
    }
    record.pid = pid;

    Some(record)
}

/// Los sockets UDP de Windows no tienen estado: la cuarta columna es el PID.
fn windows_state_and_pid<'a>(parts: &[&'a str]) -> (Option<&'a str>, Option<u32>) {
    match (parts.get(3), parts.get(4)) {
        (Some(pid), None) if is_pid_column(pid) => (None, fields::leading_digits(pid)),
        (state, pid) => (state.copied(), pid.and_then(|p| p.parse().ok())),
    }
}

/// En Linux la columna de estado falta para UDP y su lugar lo ocupa `PID/programa`.
fn linux_state_and_pid<'a>(parts: &[&'a str]) -> (Option<&'a str>, Option<u32>) {
    match (parts.get(5), parts.get(6)) {
        (Some(program), None) if is_pid_column(program) => {
            (None, fields::leading_digits(program))
        }
        (state, program) => (state.copied(), program.and_then(|p| fields::leading_digits(p))),
    }
}

/// `1234`, `987/sshd` o `-` (sin permisos para ver el proceso).
fn is_pid_column(column: &str) -> bool {
    column == "-" || column.starts_with(|c: char| c.is_ascii_digit())
}

/// `tcp`, `tcp4`, `tcp6`, `TCP` → tcp; cualquier otra cosa → udp.
fn parse_protocol(proto: &str) -> Protocol {
    if proto.to_ascii_lowercase().starts_with("tcp") {
        Protocol::Tcp
    } else {
        Protocol::Udp
    }
}
