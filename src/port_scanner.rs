/// Módulo de escaneo de puertos de red.
///
/// Elige la herramienta del sistema según la plataforma (con fallback),
/// parsea su salida con el dialecto correspondiente y enriquece cada
/// registro con la ruta del ejecutable dueño.
use chrono::Utc;

use crate::command::{SystemRunner, ToolRunner};
use crate::error::ScanError;
use crate::parser::{self, Dialect};
use crate::platform::Platform;
use crate::record::{ScanResult, SocketRecord};
use crate::resolver;

/// Una herramienta candidata: programa, argumentos y dialecto de su salida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: &'static str,
    pub args: &'static [&'static str],
    pub dialect: Dialect,
}

const SS: ToolInvocation = ToolInvocation {
    program: "ss",
    args: &["-tulnp"],
    dialect: Dialect::SocketStatistics,
};

const NETSTAT_LINUX: ToolInvocation = ToolInvocation {
    program: "netstat",
    args: &["-tulnp"],
    dialect: Dialect::ConnectionTable,
};

const LSOF: ToolInvocation = ToolInvocation {
    program: "lsof",
    args: &["-iTCP", "-iUDP", "-n", "-P"],
    dialect: Dialect::OpenFiles,
};

const NETSTAT_MACOS: ToolInvocation = ToolInvocation {
    program: "netstat",
    args: &["-an"],
    dialect: Dialect::ConnectionTable,
};

const NETSTAT_WINDOWS: ToolInvocation = ToolInvocation {
    program: "netstat",
    args: &["-ano"],
    dialect: Dialect::ConnectionTable,
};

/// Cadena de herramientas por plataforma, en orden de preferencia.
///
/// - Linux: `ss`, luego `netstat`.
/// - macOS: `lsof`, luego `netstat`.
/// - Windows: solo `netstat`.
pub fn tool_chain(platform: Platform) -> &'static [ToolInvocation] {
    match platform {
        Platform::Linux => &[SS, NETSTAT_LINUX],
        Platform::MacOs => &[LSOF, NETSTAT_MACOS],
        Platform::Windows => &[NETSTAT_WINDOWS],
    }
}

/// Escanea los sockets abiertos de la máquina actual.
///
/// # Returns
/// `ScanResult` nuevo, o un error si la plataforma no está soportada
/// o ninguna herramienta de la cadena funcionó.
pub fn scan() -> Result<ScanResult, ScanError> {
    let platform = Platform::current()?;
    scan_with(&SystemRunner, platform)
}

/// Escanea usando `runner` para todas las llamadas al sistema.
///
/// Las invocaciones son secuenciales: primero la herramienta primaria,
/// después el fallback, y finalmente la resolución de rutas registro a registro.
pub fn scan_with(runner: &dyn ToolRunner, platform: Platform) -> Result<ScanResult, ScanError> {
    let (tool, output) = run_first_available(runner, platform)?;

    let mut records = parser::parse(tool.dialect, &output, platform);
    log::info!(
        "{} sockets detectados con {} en {}",
        records.len(),
        tool.program,
        platform
    );

    enrich_with_source(runner, &mut records, platform);

    Ok(ScanResult {
        records,
        timestamp: Utc::now(),
        platform,
    })
}

/// Recorre la cadena de herramientas hasta que una termine con éxito.
///
/// Los fallos intermedios solo se registran; al agotar la cadena se
/// devuelve un único `NoCompatibleTool` con el detalle de cada intento.
fn run_first_available(
    runner: &dyn ToolRunner,
    platform: Platform,
) -> Result<(ToolInvocation, String), ScanError> {
    let mut failures: Vec<String> = Vec::new();

    for tool in tool_chain(platform) {
        match runner.run(tool.program, tool.args) {
            Ok(output) => {
                log::debug!("Usando {} para el escaneo", tool.program);
                return Ok((*tool, output));
            }
            Err(e) => {
                log::warn!("{} no disponible: {}", tool.program, e);
                failures.push(e.to_string());
            }
        }
    }

    Err(ScanError::NoCompatibleTool(failures.join("; ")))
}

/// Rellena `source` de cada registro con la ruta de su ejecutable.
///
/// Un registro sin PID siempre queda con `source = None`.
fn enrich_with_source(runner: &dyn ToolRunner, records: &mut [SocketRecord], platform: Platform) {
    for record in records.iter_mut() {
        record.source = resolver::resolve_process_path(runner, record.pid, platform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::fake::FakeRunner;
    use crate::record::Protocol;

    const SS_OUTPUT: &str = "\
Netid State  Recv-Q Send-Q Local Address:Port Peer Address:Port Process
tcp   LISTEN 0      128    127.0.0.1:8080     *:*               users:((\"node\",pid=1234,fd=20))
udp   UNCONN 0      0      0.0.0.0:68         0.0.0.0:*
";

    #[test]
    fn test_linux_uses_ss_and_enriches() {
        let runner = FakeRunner::new()
            .with_output("ss", SS_OUTPUT)
            .with_link("/proc/1234/exe", "/usr/bin/node");

        let result = scan_with(&runner, Platform::Linux).unwrap();
        assert_eq!(result.platform, Platform::Linux);
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.records[0].source.as_deref(), Some("/usr/bin/node"));
        assert_eq!(result.records[1].source, None);

        // El registro sin PID no provoca ninguna consulta
        assert_eq!(runner.calls(), vec!["ss -tulnp", "readlink /proc/1234/exe"]);
    }

    #[test]
    fn test_linux_falls_back_to_netstat() {
        let runner = FakeRunner::new()
            .with_failure("ss")
            .with_output("netstat", "tcp 0 0 0.0.0.0:22 0.0.0.0:* LISTEN 987/sshd\n");

        let result = scan_with(&runner, Platform::Linux).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].port, 22);
        assert_eq!(result.records[0].pid, Some(987));
        assert_eq!(result.records[0].source, None);
        assert_eq!(runner.calls()[..2], ["ss -tulnp", "netstat -tulnp"]);
    }

    /// Primaria y fallback fallan: un único NoCompatibleTool, sin resultado parcial
    #[test]
    fn test_linux_exhausted_chain_fails() {
        let runner = FakeRunner::new().with_failure("ss");
        let err = scan_with(&runner, Platform::Linux).unwrap_err();
        assert!(matches!(err, ScanError::NoCompatibleTool(_)));
        assert_eq!(runner.calls(), vec!["ss -tulnp", "netstat -tulnp"]);
    }

    #[test]
    fn test_macos_prefers_lsof() {
        let runner = FakeRunner::new()
            .with_output(
                "lsof",
                "COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME\nsshd 987 root 3u IPv4 0x0 0t0 TCP *:22 (LISTEN)\n",
            )
            .with_output("ps", "/usr/sbin/sshd\n");

        let result = scan_with(&runner, Platform::MacOs).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].process_name.as_deref(), Some("sshd"));
        assert_eq!(result.records[0].source.as_deref(), Some("/usr/sbin/sshd"));
        assert!(!runner.calls().iter().any(|call| call.starts_with("netstat")));
    }

    #[test]
    fn test_macos_falls_back_to_netstat() {
        let runner = FakeRunner::new()
            .with_failure("lsof")
            .with_output("netstat", "tcp4 0 0 *.8080 *.* LISTEN\n");

        let result = scan_with(&runner, Platform::MacOs).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].local_address, "*");
        assert_eq!(result.records[0].protocol, Protocol::Tcp);
        assert_eq!(runner.calls(), vec!["lsof -iTCP -iUDP -n -P", "netstat -an"]);
    }

    #[test]
    fn test_macos_exhausted_chain_fails() {
        let runner = FakeRunner::new();
        let err = scan_with(&runner, Platform::MacOs).unwrap_err();
        assert!(matches!(err, ScanError::NoCompatibleTool(_)));
    }

    /// Windows tiene una sola herramienta: su fallo es fatal
    #[test]
    fn test_windows_single_path() {
        let failing = FakeRunner::new().with_failure("netstat");
        assert!(matches!(
            scan_with(&failing, Platform::Windows),
            Err(ScanError::NoCompatibleTool(_))
        ));
        assert_eq!(failing.calls(), vec!["netstat -ano"]);

        let runner = FakeRunner::new()
            .with_output("netstat", "  TCP    0.0.0.0:135    0.0.0.0:0    LISTENING    1044\n")
            .with_output("wmic", "ExecutablePath=C:\\Windows\\System32\\svchost.exe\r\n");
        let result = scan_with(&runner, Platform::Windows).unwrap();
        assert_eq!(
            result.records[0].source.as_deref(),
            Some("C:\\Windows\\System32\\svchost.exe")
        );
    }

    #[test]
    fn test_tool_chain_order() {
        let programs: Vec<&str> = tool_chain(Platform::Linux).iter().map(|t| t.program).collect();
        assert_eq!(programs, vec!["ss", "netstat"]);
        assert_eq!(tool_chain(Platform::Windows).len(), 1);
    }
}
