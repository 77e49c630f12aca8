//! Pequeños extractores de campos compartidos por los tres dialectos.
//!
//! Cada función devuelve `Option` y nunca falla: si un campo no se puede
//! extraer, la línea sigue adelante con ese dato ausente.

/// Extremos remotos que equivalen a "sin conectar".
const WILDCARD_REMOTES: [&str; 8] = [
    "*", "*:*", "*.*", "0.0.0.0:*", "[::]:*", ":::*", "0.0.0.0:0", "[::]:0",
];

/// Estados que lsof escribe entre paréntesis en la columna NAME.
const PARENTHESIZED_STATES: [&str; 4] = ["LISTEN", "ESTABLISHED", "CLOSE_WAIT", "TIME_WAIT"];

/// Separa `direccion:puerto` usando el último `:`.
///
/// Soporta IPv4 (`0.0.0.0:8080`), IPv6 (`[::]:8080`) y comodines (`*:22`).
///
/// # Returns
/// `Some((direccion, puerto))` si el sufijo tras el último `:` es numérico.
pub fn split_host_port(token: &str) -> Option<(&str, u16)> {
    let (host, port) = token.rsplit_once(':')?;
    if host.is_empty() {
        return None;
    }
    Some((host, parse_port(port)?))
}

/// Como [`split_host_port`] pero acepta también `.` como separador,
/// que es como netstat de BSD/macOS escribe los puertos (`127.0.0.1.631`).
pub fn split_host_port_any(token: &str) -> Option<(&str, u16)> {
    let pos = token.rfind(|c: char| c == ':' || c == '.')?;
    let (host, port) = (&token[..pos], &token[pos + 1..]);
    if host.is_empty() {
        return None;
    }
    Some((host, parse_port(port)?))
}

/// Parsea un puerto compuesto únicamente por dígitos ASCII.
fn parse_port(raw: &str) -> Option<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Normaliza un extremo remoto: los comodines se convierten en `None`.
pub fn normalize_remote(raw: Option<&str>) -> Option<String> {
    match raw {
        Some(remote) if !is_wildcard_remote(remote) => Some(remote.to_string()),
        _ => None,
    }
}

/// Indica si un extremo remoto es una forma comodín (`*:*`, `0.0.0.0:*`...).
pub fn is_wildcard_remote(remote: &str) -> bool {
    WILDCARD_REMOTES.contains(&remote)
}

/// Extrae el PID del patrón `pid=1234`.
pub fn extract_pid(section: &str) -> Option<u32> {
    let marker = "pid=";
    let start = section.find(marker)? + marker.len();
    leading_digits(&section[start..])
}

/// Extrae el nombre entre comillas que sigue a `((`, p. ej. `(("node",...`.
pub fn extract_quoted_name(section: &str) -> Option<String> {
    let start = section.find("((\"")? + 3;
    let end = section[start..].find('"')? + start;
    let name = &section[start..end];
    (!name.is_empty()).then(|| name.to_string())
}

/// Primer token separado por comas dentro de `users:((...))`, sin comillas.
pub fn extract_users_token(section: &str) -> Option<String> {
    let start = section.find("users:((")? + "users:((".len();
    let end = section[start..].find(')')? + start;
    let first = section[start..end].split(',').next()?;
    let cleaned = first.replace('"', "");
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Parsea la secuencia inicial de dígitos (`987/sshd` → 987).
pub fn leading_digits(raw: &str) -> Option<u32> {
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

/// Busca un estado entre paréntesis, como `(LISTEN)`.
pub fn parenthesized_state(name: &str) -> Option<&'static str> {
    PARENTHESIZED_STATES
        .iter()
        .find(|state| name.contains(&format!("({})", state)))
        .copied()
}

/// Extrae el extremo remoto escrito con flecha (`->10.0.0.2:443`).
pub fn remote_arrow(name: &str) -> Option<String> {
    let start = name.find("->")? + 2;
    let candidate = name[start..].split_whitespace().next()?;
    split_host_port(candidate).map(|_| candidate.to_string())
}
