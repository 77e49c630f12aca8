/// Filtrado y estadísticas sobre colecciones de registros.
use serde::Serialize;
use std::collections::HashSet;

use crate::record::{FilterSpec, Protocol, SocketRecord};

/// Devuelve los registros que cumplen todos los predicados de `spec`.
///
/// Conserva el orden de entrada y no modifica `records`. Un registro sin
/// `process_name` (o sin `source`) no pasa un filtro sobre ese campo.
///
/// # Arguments
/// * `records` - Registros de un escaneo
/// * `spec` - Predicados opcionales combinados con AND
pub fn filter_records(records: &[SocketRecord], spec: &FilterSpec) -> Vec<SocketRecord> {
    records
        .iter()
        .filter(|record| matches(record, spec))
        .cloned()
        .collect()
}

/// Indica si un registro cumple el filtro.
pub fn matches(record: &SocketRecord, spec: &FilterSpec) -> bool {
    if spec.port.is_some_and(|port| port != record.port) {
        return false;
    }
    if spec.protocol.is_some_and(|protocol| protocol != record.protocol) {
        return false;
    }
    if let Some(state) = &spec.state {
        if !contains_ignore_case(&record.state, state) {
            return false;
        }
    }
    substring_matches(record.process_name.as_deref(), spec.process_name.as_deref())
        && substring_matches(record.source.as_deref(), spec.source.as_deref())
}

/// Un campo ausente no cumple un predicado presente.
fn substring_matches(value: Option<&str>, needle: Option<&str>) -> bool {
    match (value, needle) {
        (_, None) => true,
        (Some(value), Some(needle)) => contains_ignore_case(value, needle),
        (None, Some(_)) => false,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Conteos agregados de un escaneo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total: usize,
    pub tcp: usize,
    pub udp: usize,
    pub listening: usize,
    pub established: usize,
    /// Nombres de proceso distintos (los registros sin nombre no cuentan)
    pub processes: usize,
}

impl ScanSummary {
    pub fn from_records(records: &[SocketRecord]) -> Self {
        let names: HashSet<&str> = records
            .iter()
            .filter_map(|record| record.process_name.as_deref())
            .collect();

        let mut summary = records.iter().fold(Self::default(), |mut summary, record| {
            summary.total += 1;
            match record.protocol {
                Protocol::Tcp => summary.tcp += 1,
                Protocol::Udp => summary.udp += 1,
            }
            // netstat de Windows escribe LISTENING
            if is_listening(&record.state) {
                summary.listening += 1;
            } else if record.state.eq_ignore_ascii_case("ESTABLISHED") {
                summary.established += 1;
            }
            summary
        });
        summary.processes = names.len();
        summary
    }
}

fn is_listening(state: &str) -> bool {
    state.eq_ignore_ascii_case("LISTEN") || state.eq_ignore_ascii_case("LISTENING")
}
