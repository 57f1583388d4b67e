use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;

use super::summary::{MemorySummary, NetworkSummary, SystemSummary};
use crate::radial::SceneOptions;
use crate::radial::tree::ProcessRecord;

/// One complete sample: both fetches succeeded.
#[derive(Clone, Debug, Default)]
pub struct PollData {
    pub processes: Vec<ProcessRecord>,
    pub summary: SystemSummary,
}

impl PollData {
    /// Drops placeholder processes and ranks the top lists from what remains.
    pub fn visible(mut self, options: &SceneOptions) -> Self {
        self.processes.retain(|record| !options.excludes(&record.name));
        self.summary = self.summary.with_top_processes(&self.processes);
        self
    }
}

/// Where process and host samples come from.
pub trait DataSource {
    fn fetch_processes(&mut self) -> Result<Vec<ProcessRecord>>;
    fn fetch_summary(&mut self) -> Result<SystemSummary>;

    /// Fetches both resources; a failure of either fails the whole poll.
    fn poll(&mut self) -> Result<PollData> {
        let processes = self.fetch_processes()?;
        let summary = self.fetch_summary()?;
        Ok(PollData { processes, summary })
    }
}

/// Reads a metrics document from disk on every poll, so an external
/// exporter can keep rewriting it.
pub struct JsonFileSource {
    path: PathBuf,
    cached: Option<MetricsDocument>,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<MetricsDocument> {
        let contents = std::fs::read_to_string(&self.path)
            .wrap_err_with(|| format!("reading {}", self.path.display()))?;
        parse_document(&contents).wrap_err_with(|| format!("parsing {}", self.path.display()))
    }
}

impl DataSource for JsonFileSource {
    fn fetch_processes(&mut self) -> Result<Vec<ProcessRecord>> {
        let document = self.read()?;
        let processes = document.processes();
        self.cached = Some(document);
        Ok(processes)
    }

    fn fetch_summary(&mut self) -> Result<SystemSummary> {
        // Reuse the read from fetch_processes within the same poll.
        let document = match self.cached.take() {
            Some(document) => document,
            None => self.read()?,
        };
        Ok(document.summary())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetricsDocument {
    processes: Vec<RawProcess>,
    system: RawSystem,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProcess {
    pid: Option<u32>,
    ppid: Option<u32>,
    name: Option<String>,
    cpu_percent: Option<f64>,
    memory_percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSystem {
    cpu_usage: Option<f64>,
    memory: RawMemory,
    network: RawNetwork,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMemory {
    used: Option<u64>,
    total: Option<u64>,
    percent: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawNetwork {
    bytes_sent: Option<u64>,
    bytes_recv: Option<u64>,
    packets_sent: Option<u64>,
    packets_recv: Option<u64>,
}

pub fn parse_document(contents: &str) -> Result<MetricsDocument> {
    Ok(serde_json::from_str(contents)?)
}

impl MetricsDocument {
    /// Validated records in document order. Entries without a pid are dropped.
    pub fn processes(&self) -> Vec<ProcessRecord> {
        let mut dropped = 0usize;
        let records: Vec<ProcessRecord> = self
            .processes
            .iter()
            .filter_map(|raw| {
                let Some(pid) = raw.pid else {
                    dropped += 1;
                    return None;
                };
                Some(ProcessRecord {
                    pid,
                    ppid: raw.ppid.unwrap_or(0),
                    name: raw.name.clone().unwrap_or_default(),
                    cpu_percent: percent(raw.cpu_percent),
                    memory_percent: percent(raw.memory_percent),
                })
            })
            .collect();
        if dropped > 0 {
            tracing::warn!(dropped, "skipped process records without a pid");
        }
        records
    }

    pub fn summary(&self) -> SystemSummary {
        let system = &self.system;
        SystemSummary {
            cpu_usage: percent(system.cpu_usage),
            memory: MemorySummary {
                used: system.memory.used.unwrap_or(0),
                total: system.memory.total.unwrap_or(0),
                percent: percent(system.memory.percent),
            },
            network: NetworkSummary {
                bytes_sent: system.network.bytes_sent.unwrap_or(0),
                bytes_recv: system.network.bytes_recv.unwrap_or(0),
                packets_sent: system.network.packets_sent.unwrap_or(0),
                packets_recv: system.network.packets_recv.unwrap_or(0),
            },
            top_cpu: Vec::new(),
            top_memory: Vec::new(),
        }
    }
}

/// Missing or non-finite becomes 0; everything else is clamped to `[0, 100]`.
pub fn percent(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"{
        "processes": [
            {"pid": 1, "ppid": 0, "name": "init.exe", "cpu_percent": 10.0, "memory_percent": 2.5},
            {"pid": 2, "ppid": 1, "name": "worker", "cpu_percent": 250.0},
            {"ppid": 1, "name": "no-pid"},
            {"pid": 3, "cpu_percent": -4.0, "extra": true}
        ],
        "system": {
            "cpu_usage": 37.5,
            "memory": {"used": 4294967296, "total": 17179869184, "percent": 25.0},
            "network": {"bytes_sent": 10, "bytes_recv": 20, "packets_sent": 1, "packets_recv": 2}
        }
    }"#;

    #[test]
    fn coerces_records_at_the_boundary() {
        let document = parse_document(DOCUMENT).unwrap();
        let processes = document.processes();

        assert_eq!(processes.len(), 3);
        assert_eq!(processes[0].name, "init.exe");
        assert_eq!(processes[0].memory_percent, 2.5);
        assert_eq!(processes[1].cpu_percent, 100.0);
        assert_eq!(processes[1].memory_percent, 0.0);
        assert_eq!(processes[2].ppid, 0);
        assert_eq!(processes[2].name, "");
        assert_eq!(processes[2].cpu_percent, 0.0);
    }

    #[test]
    fn reads_system_summary() {
        let summary = parse_document(DOCUMENT).unwrap().summary();
        assert_eq!(summary.cpu_usage, 37.5);
        assert_eq!(summary.memory.total, 17_179_869_184);
        assert_eq!(summary.network.packets_recv, 2);
    }

    #[test]
    fn missing_sections_default() {
        let document = parse_document("{}").unwrap();
        assert!(document.processes().is_empty());
        assert_eq!(document.summary(), SystemSummary::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(parse_document("{\"processes\": [").is_err());
    }

    #[test]
    fn percent_handles_non_finite() {
        assert_eq!(percent(None), 0.0);
        assert_eq!(percent(Some(f64::NAN)), 0.0);
        assert_eq!(percent(Some(f64::INFINITY)), 0.0);
        assert_eq!(percent(Some(42.0)), 42.0);
    }

    #[test]
    fn file_source_polls_both_resources() {
        let path = std::env::temp_dir().join("radialtop_test_source.json");
        std::fs::write(&path, DOCUMENT).unwrap();

        let mut source = JsonFileSource::new(&path);
        let data = source.poll().unwrap().visible(&SceneOptions::default());
        assert_eq!(data.processes.len(), 3);
        assert_eq!(data.summary.top_cpu[0].name, "worker");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn placeholders_never_rank_in_top_lists() {
        let data = PollData {
            processes: vec![
                ProcessRecord {
                    pid: 0,
                    ppid: 0,
                    name: "System Idle Process".to_string(),
                    cpu_percent: 95.0,
                    memory_percent: 0.0,
                },
                ProcessRecord {
                    pid: 4,
                    ppid: 0,
                    name: "System".to_string(),
                    cpu_percent: 1.0,
                    memory_percent: 0.1,
                },
            ],
            summary: SystemSummary::default(),
        };
        let options = SceneOptions {
            excluded_names: vec!["System Idle Process".to_string()],
            ..SceneOptions::default()
        };

        let data = data.visible(&options);
        assert_eq!(data.processes.len(), 1);
        assert_eq!(data.summary.top_cpu.len(), 1);
        assert_eq!(data.summary.top_cpu[0].name, "System");
        assert!(
            data.summary
                .top_memory
                .iter()
                .all(|top| top.name != "System Idle Process")
        );
    }

    #[test]
    fn missing_file_fails_the_poll() {
        let mut source = JsonFileSource::new("/nonexistent/radialtop/metrics.json");
        assert!(source.poll().is_err());
    }
}
