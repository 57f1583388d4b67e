use serde::Serialize;

use crate::radial::tree::{ProcessRecord, display_name};

const TOP_COUNT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MemorySummary {
    pub used: u64,
    pub total: u64,
    pub percent: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopProcess {
    pub name: String,
    pub percent: f64,
}

/// Host-wide counters for the usage panel.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SystemSummary {
    pub cpu_usage: f64,
    pub memory: MemorySummary,
    pub network: NetworkSummary,
    pub top_cpu: Vec<TopProcess>,
    pub top_memory: Vec<TopProcess>,
}

impl SystemSummary {
    /// Fills the top-N lists from the sampled process list.
    pub fn with_top_processes(mut self, processes: &[ProcessRecord]) -> Self {
        self.top_cpu = top_by(processes, |p| p.cpu_percent);
        self.top_memory = top_by(processes, |p| p.memory_percent);
        self
    }
}

fn top_by(processes: &[ProcessRecord], key: impl Fn(&ProcessRecord) -> f64) -> Vec<TopProcess> {
    let mut ranked: Vec<&ProcessRecord> = processes.iter().collect();
    ranked.sort_by(|a, b| key(b).total_cmp(&key(a)));
    ranked
        .into_iter()
        .take(TOP_COUNT)
        .map(|p| TopProcess {
            name: display_name(&p.name).to_string(),
            percent: key(p),
        })
        .collect()
}
