use std::collections::HashMap;

use color_eyre::eyre::Result;
use sysinfo::{Networks, ProcessRefreshKind, ProcessesToUpdate, System};

use super::source::{DataSource, percent};
use super::summary::{MemorySummary, NetworkSummary, SystemSummary};
use crate::radial::tree::ProcessRecord;

/// Samples the local host through `sysinfo`.
pub struct Collector {
    sys: System,
    networks: Networks,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        Collector {
            sys,
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl DataSource for Collector {
    fn fetch_processes(&mut self) -> Result<Vec<ProcessRecord>> {
        let _span = tracing::debug_span!("collector.fetch_processes").entered();

        self.sys.refresh_memory();
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );

        let total_memory = self.sys.total_memory();
        let records: Vec<ProcessRecord> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let memory_percent = if total_memory > 0 {
                    process.memory() as f64 / total_memory as f64 * 100.0
                } else {
                    0.0
                };
                ProcessRecord {
                    pid: pid.as_u32(),
                    ppid: process.parent().map(|p| p.as_u32()).unwrap_or(0),
                    name: process.name().to_string_lossy().to_string(),
                    cpu_percent: percent(Some(process.cpu_usage() as f64)),
                    memory_percent: percent(Some(memory_percent)),
                }
            })
            .collect();

        tracing::debug!(processes = records.len(), "sampled processes");
        Ok(order_parents_first(records))
    }

    fn fetch_summary(&mut self) -> Result<SystemSummary> {
        let _span = tracing::debug_span!("collector.fetch_summary").entered();

        self.sys.refresh_cpu_all();
        self.sys.refresh_memory();
        self.networks.refresh(true);

        let used = self.sys.used_memory();
        let total = self.sys.total_memory();
        let memory_percent = if total > 0 {
            used as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        let mut network = NetworkSummary::default();
        for data in self.networks.list().values() {
            network.bytes_sent += data.total_transmitted();
            network.bytes_recv += data.total_received();
            network.packets_sent += data.total_packets_transmitted();
            network.packets_recv += data.total_packets_received();
        }

        Ok(SystemSummary {
            cpu_usage: percent(Some(self.sys.global_cpu_usage() as f64)),
            memory: MemorySummary {
                used,
                total,
                percent: percent(Some(memory_percent)),
            },
            network,
            top_cpu: Vec::new(),
            top_memory: Vec::new(),
        })
    }
}

/// Reorders records so every process follows its parent.
///
/// The OS hands processes back in hash order; the tree builder only links a
/// child to a parent it has already seen. Trees are walked depth-first from
/// processes whose parent is missing, siblings by ascending pid.
pub fn order_parents_first(records: Vec<ProcessRecord>) -> Vec<ProcessRecord> {
    let index: HashMap<u32, usize> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (r.pid, i))
        .collect();

    let mut children: HashMap<u32, Vec<usize>> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if record.ppid != record.pid && index.contains_key(&record.ppid) {
            children.entry(record.ppid).or_default().push(i);
        } else {
            roots.push(i);
        }
    }
    let by_pid = |a: &usize, b: &usize| records[*a].pid.cmp(&records[*b].pid);
    roots.sort_by(by_pid);
    for list in children.values_mut() {
        list.sort_by(by_pid);
    }

    let mut order: Vec<usize> = Vec::with_capacity(records.len());
    let mut visited = vec![false; records.len()];
    let mut stack: Vec<usize> = roots.into_iter().rev().collect();
    while let Some(i) = stack.pop() {
        if std::mem::replace(&mut visited[i], true) {
            continue;
        }
        order.push(i);
        if let Some(list) = children.get(&records[i].pid) {
            stack.extend(list.iter().rev());
        }
    }
    // Anything left sits on a parent cycle; keep it, the builder roots it.
    order.extend((0..records.len()).filter(|&i| !visited[i]));

    let mut slots: Vec<Option<ProcessRecord>> = records.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
