use std::collections::HashMap;

/// One validated process sample as it enters the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessNode {
    pub pid: u32,
    pub ppid: u32,
    pub display_name: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    /// Child pids in input order.
    pub children: Vec<u32>,
    /// Subtree size, valid after [`ProcessForest::compute_weights`].
    pub weight: u32,
}

/// Arena of process nodes keyed by pid, plus the pids that start a tree.
#[derive(Clone, Debug, Default)]
pub struct ProcessForest {
    pub nodes: HashMap<u32, ProcessNode>,
    pub root_ids: Vec<u32>,
}

/// Strips a trailing `.exe`, ignoring case.
pub fn display_name(raw: &str) -> &str {
    const SUFFIX: &str = ".exe";
    let Some(split) = raw.len().checked_sub(SUFFIX.len()) else {
        return raw;
    };
    match raw.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(SUFFIX) => &raw[..split],
        _ => raw,
    }
}

/// Whether `ancestor` sits on the parent chain starting at `pid`, `pid`
/// itself included, so a self-parent counts. The chain is acyclic, so the
/// walk terminates.
fn is_ancestor(parent_of: &HashMap<u32, u32>, ancestor: u32, pid: u32) -> bool {
    let mut current = pid;
    loop {
        if current == ancestor {
            return true;
        }
        match parent_of.get(&current) {
            Some(&parent) => current = parent,
            None => return false,
        }
    }
}

impl ProcessForest {
    /// Builds the forest in a single pass over `records`.
    ///
    /// A parent link is only recorded when the parent pid has already been
    /// seen, so callers must list each process after its parent. A child
    /// listed before its parent ends up as a root.
    ///
    /// A repeated pid overwrites the earlier record and is moved under its
    /// new parent. A link that would close a cycle is dropped and the node
    /// becomes a root.
    pub fn build(records: &[ProcessRecord]) -> Self {
        let mut nodes: HashMap<u32, ProcessNode> = HashMap::with_capacity(records.len());
        let mut order: Vec<u32> = Vec::with_capacity(records.len());
        let mut parent_of: HashMap<u32, u32> = HashMap::new();

        for record in records {
            let name = display_name(&record.name).to_string();
            match nodes.get_mut(&record.pid) {
                Some(existing) => {
                    // Later duplicates win, but keep the children gathered so far.
                    existing.ppid = record.ppid;
                    existing.display_name = name;
                    existing.cpu_percent = record.cpu_percent;
                    existing.memory_percent = record.memory_percent;
                }
                None => {
                    order.push(record.pid);
                    nodes.insert(
                        record.pid,
                        ProcessNode {
                            pid: record.pid,
                            ppid: record.ppid,
                            display_name: name,
                            cpu_percent: record.cpu_percent,
                            memory_percent: record.memory_percent,
                            children: Vec::new(),
                            weight: 1,
                        },
                    );
                }
            }

            match parent_of.get(&record.pid).copied() {
                Some(current) if current == record.ppid => continue,
                Some(current) => {
                    if let Some(old_parent) = nodes.get_mut(&current) {
                        old_parent.children.retain(|&child| child != record.pid);
                    }
                    parent_of.remove(&record.pid);
                }
                None => {}
            }

            if is_ancestor(&parent_of, record.pid, record.ppid) {
                continue;
            }
            if let Some(parent) = nodes.get_mut(&record.ppid) {
                parent.children.push(record.pid);
                parent_of.insert(record.pid, record.ppid);
            }
        }

        let root_ids = order
            .into_iter()
            .filter(|pid| !parent_of.contains_key(pid))
            .collect();

        ProcessForest { nodes, root_ids }
    }

    /// Recomputes and stores the subtree weight of `pid` and every node below it.
    pub fn compute_weight(&mut self, pid: u32) -> u32 {
        let Some(children) = self.nodes.get(&pid).map(|n| n.children.clone()) else {
            return 0;
        };
        let weight = 1 + children
            .iter()
            .map(|&child| self.compute_weight(child))
            .sum::<u32>();
        if let Some(node) = self.nodes.get_mut(&pid) {
            node.weight = weight;
        }
        weight
    }

    pub fn compute_weights(&mut self) {
        let roots = self.root_ids.clone();
        for pid in roots {
            self.compute_weight(pid);
        }
    }

    /// Stored subtree weight of `pid`; 0 for a pid not in the forest.
    pub fn weight(&self, pid: u32) -> u32 {
        self.nodes.get(&pid).map(|n| n.weight).unwrap_or(0)
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessNode> {
        self.nodes.get(&pid)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
