pub mod color;
pub mod distribute;
pub mod geometry;
pub mod layout;
pub mod node;
pub mod tree;

use color::HeatGradient;
use geometry::Scene;
use layout::{LayoutParams, TextMeasure, layout_roots};
use node::Point;
use tree::{ProcessForest, ProcessRecord};

/// Knobs for turning one process sample into a scene.
#[derive(Clone, Debug, Default)]
pub struct SceneOptions {
    pub params: LayoutParams,
    pub gradient: HeatGradient,
    /// Raw process names that never enter the layout (idle placeholders).
    pub excluded_names: Vec<String>,
}

impl SceneOptions {
    /// Whether a raw process name is a placeholder kept out of every view.
    pub fn excludes(&self, name: &str) -> bool {
        self.excluded_names.iter().any(|excluded| excluded == name)
    }
}

/// Runs one poll cycle's layout: filter, build, weigh, place, project.
pub fn build_scene<M: TextMeasure>(
    records: &[ProcessRecord],
    options: &SceneOptions,
    measure: &M,
) -> Scene {
    let _span = tracing::debug_span!("radial.build_scene", records = records.len()).entered();

    let kept: Vec<ProcessRecord> = records
        .iter()
        .filter(|r| !options.excludes(&r.name))
        .cloned()
        .collect();

    let mut forest = ProcessForest::build(&kept);
    forest.compute_weights();

    let layout = layout_roots(
        &forest.root_ids,
        &forest,
        Point::default(),
        &options.params,
        measure,
    );
    Scene::project(&forest, &layout, &options.gradient)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: u32, ppid: u32, name: &str) -> ProcessRecord {
        ProcessRecord {
            pid,
            ppid,
            name: name.to_string(),
            cpu_percent: 1.0,
            memory_percent: 1.0,
        }
    }

    #[test]
    fn placeholder_processes_are_excluded() {
        let options = SceneOptions {
            excluded_names: vec!["System Idle Process".to_string()],
            ..SceneOptions::default()
        };
        let records = [
            record(0, 0, "System Idle Process"),
            record(4, 0, "System"),
            record(100, 4, "smss.exe"),
        ];
        let scene = build_scene(&records, &options, &|_: &str| 0.0);

        assert!(scene.node(0).is_none());
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.node(100).unwrap().name, "smss");
    }

    #[test]
    fn duplicate_pid_cannot_hide_its_subtree() {
        let records = [record(10, 0, "a"), record(20, 10, "b"), record(10, 20, "a")];
        let scene = build_scene(&records, &SceneOptions::default(), &|_: &str| 0.0);

        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.edges.len(), 1);
    }

    #[test]
    fn empty_input_is_empty_scene() {
        let scene = build_scene(&[], &SceneOptions::default(), &|_: &str| 0.0);
        assert!(scene.is_empty());
    }
}
