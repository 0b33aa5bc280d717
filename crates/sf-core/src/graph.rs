use rustc_hash::FxHashMap;

use crate::Run;

/// Directed graph over dataset names with weak-component detection.
///
/// Nodes are interned in insertion order and components are numbered by
/// discovery order over that registry, so component ids are reproducible
/// given a fixed edge-insertion order (run-collection order, sorted inputs,
/// sorted outputs). Ids are recomputed whole per analysis; a graph is never
/// shared across analyses or updated incrementally.
#[derive(Debug, Clone, Default)]
pub struct DatasetGraph {
    names: Vec<String>,
    index_by_name: FxHashMap<String, usize>,
    parent: Vec<usize>,
    edge_count: usize,
}

impl DatasetGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from a run collection: one directed edge per
    /// run-local (input, output) pair. Self-loops are kept; they still place
    /// the dataset in a component of its own.
    #[must_use]
    pub fn from_runs(runs: &[Run]) -> Self {
        let mut graph = Self::new();
        for run in runs {
            for input in &run.inputs {
                for output in &run.outputs {
                    graph.add_edge(input, output);
                }
            }
        }
        graph
    }

    /// Add a directed edge, interning both endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let a = self.intern(from);
        let b = self.intern(to);
        self.edge_count += 1;
        self.union(a, b);
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index_by_name.contains_key(name)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Map every dataset to its weak-component id.
    ///
    /// Ids are assigned by walking the node registry in insertion order and
    /// numbering each union-find root the first time it is seen.
    #[must_use]
    pub fn components(&self) -> FxHashMap<String, usize> {
        let mut id_by_root: FxHashMap<usize, usize> = FxHashMap::default();
        let mut mapping = FxHashMap::default();

        for (index, name) in self.names.iter().enumerate() {
            let root = self.root(index);
            let next = id_by_root.len();
            let id = *id_by_root.entry(root).or_insert(next);
            mapping.insert(name.clone(), id);
        }

        mapping
    }

    /// Number of weak components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        (0..self.names.len())
            .filter(|&index| self.root(index) == index)
            .count()
    }

    fn intern(&mut self, name: &str) -> usize {
        if let Some(&index) = self.index_by_name.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.index_by_name.insert(name.to_string(), index);
        self.parent.push(index);
        index
    }

    fn root(&self, mut index: usize) -> usize {
        while self.parent[index] != index {
            index = self.parent[index];
        }
        index
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.root(a);
        let root_b = self.root(b);
        if root_a != root_b {
            // Attach the later-discovered root under the earlier one so the
            // surviving root is always the first-inserted node of the
            // component.
            if root_a < root_b {
                self.parent[root_b] = root_a;
            } else {
                self.parent[root_a] = root_b;
            }
        }
    }
}
