//! Word adjacency graph.
//!
//! Every distinct word is interned once into a [`SlotMap`] arena and addressed
//! by [`NodeId`]. Edges are counted observations of "A immediately followed by
//! B" and live in per-node maps keyed by index, so the graph has no owning
//! cycles even though every forward edge has a matching back-reference.

use ahash::AHashMap as HashMap;
use ahash::AHashSet as HashSet;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Arena index of a [`WordNode`].
    pub struct NodeId;
}

/// Text of the synthetic line-start node. Never produced by word splitting.
pub const SENTINEL_TEXT: &str = "\n";

/// One distinct word and its counted neighbours.
#[derive(Debug, Clone)]
pub struct WordNode {
    text: String,
    /// Forward edges: successor -> observation count
    successors: HashMap<NodeId, u32>,
    /// Back-references: predecessor -> observation count
    predecessors: HashMap<NodeId, u32>,
}

impl WordNode {
    fn new(text: String) -> Self {
        Self {
            text,
            successors: HashMap::default(),
            predecessors: HashMap::default(),
        }
    }

    /// The word this node stands for.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Forward edges with their observation counts.
    pub fn successors(&self) -> &HashMap<NodeId, u32> {
        &self.successors
    }

    /// Back-references with their observation counts.
    pub fn predecessors(&self) -> &HashMap<NodeId, u32> {
        &self.predecessors
    }
}

/// One adjacency observed while walking a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency {
    pub predecessor: NodeId,
    pub node: NodeId,
    /// Forward count after this observation
    pub count: u32,
}

/// Interning registry of word nodes with directed, counted edges.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    nodes: SlotMap<NodeId, WordNode>,
    index: HashMap<String, NodeId>,
    sentinel: NodeId,
}

impl AdjacencyGraph {
    /// Creates a graph holding only the line-start sentinel.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let mut index = HashMap::default();
        let sentinel = nodes.insert(WordNode::new(SENTINEL_TEXT.to_string()));
        index.insert(SENTINEL_TEXT.to_string(), sentinel);
        Self {
            nodes,
            index,
            sentinel,
        }
    }

    /// The line-start node every walk begins from.
    pub fn sentinel(&self) -> NodeId {
        self.sentinel
    }

    /// Returns the node for `text`, creating it on first sight.
    pub fn intern(&mut self, text: &str) -> NodeId {
        if let Some(&id) = self.index.get(text) {
            return id;
        }
        let id = self.nodes.insert(WordNode::new(text.to_string()));
        self.index.insert(text.to_string(), id);
        id
    }

    /// Looks up a node without creating it.
    pub fn lookup(&self, text: &str) -> Option<NodeId> {
        self.index.get(text).copied()
    }

    /// Records one `predecessor -> successor` observation.
    ///
    /// Returns the forward count including this observation.
    pub fn record_successor(&mut self, predecessor: NodeId, successor: NodeId) -> u32 {
        let forward = self.nodes[predecessor]
            .successors
            .entry(successor)
            .or_insert(0);
        *forward += 1;
        let count = *forward;

        *self.nodes[successor]
            .predecessors
            .entry(predecessor)
            .or_insert(0) += 1;

        count
    }

    /// Walks a body's words from the sentinel, recording every adjacency.
    ///
    /// The first entry is always `sentinel -> first word`.
    pub fn walk_line(&mut self, body: &str) -> Vec<Adjacency> {
        let mut observed = Vec::new();
        let mut predecessor = self.sentinel;
        for word in body.split_whitespace() {
            let node = self.intern(word);
            let count = self.record_successor(predecessor, node);
            observed.push(Adjacency {
                predecessor,
                node,
                count,
            });
            predecessor = node;
        }
        observed
    }

    /// Returns the node for `id`, if it belongs to this graph.
    pub fn node(&self, id: NodeId) -> Option<&WordNode> {
        self.nodes.get(id)
    }

    /// Text of a node.
    ///
    /// # Panics
    ///
    /// If `id` did not come from this graph.
    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id].text
    }

    /// Forward observation count of `from -> to`, zero when never seen.
    pub fn count(&self, from: NodeId, to: NodeId) -> u32 {
        self.nodes
            .get(from)
            .and_then(|node| node.successors.get(&to))
            .copied()
            .unwrap_or(0)
    }

    /// Iterates over `(successor, count)` pairs of a node.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.nodes[id].successors.iter().map(|(&k, &v)| (k, v))
    }

    /// Iterates over `(predecessor, count)` pairs of a node.
    pub fn predecessors(&self, id: NodeId) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.nodes[id].predecessors.iter().map(|(&k, &v)| (k, v))
    }

    /// Visits the successor neighbourhood of `start` down to `depth` levels.
    ///
    /// All unvisited successors of a node are visited before descending into
    /// any of them. A node is visited at most once, and `start` itself counts
    /// as visited.
    pub fn navigate<F>(&self, start: NodeId, depth: usize, mut visit: F)
    where
        F: FnMut(NodeId, &WordNode),
    {
        let mut visited = HashSet::default();
        visited.insert(start);
        self.navigate_from(start, depth, &mut visit, &mut visited);
    }

    fn navigate_from<F>(
        &self,
        from: NodeId,
        depth: usize,
        visit: &mut F,
        visited: &mut HashSet<NodeId>,
    ) where
        F: FnMut(NodeId, &WordNode),
    {
        if depth == 0 {
            return;
        }

        let mut frontier: Vec<NodeId> = self.nodes[from]
            .successors
            .keys()
            .copied()
            .filter(|id| !visited.contains(id))
            .collect();
        // Map iteration order is unspecified; keep visits deterministic
        frontier.sort_by(|a, b| self.nodes[*a].text.cmp(&self.nodes[*b].text));

        for &id in &frontier {
            visited.insert(id);
            visit(id, &self.nodes[id]);
        }
        for &id in &frontier {
            self.navigate_from(id, depth - 1, visit, visited);
        }
    }

    /// Number of nodes, sentinel included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the sentinel exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

impl Default for AdjacencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
