use std::collections::BTreeMap;

use serde::Serialize;

/// Dense node identifier, assigned in order of first appearance
pub type NodeId = usize;

/// One unique speaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Speaker identifier, kept for display only
    pub label: String,
}

/// Aggregated responses from one speaker to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Sum of response-link multiplicities for this ordered pair (always >= 1)
    pub weight: usize,
}

/// Directed weighted interaction graph
///
/// Immutable once assembled. Edges are sorted by `(from, to)` and every
/// endpoint indexes into `nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    turn_counts: Vec<usize>,
}

impl Graph {
    pub(crate) fn new(nodes: Vec<Node>, edges: Vec<Edge>, turn_counts: Vec<usize>) -> Self {
        Self {
            nodes,
            edges,
            turn_counts,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Edge for an ordered pair, if any interaction was observed
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edges
            .binary_search_by(|e| (e.from, e.to).cmp(&(from, to)))
            .ok()
            .map(|i| &self.edges[i])
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Turns contributed by each speaker, indexed by node id
    pub fn turn_count_per_speaker(&self) -> &[usize] {
        &self.turn_counts
    }

    /// Sum of incoming edge weights, indexed by node id
    pub fn inbound_weight_per_node(&self) -> Vec<usize> {
        let mut totals = vec![0; self.nodes.len()];
        for edge in &self.edges {
            totals[edge.to] += edge.weight;
        }
        totals
    }

    /// Sum of outgoing edge weights, indexed by node id
    pub fn outbound_weight_per_node(&self) -> Vec<usize> {
        let mut totals = vec![0; self.nodes.len()];
        for edge in &self.edges {
            totals[edge.from] += edge.weight;
        }
        totals
    }

    /// Share of each node's interaction weight that is inbound
    ///
    /// `None` for nodes with no edges at all.
    pub fn response_ratio_per_node(&self) -> Vec<Option<f64>> {
        self.inbound_weight_per_node()
            .into_iter()
            .zip(self.outbound_weight_per_node())
            .map(|(inbound, outbound)| {
                let total = inbound + outbound;
                (total > 0).then(|| inbound as f64 / total as f64)
            })
            .collect()
    }

    /// Edges at or above a caller-chosen weight threshold
    pub fn edges_with_min_weight(&self, min_weight: usize) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.weight >= min_weight)
    }

    /// Number of edges carrying each weight
    pub fn weight_distribution(&self) -> BTreeMap<usize, usize> {
        let mut distribution = BTreeMap::new();
        for edge in &self.edges {
            *distribution.entry(edge.weight).or_insert(0) += 1;
        }
        distribution
    }

    pub fn total_weight(&self) -> usize {
        self.edges.iter().map(|e| e.weight).sum()
    }
}
