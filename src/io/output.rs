use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Edge, Graph, NodeId, PipelineReport};

/// Machine-readable graph handed to a rendering layer
#[derive(Debug, Clone, Serialize)]
pub struct GraphDocument {
    /// Node table with derived per-node attributes
    pub nodes: Vec<NodeRecord>,
    /// Edge table
    pub edges: Vec<Edge>,
    /// What was dropped while building the graph
    pub report: PipelineReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: String,
    pub turn_count: usize,
    pub inbound_weight: usize,
    pub outbound_weight: usize,
    pub response_ratio: Option<f64>,
}

impl GraphDocument {
    /// Create from an assembled graph, keeping edges with weight >= `min_weight`
    pub fn from_graph(graph: &Graph, report: &PipelineReport, min_weight: usize) -> Self {
        let turn_counts = graph.turn_count_per_speaker();
        let inbound = graph.inbound_weight_per_node();
        let outbound = graph.outbound_weight_per_node();
        let ratios = graph.response_ratio_per_node();

        let nodes = graph
            .nodes()
            .iter()
            .map(|n| NodeRecord {
                id: n.id,
                label: n.label.clone(),
                turn_count: turn_counts[n.id],
                inbound_weight: inbound[n.id],
                outbound_weight: outbound[n.id],
                response_ratio: ratios[n.id],
            })
            .collect();

        Self {
            nodes,
            edges: graph.edges_with_min_weight(min_weight).copied().collect(),
            report: report.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize graph")
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Plain-text summary of a graph and its report
pub struct GraphSummary<'a> {
    graph: &'a Graph,
    report: &'a PipelineReport,
}

impl<'a> GraphSummary<'a> {
    pub fn new(graph: &'a Graph, report: &'a PipelineReport) -> Self {
        Self { graph, report }
    }

    /// Format the node table, edge list and warnings
    pub fn format(&self) -> String {
        let mut output = String::new();
        let graph = self.graph;
        let turn_counts = graph.turn_count_per_speaker();
        let inbound = graph.inbound_weight_per_node();
        let outbound = graph.outbound_weight_per_node();

        output.push_str("Nodes\n-----\n");
        for node in graph.nodes() {
            output.push_str(&format!(
                "{:>3}  {:<20} turns {:>4}  in {:>4}  out {:>4}\n",
                node.id,
                node.label,
                turn_counts[node.id],
                inbound[node.id],
                outbound[node.id]
            ));
        }

        output.push_str("\nEdges\n-----\n");
        for edge in graph.edges() {
            output.push_str(&format!(
                "{} -> {}  weight {}\n",
                label(graph, edge.from),
                label(graph, edge.to),
                edge.weight
            ));
        }

        output.push_str("\nWeight distribution\n-------------------\n");
        output.push_str(&format_distribution(&graph.weight_distribution()));

        let report = self.report;
        output.push_str(&format!(
            "\nAnnotations: {} expanded, {} resolved, {} dropped, {} malformed\n",
            report.expanded_annotations,
            report.links_resolved,
            report.dropped_links(),
            report.malformed_count()
        ));
        for warning in &report.warnings {
            output.push_str(&format!("  warning: {}\n", warning));
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

fn label(graph: &Graph, id: NodeId) -> &str {
    graph.node(id).map(|n| n.label.as_str()).unwrap_or("?")
}

/// Format a weight distribution as `weight: count` lines
pub fn format_distribution(distribution: &BTreeMap<usize, usize>) -> String {
    distribution
        .iter()
        .map(|(weight, count)| format!("{:>4}: {}\n", weight, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_transcript_json;
    use crate::stages::{PipelineConfig, PipelineOutput, run_pipeline};

    const CHAT: &str = r#"[
        {"speaker": "A", "turn_id": 1, "annotation": "I"},
        {"speaker": "B", "turn_id": 2, "annotation": "1"},
        {"speaker": "B", "turn_id": 2},
        {"speaker": "C", "turn_id": 3, "annotation": "1+2"},
        {"speaker": "D", "turn_id": 4, "annotation": "77"}
    ]"#;

    fn run() -> PipelineOutput {
        let rows = parse_transcript_json(CHAT).unwrap();
        run_pipeline(&rows, &PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_document_node_attributes() {
        let output = run();
        let doc = GraphDocument::from_graph(&output.graph, &output.report, 1);

        assert_eq!(doc.nodes.len(), 4);
        let b = &doc.nodes[1];
        assert_eq!(b.label, "B");
        assert_eq!(b.turn_count, 2);
        assert_eq!(b.inbound_weight, 2);
        assert_eq!(b.outbound_weight, 1);
        assert_eq!(doc.nodes[3].response_ratio, None);
        assert_eq!(doc.edges.len(), 3);
    }

    #[test]
    fn test_min_weight_filters_edges_only() {
        let output = run();
        let doc = GraphDocument::from_graph(&output.graph, &output.report, 2);

        assert_eq!(doc.edges.len(), 1);
        assert_eq!(doc.edges[0].weight, 2);
        // Derived attributes still reflect the full graph
        assert_eq!(doc.nodes[0].inbound_weight, 2);
    }

    #[test]
    fn test_json_is_byte_identical_across_runs() {
        let first = run();
        let second = run();

        let a = GraphDocument::from_graph(&first.graph, &first.report, 1).to_json().unwrap();
        let b = GraphDocument::from_graph(&second.graph, &second.report, 1).to_json().unwrap();

        assert_eq!(a, b);
        assert!(a.contains("\"kind\": \"unresolved_reference\""));
    }

    #[test]
    fn test_write_outputs() {
        let output = run();
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("graph.json");
        let text_path = dir.path().join("graph.txt");

        GraphDocument::from_graph(&output.graph, &output.report, 1)
            .write_json(&json_path)
            .unwrap();
        GraphSummary::new(&output.graph, &output.report)
            .write_file(&text_path)
            .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["edges"].as_array().map(|e| e.len()), Some(3));
        assert_eq!(value["report"]["links_resolved"], 3);

        let text = std::fs::read_to_string(&text_path).unwrap();
        assert!(text.contains("C -> B  weight 2"));
        assert!(text.contains("reference to unknown turn 77"));
    }

    #[test]
    fn test_format_distribution() {
        let mut distribution = BTreeMap::new();
        distribution.insert(1, 3);
        distribution.insert(4, 1);
        assert_eq!(format_distribution(&distribution), "   1: 3\n   4: 1\n");
    }
}
