use std::collections::HashMap;

use tracing::info;

use crate::error::PipelineError;
use crate::models::{Edge, Graph, Node, NodeId, TranscriptStore};

use super::WeightedPair;

/// Build the node and edge tables
///
/// Every speaker in the store becomes a node (including speakers with no
/// edges), numbered in order of first appearance. Speaker pairs are
/// translated to node ids and edges sorted by `(from, to)`. Pairs naming a
/// speaker outside `store` are rejected with `UnknownSpeaker`.
pub fn assemble_graph(
    store: &TranscriptStore,
    pairs: &[WeightedPair<'_>],
) -> Result<Graph, PipelineError> {
    let nodes: Vec<Node> = store
        .speakers()
        .iter()
        .enumerate()
        .map(|(id, speaker)| Node {
            id,
            label: speaker.clone(),
        })
        .collect();

    let ids: HashMap<&str, NodeId> = nodes.iter().map(|n| (n.label.as_str(), n.id)).collect();
    let node_id = |speaker: &str| {
        ids.get(speaker)
            .copied()
            .ok_or_else(|| PipelineError::UnknownSpeaker(speaker.to_string()))
    };

    let mut edges = pairs
        .iter()
        .filter(|p| p.weight > 0)
        .map(|p| -> Result<Edge, PipelineError> {
            Ok(Edge {
                from: node_id(p.responder)?,
                to: node_id(p.respondee)?,
                weight: p.weight,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    edges.sort_by_key(|e| (e.from, e.to));

    let mut turn_counts = vec![0; nodes.len()];
    for turn in store.turns() {
        turn_counts[node_id(&turn.speaker)?] += 1;
    }

    info!("Stage 4: {} nodes, {} edges", nodes.len(), edges.len());

    Ok(Graph::new(nodes, edges, turn_counts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse_transcript_json;
    use crate::models::AnnotationConfig;
    use crate::stages::build_store;

    fn store(json: &str) -> TranscriptStore {
        let rows = parse_transcript_json(json).unwrap();
        build_store(&rows, &AnnotationConfig::default()).unwrap().store
    }

    #[test]
    fn test_nodes_in_first_appearance_order() {
        let store = store(
            r#"[
                {"speaker": "Zed", "turn_id": 1},
                {"speaker": "Amy", "turn_id": 2},
                {"speaker": "Zed", "turn_id": 3},
                {"speaker": "Bob", "turn_id": 4}
            ]"#,
        );

        let graph = assemble_graph(&store, &[]).unwrap();

        let labels: Vec<&str> = graph.nodes().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Zed", "Amy", "Bob"]);
        assert_eq!(graph.turn_count_per_speaker(), &[2, 1, 1]);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_pairs_translated_to_ids() {
        let store = store(
            r#"[
                {"speaker": "A", "turn_id": 1},
                {"speaker": "B", "turn_id": 2}
            ]"#,
        );
        let pairs = vec![
            WeightedPair { responder: "B", respondee: "A", weight: 2 },
            WeightedPair { responder: "A", respondee: "A", weight: 1 },
        ];

        let graph = assemble_graph(&store, &pairs).unwrap();

        assert_eq!(
            graph.edges(),
            &[
                Edge { from: 0, to: 0, weight: 1 },
                Edge { from: 1, to: 0, weight: 2 },
            ]
        );
    }

    #[test]
    fn test_unknown_speaker_rejected() {
        let store = store(r#"[{"speaker": "A", "turn_id": 1}]"#);
        let pairs = vec![WeightedPair { responder: "Q", respondee: "A", weight: 1 }];

        assert_eq!(
            assemble_graph(&store, &pairs),
            Err(PipelineError::UnknownSpeaker("Q".to_string()))
        );
    }
}
