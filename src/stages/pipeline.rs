use tracing::{info, warn};

use crate::error::PipelineError;
use crate::models::{AnnotationConfig, Graph, PipelineReport, TranscriptRow};

use super::{
    ResolveConfig, StoreResult, aggregate_links, assemble_graph, build_store, expand_annotations,
    resolve_references,
};

/// Configuration for a full pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub annotation: AnnotationConfig,
    pub resolve: ResolveConfig,
}

/// Graph plus the report of what was dropped along the way
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub graph: Graph,
    pub report: PipelineReport,
}

/// Run all stages over a transcript table
///
/// Stages:
/// 0. Build the transcript store (parse annotations, index turn-groups)
/// 1. Expand compound annotations
/// 2. Resolve targets to respondees
/// 3. Aggregate links into weighted speaker pairs
/// 4. Assemble node and edge tables
///
/// Malformed and unresolved annotations are skipped and reported. Forward
/// references are reported and resolved unless strict ordering is set.
/// A structurally inconsistent turn-group aborts the run.
pub fn run_pipeline(
    rows: &[TranscriptRow],
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    let StoreResult {
        store,
        warnings: mut store_warnings,
    } = build_store(rows, &config.annotation)?;
    let store = &store;

    let expansion = expand_annotations(store);
    let resolution = resolve_references(store, &expansion.annotations, &config.resolve);
    let pairs = aggregate_links(&resolution.links);
    let graph = assemble_graph(store, &pairs)?;

    store_warnings.extend(resolution.warnings);
    // Parse warnings precede resolution warnings; restore transcript order
    store_warnings.sort_by_key(|w| w.position());

    let report = PipelineReport {
        turns: store.len(),
        speakers: store.speakers().len(),
        targeted_turns: expansion.targeted_turns,
        expanded_annotations: expansion.annotations.len(),
        links_resolved: resolution.links.len(),
        multiplicity_total: resolution.links.iter().map(|l| l.multiplicity).sum(),
        warnings: store_warnings,
    };

    if !report.is_clean() {
        warn!(
            "{} malformed annotations, {} unresolved references, {} forward references",
            report.malformed_count(),
            report.unresolved_count(),
            report.forward_reference_count()
        );
    }
    info!(
        "Pipeline complete: {} nodes, {} edges, total weight {}",
        graph.nodes().len(),
        graph.edges().len(),
        graph.total_weight()
    );

    Ok(PipelineOutput { graph, report })
}
