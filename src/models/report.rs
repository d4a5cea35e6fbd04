use serde::Serialize;

use crate::error::PipelineWarning;

/// Counts and recovered warnings from one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Physical turns in the transcript
    pub turns: usize,
    /// Distinct speakers
    pub speakers: usize,
    /// Turns carrying a targeted (single or compound) annotation
    pub targeted_turns: usize,
    /// Single-target annotations produced by expansion
    pub expanded_annotations: usize,
    /// Response links that resolved to a respondee
    pub links_resolved: usize,
    /// Sum of multiplicities over resolved links (equals total edge weight)
    pub multiplicity_total: usize,
    /// Recovered problems, in transcript order
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineReport {
    pub fn malformed_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, PipelineWarning::MalformedAnnotation { .. }))
            .count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, PipelineWarning::UnresolvedReference { .. }))
            .count()
    }

    pub fn forward_reference_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, PipelineWarning::ForwardReference { .. }))
            .count()
    }

    /// Expanded annotations that produced no response link
    pub fn dropped_links(&self) -> usize {
        self.warnings.iter().filter(|w| w.drops_link()).count()
    }

    /// Whether every annotation was parsed and resolved
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
