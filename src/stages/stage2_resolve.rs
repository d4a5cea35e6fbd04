use tracing::{debug, info, warn};

use crate::error::PipelineWarning;
use crate::models::{NormalizedAnnotation, ResponseLink, TranscriptStore};

/// Configuration for Stage 2 reference resolution
#[derive(Debug, Clone, Default)]
pub struct ResolveConfig {
    /// Drop targets whose turn-group starts after the responding turn
    /// instead of resolving them with a warning
    pub strict_order: bool,
}

/// Result of Stage 2 reference resolution
#[derive(Debug)]
pub struct ResolutionResult<'a> {
    /// Resolved links, in the order of the input annotations
    pub links: Vec<ResponseLink<'a>>,
    /// Skipped annotations and resolved forward references
    pub warnings: Vec<PipelineWarning>,
}

/// Resolve single-target annotations to respondees
///
/// Each target is looked up in the turn-group index of the static store. A
/// target naming a group of m turns yields multiplicity m. Unknown targets
/// are skipped with a warning. Forward targets are resolved with a warning,
/// or skipped when `strict_order` is set.
pub fn resolve_references<'a>(
    store: &'a TranscriptStore,
    annotations: &[NormalizedAnnotation<'a>],
    config: &ResolveConfig,
) -> ResolutionResult<'a> {
    let mut links = Vec::with_capacity(annotations.len());
    let mut warnings = Vec::new();

    for annotation in annotations {
        match resolve_one(store, annotation, config) {
            Ok((link, notice)) => {
                debug!(
                    "{} -> {} (x{})",
                    link.responder, link.respondee, link.multiplicity
                );
                if let Some(warning) = notice {
                    warn!("{}", warning);
                    warnings.push(warning);
                }
                links.push(link);
            }
            Err(warning) => {
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    info!(
        "Stage 2: {} links resolved, {} skipped",
        links.len(),
        warnings.iter().filter(|w| w.drops_link()).count()
    );

    ResolutionResult { links, warnings }
}

fn resolve_one<'a>(
    store: &'a TranscriptStore,
    annotation: &NormalizedAnnotation<'a>,
    config: &ResolveConfig,
) -> Result<(ResponseLink<'a>, Option<PipelineWarning>), PipelineWarning> {
    let origin = annotation.origin;
    let unresolved = || PipelineWarning::UnresolvedReference {
        position: origin.position,
        turn_id: origin.turn_id.clone(),
        target: annotation.target.clone(),
    };

    let group = store.group(annotation.target).ok_or_else(unresolved)?;

    let forward = (group.first_position() > origin.position).then(|| {
        PipelineWarning::ForwardReference {
            position: origin.position,
            turn_id: origin.turn_id.clone(),
            target: annotation.target.clone(),
            dropped: config.strict_order,
        }
    });
    if let (true, Some(warning)) = (config.strict_order, &forward) {
        return Err(warning.clone());
    }

    let respondee = store.group_speaker(group).ok_or_else(unresolved)?;

    let link = ResponseLink {
        responder: &origin.speaker,
        respondee,
        multiplicity: group.len(),
    };
    Ok((link, forward))
}
