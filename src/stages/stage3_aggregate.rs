use std::collections::BTreeMap;

use tracing::info;

use crate::models::ResponseLink;

/// Summed weight for one ordered (responder, respondee) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedPair<'a> {
    pub responder: &'a str,
    pub respondee: &'a str,
    pub weight: usize,
}

/// Sum link multiplicities per ordered speaker pair
///
/// Output is sparse (pairs with no link are absent) and sorted by
/// `(responder, respondee)`, so it depends only on the multiset of links.
pub fn aggregate_links<'a>(links: &[ResponseLink<'a>]) -> Vec<WeightedPair<'a>> {
    let mut weights: BTreeMap<(&'a str, &'a str), usize> = BTreeMap::new();

    for link in links {
        *weights.entry((link.responder, link.respondee)).or_insert(0) += link.multiplicity;
    }

    info!(
        "Stage 3: {} links aggregated into {} speaker pairs",
        links.len(),
        weights.len()
    );

    weights
        .into_iter()
        .map(|((responder, respondee), weight)| WeightedPair {
            responder,
            respondee,
            weight,
        })
        .collect()
}
