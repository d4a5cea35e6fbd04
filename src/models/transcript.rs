use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::error::{PipelineError, TurnGroupViolation};

use super::{Turn, TurnId};

/// All turns sharing one nominal identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnGroup {
    pub turn_id: TurnId,
    /// Contiguous positions of the member turns
    pub positions: Range<usize>,
}

impl TurnGroup {
    /// Number of physical turns in the group
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of the earliest member turn
    pub fn first_position(&self) -> usize {
        self.positions.start
    }
}

/// Canonical ordered list of turns with a turn-group index
///
/// Built once and never mutated. Every turn-group is guaranteed to be
/// contiguous and produced by a single speaker.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    turns: Vec<Turn>,
    groups: HashMap<TurnId, TurnGroup>,
    speakers: Vec<String>,
}

impl TranscriptStore {
    /// Index the turns, validating the turn-group invariants
    ///
    /// Turn positions are reassigned from the order of `turns`.
    pub fn new(mut turns: Vec<Turn>) -> Result<Self, PipelineError> {
        for (position, turn) in turns.iter_mut().enumerate() {
            turn.position = position;
        }

        let mut groups: HashMap<TurnId, TurnGroup> = HashMap::new();
        let mut speakers: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for turn in &turns {
            if seen.insert(turn.speaker.as_str()) {
                speakers.push(turn.speaker.clone());
            }

            let group = match groups.entry(turn.turn_id.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(TurnGroup {
                        turn_id: turn.turn_id.clone(),
                        positions: turn.position..turn.position + 1,
                    });
                    continue;
                }
                Entry::Occupied(slot) => slot.into_mut(),
            };

            if group.positions.end != turn.position {
                return Err(PipelineError::InconsistentTurnGroup {
                    turn_id: turn.turn_id.clone(),
                    reason: TurnGroupViolation::NotContiguous {
                        first_position: group.positions.start,
                        stray_position: turn.position,
                    },
                });
            }

            let group_speaker = &turns[group.positions.start].speaker;
            if *group_speaker != turn.speaker {
                return Err(PipelineError::InconsistentTurnGroup {
                    turn_id: turn.turn_id.clone(),
                    reason: TurnGroupViolation::MixedSpeakers {
                        speakers: vec![group_speaker.clone(), turn.speaker.clone()],
                    },
                });
            }

            group.positions.end += 1;
        }

        Ok(Self {
            turns,
            groups,
            speakers,
        })
    }

    /// All turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Look up the turn-group a target identifier denotes
    pub fn group(&self, turn_id: &TurnId) -> Option<&TurnGroup> {
        self.groups.get(turn_id)
    }

    /// Speaker shared by every turn of a group
    pub fn group_speaker(&self, group: &TurnGroup) -> Option<&str> {
        self.turns
            .get(group.first_position())
            .map(|t| t.speaker.as_str())
    }

    /// Unique speakers in order of first appearance
    pub fn speakers(&self) -> &[String] {
        &self.speakers
    }

    /// Number of distinct turn identifiers
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
