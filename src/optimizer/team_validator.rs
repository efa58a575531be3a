//! Team legality: elected types must be pairwise distinct once at most one
//! entry is set aside.

use crate::data::roster::RosterEntry;
use crate::types::TYPE_COUNT;

/// Largest legal team.
pub const MAX_TEAM_SIZE: usize = 6;

/// A candidate is valid when it has at most [MAX_TEAM_SIZE] entries and there
/// is some entry whose removal leaves no repeated elected type. An empty or
/// single-entry candidate is always valid.
pub fn is_valid_team(candidate: &[&RosterEntry]) -> bool {
    if candidate.len() > MAX_TEAM_SIZE {
        return false;
    }
    if candidate.is_empty() {
        return true;
    }
    (0..candidate.len()).any(|excluded| distinct_without(candidate, excluded))
}

fn distinct_without(candidate: &[&RosterEntry], excluded: usize) -> bool {
    let mut seen = [false; TYPE_COUNT];
    candidate
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != excluded)
        .flat_map(|(_, entry)| entry.elected_types())
        .all(|ty| !std::mem::replace(&mut seen[ty.index()], true))
}
