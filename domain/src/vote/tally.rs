//! Vote tally - derived counts, recomputed on demand.

use crate::core::ids::PlayerId;
use crate::vote::ballot::Ballot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts per target plus passes for one voting session.
///
/// Derived from the cast ballots whenever a result is requested; never
/// stored as authoritative state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    counts: BTreeMap<PlayerId, u32>,
    passes: u32,
    total: u32,
}

impl VoteTally {
    pub fn from_ballots<'a>(ballots: impl Iterator<Item = &'a Ballot>) -> Self {
        let mut tally = Self::default();
        for ballot in ballots {
            tally.total += 1;
            match ballot.target() {
                Some(id) => *tally.counts.entry(id.clone()).or_insert(0) += 1,
                None => tally.passes += 1,
            }
        }
        tally
    }

    pub fn votes_for(&self, id: &PlayerId) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    pub fn pass_count(&self) -> u32 {
        self.passes
    }

    pub fn total_cast(&self) -> u32 {
        self.total
    }

    /// True when at least one ballot was cast and none named a player.
    pub fn all_passed(&self) -> bool {
        self.total > 0 && self.counts.is_empty()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Players holding the maximum count (ties included), excluding
    /// passes. Empty when no ballot named a player.
    pub fn leaders(&self) -> Vec<PlayerId> {
        let max = self.max_count();
        if max == 0 {
            return Vec::new();
        }
        self.counts
            .iter()
            .filter(|&(_, &count)| count == max)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn counts(&self) -> &BTreeMap<PlayerId, u32> {
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(ballots: &[Ballot]) -> VoteTally {
        VoteTally::from_ballots(ballots.iter())
    }

    #[test]
    fn test_counts_and_passes() {
        let t = tally(&[
            Ballot::For(PlayerId::new("a")),
            Ballot::For(PlayerId::new("a")),
            Ballot::For(PlayerId::new("b")),
            Ballot::Pass,
        ]);
        assert_eq!(t.votes_for(&PlayerId::new("a")), 2);
        assert_eq!(t.votes_for(&PlayerId::new("b")), 1);
        assert_eq!(t.pass_count(), 1);
        assert_eq!(t.total_cast(), 4);
        assert_eq!(t.leaders(), vec![PlayerId::new("a")]);
    }

    #[test]
    fn test_all_passed() {
        let t = tally(&[Ballot::Pass, Ballot::Pass, Ballot::Pass]);
        assert!(t.all_passed());
        assert!(t.leaders().is_empty());
        assert_eq!(t.total_cast(), 3);
    }

    #[test]
    fn test_empty_tally_is_not_all_passed() {
        let t = tally(&[]);
        assert!(!t.all_passed());
        assert_eq!(t.max_count(), 0);
    }

    #[test]
    fn test_tied_leaders() {
        let t = tally(&[
            Ballot::For(PlayerId::new("a")),
            Ballot::For(PlayerId::new("b")),
            Ballot::Pass,
        ]);
        let leaders = t.leaders();
        assert_eq!(leaders.len(), 2);
        assert!(leaders.contains(&PlayerId::new("a")));
        assert!(leaders.contains(&PlayerId::new("b")));
    }
}
