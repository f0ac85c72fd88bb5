//! Vote resolution rules.

use crate::core::ids::PlayerId;
use crate::round::Winner;
use crate::vote::tally::VoteTally;
use serde::{Deserialize, Serialize};

/// Result of resolving a completed vote tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// Every ballot was a pass (or none were cast): nobody is
    /// eliminated and the round resumes with a fresh question count.
    AllPassed,
    /// A single player held the maximum and is eliminated.
    Eliminated { player: PlayerId, winner: Winner },
    /// Head-to-head tie with only two active players: the outsider was
    /// cornered but not isolated, which counts as a near-miss for the
    /// humans.
    TiedOneOnOne { tied: Vec<PlayerId> },
    /// Tie among three or more active players: everyone tied leaves at
    /// once. `survivors` is the active count after the eliminations.
    TiedEliminated {
        eliminated: Vec<PlayerId>,
        survivors: usize,
    },
}

impl VoteOutcome {
    /// The winner this outcome decides, if any. `None` means the round
    /// continues.
    pub fn winner(&self) -> Option<Winner> {
        match self {
            VoteOutcome::AllPassed => None,
            VoteOutcome::Eliminated { winner, .. } => Some(*winner),
            VoteOutcome::TiedOneOnOne { .. } => Some(Winner::Humans),
            VoteOutcome::TiedEliminated { survivors, .. } => {
                if *survivors < 2 {
                    Some(Winner::Ai)
                } else {
                    None
                }
            }
        }
    }

    pub fn continues_round(&self) -> bool {
        self.winner().is_none()
    }

    pub fn eliminated(&self) -> &[PlayerId] {
        match self {
            VoteOutcome::Eliminated { player, .. } => std::slice::from_ref(player),
            VoteOutcome::TiedEliminated { eliminated, .. } => eliminated,
            _ => &[],
        }
    }
}

/// Resolves a completed tally. Pure: the same tally, active count, and
/// outsider always produce the same outcome.
///
/// Priority order:
/// 1. all passes → continue;
/// 2. unique maximum → eliminate (outsider out → humans win, anyone
///    else out → ai wins);
/// 3. tie with exactly two active players → humans win;
/// 4. tie with three or more active players → all tied players are
///    eliminated; ai wins if fewer than two remain.
pub fn resolve(tally: &VoteTally, total_active: usize, outsider: &PlayerId) -> VoteOutcome {
    let leaders = tally.leaders();

    if leaders.is_empty() {
        return VoteOutcome::AllPassed;
    }

    if leaders.len() == 1 {
        let player = leaders.into_iter().next().expect("single leader");
        let winner = if &player == outsider {
            Winner::Humans
        } else {
            Winner::Ai
        };
        return VoteOutcome::Eliminated { player, winner };
    }

    if total_active == 2 {
        return VoteOutcome::TiedOneOnOne { tied: leaders };
    }

    let survivors = total_active.saturating_sub(leaders.len());
    VoteOutcome::TiedEliminated {
        eliminated: leaders,
        survivors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::ballot::Ballot;

    fn tally(ballots: &[Ballot]) -> VoteTally {
        VoteTally::from_ballots(ballots.iter())
    }

    fn votes_for(target: &str, count: usize) -> Vec<Ballot> {
        (0..count)
            .map(|_| Ballot::For(PlayerId::new(target)))
            .collect()
    }

    #[test]
    fn test_all_pass_continues_the_round() {
        let t = tally(&[Ballot::Pass, Ballot::Pass, Ballot::Pass]);
        let outcome = resolve(&t, 3, &PlayerId::new("a1"));
        assert_eq!(outcome, VoteOutcome::AllPassed);
        assert!(outcome.continues_round());
        assert!(outcome.eliminated().is_empty());
    }

    #[test]
    fn test_eliminating_the_outsider_means_humans_win() {
        let t = tally(&votes_for("a1", 3));
        let outcome = resolve(&t, 3, &PlayerId::new("a1"));
        assert_eq!(
            outcome,
            VoteOutcome::Eliminated {
                player: PlayerId::new("a1"),
                winner: Winner::Humans,
            }
        );
    }

    #[test]
    fn test_eliminating_anyone_else_means_ai_wins() {
        let t = tally(&votes_for("h2", 2));
        let outcome = resolve(&t, 3, &PlayerId::new("a1"));
        assert_eq!(
            outcome,
            VoteOutcome::Eliminated {
                player: PlayerId::new("h2"),
                winner: Winner::Ai,
            }
        );
    }

    #[test]
    fn test_one_on_one_tie_favors_humans() {
        let mut ballots = votes_for("a", 2);
        ballots.extend(votes_for("b", 2));
        let t = tally(&ballots);
        let outcome = resolve(&t, 2, &PlayerId::new("a"));
        assert!(matches!(outcome, VoteOutcome::TiedOneOnOne { .. }));
        assert_eq!(outcome.winner(), Some(Winner::Humans));
    }

    #[test]
    fn test_tie_with_four_active_eliminates_both() {
        let mut ballots = votes_for("a", 2);
        ballots.extend(votes_for("b", 2));
        let t = tally(&ballots);
        let outcome = resolve(&t, 4, &PlayerId::new("a"));

        let eliminated = outcome.eliminated();
        assert_eq!(eliminated.len(), 2);
        assert!(eliminated.contains(&PlayerId::new("a")));
        assert!(eliminated.contains(&PlayerId::new("b")));
        // Two survivors: the round continues.
        assert_eq!(outcome.winner(), None);
    }

    #[test]
    fn test_tie_that_empties_the_table_hands_ai_the_win() {
        let mut ballots = votes_for("a", 1);
        ballots.extend(votes_for("b", 1));
        ballots.extend(votes_for("c", 1));
        let t = tally(&ballots);
        let outcome = resolve(&t, 3, &PlayerId::new("a"));
        // All three tied and eliminated; zero survivors.
        assert_eq!(outcome.winner(), Some(Winner::Ai));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut ballots = votes_for("a1", 3);
        ballots.push(Ballot::Pass);
        let t = tally(&ballots);
        let first = resolve(&t, 4, &PlayerId::new("a1"));
        let second = resolve(&t, 4, &PlayerId::new("a1"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_passes_do_not_outweigh_votes() {
        let mut ballots = vec![Ballot::Pass, Ballot::Pass, Ballot::Pass];
        ballots.extend(votes_for("h2", 1));
        let t = tally(&ballots);
        let outcome = resolve(&t, 4, &PlayerId::new("a1"));
        assert_eq!(
            outcome,
            VoteOutcome::Eliminated {
                player: PlayerId::new("h2"),
                winner: Winner::Ai,
            }
        );
    }
}
