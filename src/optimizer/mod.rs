pub mod ranking;
pub mod team_generator;
pub mod team_validator;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::roster::{Roster, RosterEntry};
use crate::optimizer::team_generator::{BacktrackingTeams, ExhaustiveTeams, Team};
use crate::optimizer::team_validator::MAX_TEAM_SIZE;
use crate::parallel::{run_team_shards, WorkerPool};

/// Team search strategy. All three produce the same teams in the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Every combination of the active roster, filtered by the validator.
    Exhaustive,
    /// Depth-first search that prunes illegal partial teams.
    #[default]
    Backtracking,
    /// Backtracking sharded on the first entry across a worker pool.
    Parallel,
}

impl SearchStrategy {
    pub const ALL: [SearchStrategy; 3] = [Self::Exhaustive, Self::Backtracking, Self::Parallel];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exhaustive => "exhaustive",
            Self::Backtracking => "backtracking",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search strategy '{0}' (expected exhaustive, backtracking or parallel)")]
pub struct SearchStrategyParseError(pub String);

impl FromStr for SearchStrategy {
    type Err = SearchStrategyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| SearchStrategyParseError(value.to_string()))
    }
}

/// Search over the active entries of one roster.
#[derive(Debug, Clone)]
pub struct TeamSearch<'a> {
    roster: &'a Roster,
    strategy: SearchStrategy,
    workers: WorkerPool,
}

impl<'a> TeamSearch<'a> {
    pub fn new(roster: &'a Roster) -> Self {
        Self {
            roster,
            strategy: SearchStrategy::default(),
            workers: WorkerPool::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Only used by [SearchStrategy::Parallel].
    pub fn with_workers(mut self, workers: WorkerPool) -> Self {
        self.workers = workers;
        self
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    pub fn roster(&self) -> &'a Roster {
        self.roster
    }

    /// `min(6, active entries)`.
    pub fn team_size(&self) -> usize {
        self.roster.active().len().min(MAX_TEAM_SIZE)
    }

    /// Fresh iterator over every legal team of [TeamSearch::team_size] entries.
    /// Calling this again restarts the search from the beginning.
    pub fn teams(&self) -> Teams<'a> {
        let pool: Vec<&'a RosterEntry> = self.roster.active();
        let size = pool.len().min(MAX_TEAM_SIZE);
        log::debug!(
            "{} search for teams of {} over {} active entries",
            self.strategy,
            size,
            pool.len()
        );
        match self.strategy {
            SearchStrategy::Exhaustive => Teams::Exhaustive(ExhaustiveTeams::new(pool, size)),
            SearchStrategy::Backtracking => Teams::Backtracking(BacktrackingTeams::new(pool, size)),
            SearchStrategy::Parallel => {
                Teams::Collected(run_team_shards(&pool, size, &self.workers).into_iter())
            }
        }
    }
}

/// Iterator returned by [TeamSearch::teams]. The parallel strategy runs to
/// completion up front and replays its results.
pub enum Teams<'a> {
    Exhaustive(ExhaustiveTeams<'a>),
    Backtracking(BacktrackingTeams<'a>),
    Collected(std::vec::IntoIter<Team<'a>>),
}

impl<'a> Iterator for Teams<'a> {
    type Item = Team<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Exhaustive(teams) => teams.next(),
            Self::Backtracking(teams) => teams.next(),
            Self::Collected(teams) => teams.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::roster::{EntryRecord, MemberRecord};
    use crate::data::scores::ScoreTable;
    use crate::types::Type;

    fn solo(name: &str, elected: Type, dead: bool) -> EntryRecord {
        let mut member = MemberRecord::new(name, elected, None);
        member.dead = dead;
        EntryRecord::Solo(member)
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!(
            "Parallel".parse::<SearchStrategy>(),
            Ok(SearchStrategy::Parallel)
        );
        assert!("greedy".parse::<SearchStrategy>().is_err());
        assert_eq!(SearchStrategy::default(), SearchStrategy::Backtracking);
    }

    #[test]
    fn team_size_counts_only_active_entries() {
        let records = vec![
            solo("a", Type::Fire, false),
            solo("b", Type::Water, true),
            solo("c", Type::Grass, false),
        ];
        let roster = Roster::build(&records, &ScoreTable::standard()).expect("roster");
        let search = TeamSearch::new(&roster);
        assert_eq!(search.team_size(), 2);
        let teams: Vec<Vec<String>> = search.teams().map(|team| team.entry_names()).collect();
        assert_eq!(teams, vec![vec!["a".to_string(), "c".to_string()]]);
    }

    #[test]
    fn teams_restart_on_each_call() {
        let records = vec![solo("a", Type::Fire, false), solo("b", Type::Fire, false)];
        let roster = Roster::build(&records, &ScoreTable::standard()).expect("roster");
        for strategy in SearchStrategy::ALL {
            let search = TeamSearch::new(&roster).with_strategy(strategy);
            assert_eq!(search.teams().count(), 1, "{strategy}");
            assert_eq!(search.teams().count(), 1, "{strategy}");
        }
    }

    #[test]
    fn empty_roster_yields_no_teams() {
        let roster = Roster::default();
        for strategy in SearchStrategy::ALL {
            let search = TeamSearch::new(&roster).with_strategy(strategy);
            assert_eq!(search.teams().count(), 0, "{strategy}");
        }
    }
}
