//! Lazy team generators over the active part of a roster.
//!
//! Both generators yield teams of a fixed size in lexicographic order of
//! entry positions, so they agree with each other item for item.

use itertools::{Combinations, Itertools};

use crate::data::roster::RosterEntry;
use crate::optimizer::team_validator::is_valid_team;
use crate::types::Type;

/// A legal team: borrowed entries in roster order.
#[derive(Debug, Clone, PartialEq)]
pub struct Team<'a> {
    entries: Vec<&'a RosterEntry>,
}

impl<'a> Team<'a> {
    pub fn new(entries: Vec<&'a RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[&'a RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summed member scores.
    pub fn score(&self) -> f64 {
        self.entries.iter().map(|entry| entry.score()).sum()
    }

    /// Member names flattened across entries; a pair contributes two.
    pub fn display_names(&self) -> Vec<&'a str> {
        self.entries
            .iter()
            .copied()
            .flat_map(RosterEntry::display_names)
            .collect()
    }

    pub fn entry_names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name()).collect()
    }

    pub fn elected_types(&self) -> Vec<Type> {
        self.entries
            .iter()
            .flat_map(|entry| entry.elected_types())
            .collect()
    }
}

/// Every `size`-combination of the pool, filtered by [is_valid_team].
pub struct ExhaustiveTeams<'a> {
    combinations: Option<Combinations<std::vec::IntoIter<&'a RosterEntry>>>,
}

impl<'a> ExhaustiveTeams<'a> {
    pub fn new(pool: Vec<&'a RosterEntry>, size: usize) -> Self {
        // combinations(0) would yield one empty team
        let combinations = (size > 0).then(|| pool.into_iter().combinations(size));
        Self { combinations }
    }
}

impl<'a> Iterator for ExhaustiveTeams<'a> {
    type Item = Team<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let combinations = self.combinations.as_mut()?;
        combinations
            .find(|candidate| is_valid_team(candidate))
            .map(Team::new)
    }
}

/// Depth-first search with an explicit index stack.
///
/// A partial team that is already invalid is never extended: removing an
/// entry from a valid team leaves a valid team, so no legal team can contain
/// an illegal prefix.
pub struct BacktrackingTeams<'a> {
    pool: Vec<&'a RosterEntry>,
    size: usize,
    stack: Vec<usize>,
    cursor: usize,
    floor: usize,
    done: bool,
}

impl<'a> BacktrackingTeams<'a> {
    pub fn new(pool: Vec<&'a RosterEntry>, size: usize) -> Self {
        let done = size == 0 || size > pool.len();
        Self {
            pool,
            size,
            stack: Vec::with_capacity(size),
            cursor: 0,
            floor: 0,
            done,
        }
    }

    /// Only the teams whose first entry is `pool[first]`.
    pub fn rooted(pool: Vec<&'a RosterEntry>, size: usize, first: usize) -> Self {
        let mut teams = Self::new(pool, size);
        if teams.done || first + size > teams.pool.len() {
            teams.done = true;
        } else {
            teams.stack.push(first);
            teams.cursor = first + 1;
            teams.floor = 1;
        }
        teams
    }

    fn partial(&self) -> Vec<&'a RosterEntry> {
        self.stack.iter().map(|&index| self.pool[index]).collect()
    }

    fn backtrack(&mut self) {
        if self.stack.len() <= self.floor {
            self.done = true;
            return;
        }
        match self.stack.pop() {
            Some(last) => self.cursor = last + 1,
            None => self.done = true,
        }
    }
}

impl<'a> Iterator for BacktrackingTeams<'a> {
    type Item = Team<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.stack.len() == self.size {
                let team = Team::new(self.partial());
                self.backtrack();
                return Some(team);
            }

            let needed = self.size - self.stack.len();
            if self.cursor + needed > self.pool.len() {
                self.backtrack();
                continue;
            }

            self.stack.push(self.cursor);
            self.cursor += 1;
            if !is_valid_team(&self.partial()) {
                self.stack.pop();
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::roster::{EntryRecord, MemberRecord};
    use crate::data::scores::ScoreTable;

    fn pair(name: &str, first: Type, second: Type) -> RosterEntry {
        let record = EntryRecord::Pair {
            first: MemberRecord::new(format!("{name}-a"), first, None),
            second: MemberRecord::new(format!("{name}-b"), second, None),
        };
        RosterEntry::from_record(&record, &ScoreTable::standard()).expect("valid pair")
    }

    fn fixture() -> Vec<RosterEntry> {
        vec![
            pair("p1", Type::Fire, Type::Water),
            pair("p2", Type::Water, Type::Grass),
            pair("p3", Type::Grass, Type::Fire),
            pair("p4", Type::Ice, Type::Rock),
            pair("p5", Type::Dark, Type::Steel),
        ]
    }

    fn names<'a>(teams: impl Iterator<Item = Team<'a>>) -> Vec<Vec<String>> {
        teams.map(|team| team.entry_names()).collect()
    }

    #[test]
    fn generators_agree_item_for_item() {
        let entries = fixture();
        for size in 0..=entries.len() {
            let pool: Vec<&RosterEntry> = entries.iter().collect();
            let exhaustive = names(ExhaustiveTeams::new(pool.clone(), size));
            let backtracking = names(BacktrackingTeams::new(pool, size));
            assert_eq!(exhaustive, backtracking, "size {size}");
        }
    }

    #[test]
    fn triangle_of_conflicts_is_never_emitted() {
        let entries = fixture();
        let pool: Vec<&RosterEntry> = entries.iter().collect();
        let teams = names(BacktrackingTeams::new(pool, 3));
        let triangle = vec!["p1".to_string(), "p2".to_string(), "p3".to_string()];
        assert!(!teams.iter().any(|team| {
            triangle
                .iter()
                .all(|name| team.iter().any(|entry| entry.starts_with(name.as_str())))
        }));
        assert!(teams.iter().any(|team| {
            team[0].starts_with("p1") && team[1].starts_with("p2") && team[2].starts_with("p4")
        }));
    }

    #[test]
    fn rooted_shards_concatenate_to_full_search() {
        let entries = fixture();
        let pool: Vec<&RosterEntry> = entries.iter().collect();
        let full = names(BacktrackingTeams::new(pool.clone(), 3));
        let sharded: Vec<Vec<String>> = (0..pool.len())
            .flat_map(|first| names(BacktrackingTeams::rooted(pool.clone(), 3, first)))
            .collect();
        assert_eq!(full, sharded);
    }

    #[test]
    fn empty_size_yields_nothing() {
        let entries = fixture();
        let pool: Vec<&RosterEntry> = entries.iter().collect();
        assert_eq!(ExhaustiveTeams::new(pool.clone(), 0).count(), 0);
        assert_eq!(BacktrackingTeams::new(pool, 0).count(), 0);
    }

    #[test]
    fn team_summaries_follow_entries() {
        let entries = fixture();
        let team = Team::new(vec![&entries[0], &entries[3]]);
        assert_eq!(team.display_names(), vec!["p1-a", "p1-b", "p4-a", "p4-b"]);
        assert_eq!(
            team.elected_types(),
            vec![Type::Fire, Type::Water, Type::Ice, Type::Rock]
        );
        assert!((team.score() - (entries[0].score() + entries[3].score())).abs() < 1e-9);
    }
}
