//! Roster model: solo creatures and bonded pairs, each scored by type set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::scores::{ScoreError, ScoreTable};
use crate::types::{Type, TypeSet};

pub const UNKNOWN_MET: &str = "?";

fn unknown_met() -> String {
    UNKNOWN_MET.to_string()
}

/// Persisted data for one creature, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    pub elected: Type,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary: Option<Type>,
    #[serde(default)]
    pub lost: bool,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub party: bool,
    #[serde(default = "unknown_met")]
    pub met: String,
}

impl MemberRecord {
    pub fn new(name: impl Into<String>, elected: Type, auxiliary: Option<Type>) -> Self {
        Self {
            name: name.into(),
            nickname: String::new(),
            elected,
            auxiliary,
            lost: false,
            dead: false,
            party: false,
            met: unknown_met(),
        }
    }

    pub fn type_set(&self) -> TypeSet {
        TypeSet::from_parts(self.elected, self.auxiliary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryRecord {
    Solo(MemberRecord),
    Pair {
        first: MemberRecord,
        second: MemberRecord,
    },
}

impl EntryRecord {
    pub fn members(&self) -> Vec<&MemberRecord> {
        match self {
            Self::Solo(member) => vec![member],
            Self::Pair { first, second } => vec![first, second],
        }
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("pair '{first}' & '{second}' disagree on where they were met ('{first_met}' vs '{second_met}')")]
    MetMismatch {
        first: String,
        second: String,
        first_met: String,
        second_met: String,
    },
    #[error("duplicate roster entry '{0}'")]
    DuplicateName(String),
    /// `entry` counts from 1, in record order.
    #[error("roster entry {entry} is missing required field '{field}'")]
    MissingField { entry: usize, field: &'static str },
    #[error("roster entry '{entry}': {source}")]
    Score {
        entry: String,
        source: ScoreError,
    },
    #[error("roster entry '{entry}' does not belong in a {category} box")]
    CategoryMismatch { entry: String, category: String },
}

/// A scored creature.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    record: MemberRecord,
    type_set: TypeSet,
    score: f64,
}

impl Member {
    pub fn scored(record: MemberRecord, scores: &ScoreTable) -> Result<Self, ScoreError> {
        let type_set = record.type_set();
        let score = scores.score(&type_set)?;
        Ok(Self {
            record,
            type_set,
            score,
        })
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }

    pub fn nickname(&self) -> &str {
        &self.record.nickname
    }

    /// The primary type, the one that counts for team uniqueness.
    pub fn elected(&self) -> Type {
        self.record.elected
    }

    pub fn type_set(&self) -> TypeSet {
        self.type_set
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn record(&self) -> &MemberRecord {
        &self.record
    }
}

/// Two creatures bonded as one unit; they share the met tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    members: [Member; 2],
}

impl Pair {
    pub fn new(first: Member, second: Member) -> Result<Self, RosterError> {
        if first.record.met != second.record.met {
            return Err(RosterError::MetMismatch {
                first: first.record.name.clone(),
                second: second.record.name.clone(),
                first_met: first.record.met.clone(),
                second_met: second.record.met.clone(),
            });
        }
        Ok(Self {
            members: [first, second],
        })
    }

    pub fn first(&self) -> &Member {
        &self.members[0]
    }

    pub fn second(&self) -> &Member {
        &self.members[1]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RosterEntry {
    Solo(Member),
    Pair(Pair),
}

impl RosterEntry {
    pub fn from_record(record: &EntryRecord, scores: &ScoreTable) -> Result<Self, RosterError> {
        let scored = |member: &MemberRecord| {
            Member::scored(member.clone(), scores).map_err(|source| RosterError::Score {
                entry: member.name.clone(),
                source,
            })
        };
        match record {
            EntryRecord::Solo(member) => Ok(Self::Solo(scored(member)?)),
            EntryRecord::Pair { first, second } => {
                Ok(Self::Pair(Pair::new(scored(first)?, scored(second)?)?))
            }
        }
    }

    pub fn members(&self) -> &[Member] {
        match self {
            Self::Solo(member) => std::slice::from_ref(member),
            Self::Pair(pair) => &pair.members,
        }
    }

    pub fn name(&self) -> String {
        self.members()
            .iter()
            .map(Member::name)
            .collect::<Vec<_>>()
            .join(" & ")
    }

    pub fn nickname(&self) -> String {
        self.nicknames().collect::<Vec<_>>().join(" & ")
    }

    pub fn is_lost(&self) -> bool {
        self.members().iter().any(|member| member.record.lost)
    }

    pub fn is_dead(&self) -> bool {
        self.members().iter().any(|member| member.record.dead)
    }

    pub fn is_active(&self) -> bool {
        !(self.is_lost() || self.is_dead())
    }

    pub fn is_party(&self) -> bool {
        self.members().iter().any(|member| member.record.party)
    }

    pub fn met(&self) -> &str {
        &self.members()[0].record.met
    }

    pub fn score(&self) -> f64 {
        self.members().iter().map(Member::score).sum()
    }

    /// One elected type per member; a pair contributes both.
    pub fn elected_types(&self) -> impl Iterator<Item = Type> + '_ {
        self.members().iter().map(Member::elected)
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.members().iter().map(Member::name)
    }

    pub fn nicknames(&self) -> impl Iterator<Item = &str> + '_ {
        self.members().iter().map(Member::nickname)
    }

    pub fn to_record(&self) -> EntryRecord {
        match self {
            Self::Solo(member) => EntryRecord::Solo(member.record.clone()),
            Self::Pair(pair) => EntryRecord::Pair {
                first: pair.first().record.clone(),
                second: pair.second().record.clone(),
            },
        }
    }
}

/// Ordered, name-unique collection of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn build(records: &[EntryRecord], scores: &ScoreTable) -> Result<Self, RosterError> {
        for (index, record) in records.iter().enumerate() {
            if record.members().iter().any(|member| member.name.trim().is_empty()) {
                return Err(RosterError::MissingField {
                    entry: index + 1,
                    field: "name",
                });
            }
        }
        let entries = records
            .iter()
            .map(|record| RosterEntry::from_record(record, scores))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<RosterEntry>) -> Result<Self, RosterError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            let name = entry.name();
            if !seen.insert(name.clone()) {
                return Err(RosterError::DuplicateName(name));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Active entries in roster order.
    pub fn active(&self) -> Vec<&RosterEntry> {
        self.entries.iter().filter(|entry| entry.is_active()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RosterEntry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
