//! Type effectiveness, box persistence and team search for solo or
//! soul-linked creature collections.

pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod optimizer;
pub mod parallel;
pub mod types;

pub use data::{Roster, RosterEntry, ScoreTable};
pub use optimizer::team_generator::Team;
pub use optimizer::team_validator::{is_valid_team, MAX_TEAM_SIZE};
pub use optimizer::{SearchStrategy, TeamSearch};
pub use types::{dual_affinity, matchup_ratio, Type, TypeChart, TypeSet};
