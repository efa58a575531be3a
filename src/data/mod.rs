//! Persisted roster data: score table, roster model, box store, tracker
//! sheet codec and sheet validation.

pub mod boxes;
pub mod roster;
pub mod scores;
pub mod sheet;
pub mod validate;

pub use boxes::{slugify, BoxRecord, BoxStore, Category, StoreError};
pub use roster::{EntryRecord, Member, MemberRecord, Pair, Roster, RosterEntry, RosterError};
pub use scores::{ScoreError, ScoreTable};
pub use sheet::{ParsedSheet, SheetError};
pub use validate::{ValidationReport, ValidationSeverity};
