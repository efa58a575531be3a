//! Tracker worksheet layout: three header rows, then one entry per row.
//!
//! Soullink rows: party, met, then for each member type 1, type 2, name,
//! nickname, lost, dead (14 columns). Standard rows: party, met, type 1,
//! type 2, name, nickname, lost, dead (8 columns). Rows with an empty met
//! cell are unused slots and are skipped.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use crate::data::boxes::{BoxRecord, Category};
use crate::data::roster::{EntryRecord, MemberRecord};
use crate::types::{Type, TypeParseError};

pub const HEADER_ROWS: usize = 3;
pub const SOULLINK_COLUMNS: usize = 14;
pub const STANDARD_COLUMNS: usize = 8;

const MEMBER_COLUMNS: usize = 6;
const TRUE_CELL: &str = "TRUE";
const FALSE_CELL: &str = "FALSE";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open sheet '{path}': {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to read sheet rows: {0}")]
    Read(csv::Error),
    #[error("failed to write sheet rows: {0}")]
    Write(csv::Error),
    #[error("sheet is missing its 3 header rows")]
    MissingHeader,
    #[error("row {row}: expected {expected} columns, found {found}")]
    ShortRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {column}: {source}")]
    ElectedType {
        row: usize,
        column: usize,
        source: TypeParseError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSheet {
    pub players: Vec<String>,
    pub entries: Vec<EntryRecord>,
}

pub fn columns_for(category: Category) -> usize {
    match category {
        Category::Standard => STANDARD_COLUMNS,
        Category::Soullink => SOULLINK_COLUMNS,
    }
}

pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>, SheetError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SheetError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_rows_from(file)
}

pub fn read_rows_from<R: Read>(reader: R) -> Result<Vec<Vec<String>>, SheetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    reader
        .records()
        .map(|record| {
            record
                .map(|row| row.iter().map(str::to_string).collect())
                .map_err(SheetError::Read)
        })
        .collect()
}

pub fn write_rows<W: Write>(rows: &[Vec<String>], writer: W) -> Result<(), SheetError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    for row in rows {
        writer.write_record(row).map_err(SheetError::Write)?;
    }
    writer
        .flush()
        .map_err(|err| SheetError::Write(csv::Error::from(err)))
}

/// Data rows that hold an entry, paired with their 1-based sheet row number.
pub(crate) fn data_rows(rows: &[Vec<String>]) -> impl Iterator<Item = (usize, &Vec<String>)> {
    rows.iter()
        .enumerate()
        .skip(HEADER_ROWS)
        .filter(|(_, row)| !cell(row, 1).trim().is_empty())
        .map(|(index, row)| (index + 1, row))
}

pub(crate) fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}

pub(crate) fn flag(row: &[String], column: usize) -> bool {
    cell(row, column).trim().eq_ignore_ascii_case(TRUE_CELL)
}

pub fn parse_rows(rows: &[Vec<String>], category: Category) -> Result<ParsedSheet, SheetError> {
    if rows.len() < HEADER_ROWS {
        return Err(SheetError::MissingHeader);
    }

    let player_columns: &[usize] = match category {
        Category::Standard => &[3],
        Category::Soullink => &[2, 8],
    };
    let players = player_columns
        .iter()
        .map(|column| cell(&rows[0], *column).trim().to_string())
        .filter(|player| !player.is_empty())
        .collect();

    let expected = columns_for(category);
    let mut entries = Vec::new();
    for (row_number, row) in data_rows(rows) {
        if row.len() < expected {
            return Err(SheetError::ShortRow {
                row: row_number,
                expected,
                found: row.len(),
            });
        }
        let party = flag(row, 0);
        let met = cell(row, 1).trim();
        let entry = match category {
            Category::Standard => {
                EntryRecord::Solo(parse_member(row, row_number, 2, party, met)?)
            }
            Category::Soullink => EntryRecord::Pair {
                first: parse_member(row, row_number, 2, party, met)?,
                second: parse_member(row, row_number, 2 + MEMBER_COLUMNS, party, met)?,
            },
        };
        entries.push(entry);
    }

    log::debug!("parsed {} {} entries from sheet", entries.len(), category);
    Ok(ParsedSheet { players, entries })
}

fn parse_member(
    row: &[String],
    row_number: usize,
    start: usize,
    party: bool,
    met: &str,
) -> Result<MemberRecord, SheetError> {
    let elected = cell(row, start)
        .parse::<Type>()
        .map_err(|source| SheetError::ElectedType {
            row: row_number,
            column: start + 1,
            source,
        })?;
    let auxiliary_cell = cell(row, start + 1).trim();
    let auxiliary = auxiliary_cell.parse::<Type>().ok();
    if auxiliary.is_none() && !auxiliary_cell.is_empty() {
        log::warn!("row {row_number}: ignoring unknown secondary type '{auxiliary_cell}'");
    }

    Ok(MemberRecord {
        name: cell(row, start + 2).trim().to_string(),
        nickname: cell(row, start + 3).trim().to_string(),
        elected,
        auxiliary,
        lost: flag(row, start + 4),
        dead: flag(row, start + 5),
        party,
        met: met.to_string(),
    })
}

fn bool_cell(value: bool) -> String {
    let label = if value { TRUE_CELL } else { FALSE_CELL };
    label.to_string()
}

fn member_cells(member: &MemberRecord) -> [String; MEMBER_COLUMNS] {
    [
        member.elected.to_string(),
        member.auxiliary.map(|ty| ty.to_string()).unwrap_or_default(),
        member.name.clone(),
        member.nickname.clone(),
        bool_cell(member.lost),
        bool_cell(member.dead),
    ]
}

/// Writes a box back out in the tracker layout, header rows included.
pub fn export_rows(record: &BoxRecord) -> Vec<Vec<String>> {
    let width = columns_for(record.category);
    let player = |index: usize| record.players.get(index).cloned().unwrap_or_default();

    let mut title = vec![String::new(); width];
    let mut totals = vec![String::new(); width];
    let mut labels = vec!["Party".to_string(), "Met".to_string()];
    match record.category {
        Category::Standard => {
            title[3] = player(0);
        }
        Category::Soullink => {
            title[2] = player(0);
            title[8] = player(1);
        }
    }
    for member_index in 0..(width - 2) / MEMBER_COLUMNS {
        let start = 2 + member_index * MEMBER_COLUMNS;
        totals[start + 4] = "losts".to_string();
        totals[start + 5] = "deaths".to_string();
        labels.extend(
            ["Type 1", "Type 2", "Name", "Nickname", "Lost", "Dead"]
                .iter()
                .map(|label| label.to_string()),
        );
    }

    let mut rows = vec![title, totals, labels];
    for entry in &record.entries {
        let members = entry.members();
        let party = members.iter().any(|member| member.party);
        let mut row = vec![bool_cell(party), members[0].met.clone()];
        for member in members {
            row.extend(member_cells(member));
        }
        rows.push(row);
    }
    rows
}
