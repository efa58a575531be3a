//! Report rows for legal teams: summed score followed by member names.

use std::io::Write;

use serde::Serialize;

use crate::optimizer::team_generator::Team;
use crate::optimizer::TeamSearch;

/// Score column plus twelve name columns (six soul-linked pairs).
pub const DEFAULT_REPORT_COLUMNS: usize = 13;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    pub score: f64,
    pub names: Vec<String>,
}

impl TeamRow {
    pub fn from_team(team: &Team<'_>) -> Self {
        Self {
            score: team.score(),
            names: team
                .display_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Score first, then one cell per member name.
    pub fn cells(&self) -> Vec<String> {
        std::iter::once(self.score.to_string())
            .chain(self.names.iter().cloned())
            .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to flush report: {0}")]
    Io(#[from] std::io::Error),
}

/// One row per team, in search order.
pub fn report_rows<'a>(search: &TeamSearch<'a>) -> impl Iterator<Item = TeamRow> + 'a {
    search.teams().map(|team| TeamRow::from_team(&team))
}

/// Highest score first; equal scores keep search order.
pub fn rank_rows(mut rows: Vec<TeamRow>) -> Vec<TeamRow> {
    rows.sort_by(|left, right| right.score.total_cmp(&left.score));
    rows
}

/// Pads with empty cells, or truncates, to exactly `width` cells.
pub fn pad_row(mut cells: Vec<String>, width: usize) -> Vec<String> {
    cells.resize(width, String::new());
    cells
}

pub fn write_csv<W: Write>(rows: &[TeamRow], width: usize, writer: W) -> Result<(), ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(writer);
    for row in rows {
        writer.write_record(pad_row(row.cells(), width))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(rows: &[TeamRow], mut writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    Ok(())
}
