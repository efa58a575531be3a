use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::data::boxes::Category;
use crate::data::sheet::{cell, columns_for, data_rows, flag, read_rows, SheetError, HEADER_ROWS};
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_sheet_file(
    path: impl AsRef<Path>,
    category: Category,
) -> Result<ValidationReport, SheetError> {
    let rows = read_rows(path)?;
    Ok(validate_sheet(&rows, category))
}

/// Collects every problem in a tracker sheet instead of stopping at the first.
pub fn validate_sheet(rows: &[Vec<String>], category: Category) -> ValidationReport {
    let mut report = ValidationReport::default();
    if rows.len() < HEADER_ROWS {
        report.push(
            ValidationSeverity::Error,
            "header",
            format!("expected {HEADER_ROWS} header rows, found {}", rows.len()),
        );
        return report;
    }

    let expected = columns_for(category);
    let member_starts: &[usize] = match category {
        Category::Standard => &[2],
        Category::Soullink => &[2, 8],
    };
    let mut seen_names = HashSet::new();
    let mut entries = 0;
    let mut active = 0;

    for (row_number, row) in data_rows(rows) {
        let context = format!("row {row_number}");
        entries += 1;
        if row.len() < expected {
            report.push(
                ValidationSeverity::Error,
                context,
                format!("expected {expected} columns, found {}", row.len()),
            );
            continue;
        }

        let mut names = Vec::new();
        let mut inactive = false;
        for start in member_starts {
            validate_member(&mut report, row, row_number, *start);
            names.push(cell(row, start + 2).trim().to_string());
            inactive |= flag(row, start + 4) || flag(row, start + 5);
        }

        let entry_name = names.join(" & ");
        if !names.iter().any(String::is_empty) && !seen_names.insert(entry_name.clone()) {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!("duplicate entry '{entry_name}'"),
            );
        }
        if inactive {
            report.push(
                ValidationSeverity::Info,
                context,
                format!("'{entry_name}' is lost or dead and will not be considered for teams"),
            );
        } else {
            active += 1;
        }
    }

    report.push(
        ValidationSeverity::Info,
        "summary",
        format!("{entries} entries, {active} active"),
    );
    report
}

fn validate_member(report: &mut ValidationReport, row: &[String], row_number: usize, start: usize) {
    let context = format!("row {row_number}, column {}", start + 1);

    let elected = cell(row, start).trim();
    if elected.parse::<Type>().is_err() {
        report.push(
            ValidationSeverity::Error,
            context.clone(),
            format!("unknown elected type '{elected}'"),
        );
    }

    let auxiliary = cell(row, start + 1).trim();
    if !auxiliary.is_empty() && auxiliary.parse::<Type>().is_err() {
        report.push(
            ValidationSeverity::Warning,
            format!("row {row_number}, column {}", start + 2),
            format!("unknown secondary type '{auxiliary}' will be ignored"),
        );
    }

    if cell(row, start + 2).trim().is_empty() {
        report.push(
            ValidationSeverity::Error,
            format!("row {row_number}, column {}", start + 3),
            "missing non-empty name",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    fn header() -> Vec<Vec<String>> {
        vec![row(&[""; 8]), row(&[""; 8]), row(&[""; 8])]
    }

    #[test]
    fn clean_sheet_has_only_info() {
        let mut rows = header();
        rows.push(row(&["FALSE", "Lake", "Water", "", "Wooper", "", "FALSE", "FALSE"]));
        rows.push(row(&["FALSE", "Cave", "Rock", "Ground", "Onix", "", "TRUE", "FALSE"]));
        let report = validate_sheet(&rows, Category::Standard);

        assert!(!report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Warning), 0);
        let summary = report.diagnostics.last().expect("summary diagnostic");
        assert_eq!(summary.message, "2 entries, 1 active");
    }

    #[test]
    fn collects_every_problem() {
        let mut rows = header();
        rows.push(row(&["FALSE", "Lake", "Plasma", "", "Wooper", "", "FALSE", "FALSE"]));
        rows.push(row(&["FALSE", "Lake", "Water", "Shiny", "", "", "FALSE", "FALSE"]));
        rows.push(row(&["FALSE", "Cave", "Rock", "", "Onix", "", "FALSE", "FALSE"]));
        rows.push(row(&["FALSE", "Cave", "Rock", "", "Onix", "", "FALSE", "FALSE"]));
        rows.push(row(&["FALSE", "Cave", "Rock"]));
        let report = validate_sheet(&rows, Category::Standard);

        assert!(report.has_errors());
        assert_eq!(report.count(ValidationSeverity::Error), 4);
        assert_eq!(report.count(ValidationSeverity::Warning), 1);
        assert!(report
            .diagnostics
            .iter()
            .any(|diag| diag.message == "duplicate entry 'Onix'" && diag.context == "row 7"));
    }

    #[test]
    fn missing_header_is_an_error() {
        let report = validate_sheet(&[row(&["x"])], Category::Soullink);
        assert!(report.has_errors());
    }
}
