use std::{
    collections::BTreeMap,
    fmt::Display,
    ops::{Add, AddAssign},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ReportError;

/// Result of running one test against one implementation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Outcome {
    Passed,
    Failed { reason: String },
    Skipped { reason: String },
}

impl Outcome {
    pub fn failed(reason: impl Display) -> Self {
        Outcome::Failed {
            reason: reason.to_string(),
        }
    }

    pub fn skipped(reason: impl Display) -> Self {
        Outcome::Skipped {
            reason: reason.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Passed => None,
            Outcome::Failed { reason } | Outcome::Skipped { reason } => Some(reason),
        }
    }
}

/// Outcome counters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    fn count(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed { .. } => self.failed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
        }
    }
}

impl Add for Summary {
    type Output = Summary;

    fn add(self, other: Summary) -> Summary {
        Summary {
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
        }
    }
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Summary) {
        *self = *self + other;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Row {
    pub name: String,
    pub cells: BTreeMap<String, Outcome>,
}

/// Outcomes laid out as rows x columns.
///
/// Rows keep insertion order; a cell that was never recorded is "not run"
/// and is not counted in summaries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Matrix {
    pub title: String,
    pub row_label: String,
    pub column_label: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Matrix {
    pub fn new(
        title: impl Into<String>,
        row_label: impl Into<String>,
        column_label: impl Into<String>,
        columns: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            row_label: row_label.into(),
            column_label: column_label.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends an empty row unless it already exists.
    pub fn add_row(&mut self, name: &str) {
        if !self.rows.iter().any(|r| r.name == name) {
            self.rows.push(Row {
                name: name.to_string(),
                cells: BTreeMap::new(),
            });
        }
    }

    /// Records the outcome of `row` against `column`, replacing any previous one.
    pub fn record(&mut self, row: &str, column: &str, outcome: Outcome) -> Result<(), ReportError> {
        if !self.columns.iter().any(|c| c == column) {
            return Err(ReportError::UnknownColumn {
                matrix: self.title.clone(),
                column: column.to_string(),
            });
        }

        self.add_row(row);
        if let Some(r) = self.rows.iter_mut().find(|r| r.name == row) {
            r.cells.insert(column.to_string(), outcome);
        }
        Ok(())
    }

    pub fn outcome(&self, row: &str, column: &str) -> Option<&Outcome> {
        self.rows
            .iter()
            .find(|r| r.name == row)
            .and_then(|r| r.cells.get(column))
    }

    pub fn column_summary(&self, column: &str) -> Summary {
        let mut summary = Summary::default();
        for outcome in self.rows.iter().filter_map(|r| r.cells.get(column)) {
            summary.count(outcome);
        }
        summary
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for outcome in self.rows.iter().flat_map(|r| r.cells.values()) {
            summary.count(outcome);
        }
        summary
    }

    /// Failed cells as (row, column, reason), in row then column order.
    pub fn failures(&self) -> Vec<(&str, &str, &str)> {
        self.rows
            .iter()
            .flat_map(|r| {
                self.columns.iter().filter_map(move |c| match r.cells.get(c) {
                    Some(Outcome::Failed { reason }) => Some((r.name.as_str(), c.as_str(), reason.as_str())),
                    _ => None,
                })
            })
            .collect()
    }
}

/// All matrices produced by one run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub tag: String,
    pub matrices: Vec<Matrix>,
}

impl Report {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            tag: tag.into(),
            matrices: Vec::new(),
        }
    }

    pub fn push(&mut self, matrix: Matrix) {
        self.matrices.push(matrix);
    }

    pub fn summary(&self) -> Summary {
        self.matrices
            .iter()
            .fold(Summary::default(), |acc, m| acc + m.summary())
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
