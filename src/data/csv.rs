//! CSV readers for passenger files.
//!
//! Two row layouts feed the same `RawPassenger` → `PassengerRecord` path:
//!
//! - **Named** (`parse_labeled_csv`): first line is a header; columns are
//!   located by name, double-quoted fields with embedded commas are honoured,
//!   blank lines are skipped.
//! - **Positional** (`split_positional`): a bare comma split with no quote
//!   handling. The quoted `"Last, First"` name becomes two cells, which is
//!   what the fixed positions in `PositionalSchema` assume.

use std::collections::HashMap;
use std::path::Path;

use crate::data::batch::LabeledSample;
use crate::data::features::encode;
use crate::data::passenger::{columns, RawPassenger};
use crate::error::{Result, TitanicError};

// ---------------------------------------------------------------------------
// Named-column files
// ---------------------------------------------------------------------------

/// Reads and encodes a headed passenger file. With `label_column` set every
/// row must carry a class index in that column.
pub fn load_labeled_csv(path: &Path, label_column: Option<&str>) -> Result<Vec<LabeledSample>> {
    let text = std::fs::read_to_string(path).map_err(|e| TitanicError::io(path, e))?;
    parse_labeled_csv(&text, path, label_column)
}

/// Parses already-loaded text; `path` is only used in error messages.
/// Row numbers in errors are 1-based file line numbers.
pub fn parse_labeled_csv(
    text: &str,
    path: &Path,
    label_column: Option<&str>,
) -> Result<Vec<LabeledSample>> {
    let mut lines = text.lines().enumerate();

    let header = lines.next()
        .map(|(_, line)| parse_csv_row(line))
        .ok_or_else(|| TitanicError::EmptyDataset { path: path.to_path_buf() })?;
    let index: HashMap<&str, usize> = header.iter()
        .enumerate()
        .map(|(i, name)| (name.trim(), i))
        .collect();
    let locate = |column: &str| {
        index.get(column).copied().ok_or_else(|| TitanicError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
    };

    let class = locate(columns::CLASS)?;
    let sex = locate(columns::SEX)?;
    let age = locate(columns::AGE)?;
    let siblings_spouses = locate(columns::SIBLINGS_SPOUSES)?;
    let parents_children = locate(columns::PARENTS_CHILDREN)?;
    let fare = locate(columns::FARE)?;
    let embarked = locate(columns::EMBARKED)?;
    let label_index = label_column.map(|c| locate(c).map(|i| (c, i))).transpose()?;

    let mut samples = Vec::new();

    for (line_idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = line_idx + 1;
        let cells = parse_csv_row(line);
        // Short rows read as blanks so the field parser reports the column.
        let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");

        let record = RawPassenger {
            class: cell(class),
            sex: cell(sex),
            age: cell(age),
            siblings_spouses: cell(siblings_spouses),
            parents_children: cell(parents_children),
            fare: cell(fare),
            embarked: cell(embarked),
        }
        .parse(path, row)?;

        let label = match label_index {
            Some((name, i)) => Some(parse_label(cell(i), name, path, row)?),
            None => None,
        };

        samples.push(LabeledSample { features: encode(&record), label });
    }

    if samples.is_empty() {
        return Err(TitanicError::EmptyDataset { path: path.to_path_buf() });
    }

    Ok(samples)
}

/// Class labels are non-negative integers and are not rescaled.
fn parse_label(cell: &str, column: &str, path: &Path, row: usize) -> Result<usize> {
    cell.trim().parse::<usize>().map_err(|_| TitanicError::InvalidField {
        path: path.to_path_buf(),
        row,
        column: column.to_string(),
        value: cell.to_string(),
    })
}

/// Parses a single CSV row, handling double-quoted fields.
pub fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Escaped quote inside quoted field.
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

// ---------------------------------------------------------------------------
// Positional files
// ---------------------------------------------------------------------------

/// Cell positions of the hand-split inference file (after the naive split).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionalSchema {
    pub id: usize,
    pub class: usize,
    pub sex: usize,
    pub age: usize,
    pub siblings_spouses: usize,
    pub parents_children: usize,
    pub fare: usize,
    pub embarked: usize,
}

impl PositionalSchema {
    /// Kaggle test layout with the name split in two:
    /// `Id,Pclass,"Last, First",Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked`.
    pub const TITANIC: PositionalSchema = PositionalSchema {
        id: 0,
        class: 1,
        sex: 4,
        age: 5,
        siblings_spouses: 6,
        parents_children: 7,
        fare: 9,
        embarked: 11,
    };

    /// Minimum number of cells a row must split into.
    pub fn width(&self) -> usize {
        let positions = [
            self.id, self.class, self.sex, self.age,
            self.siblings_spouses, self.parents_children, self.fare, self.embarked,
        ];
        positions.into_iter().max().unwrap_or(0) + 1
    }

    /// Picks the passenger cells out of a split row. The caller checks the
    /// width first.
    pub fn raw<'a>(&self, cells: &[&'a str]) -> RawPassenger<'a> {
        RawPassenger {
            class: cells[self.class],
            sex: cells[self.sex],
            age: cells[self.age],
            siblings_spouses: cells[self.siblings_spouses],
            parents_children: cells[self.parents_children],
            fare: cells[self.fare],
            embarked: cells[self.embarked],
        }
    }
}

/// Bare comma split; quotes are ordinary characters. A trailing `\r` is dropped.
pub fn split_positional(line: &str) -> Vec<&str> {
    line.trim_end_matches('\r').split(',').collect()
}
