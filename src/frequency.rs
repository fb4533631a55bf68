//! Verb frequency tables
//!
//! Loads per-frame verb counts from workbook sheets and joins the causative
//! and intransitive tables into one merged table.
//!
//! A sheet's first row is its header. It must contain a `verb` cell and a
//! `count` cell; other columns are ignored.

use crate::allow_list::VerbAllowList;
use crate::error::FrequencyError;
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const VERB_COLUMN: &str = "verb";
pub const COUNT_COLUMN: &str = "count";

/// Count of one verb in one syntactic frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyRecord {
    pub verb: String,
    pub count: u64,
}

/// All verb counts for one frame, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    records: Vec<FrequencyRecord>,
    index: FxHashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` to `verb`, creating the record if needed
    ///
    /// Returns true if the verb was already present.
    pub fn add(&mut self, verb: &str, count: u64) -> bool {
        match self.index.get(verb) {
            Some(&i) => {
                self.records[i].count += count;
                true
            }
            None => {
                self.index.insert(verb.to_string(), self.records.len());
                self.records.push(FrequencyRecord {
                    verb: verb.to_string(),
                    count,
                });
                false
            }
        }
    }

    pub fn get(&self, verb: &str) -> Option<u64> {
        self.index.get(verb).map(|&i| self.records[i].count)
    }

    pub fn records(&self) -> &[FrequencyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.records.iter().map(|r| r.count).sum()
    }

    /// Build a table from sheet rows, the first of which is the header
    pub fn from_rows<'a, I>(sheet: &str, rows: I) -> Result<Self, FrequencyError>
    where
        I: IntoIterator<Item = &'a [Data]>,
    {
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or_else(|| FrequencyError::EmptySheet {
            sheet: sheet.to_string(),
        })?;

        let verb_col = find_column(header, VERB_COLUMN).ok_or_else(|| {
            FrequencyError::MissingColumn {
                sheet: sheet.to_string(),
                column: VERB_COLUMN,
            }
        })?;
        let count_col = find_column(header, COUNT_COLUMN).ok_or_else(|| {
            FrequencyError::MissingColumn {
                sheet: sheet.to_string(),
                column: COUNT_COLUMN,
            }
        })?;

        let mut table = Self::new();
        let mut duplicates = 0;

        // Spreadsheet row numbers are 1-based and the header is row 1
        for (row_num, row) in rows.enumerate().map(|(i, r)| (i + 2, r)) {
            let Some(verb) = row.get(verb_col).and_then(verb_cell) else {
                continue;
            };
            let count = match row.get(count_col) {
                None => 0,
                Some(cell) => count_cell(cell).ok_or_else(|| FrequencyError::InvalidCount {
                    sheet: sheet.to_string(),
                    row: row_num,
                    value: cell.to_string(),
                })?,
            };

            if table.add(&verb, count) {
                duplicates += 1;
                log::debug!("Sheet '{}': duplicate verb '{}' at row {}", sheet, verb, row_num);
            }
        }

        if duplicates > 0 {
            log::warn!(
                "Sheet '{}': summed counts of {} duplicate verb rows",
                sheet,
                duplicates
            );
        }

        Ok(table)
    }

    pub fn from_range(sheet: &str, range: &Range<Data>) -> Result<Self, FrequencyError> {
        Self::from_rows(sheet, range.rows())
    }
}

fn find_column(header: &[Data], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|cell| matches!(cell, Data::String(s) if s.trim() == name))
}

/// Text of a verb cell; empty cells yield None
fn verb_cell(cell: &Data) -> Option<String> {
    let verb = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    if verb.is_empty() { None } else { Some(verb) }
}

/// Non-negative integral count; empty cells count as zero
fn count_cell(cell: &Data) -> Option<u64> {
    match cell {
        Data::Empty => Some(0),
        Data::Int(i) => u64::try_from(*i).ok(),
        Data::Float(f) if f.is_finite() && *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0)
            } else {
                s.parse().ok()
            }
        }
        _ => None,
    }
}

fn open_workbook(path: &Path) -> Result<Sheets<BufReader<File>>, FrequencyError> {
    open_workbook_auto(path).map_err(|source| FrequencyError::Workbook {
        path: path.to_path_buf(),
        source,
    })
}

fn read_sheet(
    workbook: &mut Sheets<BufReader<File>>,
    path: &Path,
    sheet: &str,
) -> Result<FrequencyTable, FrequencyError> {
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| FrequencyError::Sheet {
            sheet: sheet.to_string(),
            source,
        })?;

    let table = FrequencyTable::from_range(sheet, &range)?;
    log::info!(
        "Loaded {} verbs ({} tokens) from sheet '{}' of {}",
        table.len(),
        table.total(),
        sheet,
        path.display()
    );
    Ok(table)
}

/// Load one frame's table from a named sheet of a workbook
pub fn load_sheet(path: &Path, sheet: &str) -> Result<FrequencyTable, FrequencyError> {
    let mut workbook = open_workbook(path)?;
    read_sheet(&mut workbook, path, sheet)
}

/// Load the causative and intransitive tables from one workbook
pub fn load_frames(
    path: &Path,
    causative_sheet: &str,
    intransitive_sheet: &str,
) -> Result<(FrequencyTable, FrequencyTable), FrequencyError> {
    let mut workbook = open_workbook(path)?;
    let causative = read_sheet(&mut workbook, path, causative_sheet)?;
    let intransitive = read_sheet(&mut workbook, path, intransitive_sheet)?;
    Ok((causative, intransitive))
}

/// Counts of one verb in both frames
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub verb: String,
    pub count_trans: u64,
    pub count_intrans: u64,
}

impl MergedRecord {
    pub fn new(verb: &str, count_trans: u64, count_intrans: u64) -> Self {
        Self {
            verb: verb.to_string(),
            count_trans,
            count_intrans,
        }
    }

    /// True when the verb occurs in neither frame
    pub fn is_unattested(&self) -> bool {
        self.count_trans == 0 && self.count_intrans == 0
    }
}

/// Outer join of the two frame tables, ordered by verb
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedTable {
    rows: Vec<MergedRecord>,
}

impl MergedTable {
    /// Outer join on verb; a verb missing from one table gets 0 there
    pub fn merge(trans: &FrequencyTable, intrans: &FrequencyTable) -> Self {
        let mut joined: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for r in trans.records() {
            joined.entry(r.verb.as_str()).or_default().0 += r.count;
        }
        for r in intrans.records() {
            joined.entry(r.verb.as_str()).or_default().1 += r.count;
        }

        let rows = joined
            .into_iter()
            .map(|(verb, (t, i))| MergedRecord::new(verb, t, i))
            .collect();
        Self { rows }
    }

    /// Rows are reordered by verb
    pub fn from_rows(mut rows: Vec<MergedRecord>) -> Self {
        rows.sort_by(|a, b| a.verb.cmp(&b.verb));
        Self { rows }
    }

    /// Keep only allow-listed verbs
    pub fn filter(&self, allow_list: &VerbAllowList) -> Self {
        let rows: Vec<MergedRecord> = self
            .rows
            .iter()
            .filter(|r| allow_list.contains(&r.verb))
            .cloned()
            .collect();

        let mut missing: Vec<&str> = allow_list
            .iter()
            .filter(|v| self.get(v).is_none())
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            log::warn!(
                "{} of {} allow-listed verbs occur in neither sheet",
                missing.len(),
                allow_list.len()
            );
            log::debug!("Missing verbs: {}", missing.join(", "));
        }

        Self { rows }
    }

    pub fn get(&self, verb: &str) -> Option<&MergedRecord> {
        self.rows
            .binary_search_by(|r| r.verb.as_str().cmp(verb))
            .ok()
            .map(|i| &self.rows[i])
    }

    pub fn rows(&self) -> &[MergedRecord] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MergedRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sums of the causative and intransitive columns
    pub fn column_sums(&self) -> (u64, u64) {
        self.rows.iter().fold((0, 0), |(t, i), r| {
            (t + r.count_trans, i + r.count_intrans)
        })
    }
}

impl<'a> IntoIterator for &'a MergedTable {
    type Item = &'a MergedRecord;
    type IntoIter = std::slice::Iter<'a, MergedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
