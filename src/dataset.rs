use crate::error::{DatasetError, MatchError};
use crate::features::{
    AGGREGATE_COLUMNS, FeatureRow, WINNER_COLUMN, champion_column, extract_value,
};
use crate::riot_api::MatchSource;
use csv::Writer;
use log::{info, warn};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFailure {
    pub match_id: String,
    pub reason: String,
}

/// Result of turning one match id into a row.
#[derive(Debug)]
pub enum MatchOutcome {
    Row(FeatureRow),
    Skipped(MatchFailure),
}

#[derive(Debug)]
pub struct DatasetReport {
    pub destination: PathBuf,
    pub columns: Vec<String>,
    pub rows_written: usize,
    pub failures: Vec<MatchFailure>,
}

/// Rectangular, zero-filled view of a set of feature rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<i64>>,
}

impl FeatureTable {
    /// Unions the columns of all rows: champion indicators ordered by team
    /// then champion id, then the aggregates, then `winner`.
    pub fn from_rows(rows: &[FeatureRow]) -> Self {
        let champion_keys: BTreeSet<(u8, i64)> =
            rows.iter().flat_map(|row| row.champion_keys()).collect();
        let champion_index: BTreeMap<(u8, i64), usize> = champion_keys
            .iter()
            .enumerate()
            .map(|(idx, key)| (*key, idx))
            .collect();

        let mut columns: Vec<String> = champion_keys
            .iter()
            .map(|(team, champion)| champion_column(*team, *champion))
            .collect();
        columns.extend(AGGREGATE_COLUMNS.iter().map(|c| c.to_string()));
        columns.push(WINNER_COLUMN.to_string());

        let champion_count = champion_keys.len();
        let table_rows = rows
            .iter()
            .map(|row| {
                let mut values = vec![0i64; champion_count];
                for key in row.champion_keys() {
                    if let Some(idx) = champion_index.get(&key) {
                        values[*idx] = 1;
                    }
                }
                values.extend(row.aggregate_values());
                values.push(i64::from(row.winner));
                values
            })
            .collect();

        Self {
            columns,
            rows: table_rows,
        }
    }

    pub fn column(&self, name: &str) -> Option<Vec<i64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    pub fn write(&self, destination: &Path) -> Result<(), DatasetError> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let is_parquet = destination
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("parquet"))
            .unwrap_or(false);

        if is_parquet {
            self.write_parquet(destination)
        } else {
            self.write_csv(destination)
        }
    }

    fn write_csv(&self, destination: &Path) -> Result<(), DatasetError> {
        let mut writer = Writer::from_path(destination)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|value| value.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_parquet(&self, destination: &Path) -> Result<(), DatasetError> {
        let series: Vec<Series> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<i64> = self.rows.iter().map(|row| row[idx]).collect();
                Series::new(name.as_str(), values)
            })
            .collect();

        let mut df = DataFrame::new(series)?;
        let mut file = File::create(destination)?;
        ParquetWriter::new(&mut file).finish(&mut df)?;
        Ok(())
    }
}

/// Fetches and extracts one match.
pub fn process_match(source: &dyn MatchSource, match_id: &str) -> MatchOutcome {
    let result: Result<FeatureRow, MatchError> = source
        .match_record(match_id)
        .map_err(MatchError::from)
        .and_then(|value| Ok(extract_value(&value)?));

    match result {
        Ok(row) => MatchOutcome::Row(row),
        Err(err) => MatchOutcome::Skipped(MatchFailure {
            match_id: match_id.to_string(),
            reason: err.to_string(),
        }),
    }
}

/// Runs every match id through [`process_match`], in order.
///
/// Each skipped match is logged with its id and reason, and the same
/// [`MatchFailure`] is returned in the outcome list.
pub fn collect_outcomes(source: &dyn MatchSource, match_ids: &[String]) -> Vec<MatchOutcome> {
    let total = match_ids.len();

    match_ids
        .iter()
        .enumerate()
        .map(|(idx, match_id)| {
            info!("Processing match {}/{}: {}", idx + 1, total, match_id);
            let outcome = process_match(source, match_id);
            if let MatchOutcome::Skipped(failure) = &outcome {
                warn!(
                    "Skipping match {} due to error: {}",
                    failure.match_id, failure.reason
                );
            }
            outcome
        })
        .collect()
}

/// Builds the training table for `match_ids` and writes it to `destination`.
///
/// A match that fails to fetch or extract is logged and left out; only
/// failures to persist the table are returned as errors.
pub fn build_dataset(
    source: &dyn MatchSource,
    match_ids: &[String],
    destination: &Path,
) -> Result<DatasetReport, DatasetError> {
    let mut rows: Vec<FeatureRow> = Vec::new();
    let mut failures: Vec<MatchFailure> = Vec::new();

    for outcome in collect_outcomes(source, match_ids) {
        match outcome {
            MatchOutcome::Row(row) => rows.push(row),
            MatchOutcome::Skipped(failure) => failures.push(failure),
        }
    }

    let table = FeatureTable::from_rows(&rows);
    table.write(destination)?;

    info!(
        "Saved {} matches to {}",
        table.rows.len(),
        destination.display()
    );

    Ok(DatasetReport {
        destination: destination.to_path_buf(),
        columns: table.columns,
        rows_written: table.rows.len(),
        failures,
    })
}
