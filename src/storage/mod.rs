//!
//! hierchat storage module
//! -----------------------
//! Read-only access to the hierarchy sales dataset: a single Parquet file with
//! one row per (date, store, product) observation. Relevant columns:
//! - `date`: Date or Datetime of the observation.
//! - `hierarchy1_id` .. `hierarchy5_id`: nested product groupings.
//! - `revenue`, `sales`, `stock`: numeric metrics.
//!
//! The loader filters to an inclusive date window, groups by one hierarchy level
//! and sums one metric, returning the largest totals first. Whether any rows exist
//! for the window is the caller's concern; an empty result is not an error.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::interpreter::{HierarchyLevel, MetricKind};

pub const DATE_COLUMN: &str = "date";

// 1970-01-01 counted from 0001-01-01
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Aggregated metric for one member of a hierarchy level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyTotal {
    pub label: String,
    pub value: f64,
}

/// Metric total for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub value: f64,
}

/// Name and logical type of a column in the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
}

/// Anything that can aggregate a metric per hierarchy member over a date window.
pub trait HierarchySource: Send + Sync {
    fn load(&self, level: HierarchyLevel, metric: MetricKind, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<HierarchyTotal>>;
}

/// Handle on the Parquet file backing all queries.
#[derive(Clone, Debug)]
pub struct HierarchyStore {
    path: PathBuf,
}

impl HierarchyStore {
    /// Open the dataset, failing early if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(AppError::not_found(
                "source_missing",
                format!("Expected parquet file at {}, but it was not found.", path.display()),
            ));
        }
        Ok(Self { path })
    }

    fn read_df(&self) -> AppResult<DataFrame> {
        let f = File::open(&self.path)?;
        Ok(ParquetReader::new(f).finish()?)
    }

    /// Column names and types of the source file.
    pub fn describe(&self) -> AppResult<Vec<ColumnInfo>> {
        let df = self.read_df()?;
        let mut out = Vec::new();
        for name in df.get_column_names() {
            let dt = df.column(name.as_str())?.dtype().clone();
            out.push(ColumnInfo { name: name.to_string(), dtype: dt.to_string() });
        }
        Ok(out)
    }

    /// Sum `metric` per member of `level` for rows dated within `[start, end]`,
    /// sorted by total descending. Output columns: `hierarchy{n}_id`, `total_{metric}`.
    pub fn load_frame(&self, level: HierarchyLevel, metric: MetricKind, start: NaiveDate, end: NaiveDate) -> AppResult<DataFrame> {
        let level_col = level.column_name();
        let metric_col = metric.as_str();
        let total_col = total_column(metric);
        let df = self.read_df()?;
        self.require_columns(&df, &[DATE_COLUMN, level_col.as_str(), metric_col])?;
        let day = col(DATE_COLUMN).cast(DataType::Date).cast(DataType::Int32);
        let out = df
            .lazy()
            .filter(day.clone().gt_eq(lit(epoch_days(start))).and(day.lt_eq(lit(epoch_days(end)))))
            .group_by([col(level_col.as_str())])
            .agg([col(metric_col).cast(DataType::Float64).sum().alias(total_col.as_str())])
            .sort(
                [total_col.as_str()],
                SortMultipleOptions::default().with_order_descending(true).with_maintain_order(true),
            )
            .collect()?;
        debug!(target: "hierchat::storage", level = %level, metric = %metric, %start, %end, rows = out.height(), "hierarchy totals loaded");
        Ok(out)
    }

    /// Sum `metric` per calendar day over the whole file, oldest day first.
    pub fn daily_totals(&self, metric: MetricKind) -> AppResult<Vec<DailyTotal>> {
        let metric_col = metric.as_str();
        let total_col = total_column(metric);
        let df = self.read_df()?;
        self.require_columns(&df, &[DATE_COLUMN, metric_col])?;
        let out = df
            .lazy()
            .group_by([col(DATE_COLUMN).cast(DataType::Date).cast(DataType::Int32).alias("day")])
            .agg([col(metric_col).cast(DataType::Float64).sum().alias(total_col.as_str())])
            .sort(["day"], SortMultipleOptions::default())
            .collect()?;
        debug!(target: "hierchat::storage", metric = %metric, days = out.height(), "daily totals loaded");

        let days = out.column("day")?.i32()?;
        let values = out.column(total_col.as_str())?.f64()?;
        let mut points = Vec::with_capacity(out.height());
        for (d, v) in days.into_iter().zip(values.into_iter()) {
            // rows without a date cannot be placed on the axis
            let Some(day) = d.and_then(date_from_epoch_days) else { continue };
            points.push(DailyTotal { day, value: v.unwrap_or(0.0) });
        }
        Ok(points)
    }

    fn require_columns(&self, df: &DataFrame, required: &[&str]) -> AppResult<()> {
        for name in required {
            if !df.get_column_names().iter().any(|c| c.as_str() == *name) {
                return Err(AppError::data(
                    "missing_column",
                    format!("column '{}' not found in {}", name, self.path.display()),
                ));
            }
        }
        Ok(())
    }
}

impl HierarchySource for HierarchyStore {
    fn load(&self, level: HierarchyLevel, metric: MetricKind, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<HierarchyTotal>> {
        let df = self.load_frame(level, metric, start, end)?;
        totals_from_frame(&df, &level.column_name(), &total_column(metric))
    }
}

/// Name of the aggregated column produced by [`HierarchyStore::load_frame`].
pub fn total_column(metric: MetricKind) -> String { format!("total_{}", metric.as_str()) }

/// Days since 1970-01-01, the physical representation of a polars Date.
pub fn epoch_days(d: NaiveDate) -> i32 { d.num_days_from_ce() - EPOCH_DAYS_FROM_CE }

pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

/// Convert an aggregated frame into labelled totals. Null labels become "(none)",
/// null totals become 0.
pub fn totals_from_frame(df: &DataFrame, label_col: &str, value_col: &str) -> AppResult<Vec<HierarchyTotal>> {
    let labels = df.column(label_col)?.cast(&DataType::String)?;
    let values = df.column(value_col)?.cast(&DataType::Float64)?;
    let out = labels
        .str()?
        .into_iter()
        .zip(values.f64()?.into_iter())
        .map(|(l, v)| HierarchyTotal {
            label: l.unwrap_or("(none)").to_string(),
            value: v.unwrap_or(0.0),
        })
        .collect();
    Ok(out)
}
