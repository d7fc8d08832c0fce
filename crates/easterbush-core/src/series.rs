//! Time-series primitives.
//!
//! All simulation inputs are regular half-hourly series in UTC (the meter
//! exports are stamped GMT). `Snapshots` is the simulation clock; `Series`
//! carries observed or derived values and knows how to resample and align
//! itself onto a clock.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The simulation clock: a regular, strictly increasing sequence of UTC
/// timestamps with a fixed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshots {
    index: Vec<DateTime<Utc>>,
    step: Duration,
}

impl Snapshots {
    /// Build a clock covering `[start, end]` inclusive at the given step.
    ///
    /// # Errors
    /// Returns an error if `end < start` or the step is not positive.
    pub fn range(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> Result<Self> {
        if step <= Duration::zero() {
            return Err(Error::InvalidData(format!(
                "snapshot step must be positive, got {step}"
            )));
        }
        if end < start {
            return Err(Error::InvalidData(format!(
                "snapshot range end {end} precedes start {start}"
            )));
        }

        let mut index = Vec::new();
        let mut t = start;
        while t <= end {
            index.push(t);
            t += step;
        }

        Ok(Self { index, step })
    }

    /// Half-hourly clock over `[start, end]`, the default campus resolution.
    pub fn half_hourly(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        Self::range(start, end, Duration::minutes(30))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Step length in hours, for converting kW capacities to kWh caps.
    #[must_use]
    pub fn step_hours(&self) -> f64 {
        self.step.num_seconds() as f64 / 3600.0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    #[must_use]
    pub fn first(&self) -> Option<DateTime<Utc>> {
        self.index.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.index.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.index.iter().copied()
    }
}

/// A sequence of timestamped `f64` values, strictly increasing in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    index: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl Series {
    /// Build a series from parallel index/value vectors.
    ///
    /// Entries are sorted by timestamp; duplicate timestamps are rejected.
    ///
    /// # Errors
    /// Returns an error on length mismatch or duplicate timestamps.
    pub fn new(index: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if index.len() != values.len() {
            return Err(Error::InvalidData(format!(
                "series index has {} entries but {} values",
                index.len(),
                values.len()
            )));
        }

        let mut pairs: Vec<(DateTime<Utc>, f64)> = index.into_iter().zip(values).collect();
        pairs.sort_by_key(|(t, _)| *t);

        for window in pairs.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(Error::InvalidData(format!(
                    "duplicate timestamp {} in series",
                    window[0].0
                )));
            }
        }

        let (index, values) = pairs.into_iter().unzip();
        Ok(Self { index, values })
    }

    /// A constant-valued series over the given clock.
    #[must_use]
    pub fn constant(snapshots: &Snapshots, value: f64) -> Self {
        Self {
            index: snapshots.as_slice().to_vec(),
            values: vec![value; snapshots.len()],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at position `i`.
    #[must_use]
    pub fn value(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Arithmetic mean.
    ///
    /// # Errors
    /// Returns an error for an empty series.
    pub fn mean(&self) -> Result<f64> {
        if self.values.is_empty() {
            return Err(Error::InvalidData("mean of empty series".into()));
        }
        Ok(self.sum() / self.values.len() as f64)
    }

    /// Largest value.
    ///
    /// # Errors
    /// Returns an error for an empty series.
    pub fn max(&self) -> Result<f64> {
        self.values
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
            .ok_or_else(|| Error::InvalidData("max of empty series".into()))
    }

    /// Smallest value.
    ///
    /// # Errors
    /// Returns an error for an empty series.
    pub fn min(&self) -> Result<f64> {
        self.values
            .iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.min(v)))
            })
            .ok_or_else(|| Error::InvalidData("min of empty series".into()))
    }

    /// Multiply every value by `factor`.
    #[must_use]
    pub fn scale(mut self, factor: f64) -> Self {
        for v in &mut self.values {
            *v *= factor;
        }
        self
    }

    /// Shift every timestamp by `offset` (negative shifts move the series
    /// earlier; the tariff loader uses -52 weeks to line the price year up
    /// with the metered year).
    #[must_use]
    pub fn shift(mut self, offset: Duration) -> Self {
        for t in &mut self.index {
            *t += offset;
        }
        self
    }

    /// Resample onto `step`-sized buckets, summing values per bucket.
    ///
    /// Buckets are aligned to the Unix epoch. Used for demand data, where
    /// values are energy and coarser steps accumulate.
    ///
    /// # Errors
    /// Returns an error if the step is not positive.
    pub fn resample_sum(&self, step: Duration) -> Result<Self> {
        self.resample(step, |bucket| bucket.iter().sum())
    }

    /// Resample onto `step`-sized buckets, averaging values per bucket.
    ///
    /// Used for price data, where values are rates.
    ///
    /// # Errors
    /// Returns an error if the step is not positive.
    pub fn resample_mean(&self, step: Duration) -> Result<Self> {
        self.resample(step, |bucket| {
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
    }

    fn resample(&self, step: Duration, combine: impl Fn(&[f64]) -> f64) -> Result<Self> {
        let step_secs = step.num_seconds();
        if step_secs <= 0 {
            return Err(Error::InvalidData(format!(
                "resample step must be positive, got {step}"
            )));
        }

        let mut buckets: Vec<(i64, Vec<f64>)> = Vec::new();
        for (t, v) in self.iter() {
            let floored = t.timestamp().div_euclid(step_secs) * step_secs;
            match buckets.last_mut() {
                Some((key, bucket)) if *key == floored => bucket.push(v),
                _ => buckets.push((floored, vec![v])),
            }
        }

        let mut index = Vec::with_capacity(buckets.len());
        let mut values = Vec::with_capacity(buckets.len());
        for (key, bucket) in buckets {
            let t = DateTime::from_timestamp(key, 0).ok_or_else(|| {
                Error::InvalidData(format!("timestamp {key} out of range during resample"))
            })?;
            index.push(t);
            values.push(combine(&bucket));
        }

        Ok(Self { index, values })
    }

    /// Reindex exactly onto the given clock.
    ///
    /// # Errors
    /// Returns [`Error::MissingData`] for any snapshot the series does not
    /// cover; alignment never interpolates.
    pub fn align_to(&self, name: &str, snapshots: &Snapshots) -> Result<Self> {
        let by_ts: HashMap<i64, f64> = self
            .iter()
            .map(|(t, v)| (t.timestamp(), v))
            .collect();

        let mut values = Vec::with_capacity(snapshots.len());
        for t in snapshots.iter() {
            let v = by_ts.get(&t.timestamp()).ok_or_else(|| Error::MissingData {
                series: name.to_string(),
                timestamp: t,
            })?;
            values.push(*v);
        }

        Ok(Self {
            index: snapshots.as_slice().to_vec(),
            values,
        })
    }

    /// Whether this series is indexed exactly on the given clock.
    #[must_use]
    pub fn is_aligned_to(&self, snapshots: &Snapshots) -> bool {
        self.index == snapshots.as_slice()
    }
}
