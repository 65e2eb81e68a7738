//! Frequency tables: the data side of a histogram.
//!
//! [`FrequencyModel`] is the seam the renderer consumes. [`FrequencyTable`]
//! is a plain fixed-width binning of raw values; a pre-binned [`Parsed`]
//! table is a model on its own.

use crate::error::DataError;
use crate::models::{Class, Parsed};
use std::collections::BTreeMap;

/// Supplies classes, frequencies and cumulative relative frequencies.
pub trait FrequencyModel {
    /// Current classes and index-aligned frequencies. Empty when no data is set.
    fn parse(&self) -> Parsed;

    /// Running sum of `frequencies[..=index]` divided by the total, in `[0, 1]`.
    fn cumulative_relative_frequency(&self, frequencies: &[u64], index: usize) -> f64 {
        cumulative_relative_frequency(frequencies, index)
    }
}

impl FrequencyModel for Parsed {
    fn parse(&self) -> Parsed {
        self.clone()
    }
}

/// Shared CRF arithmetic. Indices past the end clamp to the last class.
pub fn cumulative_relative_frequency(frequencies: &[u64], index: usize) -> f64 {
    let total: u64 = frequencies.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let end = index.min(frequencies.len().saturating_sub(1));
    let running: u64 = frequencies[..=end].iter().sum();
    running as f64 / total as f64
}

/// Upper bound on the classes one table may produce.
pub const MAX_CLASSES: usize = 10_000;

/// First class bottom and class count for values spanning `[min, max]`.
fn class_span(range: f64, min: f64, max: f64) -> Result<(f64, usize), DataError> {
    let start = (min / range).floor() * range;
    let count = ((max - start) / range).floor() + 1.0;
    if !(1.0..=MAX_CLASSES as f64).contains(&count) {
        return Err(DataError::TooManyClasses {
            range,
            limit: MAX_CLASSES,
        });
    }
    Ok((start, count as usize))
}

fn bounds<'a>(values: impl Iterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Fixed-width binning of raw numeric values.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    class_range: Option<f64>,
    data: BTreeMap<String, f64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of every class; must be a positive finite number that keeps the
    /// current data within [`MAX_CLASSES`] classes.
    pub fn set_class_range(&mut self, range: f64) -> Result<&mut Self, DataError> {
        if !range.is_finite() || range <= 0.0 {
            return Err(DataError::ClassRange(range));
        }
        if let Some((min, max)) = bounds(self.data.values()) {
            class_span(range, min, max)?;
        }
        self.class_range = Some(range);
        Ok(self)
    }

    /// Replace the data set. Every value must be a finite number; on failure
    /// the previous data is kept.
    pub fn set_data<I, K>(&mut self, data: I) -> Result<&mut Self, DataError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: ToString,
    {
        let mut next = BTreeMap::new();
        for (key, value) in data {
            let key = key.to_string();
            if !value.is_finite() {
                return Err(DataError::NotNumeric { key });
            }
            next.insert(key, value);
        }
        if let (Some(range), Some((min, max))) = (self.class_range, bounds(next.values())) {
            class_span(range, min, max)?;
        }
        self.data = next;
        Ok(self)
    }

    /// Convenience for positional data; keys are the indices.
    pub fn set_values(&mut self, values: &[f64]) -> Result<&mut Self, DataError> {
        self.set_data(values.iter().copied().enumerate())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl FrequencyModel for FrequencyTable {
    fn parse(&self) -> Parsed {
        let Some(range) = self.class_range else {
            return Parsed::default();
        };
        let Some((min, max)) = bounds(self.data.values()) else {
            return Parsed::default();
        };
        // unreachable: both setters refuse spans past the limit
        let Ok((start, count)) = class_span(range, min, max) else {
            return Parsed::default();
        };

        let classes: Vec<Class> = (0..count)
            .map(|i| Class::new(start + i as f64 * range, start + (i + 1) as f64 * range))
            .collect();
        let mut frequencies = vec![0u64; count];
        for &v in self.data.values() {
            let idx = (((v - start) / range).floor() as usize).min(count - 1);
            frequencies[idx] += 1;
        }
        Parsed::new(classes, frequencies)
    }
}
