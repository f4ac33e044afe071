//! Interpolated annotation trace

use crate::error::AnnotationLoadError;
use replay_core::Marker;
use std::collections::BTreeMap;

/// Named time series sampled at shared frame times.
///
/// Built frame by frame; a field left out of a frame keeps its previous
/// value. Queries interpolate linearly between frames and return `None`
/// outside the recorded time range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTrace {
    times: Vec<f64>,
    series: BTreeMap<String, Vec<f64>>,
}

impl AnnotationTrace {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            times: Vec::new(),
            series: fields
                .into_iter()
                .map(|name| (name.into(), Vec::new()))
                .collect(),
        }
    }

    /// Append a frame at `time`. Values for unknown fields are ignored.
    pub fn frame<'a, I>(&mut self, time: f64, values: I) -> Result<(), AnnotationLoadError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        if !time.is_finite() {
            return Err(AnnotationLoadError::InvalidTime { time });
        }
        if let Some(&previous) = self.times.last() {
            if time < previous {
                return Err(AnnotationLoadError::NonMonotonic { previous, time });
            }
        }

        let given: BTreeMap<&str, f64> = values.into_iter().collect();
        let mut row = Vec::with_capacity(self.series.len());
        for (name, samples) in &self.series {
            let value = given
                .get(name.as_str())
                .copied()
                .or_else(|| samples.last().copied());
            match value {
                Some(value) => row.push(value),
                None => {
                    return Err(AnnotationLoadError::MissingInitialValue {
                        field: name.clone(),
                        time,
                    })
                }
            }
        }

        for (samples, value) in self.series.values_mut().zip(row) {
            samples.push(value);
        }
        self.times.push(time);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Value of `field` at `time`, or `None` outside the trace or for an unknown field.
    pub fn get(&self, time: f64, field: &str) -> Option<f64> {
        let samples = self.series.get(field)?;
        let (&first, &last) = (self.times.first()?, self.times.last()?);
        if !(first..=last).contains(&time) {
            return None;
        }

        let upper = self.times.partition_point(|&t| t <= time);
        if upper == self.times.len() {
            return samples.last().copied();
        }
        let lower = upper - 1;
        let (t0, t1) = (self.times[lower], self.times[upper]);
        let (v0, v1) = (samples[lower], samples[upper]);
        Some(v0 + (v1 - v0) * (time - t0) / (t1 - t0))
    }

    /// Circle built from the `x`, `y` and `r` fields, when all are defined at `time`.
    pub fn marker_at(&self, time: f64) -> Option<Marker> {
        let x = self.get(time, "x")?;
        let y = self.get(time, "y")?;
        let r = self.get(time, "r")?;
        Some(Marker::new(x as f32, y as f32, r as f32))
    }
}
