//! # Sweep pipeline
//!
//! Evaluates a model at every combination of a list of named axes and
//! collects the results into a [`Table`].
//!
//! ## Usage Pattern
//! 1. `SweepPipeline::new(derived_columns)` - names and units of what the model returns
//! 2. `with_axis()` - once per axis, outermost first
//! 3. `run(|point| ...)` - the closure gets the axis values of one combination and
//!    returns the derived values in column order
//!
//! ## Guarantees
//! - exactly one row per combination, first axis outermost, last axis fastest;
//! - a model error or a NaN/Inf result stops the run with the offending
//!   combination in the error message, nothing non-finite ever reaches the table;
//! - no randomness: identical axes and model give identical tables.
//!
//! ```rust, ignore
//! let table = SweepPipeline::new(vec![Column::new("t5", "s")])
//!     .with_axis(Axis::from_values(Column::dimensionless("fold"), vec![1.0, 10.0])?)
//!     .with_axis(Axis::logspace(Column::new("[H2O2]", "µM"), 1e-3, 1.0, 300)?)
//!     .run(|p| Ok(vec![time_to_fraction(f, 10.0 * p[0], p[1] * 1e-6)?]))?;
//! ```
use log::{debug, info};

use super::axis::{Axis, Column};
use super::table::{Sample, Table};
use crate::Kinetics::kinetics_error::KinError;

pub struct SweepPipeline {
    axes: Vec<Axis>,
    derived_columns: Vec<Column>,
}

impl SweepPipeline {
    pub fn new(derived_columns: Vec<Column>) -> Self {
        Self {
            axes: Vec::new(),
            derived_columns,
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axes.push(axis);
        self
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    /// Number of combinations the run will evaluate
    pub fn n_combinations(&self) -> usize {
        if self.axes.is_empty() {
            return 0;
        }
        self.axes.iter().map(|a| a.len()).product()
    }

    fn check(&self) -> Result<(), KinError> {
        if self.axes.is_empty() {
            return Err(KinError::InvalidSettings(
                "a sweep needs at least one axis".to_string(),
            ));
        }
        if self.derived_columns.is_empty() {
            return Err(KinError::InvalidSettings(
                "a sweep needs at least one derived column".to_string(),
            ));
        }
        let mut names: Vec<&str> = self
            .axes
            .iter()
            .map(|a| a.name())
            .chain(self.derived_columns.iter().map(|c| c.name.as_str()))
            .collect();
        names.sort_unstable();
        if let Some(dup) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(KinError::InvalidSettings(format!(
                "column name '{}' is used twice",
                dup[0]
            )));
        }
        Ok(())
    }

    /// Evaluate `model` over the full cross product of the axes
    pub fn run<F>(self, mut model: F) -> Result<Table, KinError>
    where
        F: FnMut(&[f64]) -> Result<Vec<f64>, KinError>,
    {
        self.check()?;
        let total = self.n_combinations();
        info!(
            "sweep over {} ({} combinations)",
            self.axes
                .iter()
                .map(|a| format!("{}[{}]", a.name(), a.len()))
                .collect::<Vec<_>>()
                .join(" x "),
            total
        );
        let n_derived = self.derived_columns.len();
        let mut samples = Vec::with_capacity(total);
        let mut index = vec![0usize; self.axes.len()];
        for _ in 0..total {
            let point: Vec<f64> = self
                .axes
                .iter()
                .zip(&index)
                .map(|(axis, &i)| axis.values()[i])
                .collect();
            let derived = model(&point).map_err(|e| KinError::Evaluation {
                combination: self.describe(&point),
                source: Box::new(e),
            })?;
            if derived.len() != n_derived {
                return Err(KinError::ShapeMismatch {
                    combination: self.describe(&point),
                    expected: n_derived,
                    got: derived.len(),
                });
            }
            if let Some(pos) = derived.iter().position(|v| !v.is_finite()) {
                return Err(KinError::Evaluation {
                    combination: self.describe(&point),
                    source: Box::new(KinError::Unreachable(format!(
                        "{} evaluated to {}",
                        self.derived_columns[pos].header(),
                        derived[pos]
                    ))),
                });
            }
            samples.push(Sample {
                axis_values: point,
                derived,
            });
            self.advance(&mut index);
        }
        debug!("sweep produced {} rows", samples.len());
        Ok(Table::new(self.axes, self.derived_columns, samples))
    }

    // odometer increment, last axis fastest
    fn advance(&self, index: &mut [usize]) {
        for (slot, axis) in index.iter_mut().zip(&self.axes).rev() {
            *slot += 1;
            if *slot < axis.len() {
                return;
            }
            *slot = 0;
        }
    }

    fn describe(&self, point: &[f64]) -> String {
        self.axes
            .iter()
            .zip(point)
            .map(|(axis, v)| format!("{} = {:e}", axis.column().header(), v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
