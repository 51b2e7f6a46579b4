use std::collections::BTreeMap;

use log::debug;
use prettytable::{Cell, Row, Table as PrettyTable};

use super::axis::{Axis, Column, same_value};
use crate::Kinetics::kinetics_error::KinError;

/// One evaluation: the axis values that produced it and the derived quantities
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub axis_values: Vec<f64>,
    pub derived: Vec<f64>,
}

impl Sample {
    /// axis values followed by derived values, the CSV row order
    pub fn row(&self) -> impl Iterator<Item = f64> + '_ {
        self.axis_values.iter().chain(self.derived.iter()).copied()
    }
}

/// Rows sharing one combination of series-key values
#[derive(Debug, Clone)]
pub struct SeriesGroup<'a> {
    /// (axis column, value) for every series key, in the order the keys were given
    pub key: Vec<(&'a Column, f64)>,
    pub samples: Vec<&'a Sample>,
}

impl SeriesGroup<'_> {
    /// e.g. "Δμ = 15 D, F_eps = 2"
    pub fn label(&self) -> String {
        self.key
            .iter()
            .map(|(column, value)| {
                if column.unit.is_empty() {
                    format!("{} = {}", column.name, value)
                } else {
                    format!("{} = {} {}", column.name, value, column.unit)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Sweep result: fixed columns and samples in cross-product order
#[derive(Debug, Clone)]
pub struct Table {
    axes: Vec<Axis>,
    derived_columns: Vec<Column>,
    samples: Vec<Sample>,
}

impl Table {
    pub(crate) fn new(axes: Vec<Axis>, derived_columns: Vec<Column>, samples: Vec<Sample>) -> Self {
        Self {
            axes,
            derived_columns,
            samples,
        }
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn derived_columns(&self) -> &[Column] {
        &self.derived_columns
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All columns, axes first, in CSV order
    pub fn columns(&self) -> Vec<&Column> {
        self.axes
            .iter()
            .map(|a| a.column())
            .chain(self.derived_columns.iter())
            .collect()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns().iter().map(|c| c.header()).collect()
    }

    /// Position of a column (axis or derived) by name in the CSV row
    pub fn column_index(&self, name: &str) -> Result<usize, KinError> {
        self.columns()
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| KinError::UnknownColumn(name.to_string()))
    }

    pub fn column_by_name(&self, name: &str) -> Result<&Column, KinError> {
        let idx = self.column_index(name)?;
        Ok(self.columns()[idx])
    }

    fn axis_index(&self, name: &str) -> Result<usize, KinError> {
        self.axes
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| KinError::UnknownColumn(name.to_string()))
    }

    /// Value of column `idx` (CSV order) in a sample
    pub fn value(&self, sample: &Sample, idx: usize) -> f64 {
        let n_axes = self.axes.len();
        if idx < n_axes {
            sample.axis_values[idx]
        } else {
            sample.derived[idx - n_axes]
        }
    }

    /// Values of one named column over all samples
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>, KinError> {
        let idx = self.column_index(name)?;
        Ok(self.samples.iter().map(|s| self.value(s, idx)).collect())
    }

    /// Samples whose axis values equal the given (axis name, value) pairs.
    /// Fixed axes keep only the matched value so the result is still a full cross product.
    pub fn filter(&self, fixed: &[(&str, f64)]) -> Result<Table, KinError> {
        let mut axes = self.axes.clone();
        let mut checks = Vec::with_capacity(fixed.len());
        for (name, value) in fixed {
            let idx = self.axis_index(name)?;
            if self.axes[idx].position(*value).is_none() {
                return Err(KinError::InvalidAxis {
                    axis: name.to_string(),
                    reason: format!("value {} is not on the axis", value),
                });
            }
            axes[idx] = Axis::from_values(self.axes[idx].column().clone(), vec![*value])?;
            checks.push((idx, *value));
        }
        let samples: Vec<Sample> = self
            .samples
            .iter()
            .filter(|s| checks.iter().all(|(i, v)| same_value(s.axis_values[*i], *v)))
            .cloned()
            .collect();
        debug!("filter {:?}: {} of {} rows", fixed, samples.len(), self.samples.len());
        Ok(Table::new(axes, self.derived_columns.clone(), samples))
    }

    /// Partition rows by the combination of the given series-key axes.
    /// Groups are ordered by each key axis's declaration order, keys compared in the order given.
    pub fn group_by(&self, keys: &[&str]) -> Result<Vec<SeriesGroup<'_>>, KinError> {
        let key_axes = keys
            .iter()
            .map(|k| self.axis_index(k))
            .collect::<Result<Vec<_>, _>>()?;
        let mut groups: BTreeMap<Vec<usize>, Vec<&Sample>> = BTreeMap::new();
        for sample in &self.samples {
            let positions = key_axes
                .iter()
                .map(|&a| {
                    self.axes[a].position(sample.axis_values[a]).ok_or_else(|| {
                        KinError::InvalidAxis {
                            axis: self.axes[a].name().to_string(),
                            reason: format!("sample value {} is not on the axis", sample.axis_values[a]),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            groups.entry(positions).or_default().push(sample);
        }
        Ok(groups
            .into_iter()
            .map(|(positions, samples)| SeriesGroup {
                key: key_axes
                    .iter()
                    .zip(positions)
                    .map(|(&a, p)| (self.axes[a].column(), self.axes[a].values()[p]))
                    .collect(),
                samples,
            })
            .collect())
    }

    /// Console preview of the first `n` rows
    pub fn pretty_print_head(&self, n: usize) {
        let mut table = PrettyTable::new();
        table.add_row(Row::new(
            self.headers().iter().map(|h| Cell::new(h)).collect(),
        ));
        for sample in self.samples.iter().take(n) {
            table.add_row(Row::new(
                sample.row().map(|v| Cell::new(&format!("{:.4e}", v))).collect(),
            ));
        }
        table.printstd();
        if self.samples.len() > n {
            println!("... {} rows in total", self.samples.len());
        }
    }
}
