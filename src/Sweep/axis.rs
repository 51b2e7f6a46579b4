use crate::Kinetics::kinetics_error::KinError;

/// Named physical quantity with its unit; renders as the CSV header
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: String,
    /// unit with explicit power of ten, e.g. "µM", "min", "V/m"; empty when dimensionless
    pub unit: String,
}

impl Column {
    pub fn new(name: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
        }
    }

    pub fn dimensionless(name: &str) -> Self {
        Self::new(name, "")
    }

    /// "name [unit]" or just "name"
    pub fn header(&self) -> String {
        if self.unit.is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, self.unit)
        }
    }
}

/// One dimension of a sweep: a named, strictly increasing sequence of values
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    column: Column,
    values: Vec<f64>,
}

impl Axis {
    /// `n_points` values spanning [min, max] evenly in log10 space (numpy `logspace` semantics)
    pub fn logspace(column: Column, min: f64, max: f64, n_points: usize) -> Result<Self, KinError> {
        if !(min > 0.0 && max > 0.0 && min.is_finite() && max.is_finite()) {
            return Err(invalid(
                &column,
                format!("log-spaced bounds must be positive and finite, got [{}, {}]", min, max),
            ));
        }
        let (lo, hi) = (min.log10(), max.log10());
        let mut values: Vec<f64> = spaced(lo, hi, n_points, &column)?
            .into_iter()
            .map(|e| 10f64.powf(e))
            .collect();
        // pin the end points to the requested bounds
        if let Some(first) = values.first_mut() {
            *first = min;
        }
        if n_points > 1 {
            if let Some(last) = values.last_mut() {
                *last = max;
            }
        }
        Self::from_values(column, values)
    }

    /// `n_points` values spanning [min, max] evenly in linear space
    pub fn linspace(column: Column, min: f64, max: f64, n_points: usize) -> Result<Self, KinError> {
        if !(min.is_finite() && max.is_finite()) {
            return Err(invalid(&column, format!("bounds must be finite, got [{}, {}]", min, max)));
        }
        let values = spaced(min, max, n_points, &column)?;
        Self::from_values(column, values)
    }

    /// Discrete values in declaration order; must be finite and strictly increasing
    pub fn from_values(column: Column, values: Vec<f64>) -> Result<Self, KinError> {
        if values.is_empty() {
            return Err(invalid(&column, "axis has no values".to_string()));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(invalid(&column, format!("non-finite value {}", v)));
        }
        if let Some(pair) = values.windows(2).find(|w| w[1] <= w[0]) {
            return Err(invalid(
                &column,
                format!("values must be strictly increasing, found {} then {}", pair[0], pair[1]),
            ));
        }
        Ok(Self { column, values })
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn name(&self) -> &str {
        &self.column.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Declaration index of `value`, matched with a relative tolerance of 1e-12
    pub fn position(&self, value: f64) -> Option<usize> {
        self.values.iter().position(|v| same_value(*v, value))
    }
}

pub(crate) fn same_value(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(f64::MIN_POSITIVE)
}

fn spaced(lo: f64, hi: f64, n_points: usize, column: &Column) -> Result<Vec<f64>, KinError> {
    match n_points {
        0 => Err(invalid(column, "n_points must be at least 1".to_string())),
        1 => Ok(vec![lo]),
        _ => {
            if hi <= lo {
                return Err(invalid(
                    column,
                    format!("upper bound must exceed lower bound for {} points", n_points),
                ));
            }
            let step = (hi - lo) / (n_points - 1) as f64;
            Ok((0..n_points).map(|i| lo + step * i as f64).collect())
        }
    }
}

fn invalid(column: &Column, reason: String) -> KinError {
    KinError::InvalidAxis {
        axis: column.name.clone(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_header() {
        assert_eq!(Column::new("t5", "min").header(), "t5 [min]");
        assert_eq!(Column::dimensionless("fold_accel").header(), "fold_accel");
    }

    #[test]
    fn test_logspace() {
        let axis = Axis::logspace(Column::new("H2O2", "µM"), 1e-3, 1.0, 4).unwrap();
        assert_eq!(axis.len(), 4);
        assert_eq!(axis.values()[0], 1e-3);
        assert_eq!(axis.values()[3], 1.0);
        assert_relative_eq!(axis.values()[1], 1e-2, max_relative = 1e-12);
        assert_relative_eq!(axis.values()[2], 1e-1, max_relative = 1e-12);
        let single = Axis::logspace(Column::new("k2", "1/(M s)"), 10.0, 10.0, 1).unwrap();
        assert_eq!(single.values(), &[10.0]);
    }

    #[test]
    fn test_logspace_rejects_non_positive_bounds() {
        assert!(matches!(
            Axis::logspace(Column::new("c", "M"), 0.0, 1.0, 10),
            Err(KinError::InvalidAxis { .. })
        ));
        assert!(Axis::logspace(Column::new("c", "M"), -1.0, 1.0, 10).is_err());
        assert!(Axis::logspace(Column::new("c", "M"), 1.0, 0.1, 10).is_err());
        assert!(Axis::logspace(Column::new("c", "M"), 0.1, 1.0, 0).is_err());
    }

    #[test]
    fn test_linspace() {
        let z = Axis::linspace(Column::new("z", "nm"), 1.0, 5.0, 41).unwrap();
        assert_eq!(z.len(), 41);
        assert_relative_eq!(z.values()[1], 1.1, max_relative = 1e-12);
        assert_relative_eq!(z.values()[40], 5.0, max_relative = 1e-12);
    }

    #[test]
    fn test_from_values_requires_increasing() {
        let col = Column::dimensionless("fold");
        assert!(Axis::from_values(col.clone(), vec![1.0, 3.0, 10.0]).is_ok());
        assert!(Axis::from_values(col.clone(), vec![1.0, 1.0]).is_err());
        assert!(Axis::from_values(col.clone(), vec![3.0, 1.0]).is_err());
        assert!(Axis::from_values(col.clone(), vec![]).is_err());
        assert!(Axis::from_values(col, vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_position() {
        let axis = Axis::from_values(Column::new("F_eps", ""), vec![1.0, 2.0, 3.0, 5.0]).unwrap();
        assert_eq!(axis.position(3.0), Some(2));
        assert_eq!(axis.position(4.0), None);
    }
}
