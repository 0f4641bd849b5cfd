use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use crate::analytics::CorrelationError;
use crate::propagate::PropagatedSeries;

/// Pairwise Pearson coefficients, rows and columns in input order.
///
/// A cell is `None` when either series has zero variance.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.cells
    }

    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        *self.cells.get(row)?.get(col)?
    }

    pub fn get_by_label(&self, row: &str, col: &str) -> Option<f64> {
        let row = self.labels.iter().position(|l| l == row)?;
        let col = self.labels.iter().position(|l| l == col)?;
        self.get(row, col)
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.labels.iter().map(String::len).max().unwrap_or(0).max(5);
        write!(f, "{:width$}", "")?;
        for label in &self.labels {
            write!(f, " {label:>width$}")?;
        }
        for (label, row) in self.labels.iter().zip(&self.cells) {
            write!(f, "\n{label:width$}")?;
            for cell in row {
                match cell {
                    Some(value) => write!(f, " {value:>width$.2}")?,
                    None => write!(f, " {:>width$}", "n/a")?,
                }
            }
        }
        Ok(())
    }
}

/// Build the correlation matrix for an ordered set of labeled series.
///
/// All series must share one non-zero length.
pub fn correlate<'a, I, S>(named_series: I) -> Result<CorrelationMatrix, CorrelationError>
where
    I: IntoIterator<Item = (S, &'a [f64])>,
    S: Into<String>,
{
    let mut labels: Vec<String> = Vec::new();
    let mut columns: Vec<&[f64]> = Vec::new();

    for (label, values) in named_series {
        let label = label.into();
        if values.is_empty() {
            return Err(CorrelationError::EmptySeries(label));
        }
        if let Some(first) = columns.first() {
            if values.len() != first.len() {
                return Err(CorrelationError::LengthMismatch {
                    label,
                    expected: first.len(),
                    actual: values.len(),
                });
            }
        }
        if labels.contains(&label) {
            return Err(CorrelationError::DuplicateLabel(label));
        }
        labels.push(label);
        columns.push(values);
    }

    let varying: Vec<bool> = columns.iter().map(|c| !is_constant(c)).collect();
    let cells = (0..columns.len())
        .map(|i| {
            (0..columns.len())
                .map(|j| match (i == j, varying[i] && varying[j]) {
                    (_, false) => None,
                    (true, true) => Some(1.0),
                    (false, true) => pearson(columns[i], columns[j]),
                })
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix { labels, cells })
}

/// Altitude, speed and latitude of one series against each other.
pub fn correlate_series(series: &PropagatedSeries) -> Result<CorrelationMatrix, CorrelationError> {
    correlate([
        ("Altitude", series.altitudes()),
        ("Speed", series.speeds()),
        ("Latitude", series.latitudes()),
    ])
}

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns `None` for mismatched or empty input and when either series is
/// constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.is_empty() || x.len() != y.len() || is_constant(x) || is_constant(y) {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (mut num, mut dx, mut dy) = (0.0, 0.0, 0.0);
    for (xi, yi) in x.iter().zip(y) {
        let ex = xi - mean_x;
        let ey = yi - mean_y;
        num += ex * ey;
        dx += ex * ex;
        dy += ey * ey;
    }

    let denominator = (dx * dy).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    Some((num / denominator).clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_correlation_diagonal_is_one() {
        let a = [1.0, 2.5, 3.0, 7.25, -4.0];
        let b = [0.3, 0.1, 0.7, 0.2, 0.9];
        let matrix = correlate([("a", &a[..]), ("b", &b[..])]).unwrap();

        assert_eq!(matrix.get(0, 0), Some(1.0));
        assert_eq!(matrix.get(1, 1), Some(1.0));
        assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
    }

    #[test]
    fn linear_relations() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];

        assert!((pearson(&x, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_is_undefined_everywhere() {
        let varying = [1.0, 2.0, 4.0];
        let constant = [0.1, 0.1, 0.1];
        let matrix = correlate([
            ("varying", &varying[..]),
            ("constant", &constant[..]),
        ])
        .unwrap();

        assert_eq!(matrix.get(0, 0), Some(1.0));
        assert_eq!(matrix.get(0, 1), None);
        assert_eq!(matrix.get(1, 0), None);
        assert_eq!(matrix.get(1, 1), None);
        assert_eq!(pearson(&varying, &constant), None);
    }

    #[test]
    fn keeps_input_order() {
        let a = [1.0, 2.0, 3.0];
        let b = [3.0, 1.0, 2.0];
        let c = [5.0, 5.5, 9.0];
        let matrix = correlate([("zeta", &a[..]), ("alpha", &b[..]), ("mid", &c[..])]).unwrap();

        assert_eq!(matrix.labels(), ["zeta", "alpha", "mid"]);
        assert_eq!(matrix.size(), 3);
        assert_eq!(
            matrix.get_by_label("alpha", "zeta"),
            pearson(&b, &a)
        );
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0];
        let err = correlate([("a", &a[..]), ("b", &b[..])]).unwrap_err();
        assert_eq!(
            err,
            CorrelationError::LengthMismatch {
                label: "b".into(),
                expected: 3,
                actual: 2,
            }
        );
    }

    #[test]
    fn rejects_empty_and_duplicate_series() {
        let a = [1.0, 2.0];
        let empty: [f64; 0] = [];
        assert_eq!(
            correlate([("a", &a[..]), ("e", &empty[..])]).unwrap_err(),
            CorrelationError::EmptySeries("e".into())
        );
        assert_eq!(
            correlate([("a", &a[..]), ("a", &a[..])]).unwrap_err(),
            CorrelationError::DuplicateLabel("a".into())
        );
    }

    #[test]
    fn no_series_gives_empty_matrix() {
        let matrix = correlate(Vec::<(String, &[f64])>::new()).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn display_marks_undefined_cells() {
        let a = [1.0, 2.0, 3.0];
        let flat = [2.0, 2.0, 2.0];
        let matrix = correlate([("a", &a[..]), ("flat", &flat[..])]).unwrap();
        let text = matrix.to_string();
        assert!(text.contains("1.00"));
        assert!(text.contains("n/a"));
    }
}
