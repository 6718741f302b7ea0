use crate::data::model::{AccidentTable, Column};

/// Pearson correlation between every pair of numeric columns.
///
/// `values[i][j]` is the correlation of `columns[i]` and `columns[j]`,
/// computed over the rows where both are present. Entries are NaN when
/// fewer than two such rows exist or either side is constant.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Correlation matrix over the whole table; it ignores the Time_of_Day
/// filter, so the dashboard computes it once.
pub fn correlation_matrix(table: &AccidentTable) -> CorrelationMatrix {
    let numeric = table.numeric_columns();
    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];

    for i in 0..n {
        for j in i..n {
            let r = pearson(numeric[i], numeric[j], table.len());
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

fn pearson(a: &Column, b: &Column, rows: usize) -> f64 {
    let pairs: Vec<(f64, f64)> = (0..rows)
        .filter_map(|row| Some((a.f64_at(row)?, b.f64_at(row)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for &(x, y) in &pairs {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}
