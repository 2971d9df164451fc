use super::dataset::{Column, Dataset};
use crate::models::analysis::{CategoryCount, MissingValues, NumericSummary};
use std::collections::HashMap;

/// Count, mean, sample standard deviation (n - 1), min and max over the
/// non-null values. Statistics that are undefined for the sample are 0.
pub fn describe(column: &Column) -> NumericSummary {
    let values: Vec<f64> = column.cells.iter().filter_map(|c| c.as_f64()).collect();
    let count = values.len();

    if count == 0 {
        return NumericSummary {
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            std: 0.0,
            count: 0,
        };
    }

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let std = if count > 1 {
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    NumericSummary {
        mean: finite_or_zero(mean),
        min: finite_or_zero(min),
        max: finite_or_zero(max),
        std: finite_or_zero(std),
        count,
    }
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Most frequent non-null values, highest count first. Ties keep the order
/// in which values first appear.
pub fn value_counts(column: &Column, limit: usize) -> Vec<CategoryCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for text in column.cells.iter().filter_map(|c| c.to_text()) {
        match counts.get_mut(&text) {
            Some(count) => *count += 1,
            None => {
                counts.insert(text.clone(), 1);
                order.push(text);
            }
        }
    }

    let mut ranked: Vec<CategoryCount> = order
        .into_iter()
        .map(|category| {
            let count = counts.get(&category).copied().unwrap_or(0);
            CategoryCount { category, count }
        })
        .collect();

    // stable sort keeps first-appearance order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

pub fn missing_values(column: &Column, dataset: &Dataset) -> MissingValues {
    let total_rows = dataset.row_count();
    let null_count = column.null_count();
    let null_percentage = if total_rows == 0 {
        0.0
    } else {
        null_count as f64 / total_rows as f64 * 100.0
    };

    MissingValues {
        null_count,
        null_percentage,
        total_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::analysis::dataset::Cell;
    use crate::models::analysis::ColumnType;

    fn numeric(values: &[Option<f64>]) -> Column {
        Column {
            name: "n".to_string(),
            dtype: ColumnType::Float64,
            cells: values
                .iter()
                .map(|v| v.map(Cell::Float).unwrap_or(Cell::Null))
                .collect(),
        }
    }

    fn text(values: &[&str]) -> Column {
        Column::from_text(
            "t".to_string(),
            values.iter().map(|v| Some(v.to_string())).collect(),
        )
    }

    #[test]
    fn describe_matches_sample_statistics() {
        let summary = describe(&numeric(&[Some(2.0), Some(4.0), Some(4.0), Some(6.0)]));

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 4.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 6.0);
        assert!((summary.std - (8.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn describe_ignores_nulls() {
        let summary = describe(&numeric(&[Some(1.0), None, Some(3.0)]));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 2.0);
    }

    #[test]
    fn single_value_has_zero_std() {
        let summary = describe(&numeric(&[Some(5.0), None]));
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std, 0.0);
        assert_eq!(summary.min, 5.0);
    }

    #[test]
    fn empty_column_is_all_zero() {
        let summary = describe(&numeric(&[None, None]));
        assert_eq!(
            summary,
            NumericSummary {
                mean: 0.0,
                min: 0.0,
                max: 0.0,
                std: 0.0,
                count: 0
            }
        );
    }

    #[test]
    fn value_counts_rank_by_frequency_then_first_seen() {
        let counts = value_counts(&text(&["b", "a", "b", "c", "a", "", "d"]), 10);
        let pairs: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();

        assert_eq!(pairs, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn value_counts_are_truncated() {
        let values: Vec<String> = (0..15).map(|i| format!("v{i}")).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        assert_eq!(value_counts(&text(&refs), 10).len(), 10);
    }

    #[test]
    fn missing_on_empty_dataset_is_zero_percent() {
        let column = numeric(&[]);
        let dataset = Dataset::new(vec![column.clone()]);
        let missing = missing_values(&column, &dataset);

        assert_eq!(missing.null_count, 0);
        assert_eq!(missing.null_percentage, 0.0);
        assert_eq!(missing.total_rows, 0);
    }
}
