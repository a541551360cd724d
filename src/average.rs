use std::collections::HashMap;

use crate::error::GradeBookError;
use crate::gradebook::GradeBook;
use crate::models::Weights;

/// Weighted average per student, rounded to 2 decimals. `None` weights means
/// equal weighting over every grade column. Every weight key must name an
/// existing grade column.
pub fn compute_average(
    book: &GradeBook,
    weights: Option<&Weights>,
) -> Result<HashMap<String, f64>, GradeBookError> {
    let default_weights;
    let weights = match weights {
        Some(weights) => weights,
        None => {
            default_weights = book.default_weights();
            &default_weights
        }
    };

    let grades = book.grades();
    let mut missing: Vec<String> = weights
        .keys()
        .filter(|column| grades.column_index(column).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(GradeBookError::UnknownColumn(missing));
    }

    if let Some((column, _)) = weights.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
        return Err(GradeBookError::InvalidWeights(format!(
            "weight for '{}' must be a non-negative number",
            column
        )));
    }
    let total: f64 = weights.values().sum();
    if total <= 0.0 {
        return Err(GradeBookError::InvalidWeights(
            "weights must sum to a positive value".to_string(),
        ));
    }

    let indexed: Vec<(usize, f64)> = weights
        .iter()
        .map(|(column, weight)| {
            // checked above, every key resolves
            (grades.column_index(column).unwrap_or_default(), *weight)
        })
        .collect();

    let mut averages = HashMap::with_capacity(grades.names().len());
    for name in grades.names() {
        let Some(scores) = grades.scores(name) else {
            continue;
        };
        let weighted_sum: f64 = indexed.iter().map(|(idx, w)| scores[*idx] * w).sum();
        averages.insert(name.clone(), round2(weighted_sum / total));
    }

    Ok(averages)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
