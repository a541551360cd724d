use std::collections::HashMap;

use crate::attendance;
use crate::gradebook::GradeBook;
use crate::models::PerformanceCategory;

/// Attendance fraction below this forces the SR category (strictly below;
/// exactly 0.75 keeps the grade-based category).
pub const ABSENCE_THRESHOLD: f64 = 0.75;

/// Maps a final grade to its category. Interval boundaries belong to the
/// higher category: exactly 7.0 is MS, not MM. Anything outside [0,10]
/// (including NaN) is ERR.
pub fn classify_grade(grade: f64) -> PerformanceCategory {
    if (9.0..=10.0).contains(&grade) {
        PerformanceCategory::SS
    } else if (7.0..9.0).contains(&grade) {
        PerformanceCategory::MS
    } else if (5.0..7.0).contains(&grade) {
        PerformanceCategory::MM
    } else if (3.0..5.0).contains(&grade) {
        PerformanceCategory::MI
    } else if grade > 0.0 && grade < 3.0 {
        PerformanceCategory::II
    } else if grade == 0.0 {
        PerformanceCategory::SR
    } else {
        PerformanceCategory::ERR
    }
}

/// Classifies every average, then applies the absence override: a student
/// attending less than 75% of sessions is forced to SR, even over ERR.
/// Students with no attendance record keep the grade-based category.
pub fn classify_all(
    book: &GradeBook,
    averages: &HashMap<String, f64>,
) -> HashMap<String, PerformanceCategory> {
    let mut performance = HashMap::with_capacity(averages.len());
    for (name, grade) in averages {
        let mut category = classify_grade(*grade);
        if let Some(absences) = book.absences() {
            if let Some(fraction) = attendance::fraction(absences, name) {
                if fraction < ABSENCE_THRESHOLD {
                    category = PerformanceCategory::SR;
                }
            }
        }
        performance.insert(name.clone(), category);
    }
    performance
}
