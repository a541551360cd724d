use std::collections::HashMap;

use crate::table::AbsenceTable;

/// Fraction of sessions the student attended, in [0,1]. `None` when the
/// student has no row in the absence table.
pub fn fraction(absences: &AbsenceTable, name: &str) -> Option<f64> {
    let marks = absences.marks(name)?;
    let present = marks.iter().filter(|mark| **mark).count();
    Some(present as f64 / marks.len() as f64)
}

/// Attendance fraction for every student in the absence table. Students
/// missing from it simply have no entry.
pub fn compute_all(absences: &AbsenceTable) -> HashMap<String, f64> {
    absences
        .names()
        .iter()
        .filter_map(|name| fraction(absences, name).map(|f| (name.clone(), f)))
        .collect()
}

/// Display form: fraction rounded to 3 decimals, then scaled to percent,
/// so 4/7 comes out as 57.1 rather than 57.14285….
pub fn percentage(fraction: f64) -> f64 {
    (fraction * 1000.0).round() / 10.0
}

pub fn compute_all_percent(absences: &AbsenceTable) -> HashMap<String, f64> {
    compute_all(absences)
        .into_iter()
        .map(|(name, f)| (name, percentage(f)))
        .collect()
}
