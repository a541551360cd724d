use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::GradeBookError;
use crate::models::{PerformanceCategory, Weights};
use crate::table::{self, AbsenceTable, GradesTable};

/// Where a table comes from: a fixed-width file on disk or a pre-built table.
#[derive(Debug)]
pub enum TableSource<T> {
    FromPath(PathBuf),
    FromTable(T),
}

/// One class's data: the raw grades and absence tables loaded at construction,
/// plus the derived columns merged in by the calculators. The raw tables are
/// read-only source data; merging the same derived column twice overwrites.
#[derive(Debug)]
pub struct GradeBook {
    grades: GradesTable,
    absences: Option<AbsenceTable>,
    avg: Option<HashMap<String, f64>>,
    attendance: Option<HashMap<String, f64>>,
    performance: Option<HashMap<String, PerformanceCategory>>,
}

impl GradeBook {
    pub fn new(
        grades: TableSource<GradesTable>,
        absences: Option<TableSource<AbsenceTable>>,
    ) -> Result<Self, GradeBookError> {
        let grades = match grades {
            TableSource::FromPath(path) => table::load_grades(&path)?,
            TableSource::FromTable(table) => table,
        };
        let absences = match absences {
            Some(TableSource::FromPath(path)) => Some(table::load_absences(&path)?),
            Some(TableSource::FromTable(table)) => Some(table),
            None => None,
        };
        Ok(GradeBook {
            grades,
            absences,
            avg: None,
            attendance: None,
            performance: None,
        })
    }

    pub fn grades(&self) -> &GradesTable {
        &self.grades
    }

    pub fn absences(&self) -> Option<&AbsenceTable> {
        self.absences.as_ref()
    }

    /// Equal weight 1.0 for every grade column, computed from the current
    /// column set rather than cached at construction.
    pub fn default_weights(&self) -> Weights {
        self.grades
            .columns()
            .iter()
            .map(|column| (column.clone(), 1.0))
            .collect()
    }

    pub fn merge_avg(&mut self, avg: HashMap<String, f64>) {
        self.avg = Some(avg);
    }

    pub fn merge_attendance(&mut self, attendance: HashMap<String, f64>) {
        self.attendance = Some(attendance);
    }

    pub fn merge_performance(&mut self, performance: HashMap<String, PerformanceCategory>) {
        self.performance = Some(performance);
    }

    pub fn avg_column(&self) -> Option<&HashMap<String, f64>> {
        self.avg.as_ref()
    }

    pub fn attendance_column(&self) -> Option<&HashMap<String, f64>> {
        self.attendance.as_ref()
    }

    pub fn performance_column(&self) -> Option<&HashMap<String, PerformanceCategory>> {
        self.performance.as_ref()
    }
}
