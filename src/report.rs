use std::fmt::Write as _;
use std::path::Path;

use chrono::Utc;

use crate::error::GradeBookError;
use crate::gradebook::GradeBook;
use crate::models::PerformanceCategory;

pub const AVG_COLUMN: &str = "avg";
pub const ATT_COLUMN: &str = "att[%]";
pub const PERF_COLUMN: &str = "perf";

/// One enriched row of the final report, in the base table's order.
#[derive(Debug, Clone)]
pub struct ReportRow {
    pub name: String,
    pub scores: Vec<f64>,
    pub avg: f64,
    pub att_percent: Option<f64>,
    pub perf: PerformanceCategory,
}

/// The grade table joined with its derived columns. Rows keep the base
/// table's input order; sorted views leave it untouched.
#[derive(Debug)]
pub struct Report {
    columns: Vec<String>,
    rows: Vec<ReportRow>,
    has_attendance: bool,
}

/// Joins the merged `avg`, `att[%]` and `perf` columns one-to-one onto the
/// grade table. `avg` and `perf` must be total over the base row set;
/// attendance may be partial.
pub fn assemble(book: &GradeBook) -> Result<Report, GradeBookError> {
    let avg = book
        .avg_column()
        .ok_or(GradeBookError::MissingDerived(AVG_COLUMN))?;
    let perf = book
        .performance_column()
        .ok_or(GradeBookError::MissingDerived(PERF_COLUMN))?;
    let attendance = book.attendance_column();

    let grades = book.grades();
    check_no_strays(AVG_COLUMN, avg.keys(), grades)?;
    check_no_strays(PERF_COLUMN, perf.keys(), grades)?;
    if let Some(attendance) = attendance {
        check_no_strays(ATT_COLUMN, attendance.keys(), grades)?;
    }

    let mut rows = Vec::with_capacity(grades.names().len());
    for name in grades.names() {
        let scores = grades.scores(name).unwrap_or_default().to_vec();
        let avg = *avg.get(name).ok_or_else(|| GradeBookError::JoinMismatch {
            column: AVG_COLUMN.to_string(),
            name: name.clone(),
        })?;
        let perf = *perf.get(name).ok_or_else(|| GradeBookError::JoinMismatch {
            column: PERF_COLUMN.to_string(),
            name: name.clone(),
        })?;
        let att_percent = attendance.and_then(|att| att.get(name).copied());
        rows.push(ReportRow {
            name: name.clone(),
            scores,
            avg,
            att_percent,
            perf,
        });
    }

    Ok(Report {
        columns: grades.columns().to_vec(),
        rows,
        has_attendance: attendance.is_some(),
    })
}

fn check_no_strays<'a>(
    column: &str,
    names: impl Iterator<Item = &'a String>,
    grades: &crate::table::GradesTable,
) -> Result<(), GradeBookError> {
    for name in names {
        if grades.scores(name).is_none() {
            return Err(GradeBookError::JoinMismatch {
                column: column.to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

impl Report {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows sorted descending by one column (a grade column, `avg` or
    /// `att[%]`), ties broken by name. The underlying order is preserved.
    pub fn sorted_by(&self, column: &str) -> Result<Vec<&ReportRow>, GradeBookError> {
        let key: Box<dyn Fn(&ReportRow) -> f64> = match column {
            AVG_COLUMN => Box::new(|row: &ReportRow| row.avg),
            ATT_COLUMN => Box::new(|row: &ReportRow| row.att_percent.unwrap_or(f64::MIN)),
            other => {
                let idx = self
                    .columns
                    .iter()
                    .position(|c| c == other)
                    .ok_or_else(|| GradeBookError::UnknownColumn(vec![other.to_string()]))?;
                Box::new(move |row: &ReportRow| row.scores[idx])
            }
        };

        let mut view: Vec<&ReportRow> = self.rows.iter().collect();
        view.sort_by(|a, b| {
            key(b)
                .partial_cmp(&key(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(view)
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec!["name".to_string()];
        header.extend(self.columns.iter().cloned());
        header.push(AVG_COLUMN.to_string());
        if self.has_attendance {
            header.push(ATT_COLUMN.to_string());
        }
        header.push(PERF_COLUMN.to_string());
        header
    }

    fn cells(&self, row: &ReportRow) -> Vec<String> {
        let mut cells = vec![row.name.clone()];
        cells.extend(row.scores.iter().map(|score| format!("{:.1}", score)));
        cells.push(format!("{:.2}", row.avg));
        if self.has_attendance {
            cells.push(
                row.att_percent
                    .map(|p| format!("{:.1}", p))
                    .unwrap_or_default(),
            );
        }
        cells.push(row.perf.to_string());
        cells
    }

    /// Plain-text table, stamped with the generation date.
    pub fn to_text(&self, rows: &[&ReportRow]) -> String {
        let header = self.header();
        let body: Vec<Vec<String>> = rows.iter().map(|row| self.cells(row)).collect();

        let mut widths: Vec<usize> = header.iter().map(String::len).collect();
        for cells in &body {
            for (i, cell) in cells.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        let mut output = String::new();
        let _ = writeln!(output, "# Class report ({})", Utc::now().date_naive());
        for (i, label) in header.iter().enumerate() {
            let _ = write!(output, "{:>width$}  ", label, width = widths[i]);
        }
        output.push('\n');
        for cells in &body {
            for (i, cell) in cells.iter().enumerate() {
                let _ = write!(output, "{:>width$}  ", cell, width = widths[i]);
            }
            output.push('\n');
        }
        output
    }

    pub fn write_csv(&self, path: &Path, rows: &[&ReportRow]) -> Result<(), anyhow::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(self.header())?;
        for row in rows {
            writer.write_record(self.cells(row))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradebook::TableSource;
    use crate::table::{AbsenceTable, GradesTable};
    use crate::{attendance, average, performance};

    fn enriched_book() -> GradeBook {
        let grades = GradesTable::from_rows(
            vec!["P1".into(), "P2".into()],
            vec![
                ("John".into(), vec![4.5, 5.6]),
                ("Kate".into(), vec![6.7, 7.8]),
                ("Elijah".into(), vec![8.5, 9.1]),
            ],
        )
        .unwrap();
        let absences = AbsenceTable::from_rows(vec![
            (
                "John".to_string(),
                vec![true, false, false, true, true, false, true],
            ),
            ("Kate".to_string(), vec![true, true, true, true]),
        ])
        .unwrap();
        let mut book = GradeBook::new(
            TableSource::FromTable(grades),
            Some(TableSource::FromTable(absences)),
        )
        .unwrap();

        let avg = average::compute_average(&book, None).unwrap();
        book.merge_avg(avg);
        let att = attendance::compute_all_percent(book.absences().unwrap());
        book.merge_attendance(att);
        let perf =
            performance::classify_all(&book, book.avg_column().cloned().as_ref().unwrap());
        book.merge_performance(perf);
        book
    }

    #[test]
    fn assemble_preserves_base_order_and_partial_attendance() {
        let book = enriched_book();
        let report = assemble(&book).unwrap();
        let names: Vec<&str> = report.rows().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["John", "Kate", "Elijah"]);
        assert_eq!(report.rows()[0].att_percent, Some(57.1));
        assert_eq!(report.rows()[2].att_percent, None);
        // John attended 4 of 7 sessions: forced to SR
        assert_eq!(report.rows()[0].perf, PerformanceCategory::SR);
        assert_eq!(report.rows()[2].perf, PerformanceCategory::MS);
    }

    #[test]
    fn sorted_view_is_descending_and_leaves_rows_alone() {
        let book = enriched_book();
        let report = assemble(&book).unwrap();
        let sorted = report.sorted_by(AVG_COLUMN).unwrap();
        let names: Vec<&str> = sorted.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Elijah", "Kate", "John"]);
        // base order intact after sorting
        assert_eq!(report.rows()[0].name, "John");
    }

    #[test]
    fn sorting_by_an_unknown_column_fails() {
        let book = enriched_book();
        let report = assemble(&book).unwrap();
        let err = report.sorted_by("P9").unwrap_err();
        assert!(matches!(err, GradeBookError::UnknownColumn(_)));
    }

    #[test]
    fn stray_derived_name_is_a_join_mismatch() {
        let mut book = enriched_book();
        let mut avg = book.avg_column().unwrap().clone();
        avg.insert("Ghost".to_string(), 5.0);
        book.merge_avg(avg);
        let err = assemble(&book).unwrap_err();
        match err {
            GradeBookError::JoinMismatch { column, name } => {
                assert_eq!(column, AVG_COLUMN);
                assert_eq!(name, "Ghost");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_avg_for_a_base_student_is_a_join_mismatch() {
        let mut book = enriched_book();
        let mut avg = book.avg_column().unwrap().clone();
        avg.remove("Kate");
        book.merge_avg(avg);
        let err = assemble(&book).unwrap_err();
        assert!(matches!(err, GradeBookError::JoinMismatch { .. }));
    }

    #[test]
    fn unmerged_columns_are_reported_as_missing() {
        let grades =
            GradesTable::from_rows(vec!["P1".into()], vec![("John".into(), vec![4.0])]).unwrap();
        let book = GradeBook::new(TableSource::FromTable(grades), None).unwrap();
        let err = assemble(&book).unwrap_err();
        assert!(matches!(err, GradeBookError::MissingDerived(AVG_COLUMN)));
    }

    #[test]
    fn text_rendering_includes_every_column() {
        let book = enriched_book();
        let report = assemble(&book).unwrap();
        let sorted = report.sorted_by(AVG_COLUMN).unwrap();
        let text = report.to_text(&sorted);
        assert!(text.contains("att[%]"));
        assert!(text.contains("Elijah"));
        assert!(text.contains("8.80"));
    }

    #[test]
    fn csv_export_round_trips_through_the_csv_reader() {
        let book = enriched_book();
        let report = assemble(&book).unwrap();
        let rows: Vec<&ReportRow> = report.rows().iter().collect();
        let file = tempfile::NamedTempFile::new().unwrap();
        report.write_csv(file.path(), &rows).unwrap();

        let mut reader = csv::Reader::from_path(file.path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            ["name", "P1", "P2", "avg", "att[%]", "perf"]
        );
        assert_eq!(reader.records().count(), 3);
    }
}
