use std::collections::HashMap;
use std::path::Path;

use crate::error::GradeBookError;

/// Grades for one class: student name -> one score per assessment column.
/// Input row order is preserved for reporting; lookups go through the map.
#[derive(Debug, Clone)]
pub struct GradesTable {
    columns: Vec<String>,
    names: Vec<String>,
    rows: HashMap<String, Vec<f64>>,
}

impl GradesTable {
    pub fn from_rows(
        columns: Vec<String>,
        rows: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, GradeBookError> {
        let mut table = GradesTable {
            columns,
            names: Vec::with_capacity(rows.len()),
            rows: HashMap::with_capacity(rows.len()),
        };
        for (line, (name, scores)) in rows.into_iter().enumerate() {
            table.push_row(IN_MEMORY, line + 1, name, scores)?;
        }
        Ok(table)
    }

    fn push_row(
        &mut self,
        path: &str,
        line: usize,
        name: String,
        scores: Vec<f64>,
    ) -> Result<(), GradeBookError> {
        if scores.len() != self.columns.len() {
            return Err(GradeBookError::Malformed {
                path: path.to_string(),
                line,
                reason: format!(
                    "expected {} score(s) for '{}', found {}",
                    self.columns.len(),
                    name,
                    scores.len()
                ),
            });
        }
        if self.rows.contains_key(&name) {
            return Err(GradeBookError::Malformed {
                path: path.to_string(),
                line,
                reason: format!("duplicate student '{}'", name),
            });
        }
        self.names.push(name.clone());
        self.rows.insert(name, scores);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Student names in input order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn scores(&self, name: &str) -> Option<&[f64]> {
        self.rows.get(name).map(|row| row.as_slice())
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// Per-session presence marks for one class: true = present.
#[derive(Debug, Clone)]
pub struct AbsenceTable {
    names: Vec<String>,
    rows: HashMap<String, Vec<bool>>,
}

impl AbsenceTable {
    pub fn from_rows(rows: Vec<(String, Vec<bool>)>) -> Result<Self, GradeBookError> {
        let mut table = AbsenceTable {
            names: Vec::with_capacity(rows.len()),
            rows: HashMap::with_capacity(rows.len()),
        };
        for (line, (name, marks)) in rows.into_iter().enumerate() {
            table.push_row(IN_MEMORY, line + 1, name, marks)?;
        }
        Ok(table)
    }

    fn push_row(
        &mut self,
        path: &str,
        line: usize,
        name: String,
        marks: Vec<bool>,
    ) -> Result<(), GradeBookError> {
        if marks.is_empty() {
            return Err(GradeBookError::Malformed {
                path: path.to_string(),
                line,
                reason: format!("no session marks for '{}'", name),
            });
        }
        if self.rows.contains_key(&name) {
            return Err(GradeBookError::Malformed {
                path: path.to_string(),
                line,
                reason: format!("duplicate student '{}'", name),
            });
        }
        self.names.push(name.clone());
        self.rows.insert(name, marks);
        Ok(())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn marks(&self, name: &str) -> Option<&[bool]> {
        self.rows.get(name).map(|row| row.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rows.contains_key(name)
    }
}

const IN_MEMORY: &str = "<in-memory>";

fn read_lines(path: &Path) -> Result<Vec<(usize, String)>, GradeBookError> {
    let text = std::fs::read_to_string(path).map_err(|source| GradeBookError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    Ok(text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.to_string()))
        .filter(|(_, line)| !line.trim().is_empty())
        .collect())
}

/// Loads a grades file: a header line naming the assessment columns, then one
/// line per student with `name` followed by one numeric score per column.
pub fn load_grades(path: &Path) -> Result<GradesTable, GradeBookError> {
    let shown = path.display().to_string();
    let lines = read_lines(path)?;
    let Some(((_, header), body)) = lines.split_first() else {
        return Err(GradeBookError::Malformed {
            path: shown,
            line: 1,
            reason: "empty grades file".to_string(),
        });
    };

    let columns: Vec<String> = header.split_whitespace().map(str::to_string).collect();
    let mut table = GradesTable {
        columns,
        names: Vec::with_capacity(body.len()),
        rows: HashMap::with_capacity(body.len()),
    };

    for (line, raw) in body {
        let mut fields = raw.split_whitespace();
        let name = fields.next().unwrap_or_default().to_string();
        let scores = fields
            .map(|token| {
                token.parse::<f64>().map_err(|_| GradeBookError::Malformed {
                    path: shown.clone(),
                    line: *line,
                    reason: format!("non-numeric grade '{}'", token),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        table.push_row(&shown, *line, name, scores)?;
    }

    Ok(table)
}

/// Loads an absence file: no header, one line per student with `name` followed
/// by one `0`/`1` mark per session (1 = present).
pub fn load_absences(path: &Path) -> Result<AbsenceTable, GradeBookError> {
    let shown = path.display().to_string();
    let lines = read_lines(path)?;

    let mut table = AbsenceTable {
        names: Vec::with_capacity(lines.len()),
        rows: HashMap::with_capacity(lines.len()),
    };

    for (line, raw) in &lines {
        let mut fields = raw.split_whitespace();
        let name = fields.next().unwrap_or_default().to_string();
        let marks = fields
            .map(|token| match token {
                "1" => Ok(true),
                "0" => Ok(false),
                other => Err(GradeBookError::Malformed {
                    path: shown.clone(),
                    line: *line,
                    reason: format!("invalid session mark '{}'", other),
                }),
            })
            .collect::<Result<Vec<bool>, _>>()?;
        table.push_row(&shown, *line, name, marks)?;
    }

    Ok(table)
}
