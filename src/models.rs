use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Assessment column name -> non-negative weight.
pub type Weights = HashMap<String, f64>;

/// Closed set of performance labels assigned to a final average.
/// Variant order carries no meaning; categories are not comparable.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PerformanceCategory {
    SS,
    MS,
    MM,
    MI,
    II,
    SR,
    ERR,
}

impl PerformanceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceCategory::SS => "SS",
            PerformanceCategory::MS => "MS",
            PerformanceCategory::MM => "MM",
            PerformanceCategory::MI => "MI",
            PerformanceCategory::II => "II",
            PerformanceCategory::SR => "SR",
            PerformanceCategory::ERR => "ERR",
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
