use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod attendance;
mod average;
mod error;
mod gradebook;
mod models;
mod performance;
mod report;
mod table;

use gradebook::{GradeBook, TableSource};
use models::Weights;

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Weighted averages, attendance and performance ratings for a class", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report: averages, attendance, performance, sorted table
    Report {
        #[arg(long)]
        grades: PathBuf,
        #[arg(long)]
        absences: Option<PathBuf>,
        /// JSON file mapping assessment columns to weights, e.g. {"P1": 1.0}
        #[arg(long)]
        weights: Option<PathBuf>,
        #[arg(long, default_value = "avg")]
        sort_by: String,
        /// Also write the report as CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Weighted averages only, printed descending
    Average {
        #[arg(long)]
        grades: PathBuf,
        #[arg(long)]
        weights: Option<PathBuf>,
    },
    /// Attendance percentages only
    Attendance {
        #[arg(long)]
        absences: PathBuf,
    },
}

fn load_weights(path: &Path) -> anyhow::Result<Weights> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read weights file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid weights JSON in {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            grades,
            absences,
            weights,
            sort_by,
            out,
        } => {
            let mut book = GradeBook::new(
                TableSource::FromPath(grades),
                absences.map(TableSource::FromPath),
            )?;
            let weights = weights.as_deref().map(load_weights).transpose()?;

            let avg = average::compute_average(&book, weights.as_ref())?;
            book.merge_avg(avg);
            if let Some(absences) = book.absences() {
                let att = attendance::compute_all_percent(absences);
                book.merge_attendance(att);
            }
            let averages = book
                .avg_column()
                .cloned()
                .context("averages were not merged")?;
            let perf = performance::classify_all(&book, &averages);
            book.merge_performance(perf);

            let report = report::assemble(&book)?;
            let sorted = report.sorted_by(&sort_by)?;
            print!("{}", report.to_text(&sorted));

            if let Some(out) = out {
                report.write_csv(&out, &sorted)?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Average { grades, weights } => {
            let book = GradeBook::new(TableSource::FromPath(grades), None)?;
            let weights = weights.as_deref().map(load_weights).transpose()?;
            let avg = average::compute_average(&book, weights.as_ref())?;

            let mut entries: Vec<(&String, &f64)> = avg.iter().collect();
            entries.sort_by(|a, b| {
                b.1.partial_cmp(a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(b.0))
            });
            for (name, value) in entries {
                println!("{name}  {value:.2}");
            }
        }
        Commands::Attendance { absences } => {
            let table = table::load_absences(&absences)?;
            for name in table.names() {
                if let Some(fraction) = attendance::fraction(&table, name) {
                    println!("{name}  {:.1}", attendance::percentage(fraction));
                }
            }
        }
    }

    Ok(())
}
