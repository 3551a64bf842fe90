use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use log::warn;
use serde::Serialize;

use crate::data::layout::RosterLayout;
use crate::data::loader::{load_roster, load_roster_async, LoadFailure};
use crate::data::model::Roster;

// ---------------------------------------------------------------------------
// Report – what gets printed for a roster
// ---------------------------------------------------------------------------

/// Head counts for a roster, rendered by `Display` as:
///
/// ```text
/// Number of students: 3
/// Number of students in CS: 2. List: Johann, Jonathan
/// Number of students in SWE: 1. List: Arielle
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total: usize,
    pub fields: Vec<FieldSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub count: usize,
    pub names: Vec<String>,
}

impl From<&Roster> for Report {
    fn from(roster: &Roster) -> Self {
        let fields = roster
            .groups
            .iter()
            .map(|group| FieldSummary {
                field: group.field.clone(),
                count: group.len(),
                names: group.names.clone(),
            })
            .collect();
        Report {
            total: roster.len(),
            fields,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of students: {}", self.total)?;
        for summary in &self.fields {
            writeln!(
                f,
                "Number of students in {}: {}. List: {}",
                summary.field,
                summary.count,
                summary.names.join(", ")
            )?;
        }
        Ok(())
    }
}

/// Write the text report for `roster` to `out`.
pub fn write_report<W: Write>(out: &mut W, roster: &Roster) -> io::Result<()> {
    write!(out, "{}", Report::from(roster))
}

/// Write the report and flush; a failed write (closed stdout) is logged, not fatal.
fn emit_report<W: Write>(out: &mut W, roster: &Roster) {
    if let Err(err) = write_report(&mut *out, roster).and_then(|()| out.flush()) {
        warn!("cannot write roster report: {err}");
    }
}

fn print_report(roster: &Roster) {
    emit_report(&mut io::stdout().lock(), roster);
}

// ---------------------------------------------------------------------------
// count_students
// ---------------------------------------------------------------------------

/// Load the roster at `path` and print its report to stdout.
///
/// Returns the number of students. On failure nothing is printed.
pub fn count_students(path: impl AsRef<Path>) -> Result<usize, LoadFailure> {
    count_students_with(path, &RosterLayout::default())
}

pub fn count_students_with(
    path: impl AsRef<Path>,
    layout: &RosterLayout,
) -> Result<usize, LoadFailure> {
    let roster = load_roster(path, layout)?;
    print_report(&roster);
    Ok(roster.len())
}

/// Async counterpart of [`count_students`]; resolves once, after the read.
pub async fn count_students_async(path: impl AsRef<Path>) -> Result<usize, LoadFailure> {
    count_students_async_with(path, &RosterLayout::default()).await
}

pub async fn count_students_async_with(
    path: impl AsRef<Path>,
    layout: &RosterLayout,
) -> Result<usize, LoadFailure> {
    let roster = load_roster_async(path, layout).await?;
    print_report(&roster);
    Ok(roster.len())
}
