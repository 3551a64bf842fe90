use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Terminator, Trim};
use log::{debug, warn};
use thiserror::Error;

use super::layout::{FieldColumn, RosterLayout};
use super::model::{Roster, StudentRecord};

// ---------------------------------------------------------------------------
// LoadFailure
// ---------------------------------------------------------------------------

/// The roster could not be read, or contained nothing but whitespace.
///
/// The message is fixed; the underlying I/O error, if any, is the `source()`.
#[derive(Debug, Error)]
#[error("Cannot load the database")]
pub struct LoadFailure {
    path: PathBuf,
    #[source]
    source: Option<io::Error>,
}

impl LoadFailure {
    fn unreadable(path: &Path, source: io::Error) -> Self {
        warn!("cannot read roster {}: {source}", path.display());
        Self {
            path: path.to_path_buf(),
            source: Some(source),
        }
    }

    fn blank(path: &Path) -> Self {
        warn!("roster {} has no content", path.display());
        Self {
            path: path.to_path_buf(),
            source: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the file was read but held no non-blank line.
    pub fn is_blank(&self) -> bool {
        self.source.is_none()
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and parse a roster file, blocking the calling thread for the read.
pub fn load_roster(path: impl AsRef<Path>, layout: &RosterLayout) -> Result<Roster, LoadFailure> {
    let path = path.as_ref();
    debug!("reading roster {}", path.display());
    let text = std::fs::read_to_string(path).map_err(|e| LoadFailure::unreadable(path, e))?;
    roster_from_text(path, &text, layout)
}

/// Same contract as [`load_roster`]; the read runs on the tokio runtime.
pub async fn load_roster_async(
    path: impl AsRef<Path>,
    layout: &RosterLayout,
) -> Result<Roster, LoadFailure> {
    let path = path.as_ref();
    debug!("reading roster {} (async)", path.display());
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoadFailure::unreadable(path, e))?;
    roster_from_text(path, &text, layout)
}

fn roster_from_text(path: &Path, text: &str, layout: &RosterLayout) -> Result<Roster, LoadFailure> {
    if text.trim().is_empty() {
        return Err(LoadFailure::blank(path));
    }
    let roster = parse_roster(text, layout);
    debug!(
        "{}: {} students in {} fields, {} lines skipped",
        path.display(),
        roster.len(),
        roster.groups.len(),
        roster.skipped
    );
    Ok(roster)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse roster text. Never fails: malformed lines are skipped and counted.
///
/// Lines end at `\n` and columns at `,`; quotes have no special meaning.
/// Columns are trimmed, so CRLF endings and padded cells are fine.
pub fn parse_roster(text: &str, layout: &RosterLayout) -> Roster {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut students = Vec::new();
    let mut skipped = 0;
    let mut ordinal = 0;

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                debug!("unreadable roster line: {err}");
                skipped += 1;
                continue;
            }
        };
        if is_blank(&row) {
            continue;
        }

        let is_header = layout.header.is_header(ordinal, row.get(0).unwrap_or(""));
        ordinal += 1;
        if is_header {
            debug!("header at line {}", line_no(&row));
            continue;
        }

        match student_from_row(&row, layout.field_column) {
            Some(student) => students.push(student),
            None => {
                debug!("line {}: missing first name or field, skipped", line_no(&row));
                skipped += 1;
            }
        }
    }

    Roster::from_records(students, skipped)
}

/// A whitespace-only line trims down to one empty column.
fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row.get(0).map_or(true, str::is_empty)
}

fn student_from_row(row: &StringRecord, field_column: FieldColumn) -> Option<StudentRecord> {
    let first_name = row.get(0).filter(|s| !s.is_empty())?;
    let field = field_column
        .position(row.len())
        .and_then(|idx| row.get(idx))
        .filter(|s| !s.is_empty())?;
    Some(StudentRecord::new(first_name, field))
}

fn line_no(row: &StringRecord) -> u64 {
    row.position().map_or(0, |pos| pos.line())
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io::Write;

    use tempfile::{tempdir, NamedTempFile};

    use super::*;
    use crate::data::layout::HeaderRule;

    const ROSTER: &str = "firstname,lastname,age,field
Johann,Kenitz,30,CS
Arielle,Nuelle,28,SWE
Jonathan,Peter,32,CS
";

    fn roster_file(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp
    }

    fn names(roster: &Roster) -> Vec<&str> {
        roster.students.iter().map(|s| s.first_name.as_str()).collect()
    }

    #[test]
    fn parses_the_default_layout() {
        let roster = parse_roster(ROSTER, &RosterLayout::default());
        assert_eq!(names(&roster), ["Johann", "Arielle", "Jonathan"]);
        assert_eq!(roster.groups.get("CS").unwrap().names, ["Johann", "Jonathan"]);
        assert_eq!(roster.skipped, 0);
    }

    #[test]
    fn first_line_header_with_fixed_index() {
        let layout = RosterLayout {
            header: HeaderRule::FirstLine,
            field_column: FieldColumn::Index(3),
        };
        let roster = parse_roster(ROSTER, &layout);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.groups.get("SWE").unwrap().names, ["Arielle"]);
    }

    #[test]
    fn first_line_rule_drops_a_data_line_when_there_is_no_header() {
        let text = "Johann,Kenitz,30,CS\nArielle,Nuelle,28,SWE\n";
        let prefix = parse_roster(text, &RosterLayout::default());
        assert_eq!(prefix.len(), 2);

        let first_line = parse_roster(
            text,
            &RosterLayout {
                header: HeaderRule::FirstLine,
                ..RosterLayout::default()
            },
        );
        assert_eq!(names(&first_line), ["Arielle"]);
    }

    #[test]
    fn first_line_rule_ignores_leading_blank_lines() {
        let text = "\n   \nfirstname,field\nJohann,CS\n";
        let layout = RosterLayout {
            header: HeaderRule::FirstLine,
            ..RosterLayout::default()
        };
        assert_eq!(names(&parse_roster(text, &layout)), ["Johann"]);
    }

    #[test]
    fn indented_header_is_still_a_header() {
        let text = "   firstname,lastname,age,field\nJohann,Kenitz,30,CS\n";
        let roster = parse_roster(text, &RosterLayout::default());
        assert_eq!(names(&roster), ["Johann"]);
        assert_eq!(roster.skipped, 0);
    }

    #[test]
    fn blank_lines_are_ignored_not_skipped() {
        let text = "firstname,field\n\nJohann,CS\n   \n\nArielle,SWE\n\n";
        let roster = parse_roster(text, &RosterLayout::default());
        assert_eq!(names(&roster), ["Johann", "Arielle"]);
        assert_eq!(roster.skipped, 0);
    }

    #[test]
    fn malformed_lines_are_skipped_and_counted() {
        let text = "firstname,lastname,age,field
Johann,Kenitz,30,CS
,Nobody,20,CS
Lonely
Empty,Field,22,
,,,
Arielle,Nuelle,28,SWE
";
        let roster = parse_roster(text, &RosterLayout::default());
        assert_eq!(names(&roster), ["Johann", "Arielle"]);
        assert_eq!(roster.skipped, 4);
        assert_eq!(roster.groups.len(), 2);
    }

    #[test]
    fn short_lines_fail_a_fixed_index() {
        let text = "firstname,field\nJohann,CS\n";
        let layout = RosterLayout {
            field_column: FieldColumn::Index(3),
            ..RosterLayout::default()
        };
        let roster = parse_roster(text, &layout);
        assert!(roster.is_empty());
        assert_eq!(roster.skipped, 1);
    }

    #[test]
    fn cells_are_trimmed_and_crlf_is_tolerated() {
        let text = "firstname,lastname,age,field\r\n  Johann , Kenitz , 30 , CS \r\nArielle,Nuelle,28,SWE\r\n";
        let roster = parse_roster(text, &RosterLayout::default());
        assert_eq!(roster.students[0], StudentRecord::new("Johann", "CS"));
        assert_eq!(roster.students[1], StudentRecord::new("Arielle", "SWE"));
    }

    #[test]
    fn stray_quote_does_not_swallow_later_lines() {
        let text = "firstname,lastname,age,field
\"Johann,Kenitz,30,CS
Arielle,Nuelle,28,SWE
Jonathan,Peter,32,CS
";
        let roster = parse_roster(text, &RosterLayout::default());
        assert_eq!(names(&roster), ["\"Johann", "Arielle", "Jonathan"]);
        assert_eq!(roster.groups.get("CS").unwrap().names, ["\"Johann", "Jonathan"]);
        assert_eq!(roster.skipped, 0);
    }

    #[test]
    fn quotes_are_plain_characters() {
        let text = "firstname,field\n\"Anne, Marie\",CS\nJohann\",CS\n";
        let roster = parse_roster(text, &RosterLayout::default());
        assert_eq!(
            roster.students,
            [
                StudentRecord::new("\"Anne", "CS"),
                StudentRecord::new("Johann\"", "CS"),
            ]
        );
    }

    #[test]
    fn lone_carriage_return_does_not_end_a_line() {
        let text = "firstname,field\nJohann,CS\rArielle,SWE\n";
        let roster = parse_roster(text, &RosterLayout::default());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.students[0].first_name, "Johann");
        assert_eq!(roster.students[0].field, "SWE");
    }

    #[test]
    fn header_only_file_is_an_empty_roster() {
        let tmp = roster_file("firstname,lastname,age,field\n");
        let roster = load_roster(tmp.path(), &RosterLayout::default()).unwrap();
        assert!(roster.is_empty());
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("database.csv");
        let err = load_roster(&path, &RosterLayout::default()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot load the database");
        assert_eq!(err.path(), path);
        assert!(!err.is_blank());
        let source = err.source().and_then(|e| e.downcast_ref::<io::Error>()).unwrap();
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn directory_is_a_load_failure() {
        let dir = tempdir().unwrap();
        let err = load_roster(dir.path(), &RosterLayout::default()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot load the database");
    }

    #[test]
    fn blank_file_is_a_load_failure() {
        for content in ["", "\n\n", "  \n\t\n"] {
            let tmp = roster_file(content);
            let err = load_roster(tmp.path(), &RosterLayout::default()).unwrap_err();
            assert!(err.is_blank());
            assert_eq!(err.to_string(), "Cannot load the database");
        }
    }

    #[test]
    fn invalid_utf8_is_a_load_failure() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(&[0x66, 0x6f, 0xff, 0xfe, 0x0a]).unwrap();
        let err = load_roster(tmp.path(), &RosterLayout::default()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot load the database");
    }

    #[tokio::test]
    async fn async_load_matches_blocking_load() {
        let tmp = roster_file(ROSTER);
        let layout = RosterLayout::default();
        let blocking = load_roster(tmp.path(), &layout).unwrap();
        let suspended = load_roster_async(tmp.path(), &layout).await.unwrap();
        assert_eq!(blocking, suspended);
    }

    #[tokio::test]
    async fn async_load_failures() {
        let dir = tempdir().unwrap();
        let err = load_roster_async(dir.path().join("nope.csv"), &RosterLayout::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot load the database");

        let tmp = roster_file("\n \n");
        let err = load_roster_async(tmp.path(), &RosterLayout::default())
            .await
            .unwrap_err();
        assert!(err.is_blank());
    }
}
