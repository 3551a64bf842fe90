//! Student roster loader: reads a comma-separated roster, groups students
//! by field of study and prints head counts.

pub mod data;
pub mod report;

pub use data::layout::{FieldColumn, HeaderRule, RosterLayout};
pub use data::loader::{load_roster, load_roster_async, parse_roster, LoadFailure};
pub use data::model::{FieldGroup, FieldGroups, Roster, StudentRecord};
pub use report::{
    count_students, count_students_async, count_students_async_with, count_students_with,
    write_report, FieldSummary, Report,
};
