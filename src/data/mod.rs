/// Data layer: roster layout, loading, and the grouped model.
///
/// Architecture:
/// ```text
///   roster.csv ──(sync / async read)──┐
///                                     ▼
///   ┌──────────┐   RosterLayout   ┌──────────┐
///   │  layout   │ ───────────────▶ │  loader   │  text → StudentRecord lines
///   └──────────┘                  └──────────┘
///                                     │
///                                     ▼
///                              ┌──────────────┐
///                              │    Roster     │  records + FieldGroups
///                              └──────────────┘
/// ```

pub mod layout;
pub mod loader;
pub mod model;
