pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod presets;
pub mod views;

#[cfg(test)]
mod testing;

pub use error::{DeckError, DeckResult};
pub use filter::{DateRange, FilterCriteria, FilterFacets};
pub use model::*;
pub use parser::{ParsedQuickTask, ParserOptions, QuickTaskParser, WeekdayPolicy};
pub use presets::{FilterPreset, FilterPresets};
pub use views::{Board, BoardColumn, CalendarDay};
