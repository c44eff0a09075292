//! Domain types and field rules.

pub mod listing;
pub mod status;
pub mod timestamp;
pub mod validation;

pub use listing::{CaseSortBy, SortOrder};
pub use status::CaseStatus;
