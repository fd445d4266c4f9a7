//! Pagination module
//!
//! Supports: Link header relations (next, previous, last) and a total-count header
//!
//! # Overview
//!
//! List responses carry a `Link` header naming adjacent pages and a count
//! header with the total number of items. Each endpoint instance records both
//! in its own [`PaginationState`] so that scoped clones paginate independently.

mod link_header;
mod types;

pub use link_header::{parse_link_header, parse_link_headers};
pub use types::{PaginationLinks, PaginationState, Rel};

/// Default name of the total-count response header
pub const DEFAULT_COUNT_HEADER: &str = "Mendeley-Count";
