//! Shared vocabulary for the omniquery crates.
//!
//! - [`BackendType`]: closed enumeration of supported storage engines
//! - [`BackendFamily`]: relational, document, wide-column or key-value
//! - [`SqlFlavor`]: identifier quoting, placeholders and literal rules per SQL flavor
//! - [`ColumnMetadata`]: column description handed over by schema introspection
//! - [`literal`]: date and identifier literal shapes shared by every codec

mod backend;
mod column;
mod flavor;
pub mod literal;

pub use backend::{BackendFamily, BackendType};
pub use column::{find_column, ColumnMetadata};
pub use flavor::SqlFlavor;
