//! Documents as the tool sees them: identified, flattened and typed.
//!
//! - [`id_field`], [`id_fields`], [`extract_id`], [`composite_id`],
//!   [`primary_key_projection`]: which field(s) identify a record, per backend
//! - [`flatten`] / [`unflatten`]: nested documents to addressable leaf fields
//!   and back
//! - [`detect_type`], [`infer_column_type`]: semantic types of values and
//!   sampled columns
//! - [`format_cell`], [`normalize_value`]: plain renderings of extended JSON
//!   values for grids and exports
//!
//! # Round trip
//!
//! ```rust
//! use omniquery_document::{flatten, unflatten, FlattenOptions};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "_id": {"$oid": "507f1f77bcf86cd799439011"},
//!     "address": {"city": "Oslo", "zip": "0150"},
//!     "orders": [{"sku": "A1", "qty": 2}, {"sku": "B7", "qty": 1}]
//! });
//!
//! let fields = flatten(&doc, &FlattenOptions::default());
//! assert_eq!(fields[3].path, "orders.0.sku");
//! assert_eq!(unflatten(&fields), doc);
//! ```

mod detect;
mod flatten;
mod format;
mod identity;
mod infer;

// Re-export public API
pub use detect::{detect_type, ValueType};
pub use flatten::{
    flatten, unflatten, unflatten_pairs, ArrayNotation, FlattenOptions, FlattenedField,
    MAX_INDEX_GAP,
};
pub use format::{format_cell, normalize_value, to_iso8601};
pub use identity::{
    composite_id, extract_id, id_field, id_fields, primary_key_projection, DocumentIdInfo,
    DEFAULT_SEPARATOR, FALLBACK_ID_FIELDS,
};
pub use infer::{infer_column_type, InferredColumnType, DEFAULT_MAX_SAMPLES};
