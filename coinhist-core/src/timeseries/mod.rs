//! Series utilities shared by connectors and the gateway.
//!
//! - `bucket`: positional field extraction from schema-less exchange rows
//! - `order`: the canonical newest-first ordering
/// Positional bucket decoding helpers.
pub mod bucket;
/// Canonical series ordering.
pub mod order;
