//! Sniffs shipped with the crate.
//!
//! Sniffs are grouped by standard, one module per standard. Each sniff
//! lives in its own file and exposes its code as `CODE`.

pub mod generic;

use crate::sniff::SniffDefinition;

/// Definitions of every built-in sniff, in registration order.
pub fn builtin_sniffs() -> Vec<SniffDefinition> {
    generic::sniffs()
}
