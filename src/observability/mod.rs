//! Diagnostics for the adapter
//!
//! The only observability surface this crate carries is per-operation
//! tracing: one line per virtual-filesystem call, with its parameters and
//! outcome. Tracing is held as an explicit collaborator by the adapter and
//! toggled at runtime; it is never consulted for control flow.

mod trace;

pub use trace::Trace;
