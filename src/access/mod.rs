//! Field paths and path-based access into JSON-like trees.
//!
//! A [`TreePath`] is parsed once, when a binding is declared, and reused for
//! every marshalling call. [`get`] and [`set`] walk a
//! [`Value`](serde_json::Value) tree along a path; `set` materializes
//! intermediate objects so that multi-segment fields such as `address.city`
//! build their enclosing structure on demand.

mod path;
mod tree;

pub use path::TreePath;
pub use tree::{get, get_or, set};
