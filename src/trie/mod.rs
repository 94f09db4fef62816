//! The three-level multibit trie: a sparse map from a bounded `u32`
//! index to an opaque, caller-owned leaf value.
//!
//! See [`Trie`] for the public surface. Concerns are split into node
//! shapes ([`node`]), allocation/point-access ([`tree`]), and ordered
//! traversal ([`iter`]).

mod iter;
mod node;
mod tree;

pub use tree::{Trie, MAX_STRIDE};
