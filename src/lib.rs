//! A compact, memory-efficient associative data structure family for
//! 32-bit unsigned integer keys.
//!
//! The crate is built from two layered components:
//!
//! - [`trie`] — a three-level multibit trie (`Trie<V>`), a sparse map
//!   from a bounded `u32` index to an opaque, caller-owned leaf value.
//! - [`bitmap`] — a trie-backed bitmap (`Bitmap`), a sparse boolean
//!   function over `[0, maxPos]` that reuses the trie's L0/L1 topology
//!   and adds a saturation-compression scheme for fully-set L2 nodes.
//!
//! Both structures are single-writer: all mutating methods take `&mut
//! self` and all reading methods take `&self`, so the borrow checker
//! enforces the exclusive-access contract at compile time rather than
//! leaving it as a documented precondition.

pub mod bitmap;
pub mod error;
pub mod stats;
pub mod trie;

pub use bitmap::Bitmap;
pub use trie::Trie;
