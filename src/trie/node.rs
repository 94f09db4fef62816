//! L1/L2 node shapes for [`crate::trie::Trie`].
//!
//! Both node kinds carry a `cnt` of non-null children and a
//! fixed-length array of `2^stride` slots allocated once, at node
//! creation time, and never resized — the Rust stand-in for the
//! flexible-array-member nodes of the C original (see spec §9).

/// Level 2 node: holds up to `2^s2` opaque leaves.
pub(crate) struct L2Node<V> {
    pub(crate) cnt: u32,
    pub(crate) leaves: Box<[Option<V>]>,
}

impl<V> L2Node<V> {
    pub(crate) fn new(len: usize) -> Self {
        let mut leaves = Vec::with_capacity(len);
        leaves.resize_with(len, || None);
        Self {
            cnt: 0,
            leaves: leaves.into_boxed_slice(),
        }
    }
}

/// Level 1 node: holds up to `2^s1` references to L2 nodes.
pub(crate) struct L1Node<V> {
    pub(crate) cnt: u32,
    pub(crate) children: Box<[Option<Box<L2Node<V>>>]>,
}

impl<V> L1Node<V> {
    pub(crate) fn new(len: usize) -> Self {
        let mut children = Vec::with_capacity(len);
        children.resize_with(len, || None);
        Self {
            cnt: 0,
            children: children.into_boxed_slice(),
        }
    }
}
