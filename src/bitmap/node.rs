//! L1/L2 node shapes for [`crate::bitmap::Bitmap`].
//!
//! L2 nodes pack `2^s2` 32-bit words instead of the trie's opaque
//! leaves. L1 slots are tri-state rather than a plain optional
//! pointer: besides empty and "holds a real L2 node", a slot can be
//! [`L1Slot::Saturated`], meaning every bit under it is set but no L2
//! node is actually allocated — the Rust enum stand-in for the
//! reference implementation's pointer-tagging compression scheme (see
//! spec notes in SPEC_FULL.md §5).

/// Level 2 node: `2^s2` 32-bit words.
pub(crate) struct BitmapL2 {
    /// Number of words with at least one bit set.
    pub(crate) cnt: u32,
    /// Number of words with every bit set.
    pub(crate) n_set_all: u32,
    pub(crate) words: Box<[u32]>,
}

impl BitmapL2 {
    pub(crate) fn new_empty(len: usize) -> Self {
        Self {
            cnt: 0,
            n_set_all: 0,
            words: vec![0u32; len].into_boxed_slice(),
        }
    }

    pub(crate) fn new_full(len: usize) -> Self {
        Self {
            cnt: len as u32,
            n_set_all: len as u32,
            words: vec![u32::MAX; len].into_boxed_slice(),
        }
    }
}

/// A level 1 child slot: no node, a real L2 node, or a saturated
/// (fully-set, uncompressed) subtree.
pub(crate) enum L1Slot {
    Empty,
    Node(Box<BitmapL2>),
    Saturated,
}

/// Level 1 node: `2^s1` child slots.
pub(crate) struct BitmapL1 {
    /// Number of non-empty slots, counting saturated slots.
    pub(crate) cnt: u32,
    pub(crate) slots: Box<[L1Slot]>,
}

impl BitmapL1 {
    pub(crate) fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || L1Slot::Empty);
        Self {
            cnt: 0,
            slots: slots.into_boxed_slice(),
        }
    }
}
