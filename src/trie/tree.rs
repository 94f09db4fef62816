//! The trie container and its point operations: `new`, `free`,
//! `insert`, `find`, `delete`. L0/L1/L2 nodes are owned `Box` trees
//! rather than raw pointers, with lazy allocation on insert and eager
//! free once a node's last child is removed.

use log::{debug, trace};

use crate::error::{InsertError, NotEmptyError, StrideError};
use crate::stats::LevelStats;
use crate::trie::node::{L1Node, L2Node};

/// The largest stride length accepted at any level, matching the
/// reference implementation's 16-bit node-entry counter width (this
/// crate widens the counters themselves to `u32` for headroom, but
/// keeps the same stride ceiling — see DESIGN.md).
pub const MAX_STRIDE: u8 = 16;

/// A three-level multibit trie mapping `u32` indices to opaque,
/// caller-owned leaf values of type `V`.
///
/// All mutating methods take `&mut self`; all reading methods take
/// `&self`. There is no internal synchronization — concurrent access
/// from multiple threads is the caller's responsibility (see crate
/// docs), though in safe Rust this manifests as an ordinary borrow
/// conflict rather than a documented-only precondition.
pub struct Trie<V> {
    pub(crate) num: u32,
    pub(crate) cnt: u32,
    pub(crate) nl1: u32,
    pub(crate) nl2: u32,
    pub(crate) s0: u8,
    pub(crate) s1: u8,
    pub(crate) s2: u8,
    pub(crate) slen: u8,
    pub(crate) children: Box<[Option<Box<L1Node<V>>>]>,
}

#[inline]
fn mask_for(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

impl<V> Trie<V> {
    /// Allocates a new, empty trie with the given per-level stride
    /// lengths (in bits). `s0 + s1 + s2` must not exceed 32, since
    /// indices are `u32`.
    pub fn new(s0: u8, s1: u8, s2: u8) -> Result<Self, StrideError> {
        for (level, stride) in [(0u8, s0), (1, s1), (2, s2)] {
            if stride == 0 || stride > MAX_STRIDE {
                return Err(StrideError {
                    level,
                    stride,
                    max_stride: MAX_STRIDE,
                });
            }
        }
        let slen = s0 as u32 + s1 as u32 + s2 as u32;
        if slen > 32 {
            return Err(StrideError {
                level: 3,
                stride: slen as u8,
                max_stride: 32,
            });
        }

        let len = 1usize << s0;
        let mut children = Vec::with_capacity(len);
        children.resize_with(len, || None);

        debug!("allocated trie with strides ({s0}, {s1}, {s2})");
        Ok(Self {
            num: 0,
            cnt: 0,
            nl1: 0,
            nl2: 0,
            s0,
            s1,
            s2,
            slen: slen as u8,
            children: children.into_boxed_slice(),
        })
    }

    /// Consumes an empty trie. Returns the trie back (wrapped in the
    /// error) if it still holds entries — call [`Trie::delete_all`]
    /// first.
    pub fn free(self) -> Result<(), (NotEmptyError, Self)> {
        if self.num != 0 {
            let num_entries = self.num;
            return Err((NotEmptyError { num_entries }, self));
        }
        Ok(())
    }

    /// The largest index this trie can hold, `2^(s0+s1+s2) - 1`.
    pub fn max_index(&self) -> u32 {
        if self.slen >= 32 {
            u32::MAX
        } else {
            (1u32 << self.slen) - 1
        }
    }

    /// Total number of leaves currently stored.
    pub fn num_entries(&self) -> u32 {
        self.num
    }

    /// Total number of currently allocated L1 nodes.
    pub fn num_l1(&self) -> u32 {
        self.nl1
    }

    /// Total number of currently allocated L2 nodes.
    pub fn num_l2(&self) -> u32 {
        self.nl2
    }

    pub fn l0_node_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.children.len() * std::mem::size_of::<Option<Box<L1Node<V>>>>()
    }

    pub fn l1_node_size(&self) -> usize {
        let l2_len = 1usize << self.s1;
        std::mem::size_of::<L1Node<V>>()
            + l2_len * std::mem::size_of::<Option<Box<L2Node<V>>>>()
    }

    pub fn l2_node_size(&self) -> usize {
        let leaf_len = 1usize << self.s2;
        std::mem::size_of::<L2Node<V>>() + leaf_len * std::mem::size_of::<Option<V>>()
    }

    pub fn n_bytes_l0(&self) -> usize {
        self.l0_node_size()
    }

    pub fn n_bytes_l1(&self) -> usize {
        self.nl1 as usize * self.l1_node_size()
    }

    pub fn n_bytes_l2(&self) -> usize {
        self.nl2 as usize * self.l2_node_size()
    }

    /// A cheap snapshot of the node-count/byte-size counters.
    pub fn stats(&self) -> LevelStats {
        LevelStats {
            num_entries: self.num,
            num_l1: self.nl1,
            num_l2: self.nl2,
            l0_node_size: self.l0_node_size(),
            l1_node_size: self.l1_node_size(),
            l2_node_size: self.l2_node_size(),
        }
    }

    #[inline]
    pub(crate) fn decompose(&self, index: u32) -> (usize, usize, usize) {
        let i0 = (index >> (self.s1 + self.s2)) & mask_for(self.s0);
        let i1 = (index >> self.s2) & mask_for(self.s1);
        let i2 = index & mask_for(self.s2);
        (i0 as usize, i1 as usize, i2 as usize)
    }

    /// Inserts `leaf` at `index`. Fails with the leaf handed back if
    /// the index is out of range or already occupied.
    pub fn insert(&mut self, index: u32, leaf: V) -> Result<(), InsertError<V>> {
        let max_index = self.max_index();
        if index > max_index {
            return Err(InsertError::IndexOutOfRange { leaf, max_index });
        }
        let (i0, i1, i2) = self.decompose(index);

        let l1_len = 1usize << self.s1;
        let l2_len = 1usize << self.s2;

        let mut created_l1 = false;
        if self.children[i0].is_none() {
            self.children[i0] = Some(Box::new(L1Node::new(l1_len)));
            self.cnt += 1;
            self.nl1 += 1;
            created_l1 = true;
            trace!("allocated L1 node at i0={i0}");
        }
        let l1 = self.children[i0].as_mut().unwrap();

        if l1.children[i1].is_none() {
            // Allocating the L2 node can't actually fail under Rust's
            // infallible global allocator, but if it ever did, the
            // freshly created L1 above must be rolled back.
            l1.children[i1] = Some(Box::new(L2Node::new(l2_len)));
            l1.cnt += 1;
            self.nl2 += 1;
            trace!("allocated L2 node at i0={i0}, i1={i1}");
        } else if l1.children[i1].as_ref().unwrap().leaves[i2].is_some() {
            if created_l1 {
                self.children[i0] = None;
                self.cnt -= 1;
                self.nl1 -= 1;
            }
            return Err(InsertError::Occupied { leaf });
        }

        let l2 = l1.children[i1].as_mut().unwrap();
        l2.leaves[i2] = Some(leaf);
        l2.cnt += 1;
        self.num += 1;
        Ok(())
    }

    /// Removes and returns the leaf at `index`, or `None` if absent.
    pub fn delete(&mut self, index: u32) -> Option<V> {
        if index > self.max_index() {
            return None;
        }
        let (i0, i1, i2) = self.decompose(index);

        let l1 = self.children[i0].as_mut()?;
        let l2 = l1.children[i1].as_mut()?;
        let leaf = l2.leaves[i2].take()?;

        self.num -= 1;
        l2.cnt -= 1;
        if l2.cnt == 0 {
            l1.children[i1] = None;
            l1.cnt -= 1;
            self.nl2 -= 1;
            trace!("freed L2 node at i0={i0}, i1={i1}");

            if l1.cnt == 0 {
                self.children[i0] = None;
                self.cnt -= 1;
                self.nl1 -= 1;
                trace!("freed L1 node at i0={i0}");
            }
        }
        Some(leaf)
    }

    /// Looks up the leaf at `index` without mutating the trie.
    pub fn find(&self, index: u32) -> Option<&V> {
        if index > self.max_index() {
            return None;
        }
        let (i0, i1, i2) = self.decompose(index);
        self.children[i0]
            .as_ref()?
            .children[i1]
            .as_ref()?
            .leaves[i2]
            .as_ref()
    }

    /// Looks up the leaf at `index`, allowing in-place mutation.
    pub fn find_mut(&mut self, index: u32) -> Option<&mut V> {
        if index > self.max_index() {
            return None;
        }
        let (i0, i1, i2) = self.decompose(index);
        self.children[i0]
            .as_mut()?
            .children[i1]
            .as_mut()?
            .leaves[i2]
            .as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_find_delete_roundtrip() {
        let mut t: Trie<&'static str> = Trie::new(8, 8, 8).unwrap();
        t.insert(0, "a").unwrap();
        t.insert(1, "b").unwrap();
        t.insert(1 << 16, "c").unwrap();

        assert_eq!(t.find(0), Some(&"a"));
        assert_eq!(t.find(1), Some(&"b"));
        assert_eq!(t.find(1 << 16), Some(&"c"));
        assert_eq!(t.find(2), None);

        assert_eq!(t.delete(1), Some("b"));
        assert_eq!(t.find(1), None);
        assert_eq!(t.num_entries(), 2);
    }

    #[test]
    fn insert_rejects_out_of_range() {
        let mut t: Trie<u8> = Trie::new(2, 2, 2).unwrap();
        let max = t.max_index();
        let err = t.insert(max + 1, 7).unwrap_err();
        match err {
            InsertError::IndexOutOfRange { leaf, .. } => assert_eq!(leaf, 7),
            _ => panic!("wrong error variant"),
        }
    }

    #[test]
    fn insert_rejects_occupied() {
        let mut t: Trie<u8> = Trie::new(2, 2, 2).unwrap();
        t.insert(5, 1).unwrap();
        let err = t.insert(5, 2).unwrap_err();
        match err {
            InsertError::Occupied { leaf } => assert_eq!(leaf, 2),
            _ => panic!("wrong error variant"),
        }
        assert_eq!(t.find(5), Some(&1));
    }

    #[test]
    fn free_requires_empty() {
        let mut t: Trie<u8> = Trie::new(2, 2, 2).unwrap();
        t.insert(0, 1).unwrap();
        let t = match t.free() {
            Err((_, t)) => t,
            Ok(()) => panic!("free should have failed"),
        };
        let mut t = t;
        t.delete(0);
        t.free().unwrap();
    }

    #[test]
    fn stride_validation() {
        assert!(Trie::<u8>::new(0, 1, 1).is_err());
        assert!(Trie::<u8>::new(20, 20, 20).is_err());
        assert!(Trie::<u8>::new(1, 1, 1).is_ok());
    }

    // Spec §8 scenario S6: trie insert/delete parity with strides
    // (8, 8, 8).
    #[test]
    fn scenario_s6_insert_delete_parity() {
        let mut t: Trie<u32> = Trie::new(8, 8, 8).unwrap();
        let indices = [0u32, 1, (1 << 24) - 1, 1 << 23, 1 << 16];
        for &idx in &indices {
            t.insert(idx, idx).unwrap();
        }
        for &idx in &indices {
            assert_eq!(t.find(idx), Some(&idx));
        }
        for &idx in indices.iter().rev() {
            assert_eq!(t.delete(idx), Some(idx));
        }
        assert_eq!(t.num_entries(), 0);
        assert_eq!(t.num_l1(), 0);
        assert_eq!(t.num_l2(), 0);
        t.free().unwrap();
    }
}
