//! The bitmap container, allocation, and single-bit operations.

use log::{debug, trace};

use crate::bitmap::node::{BitmapL1, BitmapL2, L1Slot};
use crate::bitmap::stride::choose_strides;
use crate::error::{BitmapAllocError, BitmapRangeError};
use crate::stats::LevelStats;

#[inline]
fn mask_for(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Clears bit positions `pos..=end_pos` (inclusive) of a 32-bit word,
/// a port of `setBits32` in the reference source.
#[inline]
pub(crate) fn set_bits32(pos: u8, end_pos: u8) -> u32 {
    let low = if pos == 0 { u32::MAX } else { u32::MAX << pos };
    let high = if end_pos >= 31 {
        u32::MAX
    } else {
        (1u32 << (end_pos + 1)) - 1
    };
    low & high
}

/// A sparse boolean function over `[0, max_pos]`, backed by the same
/// three-level trie topology as [`crate::trie::Trie`] with its L2
/// leaves replaced by packed bitmap words and its L1 slots compressed
/// whenever an entire subtree becomes fully set.
pub struct Bitmap {
    pub(crate) flipped: bool,
    pub(crate) max_pos: u32,
    pub(crate) num: u32,
    pub(crate) nl1: u32,
    pub(crate) nl2: u32,
    pub(crate) s0: u8,
    pub(crate) s1: u8,
    pub(crate) s2: u8,
    pub(crate) l0: Box<[Option<Box<BitmapL1>>]>,
}

impl Bitmap {
    /// Allocates a new bitmap capable of addressing bit positions in
    /// `[0, max_bit_pos]`. The actual `max_pos()` of the returned
    /// bitmap may be larger than requested, rounded up to the nearest
    /// stride-table row.
    pub fn new(max_bit_pos: u32) -> Result<Self, BitmapAllocError> {
        let (s0, s1, s2) = choose_strides(max_bit_pos)?;
        let max_pos = (1u32 << (s0 as u32 + s1 as u32 + s2 as u32 + 5)) - 1;
        let l0_len = 1usize << s0;
        let mut l0 = Vec::with_capacity(l0_len);
        l0.resize_with(l0_len, || None);

        debug!("allocated bitmap with strides ({s0}, {s1}, {s2}), max_pos={max_pos}");
        Ok(Self {
            flipped: false,
            max_pos,
            num: 0,
            nl1: 0,
            nl2: 0,
            s0,
            s1,
            s2,
            l0: l0.into_boxed_slice(),
        })
    }

    /// The largest bit position this bitmap can address.
    pub fn max_pos(&self) -> u32 {
        self.max_pos
    }

    /// Whether [`Bitmap::set_all`]/[`Bitmap::reset_all`] last left this
    /// bitmap in its inverted sense.
    ///
    /// This is a pure bookkeeping flag: the reference implementation
    /// toggles it only at `setAll`/`resetAll` epoch boundaries and
    /// never consults it from any read or mutating path, so it carries
    /// no effect on [`Bitmap::is_set`] or any other operation here
    /// either (see the Open Question resolution in SPEC_FULL.md §5).
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Total number of words (32-bit groups) with at least one bit set.
    pub fn num_words_set(&self) -> u32 {
        self.num
    }

    pub fn num_l1(&self) -> u32 {
        self.nl1
    }

    pub fn num_l2(&self) -> u32 {
        self.nl2
    }

    pub fn l0_node_size(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.l0.len() * std::mem::size_of::<Option<Box<BitmapL1>>>()
    }

    pub fn l1_node_size(&self) -> usize {
        let l1_len = 1usize << self.s1;
        std::mem::size_of::<BitmapL1>() + l1_len * std::mem::size_of::<L1Slot>()
    }

    pub fn l2_node_size(&self) -> usize {
        let l2_len = 1usize << self.s2;
        std::mem::size_of::<BitmapL2>() + l2_len * std::mem::size_of::<u32>()
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
    pub(crate) fn decompose(&self, word_index: u32) -> (usize, usize, usize) {
        let i0 = (word_index >> (self.s1 + self.s2)) & mask_for(self.s0);
        let i1 = (word_index >> self.s2) & mask_for(self.s1);
        let i2 = word_index & mask_for(self.s2);
        (i0 as usize, i1 as usize, i2 as usize)
    }

    /// Reports whether bit `bit_pos` is set.
    pub fn is_set(&self, bit_pos: u32) -> Result<bool, BitmapRangeError> {
        if bit_pos > self.max_pos {
            return Err(BitmapRangeError {
                pos: bit_pos,
                max_pos: self.max_pos,
            });
        }
        let (i0, i1, i2) = self.decompose(bit_pos >> 5);
        let Some(l1) = self.l0[i0].as_ref() else {
            return Ok(false);
        };
        Ok(match &l1.slots[i1] {
            L1Slot::Empty => false,
            L1Slot::Saturated => true,
            L1Slot::Node(l2) => {
                let bit = 1u32 << (bit_pos & 31);
                l2.words[i2] & bit != 0
            }
        })
    }

    /// Sets a single bit.
    pub fn set(&mut self, bit_pos: u32) -> Result<(), BitmapRangeError> {
        if bit_pos > self.max_pos {
            return Err(BitmapRangeError {
                pos: bit_pos,
                max_pos: self.max_pos,
            });
        }
        let (i0, i1, i2) = self.decompose(bit_pos >> 5);
        let pos = (bit_pos & 31) as u8;
        self.set_l2_ent(i0, i1, i2, pos, pos);
        Ok(())
    }

    /// Clears a single bit.
    pub fn reset(&mut self, bit_pos: u32) -> Result<(), BitmapRangeError> {
        if bit_pos > self.max_pos {
            return Err(BitmapRangeError {
                pos: bit_pos,
                max_pos: self.max_pos,
            });
        }
        let (i0, i1, i2) = self.decompose(bit_pos >> 5);
        let pos = (bit_pos & 31) as u8;
        self.reset_l2_ent(i0, i1, i2, pos, pos);
        Ok(())
    }

    /// Sets every targeted word's bits in `pos..=end_pos`, allocating
    /// L1/L2 nodes lazily. Faithful to the reference implementation's
    /// "any bit in range already set means treat the whole call as a
    /// no-op" shortcut, and its asymmetry of never attempting
    /// saturation compression on a freshly allocated L2 node (only on
    /// one already present) — see DESIGN.md.
    pub(crate) fn set_l2_ent(&mut self, i0: usize, i1: usize, i2: usize, pos: u8, end_pos: u8) {
        let bits = set_bits32(pos, end_pos);

        if self.l0[i0].is_none() {
            let l1_len = 1usize << self.s1;
            self.l0[i0] = Some(Box::new(BitmapL1::new(l1_len)));
            self.nl1 += 1;
            trace!("allocated bitmap L1 node at i0={i0}");
        }
        let l1 = self.l0[i0].as_mut().unwrap();

        if matches!(l1.slots[i1], L1Slot::Saturated) {
            return;
        }

        if matches!(l1.slots[i1], L1Slot::Empty) {
            let l2_len = 1usize << self.s2;
            let mut l2 = BitmapL2::new_empty(l2_len);
            l2.words[i2] = bits;
            l2.cnt = 1;
            if bits == u32::MAX {
                l2.n_set_all = 1;
            }
            l1.slots[i1] = L1Slot::Node(Box::new(l2));
            l1.cnt += 1;
            self.nl2 += 1;
            self.num += 1;
            trace!("allocated bitmap L2 node at i0={i0}, i1={i1}");
            return;
        }

        let L1Slot::Node(l2) = &mut l1.slots[i1] else {
            unreachable!()
        };
        let bitmap = l2.words[i2];
        if bitmap & bits != 0 {
            return;
        }
        if bitmap == 0 {
            l2.cnt += 1;
            self.num += 1;
        }
        let new_bitmap = bitmap | bits;
        l2.words[i2] = new_bitmap;
        if new_bitmap == u32::MAX {
            l2.n_set_all += 1;
        }
        let l2_len = l2.words.len() as u32;
        if l2.n_set_all == l2_len {
            l1.slots[i1] = L1Slot::Saturated;
            self.nl2 -= 1;
            trace!("compressed bitmap L2 node at i0={i0}, i1={i1} into a saturated slot");
        }
    }

    /// Clears every targeted word's bits in `pos..=end_pos`, freeing
    /// L1/L2 nodes eagerly as their last set bit is cleared, and
    /// uncompressing a saturated slot into a real, fully-set L2 node
    /// first if needed.
    pub(crate) fn reset_l2_ent(&mut self, i0: usize, i1: usize, i2: usize, pos: u8, end_pos: u8) {
        let bits = set_bits32(pos, end_pos);

        let Some(l1) = self.l0[i0].as_mut() else {
            return;
        };

        let bitmap = match &l1.slots[i1] {
            L1Slot::Empty => return,
            L1Slot::Saturated => {
                let l2_len = 1usize << self.s2;
                l1.slots[i1] = L1Slot::Node(Box::new(BitmapL2::new_full(l2_len)));
                self.nl2 += 1;
                trace!("uncompressed saturated slot at i0={i0}, i1={i1}");
                u32::MAX
            }
            L1Slot::Node(l2) => l2.words[i2],
        };

        if (bits & !bitmap) == bits {
            return;
        }

        let l2_cnt_zero = {
            let L1Slot::Node(l2) = &mut l1.slots[i1] else {
                unreachable!()
            };
            if bitmap == u32::MAX {
                l2.n_set_all -= 1;
            }
            let new_bitmap = bitmap & !bits;
            if new_bitmap == 0 {
                l2.cnt -= 1;
                self.num -= 1;
            } else {
                l2.words[i2] = new_bitmap;
            }
            l2.cnt == 0
        };

        if l2_cnt_zero {
            l1.slots[i1] = L1Slot::Empty;
            l1.cnt -= 1;
            self.nl2 -= 1;
            trace!("freed bitmap L2 node at i0={i0}, i1={i1}");
            if l1.cnt == 0 {
                self.l0[i0] = None;
                self.nl1 -= 1;
                trace!("freed bitmap L1 node at i0={i0}");
            }
        }
    }

    /// Discards every allocated node without touching [`Bitmap::flipped`].
    pub(crate) fn destroy_all(&mut self) {
        for slot in self.l0.iter_mut() {
            *slot = None;
        }
        self.num = 0;
        self.nl1 = 0;
        self.nl2 = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_is_set() {
        let mut b = Bitmap::new(1000).unwrap();
        assert!(!b.is_set(42).unwrap());
        b.set(42).unwrap();
        assert!(b.is_set(42).unwrap());
        assert!(!b.is_set(43).unwrap());
    }

    #[test]
    fn reset_clears_bit() {
        let mut b = Bitmap::new(1000).unwrap();
        b.set(42).unwrap();
        b.reset(42).unwrap();
        assert!(!b.is_set(42).unwrap());
        assert_eq!(b.num_l2(), 0);
        assert_eq!(b.num_l1(), 0);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let b = Bitmap::new(100).unwrap();
        let max = b.max_pos();
        assert!(b.is_set(max + 1).is_err());
    }

    #[test]
    fn saturation_compresses_and_uncompresses() {
        let mut b = Bitmap::new(1000).unwrap();
        let l2_len = 1u32 << b.s2;
        let base = 0u32; // word index 0, bit positions 0..l2_len*32
        for w in 0..l2_len {
            for bit in 0..32u32 {
                b.set(base * 32 + w * 32 + bit).unwrap();
            }
        }
        assert_eq!(b.num_l2(), 0, "fully-set L2 node should compress away");
        assert!(b.is_set(0).unwrap());

        b.reset(5).unwrap();
        assert_eq!(b.num_l2(), 1, "resetting one bit should uncompress");
        assert!(!b.is_set(5).unwrap());
        assert!(b.is_set(6).unwrap());
    }
}
