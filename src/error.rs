//! Error types returned by [`crate::trie`] and [`crate::bitmap`].
//!
//! Each failing operation gets its own small enum rather than one
//! shared taxonomy, following the split between `PrefixStoreError` and
//! `FatalError` this crate was grounded on: the caller should be able
//! to match on exactly the outcomes a given call can produce.

use std::fmt;

/// A requested stride length does not fit the counters used at that
/// trie level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrideError {
    pub level: u8,
    pub stride: u8,
    pub max_stride: u8,
}

impl fmt::Display for StrideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stride length {} at level {} exceeds the maximum of {}",
            self.stride, self.level, self.max_stride
        )
    }
}

impl std::error::Error for StrideError {}

/// [`crate::trie::Trie::insert`] failed.
///
/// Unlike the C original, where the rejected leaf pointer was simply
/// left owned by the caller, a Rust `insert` that fails must hand the
/// leaf value back rather than drop it silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError<V> {
    /// The index exceeds the trie's configured `max_index`.
    IndexOutOfRange { leaf: V, max_index: u32 },
    /// There is already a leaf stored at this index.
    Occupied { leaf: V },
}

impl<V> InsertError<V> {
    /// Recovers the leaf value that could not be inserted.
    pub fn into_leaf(self) -> V {
        match self {
            InsertError::IndexOutOfRange { leaf, .. } => leaf,
            InsertError::Occupied { leaf } => leaf,
        }
    }
}

impl<V> fmt::Display for InsertError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::IndexOutOfRange { max_index, .. } => {
                write!(f, "index is out of range (max index is {max_index})")
            }
            InsertError::Occupied { .. } => {
                write!(f, "index is already occupied")
            }
        }
    }
}

impl<V: fmt::Debug> std::error::Error for InsertError<V> {}

/// [`crate::trie::Trie::free`] failed: the trie still has entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotEmptyError {
    pub num_entries: u32,
}

impl fmt::Display for NotEmptyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trie still has {} entries; call delete_all first",
            self.num_entries
        )
    }
}

impl std::error::Error for NotEmptyError {}

/// [`crate::bitmap::Bitmap::new`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapAllocError {
    /// `max_pos` is at or above `2^29`, the largest position the
    /// stride table covers.
    MaxPosTooLarge { max_pos: u32 },
}

impl fmt::Display for BitmapAllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitmapAllocError::MaxPosTooLarge { max_pos } => write!(
                f,
                "max_pos {max_pos} is too large (must be < 2^29)"
            ),
        }
    }
}

impl std::error::Error for BitmapAllocError {}

/// A bitmap operation was given a bit position outside `[0, max_pos]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapRangeError {
    pub pos: u32,
    pub max_pos: u32,
}

impl fmt::Display for BitmapRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bit position {} is out of range (max_pos is {})",
            self.pos, self.max_pos
        )
    }
}

impl std::error::Error for BitmapRangeError {}

/// A block operation was given an invalid or out-of-range range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapBlockError {
    EndOutOfRange { end: u32, max_pos: u32 },
    StartAfterEnd { start: u32, end: u32 },
}

impl fmt::Display for BitmapBlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitmapBlockError::EndOutOfRange { end, max_pos } => {
                write!(f, "end {end} is out of range (max_pos is {max_pos})")
            }
            BitmapBlockError::StartAfterEnd { start, end } => {
                write!(f, "start {start} is greater than end {end}")
            }
        }
    }
}

impl std::error::Error for BitmapBlockError {}
