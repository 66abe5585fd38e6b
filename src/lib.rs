/*
 * SPDX-FileCopyrightText: 2024 pdtrie contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod bits;
// `thiserror`'s derive requires `std::error::Error`, so the one fallible
// surface this crate has (reading back the wire format) only exists
// alongside the `std`-gated `io` module that is its sole caller.
#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod io;
pub mod trie;

#[cfg(feature = "std")]
pub use error::{PdtrieError, Result};
pub use trie::query::PathDecomposedTrie;

/// A trie whose heavy paths were chosen lexicographically (always the
/// first child of each compacted-trie node).
pub type LexTrie = PathDecomposedTrie<true>;

/// A trie whose heavy paths were chosen by subtree size (the child
/// covering the most leaves, ties toward the first seen).
pub type CentroidTrie = PathDecomposedTrie<false>;

/// Re-exports the pieces most callers need: the two trie aliases, the
/// builders underneath them, and the error type.
pub mod prelude {
    pub use crate::bits::bp::BpVector;
    pub use crate::bits::rank_select::RsBitVector;
    pub use crate::bits::storage::{BitVector, BitVectorBuilder};
    #[cfg(feature = "std")]
    pub use crate::error::{PdtrieError, Result};
    pub use crate::trie::compacted::{CompactedTrieBuilder, TreeBuilder};
    pub use crate::trie::decompose::DefaultTreeBuilder;
    pub use crate::trie::query::PathDecomposedTrie;
    pub use crate::{CentroidTrie, LexTrie};
}
