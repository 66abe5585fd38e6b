/*
 * SPDX-FileCopyrightText: 2024 pdtrie contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The read-only query engine: `index(key)` and `access(idx)` over the
//! `(L, B, BP, word_positions)` streams emitted by
//! [`crate::trie::decompose`], navigated entirely through rank/select
//! and BP `find_open`/`find_close`/`predecessor0`/`successor0`.

use alloc::vec::Vec;

use crate::bits::bp::BpVector;
use crate::bits::storage::BitVector;
use crate::trie::compacted::CompactedTrieBuilder;
use crate::trie::decompose::{self, DefaultTreeBuilder, DELIMITER, SPECIAL_CHAR_FLAG};

/// Zero-sized marker tying a [`PathDecomposedTrie`] to the `LEX`
/// policy it was built with, so the const generic has somewhere to
/// appear in the struct body.
#[derive(Debug, Default, Clone, Copy)]
struct Variant<const LEX: bool>;

/// A finished succinct path-decomposed trie: a sorted, prefix-free set
/// of byte strings queryable by [`Self::index`] and [`Self::access`].
///
/// `LEX` is the same compile-time policy switch as
/// [`DefaultTreeBuilder`]'s: `true` built its heavy paths
/// lexicographically, `false` by centroid. See [`crate::LexTrie`] and
/// [`crate::CentroidTrie`] for the two instantiations this crate uses.
#[derive(Debug)]
pub struct PathDecomposedTrie<const LEX: bool> {
    labels: Vec<u16>,
    branches: Vec<u8>,
    bp: BpVector,
    word_positions: Vec<u64>,
    _variant: Variant<LEX>,
}

impl<const LEX: bool> PathDecomposedTrie<LEX> {
    /// Builds a trie from `keys`, a stream that need not be pre-sorted
    /// by the caller only in the sense that it *must already be*
    /// sorted and prefix-free — this is a precondition, not something
    /// this function checks beyond debug assertions.
    pub fn build<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        let mut builder = CompactedTrieBuilder::new(DefaultTreeBuilder::<LEX>::new());
        let mut terminated = Vec::new();
        for key in keys {
            terminated.clear();
            terminated.extend_from_slice(key.as_ref());
            debug_assert!(!terminated.contains(&0), "keys must not contain an embedded NUL byte");
            terminated.push(0);
            builder.append(&terminated);
        }
        let root = builder.finish();
        Self::from_subtree(root)
    }

    pub(crate) fn from_subtree(root: decompose::Subtree) -> Self {
        let (labels, branches, bp_builder) = decompose::into_streams(root);
        debug_assert_eq!(labels.last(), Some(&DELIMITER), "every trie must end in a delimiter token");

        let bv: BitVector = bp_builder.into();
        let rs = crate::bits::rank_select::RsBitVector::new(bv, false, true);
        let bp = BpVector::new(rs);

        let mut word_positions = Vec::new();
        word_positions.push(0u64);
        for i in 0..labels.len().saturating_sub(1) {
            if labels[i] == DELIMITER {
                word_positions.push(i as u64 + 1);
            }
        }
        word_positions.push(labels.len() as u64);

        log::debug!(
            "path-decomposed trie built: |L|={}, |B|={}, |BP|={}",
            labels.len(),
            branches.len(),
            bp.len()
        );

        PathDecomposedTrie { labels, branches, bp, word_positions, _variant: Variant }
    }

    pub fn size(&self) -> usize {
        self.labels.len() + self.branches.len() + self.bp.len() as usize
    }

    pub fn labels(&self) -> &[u16] {
        &self.labels
    }

    pub fn branches(&self) -> &[u8] {
        &self.branches
    }

    pub fn bp(&self) -> &BpVector {
        &self.bp
    }

    /// Raw node-start offsets into `labels`, plus the trailing
    /// sentinel, for serialization.
    pub(crate) fn word_positions_slice(&self) -> &[u64] {
        &self.word_positions
    }

    /// Rebuilds a trie directly from its four streams, bypassing the
    /// compacted-trie builder. Used by [`crate::io`] to load a
    /// previously serialized trie.
    pub(crate) fn from_raw_parts(labels: Vec<u16>, branches: Vec<u8>, bp: BpVector, word_positions: Vec<u64>) -> Self {
        PathDecomposedTrie { labels, branches, bp, word_positions, _variant: Variant }
    }

    /// Number of nodes in the trie (leaves and internal heavy-path
    /// chains both count), i.e. `|word_positions| - 1`.
    pub fn num_nodes(&self) -> usize {
        self.word_positions.len() - 1
    }

    /// `(branch_end, num)`: `branch_end` is the absolute index in `B`
    /// of the last off-path branch belonging to `node_idx`; `num` is
    /// how many consecutive `B` entries belong to it.
    fn branch_idx_by_node_idx(&self, node_idx: u64) -> (i64, u64) {
        let bp_idx = self.bp.select0(node_idx);
        let branch_end = self.bp.rank(bp_idx) as i64 - 2;
        if node_idx == 0 {
            return (branch_end, (branch_end + 1) as u64);
        }
        let pred = self.bp.predecessor0(bp_idx - 1).expect("non-root node must follow a ')' in BP");
        let num = bp_idx - pred - 1;
        (branch_end, num)
    }

    fn node_idx_by_branch_bp_idx(&self, branch_bp_idx: u64) -> u64 {
        debug_assert!(branch_bp_idx != 0 && self.bp.get(branch_bp_idx));
        let close = self.bp.find_close(branch_bp_idx);
        let succ = self.bp.successor0(close + 1).expect("every off-path child closes before the trie ends");
        self.bp.rank0(succ)
    }

    /// `(parent_idx, branch_byte, branch_idx)` for any non-root node:
    /// the byte of the edge connecting `node_idx` to its parent, and
    /// `branch_idx`, its absolute position in `B` — the same `j` that
    /// [`Self::index`]'s branch search would have matched against.
    fn parent_node_branch(&self, node_idx: u64) -> Option<(u64, u8, i64)> {
        if node_idx == 0 {
            return None;
        }
        let node_bp = self.bp.select0(node_idx);
        let pred = self.bp.predecessor0(node_bp - 1).expect("non-root node must follow a ')' in BP");
        let parent_open = self.bp.find_open(pred);
        let parent_idx = self.bp.rank0(parent_open);
        let parent_end = self.bp.successor0(parent_open).expect("parent node must have a closing ')'");
        let branch_idx =
            self.bp.rank(parent_end) as i64 - 2 + parent_open as i64 + 1 - parent_end as i64;
        debug_assert!(branch_idx >= 0);
        let branch_byte = self.branches[branch_idx as usize];
        Some((parent_idx, branch_byte, branch_idx))
    }

    /// Looks up `key`, returning its node index or `None` if absent.
    pub fn index(&self, key: &[u8]) -> Option<u64> {
        let mut cur_node = 0u64;
        let mut i = 0usize;
        loop {
            let mut label_cur = self.word_positions[cur_node as usize];
            let (branch_end, all_branch_num) = self.branch_idx_by_node_idx(cur_node);
            let mut branch_cursor = (branch_end + 1) as u64 - all_branch_num;
            let node_bp_idx = self.bp.select0(cur_node);

            loop {
                let tok = self.labels[label_cur as usize];
                if tok == DELIMITER {
                    return if i == key.len() { Some(cur_node) } else { None };
                }
                if i >= key.len() {
                    return None;
                }
                if tok & SPECIAL_CHAR_FLAG != 0 {
                    let heavy_byte = self.labels[label_cur as usize + 1] as u8;
                    let local_branches = (tok & 0xFF) as u64 + 1;
                    if heavy_byte == key[i] {
                        branch_cursor += local_branches;
                        i += 1;
                        label_cur += 2;
                        continue;
                    } else {
                        let branch_stop = branch_cursor + local_branches;
                        let mut found = None;
                        let mut j = branch_cursor;
                        while j < branch_stop {
                            if self.branches[j as usize] == key[i] {
                                found = Some(j);
                                break;
                            }
                            j += 1;
                        }
                        match found {
                            Some(j) => {
                                i += 1;
                                let child_bp = node_bp_idx + j - (branch_end + 1) as u64;
                                cur_node = self.node_idx_by_branch_bp_idx(child_bp);
                                break;
                            }
                            None => return None,
                        }
                    }
                } else if (tok as u8) == key[i] {
                    i += 1;
                    label_cur += 1;
                } else {
                    return None;
                }
            }
        }
    }

    /// Reconstructs the key stored at `idx`, or an empty vector if
    /// `idx` is out of range.
    ///
    /// `idx`'s own heavy-path slice, read start to end always taking
    /// the heavy byte at a marker, is the *suffix* of the key (`idx`
    /// names the exact node its own heavy descent terminates at). Each
    /// ancestor then contributes only the *prefix* of its own slice up
    /// to the one marker where the climb actually branched off — not
    /// the ancestor's full slice, which would run past that point into
    /// a sibling's territory.
    pub fn access(&self, idx: u64) -> Vec<u8> {
        if idx + 1 >= self.word_positions.len() as u64 {
            return Vec::new();
        }
        let mut segments: Vec<Vec<u8>> = alloc::vec![self.node_own_bytes(idx)];
        let mut cur = idx;
        loop {
            match self.parent_node_branch(cur) {
                None => break,
                Some((parent_idx, branch_byte, branch_idx)) => {
                    segments.push(alloc::vec![branch_byte]);
                    segments.push(self.node_prefix_before_branch(parent_idx, branch_idx));
                    cur = parent_idx;
                }
            }
        }
        segments.reverse();
        segments.concat()
    }

    /// The bytes owned directly by `node_idx`'s heavy-path label
    /// slice, always following the heavy byte at each branch marker
    /// (this node's identity *is* that heavy continuation), all the
    /// way to its own terminating delimiter.
    fn node_own_bytes(&self, node_idx: u64) -> Vec<u8> {
        let mut out = Vec::new();
        let mut cursor = self.word_positions[node_idx as usize];
        loop {
            let tok = self.labels[cursor as usize];
            if tok == DELIMITER {
                break;
            }
            if tok & SPECIAL_CHAR_FLAG != 0 {
                let heavy = self.labels[cursor as usize + 1];
                debug_assert_eq!(heavy >> 8, 0, "branch marker must be followed by a plain byte token");
                out.push(heavy as u8);
                cursor += 2;
            } else {
                out.push(tok as u8);
                cursor += 1;
            }
        }
        out
    }

    /// `node_idx`'s own label slice, read from the start but stopping
    /// right before the marker whose branch group contains
    /// `target_branch_idx` — the portion of its heavy descent that
    /// actually lies on the path to that off-path child.
    fn node_prefix_before_branch(&self, node_idx: u64, target_branch_idx: i64) -> Vec<u8> {
        let mut out = Vec::new();
        let mut cursor = self.word_positions[node_idx as usize];
        let (branch_end, all_branch_num) = self.branch_idx_by_node_idx(node_idx);
        let mut branch_cursor = (branch_end + 1) as u64 - all_branch_num;
        loop {
            let tok = self.labels[cursor as usize];
            debug_assert_ne!(tok, DELIMITER, "branch point must occur before this node's own delimiter");
            if tok & SPECIAL_CHAR_FLAG != 0 {
                let local_branches = (tok & 0xFF) as u64 + 1;
                let group_end = branch_cursor as i64 + local_branches as i64;
                if (branch_cursor as i64) <= target_branch_idx && target_branch_idx < group_end {
                    break;
                }
                let heavy = self.labels[cursor as usize + 1] as u8;
                out.push(heavy);
                branch_cursor += local_branches;
                cursor += 2;
            } else {
                out.push(tok as u8);
                cursor += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec;

    #[test]
    fn round_trip_nine_keys_lex() {
        let keys: Vec<&[u8]> = vec![
            b"three",
            b"trial",
            b"triangle",
            b"triangular",
            b"triangulate",
            b"triangulaus",
            b"trie",
            b"triple",
            b"triply",
        ];
        let trie = PathDecomposedTrie::<true>::build(keys.clone());

        assert_eq!(
            alloc::string::String::from_utf8(trie.branches.clone()).unwrap(),
            "rpenuuty"
        );

        for key in &keys {
            let idx = trie.index(key).unwrap_or_else(|| panic!("expected to find {:?}", key));
            let round_tripped = trie.access(idx);
            assert_eq!(&round_tripped, key);
        }
        assert_eq!(trie.index(b"pikachu"), None);
        assert_eq!(trie.index(b"tri"), None);
        assert_eq!(trie.index(b"three!"), None);
    }

    #[test]
    fn index_matches_worked_scenario() {
        let keys: Vec<&[u8]> = vec![
            b"three",
            b"trial",
            b"triangle",
            b"triangular",
            b"triangulate",
            b"triangulaus",
            b"trie",
            b"triple",
            b"triply",
        ];
        let trie = PathDecomposedTrie::<true>::build(keys);
        assert_eq!(trie.index(b"triple"), Some(7));
        assert_eq!(trie.index(b"triangulate"), Some(4));
        assert_eq!(trie.index(b"pikachu"), None);
        assert_eq!(trie.access(5), b"triangulaus");
    }

    #[test]
    fn access_out_of_range_is_empty() {
        let trie = PathDecomposedTrie::<true>::build(vec![b"a".as_slice(), b"b"]);
        assert_eq!(trie.access(10_000), Vec::<u8>::new());
    }

    #[test]
    fn single_key_round_trip_both_variants() {
        for idx in trie_variants_single_key() {
            assert_eq!(idx, Some(0));
        }
    }

    fn trie_variants_single_key() -> Vec<Option<u64>> {
        let lex = PathDecomposedTrie::<true>::build(vec![b"only".as_slice()]);
        let centroid = PathDecomposedTrie::<false>::build(vec![b"only".as_slice()]);
        vec![lex.index(b"only"), centroid.index(b"only")]
    }

    #[test]
    fn many_keys_round_trip_centroid() {
        let keys: Vec<alloc::string::String> = (0..200)
            .map(|i| alloc::format!("key-{:04}", i))
            .collect();
        let refs: Vec<&[u8]> = keys.iter().map(|s| s.as_bytes()).collect();
        let trie = PathDecomposedTrie::<false>::build(refs.clone());
        for (i, key) in refs.iter().enumerate() {
            let idx = trie.index(key).unwrap_or_else(|| panic!("missing key {}", i));
            assert_eq!(&trie.access(idx), key);
        }
        assert_eq!(trie.index(b"not-a-key"), None);
    }
}
