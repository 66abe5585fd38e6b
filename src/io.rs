/*
 * SPDX-FileCopyrightText: 2024 pdtrie contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Wire (de)serialization of a finished [`PathDecomposedTrie`], per the
//! logical on-disk layout: `|L|` + `L` as little-endian `u16`s, `|B|` +
//! raw `B` bytes, `|BP_bits|` + `|BP_words|` + `BP` words as
//! little-endian `u64`s, `|word_positions|` + `word_positions` as
//! little-endian `u64`s. A reader rebuilds the BP rank/select index
//! with `select0_hints = true, select_hints = false`, matching the
//! builder path exactly.

use std::io::{Read, Write};

use crate::bits::bp::BpVector;
use crate::bits::rank_select::RsBitVector;
use crate::bits::storage::{BitVector, BitVectorBuilder};
use crate::error::{PdtrieError, Result};
use crate::trie::query::PathDecomposedTrie;

fn write_u64<W: Write>(w: &mut W, v: u64) -> Result<()> {
    w.write_all(&v.to_le_bytes()).map_err(|_| PdtrieError::UnexpectedEof("u64"))
}

fn read_u64<R: Read>(r: &mut R, what: &'static str) -> Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf).map_err(|_| PdtrieError::UnexpectedEof(what))?;
    Ok(u64::from_le_bytes(buf))
}

fn checked_len(n: u64, what: &'static str) -> Result<usize> {
    usize::try_from(n).map_err(|_| PdtrieError::LengthOverflow(what))
}

impl<const LEX: bool> PathDecomposedTrie<LEX> {
    /// Writes this trie's four streams in the order `L`, `B`, `BP`,
    /// `word_positions`, each prefixed by its length.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write_u64(w, self.labels().len() as u64)?;
        for &tok in self.labels() {
            w.write_all(&tok.to_le_bytes()).map_err(|_| PdtrieError::UnexpectedEof("L"))?;
        }

        write_u64(w, self.branches().len() as u64)?;
        w.write_all(self.branches()).map_err(|_| PdtrieError::UnexpectedEof("B"))?;

        let bp = self.bp();
        write_u64(w, bp.len())?;
        let words = bp.words();
        write_u64(w, words.len() as u64)?;
        for word in words {
            write_u64(w, *word)?;
        }

        let word_positions = self.word_positions_slice();
        write_u64(w, word_positions.len() as u64)?;
        for &p in word_positions {
            write_u64(w, p)?;
        }

        Ok(())
    }

    /// Reads back a trie written by [`Self::write_to`]. Rebuilds the
    /// BP rank/select index with `select0_hints = true, select_hints =
    /// false`, same as a freshly built trie.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self> {
        let label_len = checked_len(read_u64(r, "|L|")?, "|L|")?;
        let mut labels = Vec::with_capacity(label_len);
        for _ in 0..label_len {
            let mut buf = [0u8; 2];
            r.read_exact(&mut buf).map_err(|_| PdtrieError::UnexpectedEof("L"))?;
            labels.push(u16::from_le_bytes(buf));
        }

        let branch_len = checked_len(read_u64(r, "|B|")?, "|B|")?;
        let mut branches = alloc::vec![0u8; branch_len];
        r.read_exact(&mut branches).map_err(|_| PdtrieError::UnexpectedEof("B"))?;

        let bp_bits = read_u64(r, "|BP_bits|")?;
        let bp_word_len = checked_len(read_u64(r, "|BP_words|")?, "|BP_words|")?;
        let mut builder = BitVectorBuilder::with_capacity(bp_bits);
        let mut remaining_bits = bp_bits;
        for _ in 0..bp_word_len {
            let word = read_u64(r, "BP word")?;
            let take = remaining_bits.min(64) as u32;
            let masked = if take == 64 { word } else { word & ((1u64 << take) - 1) };
            builder.append_bits(masked, take);
            remaining_bits -= take as u64;
        }
        let bv: BitVector = builder.into();
        let opens = (0..bv.len()).filter(|&i| bv.get(i)).count() as u64;
        let closes = bv.len() - opens;
        if opens != closes {
            return Err(PdtrieError::UnbalancedParentheses { opens, closes });
        }
        let rs = RsBitVector::new(bv, false, true);
        let bp = BpVector::new(rs);

        let word_positions_len = checked_len(read_u64(r, "|word_positions|")?, "|word_positions|")?;
        let mut word_positions = Vec::with_capacity(word_positions_len);
        for _ in 0..word_positions_len {
            word_positions.push(read_u64(r, "word_positions entry")?);
        }

        Ok(PathDecomposedTrie::from_raw_parts(labels, branches, bp, word_positions))
    }
}
