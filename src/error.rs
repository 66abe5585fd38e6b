/*
 * SPDX-FileCopyrightText: 2024 pdtrie contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Errors for the one genuinely fallible surface of this crate: reading
//! back the wire format of a finished trie (see [`crate::io`]).
//!
//! Everything else — unsorted keys, prefix violations, out-of-range
//! queries — is a programmer error and is reported with `assert!`/
//! `debug_assert!` rather than a recoverable `Result`.

/// Failure reading a serialized [`crate::trie::query::PathDecomposedTrie`].
#[derive(thiserror::Error, Debug)]
pub enum PdtrieError {
    /// The stream ended before the declared length was satisfied.
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    /// A declared length does not fit in this platform's `usize`.
    #[error("length for {0} overflows usize")]
    LengthOverflow(&'static str),
    /// The `BP` bitmap read back from the stream is not balanced, i.e.
    /// it does not have an equal number of `(` and `)` bits. A trie can
    /// never be queried safely once this invariant is broken, so it is
    /// checked once at load time rather than left to surface later as a
    /// panic in `find_open`/`find_close`.
    #[error("BP bitmap is not balanced: {opens} opening vs {closes} closing parentheses")]
    UnbalancedParentheses {
        /// Number of `1` (opening) bits found.
        opens: u64,
        /// Number of `0` (closing) bits found.
        closes: u64,
    },
}

/// Convenience alias for fallible I/O in this crate.
pub type Result<T> = core::result::Result<T, PdtrieError>;
