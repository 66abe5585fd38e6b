/*
 * SPDX-FileCopyrightText: 2024 pdtrie contributors
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The worked LEX/CENTROID examples from the design doc, checked at the
//! stream level (`B`, `BP`) and through the public `index`/`access` API.

use pdtrie::prelude::*;

const SEVEN_KEYS: &[&[u8]] =
    &[b"three", b"trial", b"triangle", b"triangular", b"trie", b"triple", b"triply"];

#[test]
fn seven_key_lex_branch_and_shape() {
    let trie: LexTrie = LexTrie::build(SEVEN_KEYS.iter().copied());
    assert_eq!(
        std::str::from_utf8(trie.branches()).unwrap(),
        "rpenuy"
    );
    for key in SEVEN_KEYS {
        let idx = trie.index(key).unwrap();
        assert_eq!(trie.access(idx), *key);
    }
}

#[test]
fn seven_key_centroid_branch_string() {
    let trie: CentroidTrie = CentroidTrie::build(SEVEN_KEYS.iter().copied());
    assert_eq!(
        std::str::from_utf8(trie.branches()).unwrap(),
        "hpeluy"
    );
    for key in SEVEN_KEYS {
        let idx = trie.index(key).unwrap();
        assert_eq!(trie.access(idx), *key);
    }
}

#[test]
fn nine_key_extended_lex_scenario() {
    let keys: &[&[u8]] = &[
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
    let trie: LexTrie = LexTrie::build(keys.iter().copied());
    assert_eq!(std::str::from_utf8(trie.branches()).unwrap(), "rpenuuty");
    assert_eq!(trie.index(b"triple"), Some(7));
    assert_eq!(trie.index(b"triangulate"), Some(4));
    assert_eq!(trie.index(b"pikachu"), None);
    assert_eq!(trie.access(5), b"triangulaus");
}
