// Docty - Annotation-Driven Runtime Schemas
//
// Copyright (c) 2025 Docty contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Separator-aware top-level splitting.
//!
//! This single primitive underlies union splitting, object-literal member
//! splitting and key:value splitting; call sites must not re-implement it.

use super::brackets::{closer_for, find_closing_bracket, find_closing_quote, is_quote};

/// Split `s` on any of `separators`, treating bracketed spans, quoted spans
/// and `//` line comments as opaque.
///
/// Pieces are returned untrimmed and in source order. The result always has
/// at least one element; splitting an empty string yields `[""]`. An
/// unmatched bracket or quote makes the remainder of the string opaque.
pub fn split_top_level(s: &str, separators: &[char]) -> Vec<String> {
    let bytes = s.as_bytes();
    let mut pieces = Vec::new();
    let mut piece_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];

        if closer_for(b).is_some() {
            let end = find_closing_bracket(s, i);
            if end == 0 {
                break; // unmatched: rest is opaque
            }
            i = end + 1;
            continue;
        }

        if is_quote(b) {
            let end = find_closing_quote(s, i);
            if end == 0 {
                break;
            }
            i = end + 1;
            continue;
        }

        if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            // Line comment: opaque until end of line
            match bytes[i..].iter().position(|&c| c == b'\n') {
                Some(nl) => {
                    i += nl + 1;
                    continue;
                }
                None => break,
            }
        }

        if b.is_ascii() && separators.contains(&(b as char)) {
            pieces.push(s[piece_start..i].to_string());
            piece_start = i + 1;
        }
        i += 1;
    }

    pieces.push(s[piece_start..].to_string());
    pieces
}

/// Split `s` on the first top-level occurrence of `separator`.
///
/// Returns `None` when no top-level separator exists.
pub fn split_first_top_level(s: &str, separator: char) -> Option<(String, String)> {
    let pieces = split_top_level(s, &[separator]);
    if pieces.len() < 2 {
        return None;
    }
    let head = pieces[0].clone();
    let tail = pieces[1..].join(&separator.to_string());
    Some((head, tail))
}
