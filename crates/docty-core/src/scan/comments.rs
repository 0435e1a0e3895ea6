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

//! Isolation of `//` line comments around a type expression.
//!
//! Object-literal members document fields with line comments before or after
//! the substantive expression. Multi-line comments are stitched together with
//! a single space. A lone `/` that does not open a `//` comment is a syntax
//! error.

use super::brackets::{closer_for, find_closing_bracket, find_closing_quote, is_quote};
use crate::error::{SchemaError, SchemaResult};

/// Peel `//` comment lines off the front of `s`.
///
/// Returns `(comment, rest)`: the stitched comment text and the remainder
/// starting at the first non-comment content.
pub fn isolate_leading_comment(s: &str) -> SchemaResult<(String, String)> {
    let bytes = s.as_bytes();
    let mut comment = String::new();
    let mut i = 0usize;

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        if bytes[i] == b'/' {
            if bytes.get(i + 1) == Some(&b'/') {
                let text_start = i + 2;
                let text_end = bytes[text_start..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map(|p| text_start + p)
                    .unwrap_or(bytes.len());
                stitch(&mut comment, s[text_start..text_end].trim());
                i = text_end;
                continue;
            }
            return Err(SchemaError::syntax(
                format!("lone '/' in expression: {}", s.trim()),
                0,
            ));
        }
        break;
    }

    Ok((comment, s[i..].to_string()))
}

/// Peel trailing `//` comment lines off the back of `s`.
///
/// Returns `(rest, comment)`: the remainder up to the trailing comment run
/// and the stitched comment text. Comments embedded before further content
/// are left in place.
pub fn isolate_trailing_comment(s: &str) -> SchemaResult<(String, String)> {
    let bytes = s.as_bytes();
    // (text_start, text_end) per top-level comment, in source order
    let mut segments: Vec<(usize, usize)> = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        if closer_for(b).is_some() {
            let end = find_closing_bracket(s, i);
            if end == 0 {
                break;
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
        if b == b'/' {
            if bytes.get(i + 1) == Some(&b'/') {
                let text_start = i;
                let text_end = bytes[text_start..]
                    .iter()
                    .position(|&c| c == b'\n')
                    .map(|p| text_start + p)
                    .unwrap_or(bytes.len());
                segments.push((text_start, text_end));
                i = text_end;
                continue;
            }
            return Err(SchemaError::syntax(
                format!("lone '/' in expression: {}", s.trim()),
                0,
            ));
        }
        i += 1;
    }

    // Walk the comment list backwards to find the maximal trailing run of
    // comments separated only by whitespace.
    let mut boundary = s.len();
    let mut run_start_index = segments.len();
    for (idx, &(start, end)) in segments.iter().enumerate().rev() {
        if s[end..boundary].trim().is_empty() {
            boundary = start;
            run_start_index = idx;
        } else {
            break;
        }
    }

    let mut comment = String::new();
    for &(start, end) in &segments[run_start_index..] {
        stitch(&mut comment, s[start + 2..end].trim());
    }

    Ok((s[..boundary].to_string(), comment))
}

fn stitch(dest: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !dest.is_empty() {
        dest.push(' ');
    }
    dest.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== isolate_leading_comment tests ====================

    #[test]
    fn test_leading_none() {
        let (comment, rest) = isolate_leading_comment("string").unwrap();
        assert_eq!(comment, "");
        assert_eq!(rest, "string");
    }

    #[test]
    fn test_leading_single() {
        let (comment, rest) = isolate_leading_comment("// the name\nname: string").unwrap();
        assert_eq!(comment, "the name");
        assert_eq!(rest, "name: string");
    }

    #[test]
    fn test_leading_multi_line_stitched() {
        let (comment, rest) =
            isolate_leading_comment("// first part\n// second part\nx: number").unwrap();
        assert_eq!(comment, "first part second part");
        assert_eq!(rest, "x: number");
    }

    #[test]
    fn test_leading_only_comment() {
        let (comment, rest) = isolate_leading_comment("// dangling docs").unwrap();
        assert_eq!(comment, "dangling docs");
        assert_eq!(rest, "");
    }

    #[test]
    fn test_leading_lone_slash_is_error() {
        assert!(isolate_leading_comment("/ broken").is_err());
    }

    #[test]
    fn test_leading_empty() {
        let (comment, rest) = isolate_leading_comment("").unwrap();
        assert_eq!(comment, "");
        assert_eq!(rest, "");
    }

    // ==================== isolate_trailing_comment tests ====================

    #[test]
    fn test_trailing_none() {
        let (rest, comment) = isolate_trailing_comment("name: string").unwrap();
        assert_eq!(rest, "name: string");
        assert_eq!(comment, "");
    }

    #[test]
    fn test_trailing_single() {
        let (rest, comment) = isolate_trailing_comment("string // the name").unwrap();
        assert_eq!(rest.trim(), "string");
        assert_eq!(comment, "the name");
    }

    #[test]
    fn test_trailing_multi_line_stitched() {
        let (rest, comment) =
            isolate_trailing_comment("string // first\n// second").unwrap();
        assert_eq!(rest.trim(), "string");
        assert_eq!(comment, "first second");
    }

    #[test]
    fn test_trailing_embedded_comment_left_alone() {
        // The comment is followed by more content, so it is not trailing
        let (rest, comment) = isolate_trailing_comment("a // doc\nb").unwrap();
        assert_eq!(rest, "a // doc\nb");
        assert_eq!(comment, "");
    }

    #[test]
    fn test_trailing_comment_with_filter_literal() {
        let (rest, comment) = isolate_trailing_comment("string // label {min: 3}").unwrap();
        assert_eq!(rest.trim(), "string");
        assert_eq!(comment, "label {min: 3}");
    }

    #[test]
    fn test_trailing_slash_inside_quotes_ignored() {
        let (rest, comment) = isolate_trailing_comment("'a/b' // path").unwrap();
        assert_eq!(rest.trim(), "'a/b'");
        assert_eq!(comment, "path");
    }

    #[test]
    fn test_trailing_lone_slash_is_error() {
        assert!(isolate_trailing_comment("string / broken").is_err());
    }

    #[test]
    fn test_trailing_empty() {
        let (rest, comment) = isolate_trailing_comment("").unwrap();
        assert_eq!(rest, "");
        assert_eq!(comment, "");
    }
}
