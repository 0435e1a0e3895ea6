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

//! Offset-to-line mapping.
//!
//! Line starts are computed once per input; lookups are binary searches.

use memchr::memchr_iter;

/// Precomputed cumulative line-start offsets for one source text.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the first character of each line. `starts[0] == 0`.
    starts: Vec<usize>,
}

impl LineIndex {
    /// Build the index by scanning for newlines once.
    pub fn new(text: &str) -> Self {
        let mut starts = Vec::with_capacity(128);
        starts.push(0);
        for nl in memchr_iter(b'\n', text.as_bytes()) {
            starts.push(nl + 1);
        }
        Self { starts }
    }

    /// Map a byte offset to its 1-based line number.
    ///
    /// The line is the one whose start is the last line-start at or before
    /// `offset`. Offsets past the end of the text map to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }

    /// Number of lines in the indexed text.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== LineIndex tests ====================

    #[test]
    fn test_single_line() {
        let idx = LineIndex::new("hello");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(4), 1);
        assert_eq!(idx.line_count(), 1);
    }

    #[test]
    fn test_two_lines() {
        let idx = LineIndex::new("ab\ncd");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(2), 1); // the newline itself
        assert_eq!(idx.line_of(3), 2);
        assert_eq!(idx.line_of(4), 2);
    }

    #[test]
    fn test_line_boundaries() {
        let text = "a\nb\nc\n";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(2), 2);
        assert_eq!(idx.line_of(4), 3);
        assert_eq!(idx.line_count(), 4); // trailing newline opens line 4
    }

    #[test]
    fn test_empty_text() {
        let idx = LineIndex::new("");
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_count(), 1);
    }

    #[test]
    fn test_offset_past_end() {
        let idx = LineIndex::new("a\nb");
        assert_eq!(idx.line_of(100), 2);
    }

    #[test]
    fn test_consecutive_newlines() {
        let idx = LineIndex::new("a\n\n\nb");
        assert_eq!(idx.line_of(1), 1);
        assert_eq!(idx.line_of(2), 2);
        assert_eq!(idx.line_of(3), 3);
        assert_eq!(idx.line_of(4), 4);
    }
}
