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

//! Resource limits for parsing and validation.

/// Configurable limits bounding parser and validator resources.
///
/// Parsing and validation are synchronous computations bounded only by input
/// size and recursion depth; these limits cap both so a hostile annotation
/// block cannot exhaust the stack or memory.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum size of a single comment block in bytes (default: 1MB).
    pub max_comment_size: usize,
    /// Maximum nesting depth of a type expression (default: 64).
    pub max_type_depth: usize,
    /// Maximum number of tags in one comment block (default: 1k).
    pub max_tags_per_block: usize,
    /// Maximum fields in one inline object literal (default: 10k).
    pub max_object_fields: usize,
    /// Maximum typedef resolution depth during validation (default: 128).
    pub max_resolve_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_comment_size: 1024 * 1024, // 1MB
            max_type_depth: 64,
            max_tags_per_block: 1_000,
            max_object_fields: 10_000,
            max_resolve_depth: 128,
        }
    }
}

impl Limits {
    /// Create limits with no restrictions (for testing).
    pub fn unlimited() -> Self {
        Self {
            max_comment_size: usize::MAX,
            max_type_depth: usize::MAX,
            max_tags_per_block: usize::MAX,
            max_object_fields: usize::MAX,
            max_resolve_depth: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Default limits tests ====================

    #[test]
    fn test_default_max_comment_size() {
        let limits = Limits::default();
        assert_eq!(limits.max_comment_size, 1024 * 1024); // 1MB
    }

    #[test]
    fn test_default_max_type_depth() {
        let limits = Limits::default();
        assert_eq!(limits.max_type_depth, 64);
    }

    #[test]
    fn test_default_max_tags_per_block() {
        let limits = Limits::default();
        assert_eq!(limits.max_tags_per_block, 1_000);
    }

    #[test]
    fn test_default_max_object_fields() {
        let limits = Limits::default();
        assert_eq!(limits.max_object_fields, 10_000);
    }

    #[test]
    fn test_default_max_resolve_depth() {
        let limits = Limits::default();
        assert_eq!(limits.max_resolve_depth, 128);
    }

    // ==================== Unlimited tests ====================

    #[test]
    fn test_unlimited() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_comment_size, usize::MAX);
        assert_eq!(limits.max_type_depth, usize::MAX);
        assert_eq!(limits.max_resolve_depth, usize::MAX);
    }

    #[test]
    fn test_limits_clone() {
        let limits = Limits::default();
        let cloned = limits.clone();
        assert_eq!(limits.max_type_depth, cloned.max_type_depth);
    }
}
