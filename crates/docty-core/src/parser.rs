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

//! Top-level comment parsing.
//!
//! `parse_comments` turns one source text into a list of [`Ast`]s, one per
//! annotation block, with each block's local typedef registry populated from
//! the other typedef/callback blocks of the same call. Ambient and imported
//! registries are populated by the file-level facade before the `Ast`s are
//! published; nothing mutates an `Ast` after that.

use crate::ast::Ast;
use crate::error::SchemaResult;
use crate::extract::{find_comment_blocks, parse_block};
use crate::limits::Limits;
use std::sync::Arc;

/// Parsing options.
///
/// All parse entry points accept options to customize limits; the plain
/// functions use defaults.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Resource limits.
    pub limits: Limits,
}

impl ParseOptions {
    /// Create a new builder for ParseOptions.
    pub fn builder() -> ParseOptionsBuilder {
        ParseOptionsBuilder::new()
    }
}

/// Builder for ergonomic construction of [`ParseOptions`].
#[derive(Debug, Clone)]
pub struct ParseOptionsBuilder {
    limits: Limits,
}

impl ParseOptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
        }
    }

    /// Set the maximum comment block size in bytes.
    pub fn max_comment_size(mut self, bytes: usize) -> Self {
        self.limits.max_comment_size = bytes;
        self
    }

    /// Set the maximum type-expression nesting depth.
    pub fn max_type_depth(mut self, depth: usize) -> Self {
        self.limits.max_type_depth = depth;
        self
    }

    /// Set the maximum number of tags per comment block.
    pub fn max_tags_per_block(mut self, count: usize) -> Self {
        self.limits.max_tags_per_block = count;
        self
    }

    /// Set the maximum number of fields in one object literal.
    pub fn max_object_fields(mut self, count: usize) -> Self {
        self.limits.max_object_fields = count;
        self
    }

    /// Set the maximum typedef resolution depth during validation.
    pub fn max_resolve_depth(mut self, depth: usize) -> Self {
        self.limits.max_resolve_depth = depth;
        self
    }

    /// Use the given limits wholesale.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Build the options.
    pub fn build(self) -> ParseOptions {
        ParseOptions {
            limits: self.limits,
        }
    }
}

impl Default for ParseOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse all annotation blocks in `text` with default options.
pub fn parse_comments(text: &str) -> SchemaResult<Vec<Ast>> {
    parse_comments_with_options(text, &ParseOptions::default())
}

/// Parse all annotation blocks in `text`.
///
/// Each returned `Ast` sees every *other* typedef/callback block from this
/// call in its `local_typedefs` registry.
pub fn parse_comments_with_options(text: &str, options: &ParseOptions) -> SchemaResult<Vec<Ast>> {
    let records = find_comment_blocks(text);
    let mut asts = Vec::with_capacity(records.len());
    for record in &records {
        asts.push(parse_block(record, &options.limits)?);
    }

    // Freeze one snapshot of every typedef/callback block, then hand each
    // block the others as its local registry.
    let definitions: Vec<(usize, Arc<Ast>)> = asts
        .iter()
        .enumerate()
        .filter(|(_, ast)| ast.definition_name().is_some())
        .map(|(i, ast)| (i, Arc::new(ast.clone())))
        .collect();

    for (i, ast) in asts.iter_mut().enumerate() {
        ast.local_typedefs = definitions
            .iter()
            .filter(|(j, _)| *j != i)
            .map(|(_, def)| Arc::clone(def))
            .collect();
    }

    Ok(asts)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== parse_comments tests ====================

    #[test]
    fn test_parse_empty_source() {
        let asts = parse_comments("let x = 1;").unwrap();
        assert!(asts.is_empty());
    }

    #[test]
    fn test_parse_one_block() {
        let asts = parse_comments("/** @type {number} */\nlet x;").unwrap();
        assert_eq!(asts.len(), 1);
        assert!(asts[0].type_tag.is_some());
    }

    #[test]
    fn test_parse_blocks_in_source_order() {
        let source = "/** first */\nlet a;\n/** second */\nlet b;\n";
        let asts = parse_comments(source).unwrap();
        assert_eq!(asts.len(), 2);
        assert_eq!(asts[0].description, "first");
        assert_eq!(asts[1].description, "second");
    }

    #[test]
    fn test_local_typedefs_exclude_self() {
        let source = "\
/**\n * @typedef {Object} A\n * @property {string} x\n */\n
/**\n * @typedef {Object} B\n * @property {number} y\n */\n
/** @param {A} value */\nfunction f(value) {}\n";
        let asts = parse_comments(source).unwrap();
        assert_eq!(asts.len(), 3);

        // The A block sees only B locally
        let a_locals: Vec<&str> = asts[0]
            .local_typedefs
            .iter()
            .filter_map(|d| d.definition_name())
            .collect();
        assert_eq!(a_locals, vec!["B"]);

        // The plain function block sees both
        let f_locals: Vec<&str> = asts[2]
            .local_typedefs
            .iter()
            .filter_map(|d| d.definition_name())
            .collect();
        assert_eq!(f_locals, vec!["A", "B"]);
    }

    #[test]
    fn test_callback_registered_locally() {
        let source = "\
/**\n * @callback onDone\n * @param {boolean} ok\n */\n
/** @param {onDone} cb */\nfunction run(cb) {}\n";
        let asts = parse_comments(source).unwrap();
        let names: Vec<&str> = asts[1]
            .local_typedefs
            .iter()
            .filter_map(|d| d.definition_name())
            .collect();
        assert_eq!(names, vec!["onDone"]);
    }

    #[test]
    fn test_schema_error_aborts_parse() {
        let source = "/** @param {number} n - x {notAFilter: 1} */";
        assert!(parse_comments(source).is_err());
    }

    // ==================== ParseOptions tests ====================

    #[test]
    fn test_options_builder() {
        let opts = ParseOptions::builder()
            .max_type_depth(10)
            .max_tags_per_block(5)
            .build();
        assert_eq!(opts.limits.max_type_depth, 10);
        assert_eq!(opts.limits.max_tags_per_block, 5);
    }

    #[test]
    fn test_options_builder_limits_wholesale() {
        let opts = ParseOptions::builder().limits(Limits::unlimited()).build();
        assert_eq!(opts.limits.max_comment_size, usize::MAX);
    }

    #[test]
    fn test_options_limit_enforced() {
        let opts = ParseOptions::builder().max_tags_per_block(1).build();
        let source = "/**\n * @param {string} a\n * @param {string} b\n */";
        let err = parse_comments_with_options(source, &opts).unwrap_err();
        assert_eq!(err.kind, crate::error::SchemaErrorKind::Limit);
    }
}
