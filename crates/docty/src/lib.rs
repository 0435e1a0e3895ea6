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

//! # docty - Annotation-Driven Runtime Schemas
//!
//! docty turns structured annotation comments into runtime schemas: typed
//! descriptions of expected shapes plus constraints, able to validate
//! arbitrary values (function arguments, objects, primitives) and report
//! precise, path-qualified failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use docty::{parse_comments, validate_args, Value, ObjectValue};
//!
//! let source = r#"
//! /**
//!  * Registers a user.
//!  * @param {string} name - {min: 1}
//!  * @param {number} [age] - {gte: 0}
//!  */
//! function register(name, age) {}
//! "#;
//!
//! let asts = parse_comments(source).expect("schema is well-formed");
//! let schema = &asts[0];
//!
//! let result = validate_args(schema, &[Value::from("alice"), Value::Number(30.0)]);
//! assert!(result.pass);
//!
//! let result = validate_args(schema, &[Value::from("")]);
//! assert!(!result.pass); // min length filter
//! ```
//!
//! ## Features
//!
//! - **Type expressions**: primitives, literals, unions, `Array.<T>`/`T[]`,
//!   `Object.<K,V>`/`Record<K,V>`, inline object literals with per-field
//!   comments and constraints, typedef references
//! - **Filters**: `{min: 2}`-style constraint literals with per-category
//!   allow-lists and custom messages
//! - **Typedef registries**: local, ambient and imported tiers with
//!   precedence, populated across files by [`FileParser`]
//! - **Strict mode**: `@strict` rejects undeclared keys
//! - **Path-qualified failures**: every failure names the full structural
//!   path to the mismatch
//!
//! ## Modules
//!
//! - [`json`]: JSON payload conversion
//! - [`scan`]: scanner primitives (bracket matching, top-level splitting)

// Re-export core types
pub use docty_core::{
    // Functions
    check,
    check_args,
    check_value,
    find_comment_blocks,
    parse_comments,
    parse_comments_with_options,
    parse_filters,
    parse_type,
    validate,
    validate_args,
    validate_value,
    // Main types
    Ast,
    CommentRecord,
    FailureKind,
    Field,
    FilterEntry,
    FilterValue,
    Filters,
    ImportSpec,
    // Errors
    InvalidValueError,
    // Parser
    Limits,
    ObjectValue,
    ParseOptions,
    ParseOptionsBuilder,
    PathSeg,
    Primitive,
    SchemaError,
    SchemaErrorKind,
    SchemaResult,
    Scope,
    Tag,
    TypeKind,
    TypeNode,
    TypedefRegistry,
    ValidationResult,
    Value,
};

mod cache;
mod error_ext;
mod files;

pub use cache::AstCache;
pub use error_ext::SchemaResultExt;
pub use files::{FileParser, FsReader, SourceReader};

// Re-export scanner primitives
pub mod scan {
    //! Scanner primitives
    pub use docty_core::scan::{
        find_closing_bracket, find_closing_quote, isolate_leading_comment,
        isolate_trailing_comment, split_first_top_level, split_top_level, LineIndex,
    };
}

// Re-export JSON conversion
pub mod json {
    //! JSON conversion utilities
    pub use docty_json::{from_json, from_json_value, to_json, to_json_value, JsonError};
}

/// Validate a value against a schema, raising on failure.
///
/// The raising flavor exists for callers who want exception-style control
/// flow; [`validate_value`] always returns the result as data.
pub fn ensure_value(ast: &Ast, value: &Value) -> Result<(), InvalidValueError> {
    let result = validate_value(ast, value);
    if result.pass {
        Ok(())
    } else {
        Err(InvalidValueError { result })
    }
}

/// Validate an argument list against a schema, raising on failure.
pub fn ensure_args(ast: &Ast, args: &[Value]) -> Result<(), InvalidValueError> {
    let result = validate_args(ast, args);
    if result.pass {
        Ok(())
    } else {
        Err(InvalidValueError { result })
    }
}
