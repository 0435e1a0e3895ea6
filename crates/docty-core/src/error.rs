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

//! Error types for schema construction.
//!
//! A [`SchemaError`] always means the annotated source itself is malformed.
//! A value that merely fails to validate is never a `SchemaError`; it is
//! reported through `ValidationResult` in the `validate` module.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred while building a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// Malformed annotation or type-expression syntax.
    Syntax,
    /// Malformed or conflicting tag usage.
    Tag,
    /// Unknown filter name or filter value of the wrong kind.
    Filter,
    /// Unresolvable import or typedef reference during schema assembly.
    Reference,
    /// A configured limit was exceeded.
    Limit,
    /// I/O error (file operations).
    Io,
}

impl fmt::Display for SchemaErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "SyntaxError"),
            Self::Tag => write!(f, "TagError"),
            Self::Filter => write!(f, "FilterError"),
            Self::Reference => write!(f, "ReferenceError"),
            Self::Limit => write!(f, "LimitError"),
            Self::Io => write!(f, "IOError"),
        }
    }
}

/// An error raised while turning annotation comments into a schema.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct SchemaError {
    /// The kind of error.
    pub kind: SchemaErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based; 0 when no source position applies).
    pub line: usize,
    /// Column number (1-based, optional).
    pub column: Option<usize>,
    /// Additional context (e.g., "in tag @param name").
    pub context: Option<String>,
}

impl SchemaError {
    /// Create a new error.
    pub fn new(kind: SchemaErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column: None,
            context: None,
        }
    }

    /// Add column information.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add context information.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Convenience constructors for each error kind
    pub fn syntax(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::Syntax, message, line)
    }

    pub fn tag(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::Tag, message, line)
    }

    pub fn filter(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::Filter, message, line)
    }

    pub fn reference(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::Reference, message, line)
    }

    pub fn limit(message: impl Into<String>, line: usize) -> Self {
        Self::new(SchemaErrorKind::Limit, message, line)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::Io, message, 0)
    }
}

/// Result type for schema-building operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
