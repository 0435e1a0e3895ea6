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

//! Error context helpers for improved ergonomics.
//!
//! Extension methods on `Result<T, SchemaError>` (and common foreign error
//! results) that annotate errors with contextual information as they
//! propagate up the call stack.
//!
//! # Examples
//!
//! ```rust
//! use docty::{parse_comments, SchemaResultExt};
//!
//! fn load_schema(source: &str) -> Result<Vec<docty::Ast>, docty::SchemaError> {
//!     parse_comments(source).context("while building the request schema")
//! }
//! ```

use docty_core::SchemaError;
use std::fmt;

/// Extension trait for adding context to `Result<T, SchemaError>`.
///
/// `context` evaluates immediately; `with_context` evaluates lazily on the
/// error path only; `map_err_to_schema` converts foreign error types.
pub trait SchemaResultExt<T> {
    /// The error type of this result.
    type ErrorType;

    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T, SchemaError>
    where
        C: fmt::Display;

    /// Add context to an error using a closure, evaluated only on failure.
    fn with_context<C, F>(self, f: F) -> Result<T, SchemaError>
    where
        C: fmt::Display,
        F: FnOnce() -> C;

    /// Convert a foreign error type to `SchemaError`.
    fn map_err_to_schema<F>(self, f: F) -> Result<T, SchemaError>
    where
        F: FnOnce(Self::ErrorType) -> SchemaError,
        Self: Sized;
}

impl<T> SchemaResultExt<T> for Result<T, SchemaError> {
    type ErrorType = SchemaError;

    fn context<C>(self, context: C) -> Result<T, SchemaError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| add_context(e, context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SchemaError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| add_context(e, f().to_string()))
    }

    fn map_err_to_schema<F>(self, _f: F) -> Result<T, SchemaError>
    where
        F: FnOnce(SchemaError) -> SchemaError,
    {
        self
    }
}

impl<T> SchemaResultExt<T> for Result<T, std::io::Error> {
    type ErrorType = std::io::Error;

    fn context<C>(self, context: C) -> Result<T, SchemaError>
    where
        C: fmt::Display,
    {
        self.map_err(|e| add_context(SchemaError::io(e.to_string()), context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SchemaError>
    where
        C: fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| add_context(SchemaError::io(e.to_string()), f().to_string()))
    }

    fn map_err_to_schema<F>(self, f: F) -> Result<T, SchemaError>
    where
        F: FnOnce(std::io::Error) -> SchemaError,
    {
        self.map_err(f)
    }
}

/// Prepend new context to any existing context chain.
fn add_context(mut error: SchemaError, new_context: String) -> SchemaError {
    if new_context.is_empty() {
        return error;
    }
    error.context = Some(match error.context {
        Some(existing) => format!("{}; {}", new_context, existing),
        None => new_context,
    });
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use docty_core::SchemaErrorKind;

    // ==================== context() tests ====================

    #[test]
    fn test_context_on_error() {
        let result: Result<(), SchemaError> = Err(SchemaError::syntax("bad token", 5));
        let err = result.context("in schema block").unwrap_err();
        assert_eq!(err.context, Some("in schema block".to_string()));
        assert_eq!(err.line, 5);
    }

    #[test]
    fn test_context_on_ok() {
        let result: Result<i32, SchemaError> = Ok(42);
        assert_eq!(result.context("unused").unwrap(), 42);
    }

    #[test]
    fn test_context_chaining() {
        let result: Result<(), SchemaError> = Err(SchemaError::filter("unknown filter", 2));
        let err = result
            .context("in tag @param size")
            .context("while parsing models.js")
            .unwrap_err();
        let ctx = err.context.unwrap();
        assert!(ctx.contains("while parsing models.js"));
        assert!(ctx.contains("in tag @param size"));
    }

    #[test]
    fn test_context_empty_string_ignored() {
        let result: Result<(), SchemaError> = Err(SchemaError::syntax("error", 1));
        let err = result.context("").unwrap_err();
        assert_eq!(err.context, None);
    }

    // ==================== with_context() tests ====================

    #[test]
    fn test_with_context_lazy() {
        let mut evaluated = false;
        let result: Result<i32, SchemaError> = Ok(1);
        let _ = result.with_context(|| {
            evaluated = true;
            "never"
        });
        assert!(!evaluated);
    }

    #[test]
    fn test_with_context_on_error() {
        let result: Result<(), SchemaError> = Err(SchemaError::tag("bad tag", 3));
        let err = result
            .with_context(|| format!("in file {}", "x.js"))
            .unwrap_err();
        assert_eq!(err.context, Some("in file x.js".to_string()));
    }

    // ==================== io conversions ====================

    #[test]
    fn test_io_context() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));
        let err = result.context("loading schema source").unwrap_err();
        assert_eq!(err.kind, SchemaErrorKind::Io);
        assert!(err.context.unwrap().contains("loading schema source"));
    }

    #[test]
    fn test_map_err_to_schema() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = result
            .map_err_to_schema(|e| SchemaError::io(format!("read failed: {}", e)))
            .unwrap_err();
        assert!(err.message.contains("read failed"));
    }
}
