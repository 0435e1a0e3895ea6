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

//! JSON conversion for docty runtime values.
//!
//! Validating real payloads usually starts from JSON; this crate converts
//! between `serde_json::Value` and the [`docty_core::Value`] model in both
//! directions.
//!
//! # Examples
//!
//! ```rust
//! use docty_json::from_json;
//! use docty_core::{check, parse_type, Limits, TypedefRegistry};
//!
//! let value = from_json(r#"{"name": "Alice"}"#).unwrap();
//! let types = parse_type("{name: string}", &Limits::default()).unwrap();
//! assert!(check(&types, &value, TypedefRegistry::empty(), None));
//! ```

mod from_json;
mod to_json;

use thiserror::Error;

pub use from_json::{from_json, from_json_value};
pub use to_json::{to_json, to_json_value};

/// Errors raised by JSON conversion.
#[derive(Debug, Clone, Error)]
pub enum JsonError {
    /// The input was not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(String),
    /// Serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(String),
    /// The value kind has no JSON spelling.
    #[error("value kind '{0}' cannot be represented in JSON")]
    Unrepresentable(&'static str),
}
