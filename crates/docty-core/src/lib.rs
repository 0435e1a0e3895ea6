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

//! Core annotation parser, schema model and validation engine.
//!
//! This crate turns structured annotation comments attached to source code
//! into runtime schemas: typed descriptions of expected shapes plus
//! constraints, able to validate arbitrary values and report precise,
//! path-qualified failures.
//!
//! # Pipeline
//!
//! Source text flows through three subsystems:
//!
//! 1. The [`extract`] module locates annotation comment blocks and splits
//!    them into tag records with accurate line provenance.
//! 2. The [`typeexpr`] parser turns each tag's type-annotation string into a
//!    tree of typed nodes; the [`filters`] parser extracts the embedded
//!    constraint literal from the tag's free-text tail.
//! 3. The [`validate`] engine matches runtime [`Value`]s against the parsed
//!    trees, resolving typedef references across the local/ambient/imported
//!    registries.
//!
//! Schema errors (malformed annotations) are fatal [`SchemaError`]s at parse
//! time. Validation failures are always data: a [`ValidationResult`].

pub mod ast;
mod error;
pub mod extract;
pub mod filters;
mod limits;
mod parser;
pub mod scan;
mod tag;
pub mod typeexpr;
mod types;
pub mod validate;
mod value;

pub use ast::{Ast, ImportSpec, Scope};
pub use error::{SchemaError, SchemaErrorKind, SchemaResult};
pub use extract::{find_comment_blocks, CommentRecord};
pub use filters::{parse_filters, FilterEntry, FilterValue, Filters};
pub use limits::Limits;
pub use parser::{parse_comments, parse_comments_with_options, ParseOptions, ParseOptionsBuilder};
pub use tag::Tag;
pub use typeexpr::parse_type;
pub use types::{Field, Primitive, TypeKind, TypeNode};
pub use validate::{
    check, check_args, check_value, validate, validate_args, validate_value, FailureKind,
    InvalidValueError, PathSeg, TypedefRegistry, ValidationResult,
};
pub use value::{ObjectValue, Value};
