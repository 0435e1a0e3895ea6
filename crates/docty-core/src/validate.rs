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

//! Validation engine.
//!
//! Matches runtime values against parsed type trees, resolving typedef
//! references across the local/ambient/imported registries, applying
//! filters, and tracking the structural path to any failure.
//!
//! All scratch state lives in a per-call [`Checker`]; nothing is shared
//! between concurrent validations. A validation failure is always data — a
//! [`ValidationResult`] — never an error; [`InvalidValueError`] exists only
//! for callers who opt into raising.

use crate::ast::Ast;
use crate::filters::{category_of, matches_format, FilterCategory, FilterEntry, FilterValue, Filters};
use crate::limits::Limits;
use crate::tag::Tag;
use crate::types::{Field, Primitive, TypeKind, TypeNode};
use crate::value::Value;
use std::sync::Arc;
use thiserror::Error;

/// Largest integer exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Shared stand-in for absent values.
static UNDEFINED: Value = Value::Undefined;

// -- Result types --------------------------------------------------------------

/// One step of the structural path from the root value to a failure site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSeg {
    /// An object key or destructured property name.
    Key(String),
    /// An array element or positional argument index.
    Index(usize),
}

impl std::fmt::Display for PathSeg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{}", k),
            Self::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Render a path as a dotted/indexed location string.
pub fn format_path(path: &[PathSeg]) -> String {
    let mut out = String::new();
    for seg in path {
        match seg {
            PathSeg::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            PathSeg::Index(i) => {
                out.push_str(&format!("[{}]", i));
            }
        }
    }
    out
}

/// The category of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Structural type mismatch.
    Type,
    /// A filter constraint rejected the value.
    Filter,
    /// Strict mode found an undeclared key.
    Strict,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type => write!(f, "type"),
            Self::Filter => write!(f, "filter"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

/// The outcome of one validation call. Created fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// True when the value matched.
    pub pass: bool,
    /// Failure category; `None` on pass.
    pub kind: Option<FailureKind>,
    /// The literal expression text of the expected type.
    pub expected_type: String,
    /// The offending value; `None` on pass.
    pub value: Option<Value>,
    /// Ordered keys/indices from the root to the failure site.
    pub value_path: Vec<PathSeg>,
    /// Human-readable failure message; empty on pass.
    pub message: String,
}

impl ValidationResult {
    /// A passing result.
    pub fn passed() -> Self {
        Self {
            pass: true,
            kind: None,
            expected_type: String::new(),
            value: None,
            value_path: Vec::new(),
            message: String::new(),
        }
    }

    /// The failure path as a dotted/indexed string.
    pub fn path_string(&self) -> String {
        format_path(&self.value_path)
    }
}

/// Raised by the `ensure_*` convenience wrappers when a value fails to
/// validate and the caller asked for raising behavior.
#[derive(Debug, Clone, Error)]
#[error("{}", .result.message)]
pub struct InvalidValueError {
    /// The full validation result.
    pub result: ValidationResult,
}

// -- Registry ------------------------------------------------------------------

/// The three typedef registry tiers, searched in precedence order:
/// local, then ambient, then imported.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedefRegistry<'a> {
    pub local: &'a [Arc<Ast>],
    pub ambient: &'a [Arc<Ast>],
    pub imported: &'a [Arc<Ast>],
}

impl<'a> TypedefRegistry<'a> {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The registries an `Ast` can see.
    pub fn of(ast: &'a Ast) -> Self {
        Self {
            local: &ast.local_typedefs,
            ambient: &ast.ambient_typedefs,
            imported: &ast.imported_typedefs,
        }
    }

    /// Resolve a typedef/callback name, honoring tier precedence.
    pub fn resolve(&self, name: &str) -> Option<&'a Arc<Ast>> {
        self.local
            .iter()
            .chain(self.ambient.iter())
            .chain(self.imported.iter())
            .find(|def| def.definition_name() == Some(name))
    }
}

// -- Public API ----------------------------------------------------------------

/// Check a value against type alternatives; true on match.
pub fn check(
    types: &[TypeNode],
    value: &Value,
    registry: TypedefRegistry<'_>,
    filters: Option<&Filters>,
) -> bool {
    validate(types, value, registry, filters).pass
}

/// Validate a value against type alternatives, returning the full result.
pub fn validate(
    types: &[TypeNode],
    value: &Value,
    registry: TypedefRegistry<'_>,
    filters: Option<&Filters>,
) -> ValidationResult {
    let limits = Limits::default();
    let mut checker = Checker::new(registry, &limits);
    let ok = checker.check_types(types, value, filters);
    checker.into_result(ok)
}

/// Check a positional argument list against an `Ast`'s param tags.
pub fn check_args(ast: &Ast, args: &[Value]) -> bool {
    validate_args(ast, args).pass
}

/// Validate a positional argument list against an `Ast`'s param tags.
///
/// Destructured tags read their actual value from the owning argument's
/// property; optional tags are skipped when the actual value is undefined.
pub fn validate_args(ast: &Ast, args: &[Value]) -> ValidationResult {
    let limits = Limits::default();
    let registry = TypedefRegistry::of(ast);
    let mut checker = Checker::new(registry, &limits);

    for tag in &ast.params {
        let slot = args.get(tag.id).unwrap_or(&UNDEFINED);
        let actual = match &tag.destructured {
            Some((_, prop)) => slot
                .as_object()
                .and_then(|o| o.get(prop))
                .unwrap_or(&UNDEFINED),
            None => slot,
        };

        if actual.is_undefined() && tag.optional {
            continue;
        }

        checker.path.push(PathSeg::Index(tag.id));
        if let Some((_, prop)) = &tag.destructured {
            checker.path.push(PathSeg::Key(prop.clone()));
        }

        if !checker.check_types(&tag.types, actual, Some(&tag.filters)) {
            return checker.into_result(false);
        }
        if ast.strict && !checker.check_strict(&tag.types, actual) {
            return checker.into_result(false);
        }

        if tag.destructured.is_some() {
            checker.path.pop();
        }
        checker.path.pop();
    }

    checker.into_result(true)
}

/// Check a single value against the schema an `Ast` declares.
pub fn check_value(ast: &Ast, value: &Value) -> bool {
    validate_value(ast, value).pass
}

/// Validate a single value against the schema an `Ast` declares.
///
/// A typedef block carrying property tags validates the value as an object
/// against those properties; otherwise the first present tag of `type`,
/// `enum`, `typedef`, `callback`, `returns`, `yields` supplies the type list.
pub fn validate_value(ast: &Ast, value: &Value) -> ValidationResult {
    let limits = Limits::default();
    let registry = TypedefRegistry::of(ast);
    let mut checker = Checker::new(registry, &limits);

    if ast.typedef_tag.is_some() && !ast.properties.is_empty() {
        let ok = checker.check_properties(&ast.properties, ast.strict, value);
        return checker.into_result(ok);
    }

    let tag = match schema_tag(ast) {
        Some(tag) => tag,
        None => return ValidationResult::passed(),
    };

    let mut ok = checker.check_types(&tag.types, value, Some(&tag.filters));
    if ok && ast.strict {
        ok = checker.check_strict(&tag.types, value);
    }
    checker.into_result(ok)
}

/// The tag a bare value is validated against, in slot priority order.
fn schema_tag(ast: &Ast) -> Option<&Tag> {
    ast.type_tag
        .as_ref()
        .or(ast.enum_tag.as_ref())
        .or(ast.typedef_tag.as_ref())
        .or(ast.callback_tag.as_ref())
        .or(ast.returns_tag.as_ref())
        .or(ast.yields_tag.as_ref())
}

// -- Checker -------------------------------------------------------------------

/// Recorded failure detail, kept call-local.
#[derive(Debug, Clone)]
struct Failure {
    kind: FailureKind,
    expected: String,
    value: Value,
    path: Vec<PathSeg>,
    message: String,
}

/// Per-call validation state: registry, path, cycle guard, last failure.
struct Checker<'a> {
    registry: TypedefRegistry<'a>,
    limits: &'a Limits,
    path: Vec<PathSeg>,
    resolving: Vec<String>,
    failure: Option<Failure>,
}

impl<'a> Checker<'a> {
    fn new(registry: TypedefRegistry<'a>, limits: &'a Limits) -> Self {
        Self {
            registry,
            limits,
            path: Vec::new(),
            resolving: Vec::new(),
            failure: None,
        }
    }

    fn into_result(self, ok: bool) -> ValidationResult {
        if ok {
            return ValidationResult::passed();
        }
        match self.failure {
            Some(failure) => ValidationResult {
                pass: false,
                kind: Some(failure.kind),
                expected_type: failure.expected,
                value: Some(failure.value),
                value_path: failure.path,
                message: failure.message,
            },
            None => ValidationResult {
                pass: false,
                kind: Some(FailureKind::Type),
                expected_type: String::new(),
                value: None,
                value_path: Vec::new(),
                message: "validation failed".to_string(),
            },
        }
    }

    /// Try each alternative in declared order; the first structural match
    /// wins and receives the filters. With no match, the recorded leaf
    /// failure stands, or a fresh one naming the first alternative.
    fn check_types(
        &mut self,
        types: &[TypeNode],
        value: &Value,
        filters: Option<&Filters>,
    ) -> bool {
        let depth = self.path.len();
        for node in types {
            if self.match_node(node, value) {
                if let Some(filters) = filters {
                    if !self.apply_filters(node, filters, value) {
                        return false;
                    }
                }
                self.failure = None;
                return true;
            }
            // The failed probe's snapshot kept its own path copy
            self.path.truncate(depth);
        }
        if self.failure.is_none() {
            self.fail_type(types.first(), value);
        }
        false
    }

    fn match_node(&mut self, node: &TypeNode, value: &Value) -> bool {
        match &node.kind {
            TypeKind::Any => true,
            TypeKind::Null => value.is_null(),
            TypeKind::Undefined => value.is_undefined(),
            TypeKind::BoolLiteral(expected) => value.as_bool() == Some(*expected),
            TypeKind::NumberLiteral(expected) => value.as_number() == Some(*expected),
            TypeKind::StringLiteral(expected) => value.as_str() == Some(expected.as_str()),
            TypeKind::Primitive(p) => self.match_primitive(*p, value),
            TypeKind::Array(elements) => self.match_array(elements, value),
            TypeKind::Map { keys, values } => self.match_map(keys, values, value),
            TypeKind::ObjectLiteral(fields) => self.match_object_literal(fields, value),
            TypeKind::Typedef(name) => self.match_typedef(node, name, value),
        }
    }

    fn match_primitive(&self, primitive: Primitive, value: &Value) -> bool {
        matches!(
            (primitive, value),
            (Primitive::String, Value::String(_))
                | (Primitive::Number, Value::Number(_))
                | (Primitive::BigInt, Value::BigInt(_))
                | (Primitive::Boolean, Value::Bool(_))
                | (Primitive::Symbol, Value::Symbol(_))
        )
    }

    /// Filters do not propagate into elements.
    fn match_array(&mut self, elements: &[TypeNode], value: &Value) -> bool {
        let items = match value.as_array() {
            Some(items) => items,
            None => return false,
        };
        for (i, item) in items.iter().enumerate() {
            self.path.push(PathSeg::Index(i));
            if !self.check_types(elements, item, None) {
                return false; // path left intact for the error
            }
            self.path.pop();
        }
        true
    }

    fn match_map(&mut self, keys: &[TypeNode], values: &[TypeNode], value: &Value) -> bool {
        let object = match value.as_object() {
            Some(o) => o,
            None => return false,
        };
        for (key, entry) in &object.entries {
            self.path.push(PathSeg::Key(key.clone()));
            let key_value = Value::String(key.clone());
            if !self.check_types(keys, &key_value, None) {
                return false;
            }
            if !self.check_types(values, entry, None) {
                return false;
            }
            self.path.pop();
        }
        true
    }

    /// Absent keys are permitted only when the field's type list includes
    /// `undefined`; an optional field is skipped entirely on undefined.
    fn match_object_literal(&mut self, fields: &[Field], value: &Value) -> bool {
        let object = match value.as_object() {
            Some(o) => o,
            None => return false,
        };
        for field in fields {
            let actual = object.get(&field.key).unwrap_or(&UNDEFINED);
            if actual.is_undefined() && field.is_optional() {
                continue;
            }
            self.path.push(PathSeg::Key(field.key.clone()));
            if !self.check_types(&field.types, actual, Some(&field.filters)) {
                return false;
            }
            self.path.pop();
        }
        true
    }

    /// Resolve a typedef reference: local, then ambient, then imported; the
    /// nominal class name is the last resort. A name already being resolved
    /// fails fast instead of recursing forever.
    fn match_typedef(&mut self, node: &TypeNode, name: &str, value: &Value) -> bool {
        if self.resolving.iter().any(|n| n == name) {
            self.fail_with(
                FailureKind::Type,
                node.expr.clone(),
                value,
                format!("recursive typedef reference '{}'", name),
            );
            return false;
        }
        if self.resolving.len() >= self.limits.max_resolve_depth {
            self.fail_with(
                FailureKind::Type,
                node.expr.clone(),
                value,
                format!(
                    "typedef resolution exceeds maximum depth {}",
                    self.limits.max_resolve_depth
                ),
            );
            return false;
        }

        let def = match self.registry.resolve(name) {
            Some(def) => Arc::clone(def),
            None => {
                // Nominal fallback: compare the value's class name
                return value
                    .as_object()
                    .and_then(|o| o.class_name.as_deref())
                    .is_some_and(|class| class == name);
            }
        };

        self.resolving.push(name.to_string());
        let ok = if def.is_callback() {
            matches!(value, Value::Function(_))
        } else if !def.properties.is_empty() {
            self.check_properties(&def.properties, def.strict, value)
        } else if let Some(tag) = def.typedef_tag.as_ref() {
            self.check_types(&tag.types, value, Some(&tag.filters))
        } else {
            true
        };
        self.resolving.pop();
        ok
    }

    /// Validate an object against property tags (a typedef-with-properties
    /// schema), honoring per-tag optionality, filters and strict mode.
    fn check_properties(&mut self, properties: &[Tag], strict: bool, value: &Value) -> bool {
        let object = match value.as_object() {
            Some(o) => o,
            None => {
                self.fail_type_message(
                    "object",
                    value,
                    format!("expected an object, got {}", value.kind_name()),
                );
                return false;
            }
        };

        for tag in properties {
            let actual = object.get(&tag.tag_name).unwrap_or(&UNDEFINED);
            if actual.is_undefined()
                && (tag.optional || tag.types.iter().any(|t| t.kind == TypeKind::Undefined))
            {
                continue;
            }
            self.path.push(PathSeg::Key(tag.tag_name.clone()));
            if !self.check_types(&tag.types, actual, Some(&tag.filters)) {
                return false;
            }
            self.path.pop();
        }

        if strict {
            let declared: Vec<&str> = properties.iter().map(|t| t.tag_name.as_str()).collect();
            for key in object.keys() {
                if !declared.contains(&key) {
                    self.fail_with(
                        FailureKind::Strict,
                        declared.join(", "),
                        value,
                        format!("unexpected key '{}' in strict schema", key),
                    );
                    return false;
                }
            }
        }

        true
    }

    /// Reject own keys not declared by the matched object schema. Checked
    /// only after all declared fields pass.
    fn check_strict(&mut self, types: &[TypeNode], value: &Value) -> bool {
        let object = match value.as_object() {
            Some(o) => o,
            None => return true,
        };

        let declared: Vec<String> = match self.declared_keys(types) {
            Some(keys) => keys,
            None => return true, // not an object-literal/typedef schema
        };

        for key in object.keys() {
            if !declared.iter().any(|d| d == key) {
                self.fail_with(
                    FailureKind::Strict,
                    declared.join(", "),
                    value,
                    format!("unexpected key '{}' in strict schema", key),
                );
                return false;
            }
        }
        true
    }

    /// Declared keys of the first object-literal or typedef alternative.
    fn declared_keys(&self, types: &[TypeNode]) -> Option<Vec<String>> {
        for node in types {
            match &node.kind {
                TypeKind::ObjectLiteral(fields) => {
                    return Some(fields.iter().map(|f| f.key.clone()).collect());
                }
                TypeKind::Typedef(name) => {
                    if let Some(def) = self.registry.resolve(name) {
                        if !def.properties.is_empty() {
                            return Some(
                                def.properties.iter().map(|t| t.tag_name.clone()).collect(),
                            );
                        }
                        if let Some(tag) = def.typedef_tag.as_ref() {
                            return self.declared_keys(&tag.types);
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }

    // -- Filters ---------------------------------------------------------------

    /// Apply the filter suite for the matched alternative's category.
    fn apply_filters(&mut self, node: &TypeNode, filters: &Filters, value: &Value) -> bool {
        let category = match category_of(&node.kind) {
            Some(c) => c,
            None => return true,
        };
        for (name, entry) in filters.iter() {
            let ok = match category {
                FilterCategory::Array => self.array_filter(name, entry, value),
                FilterCategory::Number => self.number_filter(name, entry, value),
                FilterCategory::String => self.string_filter(name, entry, value),
            };
            if !ok {
                self.fail_filter(name, entry, value);
                return false;
            }
        }
        true
    }

    fn array_filter(&self, name: &str, entry: &FilterEntry, value: &Value) -> bool {
        let len = match value.as_array() {
            Some(items) => items.len() as f64,
            None => return true,
        };
        let bound = match entry.value {
            FilterValue::Number(n) => n,
            _ => return true,
        };
        match name {
            "min" => len >= bound,
            "max" => len <= bound,
            "length" => len == bound,
            _ => true,
        }
    }

    fn number_filter(&self, name: &str, entry: &FilterEntry, value: &Value) -> bool {
        let n = match value.as_number() {
            Some(n) => n,
            None => return true,
        };
        match (&entry.value, name) {
            (FilterValue::Number(bound), "min" | "gte") => n >= *bound,
            (FilterValue::Number(bound), "max" | "lte") => n <= *bound,
            (FilterValue::Number(bound), "gt") => n > *bound,
            (FilterValue::Number(bound), "lt") => n < *bound,
            (FilterValue::Number(step), "step") => {
                if *step == 0.0 {
                    return false;
                }
                let quotient = n / step;
                (quotient - quotient.round()).abs() < 1e-9
            }
            (FilterValue::Bool(required), "int") => (n.fract() == 0.0) == *required,
            (FilterValue::Bool(required), "finite") => n.is_finite() == *required,
            (FilterValue::Bool(required), "safeInt") => {
                (n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER) == *required
            }
            _ => true,
        }
    }

    fn string_filter(&self, name: &str, entry: &FilterEntry, value: &Value) -> bool {
        let s = match value.as_str() {
            Some(s) => s,
            None => return true,
        };
        if let Some(is_format) = matches_format(name, s) {
            return match entry.value {
                FilterValue::Bool(required) => is_format == required,
                _ => true,
            };
        }
        match (&entry.value, name) {
            (FilterValue::Number(bound), "min") => (s.chars().count() as f64) >= *bound,
            (FilterValue::Number(bound), "max") => (s.chars().count() as f64) <= *bound,
            (FilterValue::Number(bound), "length") => (s.chars().count() as f64) == *bound,
            (FilterValue::Pattern { regex, .. }, "pattern") => regex.is_match(s),
            (operand, "startsWith") => s.starts_with(&text_operand(operand)),
            (operand, "endsWith") => s.ends_with(&text_operand(operand)),
            (operand, "includes") => s.contains(&text_operand(operand)),
            (operand, "excludes") => !s.contains(&text_operand(operand)),
            _ => true,
        }
    }

    // -- Failure recording -------------------------------------------------------

    fn fail_type(&mut self, expected: Option<&TypeNode>, value: &Value) {
        let expr = expected.map(|n| n.expr.clone()).unwrap_or_default();
        let message = format!(
            "expected type '{}', got {} ({})",
            expr,
            value.kind_name(),
            value
        );
        self.fail_with(FailureKind::Type, expr, value, message);
    }

    fn fail_type_message(&mut self, expected: &str, value: &Value, message: String) {
        self.fail_with(FailureKind::Type, expected.to_string(), value, message);
    }

    fn fail_filter(&mut self, name: &str, entry: &FilterEntry, value: &Value) {
        let message = if entry.message.is_empty() {
            format!(
                "filter '{}: {}' failed for value {}",
                name, entry.value, value
            )
        } else {
            entry.message.clone()
        };
        let failure = Failure {
            kind: FailureKind::Filter,
            expected: format!("{}: {}", name, entry.value),
            value: value.clone(),
            path: self.path.clone(),
            message,
        };
        self.failure = Some(failure);
    }

    fn fail_with(&mut self, kind: FailureKind, expected: String, value: &Value, message: String) {
        if self.failure.is_some() && kind == FailureKind::Type {
            return; // keep the first recorded leaf failure
        }
        self.failure = Some(Failure {
            kind,
            expected,
            value: value.clone(),
            path: self.path.clone(),
            message,
        });
    }
}

fn text_operand(value: &FilterValue) -> String {
    match value {
        FilterValue::Str(s) => s.clone(),
        FilterValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
