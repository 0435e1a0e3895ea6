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

//! Recursive-descent parser for type-annotation expressions.
//!
//! The grammar is small but irregular: primitives, literal values, unions,
//! arrays in two spellings, key/value maps in two spellings, inline object
//! literals with per-field comments and filters, and bare typedef references.
//! Unknown syntax never fails — it degrades to `any` with the verbatim
//! expression preserved, so a schema can always be built.
//!
//! `&` is folded into union semantics rather than intersection. This mirrors
//! an accepted quirk of the annotation convention being parsed and is
//! intentional; do not "fix" it.

use crate::error::{SchemaError, SchemaResult};
use crate::filters::parse_filters;
use crate::limits::Limits;
use crate::scan::{
    find_closing_bracket, find_closing_quote, isolate_leading_comment, isolate_trailing_comment,
    split_first_top_level, split_top_level,
};
use crate::types::{Field, Primitive, TypeKind, TypeNode};

/// Parse one type-annotation expression into its union alternatives.
pub fn parse_type(expr: &str, limits: &Limits) -> SchemaResult<Vec<TypeNode>> {
    parse_type_at_depth(expr, limits, 0)
}

fn parse_type_at_depth(expr: &str, limits: &Limits, depth: usize) -> SchemaResult<Vec<TypeNode>> {
    if depth > limits.max_type_depth {
        return Err(SchemaError::limit(
            format!(
                "type expression nesting exceeds maximum depth {}",
                limits.max_type_depth
            ),
            0,
        ));
    }

    let expr = fix_up(expr.trim());

    // Union split; `&` is treated as `|` by convention
    let members = split_top_level(&expr, &['|', '&']);
    if members.len() > 1 {
        let mut alternatives = Vec::new();
        for member in &members {
            alternatives.extend(parse_type_at_depth(member, limits, depth + 1)?);
        }
        return Ok(alternatives);
    }

    let single = expr.trim();
    Ok(vec![parse_single(single, limits, depth)?])
}

/// Rewrite common shorthand mistakes to their canonical spellings.
fn fix_up(expr: &str) -> String {
    match expr {
        "" | "any" => "*".to_string(),
        "array" | "Array" => "Array.<*>".to_string(),
        "object" | "Object" | "{}" => "Object.<*,*>".to_string(),
        other => other.to_string(),
    }
}

/// Match one union member against the fixed matcher priority order.
fn parse_single(expr: &str, limits: &Limits, depth: usize) -> SchemaResult<TypeNode> {
    // Simple matchers first
    if expr == "*" {
        return Ok(TypeNode::new(expr, TypeKind::Any));
    }
    if expr == "true" {
        return Ok(TypeNode::new(expr, TypeKind::BoolLiteral(true)));
    }
    if expr == "false" {
        return Ok(TypeNode::new(expr, TypeKind::BoolLiteral(false)));
    }
    if let Some(n) = match_number_literal(expr) {
        return Ok(TypeNode::new(expr, TypeKind::NumberLiteral(n)));
    }
    if let Some(s) = match_string_literal(expr) {
        return Ok(TypeNode::new(expr, TypeKind::StringLiteral(s)));
    }
    if expr == "null" {
        return Ok(TypeNode::new(expr, TypeKind::Null));
    }
    if expr == "undefined" {
        return Ok(TypeNode::new(expr, TypeKind::Undefined));
    }
    if let Some(p) = Primitive::from_name(expr) {
        return Ok(TypeNode::new(expr, TypeKind::Primitive(p)));
    }

    // Complex matchers
    if let Some(interior) = match_generic(expr, &["Array.<", "Array<"]) {
        let elements = parse_type_at_depth(interior, limits, depth + 1)?;
        return Ok(TypeNode::new(expr, TypeKind::Array(elements)));
    }
    if let Some(inner) = match_literal_array(expr) {
        let elements = parse_type_at_depth(&inner, limits, depth + 1)?;
        return Ok(TypeNode::new(expr, TypeKind::Array(elements)));
    }
    if let Some(interior) = match_generic(expr, &["Object.<", "Record<"]) {
        let (key_text, value_text) = match split_first_top_level(interior, ',') {
            Some((k, v)) => (k, v),
            None => (interior.to_string(), "*".to_string()),
        };
        let keys = parse_type_at_depth(&key_text, limits, depth + 1)?;
        let values = parse_type_at_depth(&value_text, limits, depth + 1)?;
        return Ok(TypeNode::new(expr, TypeKind::Map { keys, values }));
    }
    if expr.starts_with('{') && find_closing_bracket(expr, 0) == expr.len() - 1 {
        let fields = parse_object_literal(&expr[1..expr.len() - 1], limits, depth)?;
        return Ok(TypeNode::new(expr, TypeKind::ObjectLiteral(fields)));
    }
    if is_identifier(expr) {
        return Ok(TypeNode::new(expr, TypeKind::Typedef(expr.to_string())));
    }

    // Unknown syntax degrades to any, preserving the expression verbatim
    Ok(TypeNode::any(expr))
}

fn match_number_literal(expr: &str) -> Option<f64> {
    let first = expr.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '-' | '+' | '.')) {
        return None;
    }
    expr.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn match_string_literal(expr: &str) -> Option<String> {
    let bytes = expr.as_bytes();
    if bytes.len() < 2 || !matches!(bytes[0], b'\'' | b'"' | b'`') {
        return None;
    }
    if find_closing_quote(expr, 0) != expr.len() - 1 {
        return None;
    }
    Some(expr[1..expr.len() - 1].to_string())
}

/// Match `Prefix<...>` forms, returning the angle-bracket interior.
fn match_generic<'a>(expr: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    for prefix in prefixes {
        if let Some(rest) = expr.strip_prefix(prefix) {
            if let Some(interior) = rest.strip_suffix('>') {
                // The opener must match the final closer
                let open = prefix.len() - 1;
                if find_closing_bracket(expr, open) == expr.len() - 1 {
                    return Some(interior);
                }
            }
        }
    }
    None
}

/// Match `T[]` and `(Expr)[]`, returning the element expression.
fn match_literal_array(expr: &str) -> Option<String> {
    let prefix = expr.strip_suffix("[]")?;
    if prefix.is_empty() {
        return Some("*".to_string());
    }
    if prefix.starts_with('(') && find_closing_bracket(prefix, 0) == prefix.len() - 1 {
        return Some(prefix[1..prefix.len() - 1].to_string());
    }
    Some(prefix.to_string())
}

fn is_identifier(expr: &str) -> bool {
    let mut chars = expr.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.'))
}

/// Parse the interior of an inline object literal into ordered fields.
///
/// Leading comments attach to the previously completed field (after a comma,
/// a trailing comment lands at the head of the next raw member); trailing
/// comments on the type text document the current field. Either comment may
/// embed a filter literal.
fn parse_object_literal(interior: &str, limits: &Limits, depth: usize) -> SchemaResult<Vec<Field>> {
    let members = split_top_level(interior, &[',']);
    let mut fields: Vec<Field> = Vec::new();

    for member in &members {
        if fields.len() > limits.max_object_fields {
            return Err(SchemaError::limit(
                format!(
                    "object literal exceeds maximum of {} fields",
                    limits.max_object_fields
                ),
                0,
            ));
        }

        let (leading, rest) = isolate_leading_comment(member)?;
        if !leading.is_empty() {
            if let Some(prev) = fields.last_mut() {
                let (description, filters) = parse_filters(&leading, &prev.types)?;
                append_description(&mut prev.description, &description);
                for (name, entry) in filters.iter() {
                    prev.filters.insert(name, entry.clone());
                }
            }
        }

        let rest = rest.trim();
        if rest.is_empty() {
            continue;
        }

        let (key_text, type_text) = match split_first_top_level(rest, ':') {
            Some((k, v)) => (k, v),
            None => (rest.to_string(), "*".to_string()),
        };
        let (type_text, trailing) = isolate_trailing_comment(&type_text)?;

        let mut key = key_text.trim().to_string();
        let optional = key.ends_with('?');
        if optional {
            key.truncate(key.len() - 1);
            key = key.trim_end().to_string();
        }
        if let Some(stripped) = strip_quoted(&key) {
            key = stripped;
        }

        let mut types = parse_type_at_depth(type_text.trim(), limits, depth + 1)?;
        if optional && !types.iter().any(|t| t.kind == TypeKind::Undefined) {
            types.push(TypeNode::undefined());
        }

        let (description, filters) = parse_filters(&trailing, &types)?;

        fields.push(Field {
            key,
            types,
            description,
            filters,
        });
    }

    Ok(fields)
}

fn strip_quoted(key: &str) -> Option<String> {
    let bytes = key.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'\'' | b'"' | b'`')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        return Some(key[1..key.len() - 1].to_string());
    }
    None
}

fn append_description(dest: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !dest.is_empty() {
        dest.push(' ');
    }
    dest.push_str(text);
}
