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

//! Constraint ("filter") model and parser.
//!
//! A tag's free-text tail may embed one `{...}` filter literal. The literal
//! grammar is deliberately tiny: numbers, booleans, quoted strings, regex
//! literals and two-element `[value, "custom message"]` tuples. There is no
//! expression evaluation of any kind.
//!
//! Filter names are scoped per category of the owning type (array, number,
//! string). An unknown name, or a value of the wrong kind, is a schema error
//! at parse time — it indicates a malformed schema, not bad input data.

use crate::error::{SchemaError, SchemaResult};
use crate::scan::find_closing_bracket;
use crate::types::{Primitive, TypeKind, TypeNode};
use regex::Regex;
use std::sync::LazyLock;

// -- Filter values ------------------------------------------------------------

/// A parsed filter value.
#[derive(Debug, Clone)]
pub enum FilterValue {
    /// Numeric bound or length.
    Number(f64),
    /// Boolean toggle (format checks, int/finite/safeInt).
    Bool(bool),
    /// Text operand (startsWith, endsWith, includes, excludes).
    Str(String),
    /// Compiled regex with its literal source, for `pattern`.
    Pattern { source: String, regex: Regex },
}

impl PartialEq for FilterValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Pattern { source: a, .. }, Self::Pattern { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Str(s) => write!(f, "\"{}\"", s),
            Self::Pattern { source, .. } => write!(f, "/{}/", source),
        }
    }
}

/// One normalized filter: the value plus an optional custom message.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    /// The constraint operand.
    pub value: FilterValue,
    /// Custom failure message; empty when the schema supplied none.
    pub message: String,
}

/// An ordered name → entry map of filters attached to one tag or field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters {
    entries: Vec<(String, FilterEntry)>,
}

impl Filters {
    /// An empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a filter by name.
    pub fn get(&self, name: &str) -> Option<&FilterEntry> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    /// Insert a filter, replacing any previous entry of the same name.
    pub fn insert(&mut self, name: impl Into<String>, entry: FilterEntry) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = entry;
        } else {
            self.entries.push((name, entry));
        }
    }

    /// Iterate filters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no filters are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// -- Categories and allow-lists -----------------------------------------------

/// The constraint category a type alternative belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCategory {
    Array,
    Number,
    String,
}

/// The value kind a filter name expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    /// A numeric operand.
    Number,
    /// A boolean toggle.
    Boolean,
    /// A string or numeric operand, used as text.
    Text,
    /// A regex literal.
    Pattern,
}

impl ExpectedKind {
    fn accepts(self, value: &FilterValue) -> bool {
        match self {
            Self::Number => matches!(value, FilterValue::Number(_)),
            Self::Boolean => matches!(value, FilterValue::Bool(_)),
            Self::Text => matches!(value, FilterValue::Str(_) | FilterValue::Number(_)),
            Self::Pattern => matches!(value, FilterValue::Pattern { .. }),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::Text => "a string or number",
            Self::Pattern => "a regex literal",
        }
    }
}

/// The filter category of one type alternative, if it has one.
pub fn category_of(kind: &TypeKind) -> Option<FilterCategory> {
    match kind {
        TypeKind::Array(_) => Some(FilterCategory::Array),
        TypeKind::Primitive(Primitive::Number) | TypeKind::NumberLiteral(_) => {
            Some(FilterCategory::Number)
        }
        TypeKind::Primitive(Primitive::String) | TypeKind::StringLiteral(_) => {
            Some(FilterCategory::String)
        }
        _ => None,
    }
}

/// The expected value kind for a filter name within a category, or `None`
/// when the name is not allowed there.
pub fn allowed_filter(category: FilterCategory, name: &str) -> Option<ExpectedKind> {
    match category {
        FilterCategory::Array => match name {
            "min" | "max" | "length" => Some(ExpectedKind::Number),
            _ => None,
        },
        FilterCategory::Number => match name {
            "min" | "max" | "gte" | "lte" | "gt" | "lt" | "step" => Some(ExpectedKind::Number),
            "int" | "finite" | "safeInt" => Some(ExpectedKind::Boolean),
            _ => None,
        },
        FilterCategory::String => match name {
            "min" | "max" | "length" => Some(ExpectedKind::Number),
            "startsWith" | "endsWith" | "includes" | "excludes" => Some(ExpectedKind::Text),
            "pattern" => Some(ExpectedKind::Pattern),
            "url" | "ip" | "ipv4" | "ipv6" | "email" | "cuid" | "cuid2" | "ulid" | "uuid" => {
                Some(ExpectedKind::Boolean)
            }
            _ => None,
        },
    }
}

// -- String format checks -----------------------------------------------------

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$").unwrap()
});

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://\S+$").unwrap());

static RE_CUID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^c[a-z0-9]{24}$").unwrap());

static RE_CUID2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*$").unwrap());

static RE_ULID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[0-9A-HJKMNP-TV-Z]{26}$").unwrap());

static RE_UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

/// Check a string against a named format filter.
///
/// Returns `None` for names that are not format checks.
pub fn matches_format(name: &str, s: &str) -> Option<bool> {
    match name {
        "email" => Some(RE_EMAIL.is_match(s)),
        "url" => Some(RE_URL.is_match(s)),
        "ip" => Some(s.parse::<std::net::IpAddr>().is_ok()),
        "ipv4" => Some(s.parse::<std::net::Ipv4Addr>().is_ok()),
        "ipv6" => Some(s.parse::<std::net::Ipv6Addr>().is_ok()),
        "cuid" => Some(RE_CUID.is_match(s)),
        "cuid2" => Some(RE_CUID2.is_match(s)),
        "ulid" => Some(RE_ULID.is_match(s)),
        "uuid" => Some(RE_UUID.is_match(s)),
        _ => None,
    }
}

// -- Filter literal parser ----------------------------------------------------

/// Extract the filter literal from a tag's free-text tail.
///
/// Returns `(description, filters)`. The description is the text around the
/// literal, trimmed and rejoined; with no top-level `{` the entire tail is
/// description. Filter names and value kinds are validated against the
/// categories of `types` — a violation is a [`SchemaError`], since it means
/// the schema itself is malformed.
pub fn parse_filters(tail: &str, types: &[TypeNode]) -> SchemaResult<(String, Filters)> {
    let stripped = tail.trim_start().trim_start_matches('-').trim_start();

    let open = match top_level_brace(stripped) {
        Some(pos) => pos,
        None => return Ok((normalize_description(stripped), Filters::new())),
    };
    let close = find_closing_bracket(stripped, open);
    if close == 0 {
        // Unclosed brace: not a filter literal, keep the tail as prose.
        return Ok((normalize_description(stripped), Filters::new()));
    }

    let literal = &stripped[open + 1..close];
    let front = stripped[..open].trim();
    let back = stripped[close + 1..].trim();
    let mut description = String::new();
    for part in [front, back] {
        if part.is_empty() {
            continue;
        }
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(part);
    }

    let filters = LiteralParser::new(literal).parse()?;
    validate_filters(&filters, types)?;
    Ok((normalize_description(&description), filters))
}

/// Find the first `{` outside quotes.
fn top_level_brace(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => return Some(i),
            b'\'' | b'"' | b'`' => {
                let end = crate::scan::find_closing_quote(s, i);
                if end == 0 {
                    return None;
                }
                i = end + 1;
            }
            _ => i += 1,
        }
    }
    None
}

fn normalize_description(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check every filter against the categorized alternatives of the type list.
fn validate_filters(filters: &Filters, types: &[TypeNode]) -> SchemaResult<()> {
    if filters.is_empty() {
        return Ok(());
    }

    let categories: Vec<(FilterCategory, &TypeNode)> = types
        .iter()
        .filter_map(|t| category_of(&t.kind).map(|c| (c, t)))
        .collect();

    if categories.is_empty() {
        return Err(SchemaError::filter(
            format!(
                "filters are not applicable to type '{}'",
                crate::types::format_union(types)
            ),
            0,
        ));
    }

    for (name, entry) in filters.iter() {
        for &(category, node) in &categories {
            match allowed_filter(category, name) {
                Some(expected) => {
                    if !expected.accepts(&entry.value) {
                        return Err(SchemaError::filter(
                            format!(
                                "filter '{}' on type '{}' expects {}",
                                name,
                                node.expr,
                                expected.describe()
                            ),
                            0,
                        ));
                    }
                }
                None => {
                    return Err(SchemaError::filter(
                        format!("unknown filter '{}' for type '{}'", name, node.expr),
                        0,
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Recursive-descent parser for the filter literal interior.
struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> SchemaResult<Filters> {
        let mut filters = Filters::new();
        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            let name = self.parse_name()?;
            self.skip_whitespace();
            match self.advance() {
                Some(':') => {}
                _ => {
                    return Err(self.error(format!("expected ':' after filter name '{}'", name)));
                }
            }
            self.skip_whitespace();
            let (value, message) = self.parse_entry()?;
            filters.insert(name, FilterEntry { value, message });
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                None => break,
                Some(c) => {
                    return Err(self.error(format!("unexpected '{}' in filter literal", c)));
                }
            }
        }
        Ok(filters)
    }

    fn parse_name(&mut self) -> SchemaResult<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.error("expected a filter name"));
        }
        Ok(name)
    }

    /// Parse a value, or a `[value, "message"]` tuple.
    fn parse_entry(&mut self) -> SchemaResult<(FilterValue, String)> {
        if self.peek() == Some('[') {
            self.advance();
            self.skip_whitespace();
            let value = self.parse_value()?;
            self.skip_whitespace();
            if self.advance() != Some(',') {
                return Err(self.error("expected ',' inside [value, message] tuple"));
            }
            self.skip_whitespace();
            let message = match self.parse_value()? {
                FilterValue::Str(s) => s,
                _ => return Err(self.error("custom message must be a string")),
            };
            self.skip_whitespace();
            if self.advance() != Some(']') {
                return Err(self.error("expected ']' closing the tuple"));
            }
            return Ok((value, message));
        }
        Ok((self.parse_value()?, String::new()))
    }

    fn parse_value(&mut self) -> SchemaResult<FilterValue> {
        match self.peek() {
            Some('\'') | Some('"') | Some('`') => self.parse_string(),
            Some('/') => self.parse_regex(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => {
                self.parse_number()
            }
            Some(c) if c.is_ascii_alphabetic() => self.parse_keyword(),
            Some(c) => Err(self.error(format!("unexpected '{}' in filter value", c))),
            None => Err(self.error("unexpected end of filter literal")),
        }
    }

    fn parse_string(&mut self) -> SchemaResult<FilterValue> {
        let quote = self.advance().unwrap();
        let mut out = String::new();
        loop {
            match self.advance() {
                Some('\\') => match self.advance() {
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated string in filter literal")),
                },
                Some(c) if c == quote => return Ok(FilterValue::Str(out)),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string in filter literal")),
            }
        }
    }

    fn parse_regex(&mut self) -> SchemaResult<FilterValue> {
        self.advance(); // consume '/'
        let mut source = String::new();
        loop {
            match self.advance() {
                Some('\\') => {
                    source.push('\\');
                    match self.advance() {
                        Some(c) => source.push(c),
                        None => return Err(self.error("unterminated regex in filter literal")),
                    }
                }
                Some('/') => break,
                Some(c) => source.push(c),
                None => return Err(self.error("unterminated regex in filter literal")),
            }
        }
        // Trailing flags: i, m and s translate to inline flags
        let mut flags = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                if matches!(c, 'i' | 'm' | 's') {
                    flags.push(c);
                }
                self.advance();
            } else {
                break;
            }
        }
        let pattern = if flags.is_empty() {
            source.clone()
        } else {
            format!("(?{}){}", flags, source)
        };
        let regex = Regex::new(&pattern)
            .map_err(|e| self.error(format!("invalid regex /{}/: {}", source, e)))?;
        Ok(FilterValue::Pattern { source, regex })
    }

    fn parse_number(&mut self) -> SchemaResult<FilterValue> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        text.parse::<f64>()
            .map(FilterValue::Number)
            .map_err(|_| self.error(format!("invalid number '{}' in filter literal", text)))
    }

    fn parse_keyword(&mut self) -> SchemaResult<FilterValue> {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        match word.as_str() {
            "true" => Ok(FilterValue::Bool(true)),
            "false" => Ok(FilterValue::Bool(false)),
            _ => Err(self.error(format!("unexpected keyword '{}' in filter literal", word))),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::filter(message, 0).with_column(self.pos + 1)
    }
}
