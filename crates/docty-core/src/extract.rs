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

//! Tag extraction: raw source text to [`CommentRecord`]s and [`Ast`]s.
//!
//! Comment discovery accepts the single-line `/** ... */` form and the
//! multi-line form whose interior lines carry a `*` marker. Line numbers come
//! from a [`LineIndex`] built once per input.

use crate::ast::{Ast, ImportSpec, Scope};
use crate::error::{SchemaError, SchemaResult};
use crate::filters::parse_filters;
use crate::limits::Limits;
use crate::scan::{find_closing_bracket, LineIndex};
use crate::tag::{assign_ids, group_destructured, parse_name_token, Tag};
use crate::typeexpr::parse_type;

/// One extracted annotation block, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    /// Raw comment text including the `/**` and `*/` delimiters.
    pub text: String,
    /// First line of the block (1-based).
    pub line_start: usize,
    /// Last line of the block (1-based).
    pub line_end: usize,
    /// The literal line of code immediately following, if non-blank.
    pub code_after: String,
}

/// Locate all annotation comment blocks in `source`.
pub fn find_comment_blocks(source: &str) -> Vec<CommentRecord> {
    let index = LineIndex::new(source);
    let lines: Vec<&str> = source.lines().collect();
    let mut records = Vec::new();
    let mut from = 0usize;

    while let Some(rel) = source[from..].find("/**") {
        let start = from + rel;
        let close = match source[start + 3..].find("*/") {
            Some(c) => start + 3 + c,
            None => break,
        };
        let end = close + 2;
        let line_start = index.line_of(start);
        let line_end = index.line_of(close);
        let code_after = lines
            .get(line_end)
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .unwrap_or("")
            .to_string();
        records.push(CommentRecord {
            text: source[start..end].to_string(),
            line_start,
            line_end,
            code_after,
        });
        from = end;
    }

    records
}

/// Parse one comment block into an [`Ast`].
///
/// Registries are left empty; the caller populates them before publishing.
pub fn parse_block(record: &CommentRecord, limits: &Limits) -> SchemaResult<Ast> {
    if record.text.len() > limits.max_comment_size {
        return Err(SchemaError::limit(
            format!(
                "comment block exceeds maximum size of {} bytes",
                limits.max_comment_size
            ),
            record.line_start,
        ));
    }

    let lines = clean_lines(record);
    let (free_text, raw_tags) = split_segments(&lines);

    if raw_tags.len() > limits.max_tags_per_block {
        return Err(SchemaError::limit(
            format!(
                "comment block exceeds maximum of {} tags",
                limits.max_tags_per_block
            ),
            record.line_start,
        ));
    }

    let mut ast = Ast {
        line_start: record.line_start,
        line_end: record.line_end,
        code_after: record.code_after.clone(),
        ..Ast::default()
    };

    let mut description_segments: Vec<String> = Vec::new();
    let pre_tag = collapse_lines(&free_text);
    if !pre_tag.is_empty() {
        description_segments.push(pre_tag);
    }

    let mut restricted = false;

    for raw in &raw_tags {
        match canonical_tag_name(&raw.name) {
            "private" => {
                ast.scope.private = true;
                restricted = true;
            }
            "protected" => {
                ast.scope.protected = true;
                restricted = true;
            }
            "public" => {}
            "strict" => ast.strict = true,
            "description" => {
                let text = collapse_lines(&raw.body_lines);
                if !text.is_empty() {
                    description_segments.push(text);
                }
            }
            "import" => ast.imports.push(parse_import(raw)?),
            "param" => ast.params.push(parse_tag(raw, true, limits)?),
            "property" => ast.properties.push(parse_tag(raw, true, limits)?),
            "type" => ast.type_tag = Some(parse_tag(raw, false, limits)?),
            "enum" => ast.enum_tag = Some(parse_tag(raw, false, limits)?),
            "returns" => ast.returns_tag = Some(parse_tag(raw, false, limits)?),
            "yields" => ast.yields_tag = Some(parse_tag(raw, false, limits)?),
            "typedef" => ast.typedef_tag = Some(parse_tag(raw, true, limits)?),
            "callback" => ast.callback_tag = Some(parse_tag(raw, true, limits)?),
            _ => {} // tags outside the schema subset are ignored
        }
    }

    if restricted {
        ast.scope.public = false;
    }

    ast.description = description_segments.join("\n");

    group_destructured(&mut ast.params);
    assign_ids(&mut ast.params);
    assign_ids(&mut ast.properties);

    Ok(ast)
}

// -- Line cleaning and segmentation -------------------------------------------

/// A cleaned comment line with its 1-based source line number.
#[derive(Debug, Clone)]
struct CleanLine {
    line: usize,
    text: String,
}

/// One raw tag occurrence: name, body lines, source line.
#[derive(Debug, Clone)]
struct RawTag {
    name: String,
    body_lines: Vec<String>,
    line: usize,
}

impl RawTag {
    fn body(&self) -> String {
        self.body_lines.join("\n")
    }
}

/// Strip comment delimiters and per-line `*` markers.
fn clean_lines(record: &CommentRecord) -> Vec<CleanLine> {
    let mut out = Vec::new();
    let total = record.text.lines().count();

    for (i, line) in record.text.lines().enumerate() {
        let mut text = line;
        if i == 0 {
            text = text.trim_start();
            text = text.strip_prefix("/**").unwrap_or(text);
        }
        if i == total - 1 {
            text = text.trim_end();
            text = text.strip_suffix("*/").unwrap_or(text);
        }
        if i > 0 {
            let trimmed = text.trim_start();
            if let Some(rest) = trimmed.strip_prefix('*') {
                text = rest.strip_prefix(' ').unwrap_or(rest);
            } else {
                text = trimmed;
            }
        }
        out.push(CleanLine {
            line: record.line_start + i,
            text: text.trim_end().to_string(),
        });
    }

    out
}

/// Group cleaned lines into the leading free text and the tag occurrences.
fn split_segments(lines: &[CleanLine]) -> (Vec<String>, Vec<RawTag>) {
    let mut free_text = Vec::new();
    let mut tags: Vec<RawTag> = Vec::new();

    for clean in lines {
        let trimmed = clean.text.trim_start();
        if let Some(rest) = tag_line(trimmed) {
            let (name, after) = rest;
            tags.push(RawTag {
                name,
                body_lines: vec![after],
                line: clean.line,
            });
        } else if let Some(current) = tags.last_mut() {
            current.body_lines.push(clean.text.clone());
        } else {
            free_text.push(clean.text.clone());
        }
    }

    (free_text, tags)
}

/// Split `@name rest` when the line starts a tag.
fn tag_line(trimmed: &str) -> Option<(String, String)> {
    let rest = trimmed.strip_prefix('@')?;
    let first = rest.chars().next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    let name_end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let name = rest[..name_end].to_string();
    let after = rest[name_end..].trim_start().to_string();
    Some((name, after))
}

/// Canonical spelling for tag-name synonyms.
///
/// Normalization happens on the parsed tag-name token, so overlapping
/// aliases cannot clobber each other.
fn canonical_tag_name(name: &str) -> &str {
    match name {
        "arg" | "argument" => "param",
        "prop" => "property",
        "return" => "returns",
        "yield" => "yields",
        "desc" => "description",
        other => other,
    }
}

/// Join a segment's lines: consecutive non-empty lines with a space, blank
/// lines as explicit newlines.
fn collapse_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    let mut need_space = false;
    for line in lines {
        let text = line.as_ref().trim();
        if text.is_empty() {
            out.push('\n');
            need_space = false;
        } else {
            if need_space {
                out.push(' ');
            }
            out.push_str(text);
            need_space = true;
        }
    }
    out.trim_matches('\n').to_string()
}

// -- Tag parsing ---------------------------------------------------------------

/// Parse one tag occurrence: `{type}`, optional name token, then the
/// description+filter tail.
fn parse_tag(raw: &RawTag, name_bearing: bool, limits: &Limits) -> SchemaResult<Tag> {
    let body = raw.body();
    let body = body.trim();

    let mut optional = false;
    let (type_expression, rest) = if body.starts_with('{') {
        let close = find_closing_bracket(body, 0);
        if close == 0 {
            return Err(SchemaError::syntax(
                format!("unmatched '{{' in @{} tag", raw.name),
                raw.line,
            ));
        }
        let mut inner = body[1..close].trim().to_string();
        if let Some(stripped) = inner.strip_suffix('=') {
            optional = true;
            inner = stripped.trim_end().to_string();
        }
        (inner, body[close + 1..].trim_start())
    } else {
        (String::new(), body)
    };

    let (tag_name, tail, default_value) = if name_bearing {
        let mut parts = rest.splitn(2, char::is_whitespace);
        let token = parts.next().unwrap_or("");
        let tail = parts.next().unwrap_or("").to_string();
        let (name, opt, default) = parse_name_token(token);
        if opt {
            optional = true;
        }
        (name, tail, default)
    } else {
        (String::new(), rest.to_string(), None)
    };

    finish_tag(raw, &type_expression, tag_name, &tail, optional, default_value, limits)
}

fn finish_tag(
    raw: &RawTag,
    type_expression: &str,
    tag_name: String,
    tail: &str,
    optional: bool,
    default_value: Option<String>,
    limits: &Limits,
) -> SchemaResult<Tag> {
    let types = parse_type(type_expression, limits).map_err(|e| at_line(e, raw.line))?;
    let (description, filters) =
        parse_filters(tail, &types).map_err(|e| at_line(e, raw.line))?;

    Ok(Tag {
        name: canonical_tag_name(&raw.name).to_string(),
        type_expression: type_expression.to_string(),
        types,
        tag_name,
        description,
        filters,
        optional,
        default_value,
        destructured: None,
        id: 0,
        line: raw.line,
    })
}

fn at_line(mut err: SchemaError, line: usize) -> SchemaError {
    if err.line == 0 {
        err.line = line;
    }
    err
}

/// Parse an `@import {A, B} from 'specifier'` tag body.
fn parse_import(raw: &RawTag) -> SchemaResult<ImportSpec> {
    let body = raw.body();
    let body = body.trim();

    let close = if body.starts_with('{') {
        find_closing_bracket(body, 0)
    } else {
        0
    };
    if close == 0 {
        return Err(SchemaError::tag(
            "expected '{Name, ...}' after @import",
            raw.line,
        ));
    }

    let names: Vec<String> = body[1..close]
        .split(',')
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return Err(SchemaError::tag("@import names nothing", raw.line));
    }

    let rest = body[close + 1..].trim();
    let specifier = match rest.strip_prefix("from") {
        Some(spec) => spec.trim(),
        None => {
            return Err(SchemaError::tag(
                "expected 'from' in @import tag",
                raw.line,
            ))
        }
    };
    let specifier = specifier
        .trim_matches(|c| matches!(c, '\'' | '"' | '`'))
        .to_string();
    if specifier.is_empty() {
        return Err(SchemaError::tag("@import has no specifier", raw.line));
    }

    Ok(ImportSpec {
        names,
        specifier,
        line: raw.line,
    })
}
