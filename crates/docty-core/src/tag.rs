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

//! Parsed annotation tags.
//!
//! A [`Tag`] is one `@param`-style entry: its canonical tag kind, the raw and
//! parsed type expression, its own name token, description, filters and the
//! positional/destructured bookkeeping the validator needs to align tags with
//! actual call arguments.

use crate::filters::Filters;
use crate::types::TypeNode;

/// One parsed annotation entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    /// Canonical tag kind ("param", "property", "typedef", ...).
    pub name: String,
    /// Raw type expression as written between `{` and `}`.
    pub type_expression: String,
    /// Parsed type alternatives.
    pub types: Vec<TypeNode>,
    /// The tag's own identifier (parameter name, typedef name, ...).
    pub tag_name: String,
    /// Free-text description, with any filter literal removed.
    pub description: String,
    /// Constraints from the description tail.
    pub filters: Filters,
    /// True for `[name]`, `[name=default]`, `name=` or `{Type=}` markers.
    pub optional: bool,
    /// Default value text from `[name=default]`, if any.
    pub default_value: Option<String>,
    /// `(owner, property)` when the tag is a destructured member.
    pub destructured: Option<(String, String)>,
    /// Positional index aligning the tag with actual call arguments. Tags
    /// sharing a destructured owner share one id.
    pub id: usize,
    /// Source line the tag starts on (1-based).
    pub line: usize,
}

/// Parse a tag's name token, stripping optional markers.
///
/// Recognized shapes: `name`, `[name]`, `[name=default]` and `name=`.
/// Returns `(name, optional, default_value)`.
pub fn parse_name_token(token: &str) -> (String, bool, Option<String>) {
    let token = token.trim();
    if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        match inner.split_once('=') {
            Some((name, default)) => (
                name.trim().to_string(),
                true,
                Some(default.trim().to_string()),
            ),
            None => (inner.trim().to_string(), true, None),
        }
    } else if let Some(name) = token.strip_suffix('=') {
        (name.trim().to_string(), true, None)
    } else {
        (token.to_string(), false, None)
    }
}

/// Mark `owner.prop` tags as destructured and drop their synthetic parents.
///
/// A dotted tag belongs to the most recently declared tag literally named
/// `owner`, but only while it sits in the contiguous run following that
/// owner. Once an owner collected at least one child it is removed from the
/// visible list; the children are validated individually against the actual
/// argument's properties. An owner with no collected children is left
/// untouched, as is a dotted tag with no live owner run.
pub fn group_destructured(tags: &mut Vec<Tag>) {
    let mut remove = vec![false; tags.len()];

    for i in 0..tags.len() {
        let dot = match tags[i].tag_name.find('.') {
            Some(d) => d,
            None => continue,
        };
        let owner = tags[i].tag_name[..dot].to_string();
        let prop = tags[i].tag_name[dot + 1..].to_string();

        let prev_is_run = i > 0
            && (tags[i - 1].destructured.is_none() && tags[i - 1].tag_name == owner
                || tags[i - 1]
                    .destructured
                    .as_ref()
                    .is_some_and(|(o, _)| *o == owner));
        if !prev_is_run {
            continue;
        }

        tags[i].destructured = Some((owner.clone(), prop));
        if let Some(j) = (0..i)
            .rev()
            .find(|&j| tags[j].destructured.is_none() && tags[j].tag_name == owner)
        {
            remove[j] = true;
        }
    }

    let mut keep = remove.iter().map(|r| !r);
    tags.retain(|_| keep.next().unwrap());
}

/// Assign positional ids in one walk over the deduplicated tag list.
///
/// The id increments only when a tag introduces a new positional parameter:
/// it is not destructured, or its owner differs from the immediately
/// preceding tag's owner.
pub fn assign_ids(tags: &mut [Tag]) {
    let mut id = 0usize;
    for i in 0..tags.len() {
        if i > 0 {
            let new_parameter = match &tags[i].destructured {
                None => true,
                Some((owner, _)) => !tags[i - 1]
                    .destructured
                    .as_ref()
                    .is_some_and(|(prev_owner, _)| prev_owner == owner),
            };
            if new_parameter {
                id += 1;
            }
        }
        tags[i].id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Tag {
        Tag {
            name: "param".to_string(),
            tag_name: name.to_string(),
            ..Tag::default()
        }
    }

    // ==================== parse_name_token tests ====================

    #[test]
    fn test_name_plain() {
        assert_eq!(parse_name_token("value"), ("value".to_string(), false, None));
    }

    #[test]
    fn test_name_optional_brackets() {
        assert_eq!(parse_name_token("[value]"), ("value".to_string(), true, None));
    }

    #[test]
    fn test_name_optional_with_default() {
        assert_eq!(
            parse_name_token("[count=10]"),
            ("count".to_string(), true, Some("10".to_string()))
        );
    }

    #[test]
    fn test_name_trailing_equals() {
        assert_eq!(parse_name_token("value="), ("value".to_string(), true, None));
    }

    #[test]
    fn test_name_default_preserves_text() {
        assert_eq!(
            parse_name_token("[label='hi there']"),
            ("label".to_string(), true, Some("'hi there'".to_string()))
        );
    }

    // ==================== group_destructured tests ====================

    #[test]
    fn test_group_basic() {
        let mut tags = vec![named("input"), named("input.arg1"), named("input.arg2")];
        group_destructured(&mut tags);
        assert_eq!(tags.len(), 2);
        assert_eq!(
            tags[0].destructured,
            Some(("input".to_string(), "arg1".to_string()))
        );
        assert_eq!(
            tags[1].destructured,
            Some(("input".to_string(), "arg2".to_string()))
        );
    }

    #[test]
    fn test_group_parent_without_children_kept() {
        let mut tags = vec![named("obj"), named("other")];
        group_destructured(&mut tags);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].tag_name, "obj");
        assert!(tags[0].destructured.is_none());
    }

    #[test]
    fn test_group_non_contiguous_not_reparented() {
        // A dotted tag separated from its would-be owner by an unrelated tag
        let mut tags = vec![named("obj"), named("other"), named("obj.x")];
        group_destructured(&mut tags);
        assert_eq!(tags.len(), 3);
        assert!(tags[2].destructured.is_none());
        assert_eq!(tags[2].tag_name, "obj.x");
    }

    #[test]
    fn test_group_two_owners() {
        let mut tags = vec![
            named("a"),
            named("a.x"),
            named("b"),
            named("b.y"),
            named("b.z"),
        ];
        group_destructured(&mut tags);
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].destructured, Some(("a".to_string(), "x".to_string())));
        assert_eq!(tags[1].destructured, Some(("b".to_string(), "y".to_string())));
        assert_eq!(tags[2].destructured, Some(("b".to_string(), "z".to_string())));
    }

    #[test]
    fn test_group_orphan_dotted_tag_untouched() {
        let mut tags = vec![named("lone.prop")];
        group_destructured(&mut tags);
        assert_eq!(tags.len(), 1);
        assert!(tags[0].destructured.is_none());
    }

    // ==================== assign_ids tests ====================

    #[test]
    fn test_ids_plain_sequence() {
        let mut tags = vec![named("a"), named("b"), named("c")];
        assign_ids(&mut tags);
        assert_eq!(tags.iter().map(|t| t.id).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_ids_destructured_share_one() {
        let mut tags = vec![named("first"), named("input"), named("input.a"), named("input.b")];
        group_destructured(&mut tags);
        assign_ids(&mut tags);
        // first=0, then input.a and input.b share id 1
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].id, 0);
        assert_eq!(tags[1].id, 1);
        assert_eq!(tags[2].id, 1);
    }

    #[test]
    fn test_ids_two_destructured_groups() {
        let mut tags = vec![
            named("a"),
            named("a.x"),
            named("b"),
            named("b.y"),
        ];
        group_destructured(&mut tags);
        assign_ids(&mut tags);
        assert_eq!(tags[0].id, 0); // a.x
        assert_eq!(tags[1].id, 1); // b.y
    }

    #[test]
    fn test_ids_empty_list() {
        let mut tags: Vec<Tag> = Vec::new();
        assign_ids(&mut tags);
        assert!(tags.is_empty());
    }
}
