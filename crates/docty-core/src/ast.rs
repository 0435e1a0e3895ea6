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

//! Fully parsed comment blocks.
//!
//! One [`Ast`] is produced per comment block. It is built, its registries are
//! populated, and only then is it published behind an `Arc` — an `Ast` that
//! has been handed out is never mutated again.

use crate::tag::Tag;
use std::sync::Arc;

/// Visibility scope of a comment block.
///
/// Default is public. `@private` or `@protected` anywhere in the block forces
/// public off; multiple markers may co-exist, all flip their own flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub private: bool,
    pub protected: bool,
    pub public: bool,
}

impl Default for Scope {
    fn default() -> Self {
        Self {
            private: false,
            protected: false,
            public: true,
        }
    }
}

impl Scope {
    /// Returns true if no restricting marker was present.
    pub fn is_public(&self) -> bool {
        self.public
    }
}

/// One `@import {A, B} from 'specifier'` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Imported typedef names.
    pub names: Vec<String>,
    /// Import specifier, verbatim (quotes stripped).
    pub specifier: String,
    /// Source line of the tag (1-based).
    pub line: usize,
}

/// One comment block, fully parsed.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    /// Assembled description: pre-tag free text plus `@description` bodies.
    pub description: String,
    /// Visibility scope.
    pub scope: Scope,
    /// All `@param` tags, in source order, after destructured grouping.
    pub params: Vec<Tag>,
    /// All `@property` tags, in source order.
    pub properties: Vec<Tag>,
    /// Last `@type` tag, if any.
    pub type_tag: Option<Tag>,
    /// Last `@enum` tag, if any.
    pub enum_tag: Option<Tag>,
    /// Last `@typedef` tag, if any.
    pub typedef_tag: Option<Tag>,
    /// Last `@callback` tag, if any.
    pub callback_tag: Option<Tag>,
    /// Last `@returns` tag, if any.
    pub returns_tag: Option<Tag>,
    /// Last `@yields` tag, if any.
    pub yields_tag: Option<Tag>,
    /// `@import` records, in source order.
    pub imports: Vec<ImportSpec>,
    /// True when the block carries `@strict`.
    pub strict: bool,
    /// First line of the comment block (1-based).
    pub line_start: usize,
    /// Last line of the comment block (1-based).
    pub line_end: usize,
    /// The line of code immediately following the block, if non-blank.
    pub code_after: String,
    /// Typedef/callback blocks from the same parse call.
    pub local_typedefs: Vec<Arc<Ast>>,
    /// Typedef blocks transitively reachable via same-file imports.
    pub ambient_typedefs: Vec<Arc<Ast>>,
    /// Typedef blocks explicitly pulled in via an `@import` tag.
    pub imported_typedefs: Vec<Arc<Ast>>,
}

impl Ast {
    /// The name this block defines, when it is a typedef or callback block.
    pub fn definition_name(&self) -> Option<&str> {
        if let Some(tag) = &self.typedef_tag {
            if !tag.tag_name.is_empty() {
                return Some(&tag.tag_name);
            }
        }
        if let Some(tag) = &self.callback_tag {
            if !tag.tag_name.is_empty() {
                return Some(&tag.tag_name);
            }
        }
        None
    }

    /// Returns true when this block defines a callback rather than a plain
    /// typedef.
    pub fn is_callback(&self) -> bool {
        self.typedef_tag.is_none() && self.callback_tag.is_some()
    }

    /// Returns true when the block carries no recognized schema content.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
            && self.properties.is_empty()
            && self.type_tag.is_none()
            && self.enum_tag.is_none()
            && self.typedef_tag.is_none()
            && self.callback_tag.is_none()
            && self.returns_tag.is_none()
            && self.yields_tag.is_none()
            && self.description.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Scope tests ====================

    #[test]
    fn test_scope_default_public() {
        let scope = Scope::default();
        assert!(scope.public);
        assert!(!scope.private);
        assert!(!scope.protected);
        assert!(scope.is_public());
    }

    // ==================== Ast tests ====================

    #[test]
    fn test_definition_name_typedef() {
        let mut ast = Ast::default();
        ast.typedef_tag = Some(Tag {
            name: "typedef".to_string(),
            tag_name: "MyType".to_string(),
            ..Tag::default()
        });
        assert_eq!(ast.definition_name(), Some("MyType"));
        assert!(!ast.is_callback());
    }

    #[test]
    fn test_definition_name_callback() {
        let mut ast = Ast::default();
        ast.callback_tag = Some(Tag {
            name: "callback".to_string(),
            tag_name: "onDone".to_string(),
            ..Tag::default()
        });
        assert_eq!(ast.definition_name(), Some("onDone"));
        assert!(ast.is_callback());
    }

    #[test]
    fn test_definition_name_none() {
        let ast = Ast::default();
        assert_eq!(ast.definition_name(), None);
    }

    #[test]
    fn test_is_empty() {
        let ast = Ast::default();
        assert!(ast.is_empty());
    }

    #[test]
    fn test_not_empty_with_description() {
        let mut ast = Ast::default();
        ast.description = "something".to_string();
        assert!(!ast.is_empty());
    }
}
