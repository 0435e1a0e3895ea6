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

//! Parsed type tree.
//!
//! A type expression parses into a list of [`TypeNode`] alternatives (unions
//! are lists; matching any one alternative is success). Each node keeps the
//! verbatim expression text it was parsed from, which is what diagnostics
//! quote.

use crate::filters::Filters;

/// Bare primitive type names that match by runtime kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    BigInt,
    Boolean,
    Symbol,
}

impl Primitive {
    /// Parse a bare primitive name. `null` and `undefined` are separate
    /// [`TypeKind`] variants, not primitives.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "bigint" => Some(Self::BigInt),
            "boolean" => Some(Self::Boolean),
            "symbol" => Some(Self::Symbol),
            _ => None,
        }
    }

    /// The runtime kind name this primitive matches.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::BigInt => "bigint",
            Self::Boolean => "boolean",
            Self::Symbol => "symbol",
        }
    }
}

/// One field of an inline object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field key.
    pub key: String,
    /// Type alternatives for the field's value. A field is optional exactly
    /// when this list contains `Undefined`.
    pub types: Vec<TypeNode>,
    /// Description taken from the field's `//` comment.
    pub description: String,
    /// Constraints taken from the comment's embedded filter literal.
    pub filters: Filters,
}

impl Field {
    /// Returns true if the field may be absent.
    pub fn is_optional(&self) -> bool {
        self.types.iter().any(|t| t.kind == TypeKind::Undefined)
    }
}

/// The structural category of one parsed type alternative.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// `*` / `any`; also the fallback for unrecognized syntax.
    Any,
    /// The `null` literal type.
    Null,
    /// The `undefined` literal type.
    Undefined,
    /// A boolean literal: `true` or `false`.
    BoolLiteral(bool),
    /// A numeric literal: `42`, `-1.5`.
    NumberLiteral(f64),
    /// A quoted string literal.
    StringLiteral(String),
    /// A bare primitive name, matching by runtime kind.
    Primitive(Primitive),
    /// An array with element type alternatives.
    Array(Vec<TypeNode>),
    /// A key/value map: `Object.<K,V>` / `Record<K,V>`.
    Map {
        keys: Vec<TypeNode>,
        values: Vec<TypeNode>,
    },
    /// An inline object literal with ordered fields.
    ObjectLiteral(Vec<Field>),
    /// A bare-name reference resolved against the typedef registries.
    Typedef(String),
}

/// One parsed type alternative with its verbatim source text.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    /// The expression text this node was parsed from.
    pub expr: String,
    /// The structural category.
    pub kind: TypeKind,
}

impl TypeNode {
    /// Create a node from its source text and kind.
    pub fn new(expr: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            expr: expr.into(),
            kind,
        }
    }

    /// An `Any` node preserving the given source text verbatim.
    pub fn any(expr: impl Into<String>) -> Self {
        Self::new(expr, TypeKind::Any)
    }

    /// An `Undefined` node, as appended for `key?:` fields.
    pub fn undefined() -> Self {
        Self::new("undefined", TypeKind::Undefined)
    }
}

impl std::fmt::Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expr)
    }
}

/// Render a list of alternatives the way the source wrote a union.
pub fn format_union(types: &[TypeNode]) -> String {
    types
        .iter()
        .map(|t| t.expr.as_str())
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Primitive tests ====================

    #[test]
    fn test_primitive_from_name() {
        assert_eq!(Primitive::from_name("string"), Some(Primitive::String));
        assert_eq!(Primitive::from_name("number"), Some(Primitive::Number));
        assert_eq!(Primitive::from_name("bigint"), Some(Primitive::BigInt));
        assert_eq!(Primitive::from_name("boolean"), Some(Primitive::Boolean));
        assert_eq!(Primitive::from_name("symbol"), Some(Primitive::Symbol));
    }

    #[test]
    fn test_primitive_null_undefined_not_primitives() {
        assert_eq!(Primitive::from_name("null"), None);
        assert_eq!(Primitive::from_name("undefined"), None);
    }

    #[test]
    fn test_primitive_unknown() {
        assert_eq!(Primitive::from_name("object"), None);
        assert_eq!(Primitive::from_name("String"), None);
    }

    #[test]
    fn test_primitive_kind_name() {
        assert_eq!(Primitive::Number.kind_name(), "number");
        assert_eq!(Primitive::BigInt.kind_name(), "bigint");
    }

    // ==================== Field tests ====================

    #[test]
    fn test_field_optional_by_undefined() {
        let field = Field {
            key: "a".to_string(),
            types: vec![
                TypeNode::new("string", TypeKind::Primitive(Primitive::String)),
                TypeNode::undefined(),
            ],
            description: String::new(),
            filters: Filters::default(),
        };
        assert!(field.is_optional());
    }

    #[test]
    fn test_field_required_without_undefined() {
        let field = Field {
            key: "a".to_string(),
            types: vec![TypeNode::new("string", TypeKind::Primitive(Primitive::String))],
            description: String::new(),
            filters: Filters::default(),
        };
        assert!(!field.is_optional());
    }

    // ==================== TypeNode tests ====================

    #[test]
    fn test_node_any_preserves_expr() {
        let node = TypeNode::any("SomeUnknown<Syntax>");
        assert_eq!(node.expr, "SomeUnknown<Syntax>");
        assert_eq!(node.kind, TypeKind::Any);
    }

    #[test]
    fn test_node_display_is_expr() {
        let node = TypeNode::new("Array.<string>", TypeKind::Array(vec![]));
        assert_eq!(format!("{}", node), "Array.<string>");
    }

    #[test]
    fn test_format_union() {
        let types = vec![
            TypeNode::new("string", TypeKind::Primitive(Primitive::String)),
            TypeNode::new("number", TypeKind::Primitive(Primitive::Number)),
        ];
        assert_eq!(format_union(&types), "string|number");
    }

    #[test]
    fn test_node_equality() {
        let a = TypeNode::new("true", TypeKind::BoolLiteral(true));
        let b = TypeNode::new("true", TypeKind::BoolLiteral(true));
        assert_eq!(a, b);
    }
}
