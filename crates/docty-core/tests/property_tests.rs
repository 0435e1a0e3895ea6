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

//! Property-based tests for the scanner primitives and the type parser.

use docty_core::scan::{find_closing_bracket, find_closing_quote, split_top_level};
use docty_core::{parse_type, Limits, TypeKind};
use proptest::prelude::*;

/// Generate simple type expressions known to be valid.
fn arb_type_expr() -> impl Strategy<Value = String> {
    let atom = prop_oneof![
        Just("*".to_string()),
        Just("string".to_string()),
        Just("number".to_string()),
        Just("boolean".to_string()),
        Just("null".to_string()),
        Just("undefined".to_string()),
        Just("true".to_string()),
        Just("42".to_string()),
        Just("'lit'".to_string()),
        Just("SomeType".to_string()),
    ];
    atom.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| format!("Array.<{}>", t)),
            inner.clone().prop_map(|t| format!("{}[]", t)),
            (inner.clone(), inner.clone())
                .prop_map(|(k, v)| format!("Object.<{}, {}>", k, v)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{}|{}", a, b)),
            inner.prop_map(|t| format!("{{field: {}}}", t)),
        ]
    })
}

proptest! {
    /// Parsing the same expression twice yields structurally identical trees.
    #[test]
    fn prop_parse_type_deterministic(expr in arb_type_expr()) {
        let limits = Limits::default();
        let first = parse_type(&expr, &limits).unwrap();
        let second = parse_type(&expr, &limits).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Unknown syntax never fails: every input produces at least one node.
    #[test]
    fn prop_parse_type_total(expr in "[ -~]{0,40}") {
        let limits = Limits::default();
        if let Ok(types) = parse_type(&expr, &limits) {
            prop_assert!(!types.is_empty());
        }
    }

    /// A union of N atoms yields N alternatives in source order.
    #[test]
    fn prop_union_arity(count in 1usize..6) {
        let atoms = ["string", "number", "boolean", "null", "undefined", "SomeType"];
        let expr = atoms[..count].join("|");
        let limits = Limits::default();
        let types = parse_type(&expr, &limits).unwrap();
        prop_assert_eq!(types.len(), count);
    }

    /// Splitting never loses content: rejoining pieces restores the input
    /// when the input has no opaque regions.
    #[test]
    fn prop_split_rejoin_identity(s in "[a-z,]{0,30}") {
        let pieces = split_top_level(&s, &[',']);
        prop_assert_eq!(pieces.join(","), s);
    }

    /// The splitter always returns at least one element.
    #[test]
    fn prop_split_nonempty(s in "[ -~]{0,30}") {
        prop_assert!(!split_top_level(&s, &[',', '|']).is_empty());
    }

    /// A matched bracket offset always points at the closing counterpart.
    #[test]
    fn prop_bracket_matcher_well_formed(inner in "[a-z ]{0,20}") {
        let s = format!("({})", inner);
        let close = find_closing_bracket(&s, 0);
        prop_assert_eq!(close, s.len() - 1);
    }

    /// A quote matcher finds the terminating quote of a simple literal.
    #[test]
    fn prop_quote_matcher_well_formed(inner in "[a-z ]{0,20}") {
        let s = format!("\"{}\"", inner);
        let close = find_closing_quote(&s, 0);
        prop_assert_eq!(close, s.len() - 1);
    }

    /// Array sugar and the dotted form parse to the same element types.
    #[test]
    fn prop_array_forms_agree(atom in prop_oneof![
        Just("string"), Just("number"), Just("boolean")
    ]) {
        let limits = Limits::default();
        let sugar = parse_type(&format!("{}[]", atom), &limits).unwrap();
        let dotted = parse_type(&format!("Array.<{}>", atom), &limits).unwrap();
        match (&sugar[0].kind, &dotted[0].kind) {
            (TypeKind::Array(a), TypeKind::Array(b)) => prop_assert_eq!(a, b),
            other => prop_assert!(false, "expected arrays, got {:?}", other),
        }
    }
}
