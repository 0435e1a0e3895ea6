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

//! JSON to runtime-value conversion.

use crate::JsonError;
use docty_core::{ObjectValue, Value};

/// Parse a JSON document into a runtime [`Value`].
pub fn from_json(json: &str) -> Result<Value, JsonError> {
    let parsed: serde_json::Value =
        serde_json::from_str(json).map_err(|e| JsonError::Parse(e.to_string()))?;
    Ok(from_json_value(&parsed))
}

/// Convert a parsed `serde_json::Value` into a runtime [`Value`].
///
/// JSON null maps to [`Value::Null`]; there is no JSON spelling for
/// `undefined`, functions or symbols. Object key order is preserved when
/// serde_json is built with ordered maps, otherwise it follows the map's
/// iteration order.
pub fn from_json_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Array(items.iter().map(from_json_value).collect())
        }
        serde_json::Value::Object(entries) => Value::Object(ObjectValue::new(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), from_json_value(v)))
                .collect(),
        )),
    }
}
