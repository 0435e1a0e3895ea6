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

//! Runtime-value to JSON conversion.

use crate::JsonError;
use docty_core::Value;

/// Serialize a runtime [`Value`] to a JSON string.
pub fn to_json(value: &Value) -> Result<String, JsonError> {
    let json = to_json_value(value)?;
    serde_json::to_string(&json).map_err(|e| JsonError::Serialize(e.to_string()))
}

/// Convert a runtime [`Value`] into a `serde_json::Value`.
///
/// `undefined`, functions and symbols have no JSON spelling and are
/// conversion errors; non-finite numbers map to null, matching JSON's own
/// behavior.
pub fn to_json_value(value: &Value) -> Result<serde_json::Value, JsonError> {
    match value {
        Value::Undefined => Err(JsonError::Unrepresentable("undefined")),
        Value::Function(_) => Err(JsonError::Unrepresentable("function")),
        Value::Symbol(_) => Err(JsonError::Unrepresentable("symbol")),
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Number(n) => Ok(serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)),
        Value::BigInt(n) => Ok(serde_json::Value::Number((*n).into())),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(to_json_value(item)?);
            }
            Ok(serde_json::Value::Array(out))
        }
        Value::Object(object) => {
            let mut map = serde_json::Map::with_capacity(object.len());
            for (key, entry) in &object.entries {
                map.insert(key.clone(), to_json_value(entry)?);
            }
            Ok(serde_json::Value::Object(map))
        }
    }
}
