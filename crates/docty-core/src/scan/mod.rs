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

//! Scanner primitives: pure functions over strings, no state.
//!
//! Everything the extractor and the type-expression parser need to walk raw
//! annotation text lives here: bracket/quote matching, top-level splitting,
//! `//` comment isolation and the offset-to-line index.

mod brackets;
mod comments;
mod lines;
mod split;

pub use brackets::{find_closing_bracket, find_closing_quote};
pub use comments::{isolate_leading_comment, isolate_trailing_comment};
pub use lines::LineIndex;
pub use split::{split_first_top_level, split_top_level};
