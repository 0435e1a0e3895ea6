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

//! File-level parsing: reading sources, following imports, populating the
//! ambient and imported typedef registries, and memoizing results.
//!
//! Reading bytes off disk is a collaborator concern: it sits behind the
//! [`SourceReader`] trait with a filesystem-backed default, so tests and
//! embedders can substitute their own source of truth.

use crate::cache::AstCache;
use docty_core::{
    parse_comments_with_options, Ast, ParseOptions, SchemaError, SchemaResult,
};
use std::collections::HashSet;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Supplies full source text for a path.
pub trait SourceReader {
    fn read_source(&self, path: &Path) -> io::Result<String>;
}

/// Filesystem-backed reader.
#[derive(Debug, Clone, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Memoizing file parser.
///
/// `parse_file` parses a file's annotation blocks once, resolves its
/// `@import` tags against the sibling files, fills every block's ambient and
/// imported typedef registries, and caches the published result.
pub struct FileParser<R: SourceReader = FsReader> {
    reader: R,
    options: ParseOptions,
    cache: AstCache,
}

impl FileParser<FsReader> {
    /// A parser reading from the filesystem with default options.
    pub fn new() -> Self {
        Self::with_reader(FsReader)
    }
}

impl Default for FileParser<FsReader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: SourceReader> FileParser<R> {
    /// A parser over a custom source reader.
    pub fn with_reader(reader: R) -> Self {
        Self {
            reader,
            options: ParseOptions::default(),
            cache: AstCache::new(),
        }
    }

    /// Replace the parse options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a file's annotation blocks, memoized by path.
    pub fn parse_file(&self, path: &Path) -> SchemaResult<Arc<Vec<Arc<Ast>>>> {
        let mut visiting = HashSet::new();
        self.parse_file_inner(&normalize(path), &mut visiting)
    }

    /// Drop one file from the cache. Returns true if it was cached.
    pub fn remove_file_from_cache(&self, path: &Path) -> bool {
        self.cache.remove(&normalize(path))
    }

    /// Drop every cached file.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Number of cached files.
    pub fn cached_files(&self) -> usize {
        self.cache.len()
    }

    fn parse_file_inner(
        &self,
        path: &Path,
        visiting: &mut HashSet<PathBuf>,
    ) -> SchemaResult<Arc<Vec<Arc<Ast>>>> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(cached);
        }
        if !visiting.insert(path.to_path_buf()) {
            // Import cycle: the re-entered file contributes nothing this pass
            return Ok(Arc::new(Vec::new()));
        }

        let text = self.reader.read_source(path).map_err(|e| {
            SchemaError::io(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut asts = parse_comments_with_options(&text, &self.options)?;

        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();

        // The transitive import closure feeds the ambient registry; each
        // block's own @import tags feed its imported registry.
        let mut ambient: Vec<Arc<Ast>> = Vec::new();
        let mut seen_specifiers = HashSet::new();
        for ast in &asts {
            for import in &ast.imports {
                if seen_specifiers.insert(import.specifier.clone()) {
                    let target = normalize(&parent.join(&import.specifier));
                    let blocks = self.parse_file_inner(&target, visiting)?;
                    for block in blocks.iter() {
                        if block.definition_name().is_some() {
                            ambient.push(Arc::clone(block));
                        }
                        for reachable in &block.ambient_typedefs {
                            ambient.push(Arc::clone(reachable));
                        }
                    }
                }
            }
        }

        for ast in &mut asts {
            let mut imported: Vec<Arc<Ast>> = Vec::new();
            for import in &ast.imports {
                let target = normalize(&parent.join(&import.specifier));
                let blocks = match self.cache.get(&target) {
                    Some(blocks) => blocks,
                    None => continue, // cycle participant, nothing published yet
                };
                for name in &import.names {
                    match blocks
                        .iter()
                        .find(|b| b.definition_name() == Some(name.as_str()))
                    {
                        Some(block) => imported.push(Arc::clone(block)),
                        None => {
                            return Err(SchemaError::reference(
                                format!(
                                    "'{}' is not defined by {}",
                                    name,
                                    import.specifier
                                ),
                                import.line,
                            ));
                        }
                    }
                }
            }
            ast.imported_typedefs = imported;
            ast.ambient_typedefs = ambient.clone();
        }

        visiting.remove(path);
        let published = asts.into_iter().map(Arc::new).collect();
        Ok(self.cache.insert(path.to_path_buf(), published))
    }
}

/// Normalize `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}
