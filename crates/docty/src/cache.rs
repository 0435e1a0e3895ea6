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

//! Per-file parsed-AST cache.
//!
//! The cache is an explicit value owned by its [`FileParser`], never a
//! process-wide singleton. Entries are populate-once-then-immutable; a
//! concurrent duplicate parse of the same file is benign because parsing is
//! a pure function of the file's bytes — last write wins with an equivalent
//! result.
//!
//! [`FileParser`]: crate::FileParser

use docty_core::Ast;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Key → parsed-blocks store with populate-once semantics.
#[derive(Debug, Default)]
pub struct AstCache {
    entries: RwLock<HashMap<PathBuf, Arc<Vec<Arc<Ast>>>>>,
}

impl AstCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the parsed blocks for a path.
    pub fn get(&self, path: &Path) -> Option<Arc<Vec<Arc<Ast>>>> {
        self.entries
            .read()
            .expect("ast cache lock poisoned")
            .get(path)
            .cloned()
    }

    /// Store the parsed blocks for a path, returning the stored handle.
    ///
    /// Concurrent inserts for the same never-yet-cached path race benignly;
    /// the last write wins and both results are equivalent.
    pub fn insert(&self, path: PathBuf, asts: Vec<Arc<Ast>>) -> Arc<Vec<Arc<Ast>>> {
        let handle = Arc::new(asts);
        self.entries
            .write()
            .expect("ast cache lock poisoned")
            .insert(path, Arc::clone(&handle));
        handle
    }

    /// Drop a path's entry. Returns true if one existed.
    pub fn remove(&self, path: &Path) -> bool {
        self.entries
            .write()
            .expect("ast cache lock poisoned")
            .remove(path)
            .is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("ast cache lock poisoned")
            .clear();
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.entries.read().expect("ast cache lock poisoned").len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asts() -> Vec<Arc<Ast>> {
        vec![Arc::new(Ast::default())]
    }

    // ==================== AstCache tests ====================

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = AstCache::new();
        let path = Path::new("/src/a.js");
        assert!(cache.get(path).is_none());

        cache.insert(path.to_path_buf(), sample_asts());
        assert!(cache.get(path).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_insert_returns_stored_handle() {
        let cache = AstCache::new();
        let handle = cache.insert(PathBuf::from("/src/a.js"), sample_asts());
        let fetched = cache.get(Path::new("/src/a.js")).unwrap();
        assert!(Arc::ptr_eq(&handle, &fetched));
    }

    #[test]
    fn test_cache_remove() {
        let cache = AstCache::new();
        cache.insert(PathBuf::from("/src/a.js"), sample_asts());
        assert!(cache.remove(Path::new("/src/a.js")));
        assert!(!cache.remove(Path::new("/src/a.js")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_clear() {
        let cache = AstCache::new();
        cache.insert(PathBuf::from("/a.js"), sample_asts());
        cache.insert(PathBuf::from("/b.js"), sample_asts());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_last_write_wins() {
        let cache = AstCache::new();
        cache.insert(PathBuf::from("/a.js"), sample_asts());
        let second = cache.insert(PathBuf::from("/a.js"), vec![]);
        let fetched = cache.get(Path::new("/a.js")).unwrap();
        assert!(Arc::ptr_eq(&second, &fetched));
        assert!(fetched.is_empty());
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = Arc::new(AstCache::new());
        let mut handles = Vec::new();
        for i in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                cache.insert(PathBuf::from(format!("/f{}.js", i)), Vec::new());
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}
