// ============================================================
// Layer 4 — Forest Loader
// ============================================================
// Loads DOM trees from a directory of .json files.
//
// Each file holds either one serialised Tree or an array of
// them, in the arena form Tree derives with serde:
//
//   {
//     "root":  0,
//     "nodes": [
//       { "tag": "html", "attributes": [["lang", "en"]], "children": [1] },
//       { "tag": "body", "text": "hi", "parent": 0 }
//     ]
//   }
//
// Paths are not stored on disk. Every tree is validated and its
// path rebuilt before it joins the forest.
//
// Files are read in file-name order so the forest (and therefore
// every tree_id) is stable between runs.
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::domain::traits::ForestSource;
use crate::domain::tree::Tree;

/// Loads all .json tree files from a given directory.
pub struct ForestLoader {
    dir: String,
}

impl ForestLoader {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: dir.into() }
    }
}

/// A file holds one tree or a list of trees
#[derive(Deserialize)]
#[serde(untagged)]
enum TreeFile {
    Many(Vec<Tree>),
    One(Tree),
}

impl ForestSource for ForestLoader {
    fn load_all(&self) -> Result<Vec<Tree>> {
        let dir = Path::new(&self.dir);

        if !dir.exists() {
            tracing::warn!("Forest directory '{}' does not exist, returning empty forest", self.dir);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", self.dir))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();

        let mut forest = Vec::new();
        for path in &files {
            match load_tree_file(path) {
                Ok(trees) => {
                    tracing::debug!("Loaded {} tree(s) from {}", trees.len(), path.display());
                    forest.extend(trees);
                }
                // One bad file does not abort the whole forest
                Err(e) => {
                    tracing::warn!("Skipping '{}': {:#}", path.display(), e);
                }
            }
        }

        tracing::info!(
            "Loaded {} trees ({} nodes) from {} files",
            forest.len(),
            forest.iter().map(Tree::len).sum::<usize>(),
            files.len(),
        );
        Ok(forest)
    }
}

/// Parse one file, validate every tree in it, rebuild their paths.
fn load_tree_file(path: &Path) -> Result<Vec<Tree>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;

    let parsed: TreeFile = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid tree JSON in '{}'", path.display()))?;

    let mut trees = match parsed {
        TreeFile::Many(trees) => trees,
        TreeFile::One(tree)   => vec![tree],
    };

    for (i, tree) in trees.iter_mut().enumerate() {
        if !tree.is_well_formed() {
            bail!("tree #{} has inconsistent parent/child links", i);
        }
        tree.build_path();
    }

    Ok(trees)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tree::fixtures::{flat, page};
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    fn loader(dir: &TempDir) -> ForestLoader {
        ForestLoader::new(dir.path().to_str().unwrap())
    }

    #[test]
    fn test_missing_directory_is_empty_forest() {
        let forest = ForestLoader::new("/definitely/not/here").load_all().unwrap();
        assert!(forest.is_empty());
    }

    #[test]
    fn test_single_and_array_files_in_name_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "b.json", &serde_json::to_string(&vec![flat(3), flat(2)]).unwrap());
        write(&dir, "a.json", &serde_json::to_string(&page()).unwrap());
        write(&dir, "notes.txt", "not a tree");

        let forest = loader(&dir).load_all().unwrap();

        assert_eq!(forest.iter().map(Tree::len).collect::<Vec<_>>(), vec![6, 3, 2]);
        // Paths were rebuilt after deserialising
        assert_eq!(forest[0].path(), page().path());
        assert_eq!(forest[0].node_at(5).unwrap().tag, "html");
    }

    #[test]
    fn test_hand_written_tree() {
        let dir = TempDir::new().unwrap();
        write(&dir, "doc.json", r#"{
            "root": 0,
            "nodes": [
                { "tag": "html", "attributes": [["lang", "en"]], "children": [1] },
                { "tag": "body", "text": "hi", "parent": 0 }
            ]
        }"#);

        let forest = loader(&dir).load_all().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].len(), 2);
        assert_eq!(forest[0].node_at(0).unwrap().text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_bad_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.json", "{ not json");
        // Child does not point back at its parent
        write(&dir, "links.json", r#"{
            "root": 0,
            "nodes": [
                { "tag": "html", "children": [1] },
                { "tag": "body" }
            ]
        }"#);
        write(&dir, "ok.json", &serde_json::to_string(&flat(4)).unwrap());

        let forest = loader(&dir).load_all().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].len(), 4);
    }
}
