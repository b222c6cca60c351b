//! ABI file loader - reads ABI JSON files, build artifacts and artifact directories

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::abi::{AbiDocument, AbiError};
use crate::error::{Error, SourceError};

/// Files larger than this are skipped while walking a directory
const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// ABI file scanner
pub struct AbiScanner;

impl AbiScanner {
    /// Load an ABI from a file, or merge every ABI found under a directory
    pub fn load(path: impl AsRef<Path>) -> Result<AbiDocument, Error> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            Self::scan(path)
        } else {
            Self::load_file(path)
        }
    }

    /// Parse a single ABI file; any problem is an error
    pub fn load_file(path: &Path) -> Result<AbiDocument, Error> {
        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = AbiDocument::from_json_str(&content)?;
        debug!(path = %path.display(), functions = document.len(), "loaded ABI file");
        Ok(document)
    }

    /// Walk a directory in path order, merging every `*.json` file that carries an ABI
    ///
    /// Files that are not ABIs are skipped; files that look like ABIs but fail to parse
    /// are logged and skipped.
    pub fn scan(root: &Path) -> Result<AbiDocument, Error> {
        let mut document = AbiDocument::default();
        let mut scanned_files = 0usize;

        for entry in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !Self::is_ignored_dir(e.path()))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable path");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match entry.metadata() {
                Ok(meta) if meta.len() > MAX_FILE_BYTES => {
                    debug!(path = %path.display(), "skipping large file");
                    continue;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable file");
                    continue;
                }
            }

            scanned_files += 1;
            match Self::extract_abi(path) {
                Ok(Some(found)) => document.extend(found),
                Ok(None) => {}
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping invalid ABI file")
                }
            }
        }

        debug!(
            root = %root.display(),
            scanned_files,
            functions = document.len(),
            "scanned ABI directory"
        );

        if document.is_empty() {
            return Err(AbiError::MalformedAbi(format!(
                "no function entries found under {}",
                root.display()
            ))
            .into());
        }
        Ok(document)
    }

    /// Returns `None` for JSON files that are neither an ABI array nor an artifact
    fn extract_abi(path: &Path) -> anyhow::Result<Option<AbiDocument>> {
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;

        if !value.is_array() && value.get("abi").is_none() {
            return Ok(None);
        }
        Ok(Some(AbiDocument::from_value(value)?))
    }

    /// Check if a path should be ignored
    fn is_ignored_dir(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| {
                matches!(
                    name,
                    ".git" | "target" | "node_modules" | ".next" | "dist" | "build"
                )
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("axe_scan_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const TRANSFER: &str = r#"[{"type":"function","name":"transfer","inputs":[
        {"name":"to","type":"address"},{"name":"value","type":"uint256"}]}]"#;

    #[test]
    fn test_is_ignored_dir() {
        assert!(AbiScanner::is_ignored_dir(Path::new(".git")));
        assert!(AbiScanner::is_ignored_dir(Path::new("node_modules")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("src")));
        assert!(!AbiScanner::is_ignored_dir(Path::new("out")));
    }

    #[test]
    fn test_load_single_file() {
        let dir = temp_dir("file");
        let path = dir.join("Token.json");
        fs::write(&path, TRANSFER).unwrap();

        let doc = AbiScanner::load(&path).unwrap();
        assert_eq!(doc.functions()[0].signature(), "transfer(address,uint256)");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = temp_dir("invalid");
        let path = dir.join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            AbiScanner::load(&path),
            Err(Error::Abi(AbiError::MalformedAbi(_)))
        ));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_path_is_io_error() {
        let err = AbiScanner::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Source(SourceError::Io { .. })));
    }

    #[test]
    fn test_scan_directory_merges_in_order() {
        let dir = temp_dir("dir");
        fs::create_dir_all(dir.join("out/Token.sol")).unwrap();
        fs::create_dir_all(dir.join("node_modules/dep")).unwrap();
        fs::write(
            dir.join("out/Token.sol/Token.json"),
            format!(r#"{{"abi":{TRANSFER},"bytecode":"0x"}}"#),
        )
        .unwrap();
        fs::write(
            dir.join("a.json"),
            r#"[{"type":"function","name":"deposit","inputs":[]}]"#,
        )
        .unwrap();
        fs::write(dir.join("package.json"), r#"{"name":"pkg"}"#).unwrap();
        fs::write(dir.join("z.json"), r#"[{"type":"function","inputs":[]}]"#).unwrap();
        fs::write(
            dir.join("node_modules/dep/Ignored.json"),
            r#"[{"type":"function","name":"ignored","inputs":[]}]"#,
        )
        .unwrap();

        let doc = AbiScanner::load(&dir).unwrap();
        let names: Vec<&str> = doc.functions().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["deposit", "transfer"]);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_scan_empty_directory_fails() {
        let dir = temp_dir("empty");
        assert!(matches!(
            AbiScanner::load(&dir),
            Err(Error::Abi(AbiError::MalformedAbi(_)))
        ));
        fs::remove_dir_all(dir).ok();
    }
}
