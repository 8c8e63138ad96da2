use crate::error::{CoffeeLogError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 画像AIの解析結果ファイル
#[derive(Debug, Clone)]
pub struct ExtractionFile {
    pub path: PathBuf,
    pub file_name: String,
}

const EXTRACTION_EXTENSIONS: &[&str] = &["json", "txt"];

/// 解析結果ファイルを集める
///
/// ファイルを直接指定した場合はそれ1件。フォルダなら直下（`recursive` で再帰）の
/// .json/.txt をパス順で返す。
pub fn scan_extractions(path: &Path, recursive: bool) -> Result<Vec<ExtractionFile>> {
    if !path.exists() {
        return Err(CoffeeLogError::FolderNotFound(path.display().to_string()));
    }

    if path.is_file() {
        return Ok(vec![to_extraction_file(path)]);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(path)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();

        if !entry_path.is_file() || is_hidden(entry_path) {
            continue;
        }

        if let Some(ext) = entry_path.extension() {
            if is_extraction_extension(&ext.to_string_lossy()) {
                files.push(to_extraction_file(entry_path));
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(files)
}

fn to_extraction_file(path: &Path) -> ExtractionFile {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    ExtractionFile {
        path: path.to_path_buf(),
        file_name,
    }
}

fn is_extraction_extension(ext: &str) -> bool {
    EXTRACTION_EXTENSIONS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(ext))
}

/// 隠しファイル（.catalog.json 等）は対象外
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
