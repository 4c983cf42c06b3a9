use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::{AnalysisError, AnalysisSet};
use crate::models::ParsedBook;
use crate::parsing::{ParsedRows, parse_csv, parse_usfm};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse file {0}: not valid UTF-8 text")]
    Encoding(PathBuf),
    #[error("Unsupported analysis file type: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Invalid analysis file {path}: {source}")]
    Analysis {
        path: PathBuf,
        source: AnalysisError,
    },
    #[error("Invalid directory: {0}")]
    InvalidDir(String),
}

/// Read a file as UTF-8 text, dropping a leading byte-order mark.
pub fn read_text(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|_| IoError::Encoding(path.to_path_buf()))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Read and parse a USFM book.
pub fn read_book(path: &Path) -> Result<ParsedBook, IoError> {
    let book = parse_usfm(&read_text(path)?);
    if book.is_empty() {
        log::warn!("No chapters found in {}", path.display());
    }
    Ok(book)
}

/// Read and parse a CSV file into rows.
pub fn read_rows(path: &Path) -> Result<ParsedRows, IoError> {
    Ok(parse_csv(&read_text(path)?))
}

/// Load an analysis file, choosing CSV or JSON by extension.
pub fn read_analysis(path: &Path) -> Result<AnalysisSet, IoError> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    let loaded = match extension.as_deref() {
        Some("csv") => AnalysisSet::from_csv_rows(&read_rows(path)?),
        Some("json") => AnalysisSet::from_json_str(&read_text(path)?),
        _ => return Err(IoError::UnsupportedFormat(path.to_path_buf())),
    };
    loaded.map_err(|source| IoError::Analysis {
        path: path.to_path_buf(),
        source,
    })
}

/// Find USFM files (`.usfm`, `.sfm`) under a directory, sorted by path.
pub fn scan_usfm_files(root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !root.is_dir() {
        return Err(IoError::InvalidDir(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();
    scan_directory_recursive(root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && (ext.eq_ignore_ascii_case("usfm") || ext.eq_ignore_ascii_case("sfm"))
        {
            files.push(path);
        }
    }

    Ok(())
}
