use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::codec::Format;
use crate::error::{AppError, Result};

/// Lists candidate input files of one format in a directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// Directory scanned for input files
    input_dir: PathBuf,
}

impl FileDiscovery {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Files directly inside the input directory with the format's extension,
    /// sorted by name
    pub async fn discover_files(&self, format: Format) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut read_dir = fs::read_dir(&self.input_dir).await?;

        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => continue,
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            }

            if Self::should_process(&path, format) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Like `discover_files`, but an empty result is an error
    pub async fn require_files(&self, format: Format) -> Result<Vec<PathBuf>> {
        let files = self.discover_files(format).await?;
        if files.is_empty() {
            return Err(AppError::NoInputFiles {
                dir: self.input_dir.clone(),
                extension: format.extension().to_string(),
            });
        }
        Ok(files)
    }

    /// Check if a file carries the format's extension
    pub fn should_process(path: &Path, format: Format) -> bool {
        Format::from_path(path) == Some(format)
    }

    /// Locate an input file by name
    ///
    /// The name must end in the format's extension. It is looked up inside the
    /// input directory first. A name with more than one path component is also
    /// tried as a path of its own; a bare name never is.
    pub async fn resolve_input(&self, name: &str, format: Format) -> Result<PathBuf> {
        check_extension(name, format)?;

        let candidate = self.input_dir.join(name);
        if is_file(&candidate).await {
            return Ok(candidate);
        }

        let direct = PathBuf::from(name);
        if direct.components().count() > 1 && is_file(&direct).await {
            return Ok(direct);
        }

        Err(AppError::InputNotFound {
            name: name.to_string(),
            dir: self.input_dir.clone(),
        })
    }
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Fail unless `name` ends in `.<extension>` for the given format, ignoring case
pub fn check_extension(name: &str, format: Format) -> Result<()> {
    let suffix = format!(".{}", format.extension());
    if Format::from_path(Path::new(name)) == Some(format) {
        return Ok(());
    }

    Err(AppError::InvalidFileExtension {
        expected: suffix,
        actual: Path::new(name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_else(|| "no extension".to_string()),
    })
}

/// First free output path for `name` in `dir`
///
/// `contacts.json` stays as-is when free, otherwise becomes
/// `contacts (1).json`, `contacts (2).json`, and so on. A trailing
/// `.extension` on `name` is stripped before numbering.
pub async fn unique_output_path(dir: &Path, name: &str, extension: &str) -> Result<PathBuf> {
    let suffix = format!(".{}", extension);
    let stem = name.strip_suffix(&suffix).unwrap_or(name);

    let candidate = dir.join(format!("{}{}", stem, suffix));
    if !fs::try_exists(&candidate).await? {
        return Ok(candidate);
    }

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{} ({}){}", stem, counter, suffix));
        if !fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        counter += 1;
    }
}
