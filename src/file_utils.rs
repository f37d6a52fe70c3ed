use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: Sibling output path tagged with a suffix
    // @params: input_file, suffix, extension
    // e.g. ("movie.en.srt", "clean", "srt") -> "movie.en.clean.srt"
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, suffix: &str, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(suffix);
        output_filename.push('.');
        output_filename.push_str(extension);

        match input_file.parent() {
            Some(parent) => parent.join(output_filename),
            None => PathBuf::from(output_filename),
        }
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a value as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .context("Failed to serialize value to JSON")?;
        Self::write_to_file(path, &json)
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.exists() {
            return Err(anyhow!("Source file does not exist: {:?}", from));
        }

        // Copying a file onto itself would truncate it
        if from == to {
            return Ok(());
        }

        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to)
            .with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;

        Ok(())
    }
}
