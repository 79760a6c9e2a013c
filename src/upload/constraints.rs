//! Declarative file constraints and the pending file they admit

use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

const MEGABYTE: u64 = 1024 * 1024;

/// Limits a selected file must satisfy before it can be uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConstraints {
    /// Accepted MIME types; `type/*` wildcards allowed, empty accepts all
    pub accept: Vec<String>,
    pub max_size_bytes: u64,
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}

impl Default for FileConstraints {
    /// Avatar limits: any image up to 50 MB, 50 to 1600 px per side
    fn default() -> Self {
        Self {
            accept: vec!["image/*".to_string()],
            max_size_bytes: 50 * MEGABYTE,
            min_width: 50,
            max_width: 1600,
            min_height: 50,
            max_height: 1600,
        }
    }
}

/// One violated rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintViolation {
    #[error("file type {mime} is not accepted")]
    TypeNotAccepted { mime: String },

    #[error("file size {size} bytes exceeds {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("width {width}px is below minimum {min}px")]
    WidthTooSmall { width: u32, min: u32 },

    #[error("width {width}px exceeds maximum {max}px")]
    WidthTooLarge { width: u32, max: u32 },

    #[error("height {height}px is below minimum {min}px")]
    HeightTooSmall { height: u32, min: u32 },

    #[error("height {height}px exceeds maximum {max}px")]
    HeightTooLarge { height: u32, max: u32 },

    #[error("image could not be decoded: {0}")]
    Unreadable(String),
}

/// All violations of one selection, reported as a single message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(pub Vec<ConstraintViolation>);

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error to upload file")?;
        for (i, violation) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{violation}")?;
        }
        Ok(())
    }
}

/// A file as delivered by the file chooser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its base name
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { name, bytes })
    }

    pub fn mime(&self) -> mime_guess::Mime {
        mime_guess::from_path(&self.name).first_or_octet_stream()
    }
}

/// A selected file that passed every constraint and awaits upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub id: Uuid,
    pub name: String,
    pub bytes: Vec<u8>,
    pub size_bytes: u64,
    pub width: u32,
    pub height: u32,
}

impl FileConstraints {
    fn accepts(&self, mime: &mime_guess::Mime) -> bool {
        if self.accept.is_empty() {
            return true;
        }
        self.accept.iter().any(|pattern| {
            match pattern.split_once('/') {
                Some((top, "*")) => mime.type_().as_str().eq_ignore_ascii_case(top),
                _ => mime.essence_str().eq_ignore_ascii_case(pattern),
            }
        })
    }

    /// Check every rule; any violation rejects the whole file
    pub fn inspect(&self, file: SelectedFile) -> Result<PendingFile, Rejection> {
        let mut violations = Vec::new();

        let mime = file.mime();
        if !self.accepts(&mime) {
            violations.push(ConstraintViolation::TypeNotAccepted {
                mime: mime.essence_str().to_string(),
            });
        }

        let size_bytes = file.bytes.len() as u64;
        if size_bytes > self.max_size_bytes {
            violations.push(ConstraintViolation::TooLarge {
                size: size_bytes,
                max: self.max_size_bytes,
            });
        }

        let (width, height) = match decode_dimensions(&file.bytes) {
            Ok(dims) => dims,
            Err(reason) => {
                violations.push(ConstraintViolation::Unreadable(reason));
                return Err(Rejection(violations));
            }
        };

        if width < self.min_width {
            violations.push(ConstraintViolation::WidthTooSmall {
                width,
                min: self.min_width,
            });
        }
        if width > self.max_width {
            violations.push(ConstraintViolation::WidthTooLarge {
                width,
                max: self.max_width,
            });
        }
        if height < self.min_height {
            violations.push(ConstraintViolation::HeightTooSmall {
                height,
                min: self.min_height,
            });
        }
        if height > self.max_height {
            violations.push(ConstraintViolation::HeightTooLarge {
                height,
                max: self.max_height,
            });
        }

        if !violations.is_empty() {
            return Err(Rejection(violations));
        }

        Ok(PendingFile {
            id: Uuid::new_v4(),
            name: file.name,
            bytes: file.bytes,
            size_bytes,
            width,
            height,
        })
    }
}

// Reads only the header; the content sniffing ignores the file extension.
fn decode_dimensions(bytes: &[u8]) -> Result<(u32, u32), String> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .into_dimensions()
        .map_err(|e| e.to_string())
}
