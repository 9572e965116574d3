//! File I/O Module
//!
//! Scoped reading and writing of JFL files. Files are opened, used and
//! closed inside each call, on error paths too.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use lensprofile_core::{Error, ProfileDocument, ProtocolFormat, Result};
use tracing::{info, warn};

use crate::builder::build;
use crate::parser::JflParser;

/// Conventional extension of profile-exchange files
pub const JFL_EXTENSION: &str = "JFL";

/// Buffer size for reading profile files (64 KB)
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Statistics of one file read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReadStats {
    /// Total bytes read
    pub bytes_read: u64,
    /// Total lines read
    pub lines_read: u64,
    /// File size in bytes
    pub file_size: u64,
}

/// JFL file reader with streaming support
pub struct JflFileReader {
    path: PathBuf,
    file_size: u64,
}

impl JflFileReader {
    /// Open a reader for `path`
    ///
    /// # Errors
    /// Returns an I/O error if the path does not exist or is not a file
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("File does not exist: {}", path.display()),
            )));
        }

        if !path.is_file() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Path is not a file: {}", path.display()),
            )));
        }

        let file_size = fs::metadata(&path)?.len();
        Ok(Self { path, file_size })
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream the file line by line into `callback`
    pub fn read_lines<F>(&self, mut callback: F) -> Result<FileReadStats>
    where
        F: FnMut(&str),
    {
        let file = File::open(&self.path)?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);

        let mut stats = FileReadStats {
            file_size: self.file_size,
            ..FileReadStats::default()
        };
        for line in reader.lines() {
            let line = line?;
            stats.bytes_read += line.len() as u64 + 1;
            stats.lines_read += 1;
            callback(&line);
        }
        Ok(stats)
    }

    /// Parse the file into a document carrying `format`
    pub fn parse(&self, format: ProtocolFormat) -> Result<ProfileDocument> {
        let mut parser = JflParser::new();
        let stats = self.read_lines(|line| parser.feed_line(line))?;
        let document = parser.finish(format);

        if document.is_empty() {
            warn!(path = %self.path.display(), "No profile segments found");
        }
        info!(
            path = %self.path.display(),
            lines = stats.lines_read,
            polylines = document.len(),
            "Loaded JFL file"
        );
        Ok(document)
    }
}

/// Write `document` to `path`
pub fn save_jfl(path: impl AsRef<Path>, document: &ProfileDocument) -> Result<()> {
    let path = path.as_ref();
    let text = build(document);

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    info!(
        path = %path.display(),
        bytes = text.len(),
        polylines = document.len(),
        "Saved JFL file"
    );
    Ok(())
}

/// Read and parse the JFL file at `path`
pub fn load_jfl(path: impl AsRef<Path>) -> Result<ProfileDocument> {
    load_jfl_with_format(path, ProtocolFormat::default())
}

/// Read and parse the JFL file at `path`, attaching `format`
pub fn load_jfl_with_format(
    path: impl AsRef<Path>,
    format: ProtocolFormat,
) -> Result<ProfileDocument> {
    JflFileReader::new(path)?.parse(format)
}
