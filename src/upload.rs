//! File sources for extraction uploads.
//!
//! A path upload is read as a finite sequence of fixed-size buffers so large media never
//! sits fully in memory. The sequence can only be restarted from the beginning: every upload
//! attempt opens the file again, and the handle is dropped when the attempt ends.

use crate::schema::SourceType;
use futures_core::Stream;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Size of each buffer read from disk during a streamed upload.
pub const UPLOAD_CHUNK_SIZE: usize = 1024 * 1024;
/// File name reported for in-memory uploads without one.
pub const DEFAULT_FILE_NAME: &str = "document.pdf";

/// File content to submit for extraction.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// Content already in memory.
    Bytes {
        /// Name reported in the multipart part.
        file_name: String,
        /// Raw file content.
        data: Vec<u8>,
    },
    /// File streamed from disk.
    Path(PathBuf),
}

impl UploadSource {
    /// In-memory content reported as [`DEFAULT_FILE_NAME`].
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Self::named_bytes(DEFAULT_FILE_NAME, data)
    }

    /// In-memory content with an explicit file name.
    pub fn named_bytes(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self::Bytes {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// File on disk, streamed in [`UPLOAD_CHUNK_SIZE`] buffers.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Name reported in the multipart part.
    pub fn file_name(&self) -> String {
        match self {
            Self::Bytes { file_name, .. } => file_name.clone(),
            Self::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
        }
    }

    /// Content type derived from the file extension, when recognized.
    pub fn mime(&self) -> Option<&'static str> {
        SourceType::from_file_name(&self.file_name()).and_then(SourceType::mime)
    }

    /// Check the source can be uploaded, without reading it.
    pub(crate) fn validate(&self) -> Result<(), String> {
        match self {
            Self::Bytes { data, .. } if data.is_empty() => {
                Err("file content must not be empty".to_string())
            }
            Self::Bytes { .. } => Ok(()),
            Self::Path(path) if !path.is_file() => {
                Err(format!("file not found: {}", path.display()))
            }
            Self::Path(_) => Ok(()),
        }
    }
}

/// Fixed-size buffers read from a freshly opened file.
///
/// Yields `Err` once at end of file if fewer or more bytes were read than the file held when
/// it was opened.
#[derive(Debug)]
pub struct FileChunks {
    file: File,
    path: PathBuf,
    chunk_size: usize,
    expected: u64,
    total: u64,
    count: u64,
    done: bool,
}

impl FileChunks {
    /// Open `path` for reading in [`UPLOAD_CHUNK_SIZE`] buffers.
    pub fn open(path: &Path) -> io::Result<Self> {
        Self::with_chunk_size(path, UPLOAD_CHUNK_SIZE)
    }

    /// Open `path` for reading in buffers of `chunk_size` bytes.
    pub fn with_chunk_size(path: &Path, chunk_size: usize) -> io::Result<Self> {
        if chunk_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "chunk size must be greater than zero",
            ));
        }
        let file = File::open(path)?;
        let expected = file.metadata()?.len();
        Ok(Self {
            file,
            path: path.to_path_buf(),
            chunk_size,
            expected,
            total: 0,
            count: 0,
            done: false,
        })
    }

    /// Size of the file when it was opened.
    pub fn expected_len(&self) -> u64 {
        self.expected
    }

    /// Adapt the buffers into a [`Read`] implementation.
    pub fn into_reader(self) -> ChunkReader {
        ChunkReader {
            chunks: self,
            current: Vec::new(),
            offset: 0,
        }
    }

    fn read_chunk(&mut self) -> io::Result<Vec<u8>> {
        let mut buffer = Vec::with_capacity(self.chunk_size);
        (&mut self.file)
            .take(self.chunk_size as u64)
            .read_to_end(&mut buffer)?;
        Ok(buffer)
    }
}

impl Iterator for FileChunks {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let chunk = match self.read_chunk() {
            Ok(chunk) => chunk,
            Err(error) => {
                self.done = true;
                return Some(Err(error));
            }
        };
        if chunk.is_empty() {
            self.done = true;
            tracing::debug!(
                path = %self.path.display(),
                chunks = self.count,
                bytes = self.total,
                "Upload stream finished"
            );
            return (self.total != self.expected)
                .then(|| Err(size_mismatch(self.expected, self.total)));
        }
        self.total += chunk.len() as u64;
        self.count += 1;
        tracing::trace!(chunk = self.count, bytes = self.total, "Read upload chunk");
        Some(Ok(chunk))
    }
}

/// [`Read`] adapter over [`FileChunks`], used by the blocking transport.
#[derive(Debug)]
pub struct ChunkReader {
    chunks: FileChunks,
    current: Vec<u8>,
    offset: usize,
}

impl Read for ChunkReader {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        loop {
            if self.offset < self.current.len() {
                let available = &self.current[self.offset..];
                let count = available.len().min(out.len());
                out[..count].copy_from_slice(&available[..count]);
                self.offset += count;
                return Ok(count);
            }
            match self.chunks.next() {
                Some(Ok(chunk)) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                Some(Err(error)) => return Err(error),
                None => return Ok(0),
            }
        }
    }
}

/// Async counterpart of [`FileChunks`], used by the async transport.
pub fn file_chunk_stream(
    path: PathBuf,
    chunk_size: usize,
) -> impl Stream<Item = io::Result<Vec<u8>>> + Send + 'static {
    async_stream::try_stream! {
        use tokio::io::AsyncReadExt;

        let mut file = tokio::fs::File::open(&path).await?;
        let expected = file.metadata().await?.len();
        let chunk_size = chunk_size.max(1);
        let mut total = 0u64;
        let mut count = 0u64;

        loop {
            let mut buffer = Vec::with_capacity(chunk_size);
            let read = (&mut file)
                .take(chunk_size as u64)
                .read_to_end(&mut buffer)
                .await?;
            if read == 0 {
                break;
            }
            total += read as u64;
            count += 1;
            tracing::trace!(chunk = count, bytes = total, "Read upload chunk");
            yield buffer;
        }

        tracing::debug!(path = %path.display(), chunks = count, bytes = total, "Upload stream finished");
        if total != expected {
            Err::<(), io::Error>(size_mismatch(expected, total))?;
        }
    }
}

fn size_mismatch(expected: u64, actual: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("expected {expected} bytes but read {actual}"),
    )
}
