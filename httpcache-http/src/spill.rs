//! Memory buffer that spills to a temporary file.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Write};

use bytes::{Bytes, BytesMut};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::SpillError;

/// Active backing storage. Promotion is one-directional.
#[derive(Debug)]
enum Backing {
    InMemory(BytesMut),
    OnDisk(NamedTempFile),
}

/// Append-only buffer that keeps up to `threshold` bytes in memory.
///
/// The write that would take the buffer past the threshold moves everything
/// written so far into a fresh temporary file, and all later writes go to
/// that file. [`finalize`](Self::finalize) ends the write phase and hands out
/// a reader positioned at the first byte.
///
/// The temporary file is deleted when the buffer is dropped or
/// [`close`](Self::close)d. Readers obtained before that keep working on
/// platforms that allow reading unlinked files.
#[derive(Debug)]
pub struct SpillBuffer {
    threshold: usize,
    len: usize,
    backing: Backing,
    finalized: bool,
}

impl SpillBuffer {
    /// Creates an empty in-memory buffer.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            len: 0,
            backing: Backing::InMemory(BytesMut::new()),
            finalized: false,
        }
    }

    /// Appends `chunk`, spilling to disk first if it would not fit in memory.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), SpillError> {
        if self.finalized {
            return Err(SpillError::Finalized);
        }
        if matches!(self.backing, Backing::InMemory(_)) && self.len + chunk.len() > self.threshold
        {
            self.spill()?;
        }
        match &mut self.backing {
            Backing::InMemory(memory) => memory.extend_from_slice(chunk),
            Backing::OnDisk(file) => file.write_all(chunk)?,
        }
        self.len += chunk.len();
        Ok(())
    }

    fn spill(&mut self) -> Result<(), SpillError> {
        let Backing::InMemory(memory) = &self.backing else {
            return Ok(());
        };
        let mut file = tempfile::Builder::new()
            .prefix("httpcache-spill-")
            .tempfile()?;
        file.write_all(memory)?;
        debug!(
            bytes = memory.len(),
            threshold = self.threshold,
            path = %file.path().display(),
            "spill buffer moved to disk"
        );
        self.backing = Backing::OnDisk(file);
        Ok(())
    }

    /// Ends the write phase and returns a reader over everything written.
    ///
    /// Every call returns a fresh reader starting at offset 0.
    pub fn finalize(&mut self) -> Result<SpillReader, SpillError> {
        self.finalized = true;
        match &mut self.backing {
            Backing::InMemory(memory) => Ok(SpillReader::Memory(Cursor::new(
                Bytes::copy_from_slice(memory),
            ))),
            Backing::OnDisk(file) => {
                file.flush()?;
                Ok(SpillReader::Disk(BufReader::new(file.reopen()?)))
            }
        }
    }

    /// Disposes of the buffer, reporting a failure to delete the temporary file.
    pub fn close(self) -> Result<(), SpillError> {
        match self.backing {
            Backing::InMemory(_) => Ok(()),
            Backing::OnDisk(file) => Ok(file.close()?),
        }
    }

    /// Number of bytes written.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` once the content lives in a temporary file.
    pub fn is_spilled(&self) -> bool {
        matches!(self.backing, Backing::OnDisk(_))
    }

    /// Returns `true` once [`finalize`](Self::finalize) was called.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Memory budget in bytes.
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

/// Sequential reader over a finalized [`SpillBuffer`].
#[derive(Debug)]
pub enum SpillReader {
    /// Content held in memory.
    Memory(Cursor<Bytes>),
    /// Content held in the temporary file.
    Disk(BufReader<File>),
}

impl SpillReader {
    /// Reads the remaining content into a single buffer.
    ///
    /// Memory-backed content is returned without copying.
    pub fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            SpillReader::Memory(cursor) => {
                let position = usize::try_from(cursor.position()).unwrap_or(usize::MAX);
                let bytes = cursor.into_inner();
                Ok(bytes.slice(position.min(bytes.len())..))
            }
            SpillReader::Disk(mut reader) => {
                let mut content = Vec::new();
                reader.read_to_end(&mut content)?;
                Ok(Bytes::from(content))
            }
        }
    }
}

impl Read for SpillReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SpillReader::Memory(cursor) => cursor.read(buf),
            SpillReader::Disk(reader) => reader.read(buf),
        }
    }
}
