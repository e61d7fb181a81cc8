//! Positioned byte cursor over a seekable PSF source.
//!
//! The decoder never relies on where a previous stage left the stream: every
//! stage that needs a particular offset seeks to it explicitly.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::Result;

pub struct PsfReader<R> {
    inner: R,
}

impl<R: Read + Seek> PsfReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Move the cursor to an absolute byte offset.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Read up to `len` bytes, stopping early only at end of stream.
    ///
    /// The buffer grows with the data actually read, so a bogus length from a
    /// header doesn't allocate up front.
    pub fn read_up_to(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.inner.by_ref().take(len as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Collect bytes up to (not including) `sentinel`.
    ///
    /// Returns `None` if the stream ends before the sentinel shows up.
    pub fn read_until(&mut self, sentinel: u8) -> Result<Option<Vec<u8>>> {
        let mut result = Vec::new();
        let mut b = [0u8; 1];
        loop {
            match self.inner.read(&mut b) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    if b[0] == sentinel {
                        return Ok(Some(result));
                    }
                    result.push(b[0]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}
