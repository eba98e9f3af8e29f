use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{PortError, Result};
use crate::traits::ByteSource;

/// Replays a recorded wire stream as if it arrived from a device.
///
/// Reads are chunked so the decoder sees records split across reads. Once the
/// underlying reader hits EOF the source reports itself exhausted.
#[derive(Debug)]
pub struct ReplaySource<R> {
    name: String,
    inner: R,
    chunk_size: usize,
    exhausted: bool,
}

impl ReplaySource<File> {
    /// Open a replay file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| PortError::Replay {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "replay source opened");
        Ok(Self::new(path.display().to_string(), file))
    }
}

impl<R: Read> ReplaySource<R> {
    /// Default maximum bytes handed out per read.
    pub const DEFAULT_CHUNK_SIZE: usize = 4096;

    /// Wrap any reader.
    pub fn new(name: impl Into<String>, inner: R) -> Self {
        Self {
            name: name.into(),
            inner,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            exhausted: false,
        }
    }

    /// Limit how many bytes a single read may return.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}

impl<R: Read> ByteSource for ReplaySource<R> {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.exhausted {
            return Ok(0);
        }
        let want = self.chunk_size.min(buf.len());
        loop {
            match self.inner.read(&mut buf[..want]) {
                Ok(0) => {
                    debug!(source = %self.name, "replay reached end of input");
                    self.exhausted = true;
                    return Ok(0);
                }
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(PortError::Io(err)),
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}
