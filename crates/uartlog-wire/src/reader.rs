use bytes::BytesMut;
use uartlog_port::ByteSource;

use crate::codec::{decode_record, RawRecord, WireFormat};
use crate::error::{Result, WireError};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;
const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Outcome of one poll of a [`RecordReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Polled {
    /// The source produced bytes. May be empty when only a partial record arrived.
    Records(Vec<RawRecord>),
    /// The source had nothing to offer right now (or is at EOF).
    Idle,
}

/// Decodes records from any [`ByteSource`].
///
/// Keeps the residual partial record between polls. Each poll performs
/// exactly one read so several readers can share a round-robin loop.
pub struct RecordReader<S> {
    source: S,
    buf: BytesMut,
    format: WireFormat,
    records: u64,
    failed: Option<WireError>,
}

impl<S: ByteSource> RecordReader<S> {
    /// Create a reader for `format`.
    pub fn new(source: S, format: WireFormat) -> Self {
        Self {
            source,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            format,
            records: 0,
            failed: None,
        }
    }

    /// Read once and decode every complete record now buffered.
    ///
    /// Records preceding a protocol violation in the same read are still
    /// returned; the violation surfaces on the following poll. The reader must
    /// not be polled again after an error.
    pub fn poll(&mut self) -> Result<Polled> {
        if let Some(err) = self.failed.take() {
            return Err(err);
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let read = self.source.read_available(&mut chunk)?;
        if read == 0 {
            return Ok(Polled::Idle);
        }
        self.buf.extend_from_slice(&chunk[..read]);

        let mut records = Vec::with_capacity(read / self.format.record_size() + 1);
        loop {
            match decode_record(&mut self.buf, self.format) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => break,
                Err(err) if records.is_empty() => return Err(err),
                Err(err) => {
                    self.failed = Some(err);
                    break;
                }
            }
        }
        self.records += records.len() as u64;
        Ok(Polled::Records(records))
    }

    /// Bytes of an incomplete record waiting for more input.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Records decoded so far.
    pub fn records_decoded(&self) -> u64 {
        self.records
    }

    /// Wire layout this reader decodes.
    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Name of the underlying source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// True once the source will never produce more bytes and no error is
    /// waiting to be reported.
    pub fn is_exhausted(&self) -> bool {
        self.failed.is_none() && self.source.is_exhausted()
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the reader and return the inner source.
    pub fn into_inner(self) -> S {
        self.source
    }
}
