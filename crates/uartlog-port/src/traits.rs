use crate::error::Result;

/// A non-blocking (or short-timeout) supplier of raw wire bytes.
///
/// A read returning `Ok(0)` means "nothing available right now". The capture
/// loop treats that as the stream-idle signal, so implementations must not
/// block indefinitely.
pub trait ByteSource {
    /// Read whatever is available into `buf`, returning the byte count.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Identifier used in log lines and diagnostics.
    fn name(&self) -> &str;

    /// True once the source can never produce more bytes (replay at EOF).
    ///
    /// Live links never become exhausted.
    fn is_exhausted(&self) -> bool {
        false
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_available(buf)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_exhausted(&self) -> bool {
        (**self).is_exhausted()
    }
}
