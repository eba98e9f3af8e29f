use std::io::Write;

use crate::render::CaptureLine;

/// Destination for rendered capture lines.
pub trait LineSink {
    fn emit(&mut self, line: &CaptureLine) -> std::io::Result<()>;
}

/// Collects lines in memory.
impl LineSink for Vec<CaptureLine> {
    fn emit(&mut self, line: &CaptureLine) -> std::io::Result<()> {
        self.push(line.clone());
        Ok(())
    }
}

/// Writes the file form of each line to a log and optionally echoes the
/// console form to stdout. Both are flushed per line so nothing is lost if
/// the process dies.
pub struct LogSink<W> {
    log: W,
    echo: bool,
}

impl<W: Write> LogSink<W> {
    pub fn new(log: W, echo: bool) -> Self {
        Self { log, echo }
    }

    /// Consume the sink and return the log writer.
    pub fn into_inner(self) -> W {
        self.log
    }
}

impl<W: Write> LineSink for LogSink<W> {
    fn emit(&mut self, line: &CaptureLine) -> std::io::Result<()> {
        if self.echo {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", line.console)?;
            out.flush()?;
        }
        writeln!(self.log, "{}", line.file)?;
        self.log.flush()
    }
}
