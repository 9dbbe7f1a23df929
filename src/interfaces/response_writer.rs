use crate::domain::response::ResponseCode;
use std::io::{self, Write};

/// Writes one response payload per line, e.g. `{"code": "00"}`.
pub struct ResponseWriter<W: Write> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, code: ResponseCode) -> io::Result<()> {
        writeln!(self.writer, "{}", code.to_payload())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
