use std::io::{BufRead, Write};

use tracing::warn;

use crate::collab::{Session, Signal};

/// [`Session`] over any line reader and writer.
///
/// Messages are written one per line. Signals are written as their marker
/// line so API clients can frame selection lists.
#[derive(Debug)]
pub struct IoSession<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> IoSession<R, W> {
    pub const fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    pub const fn writer(&self) -> &W {
        &self.writer
    }

    fn write_line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.writer, "{text}") {
            warn!("failed to write console output: {err}");
        }
    }
}

impl<R: BufRead, W: Write> Session for IoSession<R, W> {
    fn send(&mut self, msg: &str) {
        self.write_line(msg);
    }

    fn warning(&mut self, msg: &str) {
        self.write_line(msg);
    }

    fn error(&mut self, msg: &str) {
        self.write_line(msg);
    }

    fn signal(&mut self, signal: Signal) {
        self.write_line(signal.marker());
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        if let Err(err) = write!(self.writer, "{prompt}").and_then(|()| self.writer.flush()) {
            warn!("failed to write prompt: {err}");
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_owned()),
            Err(err) => {
                warn!("failed to read console input: {err}");
                None
            },
        }
    }
}
