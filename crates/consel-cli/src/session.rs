//! Terminal session: an [`IoSession`] with colored warnings and errors.

use std::io::{BufRead, Write};

use colored::Colorize;
use consel_core::collab::{Session, Signal};
use consel_core::session::IoSession;

/// Console session for the `consel` binary.
///
/// Plain messages, prompts and signal markers pass through unchanged so API
/// clients can parse them; warnings are yellow and errors red when colors are
/// enabled.
#[derive(Debug)]
pub struct ColorSession<R, W> {
    inner: IoSession<R, W>,
}

impl<R: BufRead, W: Write> ColorSession<R, W> {
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            inner: IoSession::new(reader, writer),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (R, W) {
        self.inner.into_inner()
    }
}

impl<R: BufRead, W: Write> Session for ColorSession<R, W> {
    fn send(&mut self, msg: &str) {
        self.inner.send(msg);
    }

    fn warning(&mut self, msg: &str) {
        self.inner.warning(&msg.yellow().to_string());
    }

    fn error(&mut self, msg: &str) {
        self.inner.error(&msg.red().to_string());
    }

    fn signal(&mut self, signal: Signal) {
        self.inner.signal(signal);
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        self.inner.read_line(prompt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_input_pass_through() {
        colored::control::set_override(false);
        let mut session = ColorSession::new(&b"2\n"[..], Vec::new());

        session.send("hello");
        session.error("Storage resource \"X\": not found");
        session.signal(Signal::StartSelect);
        let answer = session.read_line("Select: ");

        let (_, out) = session.into_inner();
        assert_eq!(answer.as_deref(), Some("2"));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "hello\nStorage resource \"X\": not found\n@@start_select\nSelect: "
        );
    }
}
