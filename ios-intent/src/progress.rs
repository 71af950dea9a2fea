//! Console progress lines printed one character at a time.

use std::io::{self, Write};
use std::time::Duration;

use log::warn;

/// Writes operator progress messages.
///
/// A message ends either with a newline or with a carriage return, in
/// which case the next message is printed over it. Shorter messages are
/// padded so nothing of the overwritten one is left behind.
pub struct Progress {
    out: Box<dyn Write + Send>,
    delay: Duration,
    /// Width of the message the cursor is sitting on.
    pending: usize,
    broken: bool,
}

impl Progress {
    pub fn new(out: Box<dyn Write + Send>, delay: Duration) -> Self {
        Self {
            out,
            delay,
            pending: 0,
            broken: false,
        }
    }

    pub fn stdout(delay: Duration) -> Self {
        Self::new(Box::new(io::stdout()), delay)
    }

    /// Discards everything.
    pub fn silent() -> Self {
        Self::new(Box::new(io::sink()), Duration::ZERO)
    }

    /// Print a message that the next one overwrites.
    pub async fn step(&mut self, message: &str) {
        self.print(message, false).await;
    }

    /// Print a message and move to a new line.
    pub async fn done(&mut self, message: &str) {
        self.print(message, true).await;
    }

    /// Print an operation banner.
    pub async fn banner(&mut self, message: &str) {
        self.done(message).await;
    }

    async fn print(&mut self, message: &str, newline: bool) {
        if self.broken {
            return;
        }
        if let Err(e) = self.write_message(message, newline).await {
            warn!("progress output failed, suppressing further messages: {e}");
            self.broken = true;
        }
    }

    async fn write_message(&mut self, message: &str, newline: bool) -> io::Result<()> {
        let width = message.chars().count();

        if self.delay.is_zero() {
            self.out.write_all(message.as_bytes())?;
        } else {
            let mut utf8 = [0u8; 4];
            for c in message.chars() {
                self.out.write_all(c.encode_utf8(&mut utf8).as_bytes())?;
                self.out.flush()?;
                tokio::time::sleep(self.delay).await;
            }
        }

        let padding = self.pending.saturating_sub(width);
        if padding > 0 {
            write!(self.out, "{:padding$}", "")?;
        }

        if newline {
            self.out.write_all(b"\n")?;
            self.pending = 0;
        } else {
            self.out.write_all(b"\r")?;
            self.pending = width;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[tokio::test]
    async fn test_step_is_overwritten_and_padded() {
        let capture = Capture::default();
        let mut progress = Progress::new(Box::new(capture.clone()), Duration::ZERO);

        progress.step("[*] Verifying: R1").await;
        progress.done("[+] R1 ok").await;
        progress.done("next").await;

        assert_eq!(
            capture.text(),
            "[*] Verifying: R1\r[+] R1 ok        \nnext\n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_per_character() {
        let capture = Capture::default();
        let mut progress = Progress::new(Box::new(capture.clone()), Duration::from_millis(50));

        let start = tokio::time::Instant::now();
        progress.done("abcd").await;
        assert!(start.elapsed() >= Duration::from_millis(200));
        assert_eq!(capture.text(), "abcd\n");
    }
}
