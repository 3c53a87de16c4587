//! Follow a growing log file and hand each complete line to a handler.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, trace};

use super::file_watcher::{ChangeWatcher, FileWatcher, WatchMode};
use crate::Error;

/// Consumer of complete log lines (newline already stripped, never empty).
pub trait LineHandler {
    fn handle(&mut self, line: &str);
}

/// Reads lines until the end of available data, then blocks on the watcher.
///
/// A trailing fragment without a newline stays buffered until the writer
/// finishes it. The file is opened once and never reopened, so rotation is
/// not followed.
pub struct TailLoop<R, W> {
    reader: R,
    watcher: W,
    pending: Vec<u8>,
}

impl TailLoop<BufReader<File>, FileWatcher> {
    /// Open the log and its change watch. Either failing is fatal.
    pub fn open(path: &Path, mode: WatchMode, poll_interval: Duration) -> Result<Self, Error> {
        let file = File::open(path)?;
        let watcher = FileWatcher::open(path, mode, poll_interval)?;
        info!(path = %path.display(), "Tailing log file");

        Ok(Self::new(BufReader::new(file), watcher))
    }
}

impl<R: BufRead, W: ChangeWatcher> TailLoop<R, W> {
    pub fn new(reader: R, watcher: W) -> Self {
        Self {
            reader,
            watcher,
            pending: Vec::new(),
        }
    }

    /// Run until reading or watching fails. There is no normal exit.
    pub fn run<H: LineHandler>(&mut self, handler: &mut H) -> Result<(), Error> {
        loop {
            self.drain(handler)?;
            self.watcher.wait()?;
        }
    }

    /// Feed every complete buffered line to `handler`, stopping at end of data.
    fn drain<H: LineHandler>(&mut self, handler: &mut H) -> Result<(), Error> {
        loop {
            let read = self.reader.read_until(b'\n', &mut self.pending)?;
            if read == 0 || !self.pending.ends_with(b"\n") {
                if !self.pending.is_empty() {
                    trace!(bytes = self.pending.len(), "Holding partial line");
                }
                return Ok(());
            }

            {
                let line = String::from_utf8_lossy(trim_newline(&self.pending));
                if line.is_empty() {
                    debug!("Skipping empty line");
                } else {
                    handler.handle(&line);
                }
            }
            self.pending.clear();
        }
    }
}

fn trim_newline(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::path::PathBuf;

    /// Appends the next chunk on every wait; fails once the script runs out.
    struct ScriptedWatcher {
        path: PathBuf,
        chunks: VecDeque<&'static str>,
        waits: usize,
    }

    impl ChangeWatcher for ScriptedWatcher {
        fn wait(&mut self) -> Result<(), Error> {
            self.waits += 1;
            let chunk = self.chunks.pop_front().ok_or(Error::WatchClosed)?;
            let mut file = OpenOptions::new().append(true).open(&self.path)?;
            file.write_all(chunk.as_bytes())?;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
    }

    impl LineHandler for Recorder {
        fn handle(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }
    }

    fn tail_with(
        initial: &str,
        chunks: &[&'static str],
    ) -> (Vec<String>, Result<(), Error>, usize) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latest.log");
        std::fs::write(&path, initial).unwrap();

        let watcher = ScriptedWatcher {
            path: path.clone(),
            chunks: chunks.iter().copied().collect(),
            waits: 0,
        };
        let reader = BufReader::new(File::open(&path).unwrap());
        let mut tail = TailLoop::new(reader, watcher);
        let mut recorder = Recorder::default();

        let result = tail.run(&mut recorder);
        (recorder.lines, result, tail.watcher.waits)
    }

    #[test]
    fn test_reads_existing_then_appended_lines() {
        let (lines, result, waits) =
            tail_with("first\nsecond\n", &["third\n", "fourth\nfifth\n"]);

        assert_eq!(lines, vec!["first", "second", "third", "fourth", "fifth"]);
        assert!(matches!(result, Err(Error::WatchClosed)));
        assert_eq!(waits, 3);
    }

    #[test]
    fn test_partial_line_is_held_until_complete() {
        let (lines, _, _) = tail_with("whole\npar", &["tial li", "ne\nnext\n"]);

        assert_eq!(lines, vec!["whole", "partial line", "next"]);
    }

    #[test]
    fn test_skips_empty_lines_and_trims_crlf() {
        let (lines, _, _) = tail_with("\n\r\nwindows\r\n\nunix\n", &[]);

        assert_eq!(lines, vec!["windows", "unix"]);
    }

    #[test]
    fn test_empty_file_waits_immediately() {
        let (lines, result, waits) = tail_with("", &[]);

        assert!(lines.is_empty());
        assert!(result.is_err());
        assert_eq!(waits, 1);
    }

    #[test]
    fn test_open_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.log");

        let result = TailLoop::open(&path, WatchMode::Native, Duration::from_secs(1));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
