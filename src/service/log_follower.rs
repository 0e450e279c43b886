//! Log follower
//!
//! Tails an EverQuest log file and feeds every complete line to the
//! [`Engine`], in file order. A file watcher wakes the follower when the log
//! changes; the poll interval only bounds how long it sleeps without news.
use super::*;
use crate::{
    engine::{Engine, SharedEngine},
    sink::Context,
};
use anyhow::Context as _;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::MutexGuard;
use std::{
    fs::File,
    io::{BufRead, BufReader, Seek, SeekFrom},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    time::Duration,
};
use tracing::{debug, info, trace, warn};

pub struct LogFollower {
    path: PathBuf,
    context: Context,
    reader: BufReader<File>,
    /// Byte offset of the end of the last complete line handed out
    position: u64,
    /// A trailing line still waiting for its newline
    partial: Vec<u8>,
    poll_interval: Duration,
    engine: SharedEngine,

    _watcher: RecommendedWatcher,
    changes: Receiver<notify::Result<Event>>,
}

impl LogFollower {
    /// Open `path`; unless `from_start`, only lines appended from now on are read
    pub fn open(
        path: &Path,
        engine: SharedEngine,
        from_start: bool,
        poll_interval: Duration,
    ) -> Result<Self> {
        let mut file =
            File::open(path).with_context(|| format!("Failed to open log {}", path.display()))?;
        let position = if from_start {
            0
        } else {
            file.seek(SeekFrom::End(0))?
        };

        // Watch the directory, so a log that gets replaced is still seen
        let (tx, changes) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;
        info!(path = %path.display(), position, "following log");

        Ok(Self {
            path: path.to_path_buf(),
            context: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            reader: BufReader::new(file),
            position,
            partial: Vec::new(),
            poll_interval,
            engine,
            _watcher: watcher,
            changes,
        })
    }

    pub fn engine(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock()
    }

    /// Handle every complete line currently available
    ///
    /// Returns the number of lines handled.
    pub fn poll(&mut self) -> Result<usize> {
        self.check_truncated()?;

        let mut handled = 0;
        loop {
            let read = self.reader.read_until(b'\n', &mut self.partial)?;
            if read == 0 || self.partial.last() != Some(&b'\n') {
                // EOF, maybe in the middle of a line still being written
                return Ok(handled);
            }

            self.position += u64::try_from(self.partial.len())?;
            let line = String::from_utf8_lossy(&self.partial).into_owned();
            self.partial.clear();

            self.engine.lock().handle_line(&line, &self.context);
            handled += 1;
        }
    }

    /// Start over if the file got shorter than what we have already read
    fn check_truncated(&mut self) -> Result<()> {
        let len = self
            .reader
            .get_ref()
            .metadata()
            .with_context(|| format!("Failed to stat log {}", self.path.display()))?
            .len();
        if len < self.position {
            debug!(path = %self.path.display(), len, position = self.position, "log truncated");
            self.reader.seek(SeekFrom::Start(0))?;
            self.position = 0;
            self.partial.clear();
        }
        Ok(())
    }

    /// Block until the watcher reports a change, or `poll_interval` passes
    fn wait_for_change(&mut self) -> Result<()> {
        match self.changes.recv_timeout(self.poll_interval) {
            Ok(Ok(event)) => trace!(kind = ?event.kind, "log directory changed"),
            Ok(Err(e)) => warn!(error = %e, "log watcher error"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => bail!("log watcher went away"),
        }
        // one poll covers everything queued up meanwhile
        while self.changes.try_recv().is_ok() {}
        Ok(())
    }
}

impl LoopService for LogFollower {
    fn run_iteration(&mut self) -> Result<()> {
        if self.poll()? == 0 {
            self.wait_for_change()?;
        }
        Ok(())
    }
}
