//! Cloning through an external git executable with a time bound.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::CloneConfig;

/// Environment variables that would redirect git away from the destination.
const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Extra time allowed to collect output when the child exits right at the deadline.
const PIPE_GRACE: Duration = Duration::from_millis(50);

type SharedBuf = Arc<Mutex<Vec<u8>>>;

#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error("clone program not found: {}", program.display())]
    ToolMissing { program: PathBuf },
    #[error("clone exited with status {status:?}: {stderr}")]
    Failed { status: Option<i32>, stderr: String },
    #[error("clone exceeded {timeout:?} timeout")]
    TimedOut { timeout: Duration },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Captured output of a successful clone.
#[derive(Debug, Clone, Default)]
pub struct CloneOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Something that can clone a repository URL into a directory.
pub trait RepoCloner: fmt::Debug + Send + Sync {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<CloneOutput, CloneError>;

    /// Upper bound applied to a single clone.
    fn timeout(&self) -> Duration;
}

/// Runs `<program> clone <url> <destination>` and waits at most `timeout`.
#[derive(Debug, Clone)]
pub struct GitCloner {
    program: PathBuf,
    timeout: Duration,
    config: Vec<(String, String)>,
}

impl GitCloner {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
            config: Vec::new(),
        }
    }

    pub fn from_config(config: &CloneConfig) -> Self {
        Self::new(config.program.clone(), config.timeout())
    }

    /// Pass `-c key=value` to git ahead of the `clone` subcommand.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, url: &str, destination: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        for key in GIT_ENV_OVERRIDES {
            cmd.env_remove(key);
        }
        // Private repositories fail fast instead of blocking on a credential prompt.
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        for (key, value) in &self.config {
            cmd.arg("-c").arg(format!("{}={}", key, value));
        }
        cmd.arg("clone")
            .arg(url)
            .arg(destination)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a timeout also stops remote helpers and index-pack.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        cmd
    }
}

impl RepoCloner for GitCloner {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<CloneOutput, CloneError> {
        tracing::debug!(
            program = %self.program.display(),
            url,
            destination = %destination.display(),
            "spawning clone"
        );

        let mut child = match self.command(url, destination).spawn() {
            Ok(child) => child,
            Err(err)
                if matches!(
                    err.kind(),
                    std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied
                ) =>
            {
                return Err(CloneError::ToolMissing {
                    program: self.program.clone(),
                });
            }
            Err(source) => {
                return Err(CloneError::Io {
                    context: format!("Failed to spawn {}", self.program.display()),
                    source,
                });
            }
        };

        // Drain both pipes concurrently so a verbose clone cannot block on a full pipe.
        let (done_tx, done_rx) = mpsc::channel();
        let stdout = child.stdout.take().map(|pipe| drain(pipe, done_tx.clone()));
        let stderr = child.stderr.take().map(|pipe| drain(pipe, done_tx.clone()));
        drop(done_tx);
        let open_pipes = usize::from(stdout.is_some()) + usize::from(stderr.is_some());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    terminate(&mut child);
                    return Err(CloneError::Io {
                        context: "Failed polling clone process".to_string(),
                        source,
                    });
                }
            }

            if start.elapsed() >= self.timeout {
                terminate(&mut child);
                return Err(CloneError::TimedOut {
                    timeout: self.timeout,
                });
            }

            std::thread::sleep(POLL_INTERVAL);
        };

        // A helper left behind by git may keep the pipes open indefinitely.
        let deadline = start
            .checked_add(self.timeout)
            .unwrap_or_else(Instant::now)
            .max(Instant::now() + PIPE_GRACE);
        wait_for_pipes(&done_rx, open_pipes, deadline);

        let stdout = snapshot(stdout.as_ref());
        let stderr = snapshot(stderr.as_ref());

        if status.success() {
            Ok(CloneOutput { stdout, stderr })
        } else {
            Err(CloneError::Failed {
                status: status.code(),
                stderr: stderr.trim().to_string(),
            })
        }
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Kill the clone and everything it spawned, then reap it.
fn terminate(child: &mut Child) {
    kill_process_group(child);
    let _ = child.wait();
}

#[cfg(unix)]
#[allow(unsafe_code)]
fn kill_process_group(child: &mut Child) {
    let Ok(pid) = libc::pid_t::try_from(child.id()) else {
        let _ = child.kill();
        return;
    };
    // The child leads its own group (process_group(0) at spawn), so -pid addresses it.
    if unsafe { libc::kill(-pid, libc::SIGKILL) } != 0 {
        let _ = child.kill();
    }
}

#[cfg(not(unix))]
fn kill_process_group(child: &mut Child) {
    let _ = child.kill();
}

/// Copy `pipe` into a shared buffer on a helper thread; signals `done` at EOF.
fn drain<R: Read + Send + 'static>(mut pipe: R, done: Sender<()>) -> SharedBuf {
    let buf = SharedBuf::default();
    let sink = Arc::clone(&buf);
    std::thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => match sink.lock() {
                    Ok(mut bytes) => bytes.extend_from_slice(&chunk[..n]),
                    Err(_) => break,
                },
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        let _ = done.send(());
    });
    buf
}

/// Wait for the reader threads to reach EOF, but never past `deadline`.
fn wait_for_pipes(done: &Receiver<()>, mut open: usize, deadline: Instant) {
    while open > 0 {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match done.recv_timeout(remaining) {
            Ok(()) => open -= 1,
            Err(_) => {
                tracing::debug!(open, "clone output still held open; keeping what was read");
                break;
            }
        }
    }
}

fn snapshot(buf: Option<&SharedBuf>) -> String {
    let Some(buf) = buf else {
        return String::new();
    };
    match buf.lock() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}
