//! The process that receives the replayed input stream.
//!
//! The consumer is a fresh simulator input receiver started in
//! "do not record" mode, so replaying a recording never produces a
//! recording of its own.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::process::{Child, ChildStdin, Command};

/// How long to wait after each termination signal before escalating.
const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Where the replayed bytes go.
///
/// The driver writes to [`Consumer::sink`] and calls [`Consumer::terminate`]
/// once the replay ends, whichever way it ends.
#[allow(async_fn_in_trait)]
pub trait Consumer {
    type Sink: AsyncWrite + Unpin;

    /// The consumer's input stream.
    ///
    /// Fails once the consumer has been terminated.
    fn sink(&mut self) -> io::Result<&mut Self::Sink>;

    /// Stops the consumer. Calling it again after it succeeded is a no-op.
    async fn terminate(&mut self) -> io::Result<()>;
}

/// The command line used to start a consumer.
#[derive(Debug, Clone)]
pub struct ConsumerCommand {
    /// The binary to start.
    pub program: OsString,

    /// Arguments to the program, before the no-record flag.
    pub args: Vec<OsString>,

    /// Tells the consumer not to record the session it receives.
    pub no_record_flag: OsString,
}

impl ConsumerCommand {
    /// A consumer script run through `interpreter`.
    ///
    /// An empty interpreter runs the script directly.
    pub fn script(interpreter: &str, script: &Path, no_record_flag: &str) -> Self {
        if interpreter.is_empty() {
            Self {
                program: script.as_os_str().to_owned(),
                args: Vec::new(),
                no_record_flag: no_record_flag.into(),
            }
        } else {
            Self {
                program: interpreter.into(),
                args: vec![script.as_os_str().to_owned()],
                no_record_flag: no_record_flag.into(),
            }
        }
    }

    fn argv(&self) -> impl Iterator<Item = &OsString> {
        self.args.iter().chain(std::iter::once(&self.no_record_flag))
    }
}

/// A running consumer process.
///
/// Its stdout and stderr are inherited; only stdin is piped. The child is
/// killed if the handle is dropped without being terminated.
pub struct ConsumerProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    grace_period: Duration,
    terminated: bool,
}

impl ConsumerProcess {
    /// Starts the consumer and opens a pipe to its input stream.
    pub fn launch(cmd: &ConsumerCommand) -> io::Result<Self> {
        log::info!(program = &*cmd.program.to_string_lossy(); "starting consumer");

        let mut child = Command::new(&cmd.program)
            .args(cmd.argv())
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "could not open consumer stdin"))?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            grace_period: DEFAULT_GRACE_PERIOD,
            terminated: false,
        })
    }

    /// Overrides how long each termination signal is given to take effect.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Returns whether the process has exited, without waiting.
    pub fn has_exited(&mut self) -> io::Result<bool> {
        Ok(self.child.try_wait()?.is_some())
    }
}

impl Consumer for ConsumerProcess {
    type Sink = ChildStdin;

    fn sink(&mut self) -> io::Result<&mut ChildStdin> {
        self.stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "consumer input is closed"))
    }

    async fn terminate(&mut self) -> io::Result<()> {
        if self.terminated {
            return Ok(());
        }

        // Closing stdin lets the consumer see end of input.
        drop(self.stdin.take());

        if self.child.try_wait()?.is_none() {
            kill_gracefully(&mut self.child, self.grace_period).await?;
        }
        let status = self.child.wait().await?;
        log::info!(status = status.to_string().as_str(); "consumer exited");

        self.terminated = true;
        Ok(())
    }
}

#[cfg(target_os = "windows")]
async fn kill_gracefully(child: &mut Child, _grace_period: Duration) -> io::Result<()> {
    child.kill().await
}

/// Attempts to kill a child process gracefully: SIGINT, then SIGTERM, each
/// followed by `grace_period` of waiting, then SIGKILL.
#[cfg(not(target_os = "windows"))]
async fn kill_gracefully(child: &mut Child, grace_period: Duration) -> io::Result<()> {
    if let Some(pid) = child.id() {
        for sig in [libc::SIGINT, libc::SIGTERM] {
            unsafe {
                libc::kill(pid as i32, sig);
            }

            tokio::select! {
                _ = child.wait() => return Ok(()),
                _ = tokio::time::sleep(grace_period) => {
                    // Still running, escalate.
                }
            }
        }
    }

    // We're out of graceful signals.
    child.kill().await
}
