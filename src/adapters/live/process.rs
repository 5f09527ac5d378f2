//! Child-process supervision shared by the shell and git adapters.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::PortError;
use crate::ports::ShellOutput;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long output is still collected after the child exits. A grandchild
/// that inherited the pipes can keep them open long after that.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

type Captured = Arc<Mutex<Vec<u8>>>;

/// Spawns `command` with piped output and waits for it, killing the child if
/// it runs longer than `timeout`.
///
/// Never blocks past `timeout`: output still unread when the pipes outlive
/// the child is dropped.
///
/// # Errors
///
/// Returns an error if the process cannot be spawned, cannot be waited on,
/// or times out.
pub fn run_with_timeout(
    command: &mut Command,
    timeout: Duration,
) -> Result<ShellOutput, PortError> {
    let deadline = Instant::now() + timeout;
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain both pipes on their own threads so a chatty child never blocks
    // on a full pipe while we poll for exit.
    let (done_tx, done_rx) = mpsc::channel();
    let stdout = drain(child.stdout.take(), &done_tx);
    let stderr = drain(child.stderr.take(), &done_tx);
    drop(done_tx);

    let Some(status) = wait_until(&mut child, deadline)? else {
        let _ = child.kill();
        let _ = child.wait();
        return Err(format!("timed out after {}s", timeout.as_secs()).into());
    };

    let grace = deadline.min(Instant::now() + DRAIN_GRACE);
    await_drains(&done_rx, grace);

    Ok(ShellOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout: captured(&stdout),
        stderr: captured(&stderr),
    })
}

fn wait_until(child: &mut Child, deadline: Instant) -> Result<Option<ExitStatus>, PortError> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>, done: &Sender<()>) -> Captured {
    let buf = Captured::default();
    if let Some(mut reader) = pipe {
        let sink = Arc::clone(&buf);
        let done = done.clone();
        thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if let Ok(mut out) = sink.lock() {
                            out.extend_from_slice(&chunk[..n]);
                        }
                    }
                }
            }
            let _ = done.send(());
        });
    }
    buf
}

/// Waits until every drain thread hit end-of-file or `until` passes.
fn await_drains(done: &Receiver<()>, until: Instant) {
    loop {
        let left = until.saturating_duration_since(Instant::now());
        // Disconnected means every drain finished.
        if done.recv_timeout(left).is_err() {
            return;
        }
    }
}

fn captured(buf: &Captured) -> String {
    buf.lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
