//! Live shell executor using `std::process::Command`.

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crate::ports::shell::{Invocation, ShellExecutor, ShellOutput};

const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// How long to wait for pipe output after a timed-out child is killed.
/// Grandchildren that inherited the pipes can keep them open indefinitely.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Live executor that spawns the program directly, without a shell.
pub struct LiveShellExecutor;

impl ShellExecutor for LiveShellExecutor {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> Result<ShellOutput, Box<dyn std::error::Error + Send + Sync>> {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {e}", invocation.program))?;

        // Pipes are drained on helper threads so a child that fills its
        // stdout buffer cannot stall the wait loop below.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let timeout = invocation.timeout_secs.map(Duration::from_secs);
        let (status, timed_out) = wait(&mut child, timeout)?;

        let stdout = collect(&stdout, timed_out);
        let stderr = collect(&stderr, timed_out);

        Ok(ShellOutput {
            exit_code: status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            timed_out,
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Output of a drain thread. After a timeout the thread is abandoned if
/// it does not finish within [`DRAIN_GRACE`].
fn collect(rx: &Receiver<Vec<u8>>, timed_out: bool) -> Vec<u8> {
    if timed_out {
        rx.recv_timeout(DRAIN_GRACE).unwrap_or_default()
    } else {
        rx.recv().unwrap_or_default()
    }
}

fn wait(child: &mut Child, timeout: Option<Duration>) -> std::io::Result<(ExitStatus, bool)> {
    let Some(timeout) = timeout else {
        return Ok((child.wait()?, false));
    };
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status, false));
        }
        if started.elapsed() >= timeout {
            let _ = child.kill();
            return Ok((child.wait()?, true));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_echo_command() {
        let shell = LiveShellExecutor;
        let result = shell.run(&Invocation::new("echo").arg("hello")).unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
        assert!(!result.timed_out);
    }

    #[test]
    fn arguments_are_not_resplit() {
        let shell = LiveShellExecutor;
        let result = shell.run(&Invocation::new("printf").args(["%s|", "a b", "c"])).unwrap();

        assert_eq!(result.stdout, "a b|c|");
    }

    #[test]
    fn captures_exit_code() {
        let shell = LiveShellExecutor;
        let result = shell.run(&Invocation::new("sh").args(["-c", "exit 42"])).unwrap();

        assert_eq!(result.exit_code, 42);
        assert!(!result.success());
    }

    #[test]
    fn honours_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let shell = LiveShellExecutor;
        let result = shell.run(&Invocation::new("pwd").current_dir(dir.path())).unwrap();

        let reported = std::fs::canonicalize(result.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn kills_process_after_timeout() {
        let shell = LiveShellExecutor;
        let started = Instant::now();
        let result =
            shell.run(&Invocation::new("sleep").arg("30").timeout_secs(Some(1))).unwrap();

        assert!(result.timed_out);
        assert!(!result.success());
        assert!(started.elapsed() < Duration::from_secs(20));
    }

    #[test]
    fn timeout_is_not_held_up_by_grandchildren() {
        let shell = LiveShellExecutor;
        let started = Instant::now();
        // sh forks sleep, which keeps stdout open after sh is killed.
        let result = shell
            .run(&Invocation::new("sh").args(["-c", "sleep 8; echo done"]).timeout_secs(Some(1)))
            .unwrap();

        assert!(result.timed_out);
        assert!(!result.stdout.contains("done"));
        assert!(started.elapsed() < Duration::from_secs(4), "took {:?}", started.elapsed());
    }

    #[test]
    fn missing_program_is_an_error() {
        let shell = LiveShellExecutor;
        let result = shell.run(&Invocation::new("bugharvest-definitely-not-installed"));

        assert!(result.is_err());
    }
}
