//! # Operation Executor
//!
//! Runs a batch of model-requested operations against the local shell and
//! filesystem and renders what happened as a transcript for the next turn.
//!
//! There is no sandboxing: commands run with the agent's own privileges and
//! any path the model names is written.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::domain::types::Operation;

/// Executes operations sequentially, blocking on each one.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    /// Directory for commands and relative edit paths. `None` inherits the
    /// process working directory.
    workdir: Option<PathBuf>,
}

impl Executor {
    pub fn new(workdir: Option<PathBuf>) -> Self {
        Self { workdir }
    }

    /// Execute every operation in order and return the combined transcript.
    ///
    /// Failures are annotated in the transcript; they never stop the batch.
    pub fn execute(&self, ops: &[Operation]) -> String {
        let mut transcript = String::new();

        for (index, op) in ops.iter().enumerate() {
            match op {
                Operation::Shell { command } => {
                    tracing::debug!(index, command = %command, "running shell operation");
                    transcript.push_str(&self.run_shell(command));
                }
                Operation::Edit { path, content } => {
                    tracing::debug!(index, path = %path, bytes = content.len(), "writing file");
                    transcript.push_str(&self.write_file(path, content));
                }
                Operation::Done | Operation::Noop => {
                    tracing::trace!(index, "skipping operation without effect");
                }
            }
        }

        transcript
    }

    fn run_shell(&self, command: &str) -> String {
        let mut out = format!("$ {command}\n");

        match self.capture_combined(command) {
            Ok((output, status)) => {
                out.push_str(&output);
                out.push('\n');
                if !status.success() {
                    tracing::info!(command, status = %status, "shell command failed");
                    out.push_str(&format!("(error: {})\n", describe_status(status)));
                }
            }
            Err(e) => {
                tracing::warn!(command, error = %e, "failed to launch shell");
                out.push('\n');
                out.push_str(&format!("(error: {e})\n"));
            }
        }

        out
    }

    /// Run `command` with stdout and stderr sharing one pipe, so the captured
    /// bytes keep the order in which the process wrote them.
    fn capture_combined(&self, command: &str) -> std::io::Result<(String, ExitStatus)> {
        let (mut reader, writer) = std::io::pipe()?;

        let mut child = {
            let mut cmd = shell_command(command);
            if let Some(dir) = &self.workdir {
                cmd.current_dir(dir);
            }
            cmd.stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            // `cmd` holds the parent's write ends; dropping it lets the read below see EOF.
            cmd.spawn()?
        };

        let mut bytes = Vec::new();
        let read = reader.read_to_end(&mut bytes);
        let status = child.wait()?;
        read?;

        Ok((String::from_utf8_lossy(&bytes).into_owned(), status))
    }

    fn write_file(&self, path: &str, content: &str) -> String {
        let mut out = format!("edited {path}\n");

        if let Err(e) = std::fs::write(self.resolve(path), content) {
            tracing::warn!(path, error = %e, "file write failed");
            out.push_str(&format!("(error: {e})\n"));
        }

        out
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.workdir {
            Some(dir) if Path::new(path).is_relative() => dir.join(path),
            _ => PathBuf::from(path),
        }
    }
}

fn shell_command(command: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command]);
        c
    } else {
        let mut c = Command::new("bash");
        c.args(["-c", command]);
        c
    }
}

fn describe_status(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("exit status {code}");
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("signal: {}", signal_name(signal));
        }
    }

    "terminated abnormally".to_string()
}

#[cfg(unix)]
fn signal_name(signal: i32) -> String {
    let name = match signal {
        1 => "hangup",
        2 => "interrupt",
        3 => "quit",
        4 => "illegal instruction",
        6 => "aborted",
        8 => "floating point exception",
        9 => "killed",
        11 => "segmentation fault",
        13 => "broken pipe",
        14 => "alarm clock",
        15 => "terminated",
        other => return format!("signal {other}"),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn executor_in(dir: &TempDir) -> Executor {
        Executor::new(Some(dir.path().to_path_buf()))
    }

    fn edit(path: &str, content: &str) -> Operation {
        Operation::Edit {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    fn shell(command: &str) -> Operation {
        Operation::Shell {
            command: command.to_string(),
        }
    }

    #[test]
    fn test_edit_creates_file() {
        let dir = TempDir::new().unwrap();
        let transcript = executor_in(&dir).execute(&[edit("hello.txt", "hi")]);

        assert_eq!(transcript, "edited hello.txt\n");
        assert_eq!(fs::read_to_string(dir.path().join("hello.txt")).unwrap(), "hi");
    }

    #[test]
    fn test_edit_overwrites_instead_of_appending() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("notes.md");
        fs::write(&target, "a much longer previous body\nwith two lines\n").unwrap();

        executor_in(&dir).execute(&[edit("notes.md", "short")]);

        assert_eq!(fs::read_to_string(&target).unwrap(), "short");
    }

    #[test]
    fn test_edit_with_absolute_path_ignores_workdir() {
        let workdir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let target = other.path().join("abs.txt");

        let transcript = executor_in(&workdir).execute(&[edit(target.to_str().unwrap(), "x")]);

        assert_eq!(transcript, format!("edited {}\n", target.display()));
        assert_eq!(fs::read_to_string(&target).unwrap(), "x");
    }

    #[test]
    fn test_edit_failure_is_reported_and_batch_continues() {
        let dir = TempDir::new().unwrap();
        let transcript =
            executor_in(&dir).execute(&[edit("missing/dir/file.txt", "x"), edit("ok.txt", "y")]);

        assert!(transcript.starts_with("edited missing/dir/file.txt\n(error: "));
        assert!(transcript.ends_with("edited ok.txt\n"));
        assert!(!dir.path().join("missing").exists());
        assert_eq!(fs::read_to_string(dir.path().join("ok.txt")).unwrap(), "y");
    }

    #[test]
    fn test_done_and_noop_append_nothing() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            executor_in(&dir).execute(&[Operation::Noop, Operation::Done]),
            ""
        );
        assert_eq!(executor_in(&dir).execute(&[]), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_success_transcript() {
        let dir = TempDir::new().unwrap();
        let transcript = executor_in(&dir).execute(&[shell("echo hello")]);
        assert_eq!(transcript, "$ echo hello\nhello\n\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_runs_in_workdir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("marker.txt"), "").unwrap();

        let transcript = executor_in(&dir).execute(&[shell("ls")]);
        assert!(transcript.contains("marker.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_shell_captures_stderr_in_order() {
        let dir = TempDir::new().unwrap();
        let transcript = executor_in(&dir).execute(&[shell("echo one; echo two >&2; echo three")]);
        assert_eq!(
            transcript,
            "$ echo one; echo two >&2; echo three\none\ntwo\nthree\n\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_shell_is_annotated_and_next_op_runs() {
        let dir = TempDir::new().unwrap();
        let transcript = executor_in(&dir).execute(&[
            shell("echo broken >&2; exit 3"),
            edit("after.txt", "still ran"),
        ]);

        assert!(transcript.contains("$ echo broken >&2; exit 3\n"));
        assert!(transcript.contains("broken\n"));
        assert!(transcript.contains("(error: exit status 3)\n"));
        assert!(transcript.ends_with("edited after.txt\n"));
        assert_eq!(
            fs::read_to_string(dir.path().join("after.txt")).unwrap(),
            "still ran"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_operations_run_in_order() {
        let dir = TempDir::new().unwrap();
        let transcript = executor_in(&dir).execute(&[
            edit("seq.txt", "first"),
            shell("cat seq.txt"),
            edit("seq.txt", "second"),
            shell("cat seq.txt"),
        ]);

        assert_eq!(
            transcript,
            "edited seq.txt\n$ cat seq.txt\nfirst\nedited seq.txt\n$ cat seq.txt\nsecond\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_killed_shell_names_the_signal() {
        let dir = TempDir::new().unwrap();
        let transcript = executor_in(&dir).execute(&[shell("kill -9 $$")]);
        assert_eq!(transcript, "$ kill -9 $$\n\n(error: signal: killed)\n");

        let transcript = executor_in(&dir).execute(&[shell("kill -TERM $$")]);
        assert!(transcript.ends_with("(error: signal: terminated)\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_signal_names() {
        assert_eq!(signal_name(9), "killed");
        assert_eq!(signal_name(11), "segmentation fault");
        assert_eq!(signal_name(64), "signal 64");
    }

    #[test]
    fn test_launch_failure_is_annotated() {
        let executor = Executor::new(Some(PathBuf::from("/definitely/not/a/real/dir")));
        let transcript = executor.execute(&[shell("echo unreachable")]);

        assert!(transcript.starts_with("$ echo unreachable\n\n(error: "));
    }
}
