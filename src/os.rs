//! Host and process introspection.
use std::process::Stdio;

use log::debug;
use serde::Deserialize;
use serde::Serialize;
use tokio::process::Command;

use crate::errors::Error;

/// Captured output of a child process.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CommandOutput {
    /// Everything the child wrote to stdout, lossily decoded.
    pub stdout: String,
    /// Everything the child wrote to stderr, lossily decoded.
    pub stderr: String,
}

/// Name of the host operating system, e.g. `"linux"` or `"macos"`.
pub fn os_name() -> &'static str {
    std::env::consts::OS
}

/// Name of the host CPU architecture, e.g. `"x86_64"` or `"aarch64"`.
pub fn arch() -> &'static str {
    std::env::consts::ARCH
}

/// Whether the crate was built for a unix family OS.
pub fn is_unix() -> bool {
    cfg!(unix)
}

fn command_line(command: &str, args: &[&str]) -> String {
    std::iter::once(command)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs `command` with the parent's stdin, stdout and stderr.
///
/// A non-zero exit is an error.
pub async fn run_command(command: &str, args: &[&str]) -> Result<(), Error> {
    const OP: &str = "run_command";
    let line = command_line(command, args);
    debug!("{OP}: {line}");
    let status = Command::new(command)
        .args(args)
        .status()
        .await
        .map_err(|e| Error::Command {
            op: OP.into(),
            command: line.clone(),
            how: e.to_string(),
        })?;
    if !status.success() {
        return Err(Error::Command {
            op: OP.into(),
            command: line,
            how: status.to_string(),
        });
    }
    Ok(())
}

/// Runs `command` and captures its output instead of echoing it.
///
/// A non-zero exit is an error carrying the exit status and stderr.
pub async fn run_command_silent(command: &str, args: &[&str]) -> Result<CommandOutput, Error> {
    const OP: &str = "run_command_silent";
    let line = command_line(command, args);
    debug!("{OP}: {line}");
    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::Command {
            op: OP.into(),
            command: line.clone(),
            how: e.to_string(),
        })?;
    let captured = CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    if !output.status.success() {
        return Err(Error::Command {
            op: OP.into(),
            command: line,
            how: format!("{}: {}", output.status, captured.stderr.trim_end()),
        });
    }
    Ok(captured)
}

/// Runs `shell -c script` with inherited stdio.
pub async fn run_shell_command(shell: &str, script: &str) -> Result<(), Error> {
    run_command(shell, &["-c", script]).await
}

/// Runs `shell -c script` and captures its output.
pub async fn run_shell_command_silent(shell: &str, script: &str) -> Result<CommandOutput, Error> {
    run_command_silent(shell, &["-c", script]).await
}

/// Whether `command` resolves to an executable on `PATH` (or is itself a
/// path to one).
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}

/// Soft limit on open file descriptors for this process.
///
/// `None` on platforms without rlimits.
#[cfg(unix)]
pub fn open_file_limit() -> Result<Option<u64>, Error> {
    use nix::sys::resource::Resource;
    use nix::sys::resource::getrlimit;

    let (soft, _hard) = getrlimit(Resource::RLIMIT_NOFILE).map_err(|e| Error::Command {
        op: "open_file_limit".into(),
        command: "getrlimit(RLIMIT_NOFILE)".into(),
        how: e.to_string(),
    })?;
    Ok(Some(soft as u64))
}

/// Soft limit on open file descriptors for this process.
///
/// `None` on platforms without rlimits.
#[cfg(not(unix))]
pub fn open_file_limit() -> Result<Option<u64>, Error> {
    Ok(None)
}

#[cfg(test)]
mod tests {
    use crate::Error;
    use crate::os::*;

    #[test]
    fn host_names_are_known() {
        assert!(!os_name().is_empty());
        assert!(!arch().is_empty());
        assert_eq!(is_unix(), cfg!(unix));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_output() {
        let out = run_command_silent("echo", &["hello"]).await.unwrap();
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(out.stderr, "");

        let out = run_shell_command_silent("sh", "echo oops 1>&2").await.unwrap();
        assert_eq!(out.stderr, "oops\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_error() {
        let result = run_shell_command_silent("sh", "echo bad 1>&2; exit 3").await;
        match result {
            Err(Error::Command { how, .. }) => assert!(how.contains("bad"), "{how}"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(run_shell_command("sh", "exit 1").await.is_err());
        assert!(run_shell_command("sh", "true").await.is_ok());
    }

    #[tokio::test]
    async fn missing_command_is_error() {
        assert!(matches!(
            run_command_silent("definitely-not-a-command-xyz", &[]).await,
            Err(Error::Command { .. })
        ));
        assert!(!command_exists("definitely-not-a-command-xyz"));
    }

    #[cfg(unix)]
    #[test]
    fn finds_shell_on_path() {
        assert!(command_exists("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn reports_file_limit() {
        assert!(open_file_limit().unwrap().unwrap() > 0);
    }
}
