//! Operating system launch primitives.
//!
//! [`Launcher`] is the seam between the launch policy in
//! [`crate::worker::handler`] and the platform. [`SystemLauncher`] hands URLs
//! and paths to the desktop's default handlers through `open`, and starts
//! programs with `std::process::Command` without waiting for them.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A program start request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramLaunch {
    pub executable: PathBuf,

    /// Raw argument text, passed to the shell verbatim. `None` starts the
    /// executable directly with no shell.
    pub arguments: Option<String>,

    pub working_dir: Option<PathBuf>,
}

impl ProgramLaunch {
    /// Starts `executable` in its containing directory.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>, arguments: &str) -> Self {
        let executable = executable.into();
        let working_dir = executable
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf);
        let arguments = Some(arguments.trim())
            .filter(|args| !args.is_empty())
            .map(str::to_string);
        Self {
            executable,
            arguments,
            working_dir,
        }
    }
}

/// Platform operations used by the launch policy. Called from pool threads.
pub trait Launcher: Send + Sync {
    /// Opens a URL with the default browser.
    ///
    /// # Errors
    ///
    /// Fails if no handler accepted the URL.
    fn open_url(&self, url: &str) -> io::Result<()>;

    /// Opens a file or folder with its associated application.
    ///
    /// # Errors
    ///
    /// Fails if no handler accepted the path.
    fn open_path(&self, path: &Path) -> io::Result<()>;

    /// Starts a program and returns without waiting for it.
    ///
    /// # Errors
    ///
    /// Fails if the process could not be created.
    fn spawn_program(&self, program: &ProgramLaunch) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// [`Launcher`] backed by the real desktop.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn open_url(&self, url: &str) -> io::Result<()> {
        open::that(url)
    }

    fn open_path(&self, path: &Path) -> io::Result<()> {
        open::that(path)
    }

    fn spawn_program(&self, program: &ProgramLaunch) -> io::Result<()> {
        let mut command = match &program.arguments {
            Some(arguments) => shell_command(&program.executable, arguments),
            None => Command::new(&program.executable),
        };
        if let Some(dir) = &program.working_dir {
            command.current_dir(dir);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let pid = spawn_detached(&mut command)?;
        tracing::debug!(pid, executable = %program.executable.display(), "program started");
        Ok(())
    }
}

/// Starts `command` and reaps it on a background thread so a finished program
/// does not linger as a zombie. Returns the child's process id.
fn spawn_detached(command: &mut Command) -> io::Result<u32> {
    let mut child = command.spawn()?;
    let pid = child.id();
    let reaper = std::thread::Builder::new()
        .name(format!("instant-access-reap-{pid}"))
        .spawn(move || {
            if let Err(e) = child.wait() {
                tracing::debug!(pid, error = %e, "could not wait for program");
            }
        });
    if let Err(e) = reaper {
        tracing::warn!(pid, error = %e, "could not start reaper thread");
    }
    Ok(pid)
}

/// Quoted executable followed by the raw arguments, run through the shell.
#[cfg(windows)]
fn shell_command(executable: &Path, arguments: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut command = Command::new("cmd");
    command.raw_arg(format!("/C \"\"{}\" {arguments}\"", executable.display()));
    command
}

/// Quoted executable followed by the raw arguments, run through the shell.
#[cfg(not(windows))]
fn shell_command(executable: &Path, arguments: &str) -> Command {
    let mut command = Command::new("sh");
    command
        .arg("-c")
        .arg(format!("{} {arguments}", sh_quote(&executable.to_string_lossy())));
    command
}

#[cfg(not(windows))]
fn sh_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_dir_is_the_executable_directory() {
        let launch = ProgramLaunch::new("/opt/tools/run", "  ");
        assert_eq!(launch.working_dir, Some(PathBuf::from("/opt/tools")));
        assert_eq!(launch.arguments, None);

        let bare = ProgramLaunch::new("run", "--fast");
        assert_eq!(bare.working_dir, None);
        assert_eq!(bare.arguments.as_deref(), Some("--fast"));
    }

    #[cfg(not(windows))]
    #[test]
    fn shell_quoting_survives_single_quotes() {
        assert_eq!(sh_quote("/tmp/it's here"), r"'/tmp/it'\''s here'");
    }

    #[cfg(not(windows))]
    #[test]
    fn shell_launch_passes_arguments_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let launch = ProgramLaunch {
            executable: PathBuf::from("touch"),
            arguments: Some(format!("'{}'", marker.display())),
            working_dir: Some(dir.path().to_path_buf()),
        };

        SystemLauncher.spawn_program(&launch).unwrap();

        for _ in 0..250 {
            if marker.exists() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        panic!("shell command did not run");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn finished_programs_are_reaped() {
        let pid = spawn_detached(Command::new("true").stdin(Stdio::null())).unwrap();
        let proc_entry = PathBuf::from(format!("/proc/{pid}"));

        for _ in 0..250 {
            if !proc_entry.exists() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        panic!("program {pid} was never reaped");
    }
}
