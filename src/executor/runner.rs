//! Async command execution with timeout support
//!
//! Provides a unified interface for running the build tool with:
//! - Configurable timeouts
//! - Three stdout policies (discard, stream, capture)
//! - Output truncation for large captured outputs
//! - Working directory control

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::OutputMode;
use crate::error::BatchError;

/// Maximum captured output size before truncation (in bytes)
const MAX_OUTPUT_SIZE: usize = 100_000; // 100KB

/// Truncation marker for large outputs
const TRUNCATION_MARKER: &str = "\n... [output truncated] ...\n";

/// Options for async command execution
#[derive(Debug, Clone)]
pub struct ExecOptions {
    /// Working directory for the command
    pub working_dir: Option<PathBuf>,
    /// Environment variables to set
    pub env: HashMap<String, String>,
    /// Timeout duration (None = no timeout)
    pub timeout: Option<Duration>,
    /// What happens to the child's output
    pub output: OutputMode,
    /// Maximum captured output size before truncation
    pub max_output_size: usize,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            working_dir: None,
            env: HashMap::new(),
            timeout: None,
            output: OutputMode::Discard,
            max_output_size: MAX_OUTPUT_SIZE,
        }
    }
}

impl ExecOptions {
    /// Create options with a working directory
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set timeout in seconds, 0 meaning none
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Add an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the output policy
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

}

/// Result of async command execution
#[derive(Debug)]
pub struct ExecResult {
    /// Exit code if available
    pub exit_code: Option<i32>,
    /// Captured standard output (empty unless capturing), with a truncation
    /// marker when it exceeded the limit
    pub stdout: String,
    /// Captured standard error, same rules as `stdout`
    pub stderr: String,
    /// Duration of execution
    pub duration: Duration,
}

/// Execute a command asynchronously with timeout support
///
/// # Errors
/// * `BatchError::SpawnFailed` - If the command couldn't be spawned
/// * `BatchError::Timeout` - If the command timed out (when timeout is set)
pub async fn exec_command<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    options: &ExecOptions,
) -> Result<ExecResult, BatchError> {
    let start = Instant::now();
    let program = program.as_ref();
    let command_str = command_line(&program.to_string_lossy(), args);

    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.kill_on_drop(true);

    match options.output {
        OutputMode::Discard => {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::inherit());
        }
        OutputMode::Stream => {
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());
        }
        OutputMode::Capture => {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        }
    }

    if let Some(ref dir) = options.working_dir {
        cmd.current_dir(dir);
    }

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    tracing::debug!("Executing async: {}", command_str);

    let child = cmd.spawn().map_err(|e| BatchError::SpawnFailed {
        command: command_str.clone(),
        error: e.to_string(),
    })?;

    let result = if let Some(timeout_duration) = options.timeout {
        match timeout(timeout_duration, wait_for_output(child, options)).await {
            Ok(result) => result?,
            // Dropping the future kills the child
            Err(_) => {
                return Err(BatchError::Timeout {
                    command: command_str,
                    timeout: timeout_duration,
                });
            }
        }
    } else {
        wait_for_output(child, options).await?
    };

    let duration = start.elapsed();
    tracing::debug!(
        "Finished in {}ms with exit code {:?}: {}",
        duration.as_millis(),
        result.exit_code,
        command_str
    );

    Ok(ExecResult {
        exit_code: result.exit_code,
        stdout: result.stdout,
        stderr: result.stderr,
        duration,
    })
}

/// Render a program and its arguments as one display string
///
/// Arguments that are not valid UTF-8 are shown lossily.
pub fn command_line<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.as_ref().to_string_lossy());
    }
    line
}

/// Internal result from waiting for process output
struct WaitResult {
    exit_code: Option<i32>,
    stdout: String,
    stderr: String,
}

/// Wait for a child process while draining whatever pipes it has
async fn wait_for_output(
    mut child: tokio::process::Child,
    options: &ExecOptions,
) -> Result<WaitResult, BatchError> {
    let keep = options.output == OutputMode::Capture;
    let max_size = options.max_output_size;

    let stdout_handle = child
        .stdout
        .take()
        .map(|out| tokio::spawn(drain_pipe(out, keep, max_size)));
    let stderr_handle = child
        .stderr
        .take()
        .map(|err| tokio::spawn(drain_pipe(err, keep, max_size)));

    let status = child.wait().await?;

    let stdout = join_reader(stdout_handle, "stdout").await?;
    let stderr = join_reader(stderr_handle, "stderr").await?;

    Ok(WaitResult {
        exit_code: status.code(),
        stdout,
        stderr,
    })
}

async fn join_reader(
    handle: Option<tokio::task::JoinHandle<String>>,
    stream: &str,
) -> Result<String, BatchError> {
    match handle {
        Some(handle) => handle.await.map_err(|e| {
            BatchError::Io(std::io::Error::other(format!("{} task failed: {}", stream, e)))
        }),
        None => Ok(String::new()),
    }
}

/// Drain a pipe, keeping its content only when asked to
async fn drain_pipe<R: AsyncRead + Unpin>(reader: R, keep: bool, max_size: usize) -> String {
    if keep {
        return read_and_truncate(reader, max_size).await;
    }

    let mut reader = reader;
    if let Err(e) = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await {
        tracing::warn!("Error draining output: {}", e);
    }
    String::new()
}

/// Read from an async reader and truncate if too large
///
/// Keeps reading (and dropping) after the limit so the child never blocks
/// on a full pipe.
async fn read_and_truncate<R: AsyncRead + Unpin>(reader: R, max_size: usize) -> String {
    let mut buf_reader = BufReader::new(reader);
    let mut output = String::with_capacity(max_size.min(64 * 1024));
    let mut raw = Vec::with_capacity(4096);
    let mut truncated = false;

    loop {
        raw.clear();
        match buf_reader.read_until(b'\n', &mut raw).await {
            Ok(0) => break,
            Ok(_) if truncated => {}
            Ok(_) => {
                let line = String::from_utf8_lossy(&raw);
                if output.len() + line.len() > max_size {
                    let mut remaining = max_size.saturating_sub(output.len()).min(line.len());
                    while !line.is_char_boundary(remaining) {
                        remaining -= 1;
                    }
                    output.push_str(&line[..remaining]);
                    output.push_str(TRUNCATION_MARKER);
                    truncated = true;
                } else {
                    output.push_str(&line);
                }
            }
            Err(e) => {
                tracing::warn!("Error reading output: {}", e);
                break;
            }
        }
    }

    output
}

/// Execute a command synchronously
///
/// Builds a current-thread runtime per call, so it must not be called from
/// inside another tokio runtime.
pub fn exec_command_sync<S: AsRef<OsStr>>(
    program: impl AsRef<OsStr>,
    args: &[S],
    options: &ExecOptions,
) -> Result<ExecResult, BatchError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            BatchError::Io(std::io::Error::other(format!(
                "Failed to create runtime: {}",
                e
            )))
        })?;

    rt.block_on(exec_command(program, args, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exec_options_default() {
        let options = ExecOptions::default();

        assert!(options.working_dir.is_none());
        assert!(options.env.is_empty());
        assert!(options.timeout.is_none());
        assert_eq!(options.output, OutputMode::Discard);
        assert_eq!(options.max_output_size, MAX_OUTPUT_SIZE);
    }

    #[test]
    fn test_exec_options_builder() {
        let options = ExecOptions::in_dir("/tmp")
            .with_timeout_secs(60)
            .with_env("KEY", "value")
            .with_output(OutputMode::Capture);

        assert_eq!(options.working_dir, Some(PathBuf::from("/tmp")));
        assert_eq!(options.timeout, Some(Duration::from_secs(60)));
        assert_eq!(options.env.get("KEY"), Some(&"value".to_string()));
        assert_eq!(options.output, OutputMode::Capture);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let options = ExecOptions::default().with_timeout_secs(0);
        assert!(options.timeout.is_none());
    }

    #[test]
    fn test_command_line() {
        assert_eq!(command_line("../gradlew", &args(&[])), "../gradlew");
        assert_eq!(
            command_line("../gradlew", &args(&[":modules:auth:test", "--offline"])),
            "../gradlew :modules:auth:test --offline"
        );
    }

    #[tokio::test]
    async fn test_capture_keeps_output() {
        let options = ExecOptions::default().with_output(OutputMode::Capture);
        let result = exec_command("sh", &args(&["-c", "echo out; echo err >&2"]), &options)
            .await
            .unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("out"));
        assert!(result.stderr.contains("err"));
    }

    #[tokio::test]
    async fn test_discard_drops_stdout() {
        let result = exec_command("echo", &args(&["hello world"]), &ExecOptions::default())
            .await
            .unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_exec_command_failure() {
        let result = exec_command("sh", &args(&["-c", "exit 3"]), &ExecOptions::default())
            .await
            .unwrap();

        assert_eq!(result.exit_code, Some(3));
    }

    #[tokio::test]
    async fn test_exec_command_timeout() {
        let options = ExecOptions::default().with_timeout(Duration::from_millis(100));

        let result = exec_command("sleep", &args(&["10"]), &options).await;

        match result {
            Err(err @ BatchError::Timeout { .. }) => {
                assert_eq!(
                    err.to_string(),
                    "Command timed out after 100ms: sleep 10"
                );
            }
            other => panic!("Expected timeout error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_exec_command_output_truncation() {
        let options = ExecOptions {
            max_output_size: 100,
            ..ExecOptions::default().with_output(OutputMode::Capture)
        };

        let result = exec_command(
            "sh",
            &args(&["-c", "for i in $(seq 1 1000); do echo \"line of output $i\"; done"]),
            &options,
        )
        .await
        .unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.ends_with(TRUNCATION_MARKER));
        assert!(result.stdout.len() <= 100 + TRUNCATION_MARKER.len());
    }

    #[tokio::test]
    async fn test_exec_command_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let options = ExecOptions::in_dir(dir.path()).with_output(OutputMode::Capture);

        let result = exec_command("pwd", &args(&[]), &options).await.unwrap();

        let reported = PathBuf::from(result.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[tokio::test]
    async fn test_exec_command_env() {
        let options = ExecOptions::default()
            .with_output(OutputMode::Capture)
            .with_env("EXEC_TEST_ANSWER", "42");

        let result = exec_command("sh", &args(&["-c", "echo $EXEC_TEST_ANSWER"]), &options)
            .await
            .unwrap();

        assert_eq!(result.stdout.trim(), "42");
    }

    #[tokio::test]
    async fn test_exec_command_spawn_failed() {
        let result =
            exec_command("nonexistent_command_12345", &args(&[]), &ExecOptions::default()).await;

        match result {
            Err(BatchError::SpawnFailed { command, .. }) => {
                assert!(command.contains("nonexistent_command_12345"));
            }
            other => panic!("Expected SpawnFailed error, got {:?}", other),
        }
    }

    #[test]
    fn test_exec_command_sync() {
        let options = ExecOptions::default().with_output(OutputMode::Capture);
        let result = exec_command_sync("echo", &args(&["sync test"]), &options).unwrap();

        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("sync test"));
    }
}
