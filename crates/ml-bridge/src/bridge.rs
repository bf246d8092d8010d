//! Child-process runner for the segmentation model script.

use std::io::{self, BufRead, BufReader, PipeReader};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use custlysis_core::config::MlBridgeConfig;
use custlysis_core::reports::TrainingOutcome;
use custlysis_core::{CustlysisError, CustlysisResult};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use crate::operation::ModelRequest;

/// Runs `<program> <script> --action <op> [--key value ...]`, one process per
/// call. At most `max_concurrent` processes run at once; further callers wait
/// for a slot. No retries.
pub struct ModelBridge {
    config: MlBridgeConfig,
    permits: Semaphore,
}

impl ModelBridge {
    pub fn new(config: &MlBridgeConfig) -> Self {
        info!(
            program = %config.program,
            script = %config.script,
            timeout_secs = config.timeout_secs,
            max_concurrent = config.max_concurrent,
            "Model bridge initialized"
        );
        Self {
            config: config.clone(),
            permits: Semaphore::new(config.max_concurrent.max(1)),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Build the command line without stdio wiring, so argument layout can be
    /// checked without spawning anything.
    pub fn build_command(&self, request: &ModelRequest) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.arg(&self.config.script).args(request.script_args());
        if let Some(ref dir) = self.config.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    pub async fn train(&self) -> TrainingOutcome {
        self.run(ModelRequest::train()).await
    }

    pub async fn predict(&self, customer_id: i64) -> TrainingOutcome {
        self.run(ModelRequest::predict(customer_id)).await
    }

    pub async fn list_segments(&self) -> TrainingOutcome {
        self.run(ModelRequest::list_segments()).await
    }

    /// Run one model operation to completion. Never fails: launch errors,
    /// read errors and timeouts come back as an unsuccessful outcome whose
    /// output is the error message followed by any output read so far.
    pub async fn run(&self, request: ModelRequest) -> TrainingOutcome {
        let action = request.operation.action();

        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(e) => return TrainingOutcome::aborted(e.to_string()),
        };

        info!(action, "Starting model operation");

        let (tx, mut lines) = mpsc::unbounded_channel();
        let outcome = match self.spawn(&request, tx) {
            Ok(mut child) => {
                let mut output = String::new();
                let waited = tokio::time::timeout(
                    self.timeout(),
                    collect(&mut child, &mut lines, &mut output),
                )
                .await;
                match waited {
                    Ok(Ok(status)) => match status.code() {
                        Some(code) => TrainingOutcome::exited(code, output),
                        // Terminated by a signal.
                        None => TrainingOutcome {
                            succeeded: false,
                            combined_output: output,
                            exit_code: None,
                        },
                    },
                    Ok(Err(e)) => {
                        kill_process_group(&mut child);
                        error!(action, error = %e, "Model output could not be read");
                        TrainingOutcome::aborted(with_partial_output(e.to_string(), &output))
                    }
                    Err(_) => {
                        kill_process_group(&mut child);
                        while let Ok(Ok(line)) = lines.try_recv() {
                            output.push_str(&line);
                            output.push('\n');
                        }
                        let e = CustlysisError::ModelTimeout(self.config.timeout_secs);
                        warn!(action, error = %e, "Model process killed");
                        TrainingOutcome::aborted(with_partial_output(e.to_string(), &output))
                    }
                }
            }
            Err(e) => {
                error!(action, error = %e, "Model process could not be run");
                TrainingOutcome::aborted(e.to_string())
            }
        };

        match outcome.exit_code {
            Some(0) => info!(action, "Model operation completed successfully"),
            Some(code) => error!(action, exit_code = code, "Model operation failed"),
            None => {}
        }

        metrics::counter!(
            "ml.operations",
            "action" => action,
            "result" => if outcome.succeeded { "success" } else { "failure" }
        )
        .increment(1);

        outcome
    }

    /// Start the script in its own process group, with stdout and stderr
    /// sharing one pipe so the output keeps its interleaving. A blocking task
    /// forwards each line to `lines` until every writer has closed the pipe.
    fn spawn(&self, request: &ModelRequest, lines: OutputSender) -> CustlysisResult<Child> {
        let (reader, writer) = std::io::pipe()?;

        let mut cmd = self.build_command(request);
        cmd.stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn().map_err(|e| CustlysisError::ModelLaunch {
            program: self.config.program.clone(),
            reason: e.to_string(),
        })?;
        // The command still owns copies of the write end; EOF needs them closed.
        drop(cmd);

        let action = request.operation.action();
        tokio::task::spawn_blocking(move || forward_lines(reader, action, lines));
        Ok(child)
    }
}

type OutputSender = mpsc::UnboundedSender<io::Result<String>>;

async fn collect(
    child: &mut Child,
    lines: &mut mpsc::UnboundedReceiver<io::Result<String>>,
    output: &mut String,
) -> io::Result<ExitStatus> {
    while let Some(line) = lines.recv().await {
        output.push_str(&line?);
        output.push('\n');
    }
    child.wait().await
}

fn forward_lines(reader: PipeReader, action: &'static str, lines: OutputSender) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                debug!(action, line, "model output");
                if lines.send(Ok(line.to_string())).is_err() {
                    break;
                }
            }
            Err(e) => {
                let _ = lines.send(Err(e));
                break;
            }
        }
    }
}

/// Kill the child and anything it started. The child leads its own process
/// group, so helpers it spawned go with it.
fn kill_process_group(child: &mut Child) {
    #[cfg(unix)]
    {
        if let Some(pid) = child.id() {
            // SAFETY: killpg only sends a signal to the group created at spawn.
            unsafe {
                libc::killpg(pid as libc::pid_t, libc::SIGKILL);
            }
        }
    }
    let _ = child.start_kill();
}

fn with_partial_output(message: String, output: &str) -> String {
    if output.is_empty() {
        message
    } else {
        format!("{message}\n{output}")
    }
}
