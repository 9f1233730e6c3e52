use async_trait::async_trait;
use proscenium_api::{BundleEngine, BundleMode, CompileRequest};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs an external bundler executable per compile request.
///
/// The command line is `program [args..] <entry> [--root name=dir..]
/// [--bundle|--unbundle]`, with the request env applied on top of the
/// inherited environment. Standard output is the compiled artifact; on a
/// non-zero exit, standard error is the diagnostic.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command(&self, request: &CompileRequest) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        match &request.location {
            Some(location) => cmd.arg(location),
            None => cmd.arg(request.entry.canonical()),
        };
        for root in &request.roots {
            cmd.arg("--root")
                .arg(format!("{}={}", root.name, root.dir.display()));
        }
        match request.bundle {
            BundleMode::Bundle => {
                cmd.arg("--bundle");
            }
            BundleMode::Unbundle => {
                cmd.arg("--unbundle");
            }
            BundleMode::Default => {}
        }

        cmd.envs(&request.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl BundleEngine for CommandEngine {
    async fn compile(&self, request: CompileRequest) -> Result<Vec<u8>, String> {
        debug!(program = %self.program.display(), entry = %request.entry, "spawning bundler");
        let output = self
            .command(&request)
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {e}", self.program.display()))?;

        if output.status.success() {
            return Ok(output.stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.is_empty() {
            Err(format!("{} exited with {}", self.program.display(), output.status))
        } else {
            Err(stderr)
        }
    }

    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("command")
    }
}
