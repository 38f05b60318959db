//! CLI-based container runtime adapter.
//!
//! Shells out to `docker` or `podman` directly instead of talking to an API.
//! This keeps credential handling automatic (`~/.docker/config.json`) and
//! works against any Docker-compatible CLI (Colima, Rancher, Lima, Podman).

use crate::{
    BuildConfig, ContainerId, ContainerRuntime, ExecConfig, ExecResult, ImageId, MountSpec,
    Result, RunConfig, RuntimeError, RuntimeKind,
};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Container runtime adapter that drives the `docker` or `podman` CLI.
pub struct CliRuntime {
    cmd: String,
    kind: RuntimeKind,
}

impl CliRuntime {
    /// Connect to Docker, verifying the daemon responds.
    pub async fn new_docker() -> Result<Self> {
        let runtime = Self {
            cmd: "docker".to_string(),
            kind: RuntimeKind::Docker,
        };
        runtime.ping().await?;
        Ok(runtime)
    }

    /// Connect to Podman, verifying the daemon responds.
    pub async fn new_podman() -> Result<Self> {
        let runtime = Self {
            cmd: "podman".to_string(),
            kind: RuntimeKind::Podman,
        };
        runtime.ping().await?;
        Ok(runtime)
    }

    pub fn kind(&self) -> RuntimeKind {
        self.kind
    }

    async fn ping(&self) -> Result<()> {
        self.run_cmd(&["version", "--format", "{{.Server.Version}}"])
            .await
            .map(|_| ())
            .map_err(|e| RuntimeError::ConnectionError(e.to_string()))
    }

    async fn run_cmd(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.cmd)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| RuntimeError::RuntimeError(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RuntimeError::RuntimeError(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn selinux_mount_opt(&self) -> &'static str {
        if self.kind == RuntimeKind::Podman {
            ":Z"
        } else {
            ""
        }
    }
}

#[async_trait]
impl ContainerRuntime for CliRuntime {
    async fn build(&self, config: &BuildConfig) -> Result<ImageId> {
        let context = config.context.to_string_lossy().to_string();
        let dockerfile_path = if std::path::Path::new(&config.dockerfile).is_absolute() {
            std::path::PathBuf::from(&config.dockerfile)
        } else {
            config.context.join(&config.dockerfile)
        };
        let dockerfile = format!("-f={}", dockerfile_path.display());
        let tag = format!("-t={}", config.tag);

        let mut args = vec!["build".to_string(), dockerfile, tag];
        if config.no_cache {
            args.push("--no-cache".to_string());
        }
        for (k, v) in &config.build_args {
            args.push(format!("--build-arg={k}={v}"));
        }
        for (k, v) in &config.labels {
            args.push(format!("--label={k}={v}"));
        }
        args.push(context);

        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .run_cmd(&args_ref)
            .await
            .map_err(|e| RuntimeError::BuildError(e.to_string()))?;
        tracing::debug!(tag = %config.tag, "image build output: {output}");

        let id = self
            .run_cmd(&["inspect", "--format={{.Id}}", &config.tag])
            .await?;
        Ok(ImageId::new(id.trim()))
    }

    async fn run_detached(&self, config: &RunConfig) -> Result<ContainerId> {
        let mut args = vec!["run".to_string(), "-d".to_string()];

        if let Some(name) = &config.name {
            args.push(format!("--name={name}"));
        }
        if let Some(network) = &config.network {
            args.push(format!("--network={network}"));
        }
        for (k, v) in &config.env {
            args.push(format!("--env={k}={v}"));
        }
        let selinux_opt = self.selinux_mount_opt();
        for MountSpec {
            source,
            target,
            read_only,
        } in &config.mounts
        {
            let ro = if *read_only { ":ro" } else { "" };
            args.push(format!(
                "-v={}:{target}{selinux_opt}{ro}",
                source.display()
            ));
        }
        for (k, v) in &config.labels {
            args.push(format!("--label={k}={v}"));
        }
        args.push(config.image.clone());
        if let Some(cmd) = &config.cmd {
            args.extend(cmd.iter().cloned());
        }

        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.run_cmd(&args_ref).await?;
        Ok(ContainerId::new(output.trim()))
    }

    async fn exec(&self, id: &ContainerId, config: &ExecConfig) -> Result<ExecResult> {
        let mut args = vec!["exec".to_string(), id.0.clone()];
        args.extend(config.cmd.iter().cloned());
        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();

        let output = Command::new(&self.cmd)
            .args(&args_ref)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| RuntimeError::ExecError(e.to_string()))?;

        Ok(ExecResult {
            exit_code: output.status.code().unwrap_or(-1) as i64,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    async fn stop(&self, id: &ContainerId, timeout: Option<u32>) -> Result<()> {
        let timeout_str = timeout.unwrap_or(10).to_string();
        self.run_cmd(&["stop", "-t", &timeout_str, &id.0]).await?;
        Ok(())
    }

    async fn remove(&self, id: &ContainerId) -> Result<()> {
        // Best-effort: the caller treats a missing container as already removed.
        let _ = self.run_cmd(&["rm", "-f", &id.0]).await;
        Ok(())
    }

    async fn wait(&self, id: &ContainerId) -> Result<i64> {
        let out = self.run_cmd(&["wait", &id.0]).await?;
        out.trim()
            .parse::<i64>()
            .map_err(|e| RuntimeError::RuntimeError(format!("bad wait output: {e}")))
    }

    async fn logs(&self, id: &ContainerId) -> Result<String> {
        self.run_cmd(&["logs", &id.0]).await
    }

    async fn create_network(&self, name: &str) -> Result<()> {
        // docker returns a non-zero exit with "already exists" when re-created;
        // treat that as success since network creation must be idempotent.
        match self.run_cmd(&["network", "create", name]).await {
            Ok(_) => Ok(()),
            Err(RuntimeError::RuntimeError(msg)) if msg.contains("already") => Ok(()),
            Err(e) => Err(RuntimeError::NetworkError(e.to_string())),
        }
    }

    async fn remove_network(&self, name: &str) -> Result<()> {
        match self.run_cmd(&["network", "rm", name]).await {
            Ok(_) => Ok(()),
            Err(RuntimeError::RuntimeError(msg))
                if msg.contains("not found") || msg.contains("no such network") =>
            {
                Ok(())
            }
            Err(e) => Err(RuntimeError::NetworkError(e.to_string())),
        }
    }

    async fn connect_network(&self, name: &str, id: &ContainerId) -> Result<()> {
        self.run_cmd(&["network", "connect", name, &id.0]).await?;
        Ok(())
    }

    async fn disconnect_network(&self, name: &str, id: &ContainerId) -> Result<()> {
        self.run_cmd(&["network", "disconnect", name, &id.0])
            .await?;
        Ok(())
    }

    async fn container_ip(&self, network: &str, id: &ContainerId) -> Result<String> {
        let format = format!("{{{{(index .NetworkSettings.Networks \"{network}\").IPAddress}}}}");
        let ip = self.run_cmd(&["inspect", "--format", &format, &id.0]).await?;
        let ip = ip.trim().to_string();
        if ip.is_empty() {
            return Err(RuntimeError::NetworkError(format!(
                "container {id} has no address on network {network}"
            )));
        }
        Ok(ip)
    }
}

/// Build a [`CliRuntime`] for the named engine ("docker" or "podman").
pub async fn create_runtime(kind: RuntimeKind) -> Result<Box<dyn ContainerRuntime>> {
    match kind {
        RuntimeKind::Docker => Ok(Box::new(CliRuntime::new_docker().await?)),
        RuntimeKind::Podman => Ok(Box::new(CliRuntime::new_podman().await?)),
    }
}
