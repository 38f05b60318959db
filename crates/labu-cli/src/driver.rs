//! The run driver: builds images, starts the control plane, launches one
//! simulator container end to end, then tears everything down.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use labu_config::{load_client_definitions, RunConfig};
use labu_core::{Controller, ControllerConfig};
use labu_runtime::cli::create_runtime;
use labu_runtime::{BuildConfig, MountSpec, RuntimeKind};
use rand::Rng;

use crate::error::DriverError;

const SIMULATORS_DIR: &str = "simulators";
const CLIENTS_DIR: &str = "clients";
const CONTEXT_OVERRIDE_FILE: &str = "labu_context.txt";

/// Runs one invocation end to end, returning the process exit code.
pub async fn run(config: RunConfig) -> Result<i32, DriverError> {
    let random_seed = if config.random_seed != 0 {
        config.random_seed
    } else {
        rand::thread_rng().gen::<i64>()
    };

    let network_name = format!("labu-net-{:08x}", rand::thread_rng().gen::<u32>());

    let node_runtime = create_runtime(RuntimeKind::Docker).await?;
    let driver_runtime = create_runtime(RuntimeKind::Docker).await?;

    let clients_root = PathBuf::from(CLIENTS_DIR);
    let client_defs = load_client_definitions(&clients_root)?;

    let controller = Arc::new(Controller::new(
        node_runtime,
        ControllerConfig {
            clients: client_defs,
            run_clients: config.clients.clone(),
            image_overrides: config.image_overrides.clone(),
            workspace: config.workspace.clone(),
            default_network: network_name.clone(),
        },
    ));

    controller.create_network(&network_name).await?;

    let server = labu_server::spawn(controller.clone()).await?;
    let simulator_url = format!("http://{}", server.addr);
    tracing::info!(%simulator_url, "control plane listening");

    let outcome = run_simulator(
        &config,
        &controller,
        driver_runtime.as_ref(),
        &network_name,
        &simulator_url,
        random_seed,
    )
    .await;

    if let Err(e) = controller.remove_network(&network_name).await {
        tracing::warn!(error = %e, "failed to remove overlay network during teardown");
    }
    server.shutdown().await;

    outcome
}

async fn run_simulator(
    config: &RunConfig,
    controller: &Arc<Controller>,
    driver_runtime: &dyn labu_runtime::ContainerRuntime,
    network_name: &str,
    simulator_url: &str,
    random_seed: i64,
) -> Result<i32, DriverError> {
    let sim_dir = PathBuf::from(SIMULATORS_DIR).join(&config.sim_name);
    let sim_tag = match &config.sim_image_override {
        Some(tag) => tag.clone(),
        None => {
            let tag = format!("labu-sim-{}", config.sim_name);
            let build_config = resolve_sim_build(&sim_dir, &tag)?;
            driver_runtime.build(&build_config).await?;
            tag
        }
    };

    let mut built_any_client = false;
    for client in &config.clients {
        if config.image_overrides.contains_key(client) {
            built_any_client = true;
            continue;
        }
        let build_dir = PathBuf::from(CLIENTS_DIR).join(client);
        let tag = format!("labu-client-{client}");
        let build_config = BuildConfig {
            context: build_dir,
            dockerfile: "Dockerfile".to_string(),
            tag,
            ..Default::default()
        };
        match driver_runtime.build(&build_config).await {
            Ok(_) => built_any_client = true,
            Err(e) => tracing::warn!(client = %client, error = %e, "best-effort client image build failed"),
        }
    }
    if !built_any_client {
        return Err(DriverError::NoClientImages);
    }

    let mut env = HashMap::new();
    env.insert("LABU_SIMULATOR".to_string(), simulator_url.to_string());
    if let Some(filter) = &config.test_filter {
        env.insert("LABU_TEST_PATTERN".to_string(), filter.as_str().to_string());
    }
    env.insert("LABU_PARALLELISM".to_string(), config.parallelism.to_string());
    env.insert("LABU_RANDOM_SEED".to_string(), random_seed.to_string());
    env.insert("LABU_LOGLEVEL".to_string(), config.log_level.to_string());
    env.insert("LABU_CLIENTS".to_string(), config.clients.join(","));

    let mut mounts = Vec::new();
    if let Some(vectors_dir) = &config.vectors_dir {
        mounts.push(MountSpec {
            source: vectors_dir.clone(),
            target: "/vectors".to_string(),
            read_only: true,
        });
        env.insert("LABU_VECTOR_DIR".to_string(), "/vectors".to_string());
    }

    let sim_container = driver_runtime
        .run_detached(&labu_runtime::RunConfig {
            image: sim_tag,
            network: Some(network_name.to_string()),
            env,
            mounts,
            ..Default::default()
        })
        .await?;

    let exit_code = driver_runtime.wait(&sim_container).await?;
    let logs = driver_runtime
        .logs(&sim_container)
        .await
        .unwrap_or_else(|e| format!("<failed to capture logs: {e}>"));

    let log_filename = format!("simulator-{}.log", sim_container.short());
    let logs_dir = config.workspace.join("logs");
    std::fs::create_dir_all(&logs_dir)?;
    std::fs::write(logs_dir.join(&log_filename), logs)?;
    controller.set_sim_log(&format!("logs/{log_filename}"));
    controller.set_client_versions(&config.clients);

    if let Err(e) = labu_server::flush_results(controller) {
        tracing::warn!(error = %e, "failed to flush results after simulator exit");
    }

    if let Err(e) = driver_runtime.remove(&sim_container).await {
        tracing::warn!(error = %e, "failed to remove simulator container");
    }

    Ok(if exit_code != 0 { 1 } else { 0 })
}

/// Honors `<simDir>/labu_context.txt`: a file containing a relative path
/// that redirects the build context while keeping the Dockerfile at its
/// original location.
fn resolve_sim_build(sim_dir: &Path, tag: &str) -> Result<BuildConfig, DriverError> {
    let override_file = sim_dir.join(CONTEXT_OVERRIDE_FILE);
    let dockerfile_path = sim_dir.join("Dockerfile");

    if override_file.exists() {
        let redirect = std::fs::read_to_string(&override_file)?;
        let context = sim_dir.join(redirect.trim());
        let dockerfile_abs =
            std::fs::canonicalize(&dockerfile_path).unwrap_or(dockerfile_path);
        Ok(BuildConfig {
            context,
            dockerfile: dockerfile_abs.to_string_lossy().to_string(),
            tag: tag.to_string(),
            ..Default::default()
        })
    } else {
        Ok(BuildConfig {
            context: sim_dir.to_path_buf(),
            dockerfile: "Dockerfile".to_string(),
            tag: tag.to_string(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_uses_sim_dir_as_context() {
        let dir = tempfile::tempdir().unwrap();
        let sim_dir = dir.path().join("sims").join("my-sim");
        std::fs::create_dir_all(&sim_dir).unwrap();
        std::fs::write(sim_dir.join("Dockerfile"), "FROM scratch").unwrap();

        let build = resolve_sim_build(&sim_dir, "labu-sim-my-sim").unwrap();
        assert_eq!(build.context, sim_dir);
        assert_eq!(build.dockerfile, "Dockerfile");
    }

    #[test]
    fn context_override_keeps_dockerfile_at_its_own_path() {
        let dir = tempfile::tempdir().unwrap();
        let sim_dir = dir.path().join("sims").join("my-sim");
        let shared_dir = dir.path().join("sims").join("shared-context");
        std::fs::create_dir_all(&sim_dir).unwrap();
        std::fs::create_dir_all(&shared_dir).unwrap();
        std::fs::write(sim_dir.join("Dockerfile"), "FROM scratch").unwrap();
        std::fs::write(sim_dir.join("labu_context.txt"), "../shared-context").unwrap();

        let build = resolve_sim_build(&sim_dir, "labu-sim-my-sim").unwrap();
        assert_eq!(build.context, shared_dir);
        assert!(build.dockerfile.ends_with("Dockerfile"));
        assert!(Path::new(&build.dockerfile).is_absolute());
    }
}
