//! Container runtime discovery for database tests.
//!
//! testcontainers talks to the Docker API; when Docker itself is absent we
//! point `DOCKER_HOST` at a Podman socket.

use anyhow::{bail, Result};
use std::env;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

const SOCKET_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Ensures a container runtime socket is reachable for testcontainers.
///
/// # Errors
/// Returns an error when no Docker or Podman socket accepts connections.
pub fn ensure_container_runtime() -> Result<()> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();
    match INIT.get_or_init(init_container_runtime) {
        Ok(()) => Ok(()),
        Err(message) => bail!("{message}"),
    }
}

fn init_container_runtime() -> Result<(), String> {
    if let Ok(docker_host) = env::var("DOCKER_HOST") {
        return validate_docker_host(&docker_host);
    }

    if wait_for_socket(Path::new("/var/run/docker.sock"), SOCKET_WAIT_TIMEOUT) {
        return Ok(());
    }

    if let Some(path) = find_podman_socket() {
        if wait_for_socket(&path, SOCKET_WAIT_TIMEOUT) {
            env::set_var("DOCKER_HOST", format!("unix://{}", path.display()));
            return Ok(());
        }
        return Err(format!(
            "Podman socket found at `{}`, but it is not accepting connections. Start `podman.socket` or run `podman system service`.",
            path.display()
        ));
    }

    Err(
        "No container runtime socket found or reachable. Start the Docker daemon, start `podman.socket`, or set `DOCKER_HOST`."
            .to_string(),
    )
}

fn validate_docker_host(docker_host: &str) -> Result<(), String> {
    let path = docker_host.strip_prefix("unix://").unwrap_or(docker_host);
    if !path.starts_with('/') {
        // Not a unix socket; testcontainers reaches TCP hosts itself.
        return Ok(());
    }

    if wait_for_socket(Path::new(path), SOCKET_WAIT_TIMEOUT) {
        return Ok(());
    }

    Err(format!(
        "`DOCKER_HOST` points to `{docker_host}`, but the socket is not accepting connections."
    ))
}

fn find_podman_socket() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(runtime_dir) = env::var("XDG_RUNTIME_DIR") {
        candidates.push(PathBuf::from(runtime_dir).join("podman/podman.sock"));
    }
    candidates.push(PathBuf::from("/var/run/podman/podman.sock"));
    candidates.push(PathBuf::from("/run/podman/podman.sock"));

    candidates.into_iter().find(|path| path.exists())
}

fn wait_for_socket(path: &Path, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if path.exists() && UnixStream::connect(path).is_ok() {
            return true;
        }
        thread::sleep(Duration::from_millis(200));
    }
    false
}
