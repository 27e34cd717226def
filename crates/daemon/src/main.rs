// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! skiffd - The skiff sync daemon.
//!
//! Hosts the sync process orchestrator for one state directory at
//! `~/.local/state/skiff/` and listens on a Unix socket for IPC from
//! `skiff` CLI processes.
//!
//! Usage:
//!   skiffd --state-dir <path>

use std::fs;
use std::io::Write;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

mod env;

use skiff_core::orchestrator::Orchestrator;
use skiff_core::{Phase, RuntimeStateFile};
use skiff_ipc::{framing, DaemonRequest, DaemonResponse, DaemonStatus};

/// Socket filename within the state directory.
const SOCKET_NAME: &str = "daemon.sock";
/// PID filename within the state directory.
const PID_NAME: &str = "daemon.pid";
/// Lock filename for single instance guarantee.
const LOCK_NAME: &str = "daemon.lock";
/// How long shutdown waits for the sync process to drain.
const SHUTDOWN_WAIT: Duration = Duration::from_secs(60);

fn main() {
    // Parse args
    let args: Vec<String> = std::env::args().collect();
    let state_dir = parse_state_dir(&args);

    if let Err(e) = fs::create_dir_all(&state_dir) {
        eprintln!("cannot create state dir {}: {}", state_dir.display(), e);
        std::process::exit(1);
    }

    // Set up logging
    let log_path = state_dir.join("daemon.log");
    setup_logging(&log_path);

    tracing::info!("skiffd starting, state_dir={}", state_dir.display());

    // Acquire file lock for single instance
    let lock_path = state_dir.join(LOCK_NAME);
    let lock_file = match acquire_lock(&lock_path) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("failed to acquire lock: {}", e);
            std::process::exit(1);
        }
    };

    // Write PID file
    let pid_path = state_dir.join(PID_NAME);
    if let Err(e) = write_pid_file(&pid_path) {
        tracing::error!("failed to write PID file: {}", e);
        std::process::exit(1);
    }

    // Load configuration and bring up the orchestrator
    let config = match skiff_core::config::load(&state_dir) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("failed to load config: {}", e);
            cleanup(&pid_path, &state_dir.join(SOCKET_NAME));
            std::process::exit(1);
        }
    };
    let collab = match skiff_engine::build_collaborators(&state_dir, &config) {
        Ok(collab) => collab,
        Err(e) => {
            tracing::error!("failed to build collaborators: {}", e);
            cleanup(&pid_path, &state_dir.join(SOCKET_NAME));
            std::process::exit(1);
        }
    };
    let orchestrator = Orchestrator::new(config, RuntimeStateFile::new(&state_dir), collab);

    // Bind Unix socket
    let socket_path = state_dir.join(SOCKET_NAME);
    // Remove stale socket if it exists
    let _ = fs::remove_file(&socket_path);

    let listener = match UnixListener::bind(&socket_path) {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind socket: {}", e);
            cleanup(&pid_path, &socket_path);
            std::process::exit(1);
        }
    };

    tracing::info!("listening on {}", socket_path.display());

    // The CLI waits for this line before polling the socket
    println!("READY");
    let _ = std::io::stdout().flush();

    let start_time = Instant::now();

    // Accept connections
    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
                let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

                match framing::read_message(&mut stream) {
                    Ok(request) => {
                        let response = handle_request(&orchestrator, request, &start_time);
                        let should_shutdown = matches!(response, DaemonResponse::ShuttingDown);
                        let _ = framing::write_message(&mut stream, &response);
                        if should_shutdown {
                            tracing::info!("shutting down");
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("failed to read request: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("failed to accept connection: {}", e);
            }
        }
    }

    stop_sync(&orchestrator);

    // Cleanup
    cleanup(&pid_path, &socket_path);
    drop(lock_file);
    tracing::info!("skiffd stopped");
}

fn handle_request(
    orchestrator: &Orchestrator,
    request: DaemonRequest,
    start_time: &Instant,
) -> DaemonResponse {
    match request {
        DaemonRequest::Ping => DaemonResponse::Pong,
        DaemonRequest::Hello { version: _ } => DaemonResponse::Hello {
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        DaemonRequest::Status => {
            let stats = orchestrator.stats();
            DaemonResponse::Status(DaemonStatus {
                pid: std::process::id(),
                uptime_secs: start_time.elapsed().as_secs(),
                phase: orchestrator.phase().into(),
                started_at: stats.started_at,
                queued: stats.queued,
                failed: stats.failed,
                last_error: orchestrator.error().map(Into::into),
            })
        }
        DaemonRequest::Start => {
            orchestrator.start();
            DaemonResponse::Ack
        }
        DaemonRequest::Stop => {
            orchestrator.stop();
            DaemonResponse::Ack
        }
        DaemonRequest::Pause => {
            orchestrator.pause();
            DaemonResponse::Ack
        }
        DaemonRequest::Resume => {
            orchestrator.resume();
            DaemonResponse::Ack
        }
        DaemonRequest::Restart => {
            orchestrator.restart();
            DaemonResponse::Ack
        }
        DaemonRequest::ClearError => {
            orchestrator.clear_error();
            DaemonResponse::Ack
        }
        DaemonRequest::Shutdown => DaemonResponse::ShuttingDown,
    }
}

/// Stop the sync process and wait, bounded, for it to drain.
fn stop_sync(orchestrator: &Orchestrator) {
    let deadline = Instant::now() + SHUTDOWN_WAIT;
    while Instant::now() < deadline {
        if matches!(orchestrator.phase(), Phase::Stopped | Phase::Error) {
            return;
        }
        // Repeated: a start in flight has to reach Running before a stop
        // request is accepted.
        orchestrator.stop();
        std::thread::sleep(Duration::from_millis(100));
    }
    tracing::warn!(
        "sync process still {} at shutdown deadline",
        orchestrator.phase()
    );
}

fn parse_state_dir(args: &[String]) -> PathBuf {
    for i in 0..args.len() {
        if args[i] == "--state-dir" {
            if let Some(dir) = args.get(i + 1) {
                return PathBuf::from(dir);
            }
        }
    }
    // Default to XDG state directory
    if let Some(dir) = env::state_dir() {
        return dir;
    }
    if let Some(dir) = env::xdg_state_home() {
        return dir.join("skiff");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/skiff"))
        .unwrap_or_else(|| PathBuf::from(".local/state/skiff"))
}

fn setup_logging(log_path: &Path) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Try to open log file, fall back to stderr
    if let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn acquire_lock(lock_path: &Path) -> std::io::Result<fs::File> {
    use fs2::FileExt;

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(lock_path)?;
    FileExt::try_lock_exclusive(&file)
        .map_err(|_| std::io::Error::other("another daemon instance is already running"))?;
    Ok(file)
}

fn write_pid_file(pid_path: &Path) -> std::io::Result<()> {
    fs::write(pid_path, format!("{}", std::process::id()))
}

fn cleanup(pid_path: &Path, socket_path: &Path) {
    let _ = fs::remove_file(pid_path);
    let _ = fs::remove_file(socket_path);
}
