use anyhow::{Context, Result};
use colored::Colorize;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

/// Editors often save in several steps; events closer together than this are one save.
const DEBOUNCE: Duration = Duration::from_millis(200);
const SETTLE: Duration = Duration::from_millis(50);
const POLL: Duration = Duration::from_secs(1);

/// Run `job`, printing its error instead of returning it. True on success.
fn run_reported(job: &mut impl FnMut() -> Result<()>) -> bool {
    match job() {
        Ok(()) => true,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            false
        }
    }
}

/// Whether `event` writes to the file at canonical path `target`.
fn writes_to(event: &Event, target: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.canonicalize().is_ok_and(|p| p == target))
}

/// Run `job` once, then again every time `file` is saved. Ctrl+C exits.
///
/// Errors from `job` are reported and the watch keeps going.
pub fn watch_and_rerun(file: &str, mut job: impl FnMut() -> Result<()>) -> Result<()> {
    let target = std::fs::canonicalize(file)
        .with_context(|| format!("Cannot resolve path '{}'", file))?;
    let dir = target
        .parent()
        .with_context(|| format!("Cannot determine parent directory of '{}'", file))?;

    run_reported(&mut job);

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;

    eprintln!("{} {} for changes (Ctrl+C to stop)", "Watching".cyan().bold(), file);

    let mut last_success = Instant::now();
    loop {
        let event = match rx.recv_timeout(POLL) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };
        if !writes_to(&event, &target) || last_success.elapsed() <= DEBOUNCE {
            continue;
        }

        std::thread::sleep(SETTLE);
        log::debug!("{} changed, rerunning", file);
        if run_reported(&mut job) {
            last_success = Instant::now();
        }
    }

    Ok(())
}
