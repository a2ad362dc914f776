//! Settings file watcher.

use crate::config::{load_settings, ConfigError, Settings};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, Debouncer, FileIdMap};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Republishes settings whenever the backing file changes.
///
/// File system events are debounced, then the file is reloaded. A reload
/// that fails to parse or validate is logged and the previous settings stay
/// in effect.
pub struct SettingsWatcher {
    path: PathBuf,
    sender: watch::Sender<Settings>,
}

/// Keeps the file system watch alive. Dropping it stops reloading.
pub struct SettingsWatchGuard {
    _debouncer: Debouncer<RecommendedWatcher, FileIdMap>,
}

impl SettingsWatcher {
    /// Creates a watcher seeded with already loaded settings.
    ///
    /// Returns the watcher and the receiver to hand to the reconciler.
    pub fn new(path: &Path, initial: Settings) -> (Self, watch::Receiver<Settings>) {
        let (sender, receiver) = watch::channel(initial);
        let watcher = Self {
            path: path.to_path_buf(),
            sender,
        };
        (watcher, receiver)
    }

    /// Reloads the file, publishing the settings if they differ.
    ///
    /// Returns `true` if new settings were published.
    pub fn reload(&self) -> bool {
        match load_settings(&self.path) {
            Ok(settings) => {
                let changed = self.sender.send_if_modified(|current| {
                    if *current == settings {
                        false
                    } else {
                        *current = settings;
                        true
                    }
                });
                if changed {
                    info!(path = %self.path.display(), "Settings reloaded");
                } else {
                    debug!(path = %self.path.display(), "Settings file touched, no changes");
                }
                changed
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Ignoring invalid settings reload"
                );
                false
            }
        }
    }

    /// Starts watching the settings file.
    ///
    /// The file's directory is watched rather than the file itself, so
    /// editors that replace the file on save and a file created after
    /// startup are both picked up. Events arriving within `debounce` of each
    /// other cause a single reload. Must be called from within a tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WatchError`] if the directory can't be watched.
    pub fn spawn(self, debounce: Duration) -> Result<SettingsWatchGuard, ConfigError> {
        let directory = watched_directory(&self.path);
        let file_name = self.path.file_name().map(OsStr::to_os_string);
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    if events
                        .iter()
                        .any(|e| touches_file(&e.event, file_name.as_deref()))
                    {
                        let _ = events_tx.send(());
                    }
                }
                Err(errors) => {
                    for error in errors {
                        warn!(error = %error, "Settings watcher error");
                    }
                }
            }
        })
        .map_err(|e| watch_error(&self.path, e))?;

        debouncer
            .watcher()
            .watch(&directory, RecursiveMode::NonRecursive)
            .map_err(|e| watch_error(&self.path, e))?;
        info!(path = %self.path.display(), "Watching settings file for changes");

        tokio::spawn(async move {
            while events_rx.recv().await.is_some() {
                self.reload();
                if self.sender.is_closed() {
                    break;
                }
            }
            debug!(path = %self.path.display(), "Settings watcher stopped");
        });

        Ok(SettingsWatchGuard {
            _debouncer: debouncer,
        })
    }
}

fn watched_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn touches_file(event: &Event, file_name: Option<&OsStr>) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p.file_name() == file_name)
}

fn watch_error(path: &Path, source: notify::Error) -> ConfigError {
    ConfigError::WatchError {
        path: path.display().to_string(),
        source,
    }
}
