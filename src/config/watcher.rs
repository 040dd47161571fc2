//! Manifest file watcher for watch mode.
//!
//! Watches the manifest's directory rather than the file itself, so editors
//! that save by writing a temp file and renaming it over the manifest are
//! still seen. Events for other files in the directory are ignored, and a
//! reload is only sent when the file text actually changed.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::parse_manifest;
use crate::config::schema::Manifest;

/// Keeps the underlying `notify` watcher alive; dropping it stops reloads.
pub struct ManifestWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl ManifestWatcher {
    /// Start watching `path`. Every successfully parsed change arrives on
    /// the returned receiver; a change that fails to parse or validate is
    /// logged and dropped, so the consumer keeps its last good manifest.
    pub fn start(path: &Path) -> Result<(Self, mpsc::UnboundedReceiver<Manifest>), notify::Error> {
        let (tx, rx) = mpsc::unbounded_channel();

        let file_name: Option<OsString> = path.file_name().map(OsString::from);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        let target = path.to_path_buf();
        let mut last_text = fs::read_to_string(path).ok();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = ?e, "Watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                let ours = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(OsString::from) == file_name);
                if !ours {
                    return;
                }

                let text = match fs::read_to_string(&target) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(path = ?target, error = %e, "Manifest not readable yet");
                        return;
                    }
                };
                if last_text.as_deref() == Some(text.as_str()) {
                    return;
                }

                tracing::info!(path = ?target, "Manifest changed, reloading");
                match parse_manifest(&text) {
                    Ok(manifest) => {
                        last_text = Some(text);
                        let _ = tx.send(manifest);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to reload manifest, keeping current one");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(path = ?path, dir = ?dir, "Manifest watcher started");

        Ok((
            Self {
                path: path.to_path_buf(),
                _watcher: watcher,
            },
            rx,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
