//! Worker-thread execution of load/save with poll-based completion.
//!
//! Hosts hand requests to [`MapTasks`] and call the poll methods once per
//! frame; the blocking file I/O (and any blocking prompt the loader raises)
//! happens off the caller's thread.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;

use tracing::{error, warn};

use crate::dialog::MapPrompts;

use super::load::load_map;
use super::messages::{LoadMapRequest, SaveMapRequest};
use super::results::{LoadResult, SaveResult};
use super::save::export_configuration;

/// Tracks async map I/O operations, for modal UI.
#[derive(Debug, Default)]
pub struct AsyncMapOperation {
    /// Whether a save operation is in progress
    pub is_saving: bool,
    /// Whether a load operation is in progress
    pub is_loading: bool,
    /// Description of the current operation
    pub operation_description: Option<String>,
}

impl AsyncMapOperation {
    pub fn is_busy(&self) -> bool {
        self.is_saving || self.is_loading
    }
}

/// Tracks the currently loaded map file path.
#[derive(Debug, Default)]
pub struct CurrentMapFile {
    pub path: Option<PathBuf>,
}

/// Runs load and save operations on worker threads.
///
/// One operation at a time: a request made while another is in flight is
/// refused with a warning. Completions are delivered exactly once through
/// [`MapTasks::poll_load`] / [`MapTasks::poll_save`].
pub struct MapTasks {
    prompts: Arc<dyn MapPrompts>,
    pub operation: AsyncMapOperation,
    pub current_file: CurrentMapFile,
    load_rx: Option<Receiver<LoadResult>>,
    save_rx: Option<Receiver<SaveResult>>,
}

impl MapTasks {
    pub fn new(prompts: Arc<dyn MapPrompts>) -> Self {
        Self {
            prompts,
            operation: AsyncMapOperation::default(),
            current_file: CurrentMapFile::default(),
            load_rx: None,
            save_rx: None,
        }
    }

    /// Starts an async load operation.
    pub fn request_load(&mut self, request: LoadMapRequest) {
        if self.operation.is_busy() {
            warn!("Load operation already in progress");
            return;
        }

        let map_name = request
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("map")
            .to_string();
        self.operation.is_loading = true;
        self.operation.operation_description = Some(format!("Loading {}...", map_name));

        let (tx, rx) = channel();
        let prompts = Arc::clone(&self.prompts);
        thread::spawn(move || {
            let path = request.path;
            let result = match load_map(&path, prompts.as_ref()) {
                Ok(Some(loaded)) => LoadResult {
                    path,
                    loaded: Some(loaded),
                    cancelled: false,
                    error: None,
                },
                Ok(None) => LoadResult {
                    path,
                    loaded: None,
                    cancelled: true,
                    error: None,
                },
                Err(error) => LoadResult {
                    path,
                    loaded: None,
                    cancelled: false,
                    error: Some(error),
                },
            };
            let _ = tx.send(result);
        });
        self.load_rx = Some(rx);
    }

    /// Polls the in-flight load; returns `Some` exactly once, on completion.
    pub fn poll_load(&mut self) -> Option<LoadResult> {
        let rx = self.load_rx.take()?;
        match rx.try_recv() {
            Ok(result) => {
                self.operation.is_loading = false;
                self.operation.operation_description = None;
                if let Some(error) = &result.error {
                    error!("{}", error);
                } else if !result.cancelled {
                    self.current_file.path = Some(result.path.clone());
                }
                Some(result)
            }
            Err(TryRecvError::Empty) => {
                self.load_rx = Some(rx);
                None
            }
            Err(TryRecvError::Disconnected) => {
                self.operation.is_loading = false;
                self.operation.operation_description = None;
                error!("Load worker disappeared without a result");
                None
            }
        }
    }

    /// Starts an async save operation.
    pub fn request_save(&mut self, request: SaveMapRequest) {
        if self.operation.is_busy() {
            warn!("Save operation already in progress");
            return;
        }

        let map_name = request
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("map")
            .to_string();
        self.operation.is_saving = true;
        self.operation.operation_description = Some(format!("Saving {}...", map_name));

        let (tx, rx) = channel();
        thread::spawn(move || {
            let SaveMapRequest {
                path,
                configuration,
            } = request;
            let error = export_configuration(&configuration, &path).err();
            let _ = tx.send(SaveResult { path, error });
        });
        self.save_rx = Some(rx);
    }

    /// Polls the in-flight save; returns `Some` exactly once, on completion.
    pub fn poll_save(&mut self) -> Option<SaveResult> {
        let rx = self.save_rx.take()?;
        match rx.try_recv() {
            Ok(result) => {
                self.operation.is_saving = false;
                self.operation.operation_description = None;
                if let Some(error) = &result.error {
                    error!("{}", error);
                } else {
                    self.current_file.path = Some(result.path.clone());
                }
                Some(result)
            }
            Err(TryRecvError::Empty) => {
                self.save_rx = Some(rx);
                None
            }
            Err(TryRecvError::Disconnected) => {
                self.operation.is_saving = false;
                self.operation.operation_description = None;
                error!("Save worker disappeared without a result");
                None
            }
        }
    }
}
