//! Layer persistence behind a store trait.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::error::{NavError, Result};

use super::layer_format::{LayerMetadata, read_layer, read_metadata, write_layer, write_metadata};

/// Which grid layer a store call addresses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Cells the agent has occupied
    Walkable,
    /// Cells vetoed after the agent got stuck
    Blacklisted,
}

/// A layer read back from a store
#[derive(Clone, Debug)]
pub struct LoadedLayer {
    /// Cells in x-major order
    pub cells: Vec<bool>,
    /// Geometry the layer was saved with
    pub metadata: LayerMetadata,
}

/// Persistence for the two grid layers.
///
/// `load` fails with [`NavError::DimensionMismatch`] when the stored
/// dimensions or cell size differ from `expected`.
pub trait GridStore: Send + Sync {
    /// Whether a stored copy of `layer` exists
    fn exists(&self, layer: LayerKind) -> bool;

    /// Load `layer`, checking it against the expected geometry
    fn load(&self, layer: LayerKind, expected: &LayerMetadata) -> Result<LoadedLayer>;

    /// Save `layer` with its geometry
    fn save(&self, layer: LayerKind, cells: &[bool], metadata: &LayerMetadata) -> Result<()>;
}

/// File-backed store: `<dir>/<stem>.mgl` plus `<dir>/<stem>.meta` per layer.
///
/// All I/O goes through one lock. Writes land in a temporary file that is
/// renamed into place. Sharing violations are retried.
pub struct FileGridStore {
    directory: PathBuf,
    walkable_stem: String,
    blacklist_stem: String,
    retry_attempts: u32,
    retry_delay: Duration,
    io_lock: Mutex<()>,
}

impl FileGridStore {
    /// Store under `directory` with default stems and retry policy
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            walkable_stem: "walkable".to_string(),
            blacklist_stem: "blacklist".to_string(),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(50),
            io_lock: Mutex::new(()),
        }
    }

    /// Override the file stems
    pub fn with_stems(mut self, walkable: impl Into<String>, blacklist: impl Into<String>) -> Self {
        self.walkable_stem = walkable.into();
        self.blacklist_stem = blacklist.into();
        self
    }

    /// Override the retry policy (at least one attempt is always made)
    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts.max(1);
        self.retry_delay = delay;
        self
    }

    /// Directory holding the layer files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of a layer's binary file
    pub fn layer_path(&self, layer: LayerKind) -> PathBuf {
        self.directory.join(format!("{}.mgl", self.stem(layer)))
    }

    /// Path of a layer's sidecar file
    pub fn metadata_path(&self, layer: LayerKind) -> PathBuf {
        self.directory.join(format!("{}.meta", self.stem(layer)))
    }

    fn stem(&self, layer: LayerKind) -> &str {
        match layer {
            LayerKind::Walkable => &self.walkable_stem,
            LayerKind::Blacklisted => &self.blacklist_stem,
        }
    }

    /// Run `op`, retrying while the file is held by someone else
    fn with_retry_on_lock<T>(&self, path: &Path, mut op: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op() {
                Err(NavError::Io(e)) if is_lock_error(&e) => {
                    if attempt >= self.retry_attempts {
                        warn!("[Store] {} still locked after {} attempts", path.display(), attempt);
                        return Err(NavError::Locked {
                            path: path.display().to_string(),
                            attempts: attempt,
                        });
                    }
                    debug!("[Store] {} locked ({}), retrying", path.display(), e);
                    thread::sleep(self.retry_delay);
                }
                other => return other,
            }
        }
    }
}

fn is_lock_error(e: &std::io::Error) -> bool {
    matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::WouldBlock)
}

/// Write through `<path>.tmp` and rename over `path`
fn write_atomically(path: &Path, write: impl FnOnce(&mut BufWriter<File>) -> Result<()>) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut writer = BufWriter::new(File::create(&tmp)?);
    write(&mut writer)?;
    writer.flush()?;
    drop(writer);
    std::fs::rename(&tmp, path)?;
    Ok(())
}

impl GridStore for FileGridStore {
    fn exists(&self, layer: LayerKind) -> bool {
        self.layer_path(layer).is_file() && self.metadata_path(layer).is_file()
    }

    fn load(&self, layer: LayerKind, expected: &LayerMetadata) -> Result<LoadedLayer> {
        let _guard = self.io_lock.lock();
        let meta_path = self.metadata_path(layer);
        let layer_path = self.layer_path(layer);

        let metadata = self.with_retry_on_lock(&meta_path, || {
            read_metadata(BufReader::new(File::open(&meta_path)?))
        })?;
        if !expected.is_compatible(&metadata) {
            return Err(expected.mismatch(&metadata));
        }

        let (cells, size_x, size_z) = self.with_retry_on_lock(&layer_path, || {
            read_layer(&mut BufReader::new(File::open(&layer_path)?))
        })?;
        if size_x != metadata.size_x || size_z != metadata.size_z {
            return Err(NavError::InvalidFormat(format!(
                "{} is {}x{} but its metadata says {}x{}",
                layer_path.display(),
                size_x,
                size_z,
                metadata.size_x,
                metadata.size_z
            )));
        }

        info!(
            "[Store] Loaded {:?} layer {}x{} from {}",
            layer,
            size_x,
            size_z,
            layer_path.display()
        );
        Ok(LoadedLayer { cells, metadata })
    }

    fn save(&self, layer: LayerKind, cells: &[bool], metadata: &LayerMetadata) -> Result<()> {
        let _guard = self.io_lock.lock();
        std::fs::create_dir_all(&self.directory)?;
        let meta_path = self.metadata_path(layer);
        let layer_path = self.layer_path(layer);

        self.with_retry_on_lock(&layer_path, || {
            write_atomically(&layer_path, |w| {
                write_layer(cells, metadata.size_x, metadata.size_z, w)
            })
        })?;
        self.with_retry_on_lock(&meta_path, || {
            write_atomically(&meta_path, |w| write_metadata(metadata, w))
        })?;

        debug!("[Store] Saved {:?} layer to {}", layer, layer_path.display());
        Ok(())
    }
}
