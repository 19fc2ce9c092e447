//! Native .mgl binary format for one grid layer, plus its .meta sidecar.
//!
//! Layer format:
//! - Header (16 bytes):
//!   - Magic: "MGL1" (4 bytes)
//!   - Version: u8 (1 byte)
//!   - Reserved: 3 bytes
//!   - Size X: u32 (4 bytes, little-endian)
//!   - Size Z: u32 (4 bytes, little-endian)
//! - Cell data: size_x * size_z bytes (0 or 1), x-major
//!
//! Sidecar format: one `Key=Value` pair per line
//! (`OriginX`, `OriginZ`, `GridSizeX`, `GridSizeZ`, `CellSize`, `Timestamp`).

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::core::WorldPoint;
use crate::error::{NavError, Result};

/// Magic bytes for .mgl format
const MAGIC: &[u8; 4] = b"MGL1";

/// Current format version
const VERSION: u8 = 1;

/// Header size in bytes
const HEADER_SIZE: usize = 16;

/// Geometry stored alongside a layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerMetadata {
    /// World coordinates of cell (0, 0)
    pub origin: WorldPoint,
    /// Grid size along X
    pub size_x: usize,
    /// Grid size along Z
    pub size_z: usize,
    /// World units per cell
    pub cell_size: f32,
    /// Seconds since the Unix epoch when the layer was written
    pub timestamp: u64,
}

impl LayerMetadata {
    /// Metadata stamped with the current time
    pub fn new(origin: WorldPoint, size_x: usize, size_z: usize, cell_size: f32) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            origin,
            size_x,
            size_z,
            cell_size,
            timestamp,
        }
    }

    /// Same dimensions and cell size (origin and timestamp may differ)
    pub fn is_compatible(&self, other: &LayerMetadata) -> bool {
        self.size_x == other.size_x
            && self.size_z == other.size_z
            && (self.cell_size - other.cell_size).abs() < 1e-6
    }

    /// Error describing why `found` cannot be loaded into `self`
    pub fn mismatch(&self, found: &LayerMetadata) -> NavError {
        NavError::DimensionMismatch {
            expected_x: self.size_x,
            expected_z: self.size_z,
            expected_cell_size: self.cell_size,
            found_x: found.size_x,
            found_z: found.size_z,
            found_cell_size: found.cell_size,
        }
    }

    /// Number of cells described
    pub fn cell_count(&self) -> usize {
        self.size_x * self.size_z
    }
}

/// Write a layer to a writer in .mgl format
pub fn write_layer<W: Write>(cells: &[bool], size_x: usize, size_z: usize, writer: &mut W) -> Result<()> {
    if cells.len() != size_x * size_z {
        return Err(NavError::InvalidFormat(format!(
            "layer has {} cells, expected {}x{}",
            cells.len(),
            size_x,
            size_z
        )));
    }

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(MAGIC);
    header[4] = VERSION;
    // Reserved bytes 5..8 stay zero
    header[8..12].copy_from_slice(&(size_x as u32).to_le_bytes());
    header[12..16].copy_from_slice(&(size_z as u32).to_le_bytes());
    writer.write_all(&header)?;

    let data: Vec<u8> = cells.iter().map(|&c| c as u8).collect();
    writer.write_all(&data)?;
    Ok(())
}

/// Read a layer from a reader in .mgl format.
///
/// Returns `(cells, size_x, size_z)`.
pub fn read_layer<R: Read>(reader: &mut R) -> Result<(Vec<bool>, usize, usize)> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    if &header[0..4] != MAGIC {
        return Err(NavError::InvalidFormat("Invalid magic bytes".to_string()));
    }

    let version = header[4];
    if version != VERSION {
        return Err(NavError::VersionMismatch {
            expected: VERSION,
            found: version,
        });
    }

    let size_x = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;
    let size_z = u32::from_le_bytes([header[12], header[13], header[14], header[15]]) as usize;

    // The header is untrusted: read only what is actually there
    let expected = size_x
        .checked_mul(size_z)
        .ok_or_else(|| NavError::InvalidFormat(format!("Layer size {}x{} overflows", size_x, size_z)))?;
    let mut data = Vec::new();
    reader.take(expected as u64).read_to_end(&mut data)?;
    if data.len() != expected {
        return Err(NavError::InvalidFormat(format!(
            "Layer {}x{} needs {} bytes, found {}",
            size_x,
            size_z,
            expected,
            data.len()
        )));
    }

    let cells = data.into_iter().map(|b| b != 0).collect();
    Ok((cells, size_x, size_z))
}

/// Save a layer to a .mgl file
pub fn save_layer(cells: &[bool], size_x: usize, size_z: usize, path: &Path) -> Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_layer(cells, size_x, size_z, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Load a layer from a .mgl file
pub fn load_layer(path: &Path) -> Result<(Vec<bool>, usize, usize)> {
    let mut file = BufReader::new(std::fs::File::open(path)?);
    read_layer(&mut file)
}

/// Write sidecar metadata as `Key=Value` lines
pub fn write_metadata<W: Write>(meta: &LayerMetadata, writer: &mut W) -> Result<()> {
    writeln!(writer, "OriginX={}", meta.origin.x)?;
    writeln!(writer, "OriginZ={}", meta.origin.z)?;
    writeln!(writer, "GridSizeX={}", meta.size_x)?;
    writeln!(writer, "GridSizeZ={}", meta.size_z)?;
    writeln!(writer, "CellSize={}", meta.cell_size)?;
    writeln!(writer, "Timestamp={}", meta.timestamp)?;
    Ok(())
}

/// Read sidecar metadata. Unknown keys and blank lines are ignored;
/// every known key is required.
pub fn read_metadata<R: Read>(reader: R) -> Result<LayerMetadata> {
    let mut origin_x = None;
    let mut origin_z = None;
    let mut size_x = None;
    let mut size_z = None;
    let mut cell_size = None;
    let mut timestamp = None;

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "OriginX" => origin_x = Some(parse_value::<f32>(key, value)?),
            "OriginZ" => origin_z = Some(parse_value::<f32>(key, value)?),
            "GridSizeX" => size_x = Some(parse_value::<usize>(key, value)?),
            "GridSizeZ" => size_z = Some(parse_value::<usize>(key, value)?),
            "CellSize" => cell_size = Some(parse_value::<f32>(key, value)?),
            "Timestamp" => timestamp = Some(parse_value::<u64>(key, value)?),
            _ => {}
        }
    }

    Ok(LayerMetadata {
        origin: WorldPoint::new(required("OriginX", origin_x)?, required("OriginZ", origin_z)?),
        size_x: required("GridSizeX", size_x)?,
        size_z: required("GridSizeZ", size_z)?,
        cell_size: required("CellSize", cell_size)?,
        timestamp: required("Timestamp", timestamp)?,
    })
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| NavError::InvalidFormat(format!("bad value for {}: {:?}", key.trim(), value)))
}

fn required<T>(key: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| NavError::InvalidFormat(format!("missing metadata key {}", key)))
}
