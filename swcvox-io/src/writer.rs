//! File writers for rendered output.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use swcvox_core::{TracingPath, VoxelCalibration};
use swcvox_render::{Scene, SkeletonVolume};

/// Sidecar metadata for a raw skeleton volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkeletonHeader {
    pub width: u64,
    pub height: u64,
    pub depth: u64,
    /// Sample type of the raw data.
    pub dtype: String,
    /// Axis order, fastest first.
    pub order: String,
    pub calibration: Option<VoxelCalibration>,
    /// Name of the raw data file, relative to the header.
    pub data_file: String,
}

impl SkeletonHeader {
    /// Builds the header for a skeleton stored in `data_file`.
    #[must_use]
    pub fn for_volume(skeleton: &SkeletonVolume, data_file: &str) -> Self {
        Self {
            width: skeleton.volume.width,
            height: skeleton.volume.height,
            depth: skeleton.volume.depth,
            dtype: "u8".to_string(),
            order: "xyz".to_string(),
            calibration: skeleton.calibration.clone(),
            data_file: data_file.to_string(),
        }
    }
}

/// Writer for rendered output.
///
/// Writes scenes, skeleton volumes and point tables to a single file.
pub struct DataFileWriter {
    writer: BufWriter<File>,
}

impl DataFileWriter {
    /// Creates a new file writer.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self { writer })
    }

    /// Writes a scene as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn write_scene_json(&mut self, scene: &Scene) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, scene)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes skeleton voxels as raw bytes, x fastest, then y, then z.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_skeleton_raw(&mut self, skeleton: &SkeletonVolume) -> Result<()> {
        self.writer.write_all(&skeleton.data)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes every path point as CSV.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn write_points_csv(&mut self, paths: &[TracingPath]) -> Result<()> {
        writeln!(self.writer, "path,parent,type,x,y,z")?;

        for path in paths {
            let parent = path.parent.map(|p| p.to_string()).unwrap_or_default();
            for p in &path.points {
                writeln!(
                    self.writer,
                    "{},{},{},{},{},{}",
                    path.id,
                    parent,
                    p.swc_type.code(),
                    p.x,
                    p.y,
                    p.z
                )?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Flushes the writer.
    ///
    /// # Errors
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes the JSON header next to a raw skeleton file.
///
/// The header is named after the full raw file name with `.json` appended
/// (`neuron.raw` gets `neuron.raw.json`), so it never replaces the data.
///
/// # Errors
/// Returns an error if `raw_path` has no file name or the header cannot be
/// written.
pub fn write_skeleton_header(raw_path: &Path, skeleton: &SkeletonVolume) -> Result<PathBuf> {
    let file_name = raw_path.file_name().ok_or_else(|| {
        Error::InvalidFormat(format!("{} has no file name", raw_path.display()))
    })?;
    let mut header_name = file_name.to_os_string();
    header_name.push(".json");
    let header_path = raw_path.with_file_name(header_name);

    let data_file = file_name.to_string_lossy().into_owned();
    let header = SkeletonHeader::for_volume(skeleton, &data_file);

    let mut writer = BufWriter::new(File::create(&header_path)?);
    serde_json::to_writer_pretty(&mut writer, &header)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(header_path)
}
