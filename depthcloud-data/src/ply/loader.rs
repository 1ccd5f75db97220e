//! PLY file loading functions

use crate::cloud::PointCloud;
use crate::ply::PlyError;
use crate::types::Point3D;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

// Rows are read as maps so files carrying extra vertex properties (colors,
// normals) still parse. Only x, y and z are kept.
#[derive(Deserialize, Debug)]
struct PlyFile {
    #[serde(rename = "vertex")]
    vertex: Vec<HashMap<String, JsonValue>>,
}

fn get_f32(
    row: &HashMap<String, JsonValue>,
    name: &'static str,
    index: usize,
) -> Result<f32, PlyError> {
    match row.get(name) {
        Some(JsonValue::Number(n)) => n
            .as_f64()
            .map(|f| f as f32)
            .ok_or(PlyError::MissingProperty { index, name }),
        _ => Err(PlyError::MissingProperty { index, name }),
    }
}

/// Load the vertex positions of a PLY file into a deduplicated cloud.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_points_from_ply<P: AsRef<Path>>(path: P) -> Result<PointCloud, PlyError> {
    debug!("Loading PLY points from: {}", path.as_ref().display());
    let file = File::open(path.as_ref())?;
    read_points(BufReader::new(file))
}

/// Read the vertex positions of a PLY document from any buffered reader.
pub fn read_points<R: BufRead>(reader: R) -> Result<PointCloud, PlyError> {
    let ply_data: PlyFile = serde_ply::from_reader(reader).map_err(|e| {
        warn!("Failed to parse PLY file: {}", e);
        PlyError::Parse(e.to_string())
    })?;

    let total = ply_data.vertex.len();
    let mut cloud = PointCloud::with_capacity(total);
    for (i, row) in ply_data.vertex.iter().enumerate() {
        cloud.insert(Point3D::new(
            get_f32(row, "x", i)?,
            get_f32(row, "y", i)?,
            get_f32(row, "z", i)?,
        ));
    }

    if cloud.len() < total {
        debug!("Collapsed {} duplicate vertices", total - cloud.len());
    }
    info!("PLY file parsed: {} vertices, {} unique points", total, cloud.len());
    Ok(cloud)
}
