//! ASCII PLY export

use crate::cloud::PointCloud;
use crate::ply::PlyError;
use std::io::{BufWriter, Write};
use tracing::debug;

/// File name handed to the persistence layer alongside exported bytes.
pub const SUGGESTED_FILE_NAME: &str = "pointcloud.ply";

/// Serializes a point cloud snapshot as an ASCII PLY vertex list.
///
/// Points are written in the cloud's iteration order, one `x y z` line each.
/// Coordinates use the shortest decimal form that parses back to the same
/// `f32`, so reading the document reproduces the set exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlyExporter;

impl PlyExporter {
    /// Encode `cloud` into a new byte buffer.
    pub fn write(cloud: &PointCloud) -> Result<Vec<u8>, PlyError> {
        // Header is ~100 bytes, a typical coordinate line ~30.
        let mut out = Vec::with_capacity(128 + cloud.len() * 32);
        Self::write_to(cloud, &mut out)?;
        Ok(out)
    }

    /// Encode `cloud` into `writer`.
    ///
    /// Fails with [`PlyError::EmptyCloud`] when the cloud has no points and with
    /// [`PlyError::NonFinitePoint`] when any coordinate is NaN or infinite.
    /// Either way the writer is left untouched.
    pub fn write_to<W: Write>(cloud: &PointCloud, writer: W) -> Result<(), PlyError> {
        if cloud.is_empty() {
            return Err(PlyError::EmptyCloud);
        }
        if let Some(p) = cloud.iter().find(|p| !p.is_finite()) {
            return Err(PlyError::NonFinitePoint {
                x: p.x,
                y: p.y,
                z: p.z,
            });
        }

        let mut w = BufWriter::new(writer);
        writeln!(w, "ply")?;
        writeln!(w, "format ascii 1.0")?;
        writeln!(w, "element vertex {}", cloud.len())?;
        writeln!(w, "property float x")?;
        writeln!(w, "property float y")?;
        writeln!(w, "property float z")?;
        writeln!(w, "end_header")?;
        for p in cloud {
            writeln!(w, "{} {} {}", p.x, p.y, p.z)?;
        }
        w.flush()?;

        debug!("Encoded {} points as ASCII PLY", cloud.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point3D;

    fn parse_body(text: &str) -> Vec<Point3D> {
        let (_, body) = text.split_once("end_header\n").unwrap();
        body.lines()
            .map(|line| {
                let v: Vec<f32> = line
                    .split_whitespace()
                    .map(|s| s.parse().unwrap())
                    .collect();
                assert_eq!(v.len(), 3);
                Point3D::new(v[0], v[1], v[2])
            })
            .collect()
    }

    #[test]
    fn test_empty_cloud_rejected() {
        let mut out = Vec::new();
        let err = PlyExporter::write_to(&PointCloud::new(), &mut out).unwrap_err();
        assert!(matches!(err, PlyError::EmptyCloud));
        assert!(out.is_empty());
        assert!(matches!(
            PlyExporter::write(&PointCloud::new()),
            Err(PlyError::EmptyCloud)
        ));
    }

    #[test]
    fn test_non_finite_point_rejected() {
        let cloud: PointCloud = [
            Point3D::new(-1.0, -1.0, 1.0),
            Point3D::new(f32::NAN, f32::NAN, f32::INFINITY),
        ]
        .into_iter()
        .collect();
        let mut out = Vec::new();
        let err = PlyExporter::write_to(&cloud, &mut out).unwrap_err();
        assert!(matches!(err, PlyError::NonFinitePoint { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_header_layout() {
        let cloud: PointCloud = [Point3D::new(1.0, 2.0, 3.0)].into_iter().collect();
        let text = String::from_utf8(PlyExporter::write(&cloud).unwrap()).unwrap();
        assert_eq!(
            text,
            "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\n\
             property float y\nproperty float z\nend_header\n1 2 3\n"
        );
    }

    #[test]
    fn test_round_trip_two_points() {
        let cloud: PointCloud = [Point3D::new(1.0, 2.0, 3.0), Point3D::new(4.0, 5.0, 6.0)]
            .into_iter()
            .collect();
        let text = String::from_utf8(PlyExporter::write(&cloud).unwrap()).unwrap();

        assert!(text.contains("element vertex 2\n"));
        let lines: Vec<&str> = text.split_once("end_header\n").unwrap().1.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.contains(&"1 2 3"));
        assert!(lines.contains(&"4 5 6"));

        let parsed: PointCloud = parse_body(&text).into_iter().collect();
        assert_eq!(parsed, cloud);
    }

    #[test]
    fn test_round_trip_is_bit_exact() {
        let cloud: PointCloud = [
            Point3D::new(0.1, -0.2, 1.0e-7),
            Point3D::new(123456.79, -3.4028235e38, 1.1754944e-38),
            Point3D::new(-0.999_999_9, 0.333_333_34, 7.5),
        ]
        .into_iter()
        .collect();
        let text = String::from_utf8(PlyExporter::write(&cloud).unwrap()).unwrap();
        let parsed = parse_body(&text);
        assert_eq!(parsed.len(), 3);
        for p in &parsed {
            assert!(cloud.contains(p));
        }
    }

    #[test]
    fn test_same_snapshot_same_bytes() {
        let cloud: PointCloud = (0..100)
            .map(|i| Point3D::new(i as f32, (i * 2) as f32, 0.5))
            .collect();
        assert_eq!(
            PlyExporter::write(&cloud).unwrap(),
            PlyExporter::write(&cloud).unwrap()
        );
    }
}
