use std::future::{ready, Future};
use std::path::PathBuf;

use glam::Vec3;
use log::debug;

use super::{AssetLoader, PointCloudAsset, SceneTarget};
use crate::error::MorphoError;

/// Loads whitespace-separated `x y z` point files.
///
/// URLs are resolved relative to `root`; a `file://` prefix is accepted.
/// Blank lines and lines starting with `#` are skipped, extra columns
/// (colour, intensity) are ignored.
#[derive(Debug, Clone, Default)]
pub struct PointFileLoader {
    root: PathBuf,
}

impl PointFileLoader {
    /// Loader resolving relative URLs against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Parse point-file text.
    ///
    /// # Errors
    ///
    /// Returns [`MorphoError::Load`] naming the first malformed line, or
    /// when the file holds no points.
    pub fn parse(text: &str) -> Result<Vec<Vec3>, MorphoError> {
        let mut points = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut coords = line
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(str::parse::<f32>);
            let mut next = || match coords.next() {
                Some(Ok(v)) if v.is_finite() => Ok(v),
                _ => Err(MorphoError::Load(format!(
                    "line {}: expected three finite coordinates",
                    line_no + 1
                ))),
            };
            points.push(Vec3::new(next()?, next()?, next()?));
        }
        if points.is_empty() {
            return Err(MorphoError::Load("point file holds no points".to_owned()));
        }
        Ok(points)
    }

    fn read(&self, url: &str) -> Result<Box<dyn SceneTarget>, MorphoError> {
        let path = self.root.join(url.strip_prefix("file://").unwrap_or(url));
        let text = std::fs::read_to_string(&path)
            .map_err(|e| MorphoError::Load(format!("{}: {e}", path.display())))?;
        let points = Self::parse(&text)?;
        debug!("loaded {} points from {}", points.len(), path.display());
        Ok(Box::new(PointCloudAsset::new(points)))
    }
}

impl AssetLoader for PointFileLoader {
    fn load(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Box<dyn SceneTarget>, MorphoError>> {
        ready(self.read(url))
    }
}

/// Synthesizes spherical point clouds from `sphere:<count>` URLs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereLoader {
    /// Sphere radius in world units.
    pub radius: f32,
}

impl Default for SphereLoader {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

impl SphereLoader {
    fn build(self, url: &str) -> Result<Box<dyn SceneTarget>, MorphoError> {
        let count = url
            .strip_prefix("sphere:")
            .and_then(|n| n.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .ok_or_else(|| MorphoError::Load(format!("not a sphere url: {url}")))?;
        Ok(Box::new(PointCloudAsset::fibonacci_sphere(
            count,
            Vec3::ZERO,
            self.radius,
        )))
    }
}

impl AssetLoader for SphereLoader {
    fn load(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<Box<dyn SceneTarget>, MorphoError>> {
        ready(self.build(url))
    }
}
