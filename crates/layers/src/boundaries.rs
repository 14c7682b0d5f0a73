use formats::vector_chunk::{VectorChunk, VectorFeature, VectorGeometry};
use scene::projection::GeoProjection;

use crate::clip::{ProjectedPath, clip_line, clip_ring};

/// One feature's clipped outline.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePath {
    pub id: Option<String>,
    pub path: ProjectedPath,
}

/// Country (or any feature) outlines clipped to the visible hemisphere.
///
/// Features with nothing visible are omitted. Point features carry no
/// outline and are skipped.
#[derive(Debug, Default, Copy, Clone)]
pub struct BoundaryLayer;

impl BoundaryLayer {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, projection: &GeoProjection, chunk: &VectorChunk) -> Vec<FeaturePath> {
        chunk
            .features
            .iter()
            .filter_map(|feature| feature_path(projection, feature))
            .collect()
    }
}

fn feature_path(projection: &GeoProjection, feature: &VectorFeature) -> Option<FeaturePath> {
    let mut path = ProjectedPath::default();
    match &feature.geometry {
        VectorGeometry::Polygon(_) | VectorGeometry::MultiPolygon(_) => {
            for ring in feature.geometry.rings() {
                if let Some(clipped) = clip_ring(projection, ring) {
                    path.push_ring(clipped);
                }
            }
        }
        VectorGeometry::LineString(_) | VectorGeometry::MultiLineString(_) => {
            for line in feature.geometry.lines() {
                path.push_lines(clip_line(projection, line));
            }
        }
        VectorGeometry::Point(_) | VectorGeometry::MultiPoint(_) => return None,
    }
    (!path.is_empty()).then(|| FeaturePath {
        id: feature.id.clone(),
        path,
    })
}
