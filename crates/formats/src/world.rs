//! Country boundary payloads: TopoJSON topologies or GeoJSON collections.

use serde_json::Value;
use tracing::debug;

use crate::topojson::{Topology, TopologyError};
use crate::vector_chunk::{VectorChunk, VectorChunkError};

/// Object looked up first when decoding a world topology.
pub const COUNTRIES_OBJECT: &str = "countries";

#[derive(Debug)]
pub enum WorldError {
    Json(String),
    UnknownPayload(String),
    EmptyTopology,
    Topology(TopologyError),
    GeoJson(VectorChunkError),
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::Json(reason) => write!(f, "JSON parse error: {reason}"),
            WorldError::UnknownPayload(ty) => write!(f, "unsupported boundary payload type: {ty}"),
            WorldError::EmptyTopology => write!(f, "topology has no objects"),
            WorldError::Topology(err) => write!(f, "{err}"),
            WorldError::GeoJson(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for WorldError {}

impl From<TopologyError> for WorldError {
    fn from(err: TopologyError) -> Self {
        WorldError::Topology(err)
    }
}

impl From<VectorChunkError> for WorldError {
    fn from(err: VectorChunkError) -> Self {
        WorldError::GeoJson(err)
    }
}

/// Decodes boundaries from either format, detected by the top-level `type`.
///
/// For topologies the `countries` object is used when present, otherwise the
/// first object by name.
pub fn decode_world(payload: &str) -> Result<VectorChunk, WorldError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| WorldError::Json(e.to_string()))?;
    let ty = value
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    match ty.as_str() {
        "Topology" => {
            let topology = Topology::from_topojson_str(payload)?;
            let object = if topology.object_names().any(|n| n == COUNTRIES_OBJECT) {
                COUNTRIES_OBJECT.to_string()
            } else {
                topology
                    .object_names()
                    .next()
                    .ok_or(WorldError::EmptyTopology)?
                    .to_string()
            };
            let chunk = topology.feature(&object)?;
            debug!(object, features = chunk.len(), "decoded world topology");
            Ok(chunk)
        }
        "FeatureCollection" => {
            let chunk = VectorChunk::from_geojson_value(value)?;
            debug!(features = chunk.len(), "decoded world feature collection");
            Ok(chunk)
        }
        _ => Err(WorldError::UnknownPayload(ty)),
    }
}
