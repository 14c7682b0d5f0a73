//! TopoJSON topology decoding.
//!
//! Supports quantized (delta-encoded, with `transform`) and unquantized
//! topologies. Geometry objects are converted to [`VectorChunk`] features so
//! callers see the same types as for GeoJSON input.

use std::collections::BTreeMap;

use foundation::math::GeoPoint;
use serde::Deserialize;
use serde_json::Value;

use crate::vector_chunk::{
    VectorChunk, VectorFeature, VectorGeometry, parse_id, parse_point, parse_points,
    parse_properties,
};

#[derive(Debug)]
pub enum TopologyError {
    Json(String),
    NotATopology,
    MissingObject(String),
    ArcOutOfRange(i64),
    InvalidGeometry { object: String, reason: String },
}

impl std::fmt::Display for TopologyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopologyError::Json(reason) => write!(f, "JSON parse error: {reason}"),
            TopologyError::NotATopology => write!(f, "expected TopoJSON Topology"),
            TopologyError::MissingObject(name) => write!(f, "topology has no object {name:?}"),
            TopologyError::ArcOutOfRange(i) => write!(f, "arc index {i} out of range"),
            TopologyError::InvalidGeometry { object, reason } => {
                write!(f, "invalid geometry in {object:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for TopologyError {}

#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct QuantizeTransform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl QuantizeTransform {
    fn apply(&self, x: f64, y: f64) -> [f64; 2] {
        [
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        ]
    }
}

#[derive(Debug, Deserialize)]
struct RawTopology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<QuantizeTransform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, Value>,
}

/// A decoded topology: arcs in absolute coordinates plus its named objects.
#[derive(Debug, Clone)]
pub struct Topology {
    transform: Option<QuantizeTransform>,
    arcs: Vec<Vec<[f64; 2]>>,
    objects: BTreeMap<String, Value>,
}

impl Topology {
    pub fn from_topojson_str(payload: &str) -> Result<Self, TopologyError> {
        let raw: RawTopology =
            serde_json::from_str(payload).map_err(|e| TopologyError::Json(e.to_string()))?;
        if raw.kind != "Topology" {
            return Err(TopologyError::NotATopology);
        }

        let arcs = raw
            .arcs
            .iter()
            .enumerate()
            .map(|(index, arc)| decode_arc(index, arc, raw.transform.as_ref()))
            .collect::<Result<_, _>>()?;

        Ok(Self {
            transform: raw.transform,
            arcs,
            objects: raw.objects,
        })
    }

    pub fn is_quantized(&self) -> bool {
        self.transform.is_some()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.objects.keys().map(String::as_str)
    }

    /// Converts the named object into features.
    ///
    /// A `GeometryCollection` yields one feature per member; any other
    /// geometry yields a single feature. Members with a `null` type are skipped.
    pub fn feature(&self, name: &str) -> Result<VectorChunk, TopologyError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))?;

        let mut features = Vec::new();
        let members: Vec<&Value> = match object.get("type").and_then(|t| t.as_str()) {
            Some("GeometryCollection") => object
                .get("geometries")
                .and_then(|g| g.as_array())
                .map(|g| g.iter().collect())
                .unwrap_or_default(),
            _ => vec![object],
        };

        for member in members {
            if let Some(geometry) = self.geometry(name, member)? {
                features.push(VectorFeature {
                    id: parse_id(member.get("id")),
                    properties: parse_properties(member.get("properties")),
                    geometry,
                });
            }
        }

        Ok(VectorChunk { features })
    }

    fn geometry(&self, object: &str, value: &Value) -> Result<Option<VectorGeometry>, TopologyError> {
        let invalid = |reason: String| TopologyError::InvalidGeometry {
            object: object.to_string(),
            reason,
        };

        let ty = match value.get("type") {
            None | Some(Value::Null) => return Ok(None),
            Some(t) => t
                .as_str()
                .ok_or_else(|| invalid("geometry type must be a string".to_string()))?,
        };

        let geometry = match ty {
            "Point" => VectorGeometry::Point(
                self.position(coordinates(value).map_err(invalid)?)
                    .map_err(invalid)?,
            ),
            "MultiPoint" => VectorGeometry::MultiPoint(
                parse_points(coordinates(value).map_err(invalid)?)
                    .map_err(invalid)?
                    .into_iter()
                    .map(|p| self.transform_point(p))
                    .collect(),
            ),
            "LineString" => {
                VectorGeometry::LineString(self.line(&arc_indices(value).map_err(invalid)?)?)
            }
            "MultiLineString" => VectorGeometry::MultiLineString(
                nested_indices(arcs_value(value).map_err(invalid)?)
                    .map_err(invalid)?
                    .iter()
                    .map(|arcs| self.line(arcs))
                    .collect::<Result<Vec<_>, TopologyError>>()?,
            ),
            "Polygon" => VectorGeometry::Polygon(
                self.polygon(&nested_indices(arcs_value(value).map_err(invalid)?).map_err(invalid)?)?,
            ),
            "MultiPolygon" => {
                let polys = arcs_value(value)
                    .map_err(invalid)?
                    .as_array()
                    .ok_or_else(|| invalid("MultiPolygon arcs must be an array".to_string()))?;
                let mut out = Vec::with_capacity(polys.len());
                for poly in polys {
                    out.push(self.polygon(&nested_indices(poly).map_err(invalid)?)?);
                }
                VectorGeometry::MultiPolygon(out)
            }
            "GeometryCollection" => {
                return Err(invalid("nested GeometryCollection is not supported".to_string()));
            }
            other => return Err(invalid(format!("unsupported geometry type: {other}"))),
        };
        Ok(Some(geometry))
    }

    fn position(&self, coords: &Value) -> Result<GeoPoint, String> {
        parse_point(coords).map(|p| self.transform_point(p))
    }

    /// Point and MultiPoint positions are quantized but not delta-encoded.
    fn transform_point(&self, p: GeoPoint) -> GeoPoint {
        match &self.transform {
            Some(t) => {
                let [x, y] = t.apply(p.lon_deg, p.lat_deg);
                GeoPoint::new(x, y)
            }
            None => p,
        }
    }

    /// Concatenates arcs; shared endpoints between consecutive arcs appear once.
    fn line(&self, arcs: &[i64]) -> Result<Vec<GeoPoint>, TopologyError> {
        let mut points: Vec<GeoPoint> = Vec::new();
        for &index in arcs {
            let (arc_index, reversed) = if index < 0 {
                ((!index) as usize, true)
            } else {
                (index as usize, false)
            };
            let arc = self
                .arcs
                .get(arc_index)
                .ok_or(TopologyError::ArcOutOfRange(index))?;

            points.pop();
            let start = points.len();
            points.extend(arc.iter().map(|&[x, y]| GeoPoint::new(x, y)));
            if reversed {
                points[start..].reverse();
            }
        }
        Ok(points)
    }

    fn ring(&self, arcs: &[i64]) -> Result<Vec<GeoPoint>, TopologyError> {
        let mut points = self.line(arcs)?;
        if let Some(&first) = points.first() {
            while points.len() < 4 {
                points.push(first);
            }
        }
        Ok(points)
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Vec<Vec<GeoPoint>>, TopologyError> {
        rings.iter().map(|arcs| self.ring(arcs)).collect()
    }
}

/// Decodes one arc to absolute positions. A short position is an error, since
/// skipping it would shift every later delta of a quantized arc.
fn decode_arc(
    index: usize,
    arc: &[Vec<f64>],
    transform: Option<&QuantizeTransform>,
) -> Result<Vec<[f64; 2]>, TopologyError> {
    let mut out = Vec::with_capacity(arc.len());
    let (mut x, mut y) = (0.0, 0.0);
    for (i, position) in arc.iter().enumerate() {
        let (px, py) = match position.as_slice() {
            [px, py, ..] => (*px, *py),
            _ => {
                return Err(TopologyError::InvalidGeometry {
                    object: format!("arc {index}"),
                    reason: format!("position {i} has fewer than two coordinates"),
                });
            }
        };
        match transform {
            Some(t) => {
                x += px;
                y += py;
                out.push(t.apply(x, y));
            }
            None => out.push([px, py]),
        }
    }
    Ok(out)
}

fn coordinates(value: &Value) -> Result<&Value, String> {
    value
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())
}

fn arcs_value(value: &Value) -> Result<&Value, String> {
    value.get("arcs").ok_or("geometry missing arcs".to_string())
}

fn arc_indices(value: &Value) -> Result<Vec<i64>, String> {
    indices(arcs_value(value)?)
}

fn indices(value: &Value) -> Result<Vec<i64>, String> {
    value
        .as_array()
        .ok_or("arcs must be an array of indices".to_string())?
        .iter()
        .map(|v| v.as_i64().ok_or("arc index must be an integer".to_string()))
        .collect()
}

fn nested_indices(value: &Value) -> Result<Vec<Vec<i64>>, String> {
    value
        .as_array()
        .ok_or("arcs must be an array of index arrays".to_string())?
        .iter()
        .map(indices)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{Topology, TopologyError};
    use crate::vector_chunk::VectorGeometry;
    use foundation::math::GeoPoint;
    use pretty_assertions::assert_eq;

    // Two squares sharing the edge x = 1, quantized with scale 1 / translate (-10, -10)
    // so decoded coordinates are (q - 10).
    const TOPOLOGY: &str = r#"{
        "type": "Topology",
        "transform": { "scale": [1, 1], "translate": [-10, -10] },
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    { "type": "Polygon", "id": "001", "properties": {"name": "West"}, "arcs": [[0, 1]] },
                    { "type": "Polygon", "id": 2, "properties": {"name": "East"}, "arcs": [[2, -1]] },
                    { "type": null, "id": "003" }
                ]
            }
        },
        "arcs": [
            [[11, 10], [0, 1]],
            [[11, 11], [-1, 0], [0, -1], [1, 0]],
            [[11, 10], [1, 0], [0, 1], [-1, 0]]
        ]
    }"#;

    fn p(x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(x, y)
    }

    #[test]
    fn decodes_delta_encoded_arcs_into_rings() {
        let topo = Topology::from_topojson_str(TOPOLOGY).expect("topology");
        assert!(topo.is_quantized());
        assert_eq!(topo.arc_count(), 3);

        let chunk = topo.feature("countries").expect("countries");
        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk.features[0].id.as_deref(), Some("001"));
        assert_eq!(chunk.features[1].name(), Some("East"));

        let VectorGeometry::Polygon(west) = &chunk.features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            west[0],
            vec![p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0), p(1.0, 0.0)]
        );

        let VectorGeometry::Polygon(east) = &chunk.features[1].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(
            east[0],
            vec![p(1.0, 0.0), p(2.0, 0.0), p(2.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)]
        );
    }

    #[test]
    fn missing_object_and_bad_arcs_are_errors() {
        let topo = Topology::from_topojson_str(TOPOLOGY).expect("topology");
        assert!(matches!(
            topo.feature("land"),
            Err(TopologyError::MissingObject(_))
        ));

        let bad = r#"{"type":"Topology","arcs":[],"objects":{"x":{"type":"LineString","arcs":[5]}}}"#;
        let topo = Topology::from_topojson_str(bad).expect("topology");
        assert!(matches!(topo.feature("x"), Err(TopologyError::ArcOutOfRange(5))));
    }

    #[test]
    fn short_arc_position_is_an_error() {
        let bad = r#"{
            "type": "Topology",
            "transform": { "scale": [1, 1], "translate": [0, 0] },
            "objects": {},
            "arcs": [[[0, 0], [1, 1]], [[5, 5], [1], [0, 1]]]
        }"#;
        let err = Topology::from_topojson_str(bad).unwrap_err();
        assert!(matches!(
            err,
            TopologyError::InvalidGeometry { ref object, .. } if object == "arc 1"
        ));
    }

    #[test]
    fn rejects_geojson() {
        let err = Topology::from_topojson_str(r#"{"type":"FeatureCollection","features":[]}"#).unwrap_err();
        assert!(matches!(err, TopologyError::NotATopology));
    }
}
