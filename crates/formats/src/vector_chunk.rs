use foundation::math::GeoPoint;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum VectorGeometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl VectorGeometry {
    /// Polygon rings of an areal geometry, outer ring first within each polygon.
    pub fn rings(&self) -> Vec<&[GeoPoint]> {
        match self {
            VectorGeometry::Polygon(rings) => rings.iter().map(Vec::as_slice).collect(),
            VectorGeometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::as_slice))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Open polylines of a linear geometry.
    pub fn lines(&self) -> Vec<&[GeoPoint]> {
        match self {
            VectorGeometry::LineString(points) => vec![points.as_slice()],
            VectorGeometry::MultiLineString(lines) => lines.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        match self {
            VectorGeometry::Point(_) => 1,
            VectorGeometry::MultiPoint(ps) | VectorGeometry::LineString(ps) => ps.len(),
            VectorGeometry::MultiLineString(ls) | VectorGeometry::Polygon(ls) => {
                ls.iter().map(Vec::len).sum()
            }
            VectorGeometry::MultiPolygon(polys) => {
                polys.iter().flatten().map(Vec::len).sum()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VectorFeature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    pub geometry: VectorGeometry,
}

impl VectorFeature {
    /// The `name` property, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(|v| v.as_str())
    }
}

/// A decoded set of geographic features, e.g. country boundaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VectorChunk {
    pub features: Vec<VectorFeature>,
}

#[derive(Debug)]
pub enum VectorChunkError {
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for VectorChunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VectorChunkError::Json(reason) => write!(f, "JSON parse error: {reason}"),
            VectorChunkError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            VectorChunkError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for VectorChunkError {}

impl VectorChunk {
    pub fn from_geojson_str(payload: &str) -> Result<Self, VectorChunkError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| VectorChunkError::Json(e.to_string()))?;
        Self::from_geojson_value(value)
    }

    /// Decodes a `FeatureCollection`. Features with a `null` geometry are skipped.
    pub fn from_geojson_value(value: Value) -> Result<Self, VectorChunkError> {
        let obj = value
            .as_object()
            .ok_or(VectorChunkError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(VectorChunkError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(VectorChunkError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(VectorChunkError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or(VectorChunkError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                VectorChunkError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(VectorChunkError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let geometry_val = match feat_obj.get("geometry") {
                None => {
                    return Err(VectorChunkError::InvalidFeature {
                        index,
                        reason: "feature missing geometry".to_string(),
                    });
                }
                Some(Value::Null) => continue,
                Some(v) => v,
            };
            let geometry = parse_geometry(geometry_val)
                .map_err(|reason| VectorChunkError::InvalidFeature { index, reason })?;

            features.push(VectorFeature {
                id: parse_id(feat_obj.get("id")),
                properties: parse_properties(feat_obj.get("properties")),
                geometry,
            });
        }

        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

pub(crate) fn parse_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn parse_properties(value: Option<&Value>) -> Map<String, Value> {
    value
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default()
}

fn parse_geometry(value: &Value) -> Result<VectorGeometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(VectorGeometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(VectorGeometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(VectorGeometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(VectorGeometry::MultiLineString(parse_nested(coords)?)),
        "Polygon" => Ok(VectorGeometry::Polygon(parse_nested(coords)?)),
        "MultiPolygon" => Ok(VectorGeometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

pub(crate) fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

pub(crate) fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_nested(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array of point arrays".to_string())?;
    arr.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_nested).collect()
}
