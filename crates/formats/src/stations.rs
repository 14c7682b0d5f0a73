//! Station records as returned by the radio directory's JSON API.

use foundation::math::GeoPoint;
use scene::stations::Station;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug)]
pub enum StationRecordError {
    Json(String),
    NotAnArray,
}

impl std::fmt::Display for StationRecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StationRecordError::Json(reason) => write!(f, "JSON parse error: {reason}"),
            StationRecordError::NotAnArray => write!(f, "expected an array of station records"),
        }
    }
}

impl std::error::Error for StationRecordError {}

/// One directory record. Unknown fields are ignored and missing ones default.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct StationRecord {
    pub stationuuid: String,
    pub name: String,
    pub url: String,
    pub url_resolved: String,
    pub homepage: String,
    pub favicon: String,
    pub tags: String,
    pub country: String,
    pub countrycode: String,
    pub state: String,
    pub language: String,
    pub votes: u64,
    pub codec: String,
    pub bitrate: u32,
    pub geo_lat: Option<f64>,
    pub geo_long: Option<f64>,
}

impl StationRecord {
    pub fn into_station(self) -> Station {
        let mut station = Station::new(self.stationuuid, self.name.trim())
            .with_stream_url(self.url_resolved)
            .with_location(GeoPoint::from_optional(self.geo_long, self.geo_lat));
        station.source_url = self.url;
        station.country = self.country;
        station.country_code = self.countrycode;
        station.state = self.state;
        station.language = self.language;
        station.tags = split_tags(&self.tags);
        station.homepage = self.homepage;
        station.codec = self.codec;
        station.bitrate_kbps = self.bitrate;
        station.votes = self.votes;
        station
    }
}

fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Decodes a JSON array of station records.
///
/// Records that fail to decode or have no `stationuuid` are skipped with a
/// warning; only a malformed payload is an error.
pub fn decode_stations(payload: &str) -> Result<Vec<Station>, StationRecordError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| StationRecordError::Json(e.to_string()))?;
    let Value::Array(items) = value else {
        return Err(StationRecordError::NotAnArray);
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<StationRecord>(item) {
            Ok(record) if record.stationuuid.is_empty() => {
                warn!(index, "skipping station record without stationuuid");
            }
            Ok(record) => out.push(record.into_station()),
            Err(err) => {
                warn!(index, %err, "skipping malformed station record");
            }
        }
    }
    Ok(out)
}
