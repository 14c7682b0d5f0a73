use std::collections::HashMap;
use std::fmt;

use foundation::math::GeoPoint;

/// Stable identifier of a radio station (the directory's station uuid).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A station record as seen by the globe.
///
/// Rendering reads only `id` and `location`; the rest is carried for
/// callers that list or describe stations.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub country: String,
    pub country_code: String,
    pub state: String,
    pub language: String,
    pub tags: Vec<String>,
    /// Resolved stream address, after the directory followed playlists and redirects.
    pub stream_url: String,
    /// Address as submitted to the directory. Not used for playback.
    pub source_url: String,
    pub homepage: String,
    pub codec: String,
    pub bitrate_kbps: u32,
    pub votes: u64,
    pub location: Option<GeoPoint>,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: StationId::new(id),
            name: name.into(),
            country: String::new(),
            country_code: String::new(),
            state: String::new(),
            language: String::new(),
            tags: Vec::new(),
            stream_url: String::new(),
            source_url: String::new(),
            homepage: String::new(),
            codec: String::new(),
            bitrate_kbps: 0,
            votes: 0,
            location: None,
        }
    }

    pub fn with_location(mut self, location: Option<GeoPoint>) -> Self {
        self.location = location;
        self
    }

    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = url.into();
        self
    }

    /// Whether the resolved stream can be embedded in a secure page and the
    /// station can be placed on the globe. `source_url` is not considered.
    pub fn is_playable(&self) -> bool {
        self.stream_url.starts_with("https") && self.location.is_some()
    }
}

/// Ordered set of stations, unique by id.
///
/// Ordering contract:
/// - Iteration yields stations in first-insertion order.
/// - Inserting an id that is already present keeps the existing record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationSet {
    stations: Vec<Station>,
    index: HashMap<StationId, usize>,
}

impl StationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges result batches (e.g. from fan-out queries) in order, dropping repeated ids.
    pub fn from_batches<I>(batches: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoIterator<Item = Station>,
    {
        let mut set = Self::new();
        for batch in batches {
            set.merge(batch);
        }
        set
    }

    /// Inserts `station` unless its id is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, station: Station) -> bool {
        if station.id.as_str().is_empty() || self.index.contains_key(&station.id) {
            return false;
        }
        self.index.insert(station.id.clone(), self.stations.len());
        self.stations.push(station);
        true
    }

    /// Returns the number of stations added.
    pub fn merge(&mut self, stations: impl IntoIterator<Item = Station>) -> usize {
        stations
            .into_iter()
            .map(|s| self.insert(s))
            .filter(|added| *added)
            .count()
    }

    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.index.get(id).map(|&i| &self.stations[i])
    }

    pub fn contains(&self, id: &StationId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> + '_ {
        self.stations.iter()
    }

    pub fn as_slice(&self) -> &[Station] {
        &self.stations
    }

    /// Stations with a known location, paired with it.
    pub fn located(&self) -> impl Iterator<Item = (&Station, GeoPoint)> + '_ {
        self.stations
            .iter()
            .filter_map(|s| s.location.map(|loc| (s, loc)))
    }

    /// Subset of stations for which [`Station::is_playable`] holds, order preserved.
    pub fn playable(&self) -> Self {
        let mut out = Self::new();
        out.merge(self.stations.iter().filter(|s| s.is_playable()).cloned());
        out
    }
}

impl FromIterator<Station> for StationSet {
    fn from_iter<T: IntoIterator<Item = Station>>(iter: T) -> Self {
        let mut set = Self::new();
        set.merge(iter);
        set
    }
}

impl<'a> IntoIterator for &'a StationSet {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}
