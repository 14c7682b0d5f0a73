use std::fs;
use std::path::PathBuf;

use clap::Parser;
use foundation::math::{GeoPoint, Vec2};
use foundation::time::Time;
use formats::stations::decode_stations;
use formats::world::decode_world;
use render::{Globe, to_svg};
use runtime::{FrameClock, Stamped};
use scene::config::GlobeConfig;
use scene::controller::GlobeEvent;
use scene::interaction::PointerEvent;
use scene::stations::{StationId, StationSet};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Upper bound on simulated frames, well past any transition or debounce.
const MAX_FRAMES: u64 = 10_000;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render the radio station globe to SVG")]
struct Args {
    /// Station record files (JSON arrays); merged in order, first id wins.
    #[arg(long, env = "RADIO_GLOBE_STATIONS", value_delimiter = ',')]
    stations: Vec<PathBuf>,

    /// Country boundaries as TopoJSON or a GeoJSON FeatureCollection.
    #[arg(long, env = "RADIO_GLOBE_WORLD")]
    world: Option<PathBuf>,

    #[arg(long, env = "RADIO_GLOBE_WIDTH", default_value_t = 960.0)]
    width: f64,

    #[arg(long, env = "RADIO_GLOBE_HEIGHT", default_value_t = 720.0)]
    height: f64,

    /// Keep only stations with an https stream and coordinates.
    #[arg(long, env = "RADIO_GLOBE_PLAYABLE_ONLY")]
    playable_only: bool,

    /// Pointer drag to simulate before selecting, as `DX,DY` pixels. Repeatable;
    /// the environment form separates drags with `;`.
    #[arg(
        long = "drag",
        env = "RADIO_GLOBE_DRAGS",
        value_parser = parse_drag,
        value_delimiter = ';',
        allow_hyphen_values = true
    )]
    drags: Vec<(f64, f64)>,

    /// Station id to select after dragging.
    #[arg(long, env = "RADIO_GLOBE_SELECT")]
    select: Option<String>,

    #[arg(long, env = "RADIO_GLOBE_OUT", default_value = "globe.svg")]
    out: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), String> {
    let mut stations = load_stations(&args.stations)?;
    if args.playable_only {
        stations = stations.playable();
    }
    info!(stations = stations.len(), "stations loaded");

    let mut globe = Globe::new(GlobeConfig::default(), args.width, args.height);
    globe.set_stations(stations);
    if let Some(path) = &args.world {
        let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
        let world = decode_world(&payload).map_err(|e| format!("decode {path:?}: {e}"))?;
        let vertices: usize = world.features.iter().map(|f| f.geometry.vertex_count()).sum();
        info!(features = world.len(), vertices, "boundaries loaded");
        globe.set_boundaries(world);
    }
    globe.on_location_changed(|center: GeoPoint| {
        info!(lat = center.lat_deg, lon = center.lon_deg, "location changed");
    });

    let mut clock = FrameClock::display_refresh(Time::ZERO);
    simulate_drag(&mut globe, &mut clock, &args.drags);

    if let Some(id) = &args.select {
        let id = StationId::new(id.as_str());
        if !globe.stations().contains(&id) {
            warn!(station = %id, "selected station is not loaded");
        }
        globe.set_active_station(Some(id), clock.current().time);
    }

    while globe.needs_frame() {
        let frame = clock.tick();
        if frame.index > MAX_FRAMES {
            return Err("animation did not settle".to_string());
        }
        log_events(globe.sample_frame(frame.time));
    }

    let list = globe.render();
    fs::write(&args.out, to_svg(&list)).map_err(|e| format!("write {:?}: {e}", args.out))?;
    info!(
        commands = list.len(),
        markers = list.markers().count(),
        countries = list.country_count(),
        out = ?args.out,
        "frame written"
    );
    println!("{}", globe.center_label());
    Ok(())
}

fn load_stations(paths: &[PathBuf]) -> Result<StationSet, String> {
    let mut batches = Vec::with_capacity(paths.len());
    for path in paths {
        let payload = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
        let batch = decode_stations(&payload).map_err(|e| format!("decode {path:?}: {e}"))?;
        info!(path = ?path, records = batch.len(), "station batch decoded");
        batches.push(batch);
    }
    Ok(StationSet::from_batches(batches))
}

/// Drags from the viewport center, one move per frame.
fn simulate_drag(globe: &mut Globe, clock: &mut FrameClock, drags: &[(f64, f64)]) {
    if drags.is_empty() {
        return;
    }
    let viewport = globe.viewport();
    let mut pos = Vec2::new(viewport.width / 2.0, viewport.height / 2.0);
    globe.pointer(PointerEvent::Down(pos), clock.current().time);
    for &(dx, dy) in drags {
        let frame = clock.tick();
        pos = pos + Vec2::new(dx, dy);
        globe.pointer(PointerEvent::Move(pos), frame.time);
        log_events(globe.sample_frame(frame.time));
    }
    globe.pointer(PointerEvent::Up, clock.current().time);
}

fn log_events(events: Vec<Stamped<GlobeEvent>>) {
    for stamped in events {
        info!(t_ms = stamped.time.as_millis(), event = ?stamped.event, "globe event");
    }
}

fn parse_drag(s: &str) -> Result<(f64, f64), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got {s:?}"))?;
    let dx: f64 = dx.trim().parse().map_err(|e| format!("bad DX {dx:?}: {e}"))?;
    let dy: f64 = dy.trim().parse().map_err(|e| format!("bad DY {dy:?}: {e}"))?;
    Ok((dx, dy))
}
