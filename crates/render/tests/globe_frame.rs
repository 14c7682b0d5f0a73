use std::cell::RefCell;
use std::rc::Rc;

use foundation::math::{GeoPoint, RotationState, Vec2};
use foundation::time::Time;
use formats::stations::decode_stations;
use formats::vector_chunk::VectorChunk;
use layers::symbology::GlobeStyle;
use render::{DrawCommand, Globe, GlobeRenderer, Viewport, to_svg};
use runtime::FrameClock;
use scene::config::GlobeConfig;
use scene::controller::GlobeEvent;
use scene::interaction::PointerEvent;
use scene::projection::is_visible;
use scene::stations::{Station, StationId, StationSet};

fn assert_close(a: f64, b: f64, eps: f64) {
    let diff = (a - b).abs();
    assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
}

fn grid_stations() -> StationSet {
    let mut stations = Vec::new();
    for lon in (-180..180).step_by(30) {
        for lat in (-80..=80).step_by(20) {
            stations.push(
                Station::new(format!("{lon}:{lat}"), "grid")
                    .with_location(Some(GeoPoint::new(lon as f64, lat as f64))),
            );
        }
    }
    stations.into_iter().collect()
}

#[test]
fn markers_match_visibility_for_any_rotation() {
    let stations = grid_stations();
    let renderer = GlobeRenderer::new();
    let rotations = [
        RotationState::default(),
        RotationState::new(45.0, 30.0, 0.0),
        RotationState::new(-139.69, -35.68, 0.0),
        RotationState::new(200.0, -90.0, 15.0),
        RotationState::new(-720.0, 89.0, -30.0),
    ];

    for rotation in rotations {
        let list = renderer.render(
            &VectorChunk::default(),
            rotation,
            &stations,
            None,
            Viewport::new(640.0, 480.0),
            &GlobeStyle::default(),
        );
        for station in stations.iter() {
            let location = station.location.expect("grid stations are located");
            assert_eq!(
                list.marker(&station.id).is_some(),
                is_visible(location, &rotation),
                "station {} under {:?}",
                station.id,
                rotation.as_array()
            );
        }
    }
}

#[test]
fn selecting_tokyo_centers_it() {
    let tokyo = Station::new("tokyo", "Tokyo").with_location(Some(GeoPoint::new(139.69, 35.68)));
    let mut globe = Globe::new(GlobeConfig::default(), 800.0, 600.0);
    globe.set_stations([tokyo].into_iter().collect());

    assert!(globe.set_active_station(Some(StationId::new("tokyo")), Time(0.0)));
    assert_eq!(
        globe.controller().transition_target(),
        Some(RotationState::new(-139.69, -35.68, 0.0))
    );

    let mut clock = FrameClock::display_refresh(Time(0.0));
    while globe.needs_frame() {
        let frame = clock.tick();
        globe.sample_frame(frame.time);
        assert!(frame.index < 120, "transition did not finish");
    }
    assert_eq!(globe.rotation(), RotationState::new(-139.69, -35.68, 0.0));

    let list = globe.render();
    let marker = list.marker(&StationId::new("tokyo")).expect("tokyo visible");
    assert!(marker.active);
    assert_close(marker.position.x, 400.0, 1e-6);
    assert_close(marker.position.y, 300.0, 1e-6);
    assert_eq!(globe.center_label(), "LAT: 35.68 LON: 139.69");
}

#[test]
fn co_located_stations_render_one_active_and_one_inactive_marker() {
    let here = GeoPoint::new(10.0, 10.0);
    let stations: StationSet = [
        Station::new("first", "First").with_location(Some(here)),
        Station::new("second", "Second").with_location(Some(here)),
    ]
    .into_iter()
    .collect();
    let active = StationId::new("second");
    let list = GlobeRenderer::new().render(
        &VectorChunk::default(),
        RotationState::default(),
        &stations,
        Some(&active),
        Viewport::new(500.0, 500.0),
        &GlobeStyle::default(),
    );

    let markers: Vec<_> = list.markers().collect();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].position, markers[1].position);
    assert_eq!(
        markers.iter().map(|m| m.active).collect::<Vec<_>>(),
        vec![false, true]
    );
    assert_eq!(markers[0].style, GlobeStyle::default().marker);
    assert_eq!(markers[1].style, GlobeStyle::default().active_marker);
}

#[test]
fn station_with_null_latitude_never_renders_or_moves_the_globe() {
    let records = r#"[
        { "stationuuid": "ghost", "name": "Ghost", "url_resolved": "https://ghost", "geo_lat": null, "geo_long": 12.5 },
        { "stationuuid": "real", "name": "Real", "url_resolved": "https://real", "geo_lat": 0.0, "geo_long": 0.0 }
    ]"#;
    let stations: StationSet = decode_stations(records).expect("records").into_iter().collect();
    assert_eq!(stations.playable().len(), 1);

    let mut globe = Globe::new(GlobeConfig::default(), 400.0, 400.0);
    globe.set_stations(stations);
    assert!(!globe.set_active_station(Some(StationId::new("ghost")), Time(0.0)));
    assert!(!globe.controller().is_animating());

    let events = globe.sample_frame(Time(2000.0));
    assert_eq!(globe.rotation(), RotationState::default());
    assert!(
        events
            .iter()
            .any(|e| matches!(e.event, GlobeEvent::TransitionRejected))
    );

    let list = globe.render();
    assert!(list.marker(&StationId::new("ghost")).is_none());
    assert!(list.marker(&StationId::new("real")).is_some());
}

#[test]
fn station_with_nan_longitude_does_not_poison_rotation() {
    let stations: StationSet = [
        Station::new("broken", "Broken").with_location(Some(GeoPoint::new(f64::NAN, 10.0))),
        Station::new("ok", "Ok").with_location(Some(GeoPoint::new(0.0, 0.0))),
    ]
    .into_iter()
    .collect();
    let mut globe = Globe::new(GlobeConfig::default(), 440.0, 440.0);
    globe.set_stations(stations);

    assert!(!globe.set_active_station(Some(StationId::new("broken")), Time(0.0)));
    globe.sample_frame(Time(16.0));
    assert_eq!(globe.rotation(), RotationState::default());

    globe.pointer(PointerEvent::Down(Vec2::new(220.0, 220.0)), Time(32.0));
    globe.pointer(PointerEvent::Move(Vec2::new(230.0, 220.0)), Time(48.0));
    globe.pointer(PointerEvent::Up, Time(64.0));
    assert!(globe.rotation().lon_deg().is_finite());

    let list = globe.render();
    assert!(list.marker(&StationId::new("ok")).is_some());
    assert!(list.marker(&StationId::new("broken")).is_none());
}

#[test]
fn frames_hand_out_events_and_keep_none() {
    let tokyo = Station::new("tokyo", "Tokyo").with_location(Some(GeoPoint::new(139.69, 35.68)));
    let mut globe = Globe::new(GlobeConfig::default(), 800.0, 600.0);
    globe.set_stations([tokyo].into_iter().collect());
    globe.set_active_station(Some(StationId::new("tokyo")), Time(0.0));

    let first = globe.sample_frame(Time(16.0));
    assert!(matches!(first[0].event, GlobeEvent::TransitionStarted { .. }));
    assert!(globe.controller().events().is_empty());

    let last = globe.sample_frame(Time(1000.0));
    assert!(matches!(last[0].event, GlobeEvent::TransitionFinished { .. }));
    assert!(globe.sample_frame(Time(1016.0)).is_empty());
    assert!(globe.controller().events().is_empty());
}

#[test]
fn dragging_reports_settled_center_once() {
    let reports: Rc<RefCell<Vec<GeoPoint>>> = Rc::default();
    let sink = Rc::clone(&reports);

    // 440 x 440 gives scale 200, so one pixel is 0.75 degrees.
    let mut globe = Globe::new(GlobeConfig::default(), 440.0, 440.0);
    globe.on_location_changed(move |p: GeoPoint| sink.borrow_mut().push(p));

    globe.pointer(PointerEvent::Down(Vec2::new(220.0, 220.0)), Time(0.0));
    globe.pointer(PointerEvent::Move(Vec2::new(240.0, 220.0)), Time(16.0));
    globe.pointer(PointerEvent::Move(Vec2::new(260.0, 220.0)), Time(32.0));
    globe.pointer(PointerEvent::Up, Time(48.0));
    assert!(!globe.is_dragging());

    let mut clock = FrameClock::display_refresh(Time(32.0));
    while globe.needs_frame() {
        globe.sample_frame(clock.tick().time);
    }

    let got = reports.borrow();
    assert_eq!(got.len(), 1);
    assert_close(got[0].lon_deg, -30.0, 1e-6);
    assert_close(globe.rotation().lon_deg(), 30.0, 1e-6);
}

#[test]
fn picking_and_svg_output_agree_with_the_draw_list() {
    let mut globe = Globe::new(GlobeConfig::default(), 440.0, 440.0);
    globe.set_stations(
        [Station::new("null-island", "Null Island").with_location(Some(GeoPoint::new(0.0, 0.0)))]
            .into_iter()
            .collect(),
    );

    let hit = globe.pick_station(Vec2::new(222.0, 219.0)).expect("marker under pointer");
    assert_eq!(hit.id.as_str(), "null-island");
    assert!(globe.pick_station(Vec2::new(300.0, 300.0)).is_none());

    let geo = globe.geo_at(Vec2::new(220.0, 220.0)).expect("on sphere");
    assert_close(geo.lon_deg, 0.0, 1e-9);
    assert_close(geo.lat_deg, 0.0, 1e-9);

    let list = globe.render();
    assert!(matches!(list.commands[0], DrawCommand::Sphere { .. }));
    let svg = to_svg(&list);
    assert!(svg.contains(r#"data-id="null-island""#));
    assert_eq!(svg.matches("<circle").count(), 2);
}
