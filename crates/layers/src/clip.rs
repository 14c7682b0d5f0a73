//! Hemisphere clipping of lines and rings for the orthographic view.
//!
//! Edges between vertices are great-circle arcs. They are densified in the
//! viewer frame, cut where they cross the horizon, and projected. Rings that
//! leave the visible hemisphere are closed along the horizon circle.

use foundation::math::{GeoPoint, Vec3};
use scene::projection::{GeoProjection, ScreenPoint};

/// Maximum angular length of an edge after densification.
const MAX_EDGE_RAD: f64 = 2.0 * std::f64::consts::PI / 180.0;

/// A projected polyline; closed subpaths end where they start.
#[derive(Debug, Clone, PartialEq)]
pub struct SubPath {
    pub points: Vec<ScreenPoint>,
    pub closed: bool,
}

/// Screen-space geometry of one drawable path, possibly several pieces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedPath {
    pub subpaths: Vec<SubPath>,
}

impl ProjectedPath {
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn push_lines(&mut self, lines: Vec<Vec<ScreenPoint>>) {
        self.subpaths.extend(lines.into_iter().map(|points| SubPath {
            points,
            closed: false,
        }));
    }

    pub fn push_ring(&mut self, ring: Vec<ScreenPoint>) {
        self.subpaths.push(SubPath {
            points: ring,
            closed: true,
        });
    }
}

/// Splits `line` into the runs that lie on the visible hemisphere.
pub fn clip_line(projection: &GeoProjection, line: &[GeoPoint]) -> Vec<Vec<ScreenPoint>> {
    let vectors = densify(&rotated(projection, line), false);
    let c = projection.clip_cos();

    let mut out = Vec::new();
    let mut run: Vec<Vec3> = Vec::new();
    let mut prev: Option<Vec3> = None;
    for v in vectors {
        let inside = projection.is_visible_vector(v);
        if let Some(p) = prev {
            let was_inside = projection.is_visible_vector(p);
            if was_inside != inside {
                run.push(horizon_crossing(p, v, c));
                if was_inside {
                    out.push(std::mem::take(&mut run));
                }
            }
        }
        if inside {
            run.push(v);
        }
        prev = Some(v);
    }
    out.push(run);

    out.into_iter()
        .filter_map(|run| project_all(projection, &run))
        .filter(|points| points.len() >= 2)
        .collect()
}

/// Clips a polygon ring to the visible hemisphere.
///
/// The ring may or may not repeat its first vertex. Returns `None` when
/// nothing of it is visible. Each exit/entry pair of horizon crossings is
/// joined along the shorter horizon arc, not by ring winding. A polygon whose
/// hidden boundary spans more than 180° of the horizon therefore closes on
/// the wrong side, and a ring that surrounds the whole disc with every vertex
/// hidden is dropped. Neither occurs for country outlines at 110m.
pub fn clip_ring(projection: &GeoProjection, ring: &[GeoPoint]) -> Option<Vec<ScreenPoint>> {
    let mut vectors = rotated(projection, ring);
    if vectors.len() >= 2 && vectors.first() == vectors.last() {
        vectors.pop();
    }
    if vectors.len() < 3 {
        return None;
    }
    let vectors = densify(&vectors, true);
    let c = projection.clip_cos();
    let n = vectors.len();

    let mut out: Vec<Vec3> = Vec::with_capacity(n);
    let mut open_exit: Option<Vec3> = None;
    let mut first_entry: Option<Vec3> = None;
    for i in 0..n {
        let cur = vectors[i];
        let next = vectors[(i + 1) % n];
        let cur_in = projection.is_visible_vector(cur);
        let next_in = projection.is_visible_vector(next);
        if cur_in {
            out.push(cur);
        }
        if cur_in == next_in {
            continue;
        }

        let crossing = horizon_crossing(cur, next, c);
        if cur_in {
            out.push(crossing);
            open_exit = Some(crossing);
        } else {
            match open_exit.take() {
                Some(exit) => out.extend(horizon_arc(exit, crossing, c)),
                None => first_entry = Some(crossing),
            }
            out.push(crossing);
        }
    }
    if let (Some(exit), Some(entry)) = (open_exit, first_entry) {
        out.extend(horizon_arc(exit, entry, c));
    }

    if out.len() < 3 {
        return None;
    }
    let first = out[0];
    out.push(first);
    project_all(projection, &out)
}

fn rotated(projection: &GeoProjection, points: &[GeoPoint]) -> Vec<Vec3> {
    points
        .iter()
        .filter(|p| p.lon_deg.is_finite() && p.lat_deg.is_finite())
        .map(|p| projection.rotation().rotate_to_vector(*p))
        .collect()
}

/// Inserts points along each great-circle edge so no edge exceeds [`MAX_EDGE_RAD`].
fn densify(vectors: &[Vec3], closed: bool) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(vectors.len());
    let edge_count = if closed {
        vectors.len()
    } else {
        vectors.len().saturating_sub(1)
    };
    for i in 0..edge_count {
        let a = vectors[i];
        let b = vectors[(i + 1) % vectors.len()];
        out.push(a);
        let angle = a.dot(b).clamp(-1.0, 1.0).acos();
        let steps = (angle / MAX_EDGE_RAD).ceil() as usize;
        for k in 1..steps {
            out.push(a.lerp(b, k as f64 / steps as f64).normalize());
        }
    }
    if !closed {
        if let Some(&last) = vectors.last() {
            out.push(last);
        }
    }
    out
}

/// Point on the horizon circle where the edge `a -> b` crosses it.
fn horizon_crossing(a: Vec3, b: Vec3, c: f64) -> Vec3 {
    let dx = b.x - a.x;
    let t = if dx.abs() > f64::EPSILON {
        ((c - a.x) / dx).clamp(0.0, 1.0)
    } else {
        0.5
    };
    on_horizon(a.lerp(b, t), c)
}

/// Moves `v` onto the horizon circle `x = c` keeping its direction around the view axis.
fn on_horizon(v: Vec3, c: f64) -> Vec3 {
    let r = (1.0 - c * c).max(0.0).sqrt();
    let len = (v.y * v.y + v.z * v.z).sqrt();
    if len <= f64::EPSILON {
        return Vec3::new(c, r, 0.0);
    }
    Vec3::new(c, v.y / len * r, v.z / len * r)
}

/// Interior points of the shorter horizon arc from `from` to `to`.
fn horizon_arc(from: Vec3, to: Vec3, c: f64) -> Vec<Vec3> {
    let r = (1.0 - c * c).max(0.0).sqrt();
    let start = from.z.atan2(from.y);
    let end = to.z.atan2(to.y);
    let mut sweep = end - start;
    if sweep > std::f64::consts::PI {
        sweep -= std::f64::consts::TAU;
    } else if sweep < -std::f64::consts::PI {
        sweep += std::f64::consts::TAU;
    }

    let steps = (sweep.abs() / MAX_EDGE_RAD).ceil() as usize;
    (1..steps)
        .map(|k| {
            let theta = start + sweep * k as f64 / steps as f64;
            Vec3::new(c, theta.cos() * r, theta.sin() * r)
        })
        .collect()
}

fn project_all(projection: &GeoProjection, vectors: &[Vec3]) -> Option<Vec<ScreenPoint>> {
    vectors
        .iter()
        .map(|v| projection.project_vector(*v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{clip_line, clip_ring};
    use foundation::math::{GeoPoint, RotationState};
    use scene::projection::ProjectionConfig;

    fn projection() -> scene::projection::GeoProjection {
        ProjectionConfig::new(200.0, 200.0, 100.0, RotationState::default()).projection()
    }

    fn within_disc(p: foundation::math::Vec2) -> bool {
        let dx = p.x - 100.0;
        let dy = p.y - 100.0;
        (dx * dx + dy * dy).sqrt() <= 100.0 + 1e-6
    }

    #[test]
    fn visible_line_is_kept_whole() {
        let line = [GeoPoint::new(-10.0, 0.0), GeoPoint::new(10.0, 0.0)];
        let runs = clip_line(&projection(), &line);
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert!((run[0].x - (100.0 - 100.0 * 10f64.to_radians().sin())).abs() < 1e-9);
        assert!((run.last().map(|p| p.x).unwrap_or_default() - (100.0 + 100.0 * 10f64.to_radians().sin())).abs() < 1e-9);
    }

    #[test]
    fn hidden_line_is_dropped() {
        let line = [GeoPoint::new(150.0, 0.0), GeoPoint::new(170.0, 10.0)];
        assert!(clip_line(&projection(), &line).is_empty());
    }

    #[test]
    fn line_crossing_horizon_ends_on_the_limb() {
        let line = [GeoPoint::new(60.0, 0.0), GeoPoint::new(120.0, 0.0)];
        let runs = clip_line(&projection(), &line);
        assert_eq!(runs.len(), 1);
        let end = runs[0].last().copied().unwrap_or_default();
        assert!((end.x - 200.0).abs() < 1e-3, "end {end:?}");
        assert!((end.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn line_leaving_and_reentering_splits_in_two() {
        let line = [
            GeoPoint::new(80.0, 0.0),
            GeoPoint::new(100.0, 0.0),
            GeoPoint::new(180.0, 0.0),
            GeoPoint::new(-100.0, 0.0),
            GeoPoint::new(-80.0, 0.0),
        ];
        assert_eq!(clip_line(&projection(), &line).len(), 2);
    }

    #[test]
    fn ring_crossing_horizon_is_closed_inside_disc() {
        let ring = [
            GeoPoint::new(60.0, -20.0),
            GeoPoint::new(120.0, -20.0),
            GeoPoint::new(120.0, 20.0),
            GeoPoint::new(60.0, 20.0),
            GeoPoint::new(60.0, -20.0),
        ];
        let clipped = clip_ring(&projection(), &ring).expect("partly visible");
        assert_eq!(clipped.first(), clipped.last());
        assert!(clipped.iter().all(|p| within_disc(*p)));
        assert!(clipped.iter().any(|p| (p.x - 200.0).abs() < 1.0));
    }

    #[test]
    fn ring_starting_hidden_is_closed_along_horizon() {
        let ring = [
            GeoPoint::new(120.0, 20.0),
            GeoPoint::new(60.0, 20.0),
            GeoPoint::new(60.0, -20.0),
            GeoPoint::new(120.0, -20.0),
        ];
        let clipped = clip_ring(&projection(), &ring).expect("partly visible");
        assert!(clipped.iter().all(|p| within_disc(*p)));
        // Horizon arc points between the exit at lat -20 and the entry at lat 20.
        let on_limb = clipped
            .iter()
            .filter(|p| (p.x - 100.0).hypot(p.y - 100.0) > 100.0 - 1e-3)
            .count();
        assert!(on_limb >= 3, "only {on_limb} limb points");
    }

    #[test]
    fn hidden_ring_is_dropped_and_visible_ring_kept() {
        let hidden = [
            GeoPoint::new(170.0, 0.0),
            GeoPoint::new(175.0, 0.0),
            GeoPoint::new(175.0, 5.0),
        ];
        assert_eq!(clip_ring(&projection(), &hidden), None);

        let visible = [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(5.0, 0.0),
            GeoPoint::new(5.0, 5.0),
            GeoPoint::new(0.0, 0.0),
        ];
        let clipped = clip_ring(&projection(), &visible).expect("visible");
        // 3 corners, 7 densified edge points, closing point.
        assert_eq!(clipped.len(), 11);
        assert_eq!(clipped.first(), clipped.last());
    }
}
