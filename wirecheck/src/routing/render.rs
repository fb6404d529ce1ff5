//! Wire rendering helpers: rounded corners and jumps over crossing wires.
//!
//! Paths are expressed as a list of [`PathSegment`]s so a front end can draw
//! them however it likes; [`WirePath::to_svg_path_data`] produces the SVG
//! `d` attribute directly.

use serde::{Deserialize, Serialize};

use crate::config::RenderOptions;
use crate::geometry::{Point, Vector, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PathSegment {
    Line {
        from: Point,
        to: Point,
    },
    /// Circular arc; `clockwise` is as seen on screen (y down)
    Arc {
        from: Point,
        to: Point,
        radius: f64,
        clockwise: bool,
    },
}

impl PathSegment {
    pub fn start(&self) -> Point {
        match self {
            PathSegment::Line { from, .. } | PathSegment::Arc { from, .. } => *from,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathSegment::Line { to, .. } | PathSegment::Arc { to, .. } => *to,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WirePath {
    pub segments: Vec<PathSegment>,
}

impl WirePath {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn arc_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Arc { .. }))
            .count()
    }

    /// SVG path data (`M`, `L` and `A` commands)
    pub fn to_svg_path_data(&self) -> String {
        let Some(first) = self.segments.first() else {
            return String::new();
        };

        let start = first.start();
        let mut commands = vec![format!("M {} {}", fmt_num(start.x), fmt_num(start.y))];
        for segment in &self.segments {
            match *segment {
                PathSegment::Line { to, .. } => {
                    commands.push(format!("L {} {}", fmt_num(to.x), fmt_num(to.y)));
                }
                PathSegment::Arc { to, radius, clockwise, .. } => {
                    commands.push(format!(
                        "A {r} {r} 0 0 {} {} {}",
                        u8::from(clockwise),
                        fmt_num(to.x),
                        fmt_num(to.y),
                        r = fmt_num(radius)
                    ));
                }
            }
        }
        commands.join(" ")
    }
}

fn fmt_num(value: f64) -> String {
    // Two decimals, and no "-0"
    let rounded = (value * 100.0).round() / 100.0 + 0.0;
    format!("{}", rounded)
}

fn push_line(segments: &mut Vec<PathSegment>, from: Point, to: Point) {
    if !from.approx_eq(to) {
        segments.push(PathSegment::Line { from, to });
    }
}

/// Replace each corner of an orthogonal polyline with a quarter arc.
///
/// The radius at a corner is clamped to half the shorter adjacent segment,
/// so neighbouring arcs never overlap. Straight-through vertices get no arc,
/// and a vertex where the wire doubles back stays a sharp tip.
pub fn round_corners(points: &[Point], radius: f64) -> WirePath {
    let mut cleaned: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if cleaned.last().map(|last: &Point| last.approx_eq(p)).unwrap_or(false) {
            continue;
        }
        cleaned.push(p);
    }

    let mut segments = Vec::new();
    if cleaned.len() < 2 {
        return WirePath { segments };
    }

    let mut cursor = cleaned[0];
    for window in cleaned.windows(3) {
        let (a, b, c) = (window[0], window[1], window[2]);
        let incoming = Vector::between(a, b);
        let outgoing = Vector::between(b, c);
        let turn = incoming.normalized().cross(outgoing.normalized());

        if turn.abs() < EPSILON {
            // Straight through needs no vertex; a U-turn keeps its tip
            if incoming.dot(outgoing) < 0.0 {
                push_line(&mut segments, cursor, b);
                cursor = b;
            }
            continue;
        }

        let r = radius.min(incoming.length() / 2.0).min(outgoing.length() / 2.0);
        if r < EPSILON {
            push_line(&mut segments, cursor, b);
            cursor = b;
            continue;
        }

        let arc_start = b.offset(incoming.normalized(), -r);
        let arc_end = b.offset(outgoing.normalized(), r);
        push_line(&mut segments, cursor, arc_start);
        segments.push(PathSegment::Arc {
            from: arc_start,
            to: arc_end,
            radius: r,
            clockwise: turn > 0.0,
        });
        cursor = arc_end;
    }

    if let Some(&last) = cleaned.last() {
        push_line(&mut segments, cursor, last);
    }

    WirePath { segments }
}

/// X positions where a horizontal run at `y` from `x0` to `x1` crosses the
/// interior of a vertical segment of another wire
fn crossings(y: f64, x0: f64, x1: f64, others: &[Vec<Point>], hop_radius: f64) -> Vec<f64> {
    let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let mut xs: Vec<f64> = others
        .iter()
        .flat_map(|wire| wire.windows(2))
        .filter_map(|w| {
            let (p, q) = (w[0], w[1]);
            if (p.x - q.x).abs() >= EPSILON {
                return None;
            }
            let (top, bottom) = if p.y <= q.y { (p.y, q.y) } else { (q.y, p.y) };
            let interior_of_other = y > top + EPSILON && y < bottom - EPSILON;
            let room_for_hop = p.x > lo + hop_radius + EPSILON && p.x < hi - hop_radius - EPSILON;
            (interior_of_other && room_for_hop).then_some(p.x)
        })
        .collect();

    xs.sort_by(|a, b| a.total_cmp(b));
    if x1 < x0 {
        xs.reverse();
    }
    xs
}

/// Insert semicircular hops where this path's horizontal runs cross other
/// wires' vertical runs.
///
/// Only horizontal runs hop, so a crossing between two wires is drawn once.
/// Touching endpoints and corners are junctions, not crossings, and get no
/// hop. Crossings closer together than a hop's width share one wider hop.
pub fn insert_wire_jumps(path: &WirePath, others: &[Vec<Point>], hop_radius: f64) -> WirePath {
    if hop_radius < EPSILON {
        return path.clone();
    }

    let mut segments = Vec::with_capacity(path.segments.len());
    for segment in &path.segments {
        let PathSegment::Line { from, to } = *segment else {
            segments.push(*segment);
            continue;
        };
        if (from.y - to.y).abs() >= EPSILON {
            segments.push(*segment);
            continue;
        }

        let y = from.y;
        let direction = if to.x >= from.x { 1.0 } else { -1.0 };

        // (start x, end x) in travel order
        let mut hops: Vec<(f64, f64)> = Vec::new();
        for x in crossings(y, from.x, to.x, others, hop_radius) {
            let hop_start = x - direction * hop_radius;
            let hop_end = x + direction * hop_radius;
            match hops.last_mut() {
                Some(last) if (x - last.1) * direction <= 0.0 => {}
                Some(last) if (hop_start - last.1) * direction < 0.0 => last.1 = hop_end,
                _ => hops.push((hop_start, hop_end)),
            }
        }

        let mut cursor = from;
        for (start_x, end_x) in hops {
            let hop_from = Point::new(start_x, y);
            let hop_to = Point::new(end_x, y);
            push_line(&mut segments, cursor, hop_from);
            // Hops bulge upward: clockwise when travelling right
            segments.push(PathSegment::Arc {
                from: hop_from,
                to: hop_to,
                radius: (end_x - start_x).abs() / 2.0,
                clockwise: direction > 0.0,
            });
            cursor = hop_to;
        }

        push_line(&mut segments, cursor, to);
    }

    WirePath { segments }
}

/// Rounded corners, then hops over `others`
pub fn build_wire_path(points: &[Point], others: &[Vec<Point>], options: &RenderOptions) -> WirePath {
    let rounded = round_corners(points, options.corner_radius);
    insert_wire_jumps(&rounded, others, options.hop_radius)
}
