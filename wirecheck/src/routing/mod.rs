//! Orthogonal Router
//!
//! Computes Manhattan (horizontal/vertical only) wire paths between two
//! ports while keeping clear of other device bodies.
//!
//! # Approach
//!
//! Obstacles are sparse axis-aligned rectangles, so instead of searching the
//! plane the router builds a small channel graph:
//!
//! ```text
//!   guide lines: stand-off coordinates, their midpoint, every (inflated)
//!                obstacle edge, and one outer ring line per side
//!
//!        |     |   |        |
//!   -----+-----+---+--------+-----   each crossing outside an obstacle is a
//!        |     |###|        |        node; each node exists twice (travelling
//!   -----+-----+###+--------+-----   horizontally / vertically) and the two
//!        |     |###|        |        copies are joined by a bend edge
//!   -----+-----+---+--------+-----
//! ```
//!
//! A* (`petgraph::algo::astar`) with a Manhattan heuristic then finds the
//! cheapest path, where cost is wire length plus a fixed penalty per bend.
//! The search starts and ends at the stand-off points, so every wire leaves
//! and enters its port perpendicular to the device body.
//!
//! Everything is deterministic: guide lines are sorted, nodes and edges are
//! inserted in a fixed order, and no hashing is involved.

pub mod render;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

pub use crate::config::RouterOptions;
use crate::geometry::{self, Point, Rect, Vector, EPSILON};
use crate::model::{Connection, InstanceSet, TemplateLibrary, WireShape};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn of(direction: Vector) -> Axis {
        if direction.x.abs() > direction.y.abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// A grid crossing, tagged with the axis a wire is travelling on there
#[derive(Debug, Clone, Copy)]
struct GridNode {
    point: Point,
    axis: Axis,
}

/// Obstacle-avoiding Manhattan router
#[derive(Debug, Clone, Default)]
pub struct OrthogonalRouter {
    options: RouterOptions,
}

impl OrthogonalRouter {
    pub fn new(options: RouterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Elbow points of a wire from `start` to `end`, excluding both endpoints
    pub fn find_path(
        &self,
        start: Point,
        end: Point,
        start_normal: Vector,
        end_normal: Vector,
        obstacles: &[Rect],
    ) -> Vec<Point> {
        let polyline = self.route_polyline(start, end, start_normal, end_normal, obstacles);
        if polyline.len() <= 2 {
            return Vec::new();
        }
        polyline[1..polyline.len() - 1].to_vec()
    }

    /// Full polyline `start, elbows.., end` with redundant points removed
    pub fn route_polyline(
        &self,
        start: Point,
        end: Point,
        start_normal: Vector,
        end_normal: Vector,
        obstacles: &[Rect],
    ) -> Vec<Point> {
        if start.approx_eq(end) {
            return vec![start, end];
        }

        let start_dir = resolve_normal(start_normal, start, end);
        let end_dir = resolve_normal(end_normal, end, start);
        let start_out = start.offset(start_dir, self.stand_off_from(start, start_dir, obstacles));
        let end_in = end.offset(end_dir, self.stand_off_from(end, end_dir, obstacles));

        let blockers = self.blockers(obstacles, [start, end], [start_out, end_in]);

        let middle = match self.search(start_out, end_in, start_dir, end_dir, &blockers) {
            Some(points) => points,
            None => {
                tracing::debug!(
                    "No obstacle-free route from ({}, {}) to ({}, {}); using direct fallback",
                    start.x,
                    start.y,
                    end.x,
                    end.y
                );
                fallback_route(start_out, end_in, start_dir)
            }
        };

        let mut polyline = Vec::with_capacity(middle.len() + 2);
        polyline.push(start);
        polyline.extend(middle);
        polyline.push(end);
        simplify_path(polyline)
    }

    /// Length of the straight leg leaving `port` along `dir`. A device body
    /// closer than the configured stand-off shortens the leg to half the free
    /// run, so the leg itself never enters it.
    fn stand_off_from(&self, port: Point, dir: Vector, obstacles: &[Rect]) -> f64 {
        let gap = obstacles
            .iter()
            .filter(|rect| !rect.contains_strict(port))
            .filter_map(|rect| ray_entry(rect, port, dir))
            .fold(f64::INFINITY, f64::min);
        self.options.stand_off.min(gap / 2.0)
    }

    /// Inflate obstacles by the clearance margin. An obstacle whose margin
    /// swallows a stand-off point keeps its raw bounds. Only an obstacle that
    /// holds a port itself is ignored, since the wire has to get out of it.
    fn blockers(&self, obstacles: &[Rect], ports: [Point; 2], stand_offs: [Point; 2]) -> Vec<Rect> {
        obstacles
            .iter()
            .filter_map(|raw| {
                if ports.iter().any(|&p| raw.contains_strict(p)) {
                    tracing::debug!("Ignoring obstacle {:?}: it contains a wire endpoint", raw);
                    return None;
                }
                let inflated = raw.inflate(self.options.clearance);
                if stand_offs.iter().any(|&p| inflated.contains_strict(p)) {
                    Some(*raw)
                } else {
                    Some(inflated)
                }
            })
            .collect()
    }

    /// A* over the channel graph between the two stand-off points
    fn search(
        &self,
        start_out: Point,
        end_in: Point,
        start_dir: Vector,
        end_dir: Vector,
        blockers: &[Rect],
    ) -> Option<Vec<Point>> {
        let margin = self.options.stand_off.max(self.options.clearance);
        let xs = guide_lines(
            [start_out.x, end_in.x, (start_out.x + end_in.x) / 2.0],
            blockers.iter().flat_map(|r| [r.left(), r.right()]),
            margin,
        );
        let ys = guide_lines(
            [start_out.y, end_in.y, (start_out.y + end_in.y) / 2.0],
            blockers.iter().flat_map(|r| [r.top(), r.bottom()]),
            margin,
        );

        let nx = xs.len();
        let ny = ys.len();
        let mut graph: DiGraph<GridNode, f64> = DiGraph::with_capacity(nx * ny * 2, nx * ny * 6);

        // (horizontal copy, vertical copy) per crossing, row-major
        let mut cells: Vec<Option<(NodeIndex, NodeIndex)>> = Vec::with_capacity(nx * ny);
        for &y in &ys {
            for &x in &xs {
                let point = Point::new(x, y);
                if blockers.iter().any(|r| r.contains_strict(point)) {
                    cells.push(None);
                    continue;
                }
                let h = graph.add_node(GridNode { point, axis: Axis::Horizontal });
                let v = graph.add_node(GridNode { point, axis: Axis::Vertical });
                graph.add_edge(h, v, self.options.bend_penalty);
                graph.add_edge(v, h, self.options.bend_penalty);
                cells.push(Some((h, v)));
            }
        }

        let start_cell = cell_index(&xs, &ys, start_out)?;
        let goal_cell = cell_index(&xs, &ys, end_in)?;
        let (start_h, start_v) = cells[start_cell]?;
        let (goal_h, goal_v) = cells[goal_cell]?;

        // Leaving the start stand-off back toward the port, or arriving at the
        // end stand-off from the port side, would fold the wire onto itself.
        let forbidden = |from: NodeIndex, to: NodeIndex, step: Vector| -> bool {
            ((from == start_h || from == start_v) && step.dot(start_dir) < -EPSILON)
                || ((to == goal_h || to == goal_v) && step.dot(end_dir) > EPSILON)
        };

        let link = |graph: &mut DiGraph<GridNode, f64>, a: (NodeIndex, NodeIndex), b: (NodeIndex, NodeIndex), axis: Axis| {
            let (ia, ib) = match axis {
                Axis::Horizontal => (a.0, b.0),
                Axis::Vertical => (a.1, b.1),
            };
            let pa = graph[ia].point;
            let pb = graph[ib].point;
            if blockers.iter().any(|r| r.blocks_segment(pa, pb)) {
                return;
            }
            let length = pa.manhattan_distance(pb);
            if !forbidden(ia, ib, Vector::between(pa, pb)) {
                graph.add_edge(ia, ib, length);
            }
            if !forbidden(ib, ia, Vector::between(pb, pa)) {
                graph.add_edge(ib, ia, length);
            }
        };

        for row in 0..ny {
            for col in 0..nx.saturating_sub(1) {
                if let (Some(a), Some(b)) = (cells[row * nx + col], cells[row * nx + col + 1]) {
                    link(&mut graph, a, b, Axis::Horizontal);
                }
            }
        }
        for col in 0..nx {
            for row in 0..ny.saturating_sub(1) {
                if let (Some(a), Some(b)) = (cells[row * nx + col], cells[(row + 1) * nx + col]) {
                    link(&mut graph, a, b, Axis::Vertical);
                }
            }
        }

        let start_node = match Axis::of(start_dir) {
            Axis::Horizontal => start_h,
            Axis::Vertical => start_v,
        };
        let goal_node = match Axis::of(end_dir) {
            Axis::Horizontal => goal_h,
            Axis::Vertical => goal_v,
        };

        let (_cost, path) = astar(
            &graph,
            start_node,
            |n| n == goal_node,
            |e| *e.weight(),
            |n| graph[n].point.manhattan_distance(end_in),
        )?;

        Some(path.into_iter().map(|n| graph[n].point).collect())
    }
}

/// Elbow points of a wire between two ports, routed with default options.
///
/// The first leg leaves `start` along `start_normal` and the last leg enters
/// `end` against `end_normal`; no segment passes through an obstacle.
pub fn find_smart_path(
    start: Point,
    end: Point,
    start_normal: Vector,
    end_normal: Vector,
    obstacles: &[Rect],
) -> Vec<Point> {
    OrthogonalRouter::default().find_path(start, end, start_normal, end_normal, obstacles)
}

/// A connection with its resolved drawable polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedWire {
    pub connection_id: String,
    /// Start, elbows, end
    pub points: Vec<Point>,
}

impl RoutedWire {
    pub fn elbows(&self) -> &[Point] {
        if self.points.len() <= 2 {
            return &[];
        }
        &self.points[1..self.points.len() - 1]
    }
}

impl OrthogonalRouter {
    /// Route one connection against the given obstacles.
    ///
    /// Returns `None` when an endpoint no longer resolves. Straight and
    /// curved wires run directly between their ports; orthogonal wires keep
    /// their manual control points when they have any.
    pub fn route_connection(
        &self,
        connection: &Connection,
        instances: &InstanceSet,
        templates: &TemplateLibrary,
        obstacles: &[Rect],
    ) -> Option<RoutedWire> {
        let from = instances.resolve(templates, &connection.from_instance_id, &connection.from_port_id)?;
        let to = instances.resolve(templates, &connection.to_instance_id, &connection.to_port_id)?;

        let start = geometry::port_position(from.instance, from.template, &from.port.id);
        let end = geometry::port_position(to.instance, to.template, &to.port.id);

        let points = match connection.shape {
            WireShape::Straight | WireShape::Curved => vec![start, end],
            WireShape::Orthogonal if !connection.control_points.is_empty() => {
                let mut points = vec![start];
                points.extend(connection.control_points.iter().copied());
                points.push(end);
                points
            }
            WireShape::Orthogonal => {
                let start_normal = geometry::port_normal(from.instance, from.template, &from.port.id);
                let end_normal = geometry::port_normal(to.instance, to.template, &to.port.id);
                self.route_polyline(start, end, start_normal, end_normal, obstacles)
            }
        };

        Some(RoutedWire {
            connection_id: connection.id.clone(),
            points,
        })
    }

    /// Route every resolvable connection of a page, with every device body
    /// as an obstacle. Dangling connections are left out.
    pub fn route_all(
        &self,
        connections: &[Connection],
        instances: &InstanceSet,
        templates: &TemplateLibrary,
    ) -> Vec<RoutedWire> {
        let obstacles = geometry::obstacles_for(instances, templates, &[]);
        connections
            .iter()
            .filter_map(|c| {
                let routed = self.route_connection(c, instances, templates, &obstacles);
                if routed.is_none() {
                    tracing::debug!("Not routing connection {}: endpoint does not resolve", c.id);
                }
                routed
            })
            .collect()
    }
}

/// Axis-snapped unit normal; a missing normal points toward the other end
fn resolve_normal(normal: Vector, from: Point, toward: Point) -> Vector {
    let snapped = normal.snapped_to_axis();
    if !snapped.is_zero() {
        return snapped;
    }
    let toward = Vector::between(from, toward).snapped_to_axis();
    if toward.is_zero() {
        Vector::RIGHT
    } else {
        toward
    }
}

/// Sorted, de-duplicated coordinates of the guide lines on one axis, plus an
/// outer line `margin` beyond each extreme so a wire can always loop around.
fn guide_lines(seed: [f64; 3], edges: impl Iterator<Item = f64>, margin: f64) -> Vec<f64> {
    let mut lines: Vec<f64> = seed.into_iter().chain(edges).filter(|v| v.is_finite()).collect();
    lines.sort_by(|a, b| a.total_cmp(b));
    if let (Some(&low), Some(&high)) = (lines.first(), lines.last()) {
        if margin > EPSILON {
            lines.insert(0, low - margin);
            lines.push(high + margin);
        }
    }
    lines.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
    lines
}

/// Distance a ray from `from` along the axis direction `dir` travels before
/// it enters the interior of `rect`, if it ever does
fn ray_entry(rect: &Rect, from: Point, dir: Vector) -> Option<f64> {
    let (distance, inside_span) = match Axis::of(dir) {
        Axis::Horizontal => {
            let distance = if dir.x > 0.0 { rect.left() - from.x } else { from.x - rect.right() };
            (distance, from.y > rect.top() + EPSILON && from.y < rect.bottom() - EPSILON)
        }
        Axis::Vertical => {
            let distance = if dir.y > 0.0 { rect.top() - from.y } else { from.y - rect.bottom() };
            (distance, from.x > rect.left() + EPSILON && from.x < rect.right() - EPSILON)
        }
    };
    if inside_span && distance > -EPSILON {
        Some(distance.max(0.0))
    } else {
        None
    }
}

fn cell_index(xs: &[f64], ys: &[f64], p: Point) -> Option<usize> {
    let col = xs.iter().position(|x| (x - p.x).abs() < EPSILON)?;
    let row = ys.iter().position(|y| (y - p.y).abs() < EPSILON)?;
    Some(row * xs.len() + col)
}

/// Obstacle-blind route used when the channel graph has no path: leave along
/// the start axis, cross over, and arrive at the end stand-off.
fn fallback_route(start_out: Point, end_in: Point, start_dir: Vector) -> Vec<Point> {
    let corner = match Axis::of(start_dir) {
        Axis::Horizontal => Point::new(end_in.x, start_out.y),
        Axis::Vertical => Point::new(start_out.x, end_in.y),
    };
    vec![start_out, corner, end_in]
}

/// Drop repeated points and points in the middle of a straight run.
/// A point where the wire doubles back is kept.
pub(crate) fn simplify_path(points: Vec<Point>) -> Vec<Point> {
    let mut cleaned: Vec<Point> = Vec::with_capacity(points.len());
    for point in points {
        if cleaned.last().map(|last| last.approx_eq(point)).unwrap_or(false) {
            continue;
        }
        cleaned.push(point);
    }

    let mut simplified: Vec<Point> = Vec::with_capacity(cleaned.len());
    for point in cleaned {
        while simplified.len() >= 2 {
            let a = simplified[simplified.len() - 2];
            let b = simplified[simplified.len() - 1];
            let ab = Vector::between(a, b);
            let bc = Vector::between(b, point);
            let straight_through = ab.cross(bc).abs() < EPSILON && ab.dot(bc) > 0.0;
            if straight_through {
                simplified.pop();
            } else {
                break;
            }
        }
        simplified.push(point);
    }

    simplified
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_path(start: Point, end: Point, elbows: &[Point]) -> Vec<Point> {
        let mut points = vec![start];
        points.extend_from_slice(elbows);
        points.push(end);
        points
    }

    fn is_manhattan(points: &[Point]) -> bool {
        points.windows(2).all(|w| {
            (w[0].x - w[1].x).abs() < EPSILON || (w[0].y - w[1].y).abs() < EPSILON
        })
    }

    fn crosses_any(points: &[Point], obstacles: &[Rect]) -> bool {
        points
            .windows(2)
            .any(|w| obstacles.iter().any(|r| r.blocks_segment(w[0], w[1])))
    }

    #[test]
    fn test_facing_ports_on_one_line_need_no_elbows() {
        let elbows = find_smart_path(
            Point::new(0.0, 0.0),
            Point::new(200.0, 0.0),
            Vector::RIGHT,
            Vector::LEFT,
            &[],
        );
        assert!(elbows.is_empty());
    }

    #[test]
    fn test_offset_facing_ports_make_a_z() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(200.0, 100.0);
        let elbows = find_smart_path(start, end, Vector::RIGHT, Vector::LEFT, &[]);

        assert_eq!(elbows.len(), 2);
        assert!(is_manhattan(&full_path(start, end, &elbows)));
        // Leaves to the right, enters from the left
        assert_eq!(elbows[0].y, 0.0);
        assert!(elbows[0].x >= 20.0);
        assert_eq!(elbows[1].y, 100.0);
        assert!(elbows[1].x <= 180.0);
    }

    #[test]
    fn test_same_side_ports_make_a_u() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        let elbows = find_smart_path(start, end, Vector::DOWN, Vector::DOWN, &[]);

        assert_eq!(elbows, vec![Point::new(0.0, 20.0), Point::new(100.0, 20.0)]);
    }

    #[test]
    fn test_back_to_back_ports_never_fold_onto_stand_off() {
        // Start faces away from the end, so the wire has to go round
        let start = Point::new(100.0, 0.0);
        let end = Point::new(0.0, 0.0);
        let elbows = find_smart_path(start, end, Vector::RIGHT, Vector::RIGHT, &[]);
        let points = full_path(start, end, &elbows);

        assert!(is_manhattan(&points));
        assert!(elbows[0].x > 100.0, "first leg must move right: {:?}", elbows);
        let last = elbows[elbows.len() - 1];
        assert!(last.x > 0.0, "last leg must arrive from the right: {:?}", elbows);
    }

    #[test]
    fn test_detours_around_obstacle_below() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(200.0, 0.0);
        let obstacle = Rect::new(80.0, -40.0, 40.0, 80.0);

        let elbows = find_smart_path(start, end, Vector::DOWN, Vector::DOWN, &[obstacle]);
        let points = full_path(start, end, &elbows);

        assert!(is_manhattan(&points));
        assert!(!crosses_any(&points, &[obstacle]));
        assert_eq!(elbows[0].x, 0.0);
        assert!(elbows[0].y > 0.0, "first leg must head down: {:?}", elbows);
        assert!(elbows.iter().any(|p| p.y >= obstacle.bottom()));
    }

    #[test]
    fn test_wall_between_facing_ports() {
        let start = Point::new(0.0, 50.0);
        let end = Point::new(300.0, 50.0);
        let wall = Rect::new(140.0, 0.0, 20.0, 100.0);

        let router = OrthogonalRouter::default();
        let points = router.route_polyline(start, end, Vector::RIGHT, Vector::LEFT, &[wall]);

        assert!(is_manhattan(&points));
        assert!(!crosses_any(&points, &[wall]));
        assert_eq!(points.first(), Some(&start));
        assert_eq!(points.last(), Some(&end));
    }

    #[test]
    fn test_grid_layout_never_crosses_devices() {
        let mut obstacles = Vec::new();
        for col in 0..3 {
            for row in 0..3 {
                obstacles.push(Rect::new(100.0 + 150.0 * col as f64, 100.0 + 120.0 * row as f64, 60.0, 40.0));
            }
        }
        let starts = [
            (Point::new(0.0, 50.0), Vector::RIGHT),
            (Point::new(0.0, 300.0), Vector::DOWN),
            (Point::new(300.0, 0.0), Vector::DOWN),
        ];
        let ends = [
            (Point::new(700.0, 400.0), Vector::LEFT),
            (Point::new(400.0, 500.0), Vector::DOWN),
            (Point::new(200.0, 190.0), Vector::RIGHT),
        ];

        let router = OrthogonalRouter::default();
        for (start, start_normal) in starts {
            for (end, end_normal) in ends {
                let points = router.route_polyline(start, end, start_normal, end_normal, &obstacles);
                assert!(is_manhattan(&points), "{:?}", points);
                assert!(!crosses_any(&points, &obstacles), "{:?}", points);
                let first_leg = Vector::between(points[0], points[1]);
                assert!(first_leg.dot(start_normal) > 0.0, "{:?}", points);
                let last_leg = Vector::between(points[points.len() - 2], points[points.len() - 1]);
                assert!(last_leg.dot(end_normal) < 0.0, "{:?}", points);
            }
        }
    }

    #[test]
    fn test_device_next_to_port_is_still_avoided() {
        let start = Point::new(100.0, 50.0);
        let end = Point::new(400.0, 50.0);
        let device = Rect::new(110.0, 0.0, 60.0, 100.0);

        let points = OrthogonalRouter::default().route_polyline(start, end, Vector::RIGHT, Vector::LEFT, &[device]);

        assert!(is_manhattan(&points), "{:?}", points);
        assert!(!crosses_any(&points, &[device]), "{:?}", points);
        // The first leg stops short of the device instead of entering it
        assert_eq!(points[1].y, 50.0);
        assert!(points[1].x > start.x && points[1].x <= device.left(), "{:?}", points);
    }

    #[test]
    fn test_thin_obstacle_inside_stand_off_leg() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(200.0, 0.0);
        let strip = Rect::new(-10.0, 5.0, 20.0, 5.0);

        let elbows = find_smart_path(start, end, Vector::DOWN, Vector::DOWN, &[strip]);
        let points = full_path(start, end, &elbows);

        assert!(is_manhattan(&points), "{:?}", points);
        assert!(!crosses_any(&points, &[strip]), "{:?}", points);
        assert_eq!(elbows[0].x, 0.0);
        assert!(elbows[0].y > 0.0 && elbows[0].y <= strip.top(), "{:?}", elbows);
    }

    #[test]
    fn test_obstacle_holding_the_port_is_ignored() {
        let start = Point::new(50.0, 50.0);
        let end = Point::new(300.0, 50.0);
        let host = Rect::new(0.0, 0.0, 100.0, 100.0);

        let elbows = find_smart_path(start, end, Vector::RIGHT, Vector::LEFT, &[host]);
        assert!(elbows.is_empty(), "{:?}", elbows);
    }

    #[test]
    fn test_ray_entry() {
        let rect = Rect::new(10.0, 0.0, 20.0, 20.0);

        assert_eq!(ray_entry(&rect, Point::new(0.0, 10.0), Vector::RIGHT), Some(10.0));
        assert_eq!(ray_entry(&rect, Point::new(40.0, 10.0), Vector::LEFT), Some(10.0));
        assert_eq!(ray_entry(&rect, Point::new(0.0, 10.0), Vector::LEFT), None);
        // Grazing an edge does not enter
        assert_eq!(ray_entry(&rect, Point::new(0.0, 0.0), Vector::RIGHT), None);
        assert_eq!(ray_entry(&rect, Point::new(20.0, 30.0), Vector::UP), Some(10.0));
    }

    #[test]
    fn test_idempotent() {
        let obstacles = [
            Rect::new(50.0, -30.0, 40.0, 60.0),
            Rect::new(150.0, 20.0, 30.0, 90.0),
        ];
        let a = find_smart_path(Point::new(0.0, 0.0), Point::new(260.0, 80.0), Vector::RIGHT, Vector::UP, &obstacles);
        let b = find_smart_path(Point::new(0.0, 0.0), Point::new(260.0, 80.0), Vector::RIGHT, Vector::UP, &obstacles);
        assert_eq!(a, b);
    }

    #[test]
    fn test_enclosed_end_uses_fallback() {
        // The end port sits inside a ring of obstacles with no gap
        let ring = [
            Rect::new(100.0, 100.0, 200.0, 20.0),
            Rect::new(100.0, 280.0, 200.0, 20.0),
            Rect::new(100.0, 120.0, 20.0, 160.0),
            Rect::new(280.0, 120.0, 20.0, 160.0),
        ];
        let start = Point::new(0.0, 0.0);
        let end = Point::new(200.0, 200.0);
        let points = OrthogonalRouter::default().route_polyline(start, end, Vector::RIGHT, Vector::LEFT, &ring);

        assert!(is_manhattan(&points));
        assert_eq!(points.last(), Some(&end));
    }

    #[test]
    fn test_zero_normal_points_at_other_end() {
        let elbows = find_smart_path(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Vector::default(),
            Vector::default(),
            &[],
        );
        assert!(elbows.is_empty());
    }

    #[test]
    fn test_simplify_keeps_doubling_back() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 5.0),
        ];
        assert_eq!(
            simplify_path(points),
            vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_routed_wire_elbows() {
        let wire = RoutedWire {
            connection_id: "w".to_string(),
            points: vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0), Point::new(5.0, 5.0)],
        };
        assert_eq!(wire.elbows(), &[Point::new(5.0, 0.0)]);
    }
}
