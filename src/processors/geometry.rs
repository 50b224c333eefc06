//! Geometric primitives and algorithms for receipt boundary detection.
//!
//! This module provides the point and polygon types used by the scanner,
//! along with the algorithms it needs: shoelace area, perimeter, closed-curve
//! polygon approximation, convex hulls, and minimum-area rectangles.

use imageproc::contours::Contour;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns this point with both coordinates multiplied by `factor`.
    ///
    /// Used to map coordinates detected on the downscaled working image back
    /// to the source resolution.
    #[inline]
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Calculates the Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Orders four boundary points as top-left, top-right, bottom-right,
/// bottom-left.
///
/// The ordering is derived deterministically: the top-left corner minimizes
/// `x + y`, the bottom-right maximizes it, the top-right maximizes `x - y`,
/// and the bottom-left minimizes `x - y`. Applying the ordering to an
/// already-ordered quad is a no-op.
pub fn order_quad(points: [Point; 4]) -> [Point; 4] {
    let by_sum = |p: &&Point| p.x + p.y;
    let by_diff = |p: &&Point| p.x - p.y;

    let top_left = points
        .iter()
        .min_by(|a, b| by_sum(a).total_cmp(&by_sum(b)))
        .copied()
        .unwrap_or(points[0]);
    let bottom_right = points
        .iter()
        .max_by(|a, b| by_sum(a).total_cmp(&by_sum(b)))
        .copied()
        .unwrap_or(points[2]);
    let top_right = points
        .iter()
        .max_by(|a, b| by_diff(a).total_cmp(&by_diff(b)))
        .copied()
        .unwrap_or(points[1]);
    let bottom_left = points
        .iter()
        .min_by(|a, b| by_diff(a).total_cmp(&by_diff(b)))
        .copied()
        .unwrap_or(points[3]);

    [top_left, top_right, bottom_right, bottom_left]
}

/// A polygon represented as an ordered list of vertices.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// The vertices of the polygon, in boundary order.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a new polygon from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates a polygon from an imageproc contour.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        let points = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        Self { points }
    }

    /// Calculates the area of the polygon using the shoelace formula.
    ///
    /// Returns 0.0 if the polygon has fewer than 3 points.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Calculates the closed perimeter of the polygon.
    pub fn perimeter(&self) -> f32 {
        let n = self.points.len();
        let mut perimeter = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            perimeter += self.points[i].distance(&self.points[j]);
        }
        perimeter
    }

    /// Approximates the polygon with fewer vertices using the
    /// Douglas-Peucker algorithm, treating the boundary as a closed curve.
    ///
    /// The curve is first rotated so that it starts at the vertex farthest
    /// from the centroid (a corner, for convex shapes), then simplified with
    /// the start vertex pinned at both ends. This mirrors how closed contours
    /// are simplified in receipt boundary detection: a clean rectangle
    /// reduces to exactly its 4 corners.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - The maximum distance between the original curve and the
    ///   simplified curve.
    pub fn approx_polygon(&self, epsilon: f32) -> Polygon {
        if self.points.len() <= 2 {
            return self.clone();
        }

        // Rotate the ring to start at the vertex farthest from the centroid.
        let n = self.points.len();
        let cx = self.points.iter().map(|p| p.x).sum::<f32>() / n as f32;
        let cy = self.points.iter().map(|p| p.y).sum::<f32>() / n as f32;
        let centroid = Point::new(cx, cy);
        let start = self
            .points
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| {
                a.distance(&centroid).total_cmp(&b.distance(&centroid))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        // Close the ring by repeating the start vertex, simplify, then drop
        // the duplicate endpoint.
        let mut ring: Vec<Point> = Vec::with_capacity(n + 1);
        ring.extend_from_slice(&self.points[start..]);
        ring.extend_from_slice(&self.points[..start]);
        ring.push(self.points[start]);

        let mut simplified = Vec::new();
        douglas_peucker(&ring, epsilon, &mut simplified);
        simplified.pop();

        Polygon::new(simplified)
    }

    /// Computes the convex hull of the polygon's vertices using Graham's
    /// scan.
    ///
    /// Returns a clone of the polygon if it has fewer than 3 points.
    fn convex_hull(&self) -> Polygon {
        if self.points.len() < 3 {
            return self.clone();
        }

        let mut points = self.points.clone();

        // Find the point with the lowest y-coordinate (and leftmost if tied)
        let mut start_idx = 0;
        for i in 1..points.len() {
            if points[i].y < points[start_idx].y
                || (points[i].y == points[start_idx].y && points[i].x < points[start_idx].x)
            {
                start_idx = i;
            }
        }
        points.swap(0, start_idx);
        let start_point = points[0];

        // Sort points by polar angle with respect to the start point
        points[1..].sort_by(|a, b| {
            let cross = cross_product(&start_point, a, b);
            if cross == 0.0 {
                let dist_a = (a.x - start_point.x).powi(2) + (a.y - start_point.y).powi(2);
                let dist_b = (b.x - start_point.x).powi(2) + (b.y - start_point.y).powi(2);
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else if cross > 0.0 {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            }
        });

        // Build the hull with a stack, dropping clockwise turns
        let mut hull: Vec<Point> = Vec::new();
        for point in points {
            while hull.len() > 1
                && cross_product(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
            {
                hull.pop();
            }
            hull.push(point);
        }

        Polygon::new(hull)
    }

    /// Computes the minimum-area rectangle enclosing the polygon.
    ///
    /// Uses the rotating calipers algorithm over the convex hull. Degenerate
    /// inputs (fewer than 3 hull points) fall back to the axis-aligned
    /// bounding box.
    pub fn min_area_rect(&self) -> MinAreaRect {
        let hull = self.convex_hull();
        let hull_points = &hull.points;

        if hull_points.len() < 3 {
            let (min_x, max_x) = match self.points.iter().map(|p| p.x).minmax().into_option() {
                Some(range) => range,
                None => return MinAreaRect::default(),
            };
            let (min_y, max_y) = match self.points.iter().map(|p| p.y).minmax().into_option() {
                Some(range) => range,
                None => return MinAreaRect::default(),
            };

            return MinAreaRect {
                center: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
                width: max_x - min_x,
                height: max_y - min_y,
                angle: 0.0,
            };
        }

        let mut min_area = f32::MAX;
        let mut min_rect = MinAreaRect::default();

        let n = hull_points.len();
        for i in 0..n {
            let j = (i + 1) % n;

            let edge_x = hull_points[j].x - hull_points[i].x;
            let edge_y = hull_points[j].y - hull_points[i].y;
            let edge_length = (edge_x * edge_x + edge_y * edge_y).sqrt();

            if edge_length < f32::EPSILON {
                continue;
            }

            // Project all hull points onto the edge direction and its normal
            let nx = edge_x / edge_length;
            let ny = edge_y / edge_length;
            let px = -ny;
            let py = nx;

            let mut min_n = f32::MAX;
            let mut max_n = f32::MIN;
            let mut min_p = f32::MAX;
            let mut max_p = f32::MIN;

            for point in hull_points {
                let proj_n = nx * (point.x - hull_points[i].x) + ny * (point.y - hull_points[i].y);
                min_n = min_n.min(proj_n);
                max_n = max_n.max(proj_n);

                let proj_p = px * (point.x - hull_points[i].x) + py * (point.y - hull_points[i].y);
                min_p = min_p.min(proj_p);
                max_p = max_p.max(proj_p);
            }

            let width = max_n - min_n;
            let height = max_p - min_p;
            let area = width * height;

            if area < min_area {
                min_area = area;

                let center_n = (min_n + max_n) / 2.0;
                let center_p = (min_p + max_p) / 2.0;

                min_rect = MinAreaRect {
                    center: Point::new(
                        hull_points[i].x + center_n * nx + center_p * px,
                        hull_points[i].y + center_n * ny + center_p * py,
                    ),
                    width,
                    height,
                    angle: f32::atan2(ny, nx) * 180.0 / PI,
                };
            }
        }

        min_rect
    }
}

/// Computes the cross product of the vectors `p1->p2` and `p1->p3`.
///
/// Positive for a counter-clockwise turn, negative for clockwise, zero for
/// collinear points.
fn cross_product(p1: &Point, p2: &Point, p3: &Point) -> f32 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

/// Iterative Douglas-Peucker simplification over an open polyline.
///
/// The first and last vertices are always kept.
fn douglas_peucker(points: &[Point], epsilon: f32, result: &mut Vec<Point>) {
    if points.len() <= 2 {
        result.extend_from_slice(points);
        return;
    }

    let mut stack = vec![(0, points.len() - 1)];
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    const MAX_ITERATIONS: usize = 10000;
    let mut iterations = 0;

    while let Some((start, end)) = stack.pop() {
        iterations += 1;
        if iterations > MAX_ITERATIONS {
            keep.iter_mut()
                .take(end + 1)
                .skip(start)
                .for_each(|k| *k = true);
            break;
        }

        if end - start <= 1 {
            continue;
        }

        let mut max_dist = 0.0;
        let mut max_index = start;
        for i in (start + 1)..end {
            let dist = point_to_line_distance(&points[i], &points[start], &points[end]);
            if dist > max_dist {
                max_dist = dist;
                max_index = i;
            }
        }

        if max_dist > epsilon {
            keep[max_index] = true;

            if max_index - start > 1 {
                stack.push((start, max_index));
            }
            if end - max_index > 1 {
                stack.push((max_index, end));
            }
        }
    }

    for (i, &should_keep) in keep.iter().enumerate() {
        if should_keep {
            result.push(points[i]);
        }
    }
}

/// Calculates the perpendicular distance from a point to a line.
fn point_to_line_distance(point: &Point, line_start: &Point, line_end: &Point) -> f32 {
    let a = line_end.y - line_start.y;
    let b = line_start.x - line_end.x;
    let c = line_end.x * line_start.y - line_start.x * line_end.y;

    let denominator = (a * a + b * b).sqrt();
    if denominator == 0.0 {
        // Degenerate line: fall back to point distance so the farthest
        // vertex of a closed ring still splits the segment.
        return point.distance(line_start);
    }

    (a * point.x + b * point.y + c).abs() / denominator
}

/// A rectangle of minimum area enclosing a set of points.
#[derive(Debug, Clone, Default)]
pub struct MinAreaRect {
    /// The center point of the rectangle.
    pub center: Point,
    /// The width of the rectangle.
    pub width: f32,
    /// The height of the rectangle.
    pub height: f32,
    /// The rotation angle of the rectangle in degrees.
    pub angle: f32,
}

impl MinAreaRect {
    /// Returns the four corner points of the rectangle.
    ///
    /// The corners are returned in boundary order but not in any canonical
    /// corner assignment; pass them through [`order_quad`] before use.
    pub fn box_points(&self) -> [Point; 4] {
        let cos_a = (self.angle * PI / 180.0).cos();
        let sin_a = (self.angle * PI / 180.0).sin();

        let w_2 = self.width / 2.0;
        let h_2 = self.height / 2.0;

        let corners = [(-w_2, -h_2), (w_2, -h_2), (w_2, h_2), (-w_2, h_2)];
        corners.map(|(x, y)| {
            Point::new(
                x * cos_a - y * sin_a + self.center.x,
                x * sin_a + y * cos_a + self.center.y,
            )
        })
    }
}
