//! Planar geometry for toolpath analysis
//!
//! Paths are handled as closed rings of straight chords between motion
//! endpoints. Arc centers never contribute vertices.
//!
//! The two capability operations used by the classification engine are
//! [`point_in_polygon`] and [`polygon_contains`]; both are plain ray-casting
//! and segment tests with no external geometry dependency.

use serde::{Deserialize, Serialize};

/// Absolute tolerance for on-segment and area comparisons
pub const EPSILON: f64 = 1e-9;

/// A 2D point in machine coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Whether both coordinates are within `tolerance` of `other`
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Cross product of `o->a` and `o->b`.
///
/// Positive when `o, a, b` turn counter-clockwise in a y-up frame.
pub fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Extents of a point set, `None` when the set is empty
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bb = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &points[1..] {
            bb.min_x = bb.min_x.min(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_x = bb.max_x.max(p.x);
            bb.max_y = bb.max_y.max(p.y);
        }
        Some(bb)
    }

    /// Inclusive box-in-box test
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x - EPSILON
            && other.max_x <= self.max_x + EPSILON
            && other.min_y >= self.min_y - EPSILON
            && other.max_y <= self.max_y + EPSILON
    }
}

/// A closed polygon; the last vertex implicitly connects back to the first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges of the closed ring, including the closing edge
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Arithmetic mean of the vertices (not area weighted)
    pub fn centroid(&self) -> Option<Point> {
        if self.vertices.is_empty() {
            return None;
        }
        let n = self.vertices.len() as f64;
        let (sx, sy) = self
            .vertices
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.vertices)
    }

    /// Shoelace area, positive for counter-clockwise rings in a y-up frame
    pub fn signed_area(&self) -> f64 {
        self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum::<f64>() / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Number of vertices that differ from every earlier vertex by more than `tolerance`
    pub fn distinct_vertex_count(&self, tolerance: f64) -> usize {
        let mut distinct: Vec<Point> = Vec::with_capacity(self.vertices.len());
        for v in &self.vertices {
            if !distinct.iter().any(|d| d.approx_eq(v, tolerance)) {
                distinct.push(*v);
            }
        }
        distinct.len()
    }

    /// Same ring traversed in the opposite direction
    pub fn reversed(&self) -> Polygon {
        let mut vertices = self.vertices.clone();
        vertices.reverse();
        Polygon::new(vertices)
    }

    /// Point-in-polygon test; points on the boundary count as inside
    pub fn contains_point(&self, p: Point) -> bool {
        let n = self.vertices.len();
        if n == 0 {
            return false;
        }
        if self.edges().any(|(a, b)| point_on_segment(p, a, b)) {
            return true;
        }
        if n < 3 {
            return false;
        }

        // Ray casting
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            if ((vi.y > p.y) != (vj.y > p.y))
                && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Strict containment of `inner` by this polygon.
    ///
    /// Every inner vertex and edge midpoint must lie inside or on this
    /// polygon, no inner edge may properly cross one of ours, and our area
    /// must be strictly larger. The area condition keeps the relation
    /// antisymmetric, so identical rings never contain each other.
    pub fn contains_polygon(&self, inner: &Polygon) -> bool {
        if self.vertices.len() < 3 || inner.vertices.len() < 3 {
            return false;
        }
        match (self.bounds(), inner.bounds()) {
            (Some(outer_bb), Some(inner_bb)) if outer_bb.contains(&inner_bb) => {}
            _ => return false,
        }
        if self.area() <= inner.area() + EPSILON {
            return false;
        }
        if !inner.vertices.iter().all(|v| self.contains_point(*v)) {
            return false;
        }
        if !inner
            .edges()
            .all(|(a, b)| self.contains_point(a.midpoint(&b)))
        {
            return false;
        }
        !inner.edges().any(|(a, b)| {
            self.edges()
                .any(|(c, d)| segments_properly_intersect(a, b, c, d))
        })
    }
}

/// Whether `p` lies on the closed segment `a-b`
pub fn point_on_segment(p: Point, a: Point, b: Point) -> bool {
    let len = a.distance_to(&b);
    if len <= EPSILON {
        return p.distance_to(&a) <= EPSILON;
    }
    if (cross(a, b, p) / len).abs() > EPSILON {
        return false;
    }
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

/// Whether segments `a-b` and `c-d` cross at a single interior point.
///
/// Touching at an endpoint or overlapping collinearly is not a proper crossing.
pub fn segments_properly_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    let opposite = |u: f64, v: f64| (u > EPSILON && v < -EPSILON) || (u < -EPSILON && v > EPSILON);
    opposite(d1, d2) && opposite(d3, d4)
}

/// Capability operation: is `point` inside `polygon` (boundary inclusive)
pub fn point_in_polygon(point: Point, polygon: &Polygon) -> bool {
    polygon.contains_point(point)
}

/// Capability operation: does `outer` strictly contain `inner`
pub fn polygon_contains(outer: &Polygon, inner: &Polygon) -> bool {
    outer.contains_polygon(inner)
}
