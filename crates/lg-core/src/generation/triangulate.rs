//! Delaunay triangulation of room centers (Bowyer–Watson)
//!
//! Returns index pairs into the input slice. The pairs are the candidate
//! edges the spanning tree is later selected from.

use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace};

use crate::grid::GridPos;

/// Relative tolerance for the in-circumcircle test
const CIRCLE_EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, Copy)]
struct Triangle {
    v: [usize; 3],
    cx: f64,
    cy: f64,
    r2: f64,
}

impl Triangle {
    fn new(v: [usize; 3], pts: &[(f64, f64)]) -> Self {
        let (ax, ay) = pts[v[0]];
        let (bx, by) = pts[v[1]];
        let (cx, cy) = pts[v[2]];
        let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));

        if d.abs() < f64::EPSILON {
            // Degenerate: treat as containing everything so it gets replaced
            return Self {
                v,
                cx: (ax + bx + cx) / 3.0,
                cy: (ay + by + cy) / 3.0,
                r2: f64::INFINITY,
            };
        }

        let a2 = ax * ax + ay * ay;
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d;
        let uy = (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d;
        let r2 = (ax - ux) * (ax - ux) + (ay - uy) * (ay - uy);
        Self {
            v,
            cx: ux,
            cy: uy,
            r2,
        }
    }

    fn circumcircle_contains(&self, (px, py): (f64, f64)) -> bool {
        let d2 = (px - self.cx) * (px - self.cx) + (py - self.cy) * (py - self.cy);
        d2 < self.r2 * (1.0 - CIRCLE_EPSILON)
    }

    fn edges(&self) -> [(usize, usize); 3] {
        [
            ordered(self.v[0], self.v[1]),
            ordered(self.v[1], self.v[2]),
            ordered(self.v[2], self.v[0]),
        ]
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Candidate edges over `points`, as sorted `(low, high)` index pairs
///
/// - fewer than 2 points: no edges
/// - exactly 2 points: the single edge between them
/// - all points collinear: consecutive points (sorted by x, then y) are chained
///
/// A point the triangulation leaves isolated is joined to its nearest
/// neighbour, so the candidate graph always spans every point.
pub fn delaunay_edges(points: &[GridPos]) -> Vec<(usize, usize)> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    if n == 2 {
        return vec![(0, 1)];
    }

    let mut edges: HashSet<(usize, usize)> = bowyer_watson(points).into_iter().collect();

    if edges.is_empty() {
        debug!("{} collinear points, chaining by position", n);
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| (points[i].x, points[i].y));
        edges.extend(order.windows(2).map(|w| ordered(w[0], w[1])));
    }

    let mut degree = vec![0usize; n];
    for &(a, b) in &edges {
        degree[a] += 1;
        degree[b] += 1;
    }
    for i in 0..n {
        if degree[i] > 0 {
            continue;
        }
        let nearest = (0..n)
            .filter(|&j| j != i)
            .min_by_key(|&j| (points[i].distance_sq(points[j]), j));
        if let Some(j) = nearest {
            trace!("point {} isolated, joining to {}", i, j);
            edges.insert(ordered(i, j));
            degree[i] += 1;
            degree[j] += 1;
        }
    }

    let mut edges: Vec<(usize, usize)> = edges.into_iter().collect();
    edges.sort_unstable();
    edges
}

/// Triangle edges not touching the super-triangle (unsorted)
fn bowyer_watson(points: &[GridPos]) -> Vec<(usize, usize)> {
    let n = points.len();
    let mut pts: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for &(x, y) in &pts {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    // Super-triangle vertices are n, n + 1, n + 2
    pts.push((mid_x - 20.0 * span, mid_y - span));
    pts.push((mid_x, mid_y + 20.0 * span));
    pts.push((mid_x + 20.0 * span, mid_y - span));

    let mut triangles = vec![Triangle::new([n, n + 1, n + 2], &pts)];

    for i in 0..n {
        let p = pts[i];
        let (bad, good): (Vec<Triangle>, Vec<Triangle>) = triangles
            .into_iter()
            .partition(|t| t.circumcircle_contains(p));
        triangles = good;

        // Boundary of the cavity: edges used by exactly one bad triangle
        let mut counts: HashMap<(usize, usize), u32> = HashMap::new();
        for t in &bad {
            for e in t.edges() {
                *counts.entry(e).or_insert(0) += 1;
            }
        }
        for t in &bad {
            for (a, b) in t.edges() {
                if counts.get(&(a, b)) == Some(&1) {
                    triangles.push(Triangle::new([a, b, i], &pts));
                }
            }
        }
    }

    triangles
        .iter()
        .filter(|t| t.r2.is_finite() && t.v.iter().all(|&v| v < n))
        .flat_map(|t| t.edges())
        .collect()
}
