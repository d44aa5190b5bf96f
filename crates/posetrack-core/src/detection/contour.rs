//! External contours of a binary mask and their polygon moments.
//!
//! Each 8-connected component's outer border is traced into a closed polygon
//! through the centers of its border pixels. Area and centroid come from the
//! polygon, so a single pixel or a one-pixel-wide line has zero area.

use ndarray::Array2;

use crate::geometry::PixelPoint;

use super::components::{connected_components, ComponentStats};

/// Neighbour offsets `(dx, dy)`, clockwise on screen starting east.
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Index of west in [`DIRECTIONS`].
const WEST: usize = 4;

/// Raw polygon moments up to first order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Unsigned polygon area.
    pub fn area(&self) -> f64 {
        self.m00.abs()
    }

    /// `(m10/m00, m01/m00)` truncated toward zero, or `None` for zero area.
    pub fn centroid(&self) -> Option<PixelPoint> {
        if self.m00.abs() <= f64::EPSILON {
            return None;
        }
        Some(PixelPoint::new(
            (self.m10 / self.m00) as i32,
            (self.m01 / self.m00) as i32,
        ))
    }
}

/// One external region of a mask.
#[derive(Clone, Debug)]
pub struct Region {
    /// Outer border as `(x, y)` pixel coordinates, in tracing order.
    pub contour: Vec<(i32, i32)>,
    pub moments: Moments,
    pub stats: ComponentStats,
}

impl Region {
    pub fn area(&self) -> f64 {
        self.moments.area()
    }
}

/// External regions of `mask`: components that do not sit inside a hole of
/// another component.
///
/// Regions are listed in reverse raster order of their first pixel, so the
/// bottom-most region comes first, the order OpenCV's external contour
/// retrieval reports them in.
pub fn external_regions(mask: &Array2<bool>) -> Vec<Region> {
    let labeling = connected_components(mask);

    let regions: Vec<Region> = labeling
        .components
        .into_iter()
        .map(|stats| {
            let contour = trace_outer_border(&labeling.labels, stats.label, stats.start);
            let moments = polygon_moments(&contour);
            Region {
                contour,
                moments,
                stats,
            }
        })
        .collect();

    let nested: Vec<bool> = regions
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            regions
                .iter()
                .enumerate()
                .any(|(j, outer)| i != j && encloses(outer, inner))
        })
        .collect();

    regions
        .into_iter()
        .zip(nested)
        .filter_map(|(region, is_nested)| (!is_nested).then_some(region))
        .rev()
        .collect()
}

/// Trace the outer border of component `label`, starting at its first
/// raster pixel `start = (row, col)`.
pub fn trace_outer_border(labels: &Array2<u32>, label: u32, start: (usize, usize)) -> Vec<(i32, i32)> {
    let (h, w) = labels.dim();
    let is_member = |(x, y): (i32, i32)| {
        x >= 0 && y >= 0 && (x as usize) < w && (y as usize) < h && labels[[y as usize, x as usize]] == label
    };

    // Clockwise search around `p` beginning at direction `from`.
    let next_member = |p: (i32, i32), from: usize| {
        (0..8).map(|k| (from + k) % 8).find_map(|d| {
            let q = (p.0 + DIRECTIONS[d].0, p.1 + DIRECTIONS[d].1);
            is_member(q).then_some((q, d))
        })
    };

    let origin = (start.1 as i32, start.0 as i32);
    // Nothing lies west of or above the first raster pixel.
    let Some((second, first_dir)) = next_member(origin, WEST) else {
        return vec![origin];
    };

    let mut points = vec![origin];
    let (mut current, mut dir) = (second, first_dir);
    loop {
        // Resume the search at the background pixel checked just before
        // `current` was found.
        let backtrack = (dir + 6 - (dir & 1)) % 8;
        let Some((next, next_dir)) = next_member(current, backtrack) else {
            break;
        };
        if current == origin && next == second {
            break;
        }
        points.push(current);
        current = next;
        dir = next_dir;
    }
    points
}

/// Area and first-order moments of a closed polygon (Green's theorem).
pub fn polygon_moments(points: &[(i32, i32)]) -> Moments {
    let n = points.len();
    if n < 3 {
        return Moments::default();
    }

    let (mut a00, mut a10, mut a01) = (0.0, 0.0, 0.0);
    for i in 0..n {
        let (x0, y0) = (points[i].0 as f64, points[i].1 as f64);
        let (x1, y1) = (points[(i + 1) % n].0 as f64, points[(i + 1) % n].1 as f64);
        let cross = x0 * y1 - x1 * y0;
        a00 += cross;
        a10 += cross * (x0 + x1);
        a01 += cross * (y0 + y1);
    }

    Moments {
        m00: a00 / 2.0,
        m10: a10 / 6.0,
        m01: a01 / 6.0,
    }
}

/// Whether `outer`'s border polygon encloses `inner`'s first pixel.
fn encloses(outer: &Region, inner: &Region) -> bool {
    let (o_min_row, o_max_row, o_min_col, o_max_col) = outer.stats.bbox;
    let (i_min_row, i_max_row, i_min_col, i_max_col) = inner.stats.bbox;
    let within_bbox = o_min_row < i_min_row
        && i_max_row < o_max_row
        && o_min_col < i_min_col
        && i_max_col < o_max_col;
    if !within_bbox || outer.area() <= f64::EPSILON {
        return false;
    }

    let (row, col) = inner.stats.start;
    point_in_polygon(col as f64, row as f64, &outer.contour)
}

/// Even-odd ray casting test.
fn point_in_polygon(px: f64, py: f64, polygon: &[(i32, i32)]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (polygon[i].0 as f64, polygon[i].1 as f64);
        let (xj, yj) = (polygon[j].0 as f64, polygon[j].1 as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
