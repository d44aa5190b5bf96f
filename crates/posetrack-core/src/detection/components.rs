use std::collections::HashMap;

use ndarray::Array2;

/// Statistics for a single 8-connected component.
#[derive(Clone, Debug)]
pub struct ComponentStats {
    /// Label of this component in [`Labeling::labels`].
    pub label: u32,
    /// Number of pixels in the component.
    pub pixel_count: usize,
    /// Bounding box: (min_row, max_row, min_col, max_col).
    pub bbox: (usize, usize, usize, usize),
    /// First pixel of the component in raster order, as (row, col).
    pub start: (usize, usize),
}

/// Label image plus per-component statistics.
#[derive(Clone, Debug)]
pub struct Labeling {
    /// 0 for background, otherwise the component label.
    pub labels: Array2<u32>,
    /// Components in raster order of their first pixel.
    pub components: Vec<ComponentStats>,
}

/// Label the 8-connected components of a binary mask using two-pass
/// labeling with union-find.
pub fn connected_components(mask: &Array2<bool>) -> Labeling {
    let (h, w) = mask.dim();
    let mut labels = Array2::<u32>::zeros((h, w));
    if h == 0 || w == 0 {
        return Labeling {
            labels,
            components: Vec::new(),
        };
    }

    let mut next_label: u32 = 1;
    // Union-find parent array. Index 0 unused; labels start at 1.
    let mut parent: Vec<u32> = vec![0; h * w / 2 + 2];

    // Pass 1: assign provisional labels from the already-visited neighbours
    // (left, up-left, up, up-right).
    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }

            let mut neighbours = [0u32; 4];
            if col > 0 {
                neighbours[0] = labels[[row, col - 1]];
            }
            if row > 0 {
                if col > 0 {
                    neighbours[1] = labels[[row - 1, col - 1]];
                }
                neighbours[2] = labels[[row - 1, col]];
                if col + 1 < w {
                    neighbours[3] = labels[[row - 1, col + 1]];
                }
            }

            match neighbours.iter().copied().filter(|&l| l > 0).min() {
                None => {
                    if next_label as usize >= parent.len() {
                        parent.resize(parent.len() * 2, 0);
                    }
                    parent[next_label as usize] = next_label;
                    labels[[row, col]] = next_label;
                    next_label += 1;
                }
                Some(smallest) => {
                    labels[[row, col]] = smallest;
                    for &other in neighbours.iter().filter(|&&l| l > smallest) {
                        union(&mut parent, smallest, other);
                    }
                }
            }
        }
    }

    // Flatten parent references.
    for i in 1..next_label as usize {
        parent[i] = find(&parent, i as u32);
    }

    // Pass 2: resolve labels and collect stats.
    let mut stats_map = HashMap::<u32, ComponentStats>::new();

    for row in 0..h {
        for col in 0..w {
            let lbl = labels[[row, col]];
            if lbl == 0 {
                continue;
            }
            let root = parent[lbl as usize];
            labels[[row, col]] = root;

            let entry = stats_map.entry(root).or_insert(ComponentStats {
                label: root,
                pixel_count: 0,
                bbox: (row, row, col, col),
                start: (row, col),
            });

            entry.pixel_count += 1;
            entry.bbox.0 = entry.bbox.0.min(row);
            entry.bbox.1 = entry.bbox.1.max(row);
            entry.bbox.2 = entry.bbox.2.min(col);
            entry.bbox.3 = entry.bbox.3.max(col);
        }
    }

    let mut components: Vec<ComponentStats> = stats_map.into_values().collect();
    components.sort_unstable_by_key(|c| c.start);
    Labeling { labels, components }
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        // Merge larger root into smaller root to keep labels consistent.
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
