use ndarray::{Array2, Array3, Zip};

use super::config::HsvInterval;

/// Binary mask of the pixels of an `(h, w, 3)` HSV array inside `interval`.
pub fn in_range(hsv: &Array3<u8>, interval: &HsvInterval) -> Array2<bool> {
    let (h, w, _) = hsv.dim();
    Array2::from_shape_fn((h, w), |(row, col)| {
        interval.contains([hsv[[row, col, 0]], hsv[[row, col, 1]], hsv[[row, col, 2]]])
    })
}

/// Union of the masks of every interval.
pub fn color_mask(hsv: &Array3<u8>, intervals: &[HsvInterval]) -> Array2<bool> {
    let (h, w, _) = hsv.dim();
    let mut mask = Array2::from_elem((h, w), false);

    for interval in intervals {
        let current = in_range(hsv, interval);
        Zip::from(&mut mask)
            .and(&current)
            .for_each(|m, &c| *m = *m || c);
    }

    mask
}
