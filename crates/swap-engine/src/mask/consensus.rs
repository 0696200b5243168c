//! Neighbourhood consensus: suppress isolated matches.
//!
//! Photos contain stray pixels that happen to land near the source color far
//! away from the region being recolored. A real match region is at least two
//! pixels wide, so a matching pixel whose eight neighbours all failed to
//! match is treated as noise and scaled by `factor`.

/// Scale isolated non-zero weights by `factor`.
///
/// Neighbours are the 8-connected pixels inside the image; out-of-bounds
/// positions are ignored. Single-pixel images have no neighbours to consult
/// and are returned unchanged.
pub fn suppress_isolated(weights: &[f32], width: usize, height: usize, factor: f32) -> Vec<f32> {
    debug_assert_eq!(weights.len(), width * height);

    if width * height <= 1 || factor >= 1.0 {
        return weights.to_vec();
    }

    let mut out = weights.to_vec();
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if weights[idx] > 0.0 && !has_matching_neighbour(weights, width, height, x, y) {
                out[idx] = weights[idx] * factor;
            }
        }
    }
    out
}

#[inline]
fn has_matching_neighbour(weights: &[f32], width: usize, height: usize, x: usize, y: usize) -> bool {
    let y0 = y.saturating_sub(1);
    let y1 = (y + 1).min(height - 1);
    let x0 = x.saturating_sub(1);
    let x1 = (x + 1).min(width - 1);

    for ny in y0..=y1 {
        for nx in x0..=x1 {
            if (nx, ny) != (x, y) && weights[ny * width + nx] > 0.0 {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_pixel_suppressed() {
        #[rustfmt::skip]
        let weights = vec![
            0.0, 0.0, 0.0,
            0.0, 0.9, 0.0,
            0.0, 0.0, 0.0,
        ];
        let out = suppress_isolated(&weights, 3, 3, 0.0);
        assert!(out.iter().all(|&w| w == 0.0));

        let halved = suppress_isolated(&weights, 3, 3, 0.5);
        assert!((halved[4] - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_neighbour_counts() {
        #[rustfmt::skip]
        let weights = vec![
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        let out = suppress_isolated(&weights, 3, 3, 0.0);
        assert_eq!(out, weights);
    }

    #[test]
    fn test_corner_pixel_uses_in_bounds_neighbours() {
        #[rustfmt::skip]
        let weights = vec![
            0.0, 0.0,
            0.0, 0.7,
        ];
        let out = suppress_isolated(&weights, 2, 2, 0.0);
        assert_eq!(out[3], 0.0);
    }

    #[test]
    fn test_single_pixel_image_untouched() {
        assert_eq!(suppress_isolated(&[1.0], 1, 1, 0.0), vec![1.0]);
    }

    #[test]
    fn test_single_row() {
        let weights = vec![1.0, 0.0, 1.0, 1.0];
        let out = suppress_isolated(&weights, 4, 1, 0.0);
        assert_eq!(out, vec![0.0, 0.0, 1.0, 1.0]);
    }
}
