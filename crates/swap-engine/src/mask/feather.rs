//! Separable Gaussian feathering of mask edges.

/// Normalized Gaussian kernel of width `2 * radius + 1`, sigma = radius / 2.
///
/// All taps are strictly positive, so blurring never removes a non-zero
/// weight from the support of the mask, only spreads it.
pub fn gaussian_kernel(radius: u32) -> Vec<f32> {
    if radius == 0 {
        return vec![1.0];
    }

    let sigma = radius as f32 / 2.0;
    let denom = 2.0 * sigma * sigma;
    let r = radius as i64;
    let mut kernel: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Blur `weights` with a Gaussian of the given radius.
///
/// Horizontal and vertical passes use edge replication, so a uniformly
/// covered image stays uniformly covered. Results are clamped into 0..=1
/// because rounding in the normalized kernel can overshoot by an ulp.
pub fn feather(weights: &[f32], width: usize, height: usize, radius: u32) -> Vec<f32> {
    debug_assert_eq!(weights.len(), width * height);

    if radius == 0 || weights.iter().all(|&w| w == 0.0) {
        return weights.to_vec();
    }

    let kernel = gaussian_kernel(radius);
    let r = radius as isize;

    // Horizontal pass
    let mut horizontal = vec![0.0f32; weights.len()];
    for y in 0..height {
        let row = &weights[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &tap) in kernel.iter().enumerate() {
                let sx = (x as isize + k as isize - r).clamp(0, width as isize - 1) as usize;
                acc += row[sx] * tap;
            }
            horizontal[y * width + x] = acc;
        }
    }

    // Vertical pass
    let mut out = vec![0.0f32; weights.len()];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, &tap) in kernel.iter().enumerate() {
                let sy = (y as isize + k as isize - r).clamp(0, height as isize - 1) as usize;
                acc += horizontal[sy * width + x] * tap;
            }
            out[y * width + x] = acc.clamp(0.0, 1.0);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        for radius in [1, 2, 5, 16] {
            let kernel = gaussian_kernel(radius);
            assert_eq!(kernel.len(), 2 * radius as usize + 1);
            let sum: f32 = kernel.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "radius {radius}: sum {sum}");
            for i in 0..kernel.len() / 2 {
                assert_eq!(kernel[i], kernel[kernel.len() - 1 - i]);
            }
            assert!(kernel.iter().all(|&k| k > 0.0));
        }
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let weights = vec![0.0, 0.3, 1.0, 0.0];
        assert_eq!(feather(&weights, 2, 2, 0), weights);
    }

    #[test]
    fn test_uniform_mask_is_preserved() {
        let weights = vec![1.0; 25];
        let out = feather(&weights, 5, 5, 3);
        assert!(out.iter().all(|&w| (w - 1.0).abs() < 1e-5));
    }

    #[test]
    fn test_edge_is_softened() {
        // Left half covered, right half clear
        let (w, h) = (8, 4);
        let weights: Vec<f32> = (0..w * h)
            .map(|i| if i % w < w / 2 { 1.0 } else { 0.0 })
            .collect();
        let out = feather(&weights, w, h, 2);

        let row: Vec<f32> = out[..w].to_vec();
        // Inside pixel just left of the edge is reduced, outside pixel just right is raised
        assert!(row[3] < 1.0 && row[3] > 0.5);
        assert!(row[4] > 0.0 && row[4] < 0.5);
        // Far pixels keep their state
        assert!(row[0] > 0.99);
        assert!(row[7] < 0.01);
        assert!(out.iter().all(|w| (0.0..=1.0).contains(w)));
    }

    #[test]
    fn test_radius_larger_than_image() {
        let weights = vec![0.0, 1.0, 0.0];
        let out = feather(&weights, 3, 1, 10);
        assert!(out.iter().all(|&w| w > 0.0 && w <= 1.0));
    }
}
