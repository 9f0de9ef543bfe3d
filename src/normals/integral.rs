//! Summed-area tables over 3-vectors with finite-element counts

use nalgebra::Vector3;

/// Integral image of a vector field
///
/// Non-finite samples contribute nothing to the sums and are excluded from
/// the counts, so a block mean ignores holes in the input.
pub struct IntegralImage {
    width: usize,
    height: usize,
    // (width + 1) x (height + 1), first row and column are zero
    sums: Vec<Vector3<f64>>,
    counts: Vec<u32>,
}

impl IntegralImage {
    /// Build the table from a row-major buffer of `width * height` vectors
    pub fn new(width: usize, height: usize, values: &[Vector3<f32>]) -> Self {
        debug_assert_eq!(values.len(), width * height);
        let stride = width + 1;
        let mut sums = vec![Vector3::zeros(); stride * (height + 1)];
        let mut counts = vec![0u32; stride * (height + 1)];

        for v in 0..height {
            let mut row_sum = Vector3::<f64>::zeros();
            let mut row_count = 0u32;
            for u in 0..width {
                let value = &values[v * width + u];
                if value.iter().all(|c| c.is_finite()) {
                    row_sum += value.cast::<f64>();
                    row_count += 1;
                }
                let above = v * stride + u + 1;
                let here = (v + 1) * stride + u + 1;
                sums[here] = sums[above] + row_sum;
                counts[here] = counts[above] + row_count;
            }
        }

        Self {
            width,
            height,
            sums,
            counts,
        }
    }

    /// Table width (input columns)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Table height (input rows)
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sum and finite count over the block starting at `(u, v)` of size `w x h`
    ///
    /// The block is clipped to the image.
    pub fn block(&self, u: usize, v: usize, w: usize, h: usize) -> (Vector3<f64>, u32) {
        let u0 = u.min(self.width);
        let v0 = v.min(self.height);
        let u1 = (u + w).min(self.width);
        let v1 = (v + h).min(self.height);
        let stride = self.width + 1;

        let a = v0 * stride + u0;
        let b = v0 * stride + u1;
        let c = v1 * stride + u0;
        let d = v1 * stride + u1;

        let sum = self.sums[d] - self.sums[b] - self.sums[c] + self.sums[a];
        let count = self.counts[d] + self.counts[a] - self.counts[b] - self.counts[c];
        (sum, count)
    }
}
