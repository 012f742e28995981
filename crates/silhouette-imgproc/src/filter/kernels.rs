/// Number of standard deviations covered on each side of a gaussian kernel.
pub const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Smallest sigma that still produces a gaussian kernel; anything below is an identity.
pub const GAUSSIAN_MIN_SIGMA: f32 = 1e-15;

/// Radius of the gaussian kernel used for a given sigma.
///
/// The kernel covers `GAUSSIAN_TRUNCATE` standard deviations on each side, rounded to the
/// nearest pixel: `floor(4 * sigma + 0.5)`.
///
/// # Examples
///
/// ```
/// use silhouette_imgproc::filter::kernels::gaussian_kernel_radius;
///
/// assert_eq!(gaussian_kernel_radius(4.0), 16);
/// assert_eq!(gaussian_kernel_radius(1.0), 4);
/// assert_eq!(gaussian_kernel_radius(0.1), 0);
/// ```
pub fn gaussian_kernel_radius(sigma: f32) -> usize {
    (GAUSSIAN_TRUNCATE * sigma as f64 + 0.5) as usize
}

/// Create a gaussian blur kernel.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel.
/// * `sigma` - The sigma of the gaussian kernel.
///
/// # Returns
///
/// A vector of the kernel, normalized to sum to one.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f32) -> Vec<f32> {
    let mut kernel = Vec::with_capacity(kernel_size);
    if kernel_size == 0 {
        return kernel;
    }

    let mean = (kernel_size - 1) as f32 / 2.0;
    let sigma_sq = sigma * sigma;

    // compute the kernel
    for i in 0..kernel_size {
        let x = i as f32 - mean;
        kernel.push((-(x * x) / (2.0 * sigma_sq)).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().sum::<f32>();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Create the truncated gaussian kernel for `sigma`.
///
/// The kernel has `2 * gaussian_kernel_radius(sigma) + 1` taps. A sigma at or below
/// [`GAUSSIAN_MIN_SIGMA`] yields the identity kernel `[1.0]`.
pub fn gaussian_kernel_1d_truncated(sigma: f32) -> Vec<f32> {
    if sigma <= GAUSSIAN_MIN_SIGMA {
        return vec![1.0];
    }
    let radius = gaussian_kernel_radius(sigma);
    gaussian_kernel_1d(2 * radius + 1, sigma)
}
