/// Shapes of morphological `Kernels`.
///
/// Defines the geometry of the kernel used in morphological operations.
/// All kernels are centered at their geometric center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelShape {
    /// A square box structuring element of side `size`.
    Box {
        /// The side length of the square kernel (size x size).
        size: usize,
    },

    /// A cross (plus) shaped structuring element of side `size`.
    Cross {
        /// The side length of the square cross kernel (size x size).
        size: usize,
    },

    /// A filled disk of the given radius.
    ///
    /// The kernel is `2 * radius + 1` pixels wide and a cell at offset `(dx, dy)` from the
    /// center is active when `dx^2 + dy^2 <= radius^2`.
    Disk {
        /// The radius of the disk in pixels.
        radius: usize,
    },
}

/// A morphological structuring element.
///
/// Stores a binary mask where `true` marks the offsets included in the operation.
///
/// # Example
///
/// ```rust
/// use silhouette_imgproc::morphology::{Kernel, KernelShape};
///
/// let kernel = Kernel::new(KernelShape::Disk { radius: 1 });
/// assert_eq!(kernel.width(), 3);
/// assert_eq!(kernel.height(), 3);
/// assert_eq!(kernel.pad(), (1, 1));
/// assert_eq!(kernel.num_active(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    data: Vec<bool>,
    width: usize,
    height: usize,
}

impl Kernel {
    /// Create a morphological kernel from a shape.
    pub fn new(shape: KernelShape) -> Self {
        match shape {
            KernelShape::Box { size } => box_kernel(size),
            KernelShape::Cross { size } => cross_kernel(size),
            KernelShape::Disk { radius } => disk_kernel(radius),
        }
    }

    /// Width of the kernel in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the kernel in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The kernel mask in row-major order.
    pub fn data(&self) -> &[bool] {
        &self.data
    }

    /// Distance from the kernel anchor to its top and left edges, as `(pad_h, pad_w)`.
    pub fn pad(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    /// Number of active cells.
    pub fn num_active(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Whether the kernel has no active cell.
    pub fn is_empty(&self) -> bool {
        self.num_active() == 0
    }

    /// The first and last active column of every kernel row, `None` for empty rows.
    pub fn row_spans(&self) -> Vec<Option<(usize, usize)>> {
        if self.width == 0 {
            return vec![None; self.height];
        }
        self.data
            .chunks_exact(self.width)
            .map(|row| {
                let first = row.iter().position(|&v| v)?;
                let last = row.iter().rposition(|&v| v)?;
                Some((first, last))
            })
            .collect()
    }

    /// Whether the active cells of every row form a single contiguous run.
    pub fn is_row_convex(&self) -> bool {
        if self.width == 0 {
            return true;
        }
        self.data
            .chunks_exact(self.width)
            .zip(self.row_spans())
            .all(|(row, span)| match span {
                Some((first, last)) => row[first..=last].iter().all(|&v| v),
                None => true,
            })
    }
}

fn box_kernel(size: usize) -> Kernel {
    Kernel {
        data: vec![true; size * size],
        width: size,
        height: size,
    }
}

fn cross_kernel(size: usize) -> Kernel {
    let mid = size / 2;
    let data = (0..size * size)
        .map(|i| i / size == mid || i % size == mid)
        .collect();
    Kernel {
        data,
        width: size,
        height: size,
    }
}

fn disk_kernel(radius: usize) -> Kernel {
    let size = 2 * radius + 1;
    let r = radius as isize;
    let mut data = Vec::with_capacity(size * size);
    for dy in -r..=r {
        for dx in -r..=r {
            data.push(dx * dx + dy * dy <= r * r);
        }
    }
    Kernel {
        data,
        width: size,
        height: size,
    }
}
