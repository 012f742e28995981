use silhouette_image::{Image, ImageSize};

use crate::{error::OverlayError, pipeline::OverlayOutput};

/// The four panels of the overlay figure, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// The decoded source image.
    Original,
    /// The thresholded mask.
    Binary,
    /// The padded and dilated mask.
    Dilated,
    /// The RGBA composite.
    Logo,
}

impl Panel {
    /// All panels, left to right then top to bottom.
    pub const ALL: [Panel; 4] = [Panel::Original, Panel::Binary, Panel::Dilated, Panel::Logo];

    /// The title shown above the panel.
    pub fn title(self) -> &'static str {
        match self {
            Panel::Original => "Original Image",
            Panel::Binary => "Binary Image",
            Panel::Dilated => "Dilated Image",
            Panel::Logo => "Logo Image",
        }
    }

    // (column, row) in the 2x2 grid
    fn cell(self) -> (usize, usize) {
        match self {
            Panel::Original => (0, 0),
            Panel::Binary => (1, 0),
            Panel::Dilated => (0, 1),
            Panel::Logo => (1, 1),
        }
    }
}

/// Appearance of the rendered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureStyle {
    /// Space around and between the panels, in pixels.
    pub margin: usize,
    /// Color of the figure behind and between the panels.
    pub background: [u8; 3],
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            margin: 16,
            background: [255, 255, 255],
        }
    }
}

/// Placement of the panels of the overlay figure.
///
/// All panels share the same axis limits, large enough for both the source and the padded
/// mask. Images are drawn from the top-left corner of their panel, so the unpadded images
/// leave the right and bottom of their panel empty.
///
/// # Example
///
/// ```
/// use silhouette_image::ImageSize;
/// use silhouette_overlay::figure::{FigureLayout, FigureStyle, Panel};
///
/// let layout = FigureLayout::new([10, 6].into(), [20, 16].into());
/// assert_eq!(layout.limits(), ImageSize { width: 20, height: 16 });
///
/// let style = FigureStyle { margin: 2, ..Default::default() };
/// assert_eq!(layout.panel_origin(Panel::Logo, &style), (24, 20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FigureLayout {
    limits: ImageSize,
}

impl FigureLayout {
    /// Create the layout for a source image and its padded mask.
    pub fn new(source: ImageSize, padded: ImageSize) -> Self {
        Self {
            limits: ImageSize {
                width: source.width.max(padded.width),
                height: source.height.max(padded.height),
            },
        }
    }

    /// The extent shared by every panel.
    pub fn limits(&self) -> ImageSize {
        self.limits
    }

    /// The size of the whole figure.
    pub fn figure_size(&self, style: &FigureStyle) -> ImageSize {
        ImageSize {
            width: 2 * self.limits.width + 3 * style.margin,
            height: 2 * self.limits.height + 3 * style.margin,
        }
    }

    /// The top-left corner of a panel in the figure, as `(x, y)`.
    pub fn panel_origin(&self, panel: Panel, style: &FigureStyle) -> (usize, usize) {
        let (col, row) = panel.cell();
        (
            style.margin + col * (self.limits.width + style.margin),
            style.margin + row * (self.limits.height + style.margin),
        )
    }
}

/// Render the four stages of an overlay run into one RGB image.
///
/// The source is drawn as is, both masks in gray levels (`false` black, `true` white) and
/// the composite blended over the figure background by its alpha channel. Titles are
/// available through [`Panel::title`] and are not drawn.
pub fn render_figure(
    output: &OverlayOutput,
    style: &FigureStyle,
) -> Result<Image<u8, 3>, OverlayError> {
    let layout = FigureLayout::new(output.source.size(), output.dilated.size());
    let size = layout.figure_size(style);
    let mut canvas = Image::new(size, style.background.repeat(size.num_pixels()))?;

    for panel in Panel::ALL {
        let origin = layout.panel_origin(panel, style);
        match panel {
            Panel::Original => draw_panel(&mut canvas, origin, &output.source, |px| {
                [px[0], px[1], px[2]]
            }),
            Panel::Binary => draw_panel(&mut canvas, origin, &output.binary, mask_to_rgb),
            Panel::Dilated => draw_panel(&mut canvas, origin, &output.dilated, mask_to_rgb),
            Panel::Logo => draw_panel(&mut canvas, origin, &output.composite, |px| {
                let alpha = px[3];
                [
                    blend(px[0], style.background[0], alpha),
                    blend(px[1], style.background[1], alpha),
                    blend(px[2], style.background[2], alpha),
                ]
            }),
        }
    }

    Ok(canvas)
}

/// Convert a mask into an 8-bit grayscale image, `false` black and `true` white.
pub fn mask_to_gray8(mask: &Image<bool, 1>) -> Image<u8, 1> {
    mask.map(|&v| if v { 255 } else { 0 })
}

fn mask_to_rgb(px: &[bool]) -> [u8; 3] {
    if px[0] {
        [255; 3]
    } else {
        [0; 3]
    }
}

fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
}

// panels never exceed the shared limits, so the whole panel lies inside the canvas
fn draw_panel<T, const C: usize>(
    canvas: &mut Image<u8, 3>,
    origin: (usize, usize),
    panel: &Image<T, C>,
    to_rgb: impl Fn(&[T]) -> [u8; 3],
) {
    let width = panel.width();
    if width == 0 {
        return;
    }

    let canvas_width = canvas.width();
    let (x0, y0) = origin;
    let canvas_data = canvas.as_slice_mut();

    for (y, row) in panel.as_slice().chunks_exact(width * C).enumerate() {
        let start = ((y0 + y) * canvas_width + x0) * 3;
        let dst_row = &mut canvas_data[start..start + width * 3];
        for (dst_px, src_px) in dst_row.chunks_exact_mut(3).zip(row.chunks_exact(C)) {
            dst_px.copy_from_slice(&to_rgb(src_px));
        }
    }
}
