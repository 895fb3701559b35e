use image::RgbaImage;

/// Blur radius applied to face regions in [`crate::ObscureMode::Blur`].
pub const BLUR_RADIUS: u32 = 40;

/// Running per-channel column sums over a vertical band of rows.
///
/// Only one row of sums is kept, so memory is linear in the image width.
/// `columns[x]` holds the sum over rows `[top, bottom)` of the horizontal
/// window sums centered on `x`.
struct ColumnWindow<'a> {
    image: &'a RgbaImage,
    radius: u32,
    top: u32,
    bottom: u32,
    columns: Vec<[u64; 4]>,
    prefix: Vec<[u64; 4]>,
}

impl<'a> ColumnWindow<'a> {
    fn new(image: &'a RgbaImage, radius: u32) -> Self {
        let width = image.width() as usize;
        Self {
            image,
            radius,
            top: 0,
            bottom: 0,
            columns: vec![[0; 4]; width],
            prefix: vec![[0; 4]; width + 1],
        }
    }

    /// Add (`add = true`) or remove the horizontal window sums of row `y`.
    fn accumulate_row(&mut self, y: u32, add: bool) {
        let width = self.image.width();
        for x in 0..width {
            let pixel = self.image.get_pixel(x, y);
            let (prev, next) = (self.prefix[x as usize], &mut self.prefix[x as usize + 1]);
            for c in 0..4 {
                next[c] = prev[c] + u64::from(pixel.0[c]);
            }
        }
        for x in 0..width {
            let x0 = x.saturating_sub(self.radius) as usize;
            let x1 = x.saturating_add(self.radius).min(width - 1) as usize + 1;
            let column = &mut self.columns[x as usize];
            for c in 0..4 {
                let sum = self.prefix[x1][c] - self.prefix[x0][c];
                if add {
                    column[c] += sum;
                } else {
                    column[c] -= sum;
                }
            }
        }
    }

    /// Slide the band to cover rows `[y0, y1)`. Both bounds only move down.
    fn slide_to(&mut self, y0: u32, y1: u32) {
        while self.bottom < y1 {
            self.accumulate_row(self.bottom, true);
            self.bottom += 1;
        }
        while self.top < y0 {
            self.accumulate_row(self.top, false);
            self.top += 1;
        }
    }
}

/// Box blur: each output pixel is the unweighted per-channel mean of the
/// `(2r+1)²` square around it, clipped to the buffer (edge pixels average
/// over fewer neighbours). Means are truncated to integers.
///
/// The input is never modified. A radius of 0 returns an identical copy.
pub fn box_blur(image: &RgbaImage, radius: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    if radius == 0 || width == 0 || height == 0 {
        return image.clone();
    }

    let mut window = ColumnWindow::new(image, radius);
    let mut blurred = RgbaImage::new(width, height);

    for y in 0..height {
        let y0 = y.saturating_sub(radius);
        let y1 = y.saturating_add(radius).min(height - 1) + 1;
        window.slide_to(y0, y1);

        for x in 0..width {
            let x0 = x.saturating_sub(radius);
            let x1 = x.saturating_add(radius).min(width - 1) + 1;
            let count = u64::from(x1 - x0) * u64::from(y1 - y0);
            let sums = window.columns[x as usize];
            blurred.get_pixel_mut(x, y).0 = sums.map(|sum| (sum / count) as u8);
        }
    }

    blurred
}
