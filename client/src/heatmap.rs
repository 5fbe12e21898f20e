use lasithi_shared::style::{ColorRamp, Rgba};

/// Additive density field a heatmap layer is rasterized into before
/// colorization. Grid coordinates are device pixels.
pub struct DensityGrid {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl DensityGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    /// Splat one point with a smooth radial kernel: full `amount` at the
    /// center falling off quadratically to zero at `radius`. Points whose
    /// footprint misses the grid contribute nothing.
    pub fn splat(&mut self, cx: f64, cy: f64, radius: f64, amount: f64) {
        if radius <= 0.0 || amount <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }

        let x0 = (cx - radius).floor().max(0.0) as usize;
        let y0 = (cy - radius).floor().max(0.0) as usize;
        let x1 = ((cx + radius).ceil() + 1.0).clamp(0.0, self.width as f64) as usize;
        let y1 = ((cy + radius).ceil() + 1.0).clamp(0.0, self.height as f64) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let r2 = radius * radius;
        for y in y0..y1 {
            let dy = y as f64 + 0.5 - cy;
            let row = y * self.width;
            for x in x0..x1 {
                let dx = x as f64 + 0.5 - cx;
                let d2 = dx * dx + dy * dy;
                if d2 < r2 {
                    let t = 1.0 - d2 / r2;
                    self.values[row + x] += (amount * t * t) as f32;
                }
            }
        }
    }

    /// Colorize the accumulated densities into RGBA bytes. Alpha comes from
    /// the gradient (transparent at zero density) scaled by the layer
    /// opacity.
    pub fn colorize(&self, lut: &ColorLut, opacity: f64) -> Vec<u8> {
        let opacity = opacity.clamp(0.0, 1.0);
        let mut out = Vec::with_capacity(self.values.len() * 4);
        for &density in &self.values {
            let color = lut.lookup(f64::from(density));
            out.push(color.r);
            out.push(color.g);
            out.push(color.b);
            out.push((f64::from(color.a) * opacity).round() as u8);
        }
        out
    }
}

#[cfg(test)]
impl DensityGrid {
    fn value_at(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }
}

/// Precomputed 256-entry gradient table so per-pixel colorization is a
/// single indexed load instead of a stop search.
pub struct ColorLut {
    table: Vec<Rgba>,
}

impl ColorLut {
    pub fn build(ramp: &ColorRamp) -> Self {
        let table = (0..256).map(|i| ramp.eval(i as f64 / 255.0)).collect();
        Self { table }
    }

    pub fn lookup(&self, density: f64) -> Rgba {
        let index = (density.clamp(0.0, 1.0) * 255.0).round() as usize;
        self.table[index]
    }
}
