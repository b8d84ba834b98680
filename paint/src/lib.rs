use image::{Rgba, RgbaImage};

#[derive(Debug, thiserror::Error)]
pub enum PaintError {
    #[error("seed ({0}, {1}) outside canvas bounds")]
    SeedOutOfBounds(u32, u32),
    #[error("invalid canvas dimensions")]
    Dimensions,
}

// Full length of the RGB cube diagonal; any tolerance at or above this matches
// every color.
pub const TOLERANCE_MAX: f32 = 441.7;

pub const HISTORY_DEPTH_DEFAULT: usize = 32;
pub const BRUSH_RADIUS_MAX: u32 = 128;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMetric {
    pub weights: [f32; 4],
}

impl ColorMetric {
    // Plain Euclidean distance over RGB; alpha does not participate.
    pub fn rgb() -> Self {
        Self {
            weights: [1.0, 1.0, 1.0, 0.0],
        }
    }

    pub fn weighted(weights: [f32; 4]) -> Self {
        Self { weights }
    }

    pub fn distance(&self, a: Rgba<u8>, b: Rgba<u8>) -> f32 {
        let mut sum = 0.0f32;
        for channel in 0..4 {
            let delta = a.0[channel] as f32 - b.0[channel] as f32;
            sum += self.weights[channel] * delta * delta;
        }
        sum.sqrt()
    }

    // Inclusive boundary: a distance exactly equal to the tolerance matches.
    pub fn within(&self, a: Rgba<u8>, b: Rgba<u8>, tolerance: f32) -> bool {
        self.distance(a, b) <= tolerance
    }
}

impl Default for ColorMetric {
    fn default() -> Self {
        Self::rgb()
    }
}

pub fn flood_fill(
    canvas: &mut RgbaImage,
    seed_x: u32,
    seed_y: u32,
    fill: Rgba<u8>,
    tolerance: f32,
) -> Result<usize, PaintError> {
    flood_fill_with(canvas, seed_x, seed_y, fill, tolerance, &ColorMetric::rgb())
}

// Scanline fill over an explicit span stack. Membership is always measured
// against the seed color captured before the first write, never against
// already-recolored pixels.
pub fn flood_fill_with(
    canvas: &mut RgbaImage,
    seed_x: u32,
    seed_y: u32,
    fill: Rgba<u8>,
    tolerance: f32,
    metric: &ColorMetric,
) -> Result<usize, PaintError> {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(PaintError::Dimensions);
    }
    if seed_x >= width || seed_y >= height {
        return Err(PaintError::SeedOutOfBounds(seed_x, seed_y));
    }
    let tolerance = tolerance.max(0.0);
    let seed = *canvas.get_pixel(seed_x, seed_y);
    if metric.within(fill, seed, tolerance) {
        // Recoloring with an in-tolerance color would keep matching the region
        // it just painted; the fill degenerates to a no-op instead.
        return Ok(0);
    }

    let mut visited = vec![false; (width as usize) * (height as usize)];
    let mut stack = vec![(seed_x, seed_y)];
    let mut recolored = 0usize;

    let index = |x: u32, y: u32| (y as usize) * (width as usize) + x as usize;

    while let Some((x, y)) = stack.pop() {
        if visited[index(x, y)] || !metric.within(*canvas.get_pixel(x, y), seed, tolerance) {
            continue;
        }
        let mut left = x;
        while left > 0
            && !visited[index(left - 1, y)]
            && metric.within(*canvas.get_pixel(left - 1, y), seed, tolerance)
        {
            left -= 1;
        }
        let mut right = x;
        while right + 1 < width
            && !visited[index(right + 1, y)]
            && metric.within(*canvas.get_pixel(right + 1, y), seed, tolerance)
        {
            right += 1;
        }
        for px in left..=right {
            visited[index(px, y)] = true;
            canvas.put_pixel(px, y, fill);
            recolored += 1;
        }
        // One representative per contiguous candidate sub-span above and below;
        // the span walk when it pops rediscovers the rest.
        for ny in neighbor_rows(y, height) {
            let mut in_span = false;
            for px in left..=right {
                let candidate = !visited[index(px, ny)]
                    && metric.within(*canvas.get_pixel(px, ny), seed, tolerance);
                if candidate && !in_span {
                    stack.push((px, ny));
                }
                in_span = candidate;
            }
        }
    }
    Ok(recolored)
}

fn neighbor_rows(y: u32, height: u32) -> impl Iterator<Item = u32> {
    let above = y.checked_sub(1);
    let below = if y + 1 < height { Some(y + 1) } else { None };
    above.into_iter().chain(below)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushEdge {
    Hard,
    Feathered,
}

// Stamp a round dab. Out-of-bounds coverage is clipped; a feathered edge fades
// linearly from center to rim.
pub fn stamp_brush(
    canvas: &mut RgbaImage,
    cx: i32,
    cy: i32,
    radius: u32,
    color: Rgba<u8>,
    edge: BrushEdge,
) {
    let radius = radius.min(BRUSH_RADIUS_MAX) as i32;
    let (width, height) = canvas.dimensions();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let x = cx + dx;
            let y = cy + dy;
            if x < 0 || y < 0 || x as u32 >= width || y as u32 >= height {
                continue;
            }
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if dist > radius as f32 {
                continue;
            }
            let alpha = match edge {
                BrushEdge::Hard => 1.0,
                BrushEdge::Feathered => {
                    if radius == 0 {
                        1.0
                    } else {
                        1.0 - dist / (radius as f32 + 1.0)
                    }
                }
            };
            let blended = blend_pixel(*canvas.get_pixel(x as u32, y as u32), color, alpha);
            canvas.put_pixel(x as u32, y as u32, blended);
        }
    }
}

// Interpolate dabs between two pointer samples so fast strokes stay solid.
pub fn stroke_brush(
    canvas: &mut RgbaImage,
    from: (i32, i32),
    to: (i32, i32),
    radius: u32,
    color: Rgba<u8>,
    edge: BrushEdge,
) {
    let dx = (to.0 - from.0) as f32;
    let dy = (to.1 - from.1) as f32;
    let steps = dx.abs().max(dy.abs()).ceil() as i32;
    if steps == 0 {
        stamp_brush(canvas, from.0, from.1, radius, color, edge);
        return;
    }
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let x = from.0 + (dx * t).round() as i32;
        let y = from.1 + (dy * t).round() as i32;
        stamp_brush(canvas, x, y, radius, color, edge);
    }
}

fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let alpha = alpha.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for channel in 0..3 {
        let mixed = dst.0[channel] as f32 * (1.0 - alpha) + src.0[channel] as f32 * alpha;
        out[channel] = (mixed + 0.5).floor().clamp(0.0, 255.0) as u8;
    }
    out[3] = dst.0[3].max(src.0[3]);
    Rgba(out)
}

// Snapshot-stack undo in the caller-snapshots-before-mutating pattern: record
// the buffer before each destructive edit, which also discards any redo tail.
pub struct CanvasHistory {
    undo: Vec<RgbaImage>,
    redo: Vec<RgbaImage>,
    depth: usize,
}

impl CanvasHistory {
    pub fn new(depth: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            depth: depth.max(1),
        }
    }

    pub fn record(&mut self, canvas: &RgbaImage) {
        if self.undo.len() == self.depth {
            self.undo.remove(0);
        }
        self.undo.push(canvas.clone());
        self.redo.clear();
    }

    pub fn undo(&mut self, canvas: &mut RgbaImage) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        self.redo.push(canvas.clone());
        *canvas = previous;
        true
    }

    pub fn redo(&mut self, canvas: &mut RgbaImage) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push(canvas.clone());
        *canvas = next;
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

impl Default for CanvasHistory {
    fn default() -> Self {
        Self::new(HISTORY_DEPTH_DEFAULT)
    }
}
