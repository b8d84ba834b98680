use image::{Rgba, RgbaImage};

use asobiba_core::grid::Gem;
use asobiba_paint::{
    flood_fill, stroke_brush, BrushEdge, CanvasHistory, PaintError, HISTORY_DEPTH_DEFAULT,
};

pub const COLORING_WIDTH_DEFAULT: u32 = 320;
pub const COLORING_HEIGHT_DEFAULT: u32 = 240;
pub const COLORING_TOLERANCE_DEFAULT: f32 = 24.0;
pub const BRUSH_RADIUS_DEFAULT: u32 = 6;

pub const CANVAS_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColoringAction {
    PickGem(Gem),
    PickColor([u8; 4]),
    SetBrushRadius(u32),
    SetBrushEdge(BrushEdge),
    Fill { x: u32, y: u32 },
    Stroke { from: (i32, i32), to: (i32, i32) },
    Undo,
    Redo,
    Clear,
}

pub struct ColoringState {
    canvas: RgbaImage,
    history: CanvasHistory,
    color: Rgba<u8>,
    tolerance: f32,
    brush_radius: u32,
    brush_edge: BrushEdge,
    fills: u64,
}

// A lightweight view for renderers; the pixel buffer itself is handed out
// through `canvas()` rather than cloned into every snapshot.
#[derive(Clone, Copy, Debug)]
pub struct ColoringView {
    pub width: u32,
    pub height: u32,
    pub color: [u8; 4],
    pub brush_radius: u32,
    pub can_undo: bool,
    pub can_redo: bool,
    pub fills: u64,
}

impl ColoringState {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            canvas: RgbaImage::from_pixel(width, height, CANVAS_BACKGROUND),
            history: CanvasHistory::new(HISTORY_DEPTH_DEFAULT),
            color: Rgba(gem_rgba(Gem::Ruby)),
            tolerance: COLORING_TOLERANCE_DEFAULT,
            brush_radius: BRUSH_RADIUS_DEFAULT,
            brush_edge: BrushEdge::Hard,
            fills: 0,
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn view(&self) -> ColoringView {
        ColoringView {
            width: self.canvas.width(),
            height: self.canvas.height(),
            color: self.color.0,
            brush_radius: self.brush_radius,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            fills: self.fills,
        }
    }

    pub fn apply(&mut self, action: ColoringAction) {
        match action {
            ColoringAction::PickGem(gem) => self.color = Rgba(gem_rgba(gem)),
            ColoringAction::PickColor(rgba) => self.color = Rgba(rgba),
            ColoringAction::SetBrushRadius(radius) => {
                self.brush_radius = radius.clamp(1, asobiba_paint::BRUSH_RADIUS_MAX);
            }
            ColoringAction::SetBrushEdge(edge) => self.brush_edge = edge,
            ColoringAction::Fill { x, y } => self.fill(x, y),
            ColoringAction::Stroke { from, to } => {
                self.history.record(&self.canvas);
                stroke_brush(
                    &mut self.canvas,
                    from,
                    to,
                    self.brush_radius,
                    self.color,
                    self.brush_edge,
                );
            }
            ColoringAction::Undo => {
                self.history.undo(&mut self.canvas);
            }
            ColoringAction::Redo => {
                self.history.redo(&mut self.canvas);
            }
            ColoringAction::Clear => {
                self.history.record(&self.canvas);
                let (width, height) = self.canvas.dimensions();
                self.canvas = RgbaImage::from_pixel(width, height, CANVAS_BACKGROUND);
            }
        }
    }

    fn fill(&mut self, x: u32, y: u32) {
        let before = self.canvas.clone();
        match flood_fill(&mut self.canvas, x, y, self.color, self.tolerance) {
            // A no-op fill earns no history entry, so undo stays meaningful.
            Ok(0) => {}
            Ok(_) => {
                self.history.record(&before);
                self.fills += 1;
            }
            Err(PaintError::SeedOutOfBounds(sx, sy)) => {
                log::debug!("coloring: fill outside canvas at ({sx}, {sy})");
            }
            Err(err) => {
                log::warn!("coloring: fill failed: {err}");
            }
        }
    }
}

fn gem_rgba(gem: Gem) -> [u8; 4] {
    let [r, g, b] = gem.rgb();
    [r, g, b, 255]
}
