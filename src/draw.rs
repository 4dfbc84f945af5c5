use crate::landscape::{Cell, Landscape};

/// Read-only observer called once per step. Must not influence the episode.
pub trait Render {
    fn render(&mut self, landscape: &Landscape);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoRender;

impl Render for NoRender {
    fn render(&mut self, _landscape: &Landscape) {}
}

/// Rasterises the grid into an RGBA8 buffer, one `cell_px` square per cell.
#[derive(Debug, Clone)]
pub struct FrameRender {
    cell_px: u32,
    width: u32,
    height: u32,
    frame: Vec<u8>,
    frames: u64,
}

impl FrameRender {
    pub fn new(cell_px: u32, (cols, rows): (i32, i32)) -> Self {
        let cell_px = cell_px.max(1);
        let width = cols.max(0) as u32 * cell_px;
        let height = rows.max(0) as u32 * cell_px;
        Self {
            cell_px,
            width,
            height,
            frame: vec![0; (width * height * 4) as usize],
            frames: 0,
        }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        self.frame[idx..idx + 4].try_into().ok()
    }

    /// Draws `landscape` into an external frame of the same pixel size.
    pub fn draw_into(&self, frame: &mut [u8], landscape: &Landscape) {
        clear_rgba(frame, 20, 20, 30);
        for (pos, cell) in landscape.cells() {
            let (gx, gy) = (pos.x as u32, pos.y as u32);
            let (r, g, b) = match cell {
                Cell::Body => (80, 220, 80),
                Cell::Apple => (220, 50, 50),
                Cell::Empty | Cell::Wall if (gx + gy) % 2 == 0 => (25, 25, 35),
                Cell::Empty | Cell::Wall => continue,
            };
            self.fill_cell(frame, gx, gy, (r, g, b));
        }
    }

    fn fill_cell(&self, frame: &mut [u8], gx: u32, gy: u32, (r, g, b): (u8, u8, u8)) {
        let (x0, y0) = (gx * self.cell_px, gy * self.cell_px);
        let x1 = (x0 + self.cell_px).min(self.width);
        let y1 = (y0 + self.cell_px).min(self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                let idx = ((py * self.width + px) * 4) as usize;
                if idx + 3 < frame.len() {
                    frame[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
                }
            }
        }
    }
}

impl Render for FrameRender {
    fn render(&mut self, landscape: &Landscape) {
        let mut frame = std::mem::take(&mut self.frame);
        self.draw_into(&mut frame, landscape);
        self.frame = frame;
        self.frames += 1;
    }
}

fn clear_rgba(frame: &mut [u8], r: u8, g: u8, b: u8) {
    for px in frame.chunks_exact_mut(4) {
        px.copy_from_slice(&[r, g, b, 255]);
    }
}
