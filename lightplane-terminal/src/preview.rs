/// ASCII preview of the projected point set
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use lightplane_core::{MeshSpan, OrthoExtents, PreviewSurface};
use nalgebra::Point2;
use std::io::Write;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

const BACKGROUND: char = '.';
const POINT: char = '@';

/// Point colours, cycled per contributing mesh
const PALETTE: &[Color] = &[Color::Yellow, Color::Cyan, Color::Magenta, Color::Green, Color::Red];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        ch: BACKGROUND,
        color: Color::DarkGrey,
    };
}

/// Character grid whose centre is the plane origin; +y points down the screen
pub struct AsciiPreview {
    width: usize,
    height: usize,
    /// Plane units covered by one cell horizontally
    units_per_cell: f32,
    /// Disc radius in plane units
    point_radius: f32,
    cells: Vec<Cell>,
}

impl AsciiPreview {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            units_per_cell: 4.0,
            point_radius: 5.0,
            cells: vec![Cell::EMPTY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn units_per_cell(&self) -> f32 {
        self.units_per_cell
    }

    /// Multiply the visible plane area by `factor`
    pub fn zoom(&mut self, factor: f32) {
        self.units_per_cell = (self.units_per_cell * factor).clamp(0.25, 64.0);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Fractional (column, row) of a plane point
    fn to_cell(&self, point: &Point2<f32>) -> (f32, f32) {
        (
            self.width as f32 * 0.5 + point.x / self.units_per_cell,
            self.height as f32 * 0.5 + point.y / (self.units_per_cell * CELL_ASPECT),
        )
    }

    fn set(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return;
        }
        let idx = row as usize * self.width + col as usize;
        self.cells[idx] = cell;
    }

    fn fill_disc(&mut self, point: &Point2<f32>, color: Color) {
        let (cx, cy) = self.to_cell(point);
        let rx = self.point_radius / self.units_per_cell;
        let ry = rx / CELL_ASPECT;

        let cell = Cell { ch: POINT, color };
        // Always mark the centre so sub-cell discs stay visible
        self.set(cx.floor() as i32, cy.floor() as i32, cell);

        for row in (cy - ry).floor() as i32..=(cy + ry).ceil() as i32 {
            for col in (cx - rx).floor() as i32..=(cx + rx).ceil() as i32 {
                let dx = (col as f32 + 0.5 - cx) / rx;
                let dy = (row as f32 + 0.5 - cy) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    self.set(col, row, cell);
                }
            }
        }
    }

    /// Redraw with each mesh's points in its own colour
    pub fn render_spans(&mut self, points: &[Point2<f32>], spans: &[MeshSpan]) {
        self.clear();
        for (i, span) in spans.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            for point in points.get(span.range.clone()).unwrap_or_default() {
                self.fill_disc(point, color);
            }
        }
    }

    /// Outline the fitted shadow frustum; only on-screen edges are visited
    pub fn overlay_extents(&mut self, extents: &OrthoExtents) {
        let (left, top) = self.to_cell(&Point2::new(extents.left, extents.bottom));
        let (right, bottom) = self.to_cell(&Point2::new(extents.right, extents.top));
        let (left, right) = (left.floor() as i32, right.floor() as i32);
        let (top, bottom) = (top.floor() as i32, bottom.floor() as i32);

        let (max_col, max_row) = (self.width as i32 - 1, self.height as i32 - 1);
        let cols = left.max(0)..=right.min(max_col);
        let rows = top.max(0)..=bottom.min(max_row);

        let edge = |ch| Cell {
            ch,
            color: Color::White,
        };
        for row in [top, bottom] {
            if rows.contains(&row) {
                for col in cols.clone() {
                    self.set(col, row, edge('-'));
                }
            }
        }
        for col in [left, right] {
            if cols.contains(&col) {
                for row in rows.clone() {
                    self.set(col, row, edge('|'));
                }
            }
        }
        for (col, row) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            self.set(col, row, edge('+'));
        }
    }

    /// Character at a cell, `None` outside the grid
    pub fn cell(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(self.cells[row * self.width + col].ch)
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.ch))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl PreviewSurface for AsciiPreview {
    fn render(&mut self, points: &[Point2<f32>]) {
        self.clear();
        for point in points {
            self.fill_disc(point, PALETTE[0]);
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::EMPTY; width * height];
    }
}
