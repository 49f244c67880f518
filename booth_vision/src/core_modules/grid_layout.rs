// THEORY:
// The `GridLayout` decides where each filter output lands on the canvas. It is pure
// data: a cell size, a column/row count and a list of placements pairing a
// `CellKind` with a (column, row) slot. The session renders each kind and asks the
// layout for pixel coordinates; nothing here knows how a cell's content is made.
//
// Keeping the layout as data means a different arrangement is a new constructor,
// not a new rendering path.

use crate::core_modules::pixel_buffer::Channel;

/// What a grid cell displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Snapshot,
    Grayscale,
    Channel(Channel),
    ChannelThreshold(Channel),
    Hsv,
    YCbCr,
    Face,
    ValueThreshold,
    LuminanceThreshold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub kind: CellKind,
    pub column: u32,
    pub row: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub columns: u32,
    pub rows: u32,
    pub cells: Vec<CellPlacement>,
}

impl GridLayout {
    /// Three columns by five rows:
    ///
    /// | row | col 0              | col 1            | col 2               |
    /// |-----|--------------------|------------------|---------------------|
    /// | 0   | snapshot           | grayscale        |                     |
    /// | 1   | red                | green            | blue                |
    /// | 2   | red threshold      | green threshold  | blue threshold      |
    /// | 3   | snapshot           | HSV              | YCbCr               |
    /// | 4   | face               | value threshold  | luminance threshold |
    pub fn classic(cell_width: u32, cell_height: u32) -> Self {
        let placements = [
            (CellKind::Snapshot, 0, 0),
            (CellKind::Grayscale, 1, 0),
            (CellKind::Channel(Channel::Red), 0, 1),
            (CellKind::Channel(Channel::Green), 1, 1),
            (CellKind::Channel(Channel::Blue), 2, 1),
            (CellKind::ChannelThreshold(Channel::Red), 0, 2),
            (CellKind::ChannelThreshold(Channel::Green), 1, 2),
            (CellKind::ChannelThreshold(Channel::Blue), 2, 2),
            (CellKind::Snapshot, 0, 3),
            (CellKind::Hsv, 1, 3),
            (CellKind::YCbCr, 2, 3),
            (CellKind::Face, 0, 4),
            (CellKind::ValueThreshold, 1, 4),
            (CellKind::LuminanceThreshold, 2, 4),
        ];
        Self {
            cell_width,
            cell_height,
            columns: 3,
            rows: 5,
            cells: placements
                .into_iter()
                .map(|(kind, column, row)| CellPlacement { kind, column, row })
                .collect(),
        }
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.columns * self.cell_width, self.rows * self.cell_height)
    }

    /// Top-left pixel of the slot at (`column`, `row`).
    pub fn origin(&self, column: u32, row: u32) -> (u32, u32) {
        (column * self.cell_width, row * self.cell_height)
    }

    /// Top-left pixel of the first cell showing `kind`.
    pub fn origin_of(&self, kind: CellKind) -> Option<(u32, u32)> {
        self.cells
            .iter()
            .find(|cell| cell.kind == kind)
            .map(|cell| self.origin(cell.column, cell.row))
    }

    /// Every slot in row-major order, occupied or not.
    pub fn slots(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.columns).map(move |column| self.origin(column, row)))
    }
}
