//! Square-lattice board geometry for dots-and-boxes
//!
//! The board is pure geometry: which edges exist, which cells exist, and
//! how they relate. Ownership state lives in [`crate::game::GameState`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Grid sizes selectable when starting a session
pub const GRID_SIZES: [u8; 8] = [5, 6, 7, 8, 9, 10, 12, 15];

/// A lattice dot. Coordinates run 0..=size in both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dot {
    pub x: u8,
    pub y: u8,
}

impl Dot {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Index into the board's edge table
pub type EdgeId = usize;

/// Index into the board's cell table (row * size + col)
pub type CellId = usize;

/// A claimable unit segment between two adjacent dots.
///
/// Endpoints are stored in canonical order: `a` is the left endpoint of a
/// horizontal edge, the top endpoint of a vertical one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub a: Dot,
    pub b: Dot,
}

impl Edge {
    pub fn is_horizontal(&self) -> bool {
        self.a.y == self.b.y
    }
}

/// A unit square bounded by 4 edges
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

/// Board geometry: edge table, cell table, and an endpoint-pair index so
/// adjacency lookups are O(1) instead of a scan over all edges.
#[derive(Clone, Debug)]
pub struct Board {
    size: u8,
    edges: Vec<Edge>,
    cells: Vec<Cell>,
    index: FxHashMap<(Dot, Dot), EdgeId>,
}

impl Board {
    /// Build the board for an N x N grid of cells.
    ///
    /// Horizontal edges are enumerated row by row, then vertical edges, so
    /// edge ids are stable for a given size.
    pub fn new(size: u8) -> Self {
        assert!(size >= 1, "board size must be at least 1");

        let n = size as usize;
        let mut edges = Vec::with_capacity(2 * n * (n + 1));

        for y in 0..=size {
            for x in 0..size {
                edges.push(Edge {
                    a: Dot::new(x, y),
                    b: Dot::new(x + 1, y),
                });
            }
        }
        for y in 0..size {
            for x in 0..=size {
                edges.push(Edge {
                    a: Dot::new(x, y),
                    b: Dot::new(x, y + 1),
                });
            }
        }

        let index = edges
            .iter()
            .enumerate()
            .map(|(id, e)| ((e.a, e.b), id))
            .collect();

        let mut cells = Vec::with_capacity(n * n);
        for row in 0..size {
            for col in 0..size {
                cells.push(Cell { row, col });
            }
        }

        Self {
            size,
            edges,
            cells,
            index,
        }
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate()
    }

    pub fn cell_id(&self, row: u8, col: u8) -> CellId {
        row as usize * self.size as usize + col as usize
    }

    /// Look up an edge by its endpoints (either order)
    pub fn edge_between(&self, a: Dot, b: Dot) -> Option<EdgeId> {
        let key = canonical(a, b);
        self.index.get(&key).copied()
    }

    /// The 4 bounding edges of a cell: top, right, bottom, left
    pub fn edges_of_cell(&self, cell: CellId) -> [EdgeId; 4] {
        let Cell { row, col } = self.cells[cell];
        let (r, c) = (row, col);
        // All four exist by construction for a valid cell id.
        [
            self.index[&(Dot::new(c, r), Dot::new(c + 1, r))],
            self.index[&(Dot::new(c + 1, r), Dot::new(c + 1, r + 1))],
            self.index[&(Dot::new(c, r + 1), Dot::new(c + 1, r + 1))],
            self.index[&(Dot::new(c, r), Dot::new(c, r + 1))],
        ]
    }

    /// The at-most-2 cells bounded by an edge
    pub fn cells_of_edge(&self, id: EdgeId) -> [Option<CellId>; 2] {
        let edge = self.edges[id];
        let Dot { x, y } = edge.a;

        if edge.is_horizontal() {
            // Cell above (row y-1) and cell below (row y)
            let above = (y > 0).then(|| self.cell_id(y - 1, x));
            let below = (y < self.size).then(|| self.cell_id(y, x));
            [above, below]
        } else {
            // Cell left (col x-1) and cell right (col x)
            let left = (x > 0).then(|| self.cell_id(y, x - 1));
            let right = (x < self.size).then(|| self.cell_id(y, x));
            [left, right]
        }
    }
}

/// Canonical endpoint order: smaller y first, then smaller x
fn canonical(a: Dot, b: Dot) -> (Dot, Dot) {
    if (a.y, a.x) <= (b.y, b.x) {
        (a, b)
    } else {
        (b, a)
    }
}
