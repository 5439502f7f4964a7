//! Game of Life with colour lineage.
//!
//! The grid is a torus: neighbour lookups wrap on both axes. Cells seeded by a
//! click carry a palette colour and a user-origin flag, and newborns inherit
//! both by neighbour majority.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::{SimRng, Simulation};
use crate::render::Surface;
use crate::schema::{AutomatonConfig, GLIDER_PALETTE, Hsla};

/// Pattern stamped by a click, centred on the clicked cell.
pub const DIAMOND: [[u8; 5]; 5] = [
    [0, 0, 1, 0, 0],
    [0, 1, 1, 1, 0],
    [1, 1, 0, 1, 1],
    [0, 1, 1, 1, 0],
    [0, 0, 1, 0, 0],
];

/// Fill for cells with no user ancestry.
pub const NATIVE_FILL: Hsla = Hsla::new(180.0, 60.0, 50.0, 0.6);

/// One grid cell.
///
/// `color` is only set when `user_origin` is; `age` is zero exactly when the
/// cell is dead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cell {
    pub alive: bool,
    /// Consecutive live generations.
    pub age: u32,
    pub user_origin: bool,
    pub color: Option<Hsla>,
}

impl Cell {
    pub const DEAD: Cell = Cell {
        alive: false,
        age: 0,
        user_origin: false,
        color: None,
    };

    /// A freshly seeded cell with no ancestry.
    pub const NATIVE: Cell = Cell {
        alive: true,
        age: 1,
        user_origin: false,
        color: None,
    };

    /// A freshly stamped user cell.
    #[inline]
    pub fn injected(color: Hsla) -> Self {
        Self {
            alive: true,
            age: 1,
            user_origin: true,
            color: Some(color),
        }
    }

    /// Fill colour for a live cell.
    pub fn fill(&self) -> Hsla {
        let age = self.age as f32;
        match (self.user_origin, self.color) {
            (true, Some(color)) => color.with_alpha((0.4 + age * 0.05).min(0.9)),
            (true, None) => Hsla::new(
                (180.0 + age * 10.0) % 360.0,
                (40.0 + age * 2.0).min(80.0),
                (30.0 + age * 1.5).min(70.0),
                (0.3 + age * 0.05).min(0.8),
            ),
            (false, _) => NATIVE_FILL,
        }
    }
}

/// Double-buffered toroidal automaton.
pub struct CellularAutomaton {
    rows: usize,
    cols: usize,
    cell_size: f32,
    corner_radius: f32,
    frame_delay: u32,
    lineage_threshold: usize,
    /// Current generation, row-major.
    cells: Vec<Cell>,
    /// Scratch buffer for the next generation, swapped with `cells`.
    next: Vec<Cell>,
    frame: u64,
    generations: u64,
    injections: u64,
    rng: SimRng,
}

impl CellularAutomaton {
    /// Grid sized from the surface, seeded at `seed_density`.
    pub fn new(width: f32, height: f32, config: &AutomatonConfig, mut rng: SimRng) -> Self {
        let cell_size = config.cell_size.max(1) as f32;
        let rows = (height / cell_size).floor().max(0.0) as usize;
        let cols = (width / cell_size).floor().max(0.0) as usize;

        let cells: Vec<Cell> = (0..rows * cols)
            .map(|_| {
                if rng.chance(config.seed_density) {
                    Cell::NATIVE
                } else {
                    Cell::DEAD
                }
            })
            .collect();

        let mut automaton = Self::empty(rows, cols, config, rng);
        automaton.cells = cells;
        log::debug!(
            "automaton {}x{} seeded with {} live cells",
            rows,
            cols,
            automaton.live_count()
        );
        automaton
    }

    /// All-dead grid of explicit dimensions.
    pub fn empty(rows: usize, cols: usize, config: &AutomatonConfig, rng: SimRng) -> Self {
        Self {
            rows,
            cols,
            cell_size: config.cell_size.max(1) as f32,
            corner_radius: config.corner_radius,
            frame_delay: config.frame_delay.max(1),
            lineage_threshold: config.lineage_threshold,
            cells: vec![Cell::DEAD; rows * cols],
            next: vec![Cell::DEAD; rows * cols],
            frame: 0,
            generations: 0,
            injections: 0,
            rng,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (row, col), or `None` outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Overwrite a cell. Coordinates wrap.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if self.cells.is_empty() {
            return;
        }
        let idx = (row % self.rows) * self.cols + col % self.cols;
        self.cells[idx] = cell;
    }

    /// Bring a cell to life with no ancestry. Coordinates wrap.
    pub fn set_alive(&mut self, row: usize, col: usize) {
        self.set_cell(row, col, Cell::NATIVE);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|c| c.alive).count()
    }

    /// Generations computed so far.
    pub fn generation_count(&self) -> u64 {
        self.generations
    }

    /// Patterns stamped by clicks so far.
    pub fn injections(&self) -> u64 {
        self.injections
    }

    /// Compute exactly one generation.
    pub fn generation(&mut self) {
        if self.cells.is_empty() {
            return;
        }

        let (rows, cols, threshold) = (self.rows, self.cols, self.lineage_threshold);
        let cells = &self.cells;

        #[cfg(not(target_arch = "wasm32"))]
        self.next
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out)| next_row(cells, rows, cols, threshold, row, out));

        #[cfg(target_arch = "wasm32")]
        self.next
            .chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out)| next_row(cells, rows, cols, threshold, row, out));

        std::mem::swap(&mut self.cells, &mut self.next);
        self.generations += 1;
    }
}

/// Fill one row of the next generation from the current grid.
fn next_row(
    cells: &[Cell],
    rows: usize,
    cols: usize,
    threshold: usize,
    row: usize,
    out: &mut [Cell],
) {
    for (col, slot) in out.iter_mut().enumerate() {
        *slot = next_cell(cells, rows, cols, threshold, row, col);
    }
}

/// Indices of the 8 toroidal neighbours, rows outer, columns inner.
#[inline]
fn neighbours(
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
) -> impl Iterator<Item = usize> + Clone {
    [rows - 1, 0, 1].into_iter().flat_map(move |dr| {
        [cols - 1, 0, 1].into_iter().filter_map(move |dc| {
            if dr == 0 && dc == 0 {
                None
            } else {
                Some(((row + dr) % rows) * cols + (col + dc) % cols)
            }
        })
    })
}

fn next_cell(
    cells: &[Cell],
    rows: usize,
    cols: usize,
    threshold: usize,
    row: usize,
    col: usize,
) -> Cell {
    let current = cells[row * cols + col];
    let live = neighbours(rows, cols, row, col)
        .filter(|&i| cells[i].alive)
        .count();

    if current.alive {
        return if live == 2 || live == 3 {
            Cell {
                age: current.age.saturating_add(1),
                ..current
            }
        } else {
            Cell::DEAD
        };
    }
    if live != 3 {
        return Cell::DEAD;
    }

    let parents = neighbours(rows, cols, row, col)
        .map(|i| &cells[i])
        .filter(|c| c.alive);
    let lineage = parents.clone().filter(|c| c.user_origin).count();
    let user_origin = lineage >= threshold;

    Cell {
        alive: true,
        age: 1,
        user_origin,
        color: if user_origin {
            dominant_color(parents.filter_map(|c| c.color))
        } else {
            None
        },
    }
}

/// Most frequent colour; ties go to the first seen.
fn dominant_color(colors: impl Iterator<Item = Hsla>) -> Option<Hsla> {
    let mut tally: [(Hsla, u8); 8] = [(Hsla::opaque(0.0, 0.0, 0.0), 0); 8];
    let capacity = tally.len();
    let mut distinct = 0;
    for color in colors {
        match tally[..distinct].iter_mut().find(|(c, _)| c.same_hsl(&color)) {
            Some((_, count)) => *count += 1,
            None if distinct < capacity => {
                tally[distinct] = (color, 1);
                distinct += 1;
            }
            None => {}
        }
    }

    let mut best: Option<(Hsla, u8)> = None;
    for &(color, count) in &tally[..distinct] {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((color, count));
        }
    }
    best.map(|(color, _)| color)
}

impl Simulation for CellularAutomaton {
    fn advance(&mut self) {
        self.frame += 1;
        if self.frame % self.frame_delay as u64 == 0 {
            self.generation();
        }
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let size = self.cell_size;
        for (i, cell) in self.cells.iter().enumerate().filter(|(_, c)| c.alive) {
            let (row, col) = (i / self.cols, i % self.cols);
            surface.set_fill(cell.fill());
            surface.fill_round_rect(
                col as f32 * size,
                row as f32 * size,
                size,
                size,
                self.corner_radius,
            );
        }
    }

    fn interact(&mut self, x: f32, y: f32) {
        if self.cells.is_empty() || !x.is_finite() || !y.is_finite() {
            return;
        }
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        let row = ((y / self.cell_size).floor() as i64).rem_euclid(rows);
        let col = ((x / self.cell_size).floor() as i64).rem_euclid(cols);
        let color = GLIDER_PALETTE[self.rng.index(GLIDER_PALETTE.len())];

        for (dr, line) in DIAMOND.iter().enumerate() {
            for (dc, &bit) in line.iter().enumerate() {
                if bit == 0 {
                    continue;
                }
                let r = (row + dr as i64 - 2).rem_euclid(rows) as usize;
                let c = (col + dc as i64 - 2).rem_euclid(cols) as usize;
                self.cells[r * self.cols + c] = Cell::injected(color);
            }
        }
        self.injections += 1;
        log::debug!("diamond stamped at cell ({row}, {col}) with hue {}", color.h);
    }

    fn population(&self) -> usize {
        self.live_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};
    use proptest::prelude::*;

    fn empty(rows: usize, cols: usize) -> CellularAutomaton {
        CellularAutomaton::empty(rows, cols, &AutomatonConfig::default(), SimRng::new(42))
    }

    fn alive(a: &CellularAutomaton, row: usize, col: usize) -> bool {
        a.cell(row, col).unwrap().alive
    }

    fn user(color: Hsla) -> Cell {
        Cell::injected(color)
    }

    fn diamond_cells(row: usize, col: usize, rows: usize, cols: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for (dr, line) in DIAMOND.iter().enumerate() {
            for (dc, &bit) in line.iter().enumerate() {
                if bit == 1 {
                    out.push(((row + rows + dr - 2) % rows, (col + cols + dc - 2) % cols));
                }
            }
        }
        out.sort();
        out
    }

    fn live_set(a: &CellularAutomaton) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 0..a.rows() {
            for c in 0..a.cols() {
                if alive(a, r, c) {
                    out.push((r, c));
                }
            }
        }
        out
    }

    #[test]
    fn test_blinker_birth_survival_and_death() {
        let mut a = empty(6, 6);
        a.set_alive(2, 1);
        a.set_alive(2, 2);
        a.set_alive(2, 3);
        a.generation();

        // centre had two neighbours
        let centre = a.cell(2, 2).unwrap();
        assert!(centre.alive);
        assert_eq!(centre.age, 2);

        // dead cells with three neighbours are born
        assert!(alive(&a, 1, 2));
        assert!(alive(&a, 3, 2));
        assert_eq!(a.cell(1, 2).unwrap().age, 1);

        // ends had one neighbour
        assert_eq!(*a.cell(2, 1).unwrap(), Cell::DEAD);
        assert_eq!(*a.cell(2, 3).unwrap(), Cell::DEAD);
        assert_eq!(a.live_count(), 3);
    }

    #[test]
    fn test_block_survives_with_three_neighbours() {
        let mut a = empty(6, 6);
        for (r, c) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            a.set_alive(r, c);
        }
        for generation in 1..=4 {
            a.generation();
            for (r, c) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
                assert_eq!(a.cell(r, c).unwrap().age, 1 + generation);
            }
            assert_eq!(a.live_count(), 4);
        }
    }

    #[test]
    fn test_overcrowded_and_isolated_cells_die() {
        let mut a = empty(7, 7);
        // plus sign: centre has four neighbours
        for (r, c) in [(3, 3), (2, 3), (4, 3), (3, 2), (3, 4)] {
            a.set_alive(r, c);
        }
        // lone cell far away
        a.set_alive(0, 0);
        a.generation();
        assert!(!alive(&a, 3, 3));
        assert_eq!(a.cell(3, 3).unwrap().age, 0);
        assert!(!alive(&a, 0, 0));
    }

    #[test]
    fn test_wraparound_on_minimal_grid() {
        let mut a = empty(3, 3);
        for c in 0..3 {
            a.set_alive(2, c);
        }
        a.generation();

        // row 0 sees row 2 through the wrap
        for c in 0..3 {
            assert!(alive(&a, 0, c));
            assert_eq!(a.cell(0, c).unwrap().age, 1);
            assert_eq!(a.cell(2, c).unwrap().age, 2);
        }
        assert_eq!(a.live_count(), 9);
    }

    #[test]
    fn test_lineage_inherits_dominant_colour() {
        let red = GLIDER_PALETTE[0];
        let blue = GLIDER_PALETTE[5];
        let mut a = empty(6, 6);
        a.set_cell(1, 1, user(red));
        a.set_cell(1, 2, user(red));
        a.set_cell(1, 3, user(blue));
        a.generation();

        let born = a.cell(2, 2).unwrap();
        assert!(born.alive);
        assert!(born.user_origin);
        assert_eq!(born.color, Some(red));
    }

    #[test]
    fn test_colour_tie_goes_to_first_seen() {
        let red = GLIDER_PALETTE[0];
        let blue = GLIDER_PALETTE[5];
        let mut a = empty(6, 6);
        a.set_cell(1, 1, user(blue));
        a.set_cell(
            1,
            2,
            Cell {
                color: None,
                ..user(red)
            },
        );
        a.set_cell(1, 3, user(red));
        a.generation();

        let born = a.cell(2, 2).unwrap();
        assert!(born.user_origin);
        assert_eq!(born.color, Some(blue));
    }

    #[test]
    fn test_lineage_needs_three_user_parents() {
        let red = GLIDER_PALETTE[0];
        let mut a = empty(6, 6);
        a.set_cell(1, 1, user(red));
        a.set_cell(1, 2, user(red));
        a.set_alive(1, 3);
        a.generation();

        let born = a.cell(2, 2).unwrap();
        assert!(born.alive);
        assert!(!born.user_origin);
        assert_eq!(born.color, None);
    }

    #[test]
    fn test_death_clears_lineage() {
        let mut a = empty(6, 6);
        a.set_cell(3, 3, user(GLIDER_PALETTE[2]));
        a.generation();
        assert_eq!(*a.cell(3, 3).unwrap(), Cell::DEAD);
    }

    #[test]
    fn test_generation_throttled_by_frame_delay() {
        let mut a = empty(6, 6);
        for _ in 0..4 {
            a.advance();
        }
        assert_eq!(a.generation_count(), 0);
        a.advance();
        assert_eq!(a.generation_count(), 1);
        for _ in 0..10 {
            a.advance();
        }
        assert_eq!(a.generation_count(), 3);
    }

    #[test]
    fn test_throttled_frames_still_draw_grid() {
        let mut a = empty(6, 6);
        for c in 1..4 {
            a.set_alive(2, c);
        }
        let mut surface = RecordingSurface::new(48.0, 48.0);
        for frame in 1..=4 {
            surface.clear();
            a.step(&mut surface);
            assert_eq!(a.generation_count(), 0, "frame {frame}");
            assert_eq!(surface.shape_count(), a.live_count(), "frame {frame}");
            assert_eq!(surface.shape_count(), 3);
        }

        surface.clear();
        a.step(&mut surface);
        assert_eq!(a.generation_count(), 1);
        assert_eq!(surface.shape_count(), a.live_count());
        assert!(alive(&a, 1, 2) && alive(&a, 3, 2));
    }

    #[test]
    fn test_click_stamps_diamond_at_centre() {
        let mut a = empty(8, 8);
        // pixel centre of cell (4, 4)
        a.interact(4.0 * 8.0 + 4.0, 4.0 * 8.0 + 4.0);

        let expected = diamond_cells(4, 4, 8, 8);
        assert_eq!(expected.len(), 12);
        assert_eq!(live_set(&a), expected);

        let color = a.cell(2, 4).unwrap().color;
        assert!(color.is_some());
        for (r, c) in expected {
            let cell = a.cell(r, c).unwrap();
            assert!(cell.user_origin);
            assert_eq!(cell.age, 1);
            assert_eq!(cell.color, color);
        }
        assert_eq!(a.injections(), 1);
    }

    #[test]
    fn test_click_near_corner_wraps() {
        let mut a = empty(8, 8);
        a.interact(1.0, 1.0);
        assert_eq!(live_set(&a), diamond_cells(0, 0, 8, 8));
        assert!(alive(&a, 6, 0));
        assert!(alive(&a, 0, 6));
    }

    #[test]
    fn test_click_outside_surface_wraps() {
        let mut a = empty(8, 8);
        a.interact(-4.0, 64.0 + 12.0);
        // col -1 wraps to 7, row 9 wraps to 1
        assert_eq!(live_set(&a), diamond_cells(1, 7, 8, 8));

        let mut b = empty(8, 8);
        b.interact(f32::NAN, 3.0);
        assert_eq!(b.live_count(), 0);
    }

    #[test]
    fn test_seeded_density() {
        let a = CellularAutomaton::new(
            800.0,
            800.0,
            &AutomatonConfig::default(),
            SimRng::new(9),
        );
        assert_eq!((a.rows(), a.cols()), (100, 100));
        let fraction = a.live_count() as f32 / 10_000.0;
        assert!((0.15..0.25).contains(&fraction), "fraction {fraction}");
        assert!(a.cells().iter().all(|c| !c.user_origin && c.color.is_none()));
    }

    #[test]
    fn test_degenerate_grid_is_inert() {
        let mut a = CellularAutomaton::new(4.0, 4.0, &AutomatonConfig::default(), SimRng::new(1));
        assert_eq!(a.rows(), 0);
        a.interact(1.0, 1.0);
        for _ in 0..10 {
            a.advance();
        }
        let mut surface = RecordingSurface::new(4.0, 4.0);
        a.draw(&mut surface);
        assert_eq!(surface.shape_count(), 0);
    }

    #[test]
    fn test_draw_colours() {
        let mut a = empty(4, 4);
        a.set_alive(0, 1);
        let mut surface = RecordingSurface::new(32.0, 32.0);
        a.draw(&mut surface);
        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Fill(NATIVE_FILL),
                DrawCommand::RoundRect {
                    x: 8.0,
                    y: 0.0,
                    w: 8.0,
                    h: 8.0,
                    radius: 2.0
                },
            ]
        );

        let colored = user(GLIDER_PALETTE[3]).fill();
        assert_eq!(colored.h, 120.0);
        assert!((colored.a - 0.45).abs() < 1e-6);

        let old = Cell {
            age: 40,
            ..user(GLIDER_PALETTE[3])
        };
        assert!((old.fill().a - 0.9).abs() < 1e-6);

        let fallback = Cell {
            color: None,
            ..user(GLIDER_PALETTE[3])
        }
        .fill();
        assert_eq!(fallback.h, 190.0);
        assert_eq!(fallback.s, 42.0);
        assert_eq!(fallback.l, 31.5);
        assert!((fallback.a - 0.35).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(
            clicks in prop::collection::vec((-100.0f32..400.0, -100.0f32..400.0), 0..6),
            seed in any::<u64>(),
            steps in 0usize..12,
        ) {
            let mut a = CellularAutomaton::new(
                160.0,
                120.0,
                &AutomatonConfig::default(),
                SimRng::new(seed),
            );
            for (x, y) in clicks {
                a.interact(x, y);
            }
            for _ in 0..steps {
                a.generation();
            }
            for cell in a.cells() {
                prop_assert_eq!(cell.age == 0, !cell.alive);
                prop_assert!(cell.color.is_none() || cell.user_origin);
            }
        }
    }
}
