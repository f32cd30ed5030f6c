//! Isometric projection of the contribution grid.
//!
//! Weeks run along the grid `x` axis and weekdays along `y`. Every day becomes a cell with a
//! ground tile, and days with contributions get a building extruded straight up by `z`.
//! There is no depth buffer: cells are ordered by `x + y` so that anything drawn later is never
//! behind anything drawn earlier.

use std::fmt::Display;

use tracing::{instrument, trace};

use crate::github::entities::ContributionDay;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Formats as an SVG `points` pair with one decimal, which keeps output stable between runs.
impl Display for ScreenPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1},{:.1}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsometricProjector {
    pub tile_width: f64,
    pub tile_height: f64,
    /// Screen position of grid point `(0, 0)` at ground level.
    pub origin: ScreenPoint,
}

impl IsometricProjector {
    pub fn new(tile_width: f64, tile_height: f64, origin: ScreenPoint) -> Self {
        Self {
            tile_width,
            tile_height,
            origin,
        }
    }

    /// Maps grid coordinates plus a height to the screen. Height only moves the point up.
    pub fn project(&self, x: f64, y: f64, z: f64) -> ScreenPoint {
        ScreenPoint {
            x: self.origin.x + (x - y) * self.tile_width / 2.,
            y: self.origin.y + (x + y) * self.tile_height / 2. - z,
        }
    }
}

/// Maps a contribution count to a building height.
///
/// The curve is super-linear so the busiest days tower over ordinary ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightCurve {
    pub min_height: f64,
    pub max_height: f64,
    pub exponent: f64,
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self {
            min_height: 10.,
            max_height: 170.,
            exponent: 1.3,
        }
    }
}

impl HeightCurve {
    pub fn with_exponent(self, exponent: f64) -> Self {
        Self { exponent, ..self }
    }

    /// Height of the busiest day.
    pub fn tallest(&self) -> f64 {
        self.min_height + self.max_height
    }

    /// Zero for days without contributions. `max_count` of zero is treated as one.
    pub fn height(&self, count: u32, max_count: u32) -> f64 {
        if count == 0 {
            return 0.;
        }
        let ratio = count as f64 / max_count.max(1) as f64;
        self.min_height + ratio.powf(self.exponent) * self.max_height
    }
}

/// Index into [Cell::base] and [Cell::top]. Corners go around the tile starting from the one
/// closest to the grid origin.
pub const CORNER_A: usize = 0;
pub const CORNER_B: usize = 1;
pub const CORNER_C: usize = 2;
pub const CORNER_D: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub day: ContributionDay,
    pub height: f64,
    /// Share of the busiest day, `0.0..=1.0`.
    pub intensity: f64,
    /// Ground corners at `(x, y)`, `(x + 1, y)`, `(x + 1, y + 1)`, `(x, y + 1)`.
    pub base: [ScreenPoint; 4],
    /// The same corners lifted by `height`.
    pub top: [ScreenPoint; 4],
    /// Draw order key. Smaller is farther from the viewer.
    pub depth: u32,
}

impl Cell {
    pub fn new(
        day: ContributionDay,
        projector: &IsometricProjector,
        height: f64,
        max_count: u32,
    ) -> Self {
        let x = day.week_index as f64;
        let y = day.day_of_week as f64;
        let corners = [(x, y), (x + 1., y), (x + 1., y + 1.), (x, y + 1.)];

        Self {
            day,
            height,
            intensity: day.count as f64 / max_count.max(1) as f64,
            base: corners.map(|(cx, cy)| projector.project(cx, cy, 0.)),
            top: corners.map(|(cx, cy)| projector.project(cx, cy, height)),
            depth: day.week_index + day.day_of_week,
        }
    }

    pub fn has_building(&self) -> bool {
        self.day.count > 0
    }

    pub fn ground(&self) -> [ScreenPoint; 4] {
        [
            self.base[CORNER_A],
            self.base[CORNER_B],
            self.base[CORNER_C],
            self.base[CORNER_D],
        ]
    }

    /// Wall along the `y + 1` edge. It faces the viewer and sits on the left of the screen.
    pub fn left_wall(&self) -> [ScreenPoint; 4] {
        [
            self.base[CORNER_D],
            self.base[CORNER_C],
            self.top[CORNER_C],
            self.top[CORNER_D],
        ]
    }

    /// Wall along the `x + 1` edge. It faces the viewer and sits on the right of the screen.
    pub fn right_wall(&self) -> [ScreenPoint; 4] {
        [
            self.base[CORNER_C],
            self.base[CORNER_B],
            self.top[CORNER_B],
            self.top[CORNER_C],
        ]
    }

    pub fn roof(&self) -> [ScreenPoint; 4] {
        self.top
    }
}

pub fn max_count(days: &[ContributionDay]) -> u32 {
    days.iter().map(|d| d.count).max().unwrap_or(0).max(1)
}

/// Projects every day and returns the cells farthest first.
#[instrument(skip_all, fields(days = days.len()))]
pub fn build_cells(
    days: &[ContributionDay],
    projector: &IsometricProjector,
    curve: &HeightCurve,
) -> Vec<Cell> {
    let max_count = max_count(days);
    trace!("Busiest day has {max_count} contributions");

    let mut cells = days
        .iter()
        .map(|day| Cell::new(*day, projector, curve.height(day.count, max_count), max_count))
        .collect::<Vec<_>>();
    cells.sort_by_key(|cell| cell.depth);
    cells
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceKind {
    /// Outline of an empty tile.
    Ground,
    LeftWall,
    RightWall,
    Roof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub kind: FaceKind,
    /// Index of the owning cell in the slice given to [city_polygons].
    pub cell: usize,
    pub points: [ScreenPoint; 4],
}

/// Emits faces in the order of `cells`, which should come from [build_cells]. Inside a building
/// the walls go first so the roof covers their top edges.
pub fn city_polygons(cells: &[Cell]) -> Vec<Polygon> {
    let mut polygons = Vec::with_capacity(cells.len() * 3);
    for (index, cell) in cells.iter().enumerate() {
        if !cell.has_building() {
            polygons.push(Polygon {
                kind: FaceKind::Ground,
                cell: index,
                points: cell.ground(),
            });
            continue;
        }
        for (kind, points) in [
            (FaceKind::LeftWall, cell.left_wall()),
            (FaceKind::RightWall, cell.right_wall()),
            (FaceKind::Roof, cell.roof()),
        ] {
            polygons.push(Polygon {
                kind,
                cell: index,
                points,
            });
        }
    }
    polygons
}

/// Lit windows stacked up the middle of a building, one every `spacing` pixels below the roof.
/// Only busy, tall buildings get them.
pub fn window_lights(
    cell: &Cell,
    projector: &IsometricProjector,
    spacing: f64,
) -> Vec<ScreenPoint> {
    if cell.intensity <= 0.4 || cell.height <= 40. || spacing <= 0. {
        return vec![];
    }
    let x = cell.day.week_index as f64 + 0.5;
    let y = cell.day.day_of_week as f64 + 0.5;
    let steps = (cell.height / spacing).floor() as u32;
    (1..steps)
        .map(|i| projector.project(x, y, cell.height - i as f64 * spacing))
        .collect()
}
