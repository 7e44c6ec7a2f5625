use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use summit_core::vec2::Vec2;

use crate::surface::Surface;

/// Default tile edge length in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// Numeric tile ids that map to sticky surfaces in map definitions.
const STICKY_TILE_IDS: &[u32] = &[935, 936];
/// Numeric tile ids that map to slime surfaces in map definitions.
const SLIME_TILE_IDS: &[u32] = &[518, 519];
/// Numeric tile ids that map to ice surfaces in map definitions.
const ICE_TILE_IDS: &[u32] = &[939, 940, 941, 942];

/// A single cell of the collision layer. Everything except `Empty` is
/// solid; the special variants differ only in the surface effect they
/// apply on contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Empty,
    Solid,
    Sticky,
    Ice,
    Slime,
}

impl Tile {
    pub fn is_solid(self) -> bool {
        self != Tile::Empty
    }

    pub fn surface(self) -> Surface {
        match self {
            Tile::Sticky => Surface::Sticky,
            Tile::Ice => Surface::Ice,
            Tile::Slime => Surface::Slime,
            Tile::Empty | Tile::Solid => Surface::Plain,
        }
    }
}

/// Tiled-style map definition: a flat id grid plus dimensions, as
/// exported by the map editor and decoded with serde_json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDefinition {
    pub width: u32,
    pub height: u32,
    pub tilewidth: f32,
    pub data: Vec<u32>,
}

/// The collision layer: a rectangular grid of tiles, row-major, immutable
/// after construction.
///
/// Out-of-bounds queries never panic and follow one fixed policy: columns
/// outside the map and rows below the bottom are solid (boundary walls and
/// floor); rows above the top are empty so ascent is never blocked by a
/// phantom ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    width: u32,
    height: u32,
    tile_size: f32,
    tiles: Vec<Tile>,
    pub spawn: Vec2,
}

impl TileMap {
    pub fn new(width: u32, height: u32, tile_size: f32, tiles: Vec<Tile>) -> Self {
        assert_eq!(
            tiles.len(),
            (width * height) as usize,
            "tile grid must be width * height"
        );
        Self {
            width,
            height,
            tile_size,
            tiles,
            spawn: Vec2::new(tile_size, 0.0),
        }
    }

    /// Build a map from ascii rows, top row first. `.` empty, `#` solid,
    /// `S` sticky, `I` ice, `B` slime. Unknown characters are empty.
    /// Intended for tests and fixture levels.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let tiles = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|c| match c {
                '#' => Tile::Solid,
                'S' => Tile::Sticky,
                'I' => Tile::Ice,
                'B' => Tile::Slime,
                _ => Tile::Empty,
            })
            .collect();
        Self::new(width, height, TILE_SIZE, tiles)
    }

    /// Build a map from an editor-exported id grid. Id 0 is empty space;
    /// the special id ranges carry over from the original tileset.
    pub fn from_definition(def: &MapDefinition) -> Self {
        let expected = (def.width * def.height) as usize;
        if def.data.len() != expected {
            tracing::warn!(
                "Map data has {} entries, expected {expected}; missing cells become empty",
                def.data.len()
            );
        }
        let mut tiles = vec![Tile::Empty; expected];
        for (i, slot) in tiles.iter_mut().enumerate() {
            let id = def.data.get(i).copied().unwrap_or(0);
            *slot = match id {
                0 => Tile::Empty,
                id if STICKY_TILE_IDS.contains(&id) => Tile::Sticky,
                id if SLIME_TILE_IDS.contains(&id) => Tile::Slime,
                id if ICE_TILE_IDS.contains(&id) => Tile::Ice,
                _ => Tile::Solid,
            };
        }
        Self::new(def.width, def.height, def.tilewidth, tiles)
    }

    pub fn with_spawn(mut self, x: f32, y: f32) -> Self {
        self.spawn = Vec2::new(x, y);
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Map width in pixels.
    pub fn pixel_width(&self) -> f32 {
        self.width as f32 * self.tile_size
    }

    /// Tile at a column/row, applying the boundary policy for
    /// out-of-bounds queries.
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        if col < 0 || col >= self.width as i32 {
            return Tile::Solid;
        }
        if row >= self.height as i32 {
            return Tile::Solid;
        }
        if row < 0 {
            return Tile::Empty;
        }
        self.tiles[row as usize * self.width as usize + col as usize]
    }

    pub fn is_solid_at(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_solid()
    }

    pub fn solid_in_row(&self, row: i32, cols: RangeInclusive<i32>) -> bool {
        cols.into_iter().any(|col| self.is_solid_at(col, row))
    }

    pub fn solid_in_column(&self, col: i32, rows: RangeInclusive<i32>) -> bool {
        rows.into_iter().any(|row| self.is_solid_at(col, row))
    }

    /// Classify the surface under a row span. Precedence when several
    /// special tiles are covered: Sticky, then Ice, then Slime, columns
    /// scanned left-to-right. A span of only plain solids is `Plain`.
    pub fn surface_in_row(&self, row: i32, cols: RangeInclusive<i32>) -> Surface {
        for wanted in [Surface::Sticky, Surface::Ice, Surface::Slime] {
            for col in cols.clone() {
                let tile = self.tile_at(col, row);
                if tile.is_solid() && tile.surface() == wanted {
                    return wanted;
                }
            }
        }
        Surface::Plain
    }
}

/// Tower layout constants for the seeded generator.
const TOWER_WIDTH: u32 = 16;
const TOWER_HEIGHT: u32 = 96;

/// Generate a deterministic climbable tower from a seed: solid floor,
/// side walls, and ledges at jumpable vertical intervals, with occasional
/// sticky/ice/slime surfaces. Same seed, same map.
pub fn generate_tower(seed: u64) -> TileMap {
    let width = TOWER_WIDTH;
    let height = TOWER_HEIGHT;
    let mut tiles = vec![Tile::Empty; (width * height) as usize];
    let mut rng = StdRng::seed_from_u64(seed);

    let set = |tiles: &mut Vec<Tile>, col: u32, row: u32, tile: Tile| {
        if col < width && row < height {
            tiles[(row * width + col) as usize] = tile;
        }
    };

    // Floor and side walls.
    for col in 0..width {
        set(&mut tiles, col, height - 1, Tile::Solid);
        set(&mut tiles, col, height - 2, Tile::Solid);
    }
    for row in 0..height {
        set(&mut tiles, 0, row, Tile::Solid);
        set(&mut tiles, width - 1, row, Tile::Solid);
    }

    // Ledges from the floor up, spaced within charged-jump reach.
    let mut row = height as i64 - 2;
    loop {
        row -= rng.random_range(3..=5) as i64;
        if row < 2 {
            break;
        }
        let len = rng.random_range(3..=6);
        let start = rng.random_range(1..width - 1 - len);
        let tile = match rng.random_range(0u8..10) {
            0 => Tile::Sticky,
            1 | 2 => Tile::Ice,
            3 => Tile::Slime,
            _ => Tile::Solid,
        };
        for col in start..start + len {
            set(&mut tiles, col, row as u32, tile);
        }
    }

    let spawn_x = 2.0 * TILE_SIZE;
    let spawn_y = (height as f32 - 4.0) * TILE_SIZE;
    TileMap::new(width, height, TILE_SIZE, tiles).with_spawn(spawn_x, spawn_y)
}
