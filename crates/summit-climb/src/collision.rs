use crate::map::TileMap;
use crate::player::Player;
use crate::surface::Surface;

/// Scale applied to fall distance when sizing a bounce boost. Negative:
/// the boost is an upward impulse in Y-down coordinates.
pub const BOUNCE_BOOST_SCALE: f32 = -4.0;

/// Outcome of a horizontal resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalHit {
    /// A wall was contacted on the leading side this tick.
    pub bumped: bool,
}

/// Outcome of a vertical resolution pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalHit {
    /// A downward collision was resolved by snapping to the surface.
    pub grounded: bool,
    /// Surface classification when a downward contact occurred, bounce or
    /// not. `None` when airborne or head-bumping. The caller applies the
    /// flag mutation; the resolver never touches the flags itself.
    pub surface: Option<Surface>,
    /// Upward impulse to hand to the jump state instead of landing, sized
    /// from the fall distance.
    pub boost: Option<f32>,
}

/// Resolve a horizontal collision against the leading edge's tile column.
/// On contact the position clamps to the tile boundary on the approach
/// side; velocity is zeroed unless the player is sliding (preserved) or
/// `reflect_walls` is set (inverted).
pub fn resolve_horizontal(player: &mut Player, map: &TileMap, reflect_walls: bool) -> HorizontalHit {
    let ts = map.tile_size();
    let row_top = (player.position.y / ts).floor() as i32;
    let row_bottom = ((player.position.y + player.dimensions.y - 1.0) / ts).floor() as i32;

    let mut bumped = false;
    if player.velocity.x > 0.0 {
        let col_right = ((player.position.x + player.dimensions.x) / ts).floor() as i32;
        if map.solid_in_column(col_right, row_top..=row_bottom) {
            player.position.x = col_right as f32 * ts - player.dimensions.x;
            bumped = true;
        }
    } else if player.velocity.x < 0.0 {
        let col_left = (player.position.x / ts).floor() as i32;
        if map.solid_in_column(col_left, row_top..=row_bottom) {
            player.position.x = (col_left + 1) as f32 * ts;
            bumped = true;
        }
    }

    if bumped && !player.is_sliding {
        player.velocity.x = if reflect_walls {
            -player.velocity.x
        } else {
            0.0
        };
    }

    HorizontalHit { bumped }
}

/// Resolve a vertical collision against the leading edge's tile row.
///
/// Falling contact classifies the surface under the covered columns and
/// either snaps to the tile top (grounding, zeroing vy) or, for a slime
/// surface hit at or above `bounce_threshold`, reports a boost and leaves
/// the player airborne. Rising contact head-bumps: snap below, zero vy.
pub fn resolve_vertical(player: &mut Player, map: &TileMap, bounce_threshold: f32) -> VerticalHit {
    let ts = map.tile_size();
    let col_left = (player.position.x / ts).floor() as i32;
    let col_right = ((player.position.x + player.dimensions.x - 1.0) / ts).floor() as i32;

    player.is_on_ground = false;

    if player.velocity.y >= 0.0 {
        let row_bottom = ((player.position.y + player.dimensions.y) / ts).floor() as i32;
        if map.solid_in_row(row_bottom, col_left..=col_right) {
            let surface = map.surface_in_row(row_bottom, col_left..=col_right);
            if surface == Surface::Slime && player.velocity.y >= bounce_threshold {
                let boost = (player.position.y - player.fall_height) * BOUNCE_BOOST_SCALE;
                return VerticalHit {
                    grounded: false,
                    surface: Some(surface),
                    boost: Some(boost),
                };
            }
            player.position.y = row_bottom as f32 * ts - player.dimensions.y;
            player.velocity.y = 0.0;
            player.is_on_ground = true;
            return VerticalHit {
                grounded: true,
                surface: Some(surface),
                boost: None,
            };
        }
    } else {
        let row_top = (player.position.y / ts).floor() as i32;
        if map.solid_in_row(row_top, col_left..=col_right) {
            player.position.y = (row_top + 1) as f32 * ts;
            player.velocity.y = 0.0;
        }
    }

    VerticalHit {
        grounded: false,
        surface: None,
        boost: None,
    }
}
