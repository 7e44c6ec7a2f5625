use serde::{Deserialize, Serialize};

use crate::player::Player;

/// Surface classification for the tiles an entity lands on. Returned by
/// the vertical collision resolver and consumed only by the player update
/// step, which is the single writer of the movement-modifier flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    /// An ordinary solid tile: clears every modifier flag.
    Plain,
    Sticky,
    Ice,
    Slime,
}

impl Surface {
    /// Apply this surface's flag mutation. At most one modifier flag is
    /// true afterwards.
    pub fn apply(self, player: &mut Player) {
        match self {
            Surface::Plain => {
                player.is_sticky = false;
                player.is_sliding = false;
                player.is_bouncing = false;
            },
            Surface::Sticky => {
                player.is_sticky = true;
                player.is_sliding = false;
                player.is_bouncing = false;
            },
            Surface::Ice => {
                player.is_sticky = false;
                player.is_sliding = true;
                player.is_bouncing = false;
            },
            Surface::Slime => {
                player.is_sticky = false;
                player.is_sliding = false;
                player.is_bouncing = true;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(player: &Player) -> [bool; 3] {
        [player.is_sticky, player.is_sliding, player.is_bouncing]
    }

    #[test]
    fn each_surface_sets_exactly_one_flag() {
        let mut player = Player::new(0.0, 0.0);

        Surface::Sticky.apply(&mut player);
        assert_eq!(flags(&player), [true, false, false]);

        Surface::Ice.apply(&mut player);
        assert_eq!(flags(&player), [false, true, false]);

        Surface::Slime.apply(&mut player);
        assert_eq!(flags(&player), [false, false, true]);
    }

    #[test]
    fn plain_clears_all_flags() {
        let mut player = Player::new(0.0, 0.0);
        Surface::Ice.apply(&mut player);
        Surface::Plain.apply(&mut player);
        assert_eq!(flags(&player), [false, false, false]);
    }
}
