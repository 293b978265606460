//! Player motion and wall collision
//!
//! Movement is resolved one axis at a time: move along x, push out of any
//! wall hit, then the same for y. Splitting the axes is what lets a player
//! that clips a wall corner be nudged around it ("move assist") instead of
//! sticking on the corner.

use super::rect::{Arena, Rect};
use super::state::{Player, Wall};
use super::tick::TickInput;

/// Signed -1/0/1 from a pair of opposing keys
#[inline]
fn axis_intent(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}

/// Advance the player by one tick of input against `walls`, then clamp to
/// the arena.
///
/// Every wall is tested on both passes, in slice order. When the player
/// overlaps several walls in the same pass each one snaps the player in
/// turn, so the last overlapping wall in `walls` decides the final position.
/// Level layouts that rely on a specific tie-break need to keep that order.
pub fn advance(player: &mut Player, walls: &[Wall], input: &TickInput, arena: &Arena) {
    resolve_horizontal(player, walls, input);
    resolve_vertical(player, walls, input);
    arena.clamp_rect(&mut player.rect);
}

/// Horizontal pass: move on x, snap to wall faces, assist on y
fn resolve_horizontal(player: &mut Player, walls: &[Wall], input: &TickInput) {
    player.rect.x += axis_intent(input.right, input.left) * player.speed;

    for wall in walls {
        let w = &wall.rect;
        if !player.rect.overlaps(w) {
            continue;
        }

        if input.right {
            player.rect.x = w.x - player.rect.width;
        } else if input.left {
            player.rect.x = w.right();
        } else {
            // Vertical overlap left over from a previous tick; the vertical
            // pass owns it
            continue;
        }

        assist_vertical(&mut player.rect, w, player.assist_speed, input);
    }
}

/// Vertical pass: move on y, snap to wall faces, assist on x
fn resolve_vertical(player: &mut Player, walls: &[Wall], input: &TickInput) {
    player.rect.y += axis_intent(input.down, input.up) * player.speed;

    for wall in walls {
        let w = &wall.rect;
        if !player.rect.overlaps(w) {
            continue;
        }

        if input.down {
            player.rect.y = w.y - player.rect.height;
        } else if input.up {
            player.rect.y = w.bottom();
        } else {
            continue;
        }

        assist_horizontal(&mut player.rect, w, player.assist_speed, input);
    }
}

/// Slide along a wall face after a horizontal snap
fn assist_vertical(p: &mut Rect, w: &Rect, assist: f32, input: &TickInput) {
    if p.y < w.y && !input.up && !input.down {
        p.y -= assist;
    } else if p.bottom() > w.bottom() && !input.down {
        p.y += assist;
    }
}

/// Slide along a wall face after a vertical snap
fn assist_horizontal(p: &mut Rect, w: &Rect, assist: f32, input: &TickInput) {
    if p.x < w.x && !input.left && !input.right {
        p.x -= assist;
    } else if p.right() > w.right() {
        p.x += assist;
    }
}

/// True if the player's rect overlaps any wall
pub fn overlaps_any(rect: &Rect, walls: &[Wall]) -> bool {
    walls.iter().any(|w| rect.overlaps(&w.rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::color::Color;
    use proptest::prelude::*;

    const ARENA: Arena = Arena::new(320.0, 320.0);

    fn player_at(x: f32, y: f32, size: f32, speed: f32) -> Player {
        let mut p = Player::new(Rect::new(x, y, size, size), Color::BLACK);
        p.speed = speed;
        p
    }

    fn wall(x: f32, y: f32, w: f32, h: f32) -> Wall {
        Wall::fixed(Rect::new(x, y, w, h), Color::BLACK)
    }

    fn input(left: bool, right: bool, up: bool, down: bool) -> TickInput {
        TickInput {
            left,
            right,
            up,
            down,
        }
    }

    #[test]
    fn test_free_movement() {
        let mut p = player_at(100.0, 100.0, 18.0, 3.5);
        advance(&mut p, &[], &input(false, true, false, true), &ARENA);
        assert_eq!((p.rect.x, p.rect.y), (103.5, 103.5));

        // Opposing keys cancel
        advance(&mut p, &[], &input(true, true, true, true), &ARENA);
        assert_eq!((p.rect.x, p.rect.y), (103.5, 103.5));
    }

    #[test]
    fn test_zero_distance_snap() {
        let mut p = player_at(10.0, 10.0, 18.0, 3.5);
        let walls = [wall(28.0, 0.0, 20.0, 20.0)];
        advance(&mut p, &walls, &input(false, true, false, false), &ARENA);
        assert_eq!(p.rect.x, 10.0);
        // Bottom edge (28) hangs below the wall (20), so the assist slides down
        assert_eq!(p.rect.y, 11.0);
    }

    #[test]
    fn test_snap_moving_left() {
        let mut p = player_at(50.0, 100.0, 18.0, 4.0);
        let walls = [wall(20.0, 100.0, 28.0, 18.0)];
        advance(&mut p, &walls, &input(true, false, false, false), &ARENA);
        assert_eq!(p.rect.x, 48.0);
        assert_eq!(p.rect.y, 100.0);
    }

    #[test]
    fn test_snap_vertical() {
        let mut p = player_at(100.0, 75.0, 20.0, 4.0);
        let walls = [wall(100.0, 98.0, 20.0, 20.0)];
        advance(&mut p, &walls, &input(false, false, false, true), &ARENA);
        assert_eq!(p.rect.y, 78.0);

        let mut p = player_at(100.0, 121.0, 20.0, 4.0);
        advance(&mut p, &walls, &input(false, false, true, false), &ARENA);
        assert_eq!(p.rect.y, 118.0);
    }

    #[test]
    fn test_assist_slides_up_around_corner() {
        // Player's top sits above the wall's top: pushing right slides up
        let mut p = player_at(0.0, 92.0, 18.0, 3.0);
        let walls = [wall(20.0, 100.0, 20.0, 20.0)];
        advance(&mut p, &walls, &input(false, true, false, false), &ARENA);
        assert_eq!(p.rect.x, 2.0);
        assert_eq!(p.rect.y, 91.0);
    }

    #[test]
    fn test_assist_suppressed_by_down_key() {
        // Right + down while grazing: down is held, so no y-assist from the
        // horizontal snap. The vertical pass then moves freely.
        let mut p = player_at(0.0, 92.0, 18.0, 3.0);
        let walls = [wall(20.0, 100.0, 20.0, 20.0)];
        advance(&mut p, &walls, &input(false, true, false, true), &ARENA);
        assert_eq!(p.rect.x, 2.0);
        // 92 + 3 from the vertical pass, no assist
        assert_eq!(p.rect.y, 95.0);

        // Bottom hanging below the wall, down held: no downward slide either
        let mut p = player_at(0.0, 110.0, 18.0, 3.0);
        advance(&mut p, &walls, &input(false, true, false, true), &ARENA);
        assert_eq!(p.rect.y, 113.0);
    }

    #[test]
    fn test_assist_slides_left_on_vertical_snap() {
        // Pushing down onto a wall whose left edge is right of the player's
        let mut p = player_at(85.0, 75.0, 20.0, 4.0);
        let walls = [wall(100.0, 98.0, 20.0, 20.0)];
        advance(&mut p, &walls, &input(false, false, false, true), &ARENA);
        assert_eq!(p.rect.y, 78.0);
        assert_eq!(p.rect.x, 84.0);
    }

    #[test]
    fn test_assist_slides_right_on_vertical_snap() {
        let mut p = player_at(115.0, 75.0, 20.0, 4.0);
        let walls = [wall(100.0, 98.0, 20.0, 20.0)];
        advance(&mut p, &walls, &input(false, false, false, true), &ARENA);
        assert_eq!(p.rect.x, 116.0);

        // Right slide has no key condition; moving right onto a ledge still
        // gets the nudge on top of its own step
        let mut p = player_at(112.0, 75.0, 20.0, 4.0);
        advance(&mut p, &walls, &input(false, true, false, true), &ARENA);
        assert_eq!((p.rect.x, p.rect.y), (117.0, 78.0));

        // Holding left suppresses the left slide
        let mut p = player_at(85.0, 75.0, 20.0, 4.0);
        advance(&mut p, &walls, &input(true, false, false, true), &ARENA);
        assert_eq!(p.rect.x, 81.0);
    }

    #[test]
    fn test_wall_order_decides_chained_snaps() {
        // Snapping against `ahead` pushes the player back into `behind`,
        // which it wasn't touching before the step
        let behind = wall(100.0, 100.0, 9.0, 18.0);
        let ahead = wall(125.0, 100.0, 10.0, 18.0);
        let right = input(false, true, false, false);

        // `behind` was tested before the push, so the player stays inside it
        let mut p = player_at(100.0, 100.0, 18.0, 10.0);
        advance(&mut p, &[behind.clone(), ahead.clone()], &right, &ARENA);
        assert_eq!(p.rect.x, 107.0);

        // `behind` comes later and snaps the player again
        let mut p = player_at(100.0, 100.0, 18.0, 10.0);
        advance(&mut p, &[ahead, behind], &right, &ARENA);
        assert_eq!(p.rect.x, 82.0);
    }

    #[test]
    fn test_bounds_clamp() {
        let mut p = player_at(310.0, -4.0, 18.0, 3.5);
        advance(&mut p, &[], &TickInput::default(), &ARENA);
        assert_eq!((p.rect.x, p.rect.y), (302.0, 0.0));

        let mut p = player_at(-10.0, 400.0, 18.0, 3.5);
        advance(&mut p, &[], &TickInput::default(), &ARENA);
        assert_eq!((p.rect.x, p.rect.y), (0.0, 302.0));
    }

    #[test]
    fn test_zero_area_wall_inside_player_snaps() {
        // A point wall strictly inside the player overlaps like any other
        let mut p = player_at(100.0, 100.0, 18.0, 3.5);
        let walls = [wall(110.0, 105.0, 0.0, 0.0)];
        advance(&mut p, &walls, &input(false, true, false, false), &ARENA);
        assert_eq!((p.rect.x, p.rect.y), (92.0, 99.0));

        // On the player's edge it does not
        let mut p = player_at(100.0, 100.0, 18.0, 3.5);
        let walls = [wall(121.5, 105.0, 0.0, 0.0)];
        advance(&mut p, &walls, &input(false, true, false, false), &ARENA);
        assert_eq!((p.rect.x, p.rect.y), (103.5, 100.0));
    }

    proptest! {
        #[test]
        fn prop_no_walls_is_velocity_plus_clamp(
            x in -50.0f32..370.0,
            y in -50.0f32..370.0,
            l in any::<bool>(), r in any::<bool>(), u in any::<bool>(), d in any::<bool>(),
        ) {
            let mut p = player_at(x, y, 18.0, 3.5);
            advance(&mut p, &[], &input(l, r, u, d), &ARENA);

            let ex = (x + axis_intent(r, l) * 3.5).clamp(0.0, 302.0);
            let ey = (y + axis_intent(d, u) * 3.5).clamp(0.0, 302.0);
            prop_assert_eq!(p.rect.x, ex);
            prop_assert_eq!(p.rect.y, ey);
        }

        #[test]
        fn prop_stays_in_bounds(
            x in -100.0f32..420.0,
            y in -100.0f32..420.0,
            l in any::<bool>(), r in any::<bool>(), u in any::<bool>(), d in any::<bool>(),
        ) {
            let mut p = player_at(x, y, 18.0, 3.5);
            let walls = [wall(100.0, 100.0, 20.0, 20.0), wall(120.0, 100.0, 20.0, 20.0)];
            advance(&mut p, &walls, &input(l, r, u, d), &ARENA);
            prop_assert!(p.rect.x >= 0.0 && p.rect.x <= 302.0);
            prop_assert!(p.rect.y >= 0.0 && p.rect.y <= 302.0);
        }

        #[test]
        fn prop_snap_is_exact(gap in 0.0f32..3.4, y_off in -17.0f32..19.0) {
            // Approaching a tall wall from the left within one step always
            // lands flush against it
            let wall_x = 200.0;
            let mut p = player_at(wall_x - 18.0 - gap, 100.0 + y_off, 18.0, 3.5);
            let walls = [wall(wall_x, 80.0, 20.0, 60.0)];
            advance(&mut p, &walls, &input(false, true, false, false), &ARENA);
            prop_assert_eq!(p.rect.x, wall_x - 18.0);
        }
    }
}
