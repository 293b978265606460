//! WebGPU rendering module
//!
//! The scene is flat: every entity is a filled rectangle except the
//! checkpoint, which is a circle. Vertices are built in canvas pixels and
//! mapped to NDC by the pipeline.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, canvas_to_ndc};
pub use vertex::Vertex;

use crate::sim::GameState;

/// Triangle list for the whole level, back to front:
/// background, walls, checkpoint, player
pub fn scene_vertices(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(
        6 * (state.walls.len() + 2) + 3 * shapes::CIRCLE_SEGMENTS as usize,
    );

    vertices.extend(shapes::rect(
        &state.background.rect,
        state.background.color.to_normalized(),
    ));

    for wall in &state.walls {
        vertices.extend(shapes::rect(&wall.rect, wall.color.to_normalized()));
    }

    let cp = &state.checkpoint;
    vertices.extend(shapes::circle(
        cp.rect.center(),
        cp.radius(),
        cp.color.to_normalized(),
        shapes::CIRCLE_SEGMENTS,
    ));

    vertices.extend(shapes::rect(
        &state.player.rect,
        state.player.color.to_normalized(),
    ));

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Arena, Color, Rect, Wall};

    #[test]
    fn test_scene_order_and_colors() {
        let mut state = GameState::new(Arena::new(320.0, 320.0), 20.0);
        state.walls.push(Wall::fixed(
            Rect::new(0.0, 0.0, 20.0, 20.0),
            Color::rgba(300.0, 51.0, -4.0, 1.0),
        ));

        let v = scene_vertices(&state);
        let circle = 3 * shapes::CIRCLE_SEGMENTS as usize;
        assert_eq!(v.len(), 6 + 6 + circle + 6);

        // Background first, white
        assert_eq!(v[0].color, [1.0, 1.0, 1.0, 1.0]);
        // Wall color clamped on the way out
        assert_eq!(v[6].color, [1.0, 0.2, 0.0, 1.0]);
        // Player last
        let last = v.last().unwrap();
        assert_eq!(last.color, [240.0 / 255.0, 0.0, 0.0, 1.0]);
    }
}
