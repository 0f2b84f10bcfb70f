use glam::Vec2;
use horde_core::{PlayerInput, MELEE_RANGE};
use horde_world::{query, World};

/// Input of a player that stands still, faces the nearest NPC and swings
/// once it is within melee range.
pub(crate) fn input(world: &World) -> PlayerInput {
    let Some(player) = query::player(world) else {
        return PlayerInput::default();
    };
    let npcs = query::npc_view(world);
    let Some(nearest) = npcs.iter().min_by(|a, b| {
        a.position
            .distance_squared(player.position)
            .total_cmp(&b.position.distance_squared(player.position))
    }) else {
        return PlayerInput::default();
    };

    let offset = nearest.position - player.position;
    PlayerInput {
        movement: Vec2::ZERO,
        facing: offset,
        use_pressed: offset.length() <= MELEE_RANGE,
        aim_held: false,
    }
}
