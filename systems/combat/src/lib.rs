#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns player input and proximity into combat commands.

mod loot;

pub use loot::{LootDrop, LootTable};

use horde_core::{
    Command, Equipment, Event, MeleeStrike, NpcView, PlayerInput, PlayerSnapshot,
    ProjectileLaunch, CONTACT_DISTANCE,
};

/// Combat system that queues swings, launches and NPC contact attacks.
#[derive(Debug, Default)]
pub struct Combat {
    was_aiming: bool,
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with no aim held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits combat commands for the current tick.
    ///
    /// Contact attacks are proposed for every NPC touching the player whose
    /// cooldown has elapsed; the world only honours the first one because the
    /// hit grants the player immunity. The use action swings melee equipment
    /// or casts a fireball, and releasing the aim action looses an arrow.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: &PlayerInput,
        player: Option<&PlayerSnapshot>,
        npcs: &NpcView,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        let released = self.was_aiming && !input.aim_held;
        self.was_aiming = input.aim_held;

        let Some(player) = player else {
            return;
        };
        if player.health.is_depleted() {
            return;
        }

        self.scratch.clear();

        if player.immunity_ticks == 0 {
            self.scratch.extend(
                npcs.iter()
                    .filter(|npc| {
                        npc.attack_cooldown == 0
                            && npc.position.distance(player.position) < CONTACT_DISTANCE
                    })
                    .map(|npc| Command::NpcAttack { npc: npc.id }),
            );
        }

        if input.use_pressed {
            if let Some(command) = use_action(player) {
                self.scratch.push(command);
            }
        }

        if released && player.equipment == Equipment::Bow {
            self.scratch.push(Command::FireProjectile {
                launch: ProjectileLaunch::arrow(player.position, player.facing),
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn use_action(player: &PlayerSnapshot) -> Option<Command> {
    match player.equipment {
        Equipment::FireballSpell { level } => (player.cast_cooldown == 0).then(|| {
            Command::FireProjectile {
                launch: ProjectileLaunch::fireball(player.position, player.facing, level),
            }
        }),
        equipment => {
            if player.swing_cooldown > 0 {
                return None;
            }
            MeleeStrike::for_equipment(equipment, player.facing)
                .map(|strike| Command::Swing { strike })
        }
    }
}
