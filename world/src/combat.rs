//! Combat resolution: melee swings, NPC contact attacks, projectiles and
//! explosions.

use glam::Vec2;
use horde_core::{
    geometry, Event, ExplosionSnapshot, MeleeStrike, NpcId, ProjectileId, ProjectileKind,
    ProjectileLaunch, ProjectileSnapshot, CONTACT_COOLDOWN_TICKS, CONTACT_DISTANCE,
    EXPLOSION_TICKS,
};

use crate::{avoidance, Npc, World};

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    id: ProjectileId,
    kind: ProjectileKind,
    position: Vec2,
    velocity: Vec2,
    traveled: f32,
    range: f32,
    damage: u32,
    splash_radius: Option<f32>,
    pierce: u32,
    struck: Vec<NpcId>,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity,
            traveled: self.traveled,
            pierce: self.pierce,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Explosion {
    position: Vec2,
    radius: f32,
    ticks_remaining: u32,
}

impl Explosion {
    pub(crate) fn snapshot(&self) -> ExplosionSnapshot {
        ExplosionSnapshot {
            position: self.position,
            radius: self.radius,
            ticks_remaining: self.ticks_remaining,
        }
    }
}

enum Flight {
    Continue,
    Retire,
}

impl World {
    /// Resolves a melee swing centred on the player.
    pub(crate) fn swing(&mut self, strike: MeleeStrike, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            log::debug!("swing ignored: no player in the arena");
            return;
        };
        if player.health.is_depleted() {
            return;
        }
        player.swing_cooldown = player.swing_cooldown.max(strike.recovery_ticks);
        let origin = player.position;

        let facing = strike.facing.and_then(Vec2::try_normalize);
        let cos_half_arc = (strike.arc * 0.5).cos();

        for index in (0..self.npcs.len()).rev() {
            let Some(npc) = self.npcs.get_mut(index) else {
                continue;
            };
            let offset = npc.position - origin;
            let distance = offset.length();
            if distance > strike.range {
                continue;
            }
            if let Some(facing) = facing {
                if !geometry::within_cone(offset, facing, cos_half_arc) {
                    continue;
                }
            }

            if strike.knockback > 0.0 && distance > 0.0 {
                let from = npc.position;
                let shove = offset / distance * strike.knockback;
                npc.position = avoidance::displace(from, shove, &self.obstacles);
                if npc.position != from {
                    out_events.push(Event::NpcMoved {
                        npc: npc.id,
                        from,
                        to: npc.position,
                    });
                }
            }
            damage_npc(&mut self.npcs, index, strike.damage, out_events);
        }

        let (Some(facing), Some(tool)) = (facing, strike.tool) else {
            return;
        };
        for index in (0..self.obstacles.len()).rev() {
            let Some(obstacle) = self.obstacles.get(index) else {
                continue;
            };
            let offset = obstacle.rect().closest_point(origin) - origin;
            if offset.length() <= strike.range
                && geometry::within_cone(offset, facing, cos_half_arc)
            {
                self.obstacles.strike(index, tool, strike.damage, out_events);
            }
        }
    }

    /// Lets an NPC in contact range hurt the player.
    pub(crate) fn npc_attack(&mut self, npc: NpcId, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        let Some(attacker) = self.npcs.iter_mut().find(|candidate| candidate.id == npc) else {
            return;
        };
        if attacker.attack_cooldown > 0
            || player.immunity_ticks > 0
            || player.health.is_depleted()
            || attacker.position.distance(player.position) >= CONTACT_DISTANCE
        {
            return;
        }

        player.health = player.health.damaged(1);
        player.immunity_ticks = CONTACT_COOLDOWN_TICKS;
        attacker.attack_cooldown = CONTACT_COOLDOWN_TICKS;
        log::debug!(
            "npc {} hit the player, {} health left",
            npc.get(),
            player.health.get()
        );
        out_events.push(Event::PlayerHit {
            npc,
            remaining: player.health,
        });
    }

    /// Launches a projectile from the provided launch description.
    pub(crate) fn fire(&mut self, launch: ProjectileLaunch, out_events: &mut Vec<Event>) {
        let Some(player) = self.player.as_mut() else {
            log::debug!("launch ignored: no player in the arena");
            return;
        };
        let Some(direction) = launch.direction.try_normalize() else {
            log::debug!("launch ignored: zero-length direction");
            return;
        };
        player.cast_cooldown = player.cast_cooldown.max(launch.recovery_ticks);

        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        self.projectiles.push(Projectile {
            id,
            kind: launch.kind,
            position: launch.origin,
            velocity: direction * launch.kind.speed(),
            traveled: 0.0,
            range: launch.kind.range(),
            damage: launch.damage,
            splash_radius: launch.splash_radius,
            pierce: launch.pierce,
            struck: Vec::new(),
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            kind: launch.kind,
        });
    }

    /// Advances explosions and projectiles by one tick.
    pub(crate) fn step_projectiles(&mut self, out_events: &mut Vec<Event>) {
        for explosion in &mut self.explosions {
            explosion.ticks_remaining = explosion.ticks_remaining.saturating_sub(1);
        }
        self.explosions.retain(|explosion| explosion.ticks_remaining > 0);

        for index in (0..self.projectiles.len()).rev() {
            if let Flight::Retire = self.advance_projectile(index, out_events) {
                let projectile = self.projectiles.remove(index);
                if let Some(radius) = projectile.splash_radius {
                    self.detonate(projectile.position, radius, projectile.damage, out_events);
                }
                out_events.push(Event::ProjectileRetired {
                    projectile: projectile.id,
                    position: projectile.position,
                });
            }
        }
    }

    fn advance_projectile(&mut self, index: usize, out_events: &mut Vec<Event>) -> Flight {
        let Some(projectile) = self.projectiles.get_mut(index) else {
            return Flight::Continue;
        };
        projectile.position += projectile.velocity;
        projectile.traveled += projectile.velocity.length();

        let position = projectile.position;
        let radius = projectile.kind.collision_radius();

        if let Some(hit) = self.obstacles.first_overlapping(position, radius) {
            self.obstacles
                .strike(hit, projectile.kind.tool(), projectile.damage, out_events);
            return Flight::Retire;
        }

        let target = self.npcs.iter().position(|npc| {
            !projectile.struck.contains(&npc.id) && touches_npc(npc.position, position, radius)
        });
        if let Some(target) = target {
            let struck = self.npcs[target].id;
            damage_npc(&mut self.npcs, target, projectile.damage, out_events);
            if projectile.pierce == 0 {
                return Flight::Retire;
            }
            projectile.pierce -= 1;
            projectile.struck.push(struck);
            return Flight::Continue;
        }

        if projectile.traveled > projectile.range {
            Flight::Retire
        } else {
            Flight::Continue
        }
    }

    fn detonate(&mut self, position: Vec2, radius: f32, damage: u32, out_events: &mut Vec<Event>) {
        for index in (0..self.npcs.len()).rev() {
            let inside = self
                .npcs
                .get(index)
                .is_some_and(|npc| npc.position.distance(position) <= radius);
            if inside {
                damage_npc(&mut self.npcs, index, damage, out_events);
            }
        }

        self.explosions.push(Explosion {
            position,
            radius,
            ticks_remaining: EXPLOSION_TICKS,
        });
        out_events.push(Event::ExplosionSpawned { position, radius });
    }

    /// Endpoint of a projectile of `kind` fired from `origin` along `direction`.
    pub(crate) fn preview(
        &self,
        origin: Vec2,
        direction: Vec2,
        kind: ProjectileKind,
    ) -> Option<Vec2> {
        let velocity = direction.try_normalize()? * kind.speed();
        let radius = kind.collision_radius();
        let mut position = origin;
        let mut traveled = 0.0;

        while traveled < kind.range() {
            position += velocity;
            traveled += kind.speed();
            let blocked = self.obstacles.overlaps_circle(position, radius)
                || self
                    .npcs
                    .iter()
                    .any(|npc| touches_npc(npc.position, position, radius));
            if blocked {
                break;
            }
        }

        Some(position)
    }
}

/// Projectiles hit an NPC once their centres are closer than twice the
/// projectile's collision radius; the NPC body radius plays no part.
fn touches_npc(npc: Vec2, projectile: Vec2, radius: f32) -> bool {
    npc.distance(projectile) < radius * 2.0
}

/// Subtracts `damage` from the NPC at `index`, removing it when it dies.
fn damage_npc(npcs: &mut Vec<Npc>, index: usize, damage: u32, out_events: &mut Vec<Event>) {
    let Some(npc) = npcs.get_mut(index) else {
        return;
    };
    npc.health = npc.health.damaged(damage);
    if !npc.health.is_depleted() {
        out_events.push(Event::NpcDamaged {
            npc: npc.id,
            remaining: npc.health,
        });
        return;
    }

    let killed = npcs.remove(index);
    log::debug!("npc {} killed at {}", killed.id.get(), killed.position);
    out_events.push(Event::NpcKilled {
        npc: killed.id,
        position: killed.position,
        variant: killed.variant,
    });
}
