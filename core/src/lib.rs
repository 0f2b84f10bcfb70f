#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Horde simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

pub mod geometry;

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use geometry::Rect;

/// Edge length of a square arena tile measured in world units.
pub const TILE_SIZE: f32 = 40.0;

/// Collision radius of every NPC.
pub const NPC_RADIUS: f32 = 10.0;

/// Collision radius of the player.
pub const PLAYER_RADIUS: f32 = 10.0;

/// Distance within which a wandering NPC may notice the player.
pub const TRIGGER_DISTANCE: f32 = 60.0;

/// Padding applied to obstacles when NPCs test visibility of the player.
pub const SIGHT_PADDING: f32 = 10.0;

/// Minimum centre distance NPCs try to keep between each other.
pub const SEPARATION_DISTANCE: f32 = 20.0;

/// Centre distance below which an NPC can strike the player.
pub const CONTACT_DISTANCE: f32 = 20.0;

/// Health every NPC spawns with.
pub const NPC_MAX_HEALTH: Health = Health::new(2);

/// Health the player is placed with.
pub const PLAYER_MAX_HEALTH: Health = Health::new(10);

/// World units the player covers per tick of movement input.
pub const PLAYER_SPEED: f32 = 2.0;

/// World units a chasing NPC covers per tick.
pub const CHASE_SPEED: f32 = 1.0;

/// World units a wandering NPC covers per tick.
pub const WANDER_SPEED: f32 = 0.2;

/// Distance at which a wandering NPC considers its destination reached.
pub const WANDER_ARRIVAL_DISTANCE: f32 = 5.0;

/// Shortest pause a wandering NPC takes after reaching a destination.
pub const WANDER_IDLE_MIN_TICKS: u32 = 60;

/// Longest pause a wandering NPC takes after reaching a destination.
pub const WANDER_IDLE_MAX_TICKS: u32 = 180;

/// Number of samples drawn by bounded-retry placement before the last sample
/// is accepted.
pub const PLACEMENT_ATTEMPTS: u32 = 20;

/// Ticks the player stays immune, and the striking NPC stays idle, after a
/// contact attack.
pub const CONTACT_COOLDOWN_TICKS: u32 = 30;

/// Ticks a damaged obstacle keeps flashing.
pub const OBSTACLE_FLASH_TICKS: u32 = 5;

/// Ticks an explosion stays visible.
pub const EXPLOSION_TICKS: u32 = 15;

/// Ticks between two melee swings.
pub const SWING_COOLDOWN_TICKS: u32 = 10;

/// Ticks between two fireball casts.
pub const CAST_COOLDOWN_TICKS: u32 = 15;

/// Reach of a melee swing.
pub const MELEE_RANGE: f32 = 30.0;

/// Full opening angle of a melee swing in radians.
pub const MELEE_ARC: f32 = FRAC_PI_2;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the arena bounds and the obstacle registry.
    ConfigureArena {
        /// Dimensions of the arena in world units.
        bounds: ArenaBounds,
        /// Obstacles to create, one per tile.
        obstacles: Vec<ObstaclePlacement>,
    },
    /// Places the player into the arena at full health.
    PlacePlayer {
        /// Position the player occupies after placement.
        position: Vec2,
        /// Equipment the player carries.
        equipment: Equipment,
    },
    /// Creates a new NPC.
    SpawnNpc {
        /// Position the NPC occupies after spawning.
        position: Vec2,
        /// Variant that determines the NPC's drop table.
        variant: NpcVariant,
    },
    /// Advances the simulation clock by a single tick, decaying timers.
    Tick,
    /// Moves the player according to raw movement input.
    MovePlayer {
        /// Requested direction of travel; normalised by the world.
        movement: Vec2,
        /// Requested facing; ignored when zero.
        facing: Vec2,
    },
    /// Switches a wandering NPC into the chasing state.
    TriggerNpc {
        /// NPC that noticed the player.
        npc: NpcId,
    },
    /// Consumes one tick of a wandering NPC's idle countdown.
    WaitNpc {
        /// NPC that is pausing.
        npc: NpcId,
    },
    /// Assigns a wander destination to an NPC.
    SetWanderDestination {
        /// NPC receiving the destination.
        npc: NpcId,
        /// Point the NPC wanders toward.
        destination: Vec2,
    },
    /// Clears an NPC's wander destination and starts an idle countdown.
    RestNpc {
        /// NPC that reached its destination.
        npc: NpcId,
        /// Number of ticks the NPC pauses.
        idle_ticks: u32,
    },
    /// Moves an NPC one step toward a point, resolving collisions.
    SteerNpc {
        /// NPC being moved.
        npc: NpcId,
        /// Point the NPC steps toward.
        toward: Vec2,
        /// Distance covered by the step.
        speed: f32,
    },
    /// Lets an NPC in contact range strike the player.
    NpcAttack {
        /// NPC delivering the attack.
        npc: NpcId,
    },
    /// Resolves a melee swing originating at the player.
    Swing {
        /// Parameters of the swing.
        strike: MeleeStrike,
    },
    /// Launches a projectile.
    FireProjectile {
        /// Parameters of the launch.
        launch: ProjectileLaunch,
    },
    /// Advances every live projectile and explosion by one tick.
    StepProjectiles,
    /// Consumes the single loot roll of a shelf obstacle.
    SearchShelf {
        /// Obstacle being searched.
        obstacle: ObstacleId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the arena was configured.
    ArenaConfigured {
        /// Dimensions of the new arena.
        bounds: ArenaBounds,
        /// Number of obstacles registered after duplicates were dropped.
        obstacles: usize,
    },
    /// Confirms that the player entered the arena.
    PlayerPlaced {
        /// Position the player occupies.
        position: Vec2,
    },
    /// Reports that the player changed position.
    PlayerMoved {
        /// Position before the move.
        from: Vec2,
        /// Position after the move.
        to: Vec2,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Confirms that an NPC was created.
    NpcSpawned {
        /// Identifier assigned to the NPC.
        npc: NpcId,
        /// Position the NPC occupies.
        position: Vec2,
        /// Variant of the NPC.
        variant: NpcVariant,
    },
    /// Reports that an NPC noticed the player and started chasing.
    NpcTriggered {
        /// NPC that changed state.
        npc: NpcId,
    },
    /// Reports that an NPC changed position.
    NpcMoved {
        /// NPC that moved.
        npc: NpcId,
        /// Position before the step.
        from: Vec2,
        /// Position after the step and collision resolution.
        to: Vec2,
    },
    /// Reports that an NPC lost health and survived.
    NpcDamaged {
        /// NPC that was hit.
        npc: NpcId,
        /// Health left after the hit.
        remaining: Health,
    },
    /// Reports that an NPC died and left the arena.
    NpcKilled {
        /// NPC that died.
        npc: NpcId,
        /// Position the NPC occupied when it died.
        position: Vec2,
        /// Variant of the NPC, which selects its drop table.
        variant: NpcVariant,
    },
    /// Reports that an NPC struck the player.
    PlayerHit {
        /// NPC that delivered the attack.
        npc: NpcId,
        /// Player health left after the hit.
        remaining: Health,
    },
    /// Reports that an obstacle lost hit points and still stands.
    ObstacleDamaged {
        /// Obstacle that was hit.
        obstacle: ObstacleId,
        /// Hit points left after the hit.
        remaining: u32,
    },
    /// Reports that an obstacle was destroyed and removed.
    ObstacleDestroyed {
        /// Obstacle that was destroyed.
        obstacle: ObstacleId,
        /// Material the obstacle was built from.
        material: Material,
        /// Centre of the tile the obstacle occupied.
        center: Vec2,
    },
    /// Confirms that a projectile entered the arena.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Kind of projectile launched.
        kind: ProjectileKind,
    },
    /// Reports that a projectile left the arena.
    ProjectileRetired {
        /// Projectile that was retired.
        projectile: ProjectileId,
        /// Position where the projectile stopped.
        position: Vec2,
    },
    /// Reports that a splash-capable projectile detonated.
    ExplosionSpawned {
        /// Centre of the explosion.
        position: Vec2,
        /// Radius of the splash damage.
        radius: f32,
    },
    /// Confirms that a shelf was searched for loot.
    ShelfSearched {
        /// Obstacle that was searched.
        obstacle: ObstacleId,
        /// Centre of the searched shelf.
        center: Vec2,
    },
    /// Reports that a shelf search was rejected.
    ShelfSearchRejected {
        /// Obstacle named by the rejected request.
        obstacle: ObstacleId,
        /// Reason for the rejection.
        reason: SearchError,
    },
}

/// Reasons a shelf search may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchError {
    /// The shelf already yielded its loot roll.
    AlreadySearched,
    /// No obstacle with the requested identifier exists.
    MissingObstacle,
}

/// Unique identifier assigned to an NPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NpcId(u32);

impl NpcId {
    /// Creates a new NPC identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(u32);

impl ObstacleId {
    /// Creates a new obstacle identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Health pool of an NPC or the player. Zero means dead.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Health(u32);

impl Health {
    /// Creates a health pool holding the provided amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the remaining amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the pool is exhausted.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Returns the pool after losing `damage`, saturating at zero.
    #[must_use]
    pub const fn damaged(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Location of a tile within the arena grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Tile containing the provided world position.
    #[must_use]
    pub fn containing(position: Vec2) -> Self {
        let tile = (position / TILE_SIZE).floor();
        Self::new(tile.x as i32, tile.y as i32)
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Upper-left corner of the tile in world units.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.column as f32, self.row as f32) * TILE_SIZE
    }

    /// Centre of the tile in world units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin() + Vec2::splat(TILE_SIZE * 0.5)
    }

    /// Tile offset by the provided column and row deltas.
    #[must_use]
    pub const fn offset(&self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }
}

/// Dimensions of the arena in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    width: f32,
    height: f32,
}

impl ArenaBounds {
    /// Creates arena bounds spanning `width` by `height` world units.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Arena bounds covering exactly `columns` by `rows` tiles.
    #[must_use]
    pub fn from_tiles(columns: u32, rows: u32) -> Self {
        Self::new(columns as f32 * TILE_SIZE, rows as f32 * TILE_SIZE)
    }

    /// Width of the arena in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the arena in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Number of whole tile columns covering the arena.
    #[must_use]
    pub fn columns(&self) -> i32 {
        (self.width / TILE_SIZE).floor().max(0.0) as i32
    }

    /// Number of whole tile rows covering the arena.
    #[must_use]
    pub fn rows(&self) -> i32 {
        (self.height / TILE_SIZE).floor().max(0.0) as i32
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub fn contains_tile(&self, tile: TileCoord) -> bool {
        tile.column() >= 0
            && tile.row() >= 0
            && tile.column() < self.columns()
            && tile.row() < self.rows()
    }

    /// Clamps a world position into the arena.
    #[must_use]
    pub fn clamp(&self, position: Vec2) -> Vec2 {
        position.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

/// Material an obstacle is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    /// Flimsy plastic shelving.
    Plastic,
    /// Wooden panels.
    Wood,
    /// Steel racking.
    Steel,
}

impl Material {
    /// Every material in declaration order.
    pub const ALL: [Material; 3] = [Material::Plastic, Material::Wood, Material::Steel];

    /// Hit points a fresh obstacle of this material starts with.
    #[must_use]
    pub const fn max_hit_points(self) -> u32 {
        match self {
            Material::Plastic => 10,
            Material::Wood => 20,
            Material::Steel => 30,
        }
    }

    /// Salvage dropped when an obstacle of this material is destroyed.
    #[must_use]
    pub const fn salvage(self) -> Item {
        match self {
            Material::Plastic => Item::PlasticFragments,
            Material::Wood => Item::WoodPlanks,
            Material::Steel => Item::SteelPlates,
        }
    }

    /// Reports whether the tool is on this material's allow-list.
    #[must_use]
    pub const fn is_damaged_by(self, tool: Tool) -> bool {
        match self {
            Material::Plastic => true,
            Material::Wood => matches!(
                tool,
                Tool::Hammer | Tool::Axe | Tool::ReinforcedAxe | Tool::Fireball
            ),
            Material::Steel => matches!(tool, Tool::Crowbar | Tool::ReinforcedAxe),
        }
    }
}

/// Anything that can damage an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Baseball bat swing.
    BaseballBat,
    /// Hammer swing.
    Hammer,
    /// Crowbar swing.
    Crowbar,
    /// Axe swing.
    Axe,
    /// Reinforced axe swing.
    ReinforcedAxe,
    /// Arrow impact.
    Arrow,
    /// Fireball impact.
    Fireball,
}

/// Melee weapons the player can wield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeleeWeapon {
    /// Baseball bat.
    BaseballBat,
    /// Hammer.
    Hammer,
    /// Crowbar.
    Crowbar,
    /// Axe.
    Axe,
    /// Reinforced axe.
    ReinforcedAxe,
}

impl MeleeWeapon {
    /// Tool used when the weapon strikes an obstacle.
    #[must_use]
    pub const fn tool(self) -> Tool {
        match self {
            MeleeWeapon::BaseballBat => Tool::BaseballBat,
            MeleeWeapon::Hammer => Tool::Hammer,
            MeleeWeapon::Crowbar => Tool::Crowbar,
            MeleeWeapon::Axe => Tool::Axe,
            MeleeWeapon::ReinforcedAxe => Tool::ReinforcedAxe,
        }
    }

    /// Distance an NPC is pushed back when struck.
    #[must_use]
    pub const fn knockback(self) -> f32 {
        match self {
            MeleeWeapon::BaseballBat => 4.0,
            MeleeWeapon::Hammer => 2.0,
            MeleeWeapon::Crowbar | MeleeWeapon::Axe => 3.0,
            MeleeWeapon::ReinforcedAxe => 5.0,
        }
    }
}

/// Equipment currently carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Equipment {
    /// Bare hands.
    Unarmed,
    /// A melee weapon with its base damage.
    Melee {
        /// Weapon being wielded.
        weapon: MeleeWeapon,
        /// Damage dealt per hit.
        damage: u32,
    },
    /// A bow that looses arrows when aiming is released.
    Bow,
    /// A fireball spell of the provided level.
    FireballSpell {
        /// Spell level; higher levels hit harder and pierce.
        level: u8,
    },
}

impl Default for Equipment {
    fn default() -> Self {
        Equipment::Melee {
            weapon: MeleeWeapon::BaseballBat,
            damage: 1,
        }
    }
}

/// Kinds of projectile the player can launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight-flying arrow without splash.
    Arrow,
    /// Splash-capable fire bolt.
    Fireball,
}

impl ProjectileKind {
    /// Distance travelled per tick.
    #[must_use]
    pub const fn speed(self) -> f32 {
        3.0
    }

    /// Radius used for NPC overlap checks.
    #[must_use]
    pub const fn collision_radius(self) -> f32 {
        match self {
            ProjectileKind::Arrow => 2.0,
            ProjectileKind::Fireball => 4.0,
        }
    }

    /// Furthest distance the projectile travels before retiring.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            ProjectileKind::Arrow => 400.0,
            ProjectileKind::Fireball => 320.0,
        }
    }

    /// Tool applied to obstacles the projectile strikes.
    #[must_use]
    pub const fn tool(self) -> Tool {
        match self {
            ProjectileKind::Arrow => Tool::Arrow,
            ProjectileKind::Fireball => Tool::Fireball,
        }
    }
}

/// Full description of a projectile about to be launched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileLaunch {
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// Launch position.
    pub origin: Vec2,
    /// Direction of travel; the world normalises it and rejects zero vectors.
    pub direction: Vec2,
    /// Damage dealt to each struck NPC.
    pub damage: u32,
    /// Radius of the detonation, if the projectile detonates.
    pub splash_radius: Option<f32>,
    /// Number of NPCs the projectile may pass through before its terminal hit.
    pub pierce: u32,
    /// Ticks the player must wait before casting again.
    pub recovery_ticks: u32,
}

impl ProjectileLaunch {
    /// Arrow loosed from `origin` along `direction`.
    #[must_use]
    pub const fn arrow(origin: Vec2, direction: Vec2) -> Self {
        Self {
            kind: ProjectileKind::Arrow,
            origin,
            direction,
            damage: 2,
            splash_radius: None,
            pierce: 0,
            recovery_ticks: 0,
        }
    }

    /// Fireball of the provided spell level cast from `origin` along `direction`.
    #[must_use]
    pub const fn fireball(origin: Vec2, direction: Vec2, level: u8) -> Self {
        let (damage, splash, pierce) = match level {
            0 | 1 => (1, 40.0, 0),
            2 => (2, 60.0, 0),
            _ => (3, 80.0, 1),
        };
        Self {
            kind: ProjectileKind::Fireball,
            origin,
            direction,
            damage,
            splash_radius: Some(splash),
            pierce,
            recovery_ticks: CAST_COOLDOWN_TICKS,
        }
    }
}

/// Parameters of a melee swing centred on the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeleeStrike {
    /// Damage dealt to each NPC and obstacle hit.
    pub damage: u32,
    /// Reach of the swing.
    pub range: f32,
    /// Facing of the cone; `None` hits in every direction and skips obstacles.
    pub facing: Option<Vec2>,
    /// Full opening angle of the cone in radians.
    pub arc: f32,
    /// Distance struck NPCs are pushed away from the player.
    pub knockback: f32,
    /// Tool applied to obstacles; `None` leaves obstacles untouched.
    pub tool: Option<Tool>,
    /// Ticks the player must wait before swinging again.
    pub recovery_ticks: u32,
}

impl MeleeStrike {
    /// Omnidirectional strike without knockback, tool or recovery.
    #[must_use]
    pub const fn new(damage: u32, range: f32) -> Self {
        Self {
            damage,
            range,
            facing: None,
            arc: MELEE_ARC,
            knockback: 0.0,
            tool: None,
            recovery_ticks: 0,
        }
    }

    /// Restricts the strike to a cone around `facing`.
    #[must_use]
    pub fn with_cone(mut self, facing: Vec2, arc: f32) -> Self {
        self.facing = Some(facing);
        self.arc = arc;
        self
    }

    /// Pushes struck NPCs away by `knockback` units.
    #[must_use]
    pub fn with_knockback(mut self, knockback: f32) -> Self {
        self.knockback = knockback;
        self
    }

    /// Lets the strike damage obstacles that admit `tool`.
    #[must_use]
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Sets the cooldown started by the strike.
    #[must_use]
    pub fn with_recovery(mut self, ticks: u32) -> Self {
        self.recovery_ticks = ticks;
        self
    }

    /// Swing produced by the equipment while facing `facing`.
    ///
    /// Returns `None` for ranged equipment, which cannot swing.
    #[must_use]
    pub fn for_equipment(equipment: Equipment, facing: Vec2) -> Option<Self> {
        let strike = match equipment {
            Equipment::Unarmed => Self::new(1, MELEE_RANGE),
            Equipment::Melee { weapon, damage } => Self::new(damage, MELEE_RANGE)
                .with_knockback(weapon.knockback())
                .with_tool(weapon.tool()),
            Equipment::Bow | Equipment::FireballSpell { .. } => return None,
        };
        Some(
            strike
                .with_cone(facing, MELEE_ARC)
                .with_recovery(SWING_COOLDOWN_TICKS),
        )
    }
}

/// Visual and loot variant of an NPC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcVariant {
    /// Ordinary zombie.
    #[default]
    Normal,
    /// Elite burning zombie with a richer drop table.
    Fire,
}

/// Behaviour state of an NPC.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Patrolling between random destinations.
    #[default]
    Wandering,
    /// Pursuing the player. Terminal.
    Chasing,
}

/// Items dropped by kills, destroyed obstacles and searched shelves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    /// Ember core dropped by fire zombies.
    FireCore,
    /// Zombie core.
    Core,
    /// Zombie flesh.
    Flesh,
    /// Zombie teeth.
    Teeth,
    /// Scrap metal.
    ScrapMetal,
    /// Duct tape.
    DuctTape,
    /// Nails.
    Nails,
    /// Salvage from plastic obstacles.
    PlasticFragments,
    /// Salvage from wooden obstacles.
    WoodPlanks,
    /// Salvage from steel obstacles.
    SteelPlates,
}

impl Item {
    /// Crafting materials a shelf search may yield.
    pub const CRAFTING_MATERIALS: [Item; 6] = [
        Item::ScrapMetal,
        Item::DuctTape,
        Item::Nails,
        Item::PlasticFragments,
        Item::WoodPlanks,
        Item::SteelPlates,
    ];
}

/// Obstacle requested by an arena layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    /// Tile the obstacle fills.
    pub tile: TileCoord,
    /// Material the obstacle is built from.
    pub material: Material,
}

impl ObstaclePlacement {
    /// Creates a new placement.
    #[must_use]
    pub const fn new(tile: TileCoord, material: Material) -> Self {
        Self { tile, material }
    }
}

/// Raw player input sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Requested direction of travel.
    pub movement: Vec2,
    /// Requested facing.
    pub facing: Vec2,
    /// Edge trigger: the use action was pressed this tick.
    pub use_pressed: bool,
    /// Level trigger: the aim action is currently held.
    pub aim_held: bool,
}

/// Snapshot describing an NPC's state for read-only consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NpcSnapshot {
    /// Identifier of the NPC.
    pub id: NpcId,
    /// Current position.
    pub position: Vec2,
    /// Unit vector the NPC faces.
    pub facing: Vec2,
    /// Remaining health.
    pub health: Health,
    /// Variant of the NPC.
    pub variant: NpcVariant,
    /// Current behaviour state.
    pub state: BehaviorState,
    /// Point the NPC wanders toward, if any.
    pub wander_destination: Option<Vec2>,
    /// Ticks left in the current wander pause.
    pub idle_ticks: u32,
    /// Ticks until the NPC may strike the player again.
    pub attack_cooldown: u32,
}

/// Read-only snapshot describing all NPCs in the arena.
#[derive(Clone, Debug, Default)]
pub struct NpcView {
    snapshots: Vec<NpcSnapshot>,
}

impl NpcView {
    /// Creates a new NPC view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<NpcSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured NPC snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &NpcSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the NPC with the provided identifier.
    #[must_use]
    pub fn get(&self, npc: NpcId) -> Option<&NpcSnapshot> {
        self.snapshots
            .binary_search_by_key(&npc, |snapshot| snapshot.id)
            .ok()
            .and_then(|index| self.snapshots.get(index))
    }

    /// Number of NPCs captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no NPCs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<NpcSnapshot> {
        self.snapshots
    }
}

/// Snapshot describing an obstacle for read-only consumers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleSnapshot {
    /// Identifier of the obstacle.
    pub id: ObstacleId,
    /// Tile the obstacle fills.
    pub tile: TileCoord,
    /// Material of the obstacle.
    pub material: Material,
    /// Hit points left.
    pub hit_points: u32,
    /// Ticks left in the damage flash.
    pub flash_ticks: u32,
    /// Whether the shelf's loot roll was consumed.
    pub opened: bool,
}

impl ObstacleSnapshot {
    /// Footprint of the obstacle in world units.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::of_tile(self.tile)
    }
}

/// Read-only snapshot describing all obstacles in the arena.
#[derive(Clone, Debug, Default)]
pub struct ObstacleView {
    snapshots: Vec<ObstacleSnapshot>,
}

impl ObstacleView {
    /// Creates a new obstacle view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ObstacleSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured obstacle snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ObstacleSnapshot> {
        self.snapshots.iter()
    }

    /// Number of obstacles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no obstacles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ObstacleSnapshot> {
        self.snapshots
    }
}

/// Snapshot describing the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Current position.
    pub position: Vec2,
    /// Unit vector the player faces.
    pub facing: Vec2,
    /// Remaining health.
    pub health: Health,
    /// Ticks of damage immunity left.
    pub immunity_ticks: u32,
    /// Ticks until the next melee swing.
    pub swing_cooldown: u32,
    /// Ticks until the next fireball cast.
    pub cast_cooldown: u32,
    /// Equipment carried.
    pub equipment: Equipment,
}

/// Snapshot describing a live projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// Current position.
    pub position: Vec2,
    /// Displacement applied per tick.
    pub velocity: Vec2,
    /// Distance covered so far.
    pub traveled: f32,
    /// Pierce budget left.
    pub pierce: u32,
}

/// Snapshot describing a live explosion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionSnapshot {
    /// Centre of the explosion.
    pub position: Vec2,
    /// Splash radius.
    pub radius: f32,
    /// Ticks until the explosion disappears.
    pub ticks_remaining: u32,
}
