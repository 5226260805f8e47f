/// All game entity types: pure data, no logic.
///
/// Positions and sizes are in logical canvas units (the playfield is a
/// real-valued rectangle, 800×600 by default).  The terminal layer
/// projects them onto character cells when drawing.

// ── Sizes & speeds ────────────────────────────────────────────────────────────

pub const SHIP_SIZE: (f32, f32) = (50.0, 50.0);
pub const PROJECTILE_SIZE: (f32, f32) = (5.0, 10.0);
pub const ENEMY_SIZE: (f32, f32) = (50.0, 50.0);

/// Horizontal ship step per frame while a direction is held.
pub const SHIP_STEP: f32 = 5.0;
/// Upward projectile step per frame.
pub const PROJECTILE_STEP: f32 = 7.0;
/// Downward enemy step per frame.
pub const ENEMY_STEP: f32 = 2.0;

/// Ship rests this far above the bottom edge (top-left corner).
pub const SHIP_BOTTOM_OFFSET: f32 = 60.0;

/// Points awarded per projectile/enemy match.
pub const SCORE_PER_HIT: u32 = 2;

pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

// ── Enums ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Ship,
    Projectile,
    Enemy,
}

impl EntityKind {
    /// Fixed (width, height) for every entity of this kind.
    pub fn size(self) -> (f32, f32) {
        match self {
            EntityKind::Ship => SHIP_SIZE,
            EntityKind::Projectile => PROJECTILE_SIZE,
            EntityKind::Enemy => ENEMY_SIZE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Over,
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// A positioned, sized rectangle.  Ship, projectile and enemy share this
/// one representation; behaviour is selected by `kind`.
///
/// Size is fixed at construction and only readable afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    width: f32,
    height: f32,
}

impl Entity {
    pub fn new(kind: EntityKind, x: f32, y: f32) -> Self {
        let (width, height) = kind.size();
        Self {
            kind,
            x,
            y,
            width,
            height,
        }
    }

    pub fn ship(x: f32, y: f32) -> Self {
        Self::new(EntityKind::Ship, x, y)
    }

    pub fn projectile(x: f32, y: f32) -> Self {
        Self::new(EntityKind::Projectile, x, y)
    }

    pub fn enemy(x: f32, y: f32) -> Self {
        Self::new(EntityKind::Enemy, x, y)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Keys that were live during one frame.  Built fresh by the host every
/// frame so gameplay never reads ambient key state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// One session's gameplay state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub ship: Entity,
    /// In creation order.
    pub projectiles: Vec<Entity>,
    /// In spawn order.
    pub enemies: Vec<Entity>,
    pub score: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}
