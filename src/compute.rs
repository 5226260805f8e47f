/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` and returns a brand-new `GameState`.  Nothing here touches
/// the terminal, the clock or the score store.

use crate::entities::{
    Entity, EntityKind, GameState, GameStatus, InputSnapshot, ENEMY_STEP, PROJECTILE_SIZE,
    PROJECTILE_STEP, SCORE_PER_HIT, SHIP_BOTTOM_OFFSET, SHIP_SIZE, SHIP_STEP,
};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Where the ship sits at the start of every session: canvas centre,
/// pulled left when the canvas is too narrow to fit the hull there.
pub fn ship_home(width: f32, height: f32) -> (f32, f32) {
    let max_x = (width - SHIP_SIZE.0).max(0.0);
    ((width / 2.0).min(max_x), height - SHIP_BOTTOM_OFFSET)
}

/// Build the initial game state for a canvas of the given size.
pub fn init_state(width: f32, height: f32) -> GameState {
    let (x, y) = ship_home(width, height);
    GameState {
        ship: Entity::ship(x, y),
        projectiles: Vec::new(),
        enemies: Vec::new(),
        score: 0,
        status: GameStatus::Running,
        frame: 0,
        width,
        height,
    }
}

/// Explicit OVER → RUNNING transition: empty board, zero score, ship home.
pub fn reset(state: &GameState) -> GameState {
    init_state(state.width, state.height)
}

// ── Movement rules ───────────────────────────────────────────────────────────

/// Apply one frame of the kind-specific movement rule.
///
/// The ship only moves horizontally and stays inside `[0, width - ship_w]`;
/// right wins when both directions are held.
pub fn advance(entity: &Entity, input: &InputSnapshot, canvas_width: f32) -> Entity {
    let mut next = entity.clone();
    match entity.kind {
        EntityKind::Ship => {
            let max_x = (canvas_width - entity.width()).max(0.0);
            if input.right && entity.right() < canvas_width {
                next.x = (entity.x + SHIP_STEP).min(max_x);
            } else if input.left && entity.x > 0.0 {
                next.x = (entity.x - SHIP_STEP).max(0.0);
            }
        }
        EntityKind::Projectile => next.y -= PROJECTILE_STEP,
        EntityKind::Enemy => next.y += ENEMY_STEP,
    }
    next
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Launch a projectile from the ship's nose.  No cap on live projectiles.
pub fn fire(state: &GameState) -> GameState {
    let ship = &state.ship;
    let x = ship.x + ship.width() / 2.0 - PROJECTILE_SIZE.0 / 2.0;
    let mut projectiles = state.projectiles.clone();
    projectiles.push(Entity::projectile(x, ship.y));
    GameState {
        projectiles,
        ..state.clone()
    }
}

// ── Collision & scoring ──────────────────────────────────────────────────────

/// Axis-aligned bounding-box overlap.  Touching edges do not count.
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Pair projectiles with enemies: each projectile (in creation order) takes
/// the first overlapping enemy (in spawn order) that no earlier projectile
/// has claimed.  Returns `(projectile_index, enemy_index)` pairs.
pub fn find_matches(projectiles: &[Entity], enemies: &[Entity]) -> Vec<(usize, usize)> {
    let mut claimed = vec![false; enemies.len()];
    let mut matches = Vec::new();

    for (pi, projectile) in projectiles.iter().enumerate() {
        let hit = enemies
            .iter()
            .enumerate()
            .find(|(ei, enemy)| !claimed[*ei] && overlaps(projectile, enemy));
        if let Some((ei, _)) = hit {
            claimed[ei] = true;
            matches.push((pi, ei));
        }
    }
    matches
}

/// Remove every matched pair and award `SCORE_PER_HIT` for each.
///
/// Marks first and compacts afterwards, so every element is looked at
/// exactly once per pass.
pub fn resolve_collisions(state: &GameState) -> GameState {
    let matches = find_matches(&state.projectiles, &state.enemies);
    if matches.is_empty() {
        return state.clone();
    }

    let mut dead_projectiles = vec![false; state.projectiles.len()];
    let mut dead_enemies = vec![false; state.enemies.len()];
    for &(pi, ei) in &matches {
        dead_projectiles[pi] = true;
        dead_enemies[ei] = true;
    }

    let projectiles = keep_unmarked(&state.projectiles, &dead_projectiles);
    let enemies = keep_unmarked(&state.enemies, &dead_enemies);

    GameState {
        projectiles,
        enemies,
        score: state.score + SCORE_PER_HIT * matches.len() as u32,
        ..state.clone()
    }
}

fn keep_unmarked(entities: &[Entity], marked: &[bool]) -> Vec<Entity> {
    entities
        .iter()
        .zip(marked)
        .filter(|(_, dead)| !**dead)
        .map(|(e, _)| e.clone())
        .collect()
}

// ── Game over ────────────────────────────────────────────────────────────────

/// True iff some enemy's bottom edge has reached the bottom of the canvas.
pub fn enemy_reached_bottom(state: &GameState) -> bool {
    state.enemies.iter().any(|e| e.bottom() >= state.height)
}

/// RUNNING → OVER when an enemy touches the bottom edge.  Never leaves OVER.
pub fn check_game_over(state: &GameState) -> GameState {
    if state.status == GameStatus::Running && enemy_reached_bottom(state) {
        GameState {
            status: GameStatus::Over,
            ..state.clone()
        }
    } else {
        state.clone()
    }
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  A no-op once the game is over.
///
/// Order: fire, ship, projectiles (then drop those fully above the top),
/// enemies (then drop those past the bottom), collisions, game-over check.
pub fn tick(state: &GameState, input: &InputSnapshot) -> GameState {
    if state.status == GameStatus::Over {
        return state.clone();
    }

    let state = if input.fire { fire(state) } else { state.clone() };

    let ship = advance(&state.ship, input, state.width);

    let projectiles: Vec<Entity> = state
        .projectiles
        .iter()
        .map(|p| advance(p, input, state.width))
        .filter(|p| p.bottom() >= 0.0)
        .collect();

    let enemies: Vec<Entity> = state
        .enemies
        .iter()
        .map(|e| advance(e, input, state.width))
        .filter(|e| e.y <= state.height)
        .collect();

    let moved = GameState {
        ship,
        projectiles,
        enemies,
        frame: state.frame + 1,
        ..state
    };

    check_game_over(&resolve_collisions(&moved))
}
