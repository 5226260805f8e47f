use space_impact::compute::*;
use space_impact::entities::*;

fn make_state() -> GameState {
    init_state(800.0, 600.0)
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn held_right() -> InputSnapshot {
    InputSnapshot {
        right: true,
        ..InputSnapshot::default()
    }
}

fn held_left() -> InputSnapshot {
    InputSnapshot {
        left: true,
        ..InputSnapshot::default()
    }
}

// ── init_state / reset ────────────────────────────────────────────────────────

#[test]
fn init_state_ship_position() {
    let s = make_state();
    assert_eq!(s.ship.x, 400.0); // width / 2
    assert_eq!(s.ship.y, 540.0); // height - 60
    assert_eq!(s.ship.kind, EntityKind::Ship);
}

#[test]
fn narrow_canvas_ship_starts_inside() {
    let s = init_state(80.0, 600.0);
    assert_eq!(s.ship.x, 30.0); // width - ship width
    assert!(s.ship.right() <= s.width);

    let after = tick(&s, &idle());
    assert!(after.ship.x >= 0.0);
    assert!(after.ship.x <= after.width - after.ship.width());
}

#[test]
fn init_state_empty_collections() {
    let s = make_state();
    assert!(s.enemies.is_empty());
    assert!(s.projectiles.is_empty());
    assert_eq!(s.score, 0);
    assert_eq!(s.frame, 0);
    assert_eq!(s.status, GameStatus::Running);
}

#[test]
fn reset_restores_initial_session() {
    let mut s = make_state();
    s.score = 18;
    s.status = GameStatus::Over;
    s.ship.x = 12.0;
    s.projectiles.push(Entity::projectile(10.0, 10.0));
    s.enemies.push(Entity::enemy(30.0, 560.0));

    let r = reset(&s);
    assert_eq!(r.score, 0);
    assert_eq!(r.status, GameStatus::Running);
    assert!(r.projectiles.is_empty());
    assert!(r.enemies.is_empty());
    assert_eq!((r.ship.x, r.ship.y), ship_home(800.0, 600.0));
}

// ── Ship movement ─────────────────────────────────────────────────────────────

#[test]
fn ship_moves_right() {
    let s = make_state();
    let ship = advance(&s.ship, &held_right(), s.width);
    assert_eq!(ship.x, 405.0);
    assert_eq!(ship.y, s.ship.y);
}

#[test]
fn ship_moves_left() {
    let s = make_state();
    let ship = advance(&s.ship, &held_left(), s.width);
    assert_eq!(ship.x, 395.0);
}

#[test]
fn right_wins_over_left() {
    let s = make_state();
    let both = InputSnapshot {
        left: true,
        right: true,
        fire: false,
    };
    assert_eq!(advance(&s.ship, &both, s.width).x, 405.0);
}

#[test]
fn ship_stops_at_right_edge() {
    let mut s = make_state();
    s.ship.x = 750.0; // right edge == width
    assert_eq!(advance(&s.ship, &held_right(), s.width).x, 750.0);
}

#[test]
fn ship_right_step_is_clamped() {
    let mut s = make_state();
    s.ship.x = 748.0;
    assert_eq!(advance(&s.ship, &held_right(), s.width).x, 750.0); // not 753
}

#[test]
fn ship_stops_at_left_edge() {
    let mut s = make_state();
    s.ship.x = 0.0;
    assert_eq!(advance(&s.ship, &held_left(), s.width).x, 0.0);
    s.ship.x = 3.0;
    assert_eq!(advance(&s.ship, &held_left(), s.width).x, 0.0); // not -2
}

#[test]
fn ship_idle_does_not_move() {
    let s = make_state();
    assert_eq!(advance(&s.ship, &idle(), s.width), s.ship);
}

#[test]
fn projectile_and_enemy_ignore_input() {
    let p = Entity::projectile(100.0, 100.0);
    let e = Entity::enemy(100.0, 100.0);
    let moved_p = advance(&p, &held_right(), 800.0);
    let moved_e = advance(&e, &held_left(), 800.0);
    assert_eq!((moved_p.x, moved_p.y), (100.0, 93.0));
    assert_eq!((moved_e.x, moved_e.y), (100.0, 102.0));
}

// ── fire ──────────────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_projectile_at_ship_nose() {
    let s = make_state(); // ship at (400, 540)
    let s2 = fire(&s);
    assert_eq!(s2.projectiles.len(), 1);
    let p = &s2.projectiles[0];
    assert_eq!(p.kind, EntityKind::Projectile);
    assert_eq!(p.x, 422.5);
    assert_eq!(p.y, 540.0);
    assert_eq!((p.width(), p.height()), (5.0, 10.0));
}

#[test]
fn fired_projectile_rises_seven_per_frame() {
    let s = fire(&make_state());
    let s2 = tick(&s, &idle());
    assert_eq!(s2.projectiles[0].y, 533.0);
}

#[test]
fn fire_has_no_cap_and_keeps_creation_order() {
    let mut s = make_state();
    for _ in 0..20 {
        s = fire(&s);
        s.ship.x += 1.0;
    }
    assert_eq!(s.projectiles.len(), 20);
    assert!(s.projectiles.windows(2).all(|w| w[0].x < w[1].x));
}

#[test]
fn fire_does_not_mutate_original() {
    let s = make_state();
    let _ = fire(&s);
    assert!(s.projectiles.is_empty());
}

// ── Collision & scoring ───────────────────────────────────────────────────────

#[test]
fn overlapping_pair_is_removed_and_scores_two() {
    let mut s = make_state();
    s.projectiles.push(Entity::projectile(100.0, 100.0));
    s.enemies.push(Entity::enemy(100.0, 100.0));
    assert!(overlaps(&s.projectiles[0], &s.enemies[0]));

    let s2 = resolve_collisions(&s);
    assert!(s2.projectiles.is_empty());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 2);
}

#[test]
fn touching_edges_do_not_overlap() {
    let p = Entity::projectile(150.0, 100.0); // left edge on enemy's right edge
    let e = Entity::enemy(100.0, 100.0);
    assert!(!overlaps(&p, &e));
    let below = Entity::projectile(120.0, 150.0);
    assert!(!overlaps(&below, &e));
}

#[test]
fn non_overlapping_pair_leaves_score_unchanged() {
    let mut s = make_state();
    s.score = 6;
    s.projectiles.push(Entity::projectile(300.0, 300.0));
    s.enemies.push(Entity::enemy(100.0, 100.0));
    let s2 = resolve_collisions(&s);
    assert_eq!(s2.score, 6);
    assert_eq!(s2.projectiles.len(), 1);
    assert_eq!(s2.enemies.len(), 1);
}

#[test]
fn projectile_matches_at_most_one_enemy() {
    let mut s = make_state();
    s.projectiles.push(Entity::projectile(120.0, 120.0));
    s.enemies.push(Entity::enemy(100.0, 100.0));
    s.enemies.push(Entity::enemy(110.0, 110.0)); // also overlaps
    let s2 = resolve_collisions(&s);
    assert_eq!(s2.score, 2);
    assert_eq!(s2.enemies.len(), 1);
    // First spawned enemy wins the tie.
    assert_eq!(s2.enemies[0].x, 110.0);
}

#[test]
fn two_projectiles_share_one_enemy_first_wins() {
    let mut s = make_state();
    s.projectiles.push(Entity::projectile(110.0, 110.0));
    s.projectiles.push(Entity::projectile(120.0, 110.0));
    s.enemies.push(Entity::enemy(100.0, 100.0));
    let s2 = resolve_collisions(&s);
    assert_eq!(s2.score, 2);
    assert_eq!(s2.projectiles.len(), 1);
    assert_eq!(s2.projectiles[0].x, 120.0);
}

#[test]
fn adjacent_matches_are_not_skipped() {
    // Three projectiles each over their own enemy: all three pairs must go,
    // including the ones right after a removed element.
    let mut s = make_state();
    for i in 0..3 {
        let x = 100.0 + 100.0 * i as f32;
        s.projectiles.push(Entity::projectile(x + 10.0, 110.0));
        s.enemies.push(Entity::enemy(x, 100.0));
    }
    let s2 = resolve_collisions(&s);
    assert!(s2.projectiles.is_empty());
    assert!(s2.enemies.is_empty());
    assert_eq!(s2.score, 6);
}

#[test]
fn find_matches_is_deterministic() {
    let projectiles = vec![
        Entity::projectile(105.0, 105.0),
        Entity::projectile(205.0, 105.0),
        Entity::projectile(500.0, 500.0),
    ];
    let enemies = vec![Entity::enemy(200.0, 100.0), Entity::enemy(100.0, 100.0)];
    let first = find_matches(&projectiles, &enemies);
    assert_eq!(first, vec![(0, 1), (1, 0)]);
    assert_eq!(find_matches(&projectiles, &enemies), first);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn game_over_when_enemy_touches_bottom() {
    let mut s = make_state();
    s.enemies.push(Entity::enemy(10.0, 550.0)); // bottom == 600
    let s2 = check_game_over(&s);
    assert_eq!(s2.status, GameStatus::Over);
}

#[test]
fn no_game_over_above_bottom() {
    let mut s = make_state();
    s.enemies.push(Entity::enemy(10.0, 549.0));
    assert_eq!(check_game_over(&s).status, GameStatus::Running);
}

#[test]
fn enemy_from_top_ends_game_after_275_frames() {
    let mut s = make_state();
    s.enemies.push(Entity::enemy(100.0, 0.0));
    for _ in 0..274 {
        s = tick(&s, &idle());
    }
    assert_eq!(s.status, GameStatus::Running);
    assert_eq!(s.enemies[0].y, 548.0);

    s = tick(&s, &idle());
    assert_eq!(s.status, GameStatus::Over);
    assert_eq!(s.enemies[0].bottom(), 600.0);
}

#[test]
fn tick_is_frozen_once_over() {
    let mut s = make_state();
    s.status = GameStatus::Over;
    s.enemies.push(Entity::enemy(10.0, 100.0));
    let s2 = tick(
        &s,
        &InputSnapshot {
            left: true,
            right: false,
            fire: true,
        },
    );
    assert_eq!(s2.frame, s.frame);
    assert_eq!(s2.enemies[0].y, 100.0);
    assert!(s2.projectiles.is_empty());
    assert_eq!(s2.ship, s.ship);
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame() {
    let mut s = make_state();
    s.frame = 5;
    assert_eq!(tick(&s, &idle()).frame, 6);
}

#[test]
fn tick_with_fire_moves_new_projectile_same_frame() {
    let s2 = tick(&make_state(), &InputSnapshot { fire: true, ..idle() });
    assert_eq!(s2.projectiles.len(), 1);
    assert_eq!(s2.projectiles[0].y, 533.0);
}

#[test]
fn projectile_dropped_only_when_fully_off_top() {
    let mut s = make_state();
    s.projectiles.push(Entity::projectile(10.0, -2.0)); // → -9, bottom 1: kept
    s.projectiles.push(Entity::projectile(20.0, -4.0)); // → -11, bottom -1: dropped
    let s2 = tick(&s, &idle());
    assert_eq!(s2.projectiles.len(), 1);
    assert_eq!(s2.projectiles[0].x, 10.0);
}

#[test]
fn tick_collides_after_moving() {
    // Projectile rises 7 into the enemy, enemy falls 2 toward it.
    let mut s = make_state();
    s.enemies.push(Entity::enemy(100.0, 100.0)); // → 102, bottom 152
    s.projectiles.push(Entity::projectile(120.0, 155.0)); // → 148
    let s2 = tick(&s, &idle());
    assert_eq!(s2.score, 2);
    assert!(s2.enemies.is_empty());
    assert!(s2.projectiles.is_empty());
}

#[test]
fn collision_on_final_frame_still_counts() {
    // The hit is resolved before the bottom check, so the enemy never lands.
    let mut s = make_state();
    s.enemies.push(Entity::enemy(100.0, 548.0)); // → 550, would end the game
    s.projectiles.push(Entity::projectile(120.0, 580.0)); // → 573
    let s2 = tick(&s, &idle());
    assert_eq!(s2.score, 2);
    assert_eq!(s2.status, GameStatus::Running);
}

#[test]
fn score_never_decreases_over_a_session() {
    let mut s = make_state();
    let mut last = 0;
    for i in 0..200 {
        if i % 25 == 0 {
            s.enemies.push(Entity::enemy(s.ship.x, 0.0));
        }
        s = tick(&s, &InputSnapshot { fire: i % 5 == 0, ..idle() });
        assert!(s.score >= last);
        last = s.score;
    }
    assert!(last > 0);
}
