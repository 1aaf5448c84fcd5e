use face_shooter::config::Viewport;
use face_shooter::entities::*;

fn enemy(id: EntityId, kind: EnemyKind, life: u32) -> Entity {
    Entity {
        id,
        x: 10.0,
        y: 10.0,
        vx: 0.0,
        vy: 2.0,
        width: 60.0,
        height: 60.0,
        alive: true,
        kind: EntityKind::Enemy(EnemyState::new(kind, life)),
    }
}

#[test]
fn enemy_kind_roles() {
    for kind in EnemyKind::NORMAL {
        assert!(!kind.is_boss());
        assert!(!kind.is_projectile());
    }
    for kind in EnemyKind::BOSSES {
        assert!(kind.is_boss());
        assert!(!kind.is_projectile());
    }
    assert!(EnemyKind::Fireball.is_projectile());
    assert!(!EnemyKind::Fireball.is_boss());
}

#[test]
fn enemy_state_starts_at_full_life() {
    let s = EnemyState::new(EnemyKind::Pumpkin, 2);
    assert_eq!(s.life, 2);
    assert_eq!(s.max_life, 2);
    assert_eq!(s.age, 0);
}

#[test]
fn live_enemy_predicate() {
    let mut e = enemy(1, EnemyKind::Ghost, 1);
    assert!(e.is_live_enemy());

    e.enemy_mut().unwrap().life = 0;
    assert!(!e.is_live_enemy());

    let mut dead = enemy(2, EnemyKind::Ghost, 1);
    dead.alive = false;
    assert!(!dead.is_live_enemy());
}

#[test]
fn dead_boss_is_not_a_boss() {
    let mut b = enemy(1, EnemyKind::Witch, 6);
    assert!(b.is_boss());
    b.alive = false;
    assert!(!b.is_boss());
}

#[test]
fn center_is_box_midpoint() {
    let e = enemy(1, EnemyKind::Bat, 1);
    assert_eq!(e.center(), (40.0, 40.0));
}

#[test]
fn straight_missile_has_no_rotation() {
    let m = Entity {
        id: 1,
        x: 0.0,
        y: 0.0,
        vx: 0.0,
        vy: -10.0,
        width: 10.0,
        height: 25.0,
        alive: true,
        kind: EntityKind::Missile,
    };
    assert_eq!(m.rotation(), 0.0);
}

#[test]
fn shoot_triggers_only_on_open_edge() {
    let mut c = ControlState::default();
    assert!(!c.shoot_triggered());
    c.mouth_open = true;
    assert!(c.shoot_triggered());
    c.prev_mouth_open = true;
    assert!(!c.shoot_triggered());
}

#[test]
fn alloc_id_is_unique_and_increasing() {
    let mut s = GameState {
        entities: Vec::new(),
        progression: ProgressionState {
            score: 0,
            high_score: 0,
            lives: 3,
            level: 1,
            power_level: 1,
            boss_active: false,
            boss_spawned_for_level: 0,
        },
        timers: Timers::default(),
        status: GameStatus::Playing,
        frame: 0,
        viewport: Viewport::new(800.0, 600.0),
        events: Vec::new(),
        next_id: 1,
    };
    let a = s.alloc_id();
    let b = s.alloc_id();
    assert!(b > a);

    // Cloned state is independent
    let mut cloned = s.clone();
    cloned.entities.push(enemy(a, EnemyKind::Ghost, 1));
    cloned.progression.score = 999;
    assert!(s.entities.is_empty());
    assert_eq!(s.progression.score, 0);
}
