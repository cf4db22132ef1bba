use sky_shooter::collision::*;
use sky_shooter::compute::init_state;
use sky_shooter::config::GameConfig;
use sky_shooter::entities::*;
use sky_shooter::timers::TimerKind;

/// Playing state; the player sits at (230, 450), 40×40.
fn make_state() -> RunState {
    let mut s = init_state(500.0, 500.0, 0, GameConfig::default());
    s.status = GameStatus::Playing;
    s
}

fn obstacle_at(x: f32, y: f32, hp: u32) -> Obstacle {
    Obstacle {
        x,
        y,
        width: 40.0,
        height: 40.0,
        speed: 2.0,
        dx: 0.0,
        hp,
        tough: hp > 1,
        variant: 0,
    }
}

fn bullet_at(x: f32, y: f32, damage: u32) -> Bullet {
    let kind = if damage > 1 { ShotKind::BossGun } else { ShotKind::Normal };
    Bullet {
        x,
        y,
        width: 10.0,
        height: 20.0,
        speed: 7.0,
        damage,
        kind,
    }
}

fn settled_boss() -> Boss {
    Boss {
        x: 200.0,
        y: 50.0,
        width: 100.0,
        height: 100.0,
        speed: 2.0,
        direction: 1.0,
        hp: 100,
        max_hp: 100,
        entering: false,
    }
}

fn power_up_on_player(kind: PowerUpKind) -> PowerUp {
    PowerUp {
        x: 235.0,
        y: 455.0,
        width: 35.0,
        height: 35.0,
        speed: 1.5,
        kind,
    }
}

fn count(cues: &[Cue], cue: Cue) -> usize {
    cues.iter().filter(|&&c| c == cue).count()
}

// ── Bullets ↔ obstacles ───────────────────────────────────────────────────────

#[test]
fn single_hit_destroys_weak_obstacle() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 1));
    s.bullets.push(bullet_at(110.0, 110.0, 1));

    resolve_bullet_obstacle(&mut s);
    assert!(s.obstacles.is_empty());
    assert!(s.bullets.is_empty());
    assert_eq!(s.score, 100);
    assert_eq!(s.explosions.len(), 1);
    assert_eq!(count(&s.cues, Cue::Explosion), 1);
}

#[test]
fn tough_obstacle_needs_two_hits() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 2));
    s.bullets.push(bullet_at(110.0, 110.0, 1));

    resolve_bullet_obstacle(&mut s);
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.obstacles[0].hp, 1);
    assert!(s.bullets.is_empty());
    assert_eq!(s.score, 0);
    assert!(s.cues.is_empty());

    s.bullets.push(bullet_at(110.0, 110.0, 1));
    resolve_bullet_obstacle(&mut s);
    assert!(s.obstacles.is_empty());
    assert!(s.bullets.is_empty());
    assert_eq!(s.score, 100);
    assert_eq!(count(&s.cues, Cue::Explosion), 1);
}

#[test]
fn boss_gun_bullet_deals_one_to_obstacles() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 2));
    s.bullets.push(bullet_at(110.0, 110.0, 5));

    resolve_bullet_obstacle(&mut s);
    assert_eq!(s.obstacles[0].hp, 1);
}

#[test]
fn bullet_hits_only_first_overlapping_obstacle() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 1));
    s.obstacles.push(obstacle_at(105.0, 105.0, 1));
    s.bullets.push(bullet_at(110.0, 110.0, 1));

    resolve_bullet_obstacle(&mut s);
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.obstacles[0].x, 105.0);
    assert_eq!(s.score, 100);
}

#[test]
fn every_bullet_resolves_in_one_pass() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(0.0, 100.0, 1));
    s.obstacles.push(obstacle_at(300.0, 100.0, 1));
    s.bullets.push(bullet_at(10.0, 110.0, 1));
    s.bullets.push(bullet_at(200.0, 300.0, 1)); // misses
    s.bullets.push(bullet_at(310.0, 110.0, 1));

    resolve_bullet_obstacle(&mut s);
    assert!(s.obstacles.is_empty());
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].x, 200.0);
    assert_eq!(s.score, 200);
}

#[test]
fn missing_bullet_changes_nothing() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(100.0, 100.0, 1));
    s.bullets.push(bullet_at(140.0, 110.0, 1)); // touching edge only

    resolve_bullet_obstacle(&mut s);
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.bullets.len(), 1);
}

// ── Bullets ↔ boss ────────────────────────────────────────────────────────────

#[test]
fn boss_takes_bullet_damage() {
    let mut s = make_state();
    s.boss = Some(settled_boss());
    s.bullets.push(bullet_at(240.0, 100.0, 5));

    resolve_bullet_boss(&mut s);
    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(95));
    assert!(s.bullets.is_empty());
    assert_eq!(s.explosions.len(), 1);
    assert_eq!(s.explosions[0].x, 240.0);
}

#[test]
fn twenty_boss_gun_hits_defeat_boss() {
    let mut s = make_state();
    s.boss = Some(settled_boss());

    for _ in 0..19 {
        s.bullets.push(bullet_at(240.0, 100.0, 5));
        resolve_bullet_boss(&mut s);
    }
    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(5));
    assert_eq!(s.status, GameStatus::Playing);

    s.bullets.push(bullet_at(240.0, 100.0, 5));
    resolve_bullet_boss(&mut s);
    assert!(s.boss.is_none());
    assert_eq!(s.status, GameStatus::Won);
}

#[test]
fn hundred_normal_hits_defeat_boss() {
    let mut s = make_state();
    s.boss = Some(settled_boss());

    for _ in 0..99 {
        s.bullets.push(bullet_at(240.0, 100.0, 1));
        resolve_bullet_boss(&mut s);
    }
    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(1));

    s.bullets.push(bullet_at(240.0, 100.0, 1));
    resolve_bullet_boss(&mut s);
    assert!(s.boss.is_none());
    assert_eq!(s.score, 2_000);
}

#[test]
fn defeat_stops_the_bullet_scan() {
    let mut s = make_state();
    let mut boss = settled_boss();
    boss.hp = 3;
    s.boss = Some(boss);
    s.bullets.push(bullet_at(240.0, 100.0, 5));
    s.bullets.push(bullet_at(250.0, 100.0, 5));

    resolve_bullet_boss(&mut s);
    // The second bullet is left alone
    assert_eq!(s.bullets.len(), 1);
    assert_eq!(s.bullets[0].x, 250.0);
    assert_eq!(s.status, GameStatus::Won);
    // An overshooting hit still pays exactly the defeat bonus
    assert_eq!(s.score, 2_000);
}

#[test]
fn boss_hp_stays_positive_until_defeat() {
    let mut s = make_state();
    let mut boss = settled_boss();
    boss.hp = 7;
    s.boss = Some(boss);
    s.bullets.push(bullet_at(240.0, 100.0, 5));

    resolve_bullet_boss(&mut s);
    assert_eq!(s.boss.as_ref().map(|b| b.hp), Some(2));
    assert_eq!(s.status, GameStatus::Playing);
}

// ── Player ↔ obstacles ────────────────────────────────────────────────────────

#[test]
fn obstacle_hit_costs_one_life() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(230.0, 440.0, 2));

    assert!(resolve_player_obstacle(&mut s));
    assert_eq!(s.lives, 2);
    assert!(s.obstacles.is_empty());
    assert_eq!(s.explosions.len(), 1);
    assert_eq!(count(&s.cues, Cue::PlayerHit), 1);
}

#[test]
fn shield_absorbs_obstacle_hit() {
    let mut s = make_state();
    s.player.shielded = true;
    s.obstacles.push(obstacle_at(230.0, 440.0, 1));

    assert!(resolve_player_obstacle(&mut s));
    assert_eq!(s.lives, 3);
    assert!(!s.player.shielded);
    assert!(s.obstacles.is_empty());
    assert_eq!(count(&s.cues, Cue::PlayerHit), 1);
}

#[test]
fn only_first_overlapping_obstacle_hits() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(220.0, 440.0, 1));
    s.obstacles.push(obstacle_at(240.0, 440.0, 1));

    resolve_player_obstacle(&mut s);
    assert_eq!(s.lives, 2);
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.obstacles[0].x, 240.0);
}

#[test]
fn no_overlap_no_hit() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(0.0, 0.0, 1));
    assert!(!resolve_player_obstacle(&mut s));
    assert_eq!(s.lives, 3);
}

#[test]
fn hit_strips_weapon_power_ups() {
    let mut s = make_state();
    apply_power_up(&mut s, PowerUpKind::RapidFire);
    apply_power_up(&mut s, PowerUpKind::BossGun);
    s.obstacles.push(obstacle_at(230.0, 440.0, 1));

    resolve_player_obstacle(&mut s);
    assert!(!s.player.rapid_fire_active);
    assert!(!s.player.has_boss_gun);
    assert!(!s.timers.is_pending(TimerKind::RapidFireExpiry));
    assert!(!s.timers.is_pending(TimerKind::BossGunExpiry));
}

#[test]
fn last_life_ends_run() {
    let mut s = make_state();
    s.lives = 1;
    s.score = 700;
    s.timers.schedule_every(TimerKind::ObstacleSpawn, 950);
    s.obstacles.push(obstacle_at(230.0, 440.0, 1));

    resolve_player_obstacle(&mut s);
    assert_eq!(s.lives, 0);
    assert_eq!(s.status, GameStatus::GameOver);
    assert!(!s.timers.is_pending(TimerKind::ObstacleSpawn));
    assert_eq!(s.high_score, 700);
}

// ── Player ↔ boss bullets / boss body ─────────────────────────────────────────

#[test]
fn boss_bullet_hit_consumes_bullet() {
    let mut s = make_state();
    s.boss_bullets.push(BossBullet {
        x: 240.0,
        y: 440.0,
        width: 20.0,
        height: 20.0,
        speed: 4.0,
    });

    assert!(resolve_player_boss_bullet(&mut s));
    assert_eq!(s.lives, 2);
    assert!(s.boss_bullets.is_empty());
}

#[test]
fn boss_body_contact_costs_two_lives() {
    let mut s = make_state();
    let mut boss = settled_boss();
    boss.y = 400.0;
    s.boss = Some(boss);

    assert!(resolve_player_boss(&mut s));
    assert_eq!(s.lives, 1);
    assert_eq!(s.explosions[0].size, 100.0);
    assert_eq!(count(&s.cues, Cue::PlayerHit), 2);
}

#[test]
fn shield_absorbs_boss_body_contact() {
    let mut s = make_state();
    s.player.shielded = true;
    let mut boss = settled_boss();
    boss.y = 400.0;
    s.boss = Some(boss);

    assert!(resolve_player_boss(&mut s));
    assert_eq!(s.lives, 3);
    assert!(!s.player.shielded);
}

#[test]
fn beaten_boss_deals_no_contact_damage() {
    let mut s = make_state();
    let mut boss = settled_boss();
    boss.y = 400.0;
    boss.hp = 0;
    s.boss = Some(boss);

    assert!(!resolve_player_boss(&mut s));
    assert_eq!(s.lives, 3);
}

#[test]
fn boss_contact_on_last_life_stops_at_zero() {
    let mut s = make_state();
    s.lives = 1;
    let mut boss = settled_boss();
    boss.y = 400.0;
    s.boss = Some(boss);

    resolve_player_boss(&mut s);
    assert_eq!(s.lives, 0);
    assert_eq!(s.status, GameStatus::GameOver);
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn rapid_fire_pickup_sets_timer() {
    let mut s = make_state();
    s.power_ups.push(power_up_on_player(PowerUpKind::RapidFire));

    resolve_power_up_pickup(&mut s);
    assert!(s.player.rapid_fire_active);
    assert_eq!(s.timers.remaining(TimerKind::RapidFireExpiry), Some(10_000));
    assert!(s.power_ups.is_empty());
    assert_eq!(count(&s.cues, Cue::PowerUp), 1);
}

#[test]
fn shield_and_boss_gun_pickups() {
    let mut s = make_state();
    s.power_ups.push(power_up_on_player(PowerUpKind::Shield));
    s.power_ups.push(power_up_on_player(PowerUpKind::BossGun));
    s.power_ups.push(PowerUp {
        x: 0.0,
        y: 0.0,
        width: 35.0,
        height: 35.0,
        speed: 1.5,
        kind: PowerUpKind::RapidFire,
    });

    resolve_power_up_pickup(&mut s);
    assert!(s.player.shielded);
    assert!(s.player.has_boss_gun);
    assert!(!s.player.rapid_fire_active);
    assert_eq!(s.timers.remaining(TimerKind::BossGunExpiry), Some(10_000));
    assert_eq!(s.power_ups.len(), 1);
    assert_eq!(count(&s.cues, Cue::PowerUp), 2);
}

// ── Frame pass ────────────────────────────────────────────────────────────────

#[test]
fn resolve_all_takes_one_player_hit_per_frame() {
    let mut s = make_state();
    s.obstacles.push(obstacle_at(230.0, 440.0, 1));
    s.boss_bullets.push(BossBullet {
        x: 240.0,
        y: 440.0,
        width: 20.0,
        height: 20.0,
        speed: 4.0,
    });

    resolve_all(&mut s);
    assert_eq!(s.lives, 2);
    assert_eq!(s.boss_bullets.len(), 1);
}

#[test]
fn boss_bullet_hit_spares_boss_contact_that_frame() {
    let mut s = make_state();
    let mut boss = settled_boss();
    boss.y = 400.0;
    s.boss = Some(boss);
    s.boss_bullets.push(BossBullet {
        x: 240.0,
        y: 440.0,
        width: 20.0,
        height: 20.0,
        speed: 4.0,
    });

    resolve_all(&mut s);
    assert_eq!(s.lives, 2);
    assert!(s.boss_bullets.is_empty());

    resolve_all(&mut s);
    assert_eq!(s.lives, 0);
    assert_eq!(s.status, GameStatus::GameOver);
}

#[test]
fn resolve_all_stops_after_game_over() {
    let mut s = make_state();
    s.lives = 1;
    s.obstacles.push(obstacle_at(230.0, 440.0, 1));
    s.power_ups.push(power_up_on_player(PowerUpKind::Shield));

    resolve_all(&mut s);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.power_ups.len(), 1);
    assert!(!s.player.shielded);
}
