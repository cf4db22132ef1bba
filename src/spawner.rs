/// Timer-driven creation of obstacles and power-ups, and the difficulty ramp
/// applied whenever the normal spawners start.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entities::{Obstacle, PowerUp, PowerUpKind, RunState};
use crate::timers::TimerKind;

const NORMAL_POOL: [PowerUpKind; 2] = [PowerUpKind::Shield, PowerUpKind::RapidFire];
const BOSS_POOL: [PowerUpKind; 1] = [PowerUpKind::BossGun];

/// Random left edge that keeps an entity of `size` inside the canvas.
fn random_x(width: f32, size: f32, rng: &mut impl Rng) -> f32 {
    let span = (width - size).max(0.0);
    rng.gen::<f32>() * span
}

pub fn spawn_obstacle(state: &mut RunState, rng: &mut impl Rng) {
    let cfg = &state.config;
    let size = cfg.obstacle_size;
    let speed = state.obstacle_speed;

    let x = random_x(state.width, size, rng);
    let tough = rng.gen_bool(cfg.tough_chance);
    let dx = if rng.gen_bool(cfg.drift_chance) {
        let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        sign * speed / 2.0
    } else {
        0.0
    };
    let variant = rng.gen_range(0..cfg.enemy_variants);

    state.obstacles.push(Obstacle {
        x,
        y: -size,
        width: size,
        height: size,
        speed,
        dx,
        hp: if tough { 2 } else { 1 },
        tough,
        variant,
    });
}

/// Spawn one power-up unless the screen already holds the maximum.
/// During a boss fight only the boss gun drops.
pub fn spawn_power_up(state: &mut RunState, rng: &mut impl Rng) {
    if state.power_ups.len() >= state.config.max_power_ups {
        return;
    }

    let pool: &[PowerUpKind] = if state.boss_active() {
        &BOSS_POOL
    } else {
        &NORMAL_POOL
    };
    let Some(&kind) = pool.choose(rng) else {
        return;
    };

    let size = state.config.power_up_size;
    let x = random_x(state.width, size, rng);
    state.power_ups.push(PowerUp {
        x,
        y: -size,
        width: size,
        height: size,
        speed: state.config.power_up_speed,
        kind,
    });
}

/// Raise obstacle speed and shorten the spawn period, never below the floor.
/// The period only shrinks while it is still above the floor.
pub fn ramp_difficulty(state: &mut RunState, speed_step: f32, period_step_ms: u64) {
    let floor = state.config.obstacle_min_spawn_ms;
    state.obstacle_speed += speed_step;
    if state.spawn_period_ms > floor {
        state.spawn_period_ms = state.spawn_period_ms.saturating_sub(period_step_ms).max(floor);
    }
}

/// Ramp difficulty, then (re)start the obstacle and normal power-up spawners.
pub fn start_normal_spawners(state: &mut RunState) {
    let (speed_step, period_step) = (state.config.speed_ramp, state.config.spawn_ramp_ms);
    ramp_difficulty(state, speed_step, period_step);

    state
        .timers
        .schedule_every(TimerKind::ObstacleSpawn, state.spawn_period_ms);
    state
        .timers
        .schedule_every(TimerKind::PowerUpSpawn, state.config.power_up_spawn_ms);
    log::debug!(
        "spawners started: every {} ms at speed {:.1}",
        state.spawn_period_ms,
        state.obstacle_speed
    );
}

pub fn stop_spawners(state: &mut RunState) {
    state.timers.cancel(TimerKind::ObstacleSpawn);
    state.timers.cancel(TimerKind::PowerUpSpawn);
}
