/// Boss encounter: entry, attack cadence, patrol and defeat.
///
/// The phase is not stored separately; it is read off the run state so it
/// can never disagree with the entities and timers.

use crate::collision::{spawn_explosion, ExplosionSize};
use crate::compute::{record_high_score, stop_effects};
use crate::entities::{Boss, BossBullet, Cue, GameStatus, RunState};
use crate::spawner;
use crate::timers::TimerKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPhase {
    Inactive,
    /// Descending, or resting while the entry delay runs.
    Entering,
    Active,
    /// Beaten; the run is halted until the player continues.
    Defeated,
}

pub fn phase(state: &RunState) -> BossPhase {
    match &state.boss {
        Some(boss) if boss.entering => BossPhase::Entering,
        Some(_) => BossPhase::Active,
        None if state.status == GameStatus::Won => BossPhase::Defeated,
        None => BossPhase::Inactive,
    }
}

pub fn threshold_reached(state: &RunState) -> bool {
    !state.boss_active() && state.score >= state.next_boss_score
}

/// Inactive → entering. Clears the field and suspends the normal spawners.
pub fn spawn_boss(state: &mut RunState) {
    if state.boss_active() {
        return;
    }
    state.obstacles.clear();
    state.power_ups.clear();
    spawner::stop_spawners(state);

    let cfg = &state.config;
    let size = cfg.boss_size;
    state.boss = Some(Boss {
        x: state.width / 2.0 - size / 2.0,
        y: -size,
        width: size,
        height: size,
        speed: cfg.boss_patrol_speed,
        direction: 1.0,
        hp: cfg.boss_hp,
        max_hp: cfg.boss_hp,
        entering: true,
    });
    log::debug!("boss spawned at score {}", state.score);
}

/// Per-frame boss motion: descend while entering, then patrol and move its
/// bullets.
pub fn update_boss(state: &mut RunState) {
    let rest_y = state.config.boss_rest_y;
    let entry_speed = state.config.boss_entry_speed;
    let width = state.width;
    let height = state.height;

    let Some(boss) = state.boss.as_mut() else {
        return;
    };

    if boss.entering {
        if boss.y < rest_y {
            boss.y = (boss.y + entry_speed).min(rest_y);
        }
        if boss.y >= rest_y && !state.timers.is_pending(TimerKind::BossEntry) {
            let delay = state.config.boss_entry_delay_ms;
            state.timers.schedule_once(TimerKind::BossEntry, delay);
        }
        return;
    }

    // A canvas no wider than the boss pins it to the left edge.
    let max_x = (width - boss.width).max(0.0);
    if max_x <= 0.0 {
        boss.x = 0.0;
    } else {
        boss.x += boss.speed * boss.direction;
        if boss.x <= 0.0 {
            boss.x = 0.0;
            boss.direction = 1.0;
        } else if boss.x >= max_x {
            boss.x = max_x;
            boss.direction = -1.0;
        }
    }

    for bullet in state.boss_bullets.iter_mut() {
        bullet.y += bullet.speed;
    }
    state.boss_bullets.retain(|b| b.y <= height);
}

/// Entering → active: start the attack cadence and the boss-gun drops.
pub fn on_entry_complete(state: &mut RunState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.entering = false;

    let (attack, drops) = (state.config.boss_attack_ms, state.config.boss_power_up_spawn_ms);
    state.timers.schedule_every(TimerKind::BossAttack, attack);
    state.timers.schedule_every(TimerKind::PowerUpSpawn, drops);
    log::debug!("boss engaged");
}

/// Fire one bullet from the boss's horizontal centre.
pub fn boss_attack(state: &mut RunState) {
    let Some(boss) = &state.boss else {
        return;
    };
    let size = state.config.boss_bullet_size;
    state.boss_bullets.push(BossBullet {
        x: boss.x + boss.width / 2.0 - size / 2.0,
        y: boss.y + boss.height,
        width: size,
        height: size,
        speed: state.config.boss_bullet_speed,
    });
    state.cues.push(Cue::BossAttack);
}

/// Active → defeated. Halts the run with a win.
pub fn defeat_boss(state: &mut RunState) {
    state.timers.cancel(TimerKind::BossAttack);
    state.timers.cancel(TimerKind::BossEntry);
    state.timers.cancel(TimerKind::PowerUpSpawn);
    stop_effects(state);
    state.boss = None;
    state.boss_bullets.clear();

    let (x, y) = (state.player.x - 25.0, state.player.y - 100.0);
    spawn_explosion(state, x, y, ExplosionSize::Large);

    state.score += state.config.boss_defeat_bonus;
    state.bosses_defeated += 1;
    state.lives = state.config.recovery_lives;
    state.status = GameStatus::Won;
    state.cues.push(Cue::MusicStop);
    record_high_score(state);
    log::info!("boss defeated, score {}", state.score);
}

/// Defeated → inactive: bump the next threshold, ramp difficulty and resume
/// normal play.
pub fn resume_after_defeat(state: &mut RunState) {
    if state.status != GameStatus::Won {
        return;
    }
    state.next_boss_score += state.config.boss_first_score + state.config.boss_threshold_bonus;
    let (speed_step, period_step) = (state.config.boss_speed_ramp, state.config.boss_spawn_ramp_ms);
    spawner::ramp_difficulty(state, speed_step, period_step);

    state.status = GameStatus::Playing;
    spawner::start_normal_spawners(state);
    state.cues.push(Cue::MusicStart);
    log::debug!("resuming, next boss at {}", state.next_boss_score);
}
