/// Collision resolution between the entity lists of a run.
///
/// Every resolver mutates the run in place. Removal happens while scanning,
/// so each resolver either restarts its scan after a removal or stops at the
/// first match; it never holds an index across a removal.

use crate::boss;
use crate::compute::finish_run;
use crate::entities::{Cue, Explosion, PowerUpKind, RunState};
use crate::timers::TimerKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionSize {
    Normal,
    Large,
}

pub(crate) fn spawn_explosion(state: &mut RunState, x: f32, y: f32, size: ExplosionSize) {
    let size = match size {
        ExplosionSize::Normal => state.config.obstacle_size,
        ExplosionSize::Large => state.config.large_explosion_size,
    };
    state.explosions.push(Explosion {
        x,
        y,
        size,
        frames: state.config.explosion_frames,
    });
}

// ── Player damage ─────────────────────────────────────────────────────────────

/// Apply one hit to the player.
///
/// A shield absorbs the hit and is consumed. Otherwise both weapon power-ups
/// are lost along with one life; losing the last life ends the run.
pub fn handle_player_hit(state: &mut RunState) {
    state.cues.push(Cue::PlayerHit);
    if state.player.shielded {
        state.player.shielded = false;
        return;
    }

    state.player.rapid_fire_active = false;
    state.player.has_boss_gun = false;
    state.timers.cancel(TimerKind::RapidFireExpiry);
    state.timers.cancel(TimerKind::BossGunExpiry);

    state.lives = state.lives.saturating_sub(1);
    log::debug!("player hit, {} lives left", state.lives);
    if state.lives == 0 {
        finish_run(state);
    }
}

/// Obstacle touching the player: one hit, obstacle destroyed.
/// Resolves at most one obstacle per call.
pub fn resolve_player_obstacle(state: &mut RunState) -> bool {
    let player = state.player.rect();
    let Some(index) = state
        .obstacles
        .iter()
        .position(|o| o.rect().overlaps(&player))
    else {
        return false;
    };

    let obstacle = state.obstacles.remove(index);
    spawn_explosion(state, obstacle.x, obstacle.y, ExplosionSize::Normal);
    handle_player_hit(state);
    true
}

/// Boss bullet touching the player: one hit, bullet consumed.
/// Resolves at most one bullet per call.
pub fn resolve_player_boss_bullet(state: &mut RunState) -> bool {
    let player = state.player.rect();
    let Some(index) = state
        .boss_bullets
        .iter()
        .position(|b| b.rect().overlaps(&player))
    else {
        return false;
    };

    state.boss_bullets.remove(index);
    let (x, y) = (state.player.x, state.player.y);
    spawn_explosion(state, x, y, ExplosionSize::Normal);
    handle_player_hit(state);
    true
}

/// Boss body touching the player: two hits at once.
///
/// A shield absorbs the whole contact. A boss already at zero hp deals no
/// damage.
pub fn resolve_player_boss(state: &mut RunState) -> bool {
    let player = state.player.rect();
    let touching = match &state.boss {
        Some(boss) => boss.hp > 0 && boss.rect().overlaps(&player),
        None => false,
    };
    if !touching {
        return false;
    }

    let (x, y) = (state.player.x, state.player.y);
    spawn_explosion(state, x, y, ExplosionSize::Large);
    if state.player.shielded {
        handle_player_hit(state);
        return true;
    }
    for _ in 0..2 {
        if !state.is_active() {
            break;
        }
        handle_player_hit(state);
    }
    true
}

// ── Player bullets ────────────────────────────────────────────────────────────

/// Each bullet hits at most the first overlapping obstacle, dealing one point
/// of damage regardless of its weapon. Destroyed obstacles score and explode.
pub fn resolve_bullet_obstacle(state: &mut RunState) {
    let mut i = 0;
    while i < state.bullets.len() {
        let bullet = state.bullets[i].rect();
        let Some(j) = state
            .obstacles
            .iter()
            .position(|o| o.rect().overlaps(&bullet))
        else {
            i += 1;
            continue;
        };

        state.bullets.remove(i);
        let obstacle = &mut state.obstacles[j];
        obstacle.hp = obstacle.hp.saturating_sub(1);
        if obstacle.hp == 0 {
            let obstacle = state.obstacles.remove(j);
            spawn_explosion(state, obstacle.x, obstacle.y, ExplosionSize::Normal);
            state.score += state.config.obstacle_score;
            state.cues.push(Cue::Explosion);
        }
    }
}

/// Bullets against the boss deal their own `damage`. Reaching zero hp runs
/// the defeat sequence and stops further resolution.
pub fn resolve_bullet_boss(state: &mut RunState) {
    let mut i = 0;
    while i < state.bullets.len() {
        let Some(boss) = state.boss.as_mut() else {
            return;
        };
        if !state.bullets[i].rect().overlaps(&boss.rect()) {
            i += 1;
            continue;
        }

        let bullet = state.bullets.remove(i);
        boss.hp = (boss.hp - bullet.damage as i32).max(0);
        let defeated = boss.hp == 0;
        spawn_explosion(state, bullet.x, bullet.y, ExplosionSize::Normal);
        if defeated {
            boss::defeat_boss(state);
            return;
        }
    }
}

// ── Pickups ───────────────────────────────────────────────────────────────────

pub fn resolve_power_up_pickup(state: &mut RunState) {
    let player = state.player.rect();
    let mut i = 0;
    while i < state.power_ups.len() {
        if !state.power_ups[i].rect().overlaps(&player) {
            i += 1;
            continue;
        }
        let power_up = state.power_ups.remove(i);
        state.cues.push(Cue::PowerUp);
        apply_power_up(state, power_up.kind);
    }
}

/// Set the flag and (re)start its expiry. Restarting replaces any pending
/// expiry of the same kind, so repeated pickups extend rather than stack.
pub fn apply_power_up(state: &mut RunState, kind: PowerUpKind) {
    log::debug!("picked up {kind:?}");
    match kind {
        PowerUpKind::Shield => state.player.shielded = true,
        PowerUpKind::RapidFire => {
            state.player.rapid_fire_active = true;
            let duration = state.config.rapid_fire_duration_ms;
            state.timers.schedule_once(TimerKind::RapidFireExpiry, duration);
        }
        PowerUpKind::BossGun => {
            state.player.has_boss_gun = true;
            let duration = state.config.boss_gun_duration_ms;
            state.timers.schedule_once(TimerKind::BossGunExpiry, duration);
        }
    }
}

// ── Frame pass ────────────────────────────────────────────────────────────────

/// Run every resolver in frame order, stopping as soon as the run halts.
/// The player takes at most one of obstacle / boss bullet / boss body per
/// frame.
pub fn resolve_all(state: &mut RunState) {
    resolve_bullet_obstacle(state);
    resolve_bullet_boss(state);
    if !state.is_active() {
        return;
    }

    if !resolve_player_obstacle(state) && !resolve_player_boss_bullet(state) {
        resolve_player_boss(state);
    }
    if !state.is_active() {
        return;
    }

    resolve_power_up_pickup(state);
}
