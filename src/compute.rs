/// Run lifecycle and the per-frame simulation step.
///
/// Every public function takes an immutable reference to the current
/// `RunState` (and, where needed, an RNG handle) and returns a brand-new
/// `RunState`. Side effects are limited to the injected RNG and to the
/// `cues` the host drains afterwards.

use rand::Rng;

use crate::boss;
use crate::collision;
use crate::config::GameConfig;
use crate::entities::{Bullet, Cue, GameStatus, Input, Player, RunState, ShotKind};
use crate::spawner;
use crate::timers::{TimerKind, TimerRegistry};

// ── Constructors ─────────────────────────────────────────────────────────────

fn fresh_player(config: &GameConfig, width: f32, height: f32) -> Player {
    let size = config.player_size;
    Player {
        x: width / 2.0 - size / 2.0,
        y: height - config.player_bottom_offset,
        width: size,
        height: size,
        speed: config.player_speed,
        shielded: false,
        rapid_fire_active: false,
        has_boss_gun: false,
    }
}

/// Build a ready-to-start run for a canvas of the given size.
pub fn init_state(width: f32, height: f32, high_score: u32, config: GameConfig) -> RunState {
    RunState {
        player: fresh_player(&config, width, height),
        bullets: Vec::new(),
        obstacles: Vec::new(),
        power_ups: Vec::new(),
        boss: None,
        boss_bullets: Vec::new(),
        explosions: Vec::new(),
        timers: TimerRegistry::new(),
        cues: Vec::new(),
        score: 0,
        lives: config.starting_lives,
        high_score,
        status: GameStatus::Ready,
        can_shoot: true,
        obstacle_speed: config.obstacle_base_speed,
        spawn_period_ms: config.obstacle_base_spawn_ms,
        next_boss_score: config.boss_first_score,
        bosses_defeated: 0,
        stage_threshold: config.stage_score_step,
        stage: 1,
        frame: 0,
        width,
        height,
        config,
    }
}

// ── Lifecycle (pure) ─────────────────────────────────────────────────────────

/// Reset entities, effects, timers, score and difficulty. Keeps the canvas,
/// the high score, the config and the current lives count.
pub fn initialize_run(state: &RunState) -> RunState {
    let mut next = init_state(
        state.width,
        state.height,
        state.high_score,
        state.config.clone(),
    );
    next.lives = state.lives;
    next
}

/// Begin play: full lives, spawners running, music on.
pub fn start_run(state: &RunState) -> RunState {
    let mut next = state.clone();
    if next.is_active() {
        return next;
    }
    next.lives = next.config.starting_lives;
    next.status = GameStatus::Playing;
    spawner::start_normal_spawners(&mut next);
    next.cues.push(Cue::MusicStart);
    log::info!("run started");
    next
}

pub fn end_run(state: &RunState) -> RunState {
    let mut next = state.clone();
    finish_run(&mut next);
    next
}

/// Won → playing, after the win message is acknowledged.
pub fn continue_after_win(state: &RunState) -> RunState {
    let mut next = state.clone();
    boss::resume_after_defeat(&mut next);
    next
}

/// Fire one bullet in the current weapon mode, if the cooldown allows.
pub fn fire_weapon(state: &RunState) -> RunState {
    if !state.is_active() || !state.can_shoot {
        return state.clone();
    }
    let mut next = state.clone();
    let cfg = &next.config;
    let kind = next.player.shot_kind();

    let (width, height, damage, cooldown) = match kind {
        ShotKind::BossGun => (
            cfg.boss_gun_bullet_width,
            cfg.boss_gun_bullet_height,
            cfg.boss_gun_damage,
            cfg.boss_gun_shot_cooldown_ms,
        ),
        ShotKind::Rapid => (
            cfg.bullet_width,
            cfg.bullet_height,
            1,
            cfg.rapid_shot_cooldown_ms,
        ),
        ShotKind::Normal => (
            cfg.bullet_width,
            cfg.bullet_height,
            1,
            cfg.normal_shot_cooldown_ms,
        ),
    };

    let bullet = Bullet {
        x: next.player.x + next.player.width / 2.0 - width / 2.0,
        y: next.player.y,
        width,
        height,
        speed: cfg.bullet_speed,
        damage,
        kind,
    };
    next.bullets.push(bullet);
    next.cues.push(Cue::Shoot(kind));
    next.can_shoot = false;
    next.timers.schedule_once(TimerKind::ShotCooldown, cooldown);
    next
}

/// Play-field size changed. A run in progress keeps its layout by scaling
/// every x coordinate; otherwise the run is re-initialized at the new size.
pub fn rescale(state: &RunState, width: f32, height: f32) -> RunState {
    let in_progress = matches!(state.status, GameStatus::Playing | GameStatus::Won);
    if !in_progress || state.width <= 0.0 {
        let mut next = state.clone();
        next.width = width;
        next.height = height;
        return initialize_run(&next);
    }

    let mut next = state.clone();
    let scale = width / state.width;
    next.width = width;
    next.height = height;

    next.player.x = (next.player.x * scale).clamp(0.0, (width - next.player.width).max(0.0));
    next.player.y = next.player.y.clamp(0.0, (height - next.player.height).max(0.0));
    next.obstacles.iter_mut().for_each(|o| o.x *= scale);
    next.bullets.iter_mut().for_each(|b| b.x *= scale);
    next.power_ups.iter_mut().for_each(|p| p.x *= scale);
    next.boss_bullets.iter_mut().for_each(|b| b.x *= scale);
    if let Some(boss) = next.boss.as_mut() {
        boss.x = (boss.x * scale).clamp(0.0, (width - boss.width).max(0.0));
    }
    log::debug!("rescaled play field to {width}x{height}");
    next
}

/// Apply held directions for one frame, clamped to the play field.
pub fn move_player(state: &RunState, input: &Input) -> RunState {
    let mut next = state.clone();
    apply_input(&mut next, input);
    next
}

/// Take every cue raised since the last drain.
pub fn drain_cues(state: &mut RunState) -> Vec<Cue> {
    std::mem::take(&mut state.cues)
}

// ── In-place helpers shared with the other systems ──────────────────────────

/// Stop the run with a loss. Every timer is cancelled so nothing fires into
/// the torn-down state.
pub(crate) fn finish_run(state: &mut RunState) {
    if state.status == GameStatus::GameOver {
        return;
    }
    stop_effects(state);
    state.timers.cancel_all();
    state.status = GameStatus::GameOver;
    state.cues.push(Cue::MusicStop);
    record_high_score(state);
    log::info!("run over, score {}", state.score);
}

/// Clear the timed weapon effects and the shot cooldown.
pub(crate) fn stop_effects(state: &mut RunState) {
    state.timers.cancel(TimerKind::RapidFireExpiry);
    state.timers.cancel(TimerKind::BossGunExpiry);
    state.timers.cancel(TimerKind::ShotCooldown);
    state.player.rapid_fire_active = false;
    state.player.has_boss_gun = false;
    state.can_shoot = true;
}

pub(crate) fn record_high_score(state: &mut RunState) {
    if state.score > state.high_score {
        state.high_score = state.score;
    }
}

fn apply_input(state: &mut RunState, input: &Input) {
    let p = &mut state.player;
    let max_x = (state.width - p.width).max(0.0);
    let max_y = (state.height - p.height).max(0.0);

    if input.right {
        p.x = (p.x + p.speed).min(max_x);
    }
    if input.left {
        p.x = (p.x - p.speed).max(0.0);
    }
    if input.up {
        p.y = (p.y - p.speed).max(0.0);
    }
    if input.down {
        p.y = (p.y + p.speed).min(max_y);
    }
}

fn dispatch_timer(state: &mut RunState, kind: TimerKind, rng: &mut impl Rng) {
    match kind {
        TimerKind::RapidFireExpiry => state.player.rapid_fire_active = false,
        TimerKind::BossGunExpiry => state.player.has_boss_gun = false,
        TimerKind::ShotCooldown => state.can_shoot = true,
        TimerKind::BossEntry => boss::on_entry_complete(state),
        TimerKind::BossAttack => boss::boss_attack(state),
        TimerKind::ObstacleSpawn => spawner::spawn_obstacle(state, rng),
        TimerKind::PowerUpSpawn => spawner::spawn_power_up(state, rng),
    }
}

fn move_obstacles(state: &mut RunState) {
    let width = state.width;
    for obstacle in state.obstacles.iter_mut() {
        obstacle.y += obstacle.speed;
        obstacle.x += obstacle.dx;
        if obstacle.dx != 0.0 && (obstacle.x <= 0.0 || obstacle.x + obstacle.width >= width) {
            obstacle.dx = -obstacle.dx;
        }
    }
}

// ── Per-frame step ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame covering `dt_ms` of virtual time.
///
/// Order: due timers, player input, obstacle or boss motion, bullets,
/// explosions, power-ups, off-screen pruning, progression checks, collisions.
/// All randomness comes through `rng` so callers control determinism.
pub fn advance(state: &RunState, input: &Input, dt_ms: u64, rng: &mut impl Rng) -> RunState {
    if !state.is_active() {
        return state.clone();
    }
    let mut next = state.clone();
    next.frame += 1;

    // ── 1. Timers that came due since the last frame ─────────────────────────
    let until = next.timers.now() + dt_ms;
    while let Some(kind) = next.timers.pop_due(until) {
        dispatch_timer(&mut next, kind, rng);
    }
    next.timers.settle(until);

    // ── 2. Player ────────────────────────────────────────────────────────────
    apply_input(&mut next, input);

    // ── 3. Obstacles or boss ─────────────────────────────────────────────────
    if next.boss_active() {
        boss::update_boss(&mut next);
    } else {
        move_obstacles(&mut next);
    }

    // ── 4. Bullets, explosions, power-ups ────────────────────────────────────
    for bullet in next.bullets.iter_mut() {
        bullet.y -= bullet.speed;
    }
    next.bullets.retain(|b| b.y + b.height >= 0.0);

    for explosion in next.explosions.iter_mut() {
        explosion.frames = explosion.frames.saturating_sub(1);
    }
    next.explosions.retain(|e| e.frames > 0);

    for power_up in next.power_ups.iter_mut() {
        power_up.y += power_up.speed;
    }

    // ── 5. Drop anything that fell past the bottom edge ──────────────────────
    let height = next.height;
    next.obstacles.retain(|o| o.y <= height);
    next.power_ups.retain(|p| p.y <= height);

    // ── 6. Progression ───────────────────────────────────────────────────────
    if !next.boss_active() {
        if next.score >= next.stage_threshold {
            next.stage_threshold += next.config.stage_score_step;
            next.stage += 1;
        }
        if boss::threshold_reached(&next) {
            boss::spawn_boss(&mut next);
        }
    }

    // ── 7. Collisions ────────────────────────────────────────────────────────
    collision::resolve_all(&mut next);

    log::trace!(
        "frame {} t={} obstacles={} bullets={}",
        next.frame,
        next.timers.now(),
        next.obstacles.len(),
        next.bullets.len()
    );
    next
}
