/// Tunable game parameters.
///
/// Every field has a default taken from the shipped game balance; a JSON file
/// only needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Player ────────────────────────────────────────────────────────────────
    pub player_size: f32,
    pub player_speed: f32,
    /// Distance from the bottom edge to the player's top edge at run start.
    pub player_bottom_offset: f32,
    pub starting_lives: u32,
    /// Lives granted after a boss is defeated.
    pub recovery_lives: u32,

    // ── Weapons ───────────────────────────────────────────────────────────────
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_speed: f32,
    pub boss_gun_bullet_width: f32,
    pub boss_gun_bullet_height: f32,
    pub boss_gun_damage: u32,
    pub normal_shot_cooldown_ms: u64,
    pub rapid_shot_cooldown_ms: u64,
    pub boss_gun_shot_cooldown_ms: u64,
    pub rapid_fire_duration_ms: u64,
    pub boss_gun_duration_ms: u64,

    // ── Obstacles ─────────────────────────────────────────────────────────────
    pub obstacle_size: f32,
    pub obstacle_base_speed: f32,
    pub obstacle_base_spawn_ms: u64,
    pub obstacle_min_spawn_ms: u64,
    /// Speed added each time the normal spawners start.
    pub speed_ramp: f32,
    /// Spawn period removed each time the normal spawners start.
    pub spawn_ramp_ms: u64,
    /// Extra speed added when continuing after a boss defeat.
    pub boss_speed_ramp: f32,
    /// Extra spawn period removed when continuing after a boss defeat.
    pub boss_spawn_ramp_ms: u64,
    pub tough_chance: f64,
    pub drift_chance: f64,
    pub obstacle_score: u32,
    /// Number of distinct enemy sprites to pick from.
    pub enemy_variants: u8,

    // ── Power-ups ─────────────────────────────────────────────────────────────
    pub power_up_size: f32,
    pub power_up_speed: f32,
    pub max_power_ups: usize,
    pub power_up_spawn_ms: u64,
    pub boss_power_up_spawn_ms: u64,

    // ── Boss ──────────────────────────────────────────────────────────────────
    pub boss_first_score: u32,
    /// Added on top of `boss_first_score` when bumping the next threshold.
    pub boss_threshold_bonus: u32,
    pub boss_size: f32,
    pub boss_hp: i32,
    pub boss_patrol_speed: f32,
    pub boss_entry_speed: f32,
    pub boss_rest_y: f32,
    pub boss_entry_delay_ms: u64,
    pub boss_attack_ms: u64,
    pub boss_bullet_size: f32,
    pub boss_bullet_speed: f32,
    pub boss_defeat_bonus: u32,

    // ── Effects & progression ────────────────────────────────────────────────
    pub explosion_frames: u32,
    pub large_explosion_size: f32,
    pub stage_score_step: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_size: 40.0,
            player_speed: 5.0,
            player_bottom_offset: 50.0,
            starting_lives: 3,
            recovery_lives: 1,

            bullet_width: 10.0,
            bullet_height: 20.0,
            bullet_speed: 7.0,
            boss_gun_bullet_width: 20.0,
            boss_gun_bullet_height: 30.0,
            boss_gun_damage: 5,
            normal_shot_cooldown_ms: 500,
            rapid_shot_cooldown_ms: 100,
            boss_gun_shot_cooldown_ms: 200,
            rapid_fire_duration_ms: 10_000,
            boss_gun_duration_ms: 10_000,

            obstacle_size: 40.0,
            obstacle_base_speed: 2.0,
            obstacle_base_spawn_ms: 1_000,
            obstacle_min_spawn_ms: 400,
            speed_ramp: 0.2,
            spawn_ramp_ms: 50,
            boss_speed_ramp: 0.5,
            boss_spawn_ramp_ms: 100,
            tough_chance: 0.25,
            drift_chance: 0.35,
            obstacle_score: 100,
            enemy_variants: 3,

            power_up_size: 35.0,
            power_up_speed: 1.5,
            max_power_ups: 2,
            power_up_spawn_ms: 15_000,
            boss_power_up_spawn_ms: 8_000,

            boss_first_score: 3_000,
            boss_threshold_bonus: 2_000,
            boss_size: 100.0,
            boss_hp: 100,
            boss_patrol_speed: 2.0,
            boss_entry_speed: 1.0,
            boss_rest_y: 50.0,
            boss_entry_delay_ms: 2_000,
            boss_attack_ms: 1_500,
            boss_bullet_size: 20.0,
            boss_bullet_speed: 4.0,
            boss_defeat_bonus: 2_000,

            explosion_frames: 15,
            large_explosion_size: 100.0,
            stage_score_step: 1_000,
        }
    }
}

impl GameConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("loaded game config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values that would stall the timer registry or break collisions.
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("normal_shot_cooldown_ms", self.normal_shot_cooldown_ms),
            ("rapid_shot_cooldown_ms", self.rapid_shot_cooldown_ms),
            ("boss_gun_shot_cooldown_ms", self.boss_gun_shot_cooldown_ms),
            ("obstacle_min_spawn_ms", self.obstacle_min_spawn_ms),
            ("power_up_spawn_ms", self.power_up_spawn_ms),
            ("boss_power_up_spawn_ms", self.boss_power_up_spawn_ms),
            ("boss_attack_ms", self.boss_attack_ms),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, ms)| *ms == 0) {
            return Err(Error::Config(format!("{name} must be greater than zero")));
        }
        if self.obstacle_base_spawn_ms < self.obstacle_min_spawn_ms {
            return Err(Error::Config(
                "obstacle_base_spawn_ms must not be below obstacle_min_spawn_ms".into(),
            ));
        }

        let sizes = [
            ("player_size", self.player_size),
            ("bullet_width", self.bullet_width),
            ("bullet_height", self.bullet_height),
            ("obstacle_size", self.obstacle_size),
            ("power_up_size", self.power_up_size),
            ("boss_size", self.boss_size),
            ("boss_bullet_size", self.boss_bullet_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(Error::Config(format!("{name} must be positive")));
        }

        for (name, chance) in [("tough_chance", self.tough_chance), ("drift_chance", self.drift_chance)] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(Error::Config(format!("{name} must be between 0 and 1")));
            }
        }

        if self.boss_hp <= 0 || self.enemy_variants == 0 || self.starting_lives == 0 {
            return Err(Error::Config(
                "boss_hp, enemy_variants and starting_lives must be positive".into(),
            ));
        }
        Ok(())
    }
}
