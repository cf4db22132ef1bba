/// Entity records and the run state that owns them. Plain data; the rules
/// live in the systems that mutate it.
///
/// Coordinates are logical canvas pixels with the origin at the top-left.

use crate::config::GameConfig;
use crate::timers::TimerRegistry;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }

    /// Strict AABB overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Initialized but not started (menu / before the first frame).
    Ready,
    Playing,
    /// Halted after a boss defeat, waiting for the player to continue.
    Won,
    GameOver,
}

/// Visual and behavioural variant of a player bullet, fixed at fire time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotKind {
    Normal,
    Rapid,
    BossGun,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    RapidFire,
    BossGun,
}

/// Discrete audio events for the host to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shoot(ShotKind),
    Explosion,
    PlayerHit,
    PowerUp,
    BossAttack,
    MusicStart,
    MusicStop,
}

/// Directions currently held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub shielded: bool,
    /// Expiry lives in the timer registry under `RapidFireExpiry`.
    pub rapid_fire_active: bool,
    /// Expiry lives in the timer registry under `BossGunExpiry`.
    pub has_boss_gun: bool,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Firing mode, boss gun taking priority over rapid fire.
    pub fn shot_kind(&self) -> ShotKind {
        if self.has_boss_gun {
            ShotKind::BossGun
        } else if self.rapid_fire_active {
            ShotKind::Rapid
        } else {
            ShotKind::Normal
        }
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Upward speed in pixels per frame.
    pub speed: f32,
    pub damage: u32,
    pub kind: ShotKind,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossBullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl BossBullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

// ── Enemies & pickups ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Horizontal drift per frame; zero for straight fallers.
    pub dx: f32,
    pub hp: u32,
    pub tough: bool,
    /// Index of the enemy sprite.
    pub variant: u8,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub kind: PowerUpKind,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Patrol speed.
    pub speed: f32,
    /// Horizontal direction, -1.0 or 1.0.
    pub direction: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub entering: bool,
}

impl Boss {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Cosmetic burst, removed when `frames` runs out.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub frames: u32,
}

// ── Master run state ──────────────────────────────────────────────────────────

/// Everything one run owns. Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct RunState {
    pub config: GameConfig,
    pub width: f32,
    pub height: f32,

    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    /// Present only while a boss fight is on.
    pub boss: Option<Boss>,
    pub boss_bullets: Vec<BossBullet>,
    pub explosions: Vec<Explosion>,

    pub timers: TimerRegistry,
    /// Cues raised since the host last drained them.
    pub cues: Vec<Cue>,

    pub score: u32,
    pub lives: u32,
    pub high_score: u32,
    pub status: GameStatus,
    pub can_shoot: bool,

    // ── Difficulty ────────────────────────────────────────────────────────────
    pub obstacle_speed: f32,
    pub spawn_period_ms: u64,
    pub next_boss_score: u32,
    pub bosses_defeated: u32,
    /// Score at which `stage` next advances.
    pub stage_threshold: u32,
    pub stage: u32,

    pub frame: u64,
}

impl RunState {
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn boss_active(&self) -> bool {
        self.boss.is_some()
    }
}
