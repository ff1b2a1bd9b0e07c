//! Path: survival_sim/src/world/sim_world.rs
//! Summary: シミュレーションワールド（SimWorld）とセッションフェーズ

use survival_core::blueprint::{ConfigError, LevelConfig};
use survival_core::constants::CELL_SIZE;
use survival_core::physics::rng::SimpleRng;
use survival_core::physics::spatial_grid::SpatialGrid;
use survival_core::stats::StatRegistry;

use super::{
    AbilityInstance, BossState, EnemyWorld, FloatingTextWorld, FrameEvent, PickupWorld,
    PlayerState, ProjectileWorld,
};
use crate::systems::leveling::{self, UpgradeChoice};
use crate::systems::spawn::SpawnScheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 制限時間まで生き残った
    Victory,
    /// HP が尽きた
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Running,
    Ended(SessionOutcome),
}

/// シミュレーション全体の状態。
/// 1 ティック内の処理は同一スレッドで完結するためロックは持たない。
pub struct SimWorld {
    pub config:  LevelConfig,
    pub rng:     SimpleRng,
    pub elapsed: f32,
    pub phase:   SessionPhase,

    pub player:      PlayerState,
    pub enemies:     EnemyWorld,
    pub projectiles: ProjectileWorld,
    pub pickups:     PickupWorld,
    pub texts:       FloatingTextWorld,
    pub boss:        Option<BossState>,

    pub grid:      SpatialGrid,
    pub stats:     StatRegistry,
    pub abilities: Vec<AbilityInstance>,
    pub spawner:   SpawnScheduler,

    /// 累積経験値（レベルしきい値テーブルと比較する）
    pub exp:              u32,
    /// 現在のレベル（1 始まり）
    pub level:            u32,
    /// レベルアップ待機フラグ（ホストが選択を返すまで true）
    pub level_up_pending: bool,
    /// 待機中の選択肢（`apply_choice` にインデックスで答える）
    pub pending_choices:  Vec<UpgradeChoice>,

    /// 磁石エフェクト残り時間（秒）
    pub magnet_timer: f32,
    pub score:        u32,
    pub kill_count:   u32,

    /// このティックで発生したイベント（ホストが drain する）
    pub frame_events: Vec<FrameEvent>,
    /// 直近ティックの処理時間（ms）
    pub last_tick_ms: f64,

    /// 衝突・索敵クエリ用の再利用バッファ
    pub(crate) query_buf: Vec<usize>,
    /// 設定中の最大敵半径（クエリ半径の拡張に使う）
    pub(crate) max_enemy_radius: f32,
}

impl SimWorld {
    pub fn new(config: LevelConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let max_enemy_radius = config
            .enemies
            .iter()
            .map(|e| e.radius)
            .fold(0.0_f32, f32::max);

        let mut world = Self {
            player:      PlayerState::new(&config.player),
            enemies:     EnemyWorld::new(config.warm_enemies, config.enemy_cap),
            projectiles: ProjectileWorld::new(config.warm_projectiles),
            pickups:     PickupWorld::new(),
            texts:       FloatingTextWorld::new(),
            boss:        None,
            grid:        SpatialGrid::new(CELL_SIZE),
            stats:       StatRegistry::new(),
            abilities:   Vec::new(),
            spawner:     SpawnScheduler::new(&config),
            rng:         SimpleRng::new(seed),
            elapsed:     0.0,
            phase:       SessionPhase::Running,
            exp:              0,
            level:            1,
            level_up_pending: false,
            pending_choices:  Vec::new(),
            magnet_timer: 0.0,
            score:        0,
            kill_count:   0,
            frame_events: Vec::new(),
            last_tick_ms: 0.0,
            query_buf:        Vec::new(),
            max_enemy_radius,
            config,
        };

        if let Some(start) = world.config.starting_ability {
            leveling::add_ability(&mut world, start);
        }
        Ok(world)
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// セッションを終了させ、終了イベントを積む
    pub(crate) fn end_session(&mut self, outcome: SessionOutcome) {
        if self.phase == SessionPhase::Running {
            self.phase = SessionPhase::Ended(outcome);
            self.frame_events.push(FrameEvent::SessionEnded { outcome });
            log::info!(
                "session ended: {:?} after {:.1}s ({} kills, score {})",
                outcome,
                self.elapsed,
                self.kill_count,
                self.score
            );
        }
    }

    /// ティック内に発生したイベントを取り出す
    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        self.frame_events.drain(..).collect()
    }
}
