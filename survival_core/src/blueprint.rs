//! Path: survival_core/src/blueprint.rs
//! Summary: 敵・ボス・アビリティのブループリントとレベル設定（セッション開始時に読み込む不変データ)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::{Curve, Interpolation};
use crate::stats::{DeltaMode, StatKind};

/// スポーン可能な敵 1 種の定義
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnemyBlueprint {
    pub name:        String,
    pub base_hp:     f32,
    pub speed:       f32,
    pub radius:      f32,
    pub exp_reward:  u32,
    /// 接触中に与える毎秒ダメージ
    pub contact_dps: f32,
}

/// スポーンテーブルの 1 エントリ。
/// `window` の外では重みカーブの値に関わらず確率 0。
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpawnEntry {
    /// `LevelConfig::enemies` へのインデックス
    pub enemy:  usize,
    /// 有効な時間割合ウィンドウ [start, end]（0.0〜1.0）
    pub window: (f32, f32),
    pub weight: Curve,
}

impl SpawnEntry {
    pub fn window_contains(&self, time_fraction: f32) -> bool {
        self.window.0 <= time_fraction && time_fraction <= self.window.1
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BossBlueprint {
    pub name:             String,
    pub base_hp:          f32,
    pub speed:            f32,
    pub radius:           f32,
    pub exp_reward:       u32,
    pub contact_dps:      f32,
    /// 特殊行動（ミニオン召喚）の間隔（秒）
    pub special_interval: f32,
    /// 召喚する敵 blueprint と体数
    pub minion:           usize,
    pub minion_count:     usize,
}

/// 絶対経過時間で一度だけ発火するボストリガー。
/// レベル時間を超えるトリガーは発火しない（validate が警告する）。
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BossTrigger {
    /// `LevelConfig::bosses` へのインデックス
    pub boss:       usize,
    pub at_seconds: f32,
}

/// アビリティの挙動タグ。継承階層の代わりに、ティック側が
/// このタグで挙動関数へディスパッチする。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityBehavior {
    /// 最近接の敵へ弾を発射する
    Bolt,
    /// 全方位へ等間隔に弾をばらまく
    RadialBurst,
    /// プレイヤー周囲のオーラで周期ダメージ
    Aura,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prerequisite {
    MinLevel(u32),
    /// 指定アビリティを所持していること
    Requires(usize),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AbilityBlueprint {
    pub name:                  String,
    pub behavior:              AbilityBehavior,
    pub base_damage:           f32,
    pub base_cooldown:         f32,
    /// Bolt / RadialBurst: 同時発射数
    pub base_amount:           i32,
    pub base_projectile_speed: f32,
    /// Aura: 効果半径
    pub base_range:            f32,
    /// Bolt: 貫通回数（0 で最初のヒットで消滅）
    pub base_pierce:           i32,
    pub projectile_lifetime:   f32,
    pub prerequisite:          Option<Prerequisite>,
    /// レベルアップ候補としての選択重み
    pub choice_weight:         f32,
}

/// レベルアップ候補になるステータスアップグレード
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatUpgrade {
    pub kind:   StatKind,
    pub delta:  f32,
    pub mode:   DeltaMode,
    pub weight: f32,
    /// 選択 UI 向けの表示名
    pub label:  String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerBlueprint {
    pub max_hp: f32,
    pub speed:  f32,
    pub radius: f32,
}

/// 1 セッションぶんの不変設定。アセット層がセッション開始時に供給し、
/// コアは読むだけで一切書き換えない。
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelConfig {
    /// セッションの長さ（秒）
    pub duration:         f32,
    pub player:           PlayerBlueprint,
    pub enemies:          Vec<EnemyBlueprint>,
    pub spawn_entries:    Vec<SpawnEntry>,
    /// 時間割合 -> 毎秒スポーン数
    pub spawn_rate:       Curve,
    /// 時間割合 -> スポーン時 HP 倍率
    pub hp_multiplier:    Curve,
    pub bosses:           Vec<BossBlueprint>,
    pub boss_triggers:    Vec<BossTrigger>,
    pub abilities:        Vec<AbilityBlueprint>,
    pub upgrades:         Vec<StatUpgrade>,
    /// セッション開始時に装備するアビリティ
    pub starting_ability: Option<usize>,
    /// 同時生存数の上限（超過ぶんのスポーンはドロップして数える）
    pub enemy_cap:        Option<usize>,
    pub warm_enemies:     usize,
    pub warm_projectiles: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("level duration must be positive (got {0})")]
    NonPositiveDuration(f32),
    #[error("enemy table is empty")]
    NoEnemies,
    #[error("spawn entry {index} references enemy {enemy} out of range")]
    BadSpawnEnemy { index: usize, enemy: usize },
    #[error("boss trigger {index} references boss {boss} out of range")]
    BadBossTrigger { index: usize, boss: usize },
    #[error("boss {index} minion {minion} out of range")]
    BadBossMinion { index: usize, minion: usize },
    #[error("starting ability {0} out of range")]
    BadStartingAbility(usize),
    #[error("ability {index} prerequisite references ability {target} out of range")]
    BadPrerequisite { index: usize, target: usize },
}

impl LevelConfig {
    /// 参照整合性のない設定はセッション開始前にここで弾く。
    /// 回復可能なコンテンツ上の怪しさ（時間超過トリガーなど）は
    /// 警告ログに落とすだけで Err にはしない。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration <= 0.0 {
            return Err(ConfigError::NonPositiveDuration(self.duration));
        }
        if self.enemies.is_empty() {
            return Err(ConfigError::NoEnemies);
        }
        for (index, entry) in self.spawn_entries.iter().enumerate() {
            if entry.enemy >= self.enemies.len() {
                return Err(ConfigError::BadSpawnEnemy { index, enemy: entry.enemy });
            }
        }
        for (index, trigger) in self.boss_triggers.iter().enumerate() {
            if trigger.boss >= self.bosses.len() {
                return Err(ConfigError::BadBossTrigger { index, boss: trigger.boss });
            }
            if trigger.at_seconds >= self.duration {
                log::warn!(
                    "boss trigger {index} at {}s is past level duration {}s and will never fire",
                    trigger.at_seconds,
                    self.duration
                );
            }
        }
        for (index, boss) in self.bosses.iter().enumerate() {
            if boss.minion >= self.enemies.len() {
                return Err(ConfigError::BadBossMinion { index, minion: boss.minion });
            }
        }
        if let Some(start) = self.starting_ability {
            if start >= self.abilities.len() {
                return Err(ConfigError::BadStartingAbility(start));
            }
        }
        for (index, ability) in self.abilities.iter().enumerate() {
            if let Some(Prerequisite::Requires(target)) = ability.prerequisite {
                if target >= self.abilities.len() {
                    return Err(ConfigError::BadPrerequisite { index, target });
                }
            }
        }
        if self.spawn_entries.is_empty() {
            log::warn!("spawn table is empty; only boss triggers will produce enemies");
        }
        Ok(())
    }

    pub fn time_fraction(&self, elapsed: f32) -> f32 {
        (elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// デモバイナリとテストが使う調整済みのデフォルトレベル
pub fn default_level() -> LevelConfig {
    LevelConfig {
        duration: 600.0,
        player: PlayerBlueprint {
            max_hp: 100.0,
            speed:  200.0,
            radius: 32.0,
        },
        enemies: vec![
            EnemyBlueprint {
                name:        "slime".into(),
                base_hp:     30.0,
                speed:       80.0,
                radius:      20.0,
                exp_reward:  5,
                contact_dps: 20.0,
            },
            EnemyBlueprint {
                name:        "bat".into(),
                base_hp:     15.0,
                speed:       160.0,
                radius:      12.0,
                exp_reward:  3,
                contact_dps: 10.0,
            },
            EnemyBlueprint {
                name:        "golem".into(),
                base_hp:     150.0,
                speed:       40.0,
                radius:      32.0,
                exp_reward:  20,
                contact_dps: 40.0,
            },
        ],
        spawn_entries: vec![
            SpawnEntry {
                enemy:  0,
                window: (0.0, 1.0),
                weight: Curve::constant(1.0),
            },
            SpawnEntry {
                enemy:  1,
                window: (0.1, 1.0),
                weight: Curve::new(vec![(0.1, 0.4), (1.0, 1.5)], Interpolation::Linear),
            },
            SpawnEntry {
                enemy:  2,
                window: (0.3, 1.0),
                weight: Curve::new(vec![(0.3, 0.2), (1.0, 1.0)], Interpolation::Linear),
            },
        ],
        spawn_rate: Curve::new(
            vec![(0.0, 0.5), (0.1, 1.6), (0.3, 5.3), (0.6, 12.0), (1.0, 25.7)],
            Interpolation::Linear,
        ),
        hp_multiplier: Curve::new(vec![(0.0, 1.0), (1.0, 3.0)], Interpolation::Linear),
        bosses: vec![BossBlueprint {
            name:             "slime king".into(),
            base_hp:          1000.0,
            speed:            60.0,
            radius:           48.0,
            exp_reward:       200,
            contact_dps:      30.0,
            special_interval: 5.0,
            minion:           0,
            minion_count:     8,
        }],
        boss_triggers: vec![BossTrigger {
            boss:       0,
            at_seconds: 300.0,
        }],
        abilities: vec![
            AbilityBlueprint {
                name:                  "magic bolt".into(),
                behavior:              AbilityBehavior::Bolt,
                base_damage:           10.0,
                base_cooldown:         1.0,
                base_amount:           1,
                base_projectile_speed: 400.0,
                base_range:            0.0,
                base_pierce:           0,
                projectile_lifetime:   3.0,
                prerequisite:          None,
                choice_weight:         1.0,
            },
            AbilityBlueprint {
                name:                  "cross burst".into(),
                behavior:              AbilityBehavior::RadialBurst,
                base_damage:           15.0,
                base_cooldown:         2.0,
                base_amount:           4,
                base_projectile_speed: 400.0,
                base_range:            0.0,
                base_pierce:           0,
                projectile_lifetime:   3.0,
                prerequisite:          None,
                choice_weight:         1.0,
            },
            AbilityBlueprint {
                name:                  "garlic aura".into(),
                behavior:              AbilityBehavior::Aura,
                base_damage:           4.0,
                base_cooldown:         0.25,
                base_amount:           0,
                base_projectile_speed: 0.0,
                base_range:            90.0,
                base_pierce:           0,
                projectile_lifetime:   0.0,
                prerequisite:          Some(Prerequisite::MinLevel(2)),
                choice_weight:         0.8,
            },
        ],
        upgrades: vec![
            StatUpgrade {
                kind:   StatKind::Damage,
                delta:  0.2,
                mode:   DeltaMode::Relative,
                weight: 1.0,
                label:  "+20% damage".into(),
            },
            StatUpgrade {
                kind:   StatKind::Cooldown,
                delta:  -0.1,
                mode:   DeltaMode::Relative,
                weight: 1.0,
                label:  "-10% cooldown".into(),
            },
            StatUpgrade {
                kind:   StatKind::Amount,
                delta:  1.0,
                mode:   DeltaMode::Additive,
                weight: 0.6,
                label:  "+1 projectile".into(),
            },
            StatUpgrade {
                kind:   StatKind::ProjectileSpeed,
                delta:  0.15,
                mode:   DeltaMode::Relative,
                weight: 0.8,
                label:  "+15% projectile speed".into(),
            },
            StatUpgrade {
                kind:   StatKind::Range,
                delta:  0.15,
                mode:   DeltaMode::Relative,
                weight: 0.8,
                label:  "+15% area".into(),
            },
            StatUpgrade {
                kind:   StatKind::Pierce,
                delta:  1.0,
                mode:   DeltaMode::Additive,
                weight: 0.5,
                label:  "+1 pierce".into(),
            },
        ],
        starting_ability: Some(0),
        enemy_cap:        Some(2000),
        warm_enemies:     256,
        warm_projectiles: 128,
    }
}
