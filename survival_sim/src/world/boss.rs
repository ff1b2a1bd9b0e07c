//! Path: survival_sim/src/world/boss.rs
//! Summary: ボス状態（BossState）

use survival_core::blueprint::BossBlueprint;

/// ボス状態。通常の敵と違い同時に 1 体だけ存在し、プールを経由しない。
pub struct BossState {
    /// `LevelConfig::bosses` へのインデックス
    pub kind:          usize,
    pub x:             f32,
    pub y:             f32,
    pub hp:            f32,
    pub max_hp:        f32,
    /// 次の特殊行動（ミニオン召喚）までの残り秒数
    pub special_timer: f32,
}

impl BossState {
    pub fn new(kind: usize, blueprint: &BossBlueprint, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            hp:            blueprint.base_hp,
            max_hp:        blueprint.base_hp,
            special_timer: blueprint.special_interval,
        }
    }
}
