//! Path: survival_sim/src/world/player.rs
//! Summary: プレイヤー状態（座標・移動意図・HP・無敵タイマー）

use survival_core::blueprint::PlayerBlueprint;

/// プレイヤー状態
pub struct PlayerState {
    pub x:                f32,
    pub y:                f32,
    /// 入力層から毎ティック渡される移動意図（単位長にクランプ済み）
    pub input_dx:         f32,
    pub input_dy:         f32,
    pub hp:               f32,
    pub max_hp:           f32,
    pub speed:            f32,
    pub radius:           f32,
    pub invincible_timer: f32,
}

impl PlayerState {
    pub fn new(blueprint: &PlayerBlueprint) -> Self {
        Self {
            x:                0.0,
            y:                0.0,
            input_dx:         0.0,
            input_dy:         0.0,
            hp:               blueprint.max_hp,
            max_hp:           blueprint.max_hp,
            speed:            blueprint.speed,
            radius:           blueprint.radius,
            invincible_timer: 0.0,
        }
    }
}
