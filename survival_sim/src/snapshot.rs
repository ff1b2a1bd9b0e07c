//! Path: survival_sim/src/snapshot.rs
//! Summary: プレゼンテーション層向けの読み取り専用スナップショット

use survival_core::util::exp_required_for_next;

use crate::world::{PickupKind, SimWorld};

/// プレイヤーの離散状態
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActorState {
    Idle,
    Moving,
}

#[derive(Clone, Copy, Debug)]
pub struct PlayerView {
    pub x:           f32,
    pub y:           f32,
    pub state:       ActorState,
    pub hp_fraction: f32,
    pub invincible:  bool,
}

#[derive(Clone, Copy, Debug)]
pub struct EnemyView {
    pub x:           f32,
    pub y:           f32,
    pub kind:        u16,
    pub hp_fraction: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct ProjectileView {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct PickupView {
    pub x:    f32,
    pub y:    f32,
    pub kind: PickupKind,
}

#[derive(Clone, Copy, Debug)]
pub struct TextView {
    pub x:            f32,
    pub y:            f32,
    pub value:        u32,
    /// 0.0（出現直後）〜 1.0（消滅直前）
    pub age_fraction: f32,
}

#[derive(Clone, Debug)]
pub struct BossView {
    pub x:           f32,
    pub y:           f32,
    pub name:        String,
    pub hp_fraction: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct HudView {
    pub hp:         f32,
    pub max_hp:     f32,
    pub level:      u32,
    pub exp:        u32,
    pub exp_next:   u32,
    pub score:      u32,
    pub kill_count: u32,
    pub elapsed:    f32,
    pub duration:   f32,
}

/// 1 ティックぶんの描画入力。シミュレーション状態への参照は持たず、
/// プレゼンテーション層が何をしてもワールドには影響しない。
/// 非アクティブなプールスロットは含まれない。
#[derive(Clone, Debug)]
pub struct WorldSnapshot {
    pub player:      PlayerView,
    pub enemies:     Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub pickups:     Vec<PickupView>,
    pub texts:       Vec<TextView>,
    pub boss:        Option<BossView>,
    pub hud:         HudView,
}

pub fn capture(w: &SimWorld) -> WorldSnapshot {
    let moving = w.player.input_dx != 0.0 || w.player.input_dy != 0.0;
    let player = PlayerView {
        x:           w.player.x,
        y:           w.player.y,
        state:       if moving { ActorState::Moving } else { ActorState::Idle },
        hp_fraction: (w.player.hp / w.player.max_hp).clamp(0.0, 1.0),
        invincible:  w.player.invincible_timer > 0.0,
    };

    let enemies = w
        .enemies
        .slots
        .iter_alive()
        .map(|i| EnemyView {
            x:           w.enemies.positions_x[i],
            y:           w.enemies.positions_y[i],
            kind:        w.enemies.kind_ids[i],
            hp_fraction: (w.enemies.hp[i] / w.enemies.max_hp[i]).clamp(0.0, 1.0),
        })
        .collect();

    let projectiles = w
        .projectiles
        .slots
        .iter_alive()
        .map(|i| ProjectileView {
            x: w.projectiles.positions_x[i],
            y: w.projectiles.positions_y[i],
        })
        .collect();

    let pickups = w
        .pickups
        .slots
        .iter_alive()
        .map(|i| PickupView {
            x:    w.pickups.positions_x[i],
            y:    w.pickups.positions_y[i],
            kind: w.pickups.kinds[i],
        })
        .collect();

    let texts = w
        .texts
        .slots
        .iter_alive()
        .map(|i| TextView {
            x:            w.texts.positions_x[i],
            y:            w.texts.positions_y[i],
            value:        w.texts.value[i],
            age_fraction: (1.0 - w.texts.lifetime[i] / w.texts.max_lifetime[i]).clamp(0.0, 1.0),
        })
        .collect();

    let boss = w.boss.as_ref().map(|b| BossView {
        x:           b.x,
        y:           b.y,
        name:        w.config.bosses[b.kind].name.clone(),
        hp_fraction: (b.hp / b.max_hp).clamp(0.0, 1.0),
    });

    WorldSnapshot {
        player,
        enemies,
        projectiles,
        pickups,
        texts,
        boss,
        hud: HudView {
            hp:         w.player.hp,
            max_hp:     w.player.max_hp,
            level:      w.level,
            exp:        w.exp,
            exp_next:   exp_required_for_next(w.level),
            score:      w.score,
            kill_count: w.kill_count,
            elapsed:    w.elapsed,
            duration:   w.config.duration,
        },
    }
}
