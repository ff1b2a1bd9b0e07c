//! Path: survival_sim/src/systems/mod.rs
//! Summary: ティックを構成するシステム群と撃破時の共通処理

pub(crate) mod abilities;
pub(crate) mod behavior;
pub(crate) mod boss;
pub(crate) mod collision;
pub mod leveling;
pub(crate) mod pickups;
pub(crate) mod projectiles;
pub mod spawn;

use crate::world::{FrameEvent, PickupKind, SimWorld};

/// 敵 1 体の撃破処理。グリッドとプールからの回収、スコア・経験値・
/// ドロップ・イベントまでを一箇所で行う（どの攻撃手段から呼ばれても同じ）。
pub(crate) fn on_enemy_killed(w: &mut SimWorld, ei: usize, ability: u16) {
    let kind = w.enemies.kind_ids[ei];
    let ex = w.enemies.positions_x[ei];
    let ey = w.enemies.positions_y[ei];
    let exp = w.config.enemies[kind as usize].exp_reward;

    w.grid.remove(ei);
    w.enemies.kill(ei);
    w.kill_count += 1;
    w.score += exp * 2;
    w.texts.spawn(ex, ey - 20.0, exp * 2, 0.8);
    w.frame_events.push(FrameEvent::EnemyKilled { enemy: kind, ability });

    // ドロップ抽選（2% 磁石、5% ポーション、残りは宝石）
    let roll = w.rng.next_u32() % 100;
    let (drop_kind, value) = if roll < 2 {
        (PickupKind::Magnet, 0)
    } else if roll < 7 {
        (PickupKind::Potion, 20)
    } else {
        (PickupKind::Gem, exp)
    };
    w.pickups.spawn(ex, ey, drop_kind, value);

    leveling::grant_exp(w, exp);
}
