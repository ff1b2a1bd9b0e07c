//! Path: survival_sim/src/systems/behavior.rs
//! Summary: プレイヤー移動・敵 Chase AI（並列評価）と空間グリッドへのコミット

use rayon::prelude::*;

use survival_core::constants::{
    ENEMY_SEPARATION_FORCE, ENEMY_SEPARATION_RADIUS, GRID_REBUILD_THRESHOLD,
};
use survival_core::physics::separation::apply_separation;

use crate::world::{EnemyWorld, SimWorld};

/// 入力層の移動意図は単位長までにクランプする（それ以上は検証しない）
fn clamp_unit(dx: f32, dy: f32) -> (f32, f32) {
    let len_sq = dx * dx + dy * dy;
    if len_sq > 1.0 {
        let len = len_sq.sqrt();
        (dx / len, dy / len)
    } else {
        (dx, dy)
    }
}

/// 挙動評価フェーズ。エンティティごとの移動は並列で評価し、
/// 空間グリッドという共有構造への反映は必ず単一スレッドの
/// コミットパスで行う。
pub(crate) fn run(w: &mut SimWorld, dt: f32) {
    let (dx, dy) = clamp_unit(w.player.input_dx, w.player.input_dy);
    w.player.x += dx * w.player.speed * dt;
    w.player.y += dy * w.player.speed * dt;

    // プレイヤーがアンカーから離れすぎたらグリッドを再アンカーし、
    // セルキーの絶対値が無限マップで育たないようにする
    if w.grid.needs_rebuild(w.player.x, w.player.y, GRID_REBUILD_THRESHOLD) {
        let enemies = &w.enemies;
        w.grid.rebuild(
            w.player.x,
            w.player.y,
            enemies
                .slots
                .iter_alive()
                .map(|i| (i, enemies.positions_x[i], enemies.positions_y[i])),
        );
        log::debug!("grid re-anchored at ({:.0}, {:.0})", w.player.x, w.player.y);
    }

    chase(&mut w.enemies, w.player.x, w.player.y, dt);

    // 分離パスの近傍候補は直前コミット時点のグリッドで十分
    apply_separation(
        &mut w.enemies,
        &w.grid,
        ENEMY_SEPARATION_RADIUS,
        ENEMY_SEPARATION_FORCE,
        dt,
    );

    // コミットパス: 移動後の所属セルを更新する
    for i in 0..w.enemies.len() {
        if w.enemies.is_alive(i) {
            w.grid
                .relocate(i, w.enemies.positions_x[i], w.enemies.positions_y[i]);
        }
    }
}

/// Chase AI: 全敵をプレイヤーに向けて移動（rayon で並列化）
fn chase(enemies: &mut EnemyWorld, player_x: f32, player_y: f32, dt: f32) {
    let len = enemies.len();
    let positions_x  = &mut enemies.positions_x[..len];
    let positions_y  = &mut enemies.positions_y[..len];
    let velocities_x = &mut enemies.velocities_x[..len];
    let velocities_y = &mut enemies.velocities_y[..len];
    let speeds       = &enemies.speeds[..len];
    let alive        = &enemies.slots.flags()[..len];

    (
        positions_x,
        positions_y,
        velocities_x,
        velocities_y,
        speeds,
        alive,
    )
        .into_par_iter()
        .for_each(|(px, py, vx, vy, speed, is_alive)| {
            if !*is_alive {
                return;
            }
            let dx   = player_x - *px;
            let dy   = player_y - *py;
            let dist = (dx * dx + dy * dy).sqrt().max(0.001);
            *vx  = (dx / dist) * speed;
            *vy  = (dy / dist) * speed;
            *px += *vx * dt;
            *py += *vy * dt;
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_normalizes_long_vectors() {
        let (dx, dy) = clamp_unit(3.0, 4.0);
        assert!((dx - 0.6).abs() < 1e-5);
        assert!((dy - 0.8).abs() < 1e-5);
        // 単位長以下はそのまま
        assert_eq!(clamp_unit(0.3, 0.0), (0.3, 0.0));
    }

    #[test]
    fn chase_moves_enemy_toward_player() {
        let mut enemies = EnemyWorld::new(0, None);
        let i = enemies.spawn(100.0, 0.0, 0, 30.0, 50.0).unwrap();
        chase(&mut enemies, 0.0, 0.0, 0.1);
        assert!(enemies.positions_x[i] < 100.0);
        assert_eq!(enemies.positions_y[i], 0.0);
    }

    #[test]
    fn dead_enemies_do_not_move() {
        let mut enemies = EnemyWorld::new(0, None);
        let i = enemies.spawn(100.0, 0.0, 0, 30.0, 50.0).unwrap();
        enemies.kill(i);
        chase(&mut enemies, 0.0, 0.0, 0.1);
        assert_eq!(enemies.positions_x[i], 100.0);
    }
}
