//! Path: survival_sim/src/systems/projectiles.rs
//! Summary: 弾丸の移動・寿命と弾丸 vs 敵の衝突解決

use survival_core::constants::PROJECTILE_RADIUS;

use super::on_enemy_killed;
use crate::world::SimWorld;

pub(crate) fn run(w: &mut SimWorld, dt: f32) {
    let len = w.projectiles.len();

    // 移動と寿命
    for i in 0..len {
        if !w.projectiles.is_alive(i) {
            continue;
        }
        w.projectiles.positions_x[i] += w.projectiles.velocities_x[i] * dt;
        w.projectiles.positions_y[i] += w.projectiles.velocities_y[i] * dt;
        w.projectiles.lifetime[i] -= dt;
        if w.projectiles.lifetime[i] <= 0.0 {
            w.projectiles.kill(i);
        }
    }

    // 弾丸 vs 敵。クエリ半径は設定中の最大敵半径ぶん広げる
    let query_r = PROJECTILE_RADIUS + w.max_enemy_radius;
    for bi in 0..len {
        if !w.projectiles.is_alive(bi) {
            continue;
        }
        let bx = w.projectiles.positions_x[bi];
        let by = w.projectiles.positions_y[bi];
        let damage = w.projectiles.damage[bi];
        let ability = w.projectiles.ability_ids[bi];

        let mut buf = std::mem::take(&mut w.query_buf);
        w.grid.query_radius_into(bx, by, query_r, &mut buf);
        for k in 0..buf.len() {
            let ei = buf[k];
            if !w.enemies.is_alive(ei) {
                continue;
            }
            let er = w.config.enemies[w.enemies.kind_ids[ei] as usize].radius;
            let hit_r = PROJECTILE_RADIUS + er;
            let dx = bx - w.enemies.positions_x[ei];
            let dy = by - w.enemies.positions_y[ei];
            if dx * dx + dy * dy >= hit_r * hit_r {
                continue;
            }

            w.enemies.hp[ei] -= damage;
            if w.enemies.hp[ei] <= 0.0 {
                on_enemy_killed(w, ei, ability);
            }
            // 貫通予算が残っていれば飛び続け、尽きたら消える
            if w.projectiles.pierce_left[bi] > 0 {
                w.projectiles.pierce_left[bi] -= 1;
            } else {
                w.projectiles.kill(bi);
                break;
            }
        }
        w.query_buf = buf;
    }
}
