//! Path: survival_sim/src/systems/collision.rs
//! Summary: 敵 vs プレイヤーの接触ダメージと無敵ウィンドウ

use survival_core::constants::INVINCIBLE_DURATION;

use crate::world::{FrameEvent, SimWorld};

pub(crate) fn run(w: &mut SimWorld, dt: f32) {
    if w.player.invincible_timer > 0.0 {
        w.player.invincible_timer = (w.player.invincible_timer - dt).max(0.0);
    }

    let px = w.player.x;
    let py = w.player.y;
    let query_r = w.player.radius + w.max_enemy_radius;

    let mut buf = std::mem::take(&mut w.query_buf);
    w.grid.query_radius_into(px, py, query_r, &mut buf);
    for k in 0..buf.len() {
        let ei = buf[k];
        if !w.enemies.is_alive(ei) {
            continue;
        }
        let kind = w.enemies.kind_ids[ei] as usize;
        let er = w.config.enemies[kind].radius;
        let hit_r = w.player.radius + er;
        let dx = px - w.enemies.positions_x[ei];
        let dy = py - w.enemies.positions_y[ei];
        if dx * dx + dy * dy >= hit_r * hit_r {
            continue;
        }
        // 接触ダメージは無敵ウィンドウで間引く
        if w.player.invincible_timer <= 0.0 && w.player.hp > 0.0 {
            let damage = w.config.enemies[kind].contact_dps * dt;
            w.player.hp = (w.player.hp - damage).max(0.0);
            w.player.invincible_timer = INVINCIBLE_DURATION;
            w.frame_events.push(FrameEvent::PlayerDamaged { damage });
        }
    }
    w.query_buf = buf;
}
