//! Path: survival_sim/src/systems/boss.rs
//! Summary: ボスの追跡・特殊行動（ミニオン召喚）・接触と被弾・撃破処理

use survival_core::constants::{INVINCIBLE_DURATION, PROJECTILE_RADIUS};

use super::{leveling, spawn::sampled_hp_multiplier};
use crate::world::{FrameEvent, PickupKind, SimWorld};

pub(crate) fn run(w: &mut SimWorld, dt: f32) {
    if w.boss.is_none() {
        return;
    }
    let px = w.player.x;
    let py = w.player.y;

    // ブループリントのスカラーを先にコピーして借用競合を避ける
    let kind = w.boss.as_ref().map(|b| b.kind).unwrap_or(0);
    let (speed, radius, contact_dps, interval, minion, minion_count, exp_reward) = {
        let bp = &w.config.bosses[kind];
        (
            bp.speed,
            bp.radius,
            bp.contact_dps,
            bp.special_interval,
            bp.minion,
            bp.minion_count,
            bp.exp_reward,
        )
    };

    // フェーズ 1: ボスのみ借用して移動とタイマーを進める
    let mut minion_burst = false;
    if let Some(boss) = w.boss.as_mut() {
        let dx = px - boss.x;
        let dy = py - boss.y;
        let dist = (dx * dx + dy * dy).sqrt().max(0.001);
        boss.x += (dx / dist) * speed * dt;
        boss.y += (dy / dist) * speed * dt;

        boss.special_timer -= dt;
        if boss.special_timer <= 0.0 {
            boss.special_timer = interval;
            minion_burst = true;
        }
    }
    let (bx, by) = w.boss.as_ref().map(|b| (b.x, b.y)).unwrap_or((0.0, 0.0));

    // フェーズ 2: 借用を解放してから副作用を適用する
    if minion_burst {
        let tf = w.config.time_fraction(w.elapsed);
        let hp_mul = sampled_hp_multiplier(&w.config, tf);
        let (minion_hp, minion_speed) = {
            let bp = &w.config.enemies[minion];
            (bp.base_hp * hp_mul, bp.speed)
        };
        for k in 0..minion_count {
            let angle = k as f32 * std::f32::consts::TAU / minion_count.max(1) as f32;
            let x = bx + angle.cos() * 120.0;
            let y = by + angle.sin() * 120.0;
            if let Some(i) = w.enemies.spawn(x, y, minion as u16, minion_hp, minion_speed) {
                w.grid.insert(i, x, y);
            }
        }
        log::debug!("boss summoned {minion_count} minions");
    }

    // ボス vs プレイヤー接触（通常敵と同じ無敵ウィンドウを共有する）
    let hit_r = w.player.radius + radius;
    let ddx = px - bx;
    let ddy = py - by;
    if ddx * ddx + ddy * ddy < hit_r * hit_r
        && w.player.invincible_timer <= 0.0
        && w.player.hp > 0.0
    {
        let damage = contact_dps * dt;
        w.player.hp = (w.player.hp - damage).max(0.0);
        w.player.invincible_timer = INVINCIBLE_DURATION;
        w.frame_events.push(FrameEvent::PlayerDamaged { damage });
    }

    // 弾丸 vs ボス
    let mut total_damage = 0.0_f32;
    let hit_r2 = PROJECTILE_RADIUS + radius;
    for bi in 0..w.projectiles.len() {
        if !w.projectiles.is_alive(bi) {
            continue;
        }
        let dx = w.projectiles.positions_x[bi] - bx;
        let dy = w.projectiles.positions_y[bi] - by;
        if dx * dx + dy * dy >= hit_r2 * hit_r2 {
            continue;
        }
        total_damage += w.projectiles.damage[bi];
        if w.projectiles.pierce_left[bi] > 0 {
            w.projectiles.pierce_left[bi] -= 1;
        } else {
            w.projectiles.kill(bi);
        }
    }

    let mut defeated: Option<u16> = None;
    if total_damage > 0.0 {
        if let Some(boss) = w.boss.as_mut() {
            boss.hp -= total_damage;
            if boss.hp <= 0.0 {
                defeated = Some(boss.kind as u16);
            }
        }
    }

    if let Some(boss_kind) = defeated {
        w.boss = None;
        w.kill_count += 1;
        w.score += exp_reward * 2;
        w.texts.spawn(bx, by - 20.0, exp_reward * 2, 0.8);
        w.frame_events.push(FrameEvent::BossDefeated { boss: boss_kind });
        // 宝石をばらまく
        for _ in 0..10 {
            let ox = (w.rng.next_f32() - 0.5) * 200.0;
            let oy = (w.rng.next_f32() - 0.5) * 200.0;
            w.pickups
                .spawn(bx + ox, by + oy, PickupKind::Gem, exp_reward / 10);
        }
        leveling::grant_exp(w, exp_reward);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::BossState;
    use survival_core::blueprint::{default_level, BossBlueprint};
    use survival_core::curve::Curve;

    fn boss_world() -> SimWorld {
        let mut config = default_level();
        config.spawn_rate = Curve::constant(0.0);
        config.boss_triggers.clear();
        config.starting_ability = None;
        config.bosses = vec![BossBlueprint {
            name:             "tyrant".into(),
            base_hp:          100.0,
            speed:            50.0,
            radius:           48.0,
            exp_reward:       200,
            contact_dps:      30.0,
            special_interval: 5.0,
            minion:           0,
            minion_count:     4,
        }];
        let mut w = SimWorld::new(config, 11).unwrap();
        let blueprint = w.config.bosses[0].clone();
        w.boss = Some(BossState::new(0, &blueprint, 500.0, 0.0));
        w
    }

    #[test]
    fn boss_chases_player() {
        let mut w = boss_world();
        run(&mut w, 0.1);
        let boss = w.boss.as_ref().unwrap();
        assert!(boss.x < 500.0);
    }

    #[test]
    fn special_interval_summons_minions() {
        let mut w = boss_world();
        for _ in 0..50 {
            run(&mut w, 0.1); // 5.0s で特殊行動が 1 回発火
        }
        assert_eq!(w.enemies.slots.active_count(), 4);
        assert_eq!(w.grid.len(), 4);
    }

    #[test]
    fn projectiles_defeat_boss_and_grant_rewards() {
        let mut w = boss_world();
        let (bx, by) = {
            let b = w.boss.as_ref().unwrap();
            (b.x, b.y)
        };
        w.projectiles.spawn(bx, by, 0.0, 0.0, 150.0, 1.0, 0, 0);
        run(&mut w, 0.016);

        assert!(w.boss.is_none());
        assert_eq!(w.kill_count, 1);
        assert_eq!(w.exp, 200);
        assert!(w.pickups.slots.active_count() > 0);
        assert!(w
            .frame_events
            .iter()
            .any(|e| matches!(e, FrameEvent::BossDefeated { boss: 0 })));
        // 非貫通弾はボスに当たって消える
        assert_eq!(w.projectiles.slots.active_count(), 0);
    }
}
