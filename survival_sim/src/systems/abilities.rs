//! Path: survival_sim/src/systems/abilities.rs
//! Summary: アビリティ発動（Bolt / RadialBurst / Aura）とターゲット探索

use survival_core::blueprint::AbilityBehavior;
use survival_core::constants::{MIN_COOLDOWN, TARGET_SEARCH_RADIUS};

use super::on_enemy_killed;
use crate::world::SimWorld;

/// アビリティのクールダウンを進め、撃てるものを発動する。
/// レベルアップ選択待ちの間は攻撃を止める（移動と収集は続く）。
pub(crate) fn run(w: &mut SimWorld, dt: f32) {
    if w.level_up_pending {
        return;
    }
    let px = w.player.x;
    let py = w.player.y;

    for si in 0..w.abilities.len() {
        w.abilities[si].cooldown_timer = (w.abilities[si].cooldown_timer - dt).max(0.0);
        if w.abilities[si].cooldown_timer > 0.0 {
            continue;
        }

        let behavior = w.config.abilities[w.abilities[si].blueprint].behavior;
        let damage = w.stats.float(w.abilities[si].ids.damage);
        let cooldown = w.stats.float(w.abilities[si].ids.cooldown).max(MIN_COOLDOWN);

        match behavior {
            AbilityBehavior::Bolt => fire_bolt(w, si, px, py, damage, cooldown),
            AbilityBehavior::RadialBurst => fire_radial_burst(w, si, px, py, damage, cooldown),
            AbilityBehavior::Aura => fire_aura(w, si, px, py, damage, cooldown),
        }
    }
}

/// グリッドで候補を絞った最近接探索。半径内に候補がいなければ
/// 全走査にフォールバックする。
fn find_nearest_enemy(w: &mut SimWorld, x: f32, y: f32, radius: f32) -> Option<usize> {
    let mut buf = std::mem::take(&mut w.query_buf);
    w.grid.query_radius_into(x, y, radius, &mut buf);

    let mut best = None;
    let mut best_d = f32::MAX;
    for &i in &buf {
        if !w.enemies.is_alive(i) {
            continue;
        }
        let dx = w.enemies.positions_x[i] - x;
        let dy = w.enemies.positions_y[i] - y;
        let d = dx * dx + dy * dy;
        if d < best_d {
            best_d = d;
            best = Some(i);
        }
    }
    if best.is_none() {
        for i in 0..w.enemies.len() {
            if !w.enemies.is_alive(i) {
                continue;
            }
            let dx = w.enemies.positions_x[i] - x;
            let dy = w.enemies.positions_y[i] - y;
            let d = dx * dx + dy * dy;
            if d < best_d {
                best_d = d;
                best = Some(i);
            }
        }
    }
    w.query_buf = buf;
    best
}

/// 最近接の敵に向けて扇状に弾を発射する。
/// ターゲット不在ならクールダウンを消費せず次ティックに再試行する。
fn fire_bolt(w: &mut SimWorld, si: usize, px: f32, py: f32, damage: f32, cooldown: f32) {
    let (amount, speed, pierce) = {
        let ids = &w.abilities[si].ids;
        (
            ids.amount.map(|id| w.stats.int(id)).unwrap_or(1).max(1),
            ids.projectile_speed.map(|id| w.stats.float(id)).unwrap_or(0.0),
            ids.pierce.map(|id| w.stats.int(id)).unwrap_or(0).max(0),
        )
    };
    let lifetime = w.config.abilities[w.abilities[si].blueprint].projectile_lifetime;

    let Some(target) = find_nearest_enemy(w, px, py, TARGET_SEARCH_RADIUS) else {
        return;
    };
    let tx = w.enemies.positions_x[target];
    let ty = w.enemies.positions_y[target];
    let base_angle = (ty - py).atan2(tx - px);
    // 複数発は少しずつ角度をずらして扇状に発射
    let spread = std::f32::consts::PI * 0.08;
    let half = (amount as f32 - 1.0) / 2.0;
    let ability_id = w.abilities[si].blueprint as u16;

    for bi in 0..amount {
        let angle = base_angle + (bi as f32 - half) * spread;
        w.projectiles.spawn(
            px,
            py,
            angle.cos() * speed,
            angle.sin() * speed,
            damage,
            lifetime,
            pierce,
            ability_id,
        );
    }
    w.abilities[si].cooldown_timer = cooldown;
}

/// 全方位へ等間隔に弾をばらまく
fn fire_radial_burst(w: &mut SimWorld, si: usize, px: f32, py: f32, damage: f32, cooldown: f32) {
    let (amount, speed) = {
        let ids = &w.abilities[si].ids;
        (
            ids.amount.map(|id| w.stats.int(id)).unwrap_or(1).max(1),
            ids.projectile_speed.map(|id| w.stats.float(id)).unwrap_or(0.0),
        )
    };
    let lifetime = w.config.abilities[w.abilities[si].blueprint].projectile_lifetime;
    let ability_id = w.abilities[si].blueprint as u16;

    for bi in 0..amount {
        let angle = bi as f32 * std::f32::consts::TAU / amount as f32;
        w.projectiles.spawn(
            px,
            py,
            angle.cos() * speed,
            angle.sin() * speed,
            damage,
            lifetime,
            0,
            ability_id,
        );
    }
    w.abilities[si].cooldown_timer = cooldown;
}

/// プレイヤー周囲のオーラで範囲内の敵全員にパルスダメージ
fn fire_aura(w: &mut SimWorld, si: usize, px: f32, py: f32, damage: f32, cooldown: f32) {
    let range = w.abilities[si]
        .ids
        .range
        .map(|id| w.stats.float(id))
        .unwrap_or(0.0);
    let ability_id = w.abilities[si].blueprint as u16;
    if range > 0.0 {
        let range_sq = range * range;
        let mut buf = std::mem::take(&mut w.query_buf);
        w.grid.query_radius_into(px, py, range, &mut buf);
        for k in 0..buf.len() {
            let ei = buf[k];
            if !w.enemies.is_alive(ei) {
                continue;
            }
            let dx = w.enemies.positions_x[ei] - px;
            let dy = w.enemies.positions_y[ei] - py;
            // セル粒度のスーパーセットなので正確な距離で絞る
            if dx * dx + dy * dy > range_sq {
                continue;
            }
            w.enemies.hp[ei] -= damage;
            if w.enemies.hp[ei] <= 0.0 {
                on_enemy_killed(w, ei, ability_id);
            }
        }
        w.query_buf = buf;
    }
    w.abilities[si].cooldown_timer = cooldown;
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_core::blueprint::default_level;
    use survival_core::curve::Curve;

    fn quiet_world() -> SimWorld {
        // 自動スポーンを止めた上でアビリティだけ検証する
        let mut config = default_level();
        config.spawn_rate = Curve::constant(0.0);
        config.boss_triggers.clear();
        SimWorld::new(config, 5).unwrap()
    }

    #[test]
    fn bolt_holds_fire_without_target() {
        let mut w = quiet_world();
        run(&mut w, 0.1);
        assert_eq!(w.projectiles.slots.active_count(), 0);
        // ターゲット不在ではクールダウンに入らない
        assert_eq!(w.abilities[0].cooldown_timer, 0.0);
    }

    #[test]
    fn bolt_fires_at_nearest_enemy() {
        let mut w = quiet_world();
        let near = w.enemies.spawn(100.0, 0.0, 0, 30.0, 0.0).unwrap();
        w.grid.insert(near, 100.0, 0.0);
        let far = w.enemies.spawn(300.0, 0.0, 0, 30.0, 0.0).unwrap();
        w.grid.insert(far, 300.0, 0.0);

        run(&mut w, 0.1);
        assert_eq!(w.projectiles.slots.active_count(), 1);
        assert!(w.abilities[0].cooldown_timer > 0.0);
        // 最近接（+x 方向）に向かって飛ぶ
        let i = w.projectiles.slots.iter_alive().next().unwrap();
        assert!(w.projectiles.velocities_x[i] > 0.0);
        assert!(w.projectiles.velocities_y[i].abs() < 1.0);
    }

    #[test]
    fn level_up_pending_pauses_attacks() {
        let mut w = quiet_world();
        let e = w.enemies.spawn(100.0, 0.0, 0, 30.0, 0.0).unwrap();
        w.grid.insert(e, 100.0, 0.0);
        w.level_up_pending = true;
        run(&mut w, 0.1);
        assert_eq!(w.projectiles.slots.active_count(), 0);
    }

    #[test]
    fn aura_damages_only_inside_exact_range() {
        let mut w = quiet_world();
        // Aura を直接装備する
        crate::systems::leveling::add_ability(&mut w, 2);
        let inside = w.enemies.spawn(50.0, 0.0, 0, 30.0, 0.0).unwrap();
        w.grid.insert(inside, 50.0, 0.0);
        // グリッド footprint 内だが正確な半径の外
        let outside = w.enemies.spawn(140.0, 0.0, 0, 30.0, 0.0).unwrap();
        w.grid.insert(outside, 140.0, 0.0);

        // Bolt は敵を倒さないよう取り外す
        w.abilities.retain(|a| a.blueprint == 2);
        run(&mut w, 0.1);

        assert!(w.enemies.hp[inside] < 30.0);
        assert_eq!(w.enemies.hp[outside], 30.0);
    }
}
