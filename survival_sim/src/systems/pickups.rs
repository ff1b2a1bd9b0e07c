//! Path: survival_sim/src/systems/pickups.rs
//! Summary: ピックアップの磁石吸引と収集

use survival_core::constants::{MAGNET_DURATION, MAGNET_PULL_SPEED, PICKUP_COLLECT_RADIUS};

use crate::world::{FrameEvent, PickupKind, SimWorld};

pub(crate) fn run(w: &mut SimWorld, dt: f32) {
    if w.magnet_timer > 0.0 {
        w.magnet_timer = (w.magnet_timer - dt).max(0.0);
    }

    let px = w.player.x;
    let py = w.player.y;

    // 磁石エフェクト中は宝石がプレイヤーへ飛んでくる
    if w.magnet_timer > 0.0 {
        for i in 0..w.pickups.len() {
            if !w.pickups.is_alive(i) || w.pickups.kinds[i] != PickupKind::Gem {
                continue;
            }
            let dx = px - w.pickups.positions_x[i];
            let dy = py - w.pickups.positions_y[i];
            let dist = (dx * dx + dy * dy).sqrt().max(1.0);
            w.pickups.positions_x[i] += (dx / dist) * MAGNET_PULL_SPEED * dt;
            w.pickups.positions_y[i] += (dy / dist) * MAGNET_PULL_SPEED * dt;
        }
    }

    // 収集判定（通常は収集半径、磁石中は距離無制限）
    let collect_r_sq = if w.magnet_timer > 0.0 {
        f32::INFINITY
    } else {
        PICKUP_COLLECT_RADIUS * PICKUP_COLLECT_RADIUS
    };
    for i in 0..w.pickups.len() {
        if !w.pickups.is_alive(i) {
            continue;
        }
        let dx = px - w.pickups.positions_x[i];
        let dy = py - w.pickups.positions_y[i];
        if dx * dx + dy * dy > collect_r_sq {
            continue;
        }
        let kind = w.pickups.kinds[i];
        match kind {
            PickupKind::Gem => {
                // EXP は撃破時に加算済み。宝石はスコアボーナスのみ
                w.score += w.pickups.value[i];
            }
            PickupKind::Potion => {
                w.player.hp = (w.player.hp + w.pickups.value[i] as f32).min(w.player.max_hp);
            }
            PickupKind::Magnet => {
                w.magnet_timer = MAGNET_DURATION;
            }
        }
        w.frame_events.push(FrameEvent::PickupCollected { kind });
        w.pickups.kill(i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survival_core::blueprint::default_level;
    use survival_core::curve::Curve;

    fn quiet_world() -> SimWorld {
        let mut config = default_level();
        config.spawn_rate = Curve::constant(0.0);
        config.boss_triggers.clear();
        config.starting_ability = None;
        SimWorld::new(config, 3).unwrap()
    }

    #[test]
    fn nearby_gem_is_collected_for_score() {
        let mut w = quiet_world();
        w.pickups.spawn(10.0, 0.0, PickupKind::Gem, 15);
        run(&mut w, 0.016);
        assert_eq!(w.score, 15);
        assert_eq!(w.pickups.slots.active_count(), 0);
    }

    #[test]
    fn potion_heals_up_to_max() {
        let mut w = quiet_world();
        w.player.hp = 95.0;
        w.pickups.spawn(0.0, 0.0, PickupKind::Potion, 20);
        run(&mut w, 0.016);
        assert_eq!(w.player.hp, w.player.max_hp);
    }

    #[test]
    fn magnet_pulls_distant_gems_in() {
        let mut w = quiet_world();
        w.pickups.spawn(0.0, 0.0, PickupKind::Magnet, 0);
        w.pickups.spawn(400.0, 0.0, PickupKind::Gem, 5);
        run(&mut w, 0.016);
        assert!(w.magnet_timer > 0.0);
        // 磁石中は距離無制限で収集される
        run(&mut w, 0.016);
        assert_eq!(w.score, 5);
        assert_eq!(w.pickups.slots.active_count(), 0);
    }

    #[test]
    fn far_pickup_stays_without_magnet() {
        let mut w = quiet_world();
        w.pickups.spawn(400.0, 0.0, PickupKind::Gem, 5);
        run(&mut w, 0.016);
        assert_eq!(w.score, 0);
        assert_eq!(w.pickups.slots.active_count(), 1);
    }
}
