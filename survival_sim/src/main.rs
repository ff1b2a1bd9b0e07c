//! Path: survival_sim/src/main.rs
//! Summary: ヘッドレスデモ（ホストなしでセッションを 1 回走らせて結果を表示する）

use survival_core::blueprint::default_level;
use survival_sim::systems::leveling;
use survival_sim::{tick, SimWorld};

fn main() {
    env_logger::init();

    let config = default_level();
    let mut world = SimWorld::new(config, 0xC0FFEE).expect("default config is valid");

    let dt = 1.0_f32 / 60.0;
    let mut t = 0.0_f32;
    let mut next_report = 30.0_f32;

    while world.is_running() {
        // ゆっくり旋回する移動入力で無限マップを歩かせる
        let angle = t * 0.25;
        tick::step(&mut world, dt, (angle.cos(), angle.sin()));
        t += dt;

        if world.level_up_pending {
            // デモでは先頭の選択肢をそのまま取る
            log::info!("level up -> {}", leveling::choice_label(&world, 0));
            leveling::apply_choice(&mut world, 0);
        }
        for event in world.drain_events() {
            log::debug!("{event:?}");
        }

        if world.elapsed >= next_report {
            next_report += 30.0;
            log::info!(
                "t={:.0}s level={} enemies={} kills={} score={}",
                world.elapsed,
                world.level,
                world.enemies.slots.active_count(),
                world.kill_count,
                world.score
            );
        }
    }

    println!("phase:   {:?}", world.phase);
    println!(
        "elapsed: {:.1}s  level: {}  kills: {}  score: {}",
        world.elapsed, world.level, world.kill_count, world.score
    );
    println!(
        "spawned: {}  skipped: {}  dropped: {}",
        world.spawner.spawned,
        world.spawner.skipped,
        world.enemies.slots.dropped_count()
    );
}
