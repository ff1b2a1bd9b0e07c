//! Path: survival_sim/src/tick.rs
//! Summary: ティックオーケストレータ（固定順でシステムを回す）
//!
//! 1 ティックの処理順:
//!   1. 経過時間の更新とボストリガー
//!   2. スポーンスケジューラ
//!   3. 挙動評価（プレイヤー移動・Chase AI・分離）と空間グリッドへのコミット
//!   4. アビリティ発動と弾丸移動
//!   5. 衝突解決（弾丸 vs 敵、敵/ボス vs プレイヤー）
//!   6. ピックアップ収集・テキスト回収
//!   7. セッションフェーズの判定（時間切れ / プレイヤー死亡）
//!
//! スポーンされたエンティティは生成と同時にインデックスへ登録されるので、
//! 同一ティック内のクエリと衝突に最初から参加する。フェーズ判定を
//! ティック末尾に置くことで、制限時間ちょうどまでのスポーンが
//! 欠けずに成立する。

use std::time::Instant;

use survival_core::constants::TICK_BUDGET_MS;

use crate::systems::{abilities, behavior, boss, collision, pickups, projectiles, spawn};
use crate::world::{SessionOutcome, SimWorld};

/// ワールドを 1 ステップ進める。`input` は移動意図ベクトル
/// （単位長へのクランプ以外は検証しない）。
pub fn step(w: &mut SimWorld, dt: f32, input: (f32, f32)) {
    if !w.is_running() {
        return;
    }
    // trace にしておき、RUST_LOG=trace のときだけ毎ティック出力する
    log::trace!("tick: dt={:.4}s elapsed={:.2}s", dt, w.elapsed);
    let t_start = Instant::now();

    w.player.input_dx = input.0;
    w.player.input_dy = input.1;

    w.elapsed += dt;
    spawn::update_boss_triggers(w);

    spawn::run(w, dt);
    behavior::run(w, dt);
    abilities::run(w, dt);
    projectiles::run(w, dt);
    collision::run(w, dt);
    boss::run(w, dt);
    pickups::run(w, dt);
    w.texts.update(dt);

    if w.player.hp <= 0.0 {
        w.end_session(SessionOutcome::Defeat);
    } else if w.elapsed >= w.config.duration {
        w.end_session(SessionOutcome::Victory);
    }

    let elapsed_ms = t_start.elapsed().as_secs_f64() * 1000.0;
    w.last_tick_ms = elapsed_ms;
    if elapsed_ms > TICK_BUDGET_MS {
        log::warn!(
            "tick budget exceeded: {:.2}ms ({} enemies)",
            elapsed_ms,
            w.enemies.slots.active_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::leveling;
    use crate::world::SessionPhase;
    use survival_core::blueprint::{
        default_level, EnemyBlueprint, LevelConfig, PlayerBlueprint, SpawnEntry,
    };
    use survival_core::constants::SPAWN_OFFSCREEN_BUFFER;
    use survival_core::curve::Curve;

    /// 定数レートのみの素のレベル設定
    fn flat_config(rate: f32, duration: f32) -> LevelConfig {
        LevelConfig {
            duration,
            player: PlayerBlueprint { max_hp: 100.0, speed: 200.0, radius: 32.0 },
            enemies: vec![EnemyBlueprint {
                name:        "drone".into(),
                base_hp:     30.0,
                speed:       0.0,
                radius:      20.0,
                exp_reward:  5,
                contact_dps: 0.0,
            }],
            spawn_entries: vec![SpawnEntry {
                enemy:  0,
                window: (0.0, 1.0),
                weight: Curve::constant(1.0),
            }],
            spawn_rate:       Curve::constant(rate),
            hp_multiplier:    Curve::constant(1.0),
            bosses:           Vec::new(),
            boss_triggers:    Vec::new(),
            abilities:        Vec::new(),
            upgrades:         Vec::new(),
            starting_ability: None,
            enemy_cap:        None,
            warm_enemies:     0,
            warm_projectiles: 0,
        }
    }

    #[test]
    fn constant_rate_session_spawns_exact_count_off_screen() {
        // 2 体/秒 × 10 秒 → ちょうど 20 体、全てバッファより外側
        let mut w = SimWorld::new(flat_config(2.0, 10.0), 9).unwrap();
        for _ in 0..40 {
            step(&mut w, 0.25, (0.0, 0.0));
        }
        assert_eq!(w.spawner.spawned, 20);
        assert_eq!(w.phase, SessionPhase::Ended(crate::world::SessionOutcome::Victory));
        for i in w.enemies.slots.iter_alive() {
            let dx = w.enemies.positions_x[i] - w.player.x;
            let dy = w.enemies.positions_y[i] - w.player.y;
            let dist = (dx * dx + dy * dy).sqrt();
            assert!(dist >= SPAWN_OFFSCREEN_BUFFER);
        }
    }

    #[test]
    fn spawned_entities_are_indexed_the_same_tick() {
        let mut w = SimWorld::new(flat_config(4.0, 100.0), 9).unwrap();
        step(&mut w, 1.0, (0.0, 0.0));
        assert_eq!(w.spawner.spawned, 4);
        assert_eq!(w.grid.len(), 4);
    }

    #[test]
    fn session_ends_in_defeat_when_hp_reaches_zero() {
        let mut w = SimWorld::new(flat_config(0.0, 100.0), 9).unwrap();
        w.player.hp = 0.0;
        step(&mut w, 0.016, (0.0, 0.0));
        assert_eq!(w.phase, SessionPhase::Ended(SessionOutcome::Defeat));
        // 終了後のステップは no-op
        let elapsed = w.elapsed;
        step(&mut w, 0.016, (0.0, 0.0));
        assert_eq!(w.elapsed, elapsed);
    }

    #[test]
    fn moving_enemy_stays_queryable_where_it_is() {
        let mut w = SimWorld::new(flat_config(0.0, 100.0), 9).unwrap();
        let ei = w.enemies.spawn(600.0, 0.0, 0, 30.0, 100.0).unwrap();
        w.enemies.speeds[ei] = 100.0;
        w.grid.insert(ei, 600.0, 0.0);
        // 数秒分追跡させ、グリッドが常に実位置を返すことを確かめる
        for _ in 0..120 {
            step(&mut w, 0.05, (0.0, 0.0));
            let (x, y) = (w.enemies.positions_x[ei], w.enemies.positions_y[ei]);
            let hits = w.grid.query_radius(x, y, 1.0);
            assert!(hits.contains(&ei));
        }
        // プレイヤーへ近づいている
        assert!(w.enemies.positions_x[ei] < 600.0);
    }

    #[test]
    fn full_default_session_runs_to_completion() {
        let mut config = default_level();
        config.duration = 40.0;
        config.boss_triggers[0].at_seconds = 15.0;
        let mut w = SimWorld::new(config, 0xC0FFEE).unwrap();

        let dt = 1.0 / 60.0;
        let mut t = 0.0_f32;
        let mut ticks = 0_u64;
        while w.is_running() && ticks < 60 * 60 {
            let angle = t * 0.25;
            step(&mut w, dt, (angle.cos(), angle.sin()));
            t += dt;
            ticks += 1;
            if w.level_up_pending {
                assert!(leveling::apply_choice(&mut w, 0));
            }
            if ticks % 120 == 0 {
                // 生存中の敵とグリッド登録数は常に一致する
                assert_eq!(w.enemies.slots.active_count(), w.grid.len());
            }
            w.frame_events.clear();
        }

        assert!(!w.is_running());
        assert!(w.spawner.spawned > 0);
        assert!(w.kill_count > 0);
        assert!(w.level > 1);
        assert_eq!(w.enemies.slots.active_count(), w.grid.len());
    }
}
