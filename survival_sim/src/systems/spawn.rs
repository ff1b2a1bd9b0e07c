//! Path: survival_sim/src/systems/spawn.rs
//! Summary: スポーンスケジューラ（レートカーブの残差累積・重み付き抽選・HP スケーリング・ボストリガー）

use survival_core::blueprint::LevelConfig;
use survival_core::util::{spawn_ring_position, spawn_ring_radius};

use crate::world::{BossState, SimWorld};

/// スポーンスケジューラの状態。
///
/// レートカーブの値 × dt を端数カウンタに積み、1.0 を超えたぶんだけ
/// スポーンする。端数は捨てないので、ステップ幅がどう揺れても
/// 長期平均のスポーン数はカーブの積分に一致する。
pub struct SpawnScheduler {
    accumulator: f32,
    /// トリガーごとの発火済みフラグ（各トリガーは高々 1 回）
    boss_fired: Vec<bool>,
    /// 成立したスポーン数（診断・テスト用）
    pub spawned: u64,
    /// 適格ブループリント不在でスキップした回数
    pub skipped: u64,
}

impl SpawnScheduler {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            accumulator: 0.0,
            boss_fired:  vec![false; config.boss_triggers.len()],
            spawned:     0,
            skipped:     0,
        }
    }
}

/// HP 倍率カーブのサンプル。0 以下はコンテンツ上の誤りとして 1.0 に落とす。
pub(crate) fn sampled_hp_multiplier(config: &LevelConfig, time_fraction: f32) -> f32 {
    let m = config.hp_multiplier.sample(time_fraction);
    if m <= 0.0 {
        log::warn!("hp multiplier {m} out of range at t={time_fraction:.2}; using 1.0");
        1.0
    } else {
        m
    }
}

/// 絶対経過時間ベースのボストリガー。通常スポーンの累積カウンタとは独立で、
/// `>=` 比較なのでティックがトリガー時刻を跳び越えても必ず一度だけ発火する。
pub(crate) fn update_boss_triggers(w: &mut SimWorld) {
    for i in 0..w.config.boss_triggers.len() {
        if w.spawner.boss_fired[i] {
            continue;
        }
        let trigger = w.config.boss_triggers[i];
        if w.elapsed < trigger.at_seconds {
            continue;
        }
        // 先のボスが生存中なら発火を次ティックへ持ち越す
        if w.boss.is_some() {
            continue;
        }
        w.spawner.boss_fired[i] = true;
        let ring = spawn_ring_radius();
        let (x, y) = spawn_ring_position(&mut w.rng, w.player.x, w.player.y, ring);
        let blueprint = &w.config.bosses[trigger.boss];
        log::info!("boss '{}' spawned at t={:.1}s", blueprint.name, w.elapsed);
        let state = BossState::new(trigger.boss, blueprint, x, y);
        w.boss = Some(state);
    }
}

/// 毎ティックのスポーン処理
pub(crate) fn run(w: &mut SimWorld, dt: f32) {
    let tf = w.config.time_fraction(w.elapsed);
    let rate = w.config.spawn_rate.sample(tf).max(0.0);
    w.spawner.accumulator += rate * dt;
    if w.spawner.accumulator < 1.0 {
        return;
    }

    let hp_mul = sampled_hp_multiplier(&w.config, tf);
    let ring = spawn_ring_radius();

    while w.spawner.accumulator >= 1.0 {
        w.spawner.accumulator -= 1.0;
        let Some(kind) = pick_blueprint(w, tf) else {
            w.spawner.skipped += 1;
            log::debug!("no eligible spawn blueprint at t={tf:.2}; skipping");
            continue;
        };
        let (x, y) = spawn_ring_position(&mut w.rng, w.player.x, w.player.y, ring);
        let (hp, speed) = {
            let bp = &w.config.enemies[kind];
            (bp.base_hp * hp_mul, bp.speed)
        };
        // キャップ超過のドロップはプール側が数える
        if let Some(i) = w.enemies.spawn(x, y, kind as u16, hp, speed) {
            w.grid.insert(i, x, y);
            w.spawner.spawned += 1;
        }
    }
}

/// 時間割合ウィンドウ内のブループリントから、重みカーブの現在値を
/// 正規化した分布で 1 つ引く。適格なものがなければ None。
fn pick_blueprint(w: &mut SimWorld, tf: f32) -> Option<usize> {
    let mut indices: Vec<usize> = Vec::new();
    let mut weights: Vec<f32> = Vec::new();
    for entry in &w.config.spawn_entries {
        if !entry.window_contains(tf) {
            continue;
        }
        let weight = entry.weight.sample(tf);
        if weight > 0.0 {
            indices.push(entry.enemy);
            weights.push(weight);
        }
    }
    let picked = w.rng.pick_weighted(&weights)?;
    Some(indices[picked])
}
