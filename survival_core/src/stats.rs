//! Path: survival_core/src/stats.rs
//! Summary: ステータスレジストリとアップグレード伝播（kind 単位の一括デルタ適用）

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// アップグレード対象となるステータスの種別。
/// 同じ kind のインスタンスは複数のアビリティにまたがって存在する
/// （すべての武器がそれぞれ Damage を持つ、など）。
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Damage          = 0,
    Cooldown        = 1,
    ProjectileSpeed = 2,
    Range           = 3,
    Amount          = 4,
    Pierce          = 5,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DeltaMode {
    /// value += delta
    Additive,
    /// value *= (1 + delta)
    Relative,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StatValue {
    Float(f32),
    Int(i32),
}

/// 登録済みステータスへのハンドル。所有アビリティだけが保持し、
/// 値の読み出しに使う。登録後は kind 経由の一括操作でのみ変化する。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatId {
    kind: StatKind,
    slot: u32,
}

impl StatId {
    pub fn kind(&self) -> StatKind {
        self.kind
    }
}

/// kind ごとの累積デルタ。後から登録されるインスタンスに
/// 既適用分を一度だけ反映するために保持する。
#[derive(Clone, Copy, Debug)]
struct CumulativeDelta {
    add:    f32,
    factor: f32,
}

impl CumulativeDelta {
    const IDENTITY: Self = Self { add: 0.0, factor: 1.0 };
}

/// kind -> 登録インスタンス列のレジストリ。
///
/// 値はレジストリが所有し、アビリティは `StatId` 経由で読むだけなので、
/// アップグレード UI はどのアビリティが存在するかを知らずに
/// `apply_delta` 一発で全インスタンスへ伝播できる。
pub struct StatRegistry {
    /// 登録順を保つ。脱退はトゥームストーン（None）で表す
    values:  FxHashMap<StatKind, Vec<Option<StatValue>>>,
    applied: FxHashMap<StatKind, CumulativeDelta>,
}

impl Default for StatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StatRegistry {
    pub fn new() -> Self {
        Self {
            values:  FxHashMap::default(),
            applied: FxHashMap::default(),
        }
    }

    /// アビリティ生成時に、そのアビリティが持つアップグレード可能
    /// フィールドを 1 つ登録する。既に適用済みの累積デルタを
    /// `(base + add) * factor` として一度だけ反映するので、後付けの
    /// アビリティも既存のものと同じだけ強化された状態で始まる。
    pub fn register(&mut self, kind: StatKind, base: StatValue) -> StatId {
        let cum = self
            .applied
            .get(&kind)
            .copied()
            .unwrap_or(CumulativeDelta::IDENTITY);
        let adjusted = match base {
            StatValue::Float(v) => StatValue::Float((v + cum.add) * cum.factor),
            StatValue::Int(v) => {
                StatValue::Int(((v as f32 + cum.add) * cum.factor).round() as i32)
            }
        };
        let list = self.values.entry(kind).or_default();
        list.push(Some(adjusted));
        StatId {
            kind,
            slot: (list.len() - 1) as u32,
        }
    }

    /// 所有アビリティが恒久的に取り除かれるときだけ呼ぶ（まれ）。
    pub fn deregister(&mut self, id: StatId) {
        let slot = self
            .values
            .get_mut(&id.kind)
            .and_then(|list| list.get_mut(id.slot as usize));
        match slot {
            Some(value) if value.is_some() => *value = None,
            _ => log::error!("deregister of unknown stat {:?}", id),
        }
    }

    /// 指定 kind の全登録インスタンスに登録順でデルタを適用する。
    /// レベルアップ選択イベントでのみ呼ばれる（毎ティックではない）。
    /// 適用できたインスタンス数を返す。0 件への適用はライフサイクル違反
    /// として報告するが、累積値には記録するので以後の登録には反映される。
    pub fn apply_delta(&mut self, kind: StatKind, delta: f32, mode: DeltaMode) -> usize {
        let cum = self
            .applied
            .entry(kind)
            .or_insert(CumulativeDelta::IDENTITY);
        match mode {
            DeltaMode::Additive => cum.add += delta,
            DeltaMode::Relative => cum.factor *= 1.0 + delta,
        }

        let mut affected = 0;
        if let Some(list) = self.values.get_mut(&kind) {
            for value in list.iter_mut().flatten() {
                *value = apply_value(*value, delta, mode);
                affected += 1;
            }
        }
        if affected == 0 {
            log::error!("apply_delta on {:?} with no registered instances", kind);
        }
        affected
    }

    /// 生きている登録インスタンス数（アップグレード候補の適格性判定用）
    pub fn registered_count(&self, kind: StatKind) -> usize {
        self.values
            .get(&kind)
            .map(|list| list.iter().flatten().count())
            .unwrap_or(0)
    }

    fn get(&self, id: StatId) -> Option<StatValue> {
        self.values
            .get(&id.kind)
            .and_then(|list| list.get(id.slot as usize))
            .copied()
            .flatten()
    }

    pub fn float(&self, id: StatId) -> f32 {
        match self.get(id) {
            Some(StatValue::Float(v)) => v,
            Some(StatValue::Int(v)) => v as f32,
            None => {
                log::error!("read of unregistered stat {:?}", id);
                0.0
            }
        }
    }

    pub fn int(&self, id: StatId) -> i32 {
        match self.get(id) {
            Some(StatValue::Int(v)) => v,
            Some(StatValue::Float(v)) => v.round() as i32,
            None => {
                log::error!("read of unregistered stat {:?}", id);
                0
            }
        }
    }
}

fn apply_value(value: StatValue, delta: f32, mode: DeltaMode) -> StatValue {
    match (value, mode) {
        (StatValue::Float(v), DeltaMode::Additive) => StatValue::Float(v + delta),
        (StatValue::Float(v), DeltaMode::Relative) => StatValue::Float(v * (1.0 + delta)),
        // Int は適用のたびに最近接へ丸める
        (StatValue::Int(v), DeltaMode::Additive) => {
            StatValue::Int((v as f32 + delta).round() as i32)
        }
        (StatValue::Int(v), DeltaMode::Relative) => {
            StatValue::Int((v as f32 * (1.0 + delta)).round() as i32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_damage_compounds() {
        let mut reg = StatRegistry::new();
        let dmg = reg.register(StatKind::Damage, StatValue::Float(10.0));
        assert_eq!(reg.apply_delta(StatKind::Damage, 0.1, DeltaMode::Relative), 1);
        assert!((reg.float(dmg) - 11.0).abs() < 1e-4);
        reg.apply_delta(StatKind::Damage, 0.1, DeltaMode::Relative);
        assert!((reg.float(dmg) - 12.1).abs() < 1e-4);
    }

    #[test]
    fn deltas_apply_in_call_order_to_every_instance_of_kind() {
        let mut reg = StatRegistry::new();
        let a = reg.register(StatKind::Damage, StatValue::Float(10.0));
        let b = reg.register(StatKind::Damage, StatValue::Float(20.0));
        reg.apply_delta(StatKind::Damage, 5.0, DeltaMode::Additive);
        reg.apply_delta(StatKind::Damage, 1.0, DeltaMode::Relative);
        assert!((reg.float(a) - 30.0).abs() < 1e-4);
        assert!((reg.float(b) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn other_kinds_are_unaffected() {
        let mut reg = StatRegistry::new();
        let dmg = reg.register(StatKind::Damage, StatValue::Float(10.0));
        let cd = reg.register(StatKind::Cooldown, StatValue::Float(1.0));
        reg.apply_delta(StatKind::Damage, 0.5, DeltaMode::Relative);
        assert!((reg.float(dmg) - 15.0).abs() < 1e-4);
        assert!((reg.float(cd) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn late_registration_receives_cumulative_deltas() {
        let mut reg = StatRegistry::new();
        let _early = reg.register(StatKind::Damage, StatValue::Float(10.0));
        reg.apply_delta(StatKind::Damage, 0.1, DeltaMode::Relative);
        // 後付けアビリティは既適用分込みで始まる
        let late = reg.register(StatKind::Damage, StatValue::Float(10.0));
        assert!((reg.float(late) - 11.0).abs() < 1e-4);
    }

    #[test]
    fn delta_without_instances_is_recorded_for_later_registration() {
        let mut reg = StatRegistry::new();
        assert_eq!(reg.apply_delta(StatKind::Pierce, 1.0, DeltaMode::Additive), 0);
        let pierce = reg.register(StatKind::Pierce, StatValue::Int(0));
        assert_eq!(reg.int(pierce), 1);
    }

    #[test]
    fn int_stats_round_to_nearest() {
        let mut reg = StatRegistry::new();
        let amount = reg.register(StatKind::Amount, StatValue::Int(2));
        reg.apply_delta(StatKind::Amount, 0.3, DeltaMode::Relative); // 2.6 -> 3
        assert_eq!(reg.int(amount), 3);
        reg.apply_delta(StatKind::Amount, 1.0, DeltaMode::Additive);
        assert_eq!(reg.int(amount), 4);
    }

    #[test]
    fn deregistered_stat_stops_updating() {
        let mut reg = StatRegistry::new();
        let a = reg.register(StatKind::Damage, StatValue::Float(10.0));
        let b = reg.register(StatKind::Damage, StatValue::Float(10.0));
        reg.deregister(a);
        assert_eq!(reg.registered_count(StatKind::Damage), 1);
        assert_eq!(reg.apply_delta(StatKind::Damage, 1.0, DeltaMode::Additive), 1);
        assert!((reg.float(b) - 11.0).abs() < 1e-4);
    }
}
