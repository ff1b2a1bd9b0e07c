//! Path: survival_sim/src/world/ability.rs
//! Summary: 装備中アビリティのインスタンスとステータス登録

use survival_core::blueprint::{AbilityBehavior, AbilityBlueprint};
use survival_core::stats::{StatId, StatKind, StatRegistry, StatValue};

/// アビリティが所有するアップグレード可能フィールドへのハンドル束。
/// どのフィールドを持つかは挙動タグごとに決まる。
pub struct AbilityStatIds {
    pub damage:           StatId,
    pub cooldown:         StatId,
    pub amount:           Option<StatId>,
    pub projectile_speed: Option<StatId>,
    pub range:            Option<StatId>,
    pub pierce:           Option<StatId>,
}

/// 装備中のアビリティ 1 つぶんの状態
pub struct AbilityInstance {
    /// `LevelConfig::abilities` へのインデックス
    pub blueprint:      usize,
    pub cooldown_timer: f32,
    pub ids:            AbilityStatIds,
}

impl AbilityInstance {
    /// アビリティを生成し、アップグレード可能フィールドを明示的に
    /// レジストリへ登録する。登録時点で既適用の累積デルタが反映される。
    pub fn instantiate(
        blueprint: usize,
        spec: &AbilityBlueprint,
        stats: &mut StatRegistry,
    ) -> Self {
        let damage = stats.register(StatKind::Damage, StatValue::Float(spec.base_damage));
        let cooldown = stats.register(StatKind::Cooldown, StatValue::Float(spec.base_cooldown));

        let (amount, projectile_speed, range, pierce) = match spec.behavior {
            AbilityBehavior::Bolt => (
                Some(stats.register(StatKind::Amount, StatValue::Int(spec.base_amount))),
                Some(stats.register(
                    StatKind::ProjectileSpeed,
                    StatValue::Float(spec.base_projectile_speed),
                )),
                None,
                Some(stats.register(StatKind::Pierce, StatValue::Int(spec.base_pierce))),
            ),
            AbilityBehavior::RadialBurst => (
                Some(stats.register(StatKind::Amount, StatValue::Int(spec.base_amount))),
                Some(stats.register(
                    StatKind::ProjectileSpeed,
                    StatValue::Float(spec.base_projectile_speed),
                )),
                None,
                None,
            ),
            AbilityBehavior::Aura => (
                None,
                None,
                Some(stats.register(StatKind::Range, StatValue::Float(spec.base_range))),
                None,
            ),
        };

        Self {
            blueprint,
            cooldown_timer: 0.0,
            ids: AbilityStatIds {
                damage,
                cooldown,
                amount,
                projectile_speed,
                range,
                pierce,
            },
        }
    }
}
