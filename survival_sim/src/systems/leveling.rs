//! Path: survival_sim/src/systems/leveling.rs
//! Summary: 経験値・レベルアップ選択肢の提案と適用

use survival_core::blueprint::Prerequisite;
use survival_core::constants::{MAX_ABILITY_SLOTS, UPGRADE_CHOICE_COUNT};
use survival_core::util::exp_required_for_next;

use crate::world::{AbilityInstance, FrameEvent, SimWorld};

/// レベルアップ時にホストへ提示する選択肢。
/// どちらも `LevelConfig` のテーブルへのインデックス。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeChoice {
    /// 新しいアビリティを装備する
    Ability(usize),
    /// アップグレードカタログの 1 項目を全インスタンスへ適用する
    Upgrade(usize),
}

pub(crate) fn grant_exp(w: &mut SimWorld, amount: u32) {
    w.exp += amount;
    check_level_up(w);
}

fn prerequisite_met(w: &SimWorld, prerequisite: Option<Prerequisite>) -> bool {
    match prerequisite {
        None => true,
        // 到達しようとしているレベルで判定する
        Some(Prerequisite::MinLevel(level)) => w.level + 1 >= level,
        Some(Prerequisite::Requires(target)) => {
            w.abilities.iter().any(|a| a.blueprint == target)
        }
    }
}

/// 適格な候補（未所持アビリティ + 登録インスタンスのあるアップグレード）から
/// 重み付き非復元抽出で最大 `UPGRADE_CHOICE_COUNT` 件を選ぶ。
fn propose_choices(w: &mut SimWorld) -> Vec<UpgradeChoice> {
    let mut candidates: Vec<UpgradeChoice> = Vec::new();
    let mut weights: Vec<f32> = Vec::new();

    let slots_free = w.abilities.len() < MAX_ABILITY_SLOTS;
    for i in 0..w.config.abilities.len() {
        if !slots_free || w.abilities.iter().any(|a| a.blueprint == i) {
            continue;
        }
        if !prerequisite_met(w, w.config.abilities[i].prerequisite) {
            continue;
        }
        candidates.push(UpgradeChoice::Ability(i));
        weights.push(w.config.abilities[i].choice_weight);
    }
    for (i, upgrade) in w.config.upgrades.iter().enumerate() {
        // 対象 kind のインスタンスがひとつも居ない項目は提示しない
        if w.stats.registered_count(upgrade.kind) == 0 {
            continue;
        }
        candidates.push(UpgradeChoice::Upgrade(i));
        weights.push(upgrade.weight);
    }

    let mut choices = Vec::new();
    while choices.len() < UPGRADE_CHOICE_COUNT && !candidates.is_empty() {
        let Some(picked) = w.rng.pick_weighted(&weights) else {
            break;
        };
        choices.push(candidates.swap_remove(picked));
        weights.swap_remove(picked);
    }
    choices
}

/// 累積経験値がしきい値を超えていればレベルアップ待機に入る。
/// 候補がゼロのときは選択なしでレベルだけ上げて先へ進む（縮退ケース）。
pub(crate) fn check_level_up(w: &mut SimWorld) {
    while !w.level_up_pending && w.exp >= exp_required_for_next(w.level) {
        let choices = propose_choices(w);
        if choices.is_empty() {
            w.level += 1;
            log::warn!("no upgrade candidates at level {}; auto-completing", w.level);
            w.frame_events.push(FrameEvent::LevelUp { new_level: w.level });
            continue;
        }
        w.level_up_pending = true;
        w.pending_choices = choices;
        w.frame_events.push(FrameEvent::LevelUp { new_level: w.level + 1 });
    }
}

/// ホストが選んだ選択肢を適用してレベルアップを完了する。
/// `choice_index` は `pending_choices` へのインデックス。
pub fn apply_choice(w: &mut SimWorld, choice_index: usize) -> bool {
    if !w.level_up_pending {
        log::error!("apply_choice called with no pending level-up");
        return false;
    }
    let Some(&choice) = w.pending_choices.get(choice_index) else {
        log::error!(
            "choice index {choice_index} out of range ({} offered)",
            w.pending_choices.len()
        );
        return false;
    };

    match choice {
        UpgradeChoice::Ability(blueprint) => {
            add_ability(w, blueprint);
        }
        UpgradeChoice::Upgrade(index) => {
            let (kind, delta, mode) = {
                let upgrade = &w.config.upgrades[index];
                (upgrade.kind, upgrade.delta, upgrade.mode)
            };
            w.stats.apply_delta(kind, delta, mode);
        }
    }

    w.level += 1;
    w.level_up_pending = false;
    w.pending_choices.clear();
    // しきい値を跨いだままなら続けて次の選択を提示する
    check_level_up(w);
    true
}

/// アビリティを装備し、そのアップグレード可能フィールドを登録する
pub(crate) fn add_ability(w: &mut SimWorld, blueprint: usize) -> bool {
    if w.abilities.iter().any(|a| a.blueprint == blueprint) {
        log::error!("ability {blueprint} already owned");
        return false;
    }
    if w.abilities.len() >= MAX_ABILITY_SLOTS {
        log::error!("ability slots full");
        return false;
    }
    let instance = {
        let spec = &w.config.abilities[blueprint];
        AbilityInstance::instantiate(blueprint, spec, &mut w.stats)
    };
    w.abilities.push(instance);
    log::info!("ability '{}' equipped", w.config.abilities[blueprint].name);
    true
}

/// 選択 UI 向けの表示名
pub fn choice_label(w: &SimWorld, choice_index: usize) -> String {
    match w.pending_choices.get(choice_index) {
        Some(UpgradeChoice::Ability(b)) => w.config.abilities[*b].name.clone(),
        Some(UpgradeChoice::Upgrade(u)) => w.config.upgrades[*u].label.clone(),
        None => String::from("<none>"),
    }
}
