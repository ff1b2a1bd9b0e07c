//! Path: survival_sim/src/world/frame_event.rs
//! Summary: ティック内で発生したゲームイベント（ホストへ drain される）

use super::pickup::PickupKind;
use super::sim_world::SessionOutcome;

/// ティック内で発生したゲームイベント
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    EnemyKilled     { enemy: u16, ability: u16 },
    PlayerDamaged   { damage: f32 },
    LevelUp         { new_level: u32 },
    PickupCollected { kind: PickupKind },
    BossDefeated    { boss: u16 },
    SessionEnded    { outcome: SessionOutcome },
}
