//! Path: survival_sim/src/lib.rs
//! Summary: ワールド・システム・ティックの公開 API

pub mod snapshot;
pub mod systems;
pub mod tick;
pub mod world;

pub use systems::leveling::{apply_choice, choice_label, UpgradeChoice};
pub use systems::spawn::SpawnScheduler;
pub use world::{
    AbilityInstance, BossState, EnemyWorld, FloatingTextWorld, FrameEvent, PickupKind,
    PickupWorld, PlayerState, ProjectileWorld, SessionOutcome, SessionPhase, SimWorld,
};
