//! Path: survival_sim/src/world/mod.rs
//! Summary: ワールド型（PlayerState, EnemyWorld, ProjectileWorld, PickupWorld, FloatingTextWorld, BossState, SimWorld）

mod ability;
mod boss;
mod enemy;
mod floating_text;
mod frame_event;
mod pickup;
mod player;
mod projectile;
mod sim_world;

pub use ability::{AbilityInstance, AbilityStatIds};
pub use boss::BossState;
pub use enemy::EnemyWorld;
pub use floating_text::FloatingTextWorld;
pub use frame_event::FrameEvent;
pub use pickup::{PickupKind, PickupWorld};
pub use player::PlayerState;
pub use projectile::ProjectileWorld;
pub use sim_world::{SessionOutcome, SessionPhase, SimWorld};
