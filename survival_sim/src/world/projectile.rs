//! Path: survival_sim/src/world/projectile.rs
//! Summary: 弾丸 SoA（ProjectileWorld）

use survival_core::pool::{Acquired, Pool};

/// 弾丸 SoA（Structure of Arrays）
pub struct ProjectileWorld {
    pub positions_x:  Vec<f32>,
    pub positions_y:  Vec<f32>,
    pub velocities_x: Vec<f32>,
    pub velocities_y: Vec<f32>,
    pub damage:       Vec<f32>,
    pub lifetime:     Vec<f32>,
    /// 残り貫通回数。0 の弾は最初のヒットで消える
    pub pierce_left:  Vec<i32>,
    /// 発射元アビリティの blueprint インデックス（撃破イベント用）
    pub ability_ids:  Vec<u16>,
    pub slots:        Pool,
}

impl ProjectileWorld {
    pub fn new(warm: usize) -> Self {
        let mut slots = Pool::new();
        let warmed = slots.warm(warm);
        Self {
            positions_x:  vec![0.0; warmed],
            positions_y:  vec![0.0; warmed],
            velocities_x: vec![0.0; warmed],
            velocities_y: vec![0.0; warmed],
            damage:       vec![0.0; warmed],
            lifetime:     vec![0.0; warmed],
            pierce_left:  vec![0; warmed],
            ability_ids:  vec![0; warmed],
            slots,
        }
    }

    pub fn len(&self) -> usize {
        self.positions_x.len()
    }

    pub fn is_alive(&self, i: usize) -> bool {
        self.slots.is_alive(i)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn spawn(
        &mut self,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        damage: f32,
        lifetime: f32,
        pierce: i32,
        ability: u16,
    ) -> usize {
        // キャップなしプールなので acquire は必ず成功する
        match self.slots.acquire().expect("uncapped pool") {
            Acquired::Reused(i) => {
                self.positions_x[i]  = x;
                self.positions_y[i]  = y;
                self.velocities_x[i] = vx;
                self.velocities_y[i] = vy;
                self.damage[i]       = damage;
                self.lifetime[i]     = lifetime;
                self.pierce_left[i]  = pierce;
                self.ability_ids[i]  = ability;
                i
            }
            Acquired::Fresh(i) => {
                self.positions_x.push(x);
                self.positions_y.push(y);
                self.velocities_x.push(vx);
                self.velocities_y.push(vy);
                self.damage.push(damage);
                self.lifetime.push(lifetime);
                self.pierce_left.push(pierce);
                self.ability_ids.push(ability);
                i
            }
        }
    }

    pub fn kill(&mut self, i: usize) -> bool {
        self.slots.release(i)
    }
}
