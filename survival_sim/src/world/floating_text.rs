//! Path: survival_sim/src/world/floating_text.rs
//! Summary: スコアポップアップ用のフローティングテキスト SoA

use survival_core::pool::{Acquired, Pool};

/// 撃破スコア等を一定時間表示するフローティングテキスト。
/// 他のエンティティ種と同じプール運用で使い回す。
pub struct FloatingTextWorld {
    pub positions_x:  Vec<f32>,
    pub positions_y:  Vec<f32>,
    pub value:        Vec<u32>,
    pub lifetime:     Vec<f32>,
    pub max_lifetime: Vec<f32>,
    pub slots:        Pool,
}

impl FloatingTextWorld {
    pub fn new() -> Self {
        Self {
            positions_x:  Vec::new(),
            positions_y:  Vec::new(),
            value:        Vec::new(),
            lifetime:     Vec::new(),
            max_lifetime: Vec::new(),
            slots:        Pool::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions_x.len()
    }

    pub fn is_alive(&self, i: usize) -> bool {
        self.slots.is_alive(i)
    }

    pub fn spawn(&mut self, x: f32, y: f32, value: u32, lifetime: f32) {
        match self.slots.acquire().expect("uncapped pool") {
            Acquired::Reused(i) => {
                self.positions_x[i]  = x;
                self.positions_y[i]  = y;
                self.value[i]        = value;
                self.lifetime[i]     = lifetime;
                self.max_lifetime[i] = lifetime;
            }
            Acquired::Fresh(_) => {
                self.positions_x.push(x);
                self.positions_y.push(y);
                self.value.push(value);
                self.lifetime.push(lifetime);
                self.max_lifetime.push(lifetime);
            }
        }
    }

    /// 寿命を減衰させ、切れたテキストをプールへ返す
    pub fn update(&mut self, dt: f32) {
        for i in 0..self.len() {
            if !self.slots.is_alive(i) {
                continue;
            }
            self.lifetime[i] -= dt;
            if self.lifetime[i] <= 0.0 {
                self.slots.release(i);
            }
        }
    }
}

impl Default for FloatingTextWorld {
    fn default() -> Self {
        Self::new()
    }
}
