//! Path: survival_sim/src/world/enemy.rs
//! Summary: 敵 SoA（EnemyWorld）とスロットプールによるライフサイクル管理

use survival_core::physics::separation::Separation;
use survival_core::pool::{Acquired, Pool};

/// 敵 SoA（Structure of Arrays）
///
/// スロットの active/available 管理は `Pool` に委譲し、各カラムは
/// プール容量と常に同じ長さを保つ。
pub struct EnemyWorld {
    pub positions_x:  Vec<f32>,
    pub positions_y:  Vec<f32>,
    pub velocities_x: Vec<f32>,
    pub velocities_y: Vec<f32>,
    pub speeds:       Vec<f32>,
    pub hp:           Vec<f32>,
    pub max_hp:       Vec<f32>,
    pub kind_ids:     Vec<u16>,
    pub slots:        Pool,
    /// 分離パス用の作業バッファ（毎ティック再利用してアロケーションを回避）
    pub sep_x:        Vec<f32>,
    pub sep_y:        Vec<f32>,
    /// 近隣クエリ結果の再利用バッファ
    pub neighbor_buf: Vec<usize>,
}

impl EnemyWorld {
    pub fn new(warm: usize, cap: Option<usize>) -> Self {
        let mut slots = match cap {
            Some(cap) => Pool::with_cap(cap),
            None => Pool::new(),
        };
        let warmed = slots.warm(warm);
        Self {
            positions_x:  vec![0.0; warmed],
            positions_y:  vec![0.0; warmed],
            velocities_x: vec![0.0; warmed],
            velocities_y: vec![0.0; warmed],
            speeds:       vec![0.0; warmed],
            hp:           vec![0.0; warmed],
            max_hp:       vec![0.0; warmed],
            kind_ids:     vec![0; warmed],
            slots,
            sep_x:        vec![0.0; warmed],
            sep_y:        vec![0.0; warmed],
            neighbor_buf: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.active_count() == 0
    }

    pub fn is_alive(&self, i: usize) -> bool {
        self.slots.is_alive(i)
    }

    /// 敵を 1 体スポーンする。プールが上限でドロップした場合は None。
    pub fn spawn(&mut self, x: f32, y: f32, kind: u16, hp: f32, speed: f32) -> Option<usize> {
        match self.slots.acquire()? {
            Acquired::Reused(i) => {
                self.positions_x[i]  = x;
                self.positions_y[i]  = y;
                self.velocities_x[i] = 0.0;
                self.velocities_y[i] = 0.0;
                self.speeds[i]       = speed;
                self.hp[i]           = hp;
                self.max_hp[i]       = hp;
                self.kind_ids[i]     = kind;
                self.sep_x[i]        = 0.0;
                self.sep_y[i]        = 0.0;
                Some(i)
            }
            Acquired::Fresh(i) => {
                self.positions_x.push(x);
                self.positions_y.push(y);
                self.velocities_x.push(0.0);
                self.velocities_y.push(0.0);
                self.speeds.push(speed);
                self.hp.push(hp);
                self.max_hp.push(hp);
                self.kind_ids.push(kind);
                self.sep_x.push(0.0);
                self.sep_y.push(0.0);
                Some(i)
            }
        }
    }

    /// スロットをプールへ返却する。二重返却はプール側が報告する。
    pub fn kill(&mut self, i: usize) -> bool {
        self.slots.release(i)
    }
}

impl Separation for EnemyWorld {
    fn count(&self) -> usize { self.positions_x.len() }
    fn is_alive(&self, i: usize) -> bool { self.slots.is_alive(i) }
    fn pos_x(&self, i: usize) -> f32 { self.positions_x[i] }
    fn pos_y(&self, i: usize) -> f32 { self.positions_y[i] }
    fn add_pos_x(&mut self, i: usize, v: f32) { self.positions_x[i] += v; }
    fn add_pos_y(&mut self, i: usize, v: f32) { self.positions_y[i] += v; }
    fn sep_buf_x(&mut self) -> &mut Vec<f32> { &mut self.sep_x }
    fn sep_buf_y(&mut self) -> &mut Vec<f32> { &mut self.sep_y }
    fn neighbor_buf(&mut self) -> &mut Vec<usize> { &mut self.neighbor_buf }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_reuses_released_slots() {
        let mut enemies = EnemyWorld::new(0, None);
        let a = enemies.spawn(1.0, 2.0, 0, 30.0, 80.0).unwrap();
        assert!(enemies.kill(a));
        let b = enemies.spawn(5.0, 6.0, 1, 15.0, 160.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies.kind_ids[b], 1);
        assert_eq!(enemies.hp[b], 15.0);
    }

    #[test]
    fn warm_capacity_spawns_without_growth() {
        let mut enemies = EnemyWorld::new(4, None);
        assert_eq!(enemies.len(), 4);
        for _ in 0..4 {
            enemies.spawn(0.0, 0.0, 0, 10.0, 50.0).unwrap();
        }
        assert_eq!(enemies.len(), 4);
        enemies.spawn(0.0, 0.0, 0, 10.0, 50.0).unwrap();
        assert_eq!(enemies.len(), 5);
    }

    #[test]
    fn hard_cap_drops_spawn() {
        let mut enemies = EnemyWorld::new(0, Some(2));
        assert!(enemies.spawn(0.0, 0.0, 0, 10.0, 50.0).is_some());
        assert!(enemies.spawn(0.0, 0.0, 0, 10.0, 50.0).is_some());
        assert!(enemies.spawn(0.0, 0.0, 0, 10.0, 50.0).is_none());
        assert_eq!(enemies.slots.dropped_count(), 1);
    }
}
