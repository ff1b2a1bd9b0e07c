//! Path: survival_core/src/physics/rng.rs
//! Summary: 決定論的 LCG 乱数ジェネレータ

pub struct SimpleRng(u64);

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self.0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn next_f32(&mut self) -> f32 {
        self.next_u32() as f32 / u32::MAX as f32
    }

    /// [0, τ) の一様乱数角度
    pub fn next_angle(&mut self) -> f32 {
        self.next_f32() * std::f32::consts::TAU
    }

    /// 重み付き抽選。正の合計重みに比例してインデックスを返す。
    /// 合計が 0 以下（全候補の重みが 0 以下）なら None。
    pub fn pick_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.next_f32() * total;
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return Some(i);
            }
            roll -= w;
        }
        // 浮動小数点の端数で抜けた場合は最後の正の重みに割り当てる
        weights.iter().rposition(|w| *w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_reproducibility() {
        let mut rng = SimpleRng::new(12345);
        let a: Vec<u32> = (0..10).map(|_| rng.next_u32()).collect();
        let mut rng2 = SimpleRng::new(12345);
        let b: Vec<u32> = (0..10).map(|_| rng2.next_u32()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn next_f32_in_range() {
        let mut rng = SimpleRng::new(999);
        for _ in 0..100 {
            let f = rng.next_f32();
            assert!((0.0..=1.0).contains(&f));
        }
    }

    #[test]
    fn pick_weighted_single_positive() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..20 {
            assert_eq!(rng.pick_weighted(&[0.0, 3.5, 0.0]), Some(1));
        }
    }

    #[test]
    fn pick_weighted_all_zero_is_none() {
        let mut rng = SimpleRng::new(7);
        assert_eq!(rng.pick_weighted(&[0.0, 0.0]), None);
        assert_eq!(rng.pick_weighted(&[]), None);
    }

    #[test]
    fn pick_weighted_covers_all_candidates() {
        let mut rng = SimpleRng::new(42);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let i = rng.pick_weighted(&[1.0, 1.0, 1.0]).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
