//! Path: survival_core/src/curve.rs
//! Summary: 制御点列による難易度カーブ（純粋なサンプリング関数）

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpolation {
    /// 直前の制御点の値をそのまま返す
    Step,
    /// 隣接制御点間を線形補間する
    Linear,
}

/// (x, y) 制御点列と補間則で表すカーブ。
///
/// `sample` は副作用のない純関数で、範囲外の x は端の値にクランプされる。
/// 難易度カーブの x 軸は原則として時間割合 [0,1]。
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Curve {
    points:        Vec<(f32, f32)>,
    interpolation: Interpolation,
}

impl Curve {
    /// 制御点は x 昇順が前提。順不同の入力はコンテンツ側の誤りとして
    /// 警告を出しつつソートで回復する。
    pub fn new(mut points: Vec<(f32, f32)>, interpolation: Interpolation) -> Self {
        if points.windows(2).any(|w| w[0].0 > w[1].0) {
            log::warn!("curve control points out of order; sorting");
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        Self { points, interpolation }
    }

    pub fn constant(value: f32) -> Self {
        Self {
            points:        vec![(0.0, value)],
            interpolation: Interpolation::Step,
        }
    }

    pub fn sample(&self, x: f32) -> f32 {
        let Some(&(first_x, first_y)) = self.points.first() else {
            return 0.0;
        };
        let &(last_x, last_y) = self.points.last().expect("non-empty");
        if x <= first_x {
            return first_y;
        }
        if x >= last_x {
            return last_y;
        }
        // first_x < x < last_x なので隣接ペアが必ず見つかる
        for w in self.points.windows(2) {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            if x < x1 {
                return match self.interpolation {
                    Interpolation::Step => y0,
                    Interpolation::Linear => {
                        let t = (x - x0) / (x1 - x0);
                        y0 + (y1 - y0) * t
                    }
                };
            }
        }
        last_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_curve_everywhere() {
        let c = Curve::constant(2.5);
        assert_eq!(c.sample(-1.0), 2.5);
        assert_eq!(c.sample(0.5), 2.5);
        assert_eq!(c.sample(10.0), 2.5);
    }

    #[test]
    fn linear_interpolates_between_points() {
        let c = Curve::new(vec![(0.0, 0.0), (1.0, 10.0)], Interpolation::Linear);
        assert!((c.sample(0.25) - 2.5).abs() < 1e-5);
        assert!((c.sample(0.5) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn step_holds_previous_value() {
        let c = Curve::new(vec![(0.0, 1.0), (0.5, 4.0), (1.0, 9.0)], Interpolation::Step);
        assert_eq!(c.sample(0.49), 1.0);
        assert_eq!(c.sample(0.5), 4.0);
        assert_eq!(c.sample(0.99), 4.0);
    }

    #[test]
    fn clamps_outside_range() {
        let c = Curve::new(vec![(0.2, 3.0), (0.8, 7.0)], Interpolation::Linear);
        assert_eq!(c.sample(0.0), 3.0);
        assert_eq!(c.sample(1.0), 7.0);
    }

    #[test]
    fn unsorted_points_are_recovered() {
        let c = Curve::new(vec![(1.0, 10.0), (0.0, 0.0)], Interpolation::Linear);
        assert!((c.sample(0.5) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn empty_curve_samples_zero() {
        let c = Curve::new(Vec::new(), Interpolation::Linear);
        assert_eq!(c.sample(0.5), 0.0);
    }
}
