//! Path: survival_core/src/util.rs
//! Summary: 経験値しきい値・スポーンリング配置などの共通ユーティリティ

use crate::constants::{SPAWN_OFFSCREEN_BUFFER, VIEW_HEIGHT, VIEW_WIDTH};
use crate::physics::rng::SimpleRng;

/// 次のレベルに上がるために必要な累積 EXP を返す。
pub fn exp_required_for_next(level: u32) -> u32 {
    const EXP_TABLE: [u32; 10] = [0, 10, 25, 45, 70, 100, 135, 175, 220, 270];
    let idx = level as usize;
    if idx < EXP_TABLE.len() {
        EXP_TABLE[idx]
    } else {
        270 + (idx as u32 - 9) * 50
    }
}

/// スポーンリングの半径。可視領域の対角線の半分 + 画面外バッファなので、
/// 生成の瞬間に画面内へ出現することはない。
pub fn spawn_ring_radius() -> f32 {
    (VIEW_WIDTH * VIEW_WIDTH + VIEW_HEIGHT * VIEW_HEIGHT).sqrt() / 2.0 + SPAWN_OFFSCREEN_BUFFER
}

/// プレイヤーを中心とするリング上の一様ランダム角度の点を返す。
pub fn spawn_ring_position(
    rng: &mut SimpleRng,
    player_x: f32,
    player_y: f32,
    radius: f32,
) -> (f32, f32) {
    let angle = rng.next_angle();
    (
        player_x + angle.cos() * radius,
        player_y + angle.sin() * radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exp_table_thresholds() {
        assert_eq!(exp_required_for_next(0), 0);
        assert_eq!(exp_required_for_next(1), 10);
        assert_eq!(exp_required_for_next(2), 25);
        assert_eq!(exp_required_for_next(9), 270);
        assert_eq!(exp_required_for_next(10), 320);
    }

    #[test]
    fn ring_radius_clears_the_view() {
        let r = spawn_ring_radius();
        // 対角線の半分より必ず外側
        assert!(r > (VIEW_WIDTH * VIEW_WIDTH + VIEW_HEIGHT * VIEW_HEIGHT).sqrt() / 2.0);
    }

    #[test]
    fn ring_positions_lie_on_the_ring() {
        let mut rng = SimpleRng::new(99);
        let radius = spawn_ring_radius();
        for _ in 0..50 {
            let (x, y) = spawn_ring_position(&mut rng, 100.0, -40.0, radius);
            let dx = x - 100.0;
            let dy = y + 40.0;
            let dist = (dx * dx + dy * dy).sqrt();
            assert!((dist - radius).abs() < 0.5);
        }
    }
}
