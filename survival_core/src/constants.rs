//! Path: survival_core/src/constants.rs
//! Summary: 可視領域・空間グリッド・スポーン・戦闘関連の定数定義

// Visible area (presentation layer reference size)
pub const VIEW_WIDTH:  f32 = 1280.0;
pub const VIEW_HEIGHT: f32 = 720.0;

/// スポーン位置を可視領域の外に置くためのバッファ（px）
pub const SPAWN_OFFSCREEN_BUFFER: f32 = 80.0;

// Spatial grid
pub const CELL_SIZE: f32 = 80.0;

/// プレイヤーがアンカーからこの距離を超えたらグリッドを再アンカーする
pub const GRID_REBUILD_THRESHOLD: f32 = 2048.0;

/// 範囲クエリの推奨上限。セル幅の数倍を超えると全走査に近づく
pub const MAX_QUERY_RADIUS: f32 = CELL_SIZE * 8.0;

// Combat
pub const INVINCIBLE_DURATION: f32 = 0.5;
pub const PROJECTILE_RADIUS:   f32 = 6.0;

/// 最近接ターゲット探索半径（Bolt 系の索敵用）
pub const TARGET_SEARCH_RADIUS: f32 = VIEW_WIDTH / 2.0;

/// クールダウンの下限。アップグレードの累積で 0 以下にならないようにする
pub const MIN_COOLDOWN: f32 = 0.05;

// Enemy separation: 敵同士が重ならないための押し出し半径・強さ
pub const ENEMY_SEPARATION_RADIUS: f32 = 40.0;
pub const ENEMY_SEPARATION_FORCE:  f32 = 120.0;

// Abilities
pub const MAX_ABILITY_SLOTS: usize = 6;

/// レベルアップ時に提示する選択肢の数
pub const UPGRADE_CHOICE_COUNT: usize = 3;

// Pickups
pub const PICKUP_COLLECT_RADIUS: f32 = 60.0;
pub const MAGNET_DURATION:       f32 = 10.0;
pub const MAGNET_PULL_SPEED:     f32 = 300.0;

/// ティック処理時間の警告しきい値（ms）
pub const TICK_BUDGET_MS: f64 = 1000.0 / 60.0;
