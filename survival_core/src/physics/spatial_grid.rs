//! Path: survival_core/src/physics/spatial_grid.rs
//! Summary: プレイヤー付近にアンカーされる均一グリッド（挿入・削除・移動・範囲クエリ・再構築）

use rustc_hash::FxHashMap;

/// 均一グリッドの空間インデックス。
///
/// セルはアンカー座標からの相対位置で量子化されるため、プレイヤーが
/// 無限マップを移動してもセルキーの絶対値は `rebuild` で小さく保てる。
/// 各エンティティは常にちょうど 1 つのセルに所属し、所属セルの逆参照を
/// 持つので削除・移動は O(1)。
pub struct SpatialGrid {
    cell_size: f32,
    center_x:  f32,
    center_y:  f32,
    cells: FxHashMap<(i32, i32), Vec<usize>>,
    /// entity id -> 所属セル（O(1) 削除用の逆参照）
    memberships: FxHashMap<usize, (i32, i32)>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self::anchored(cell_size, 0.0, 0.0)
    }

    pub fn anchored(cell_size: f32, center_x: f32, center_y: f32) -> Self {
        debug_assert!(cell_size > 0.0);
        Self {
            cell_size,
            center_x,
            center_y,
            cells: FxHashMap::default(),
            memberships: FxHashMap::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    /// 登録済みエンティティ数
    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    pub fn contains(&self, id: usize) -> bool {
        self.memberships.contains_key(&id)
    }

    fn cell_key(&self, x: f32, y: f32) -> (i32, i32) {
        (
            ((x - self.center_x) / self.cell_size).floor() as i32,
            ((y - self.center_y) / self.cell_size).floor() as i32,
        )
    }

    /// セルのバケツからエンティティを外す。空になったバケツは破棄する。
    fn detach(&mut self, id: usize, key: (i32, i32)) {
        if let Some(bucket) = self.cells.get_mut(&key) {
            if let Some(pos) = bucket.iter().position(|&e| e == id) {
                bucket.swap_remove(pos);
            }
            if bucket.is_empty() {
                self.cells.remove(&key);
            }
        }
    }

    /// エンティティを `position` のセルに追加する。
    /// 既に登録済みの場合は冪等（別セルに居れば移動として扱う）。
    pub fn insert(&mut self, id: usize, x: f32, y: f32) {
        let key = self.cell_key(x, y);
        match self.memberships.get(&id) {
            Some(&cur) if cur == key => {}
            Some(&cur) => {
                self.detach(id, cur);
                self.cells.entry(key).or_default().push(id);
                self.memberships.insert(id, key);
            }
            None => {
                self.cells.entry(key).or_default().push(id);
                self.memberships.insert(id, key);
            }
        }
    }

    /// 所属セルから削除する。未登録なら no-op。
    pub fn remove(&mut self, id: usize) {
        if let Some(key) = self.memberships.remove(&id) {
            self.detach(id, key);
        }
    }

    /// 移動後の座標でセル所属を更新する。セルが変わらない限りバケツは触らない
    /// （毎ティック呼ばれる最頻パス）。未登録 id の relocate はライフサイクル
    /// 違反なのでエラーログを出し、挿入に落として継続する。
    pub fn relocate(&mut self, id: usize, x: f32, y: f32) {
        let key = self.cell_key(x, y);
        match self.memberships.get(&id) {
            Some(&cur) if cur == key => {}
            Some(&cur) => {
                self.detach(id, cur);
                self.cells.entry(key).or_default().push(id);
                self.memberships.insert(id, key);
            }
            None => {
                log::error!("relocate of unindexed entity {id}; treating as insert");
                self.cells.entry(key).or_default().push(id);
                self.memberships.insert(id, key);
            }
        }
    }

    /// 指定円を囲む正方形に重なるセルのエンティティ ID を `buf` に書き込む
    /// （アロケーションなし・呼び出し前の `clear()` 不要）。
    ///
    /// 返るのはセル粒度のスーパーセット。サブセル精度が要る呼び出し側は
    /// ユークリッド距離で絞り込むこと。各 ID は高々 1 回しか現れない。
    /// 半径は `MAX_QUERY_RADIUS` 程度までに抑えるのが望ましい。
    pub fn query_radius_into(&self, x: f32, y: f32, radius: f32, buf: &mut Vec<usize>) {
        buf.clear();
        let r = (radius / self.cell_size).ceil() as i32;
        let (cx, cy) = self.cell_key(x, y);
        for ix in (cx - r)..=(cx + r) {
            for iy in (cy - r)..=(cy + r) {
                if let Some(ids) = self.cells.get(&(ix, iy)) {
                    buf.extend_from_slice(ids);
                }
            }
        }
    }

    pub fn query_radius(&self, x: f32, y: f32, radius: f32) -> Vec<usize> {
        let mut buf = Vec::new();
        self.query_radius_into(x, y, radius, &mut buf);
        buf
    }

    /// アンカーから `threshold` 以上離れたら再構築が必要
    pub fn needs_rebuild(&self, x: f32, y: f32, threshold: f32) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy > threshold * threshold
    }

    /// グリッドを新しいアンカーで再構築し、全エンティティを登録し直す。
    pub fn rebuild<I>(&mut self, center_x: f32, center_y: f32, entities: I)
    where
        I: IntoIterator<Item = (usize, f32, f32)>,
    {
        self.cells.clear();
        self.memberships.clear();
        self.center_x = center_x;
        self.center_y = center_y;
        for (id, x, y) in entities {
            let key = self.cell_key(x, y);
            self.cells.entry(key).or_default().push(id);
            self.memberships.insert(id, key);
        }
    }
}
