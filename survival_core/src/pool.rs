//! Path: survival_core/src/pool.rs
//! Summary: SoA ワールド共通のスロットプール（active/available 分割・フリーリスト・ハードキャップ）

/// `acquire` の結果。
///
/// `Fresh` はプールが伸長したことを意味し、呼び出し側は各 SoA カラムに
/// 1 要素追加する必要がある。`Reused` は既存スロットへの上書きで済む。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquired {
    Reused(usize),
    Fresh(usize),
}

impl Acquired {
    pub fn index(self) -> usize {
        match self {
            Acquired::Reused(i) | Acquired::Fresh(i) => i,
        }
    }
}

/// エンティティスロットの active/available 分割を管理するプール。
///
/// スロットは常に {available, active} のどちらか一方に属する。容量は
/// 需要に応じて伸び、セッション中に縮むことはない。ハードキャップ付きの
/// プールは満杯時に取得要求をドロップして数えるだけで、失敗はしない。
pub struct Pool {
    alive:        Vec<bool>,
    free_list:    Vec<usize>,
    active_count: usize,
    hard_cap:     Option<usize>,
    dropped:      u64,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    pub fn new() -> Self {
        Self {
            alive:        Vec::new(),
            free_list:    Vec::new(),
            active_count: 0,
            hard_cap:     None,
            dropped:      0,
        }
    }

    pub fn with_cap(cap: usize) -> Self {
        let mut pool = Self::new();
        pool.hard_cap = Some(cap);
        pool
    }

    /// セッション開始時に `n` 個の空きスロットを事前確保する。
    /// 実際に追加した数を返す（キャップがあればそこまで）。
    /// 呼び出し側は返り値ぶんだけ SoA カラムにデフォルト値を積むこと。
    pub fn warm(&mut self, n: usize) -> usize {
        let room = match self.hard_cap {
            Some(cap) => cap.saturating_sub(self.alive.len()),
            None => n,
        };
        let added = n.min(room);
        for _ in 0..added {
            let i = self.alive.len();
            self.alive.push(false);
            self.free_list.push(i);
        }
        added
    }

    /// 空きスロットを取得して active に昇格する。
    /// フリーリストが空なら伸長し、キャップに達していればドロップして None。
    pub fn acquire(&mut self) -> Option<Acquired> {
        if let Some(i) = self.free_list.pop() {
            self.alive[i] = true;
            self.active_count += 1;
            return Some(Acquired::Reused(i));
        }
        if let Some(cap) = self.hard_cap {
            if self.alive.len() >= cap {
                self.dropped += 1;
                log::debug!("pool at hard cap {cap}; request dropped ({} total)", self.dropped);
                return None;
            }
        }
        let i = self.alive.len();
        self.alive.push(true);
        self.active_count += 1;
        Some(Acquired::Fresh(i))
    }

    /// スロットを available に戻す。既に available なスロットの返却は
    /// ライフサイクルバグ（二重返却）なのでエラーログを出して false を返す。
    pub fn release(&mut self, i: usize) -> bool {
        if i >= self.alive.len() || !self.alive[i] {
            log::error!("double release of pool slot {i}");
            return false;
        }
        self.alive[i] = false;
        self.active_count -= 1;
        self.free_list.push(i);
        true
    }

    pub fn is_alive(&self, i: usize) -> bool {
        self.alive.get(i).copied().unwrap_or(false)
    }

    /// SoA カラムと並走するための alive フラグスライス
    pub fn flags(&self) -> &[bool] {
        &self.alive
    }

    pub fn capacity(&self) -> usize {
        self.alive.len()
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    pub fn iter_alive(&self) -> impl Iterator<Item = usize> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 分割不変条件: 全スロットは active か free list のどちらか一方に居る
    fn assert_partition(pool: &Pool) {
        let mut in_free = vec![false; pool.capacity()];
        for &i in &pool.free_list {
            assert!(!in_free[i], "slot {i} twice in free list");
            in_free[i] = true;
        }
        for i in 0..pool.capacity() {
            assert_ne!(pool.is_alive(i), in_free[i], "slot {i} violates partition");
        }
        assert_eq!(
            pool.active_count() + pool.free_list.len(),
            pool.capacity()
        );
    }

    #[test]
    fn acquire_release_keeps_partition() {
        let mut pool = Pool::new();
        let a = pool.acquire().unwrap().index();
        let b = pool.acquire().unwrap().index();
        assert_partition(&pool);
        assert!(pool.release(a));
        assert_partition(&pool);
        let c = pool.acquire().unwrap();
        // 解放済みスロットが再利用される
        assert_eq!(c, Acquired::Reused(a));
        assert_partition(&pool);
        assert!(pool.is_alive(b));
    }

    #[test]
    fn double_release_is_reported_not_absorbed() {
        let mut pool = Pool::new();
        let a = pool.acquire().unwrap().index();
        assert!(pool.release(a));
        assert!(!pool.release(a));
        // 二重返却後も状態は壊れない
        assert_partition(&pool);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn release_out_of_range_is_reported() {
        let mut pool = Pool::new();
        assert!(!pool.release(3));
    }

    #[test]
    fn warm_prepopulates_available_slots() {
        let mut pool = Pool::new();
        assert_eq!(pool.warm(8), 8);
        assert_eq!(pool.capacity(), 8);
        assert_eq!(pool.active_count(), 0);
        assert_partition(&pool);
        // warm 済みスロットからは伸長なしで取得できる
        for _ in 0..8 {
            assert!(matches!(pool.acquire(), Some(Acquired::Reused(_))));
        }
        assert!(matches!(pool.acquire(), Some(Acquired::Fresh(8))));
    }

    #[test]
    fn hard_cap_drops_and_counts() {
        let mut pool = Pool::with_cap(2);
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_some());
        assert!(pool.acquire().is_none());
        assert!(pool.acquire().is_none());
        assert_eq!(pool.dropped_count(), 2);
        // 返却すれば再び取得できる
        assert!(pool.release(0));
        assert!(matches!(pool.acquire(), Some(Acquired::Reused(0))));
    }

    #[test]
    fn warm_respects_hard_cap() {
        let mut pool = Pool::with_cap(4);
        assert_eq!(pool.warm(10), 4);
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn iter_alive_lists_active_slots() {
        let mut pool = Pool::new();
        let a = pool.acquire().unwrap().index();
        let b = pool.acquire().unwrap().index();
        pool.release(a);
        let alive: Vec<usize> = pool.iter_alive().collect();
        assert_eq!(alive, vec![b]);
    }
}
