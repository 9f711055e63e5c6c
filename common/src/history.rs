//! 照合履歴
//!
//! 新しい順に最大 `HISTORY_CAPACITY` 件を保持する固定長バッファ。
//! 上限を超えた場合は最古の1件を黙って破棄する。

use crate::types::MatchResult;
use std::collections::VecDeque;

/// 履歴の上限件数
pub const HISTORY_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<MatchResult>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// 上限件数を指定して生成（0は1に切り上げ）
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 先頭に追加。満杯なら最古を破棄して返す
    pub fn push(&mut self, result: MatchResult) -> Option<MatchResult> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_back()
        } else {
            None
        };
        self.entries.push_front(result);
        evicted
    }

    /// 新しい順のイテレータ
    pub fn iter(&self) -> impl Iterator<Item = &MatchResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 新しい順のコピー
    pub fn to_vec(&self) -> Vec<MatchResult> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
