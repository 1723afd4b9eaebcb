// ==========================================
// TIPO DE PROCESO 分类系统 - 历史合并器
// ==========================================
// 职责: 本次结果追加到历史表并按 ITEM 去重
// 规则: 旧表在前、新表在后拼接,同一 ITEM 保留最后一次出现
//       （新数据覆盖旧数据,行位置取最后一次出现处）
// 存储: 加载 → 拼接 → 去重 → 整表覆写,无事务保证
// ==========================================

use crate::domain::records::HistoryRecord;
use crate::repository::error::RepositoryResult;
use crate::repository::history_repo::HistoryStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{info, instrument};

/// 合并统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MergeOutcome {
    pub previous: usize, // 合并前历史行数
    pub added: usize,    // 新增 ITEM 数
    pub updated: usize,  // 被覆盖的 ITEM 数
    pub total: usize,    // 合并后行数
}

/// 纯函数合并
pub fn merge_history(old: Vec<HistoryRecord>, new: &[HistoryRecord]) -> Vec<HistoryRecord> {
    let combined: Vec<HistoryRecord> = old.into_iter().chain(new.iter().cloned()).collect();

    let mut last_position: HashMap<i64, usize> = HashMap::with_capacity(combined.len());
    for (idx, row) in combined.iter().enumerate() {
        last_position.insert(row.item, idx);
    }

    combined
        .into_iter()
        .enumerate()
        .filter(|(idx, row)| last_position.get(&row.item) == Some(idx))
        .map(|(_, row)| row)
        .collect()
}

pub struct HistoryMerger<'a> {
    store: &'a dyn HistoryStore,
}

impl<'a> HistoryMerger<'a> {
    pub fn new(store: &'a dyn HistoryStore) -> Self {
        Self { store }
    }

    /// 将本次结果并入历史存储
    #[instrument(skip_all, fields(new_rows = new.len()))]
    pub fn merge(&self, new: &[HistoryRecord]) -> RepositoryResult<MergeOutcome> {
        let old = self.store.load_all()?;
        let previous = old.len();
        let old_items: HashSet<i64> = old.iter().map(|r| r.item).collect();
        let new_items: HashSet<i64> = new.iter().map(|r| r.item).collect();

        let merged = merge_history(old, new);
        self.store.overwrite_all(&merged)?;

        let updated = new_items.intersection(&old_items).count();
        let outcome = MergeOutcome {
            previous,
            added: new_items.len() - updated,
            updated,
            total: merged.len(),
        };
        info!(
            previous = outcome.previous,
            added = outcome.added,
            updated = outcome.updated,
            total = outcome.total,
            "历史表已更新"
        );
        Ok(outcome)
    }
}
