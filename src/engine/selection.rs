// ==========================================
// 码板装车分配引擎 - 勾选跟踪 (Selection Tracker)
// ==========================================
// 职责: 三张表格各自的勾选集合（待码货品 / 装板准备区 / 货板）
// 红线: 勾选集合只包含当前仍在对应池中的ID
// 红线: 表格回调给出的是可见行号，必须先映射为稳定ID再保存
// ==========================================

use crate::domain::types::PoolKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTracker {
    waiting: BTreeSet<String>,
    preparing: BTreeSet<String>,
    pallets: BTreeSet<String>,
    /// 用户主动清空过货板勾选后，不再自动选中首个货板
    pallets_cleared_by_user: bool,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self, pool: PoolKind) -> &BTreeSet<String> {
        match pool {
            PoolKind::Waiting => &self.waiting,
            PoolKind::Preparing => &self.preparing,
            PoolKind::Pallets => &self.pallets,
        }
    }

    /// 勾选ID（有序副本）
    pub fn selected_ids(&self, pool: PoolKind) -> Vec<String> {
        self.selected(pool).iter().cloned().collect()
    }

    pub fn is_empty(&self, pool: PoolKind) -> bool {
        self.selected(pool).is_empty()
    }

    pub fn is_selected(&self, pool: PoolKind, id: &str) -> bool {
        self.selected(pool).contains(id)
    }

    /// 整体替换某个池的勾选集合
    ///
    /// # 参数
    /// - present: 判断ID是否仍在该池中，不在的ID直接丢弃
    pub fn set_selection<F>(&mut self, pool: PoolKind, ids: &[String], present: F)
    where
        F: Fn(&str) -> bool,
    {
        let next: BTreeSet<String> = ids.iter().filter(|id| present(id.as_str())).cloned().collect();
        // 只有用户传入空勾选才算主动清空，传入的ID全部失效不算
        if pool == PoolKind::Pallets {
            self.pallets_cleared_by_user = ids.is_empty();
        }
        *self.set_mut(pool) = next;
    }

    /// 按可见行号设置勾选（过滤/排序后的视图）
    ///
    /// # 参数
    /// - rows: 表格回调的可见行号
    /// - visible_ids: 当前可见行对应的ID（按显示顺序）
    ///
    /// 越界行号忽略
    pub fn set_selection_by_rows<F>(
        &mut self,
        pool: PoolKind,
        rows: &[usize],
        visible_ids: &[String],
        present: F,
    ) where
        F: Fn(&str) -> bool,
    {
        let ids: Vec<String> = rows
            .iter()
            .filter_map(|row| visible_ids.get(*row))
            .cloned()
            .collect();
        self.set_selection(pool, &ids, present);
    }

    /// 仅勾选一个ID（替换原勾选）
    pub fn select_only(&mut self, pool: PoolKind, id: &str) {
        let set = self.set_mut(pool);
        set.clear();
        set.insert(id.to_string());
        if pool == PoolKind::Pallets {
            self.pallets_cleared_by_user = false;
        }
    }

    /// 从勾选集合中移除（调拨后同步）
    pub fn remove<'a, I>(&mut self, pool: PoolKind, ids: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        let set = self.set_mut(pool);
        for id in ids {
            set.remove(id);
        }
    }

    pub fn clear(&mut self, pool: PoolKind) {
        self.set_mut(pool).clear();
    }

    /// 首次加载便利: 有货板且尚未勾选时自动勾选首个货板
    ///
    /// # 返回
    /// - true: 发生了自动勾选
    pub fn apply_default_pallet(&mut self, first_pallet: Option<&str>) -> bool {
        if self.pallets_cleared_by_user || !self.pallets.is_empty() {
            return false;
        }
        match first_pallet {
            Some(id) => {
                self.pallets.insert(id.to_string());
                true
            }
            None => false,
        }
    }

    fn set_mut(&mut self, pool: PoolKind) -> &mut BTreeSet<String> {
        match pool {
            PoolKind::Waiting => &mut self.waiting,
            PoolKind::Preparing => &mut self.preparing,
            PoolKind::Pallets => &mut self.pallets,
        }
    }
}
