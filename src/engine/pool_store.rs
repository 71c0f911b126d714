// ==========================================
// 码板装车分配引擎 - 三池存储 (Pool Store)
// ==========================================
// 职责: 货品在 待码货品 / 装板准备区 / 货板 之间的唯一事实层
// 红线: 任一货品ID在任意时刻只属于一个池
// 红线: 每个操作要么完整生效，要么完全不改动（先校验，后修改）
// ==========================================
// 池内只存货品ID，完整记录保存在登记表（registry）中，
// 精简视图在读取时派生，因此往返调拨不会丢字段。
// ==========================================

use crate::domain::item::{ItemView, ShipmentItem};
use crate::domain::pallet::{Pallet, PalletView};
use crate::domain::summary::PoolSummary;
use crate::domain::types::{ItemLocation, PalletStatus, PoolKind};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lifecycle::{PalletLifecycle, TransitionPolicy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, info, warn};

#[cfg(test)]
mod tests;

// ==========================================
// Scope - 装板范围
// ==========================================
// 选中为空时由编排层决定是否退化为 All，存储层不做隐式判断
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ids", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    Selected(Vec<String>),
    All,
}

// ==========================================
// LoadReport - 装板结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub pallet_id: String,
    pub moved: Vec<String>,
    pub status_before: PalletStatus,
    pub status_after: PalletStatus,
}

// ==========================================
// StageReport - 货板内容转入准备区结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub pallet_id: String,
    pub returned_to_waiting: Vec<String>, // 准备区原有货品（退回待码）
    pub staged: Vec<String>,              // 货板货品（转入准备区）
}

// ==========================================
// PoolStore
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PoolStore {
    registry: HashMap<String, ShipmentItem>,
    waiting: Vec<String>,
    preparing: Vec<String>,
    pallets: Vec<Pallet>,
}

impl PoolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以接入数据初始化
    pub fn with_items(items: Vec<ShipmentItem>) -> Self {
        let mut store = Self::new();
        store.seed_waiting(items);
        store
    }

    // ==========================================
    // 接入
    // ==========================================

    /// 接入货品，登记后放入待码货品
    ///
    /// # 返回
    /// - 实际接入数量（已登记的ID跳过）
    pub fn seed_waiting(&mut self, items: Vec<ShipmentItem>) -> usize {
        let mut accepted = 0;
        for item in items {
            if self.registry.contains_key(&item.id) {
                warn!(item_id = %item.id, "货品已登记，跳过重复接入");
                continue;
            }
            self.waiting.push(item.id.clone());
            self.registry.insert(item.id.clone(), item);
            accepted += 1;
        }
        info!(accepted, waiting = self.waiting.len(), "待码货品接入完成");
        self.debug_check();
        accepted
    }

    // ==========================================
    // 待码货品 ⇄ 装板准备区
    // ==========================================

    /// 装入: 待码货品 → 装板准备区
    ///
    /// 不在待码货品中的ID忽略；空输入为无操作
    pub fn move_to_preparing(&mut self, ids: &[String]) -> Vec<String> {
        let wanted = id_set(ids);
        if wanted.is_empty() {
            return Vec::new();
        }
        let moved = drain_matching(&mut self.waiting, &wanted);
        self.preparing.extend(moved.iter().cloned());
        debug!(moved = moved.len(), "待码货品 → 装板准备区");
        self.debug_check();
        moved
    }

    /// 移出: 装板准备区 → 待码货品（完整记录由登记表还原）
    pub fn move_to_waiting(&mut self, ids: &[String]) -> Vec<String> {
        let wanted = id_set(ids);
        if wanted.is_empty() {
            return Vec::new();
        }
        let moved = drain_matching(&mut self.preparing, &wanted);
        self.waiting.extend(moved.iter().cloned());
        debug!(moved = moved.len(), "装板准备区 → 待码货品");
        self.debug_check();
        moved
    }

    // ==========================================
    // 装板准备区 → 货板
    // ==========================================

    /// 装板
    ///
    /// # 参数
    /// - pallet_id: 目标货板
    /// - scope: Selected(ids) 只装指定货品；All 装整个准备区
    ///
    /// # 返回
    /// - Ok(LoadReport): moved 为空表示无操作（准备区为空或无匹配货品）
    /// - Err(PalletNotFound): 货板不存在，任何池都不改动
    pub fn load_to_pallet(&mut self, pallet_id: &str, scope: &Scope) -> EngineResult<LoadReport> {
        let index = self
            .pallet_index(pallet_id)
            .ok_or_else(|| EngineError::pallet_not_found(pallet_id))?;
        let status_before = self.pallets[index].status;

        let moved = match scope {
            Scope::All => std::mem::take(&mut self.preparing),
            Scope::Selected(ids) => drain_matching(&mut self.preparing, &id_set(ids)),
        };

        if moved.is_empty() {
            debug!(pallet_id, "装板准备区无可装货品，跳过");
            return Ok(LoadReport {
                pallet_id: pallet_id.to_string(),
                moved,
                status_before,
                status_after: status_before,
            });
        }

        let pallet = &mut self.pallets[index];
        pallet.push_items(moved.iter().cloned());
        pallet.status = PalletLifecycle::on_items_loaded(status_before);
        let status_after = pallet.status;

        info!(
            pallet_id,
            moved = moved.len(),
            item_count = pallet.item_count(),
            status_before = %status_before,
            status_after = %status_after,
            "装板完成"
        );
        self.debug_check();

        Ok(LoadReport {
            pallet_id: pallet_id.to_string(),
            moved,
            status_before,
            status_after,
        })
    }

    // ==========================================
    // 货板 → 装板准备区 / 待码货品
    // ==========================================

    /// 卸车: 货板全部货品退回装板准备区（不是待码货品）
    ///
    /// # 返回
    /// - Err(IllegalTransition): 卸车后的状态复位不被策略允许，任何池都不改动
    pub fn unload_pallet(
        &mut self,
        pallet_id: &str,
        policy: TransitionPolicy,
    ) -> EngineResult<Vec<String>> {
        let index = self
            .pallet_index(pallet_id)
            .ok_or_else(|| EngineError::pallet_not_found(pallet_id))?;

        let status_before = self.pallets[index].status;
        let status_after = Self::unload_target(status_before, policy)?;

        let pallet = &mut self.pallets[index];
        let released = pallet.take_items();
        pallet.status = status_after;
        self.preparing.extend(released.iter().cloned());

        info!(
            pallet_id,
            released = released.len(),
            status_before = %status_before,
            status_after = %status_after,
            "卸车完成，货品退回装板准备区"
        );
        self.debug_check();
        Ok(released)
    }

    /// 删除货板: 货品退回待码货品后移除货板
    pub fn delete_pallet(&mut self, pallet_id: &str) -> EngineResult<Vec<String>> {
        let index = self
            .pallet_index(pallet_id)
            .ok_or_else(|| EngineError::pallet_not_found(pallet_id))?;

        let mut pallet = self.pallets.remove(index);
        let released = pallet.take_items();
        self.waiting.extend(released.iter().cloned());

        info!(
            pallet_id,
            released = released.len(),
            remaining_pallets = self.pallets.len(),
            "货板已删除，货品退回待码货品"
        );
        self.debug_check();
        Ok(released)
    }

    /// 货板内容转入装板准备区（预览即暂存策略）
    ///
    /// 准备区原有货品先退回待码货品，再把货板货品移入准备区
    pub fn stage_pallet_contents(&mut self, pallet_id: &str) -> EngineResult<StageReport> {
        let index = self
            .pallet_index(pallet_id)
            .ok_or_else(|| EngineError::pallet_not_found(pallet_id))?;

        let returned_to_waiting = std::mem::take(&mut self.preparing);
        self.waiting.extend(returned_to_waiting.iter().cloned());

        let staged = self.pallets[index].take_items();
        self.preparing.extend(staged.iter().cloned());

        info!(
            pallet_id,
            returned = returned_to_waiting.len(),
            staged = staged.len(),
            "货板内容已转入装板准备区"
        );
        self.debug_check();

        Ok(StageReport {
            pallet_id: pallet_id.to_string(),
            returned_to_waiting,
            staged,
        })
    }

    // ==========================================
    // 货板维护
    // ==========================================

    /// 新建货板
    ///
    /// # 返回
    /// - Ok(pallet_id)
    /// - Err(EmptyPalletName): 名称为空白，不做任何改动
    pub fn create_pallet(&mut self, name: &str, alias: Option<&str>) -> EngineResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyPalletName);
        }
        let alias = alias
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        let pallet = Pallet::new(name.to_string(), alias);
        let pallet_id = pallet.id.clone();
        info!(pallet_id = %pallet_id, name = %pallet.display_name(), "货板已创建");
        self.pallets.push(pallet);

        Ok(pallet_id)
    }

    /// 直接设置货板状态（确认装车/确认卸车等人工确认）
    ///
    /// # 返回
    /// - Ok(previous_status)
    pub fn set_pallet_status(
        &mut self,
        pallet_id: &str,
        status: PalletStatus,
        policy: TransitionPolicy,
    ) -> EngineResult<PalletStatus> {
        let index = self
            .pallet_index(pallet_id)
            .ok_or_else(|| EngineError::pallet_not_found(pallet_id))?;

        let pallet = &mut self.pallets[index];
        let previous = pallet.status;
        pallet.status = PalletLifecycle::transition(previous, status, policy)?;

        info!(pallet_id, from = %previous, to = %pallet.status, "货板状态变更");
        Ok(previous)
    }

    // ==========================================
    // 查询接口
    // ==========================================

    /// 待码货品（完整记录，按池内顺序）
    pub fn waiting_items(&self) -> Vec<&ShipmentItem> {
        self.resolve(&self.waiting).collect()
    }

    /// 装板准备区（精简视图）
    pub fn preparing_items(&self) -> Vec<ItemView> {
        self.resolve(&self.preparing).map(ShipmentItem::to_view).collect()
    }

    pub fn waiting_ids(&self) -> &[String] {
        &self.waiting
    }

    pub fn preparing_ids(&self) -> &[String] {
        &self.preparing
    }

    pub fn pallets(&self) -> &[Pallet] {
        &self.pallets
    }

    pub fn pallet(&self, pallet_id: &str) -> Option<&Pallet> {
        self.pallets.iter().find(|p| p.id == pallet_id)
    }

    pub fn first_pallet_id(&self) -> Option<&str> {
        self.pallets.first().map(|p| p.id.as_str())
    }

    /// 货板货品（精简视图）
    pub fn pallet_items(&self, pallet_id: &str) -> Option<Vec<ItemView>> {
        self.pallet(pallet_id).map(|pallet| {
            self.resolve(pallet.item_ids())
                .map(ShipmentItem::to_view)
                .collect()
        })
    }

    pub fn pallet_view(&self, pallet_id: &str) -> Option<PalletView> {
        self.pallet(pallet_id).map(|pallet| self.to_pallet_view(pallet))
    }

    pub fn pallet_views(&self) -> Vec<PalletView> {
        self.pallets.iter().map(|p| self.to_pallet_view(p)).collect()
    }

    pub fn pallets_with_status(&self, status: PalletStatus) -> Vec<&Pallet> {
        self.pallets.iter().filter(|p| p.status == status).collect()
    }

    /// 登记表查询（任何池中的货品都能还原完整记录）
    pub fn item(&self, item_id: &str) -> Option<&ShipmentItem> {
        self.registry.get(item_id)
    }

    /// 货品当前所在位置
    pub fn locate(&self, item_id: &str) -> Option<ItemLocation> {
        if self.waiting.iter().any(|id| id == item_id) {
            return Some(ItemLocation::Waiting);
        }
        if self.preparing.iter().any(|id| id == item_id) {
            return Some(ItemLocation::Preparing);
        }
        self.pallets
            .iter()
            .find(|p| p.contains(item_id))
            .map(|p| ItemLocation::Pallet(p.id.clone()))
    }

    /// 池中是否存在该ID（货板池按货板ID判断）
    pub fn contains(&self, pool: PoolKind, id: &str) -> bool {
        match pool {
            PoolKind::Waiting => self.waiting.iter().any(|x| x == id),
            PoolKind::Preparing => self.preparing.iter().any(|x| x == id),
            PoolKind::Pallets => self.pallet_index(id).is_some(),
        }
    }

    /// 池内ID列表（货板池为货板ID）
    pub fn pool_ids(&self, pool: PoolKind) -> Vec<String> {
        match pool {
            PoolKind::Waiting => self.waiting.clone(),
            PoolKind::Preparing => self.preparing.clone(),
            PoolKind::Pallets => self.pallets.iter().map(|p| p.id.clone()).collect(),
        }
    }

    pub fn summary(&self) -> PoolSummary {
        let mut status_counts = BTreeMap::new();
        for pallet in &self.pallets {
            *status_counts.entry(pallet.status).or_insert(0) += 1;
        }
        PoolSummary {
            registered_count: self.registry.len(),
            waiting_count: self.waiting.len(),
            preparing_count: self.preparing.len(),
            pallet_count: self.pallets.len(),
            palletized_count: self.pallets.iter().map(Pallet::item_count).sum(),
            status_counts,
        }
    }

    // ==========================================
    // 一致性校验
    // ==========================================

    /// 校验单一归属: 每个登记货品恰好出现在一个池中
    pub fn check_invariants(&self) -> EngineResult<()> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let pallet_ids = self.pallets.iter().flat_map(|p| p.item_ids().iter());
        for id in self.waiting.iter().chain(self.preparing.iter()).chain(pallet_ids) {
            *seen.entry(id.as_str()).or_insert(0) += 1;
        }

        for (id, count) in &seen {
            if !self.registry.contains_key(*id) {
                return Err(EngineError::InvariantViolation(format!(
                    "货品 {} 未登记",
                    id
                )));
            }
            if *count > 1 {
                return Err(EngineError::InvariantViolation(format!(
                    "货品 {} 同时出现在 {} 个位置",
                    id, count
                )));
            }
        }

        if let Some(lost) = self.registry.keys().find(|id| !seen.contains_key(id.as_str())) {
            return Err(EngineError::InvariantViolation(format!(
                "货品 {} 不在任何池中",
                lost
            )));
        }
        Ok(())
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 卸车后的目标状态（经策略校验）
    pub(crate) fn unload_target(
        current: PalletStatus,
        policy: TransitionPolicy,
    ) -> EngineResult<PalletStatus> {
        PalletLifecycle::transition(current, PalletLifecycle::on_unloaded(current), policy)
    }

    fn pallet_index(&self, pallet_id: &str) -> Option<usize> {
        self.pallets.iter().position(|p| p.id == pallet_id)
    }

    fn resolve<'a>(&'a self, ids: &'a [String]) -> impl Iterator<Item = &'a ShipmentItem> + 'a {
        ids.iter().filter_map(move |id| self.registry.get(id))
    }

    fn to_pallet_view(&self, pallet: &Pallet) -> PalletView {
        let items: Vec<ItemView> = self
            .resolve(pallet.item_ids())
            .map(ShipmentItem::to_view)
            .collect();
        PalletView {
            id: pallet.id.clone(),
            name: pallet.name.clone(),
            alias: pallet.alias.clone(),
            status: pallet.status,
            status_label: pallet.status.label_zh().to_string(),
            created_at: pallet.created_at,
            item_count: items.len(),
            items,
        }
    }

    fn debug_check(&self) {
        debug_assert!(
            self.check_invariants().is_ok(),
            "pool invariant broken: {:?}",
            self.check_invariants()
        );
    }
}

/// 去重后的ID集合（批次内重复ID按一次处理）
fn id_set(ids: &[String]) -> HashSet<&str> {
    ids.iter().map(String::as_str).collect()
}

/// 按池内顺序取出匹配的ID
fn drain_matching(pool: &mut Vec<String>, wanted: &HashSet<&str>) -> Vec<String> {
    if wanted.is_empty() {
        return Vec::new();
    }
    let mut moved = Vec::new();
    pool.retain(|id| {
        if wanted.contains(id.as_str()) {
            moved.push(id.clone());
            false
        } else {
            true
        }
    });
    moved
}
