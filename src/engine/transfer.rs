// ==========================================
// 码板装车分配引擎 - 调拨编排 (Transfer Operations)
// ==========================================
// 职责: 把按钮操作（装入/移出/装板/删除/装车/卸车）翻译为 PoolStore 调用
//       并同步勾选集合
// 红线: 编排层不直接改集合，只调用 PoolStore 的操作入口
// 红线: "选中为空 = 全部" 只出现在装板操作中，且以 Scope 显式表达
// ==========================================

use crate::config::engine_config::{EngineConfig, PreviewMode};
use crate::domain::item::{ItemView, ShipmentItem};
use crate::domain::types::{PalletStatus, PoolKind};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::lifecycle::PalletLifecycle;
use crate::engine::pool_store::{PoolStore, Scope, StageReport};
use crate::engine::selection::SelectionTracker;
use crate::i18n;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};


// ==========================================
// 调拨结果
// ==========================================

/// 无操作原因（不是错误）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoOpReason {
    EmptySelection, // 未勾选或勾选项均不在源池
    EmptyPool,      // 源池为空
    NoPallets,      // 没有任何货板
}

impl NoOpReason {
    fn message_key(&self) -> &'static str {
        match self {
            NoOpReason::EmptySelection => "transfer.noop.empty_selection",
            NoOpReason::EmptyPool => "transfer.noop.empty_pool",
            NoOpReason::NoPallets => "transfer.noop.no_pallets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferOutcome {
    Applied {
        moved: Vec<String>,   // 被调拨的货品ID
        pallets: Vec<String>, // 涉及的货板ID
    },
    NoOp {
        reason: NoOpReason,
    },
}

impl TransferOutcome {
    fn applied(moved: Vec<String>, pallets: Vec<String>) -> Self {
        TransferOutcome::Applied { moved, pallets }
    }

    fn noop(reason: NoOpReason) -> Self {
        TransferOutcome::NoOp { reason }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, TransferOutcome::Applied { .. })
    }

    pub fn moved(&self) -> &[String] {
        match self {
            TransferOutcome::Applied { moved, .. } => moved.as_slice(),
            TransferOutcome::NoOp { .. } => &[],
        }
    }

    pub fn noop_reason(&self) -> Option<NoOpReason> {
        match self {
            TransferOutcome::NoOp { reason } => Some(*reason),
            TransferOutcome::Applied { .. } => None,
        }
    }

    /// 提示文案（按当前语言）
    pub fn message(&self) -> String {
        match self {
            TransferOutcome::NoOp { reason } => i18n::t(reason.message_key()),
            TransferOutcome::Applied { moved, pallets } if moved.is_empty() => {
                let count = pallets.len().to_string();
                i18n::t_with_args("transfer.applied_pallets", &[("count", count.as_str())])
            }
            TransferOutcome::Applied { moved, .. } => {
                let count = moved.len().to_string();
                i18n::t_with_args("transfer.applied_items", &[("count", count.as_str())])
            }
        }
    }
}

// ==========================================
// 货板预览结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletPreview {
    pub pallet_id: String,
    pub mode: PreviewMode,
    pub items: Vec<ItemView>,          // 预览展示的货品
    pub staged: Option<StageReport>,   // Stage 模式下的实际调拨
}

// ==========================================
// LoadingWorkbench - 码板装车工作台
// ==========================================
#[derive(Debug, Clone)]
pub struct LoadingWorkbench {
    store: PoolStore,
    selection: SelectionTracker,
    config: EngineConfig,
}

impl LoadingWorkbench {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(PoolStore::new(), config)
    }

    /// 以已有存储创建（会应用首个货板默认勾选）
    pub fn with_store(store: PoolStore, config: EngineConfig) -> Self {
        let mut workbench = Self {
            store,
            selection: SelectionTracker::new(),
            config,
        };
        workbench.apply_default_selection();
        workbench
    }

    pub fn store(&self) -> &PoolStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// 接入货品到待码货品
    pub fn seed_waiting(&mut self, items: Vec<ShipmentItem>) -> usize {
        let accepted = self.store.seed_waiting(items);
        self.apply_default_selection();
        accepted
    }

    // ==========================================
    // 勾选
    // ==========================================

    pub fn set_selection(&mut self, pool: PoolKind, ids: &[String]) {
        let store = &self.store;
        self.selection
            .set_selection(pool, ids, |id| store.contains(pool, id));
        debug!(pool = %pool, selected = self.selection.selected(pool).len(), "勾选已更新");
    }

    pub fn set_selection_by_rows(&mut self, pool: PoolKind, rows: &[usize], visible_ids: &[String]) {
        let store = &self.store;
        self.selection
            .set_selection_by_rows(pool, rows, visible_ids, |id| store.contains(pool, id));
    }

    // ==========================================
    // 直接调拨（带勾选同步）
    // ==========================================

    /// 待码货品 → 装板准备区
    pub fn move_to_preparing(&mut self, ids: &[String]) -> TransferOutcome {
        if ids.is_empty() {
            return TransferOutcome::noop(NoOpReason::EmptySelection);
        }
        let moved = self.store.move_to_preparing(ids);
        self.selection.remove(PoolKind::Waiting, &moved);
        Self::items_outcome(moved)
    }

    /// 装板准备区 → 待码货品
    pub fn move_to_waiting(&mut self, ids: &[String]) -> TransferOutcome {
        if ids.is_empty() {
            return TransferOutcome::noop(NoOpReason::EmptySelection);
        }
        let moved = self.store.move_to_waiting(ids);
        self.selection.remove(PoolKind::Preparing, &moved);
        Self::items_outcome(moved)
    }

    /// 指定货板与范围装板
    pub fn load_to_pallet_scoped(
        &mut self,
        pallet_id: &str,
        scope: Scope,
    ) -> EngineResult<TransferOutcome> {
        if self.store.pallet(pallet_id).is_none() {
            return Err(EngineError::pallet_not_found(pallet_id));
        }
        if self.store.preparing_ids().is_empty() {
            return Ok(TransferOutcome::noop(NoOpReason::EmptyPool));
        }
        let report = self.store.load_to_pallet(pallet_id, &scope)?;
        self.selection.remove(PoolKind::Preparing, &report.moved);
        if report.moved.is_empty() {
            return Ok(TransferOutcome::noop(NoOpReason::EmptySelection));
        }
        Ok(TransferOutcome::applied(report.moved, vec![report.pallet_id]))
    }

    /// 卸车（货品回装板准备区）
    pub fn unload_pallet(&mut self, pallet_id: &str) -> EngineResult<TransferOutcome> {
        let released = self
            .store
            .unload_pallet(pallet_id, self.config.transition_policy)?;
        Ok(TransferOutcome::applied(released, vec![pallet_id.to_string()]))
    }

    /// 删除货板（货品回待码货品）
    pub fn delete_pallet(&mut self, pallet_id: &str) -> EngineResult<TransferOutcome> {
        let released = self.store.delete_pallet(pallet_id)?;
        self.selection
            .remove(PoolKind::Pallets, std::iter::once(&pallet_id.to_string()));
        Ok(TransferOutcome::applied(released, vec![pallet_id.to_string()]))
    }

    /// 新建货板，并令其成为唯一勾选
    pub fn create_pallet(&mut self, name: &str, alias: Option<&str>) -> EngineResult<String> {
        let pallet_id = self.store.create_pallet(name, alias)?;
        self.selection.select_only(PoolKind::Pallets, &pallet_id);
        Ok(pallet_id)
    }

    /// 直接设置货板状态
    pub fn set_pallet_status(
        &mut self,
        pallet_id: &str,
        status: PalletStatus,
    ) -> EngineResult<PalletStatus> {
        self.store
            .set_pallet_status(pallet_id, status, self.config.transition_policy)
    }

    // ==========================================
    // 按钮操作（基于勾选）
    // ==========================================

    /// 装入: 勾选的待码货品 → 装板准备区
    pub fn add_to_preparing(&mut self) -> TransferOutcome {
        let ids = self.selection.selected_ids(PoolKind::Waiting);
        let outcome = self.move_to_preparing(&ids);
        info!(selected = ids.len(), moved = outcome.moved().len(), "装入装板准备区");
        outcome
    }

    /// 移出: 勾选的准备区货品 → 待码货品
    pub fn remove_from_preparing(&mut self) -> TransferOutcome {
        let ids = self.selection.selected_ids(PoolKind::Preparing);
        let outcome = self.move_to_waiting(&ids);
        info!(selected = ids.len(), moved = outcome.moved().len(), "移出装板准备区");
        outcome
    }

    /// 装板: 勾选的准备区货品（未勾选则全部）→ 勾选的货板
    ///
    /// 未勾选货板时自动勾选首个货板；没有货板时为无操作
    pub fn load_to_pallet(&mut self) -> EngineResult<TransferOutcome> {
        let first = match self.store.first_pallet_id() {
            Some(id) => id.to_string(),
            None => return Ok(TransferOutcome::noop(NoOpReason::NoPallets)),
        };
        if self.selection.is_empty(PoolKind::Pallets) {
            self.selection.select_only(PoolKind::Pallets, &first);
        }
        let target = self
            .selected_pallets_in_order()
            .into_iter()
            .next()
            .unwrap_or(first);

        let selected = self.selection.selected_ids(PoolKind::Preparing);
        let scope = if selected.is_empty() {
            Scope::All
        } else {
            Scope::Selected(selected)
        };
        info!(pallet_id = %target, scope = ?scope, "装板");
        self.load_to_pallet_scoped(&target, scope)
    }

    /// 删除勾选货板；完成后首个剩余货板成为新的勾选
    pub fn delete_selected_pallets(&mut self) -> EngineResult<TransferOutcome> {
        let targets = self.selected_pallets_in_order();
        if targets.is_empty() {
            return Ok(TransferOutcome::noop(NoOpReason::EmptySelection));
        }

        let mut released = Vec::new();
        for pallet_id in &targets {
            released.extend(self.store.delete_pallet(pallet_id)?);
        }

        self.selection.clear(PoolKind::Pallets);
        if let Some(first) = self.store.first_pallet_id().map(str::to_string) {
            self.selection.select_only(PoolKind::Pallets, &first);
        }

        info!(deleted = targets.len(), released = released.len(), "批量删除货板");
        Ok(TransferOutcome::applied(released, targets))
    }

    /// 装车: 勾选货板 → loading
    pub fn start_selected_loading(&mut self) -> EngineResult<TransferOutcome> {
        self.set_selected_status(PalletStatus::Loading)
    }

    /// 确认装车: 勾选货板 → loaded
    pub fn load_selected_to_vehicle(&mut self) -> EngineResult<TransferOutcome> {
        self.set_selected_status(PalletStatus::Loaded)
    }

    /// 确认卸车: 勾选货板的货品全部退回装板准备区（先全部校验，再统一卸车）
    pub fn unload_selected_pallets(&mut self) -> EngineResult<TransferOutcome> {
        let targets = self.selected_pallets_in_order();
        if targets.is_empty() {
            return Ok(TransferOutcome::noop(NoOpReason::EmptySelection));
        }

        let policy = self.config.transition_policy;
        for pallet_id in &targets {
            let pallet = self
                .store
                .pallet(pallet_id)
                .ok_or_else(|| EngineError::pallet_not_found(pallet_id))?;
            PoolStore::unload_target(pallet.status, policy)?;
        }

        let mut released = Vec::new();
        for pallet_id in &targets {
            released.extend(self.store.unload_pallet(pallet_id, policy)?);
        }

        info!(pallets = targets.len(), released = released.len(), "批量卸车");
        Ok(TransferOutcome::applied(released, targets))
    }

    /// 批量设置勾选货板状态（先全部校验，再统一修改）
    pub fn set_selected_status(&mut self, status: PalletStatus) -> EngineResult<TransferOutcome> {
        let targets = self.selected_pallets_in_order();
        if targets.is_empty() {
            return Ok(TransferOutcome::noop(NoOpReason::EmptySelection));
        }

        let policy = self.config.transition_policy;
        for pallet_id in &targets {
            let pallet = self
                .store
                .pallet(pallet_id)
                .ok_or_else(|| EngineError::pallet_not_found(pallet_id))?;
            PalletLifecycle::transition(pallet.status, status, policy)?;
        }
        for pallet_id in &targets {
            self.store.set_pallet_status(pallet_id, status, policy)?;
        }

        info!(pallets = targets.len(), status = %status, "批量设置货板状态");
        Ok(TransferOutcome::applied(Vec::new(), targets))
    }

    /// 点击货板行: 勾选该货板并按预览策略展示其货品
    ///
    /// Stage 模式会真实调拨（准备区原货品退回待码，货板货品转入准备区）；
    /// ReadOnly 模式不改动任何池。策略只在此处生效。
    pub fn select_and_preview_pallet(&mut self, pallet_id: &str) -> EngineResult<PalletPreview> {
        if self.store.pallet(pallet_id).is_none() {
            return Err(EngineError::pallet_not_found(pallet_id));
        }
        self.selection.select_only(PoolKind::Pallets, pallet_id);

        let mode = self.config.preview_mode;
        let preview = match mode {
            PreviewMode::Stage => {
                let report = self.store.stage_pallet_contents(pallet_id)?;
                self.selection
                    .remove(PoolKind::Preparing, &report.returned_to_waiting);
                PalletPreview {
                    pallet_id: pallet_id.to_string(),
                    mode,
                    items: self.store.preparing_items(),
                    staged: Some(report),
                }
            }
            PreviewMode::ReadOnly => PalletPreview {
                pallet_id: pallet_id.to_string(),
                mode,
                items: self.store.pallet_items(pallet_id).unwrap_or_default(),
                staged: None,
            },
        };

        debug!(pallet_id, mode = mode.as_str(), items = preview.items.len(), "货板预览");
        Ok(preview)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 勾选货板（按货板列表顺序）
    fn selected_pallets_in_order(&self) -> Vec<String> {
        self.store
            .pallets()
            .iter()
            .filter(|p| self.selection.is_selected(PoolKind::Pallets, &p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    fn apply_default_selection(&mut self) {
        if !self.config.auto_select_first_pallet {
            return;
        }
        if self.selection.apply_default_pallet(self.store.first_pallet_id()) {
            debug!("自动勾选首个货板");
        }
    }

    fn items_outcome(moved: Vec<String>) -> TransferOutcome {
        if moved.is_empty() {
            TransferOutcome::noop(NoOpReason::EmptySelection)
        } else {
            TransferOutcome::applied(moved, Vec::new())
        }
    }
}

impl Default for LoadingWorkbench {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
