// ==========================================
// 码板装车分配引擎 - 货板领域模型
// ==========================================
// 红线: item_count 由 item_ids.len() 派生，不是独立事实
// ==========================================

use crate::domain::item::ItemView;
use crate::domain::types::PalletStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Pallet - 货板
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    pub id: String,                // 货板ID（PLT-xxxxxxxxxxxx）
    pub name: String,              // 货板名称
    pub alias: Option<String>,     // 别名
    pub status: PalletStatus,      // 生命周期状态
    pub created_at: DateTime<Utc>, // 创建时间
    item_ids: Vec<String>,         // 货板上的货品（有序）
}

impl Pallet {
    /// 创建空货板（状态 available）
    pub fn new(name: String, alias: Option<String>) -> Self {
        Self {
            id: generate_pallet_id(),
            name,
            alias,
            status: PalletStatus::Available,
            created_at: Utc::now(),
            item_ids: Vec::new(),
        }
    }

    /// 货板上的货品ID（有序）
    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    /// 货品数量（派生值）
    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.item_ids.iter().any(|id| id == item_id)
    }

    /// 展示名称（有别名时附带别名）
    pub fn display_name(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{}（{}）", self.name, alias),
            None => self.name.clone(),
        }
    }

    pub(crate) fn push_items(&mut self, ids: impl IntoIterator<Item = String>) {
        self.item_ids.extend(ids);
    }

    pub(crate) fn take_items(&mut self) -> Vec<String> {
        std::mem::take(&mut self.item_ids)
    }
}

/// 生成货板ID
fn generate_pallet_id() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("PLT-{}", raw[..12].to_uppercase())
}

// ==========================================
// PalletView - 货板展示对象
// ==========================================
// 用途: 货板表格 / 外部调度消费方轮询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletView {
    pub id: String,
    pub name: String,
    pub alias: Option<String>,
    pub status: PalletStatus,
    pub status_label: String,
    pub created_at: DateTime<Utc>,
    pub item_count: usize,
    pub items: Vec<ItemView>,
}
