// ==========================================
// 码板装车分配引擎 - 领域类型定义
// ==========================================
// 货板状态机: available → loading → loaded → shipping → unloading → available
// 三池: 待码货品 / 装板准备区 / 货板
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 货板状态 (Pallet Status)
// ==========================================
// 序列化格式: lowercase (与前端徽标映射一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PalletStatus {
    Available, // 空闲
    Loading,   // 装车中
    Loaded,    // 已装车
    Shipping,  // 运输中
    Unloading, // 卸车中
}

impl fmt::Display for PalletStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PalletStatus {
    /// 全部状态（按生命周期顺序）
    pub const ALL: [PalletStatus; 5] = [
        PalletStatus::Available,
        PalletStatus::Loading,
        PalletStatus::Loaded,
        PalletStatus::Shipping,
        PalletStatus::Unloading,
    ];

    /// 转换为存储/传输用字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            PalletStatus::Available => "available",
            PalletStatus::Loading => "loading",
            PalletStatus::Loaded => "loaded",
            PalletStatus::Shipping => "shipping",
            PalletStatus::Unloading => "unloading",
        }
    }

    /// 从字符串解析状态（大小写不敏感）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" => Some(PalletStatus::Available),
            "loading" => Some(PalletStatus::Loading),
            "loaded" => Some(PalletStatus::Loaded),
            "shipping" => Some(PalletStatus::Shipping),
            "unloading" => Some(PalletStatus::Unloading),
            _ => None,
        }
    }

    /// 中文徽标文案
    pub fn label_zh(&self) -> &'static str {
        match self {
            PalletStatus::Available => "空闲",
            PalletStatus::Loading => "装车中",
            PalletStatus::Loaded => "已装车",
            PalletStatus::Shipping => "运输中",
            PalletStatus::Unloading => "卸车中",
        }
    }

    /// 生命周期中的下一个状态（环形）
    pub fn next(&self) -> Self {
        match self {
            PalletStatus::Available => PalletStatus::Loading,
            PalletStatus::Loading => PalletStatus::Loaded,
            PalletStatus::Loaded => PalletStatus::Shipping,
            PalletStatus::Shipping => PalletStatus::Unloading,
            PalletStatus::Unloading => PalletStatus::Available,
        }
    }
}

// ==========================================
// 池类型 (Pool Kind)
// ==========================================
// 每个池对应一张表格，也对应一个独立的勾选集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolKind {
    Waiting,   // 待码货品
    Preparing, // 装板准备区
    Pallets,   // 货板列表
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Waiting => write!(f, "WAITING"),
            PoolKind::Preparing => write!(f, "PREPARING"),
            PoolKind::Pallets => write!(f, "PALLETS"),
        }
    }
}

impl PoolKind {
    /// 从字符串解析池类型
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "WAITING" => Some(PoolKind::Waiting),
            "PREPARING" => Some(PoolKind::Preparing),
            "PALLETS" => Some(PoolKind::Pallets),
            _ => None,
        }
    }
}

// ==========================================
// 货品所在位置 (Item Location)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "pool", content = "pallet_id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemLocation {
    Waiting,
    Preparing,
    Pallet(String),
}
