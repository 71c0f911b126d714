// ==========================================
// 码板装车分配引擎 - 领域模型层
// ==========================================
// 职责: 定义货品、货板、布局偏好等实体与枚举
// 红线: 不含池调拨逻辑,不含持久化逻辑
// ==========================================

pub mod item;
pub mod layout;
pub mod pallet;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use item::{ItemView, ShipmentItem};
pub use layout::{PanelLayout, DEFAULT_PANEL_WIDTHS};
pub use pallet::{Pallet, PalletView};
pub use summary::PoolSummary;
pub use types::{ItemLocation, PalletStatus, PoolKind};
