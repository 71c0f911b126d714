// ==========================================
// 码板装车分配引擎 - 引擎层
// ==========================================
// 职责: 三池调拨、勾选跟踪、货板状态机
// 红线: 引擎层不访问数据库，所有池的修改只经过 PoolStore 操作入口
// ==========================================

pub mod error;
pub mod lifecycle;
pub mod pool_store;
pub mod selection;
pub mod transfer;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use lifecycle::{PalletLifecycle, TransitionPolicy};
pub use pool_store::{LoadReport, PoolStore, Scope, StageReport};
pub use selection::SelectionTracker;
pub use transfer::{LoadingWorkbench, NoOpReason, PalletPreview, TransferOutcome};
