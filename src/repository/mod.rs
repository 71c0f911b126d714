// ==========================================
// 码板装车分配引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 布局偏好的读取（带回落）与写入
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod layout_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use layout_repo::LayoutRepository;
