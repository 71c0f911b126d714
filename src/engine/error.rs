// ==========================================
// 码板装车分配引擎 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 任何错误返回前都不得留下部分修改
// ==========================================

use crate::domain::types::PalletStatus;
use thiserror::Error;

/// 引擎层错误类型
///
/// 空选择/空池等情况不是错误，见 `TransferOutcome::NoOp`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("货板不存在: pallet_id={pallet_id}")]
    PalletNotFound { pallet_id: String },

    #[error("货板名称不能为空")]
    EmptyPalletName,

    #[error("不允许的货板状态转换: from={from} to={to}")]
    IllegalTransition { from: PalletStatus, to: PalletStatus },

    #[error("池成员关系校验失败: {0}")]
    InvariantViolation(String),
}

impl EngineError {
    pub fn pallet_not_found(pallet_id: &str) -> Self {
        EngineError::PalletNotFound {
            pallet_id: pallet_id.to_string(),
        }
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
