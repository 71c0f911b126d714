// ==========================================
// 码板装车分配引擎 - 货板生命周期
// ==========================================
// 状态环: available → loading → loaded → shipping → unloading → available
// 自动转换: 空闲货板装入货品 → loading
// 人工转换: 确认装车 → loaded, 确认卸车 → available
// 默认策略为宽松模式: 任何目标状态均接受
// ==========================================

use crate::domain::types::PalletStatus;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// 状态转换策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionPolicy {
    /// 不校验来源状态
    #[default]
    Permissive,
    /// 仅允许环上相邻状态 + 卸车回退
    Strict,
}

impl TransitionPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PERMISSIVE" => Some(TransitionPolicy::Permissive),
            "STRICT" => Some(TransitionPolicy::Strict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPolicy::Permissive => "PERMISSIVE",
            TransitionPolicy::Strict => "STRICT",
        }
    }
}

// ==========================================
// PalletLifecycle
// ==========================================
pub struct PalletLifecycle;

impl PalletLifecycle {
    /// 状态转换
    ///
    /// # 返回
    /// - Ok(to): 转换被接受
    /// - Err(IllegalTransition): 严格模式下的非法转换（不做钳制）
    pub fn transition(
        from: PalletStatus,
        to: PalletStatus,
        policy: TransitionPolicy,
    ) -> EngineResult<PalletStatus> {
        match policy {
            TransitionPolicy::Permissive => Ok(to),
            TransitionPolicy::Strict => {
                if Self::is_strict_edge(from, to) {
                    Ok(to)
                } else {
                    Err(EngineError::IllegalTransition { from, to })
                }
            }
        }
    }

    /// 严格模式允许的边
    pub fn is_strict_edge(from: PalletStatus, to: PalletStatus) -> bool {
        from == to
            || from.next() == to
            || matches!(
                (from, to),
                (PalletStatus::Loaded, PalletStatus::Available)
                    | (PalletStatus::Loading, PalletStatus::Available)
            )
    }

    /// 货品装入后的自动推进: 只有 available 会进入 loading
    pub fn on_items_loaded(current: PalletStatus) -> PalletStatus {
        match current {
            PalletStatus::Available => PalletStatus::Loading,
            other => other,
        }
    }

    /// 卸板后的状态: loaded/shipping 回到 available，其余保持
    pub fn on_unloaded(current: PalletStatus) -> PalletStatus {
        match current {
            PalletStatus::Loaded | PalletStatus::Shipping => PalletStatus::Available,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_accepts_everything() {
        for from in PalletStatus::ALL {
            for to in PalletStatus::ALL {
                let result = PalletLifecycle::transition(from, to, TransitionPolicy::Permissive);
                assert_eq!(result, Ok(to));
            }
        }
    }

    #[test]
    fn test_strict_rejects_skips() {
        let result = PalletLifecycle::transition(
            PalletStatus::Available,
            PalletStatus::Shipping,
            TransitionPolicy::Strict,
        );
        assert_eq!(
            result,
            Err(EngineError::IllegalTransition {
                from: PalletStatus::Available,
                to: PalletStatus::Shipping,
            })
        );
    }

    #[test]
    fn test_strict_accepts_cycle_and_unload() {
        for from in PalletStatus::ALL {
            assert!(PalletLifecycle::transition(from, from.next(), TransitionPolicy::Strict).is_ok());
        }
        assert!(PalletLifecycle::transition(
            PalletStatus::Loaded,
            PalletStatus::Available,
            TransitionPolicy::Strict
        )
        .is_ok());
    }

    #[test]
    fn test_auto_transitions() {
        assert_eq!(
            PalletLifecycle::on_items_loaded(PalletStatus::Available),
            PalletStatus::Loading
        );
        assert_eq!(
            PalletLifecycle::on_items_loaded(PalletStatus::Loaded),
            PalletStatus::Loaded
        );
        assert_eq!(
            PalletLifecycle::on_unloaded(PalletStatus::Shipping),
            PalletStatus::Available
        );
        assert_eq!(
            PalletLifecycle::on_unloaded(PalletStatus::Loading),
            PalletStatus::Loading
        );
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(TransitionPolicy::from_str("strict"), Some(TransitionPolicy::Strict));
        assert_eq!(TransitionPolicy::from_str("x"), None);
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Permissive);
    }
}
