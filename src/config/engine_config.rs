// ==========================================
// 码板装车分配引擎 - 引擎策略配置
// ==========================================
// 存储: config_kv 表（scope_id='global'），缺失/非法值回落默认
// ==========================================

use crate::engine::lifecycle::TransitionPolicy;
use serde::{Deserialize, Serialize};

// ==========================================
// 货板预览策略
// ==========================================
// Stage: 点击货板行时把货板货品转入装板准备区（原准备区货品退回待码）
// ReadOnly: 只返回货板货品视图，不改动任何池
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PreviewMode {
    #[default]
    Stage,
    ReadOnly,
}

impl PreviewMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "STAGE" => Some(PreviewMode::Stage),
            "READ_ONLY" => Some(PreviewMode::ReadOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreviewMode::Stage => "STAGE",
            PreviewMode::ReadOnly => "READ_ONLY",
        }
    }
}

// ==========================================
// EngineConfig
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub preview_mode: PreviewMode,           // 货板预览策略
    pub transition_policy: TransitionPolicy, // 状态转换策略
    pub auto_select_first_pallet: bool,      // 首次加载自动勾选首个货板
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preview_mode: PreviewMode::Stage,
            transition_policy: TransitionPolicy::Permissive,
            auto_select_first_pallet: true,
        }
    }
}
