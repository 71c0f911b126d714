// ==========================================
// 码板装车分配引擎 - 面板布局偏好
// ==========================================
// 三个可拖拽面板的相对宽度（百分比），约定和为 100（不强制）
// 存储: config_kv 固定键，JSON 数组
// ==========================================

use serde::{Deserialize, Serialize};

/// 默认布局: 待码货品 / 装板准备区 / 货板
pub const DEFAULT_PANEL_WIDTHS: [f64; 3] = [30.0, 40.0, 30.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelLayout(pub [f64; 3]);

impl Default for PanelLayout {
    fn default() -> Self {
        PanelLayout(DEFAULT_PANEL_WIDTHS)
    }
}

impl PanelLayout {
    pub fn widths(&self) -> [f64; 3] {
        self.0
    }

    /// 每个宽度均为有限非负数
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|w| w.is_finite() && *w >= 0.0)
    }

    /// 从存储的 JSON 文本解析；损坏或格式不符时返回 None
    pub fn parse(raw: &str) -> Option<Self> {
        let layout: PanelLayout = serde_json::from_str(raw).ok()?;
        if layout.is_valid() {
            Some(layout)
        } else {
            None
        }
    }

    /// 解析失败时回落到默认值
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_default()
    }
}
