// ==========================================
// 码板装车分配引擎 - 货品领域模型
// ==========================================
// 红线: 货品只有一份规范记录（登记表），池内只存 ID
// 精简视图 ItemView 在读取时由规范记录派生，不独立保存
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ShipmentItem - 货品完整记录
// ==========================================
// 用途: 接入层写入，待码货品表格展示
// 生命周期: 会话内一直保留在登记表中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentItem {
    // ===== 主键 =====
    pub id: String, // 货品唯一标识（跨池稳定）

    // ===== 展示字段（随货品在池间原样流转）=====
    pub external_order_id: String,         // 外部订单号
    pub product_name: String,              // 品名
    pub customer: String,                  // 客户
    pub product_strategy: String,          // 产品策略
    pub warehouse_area: String,            // 库区
    pub arrival_date: Option<NaiveDate>,   // 到货日期

    // ===== 仅完整记录携带的字段 =====
    pub quantity: u32,              // 件数
    pub weight_kg: Option<f64>,     // 重量（kg）
    pub volume_m3: Option<f64>,     // 体积（m³）
    pub remark: Option<String>,     // 备注
}

// ==========================================
// ItemView - 货品精简视图
// ==========================================
// 用途: 装板准备区、货板明细展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemView {
    pub id: String,
    pub external_order_id: String,
    pub product_name: String,
    pub customer: String,
    pub product_strategy: String,
    pub warehouse_area: String,
    pub arrival_date: Option<NaiveDate>,
}

impl ShipmentItem {
    /// 创建仅含必填字段的货品记录
    pub fn new(id: impl Into<String>, external_order_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            external_order_id: external_order_id.into(),
            product_name: String::new(),
            customer: String::new(),
            product_strategy: String::new(),
            warehouse_area: String::new(),
            arrival_date: None,
            quantity: 1,
            weight_kg: None,
            volume_m3: None,
            remark: None,
        }
    }

    /// 派生精简视图
    pub fn to_view(&self) -> ItemView {
        ItemView {
            id: self.id.clone(),
            external_order_id: self.external_order_id.clone(),
            product_name: self.product_name.clone(),
            customer: self.customer.clone(),
            product_strategy: self.product_strategy.clone(),
            warehouse_area: self.warehouse_area.clone(),
            arrival_date: self.arrival_date,
        }
    }

    /// 关键字检索（货品号/订单号/品名/客户，大小写不敏感）
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        keyword_hit(
            keyword,
            [
                self.id.as_str(),
                self.external_order_id.as_str(),
                self.product_name.as_str(),
                self.customer.as_str(),
            ],
        )
    }
}

impl ItemView {
    /// 关键字检索（与完整记录同口径）
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        keyword_hit(
            keyword,
            [
                self.id.as_str(),
                self.external_order_id.as_str(),
                self.product_name.as_str(),
                self.customer.as_str(),
            ],
        )
    }
}

fn keyword_hit<'a>(keyword: &str, fields: [&'a str; 4]) -> bool {
    let needle = keyword.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}
