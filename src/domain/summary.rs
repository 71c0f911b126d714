// ==========================================
// 码板装车分配引擎 - 池汇总
// ==========================================
// 用途: 顶部统计卡片 / 控制台输出
// ==========================================

use crate::domain::types::PalletStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub registered_count: usize,                      // 登记表中的货品总数
    pub waiting_count: usize,                         // 待码货品数
    pub preparing_count: usize,                       // 装板准备区货品数
    pub pallet_count: usize,                          // 货板数
    pub palletized_count: usize,                      // 已上板货品数
    pub status_counts: BTreeMap<PalletStatus, usize>, // 各状态货板数
}

impl PoolSummary {
    /// 三池货品数之和与登记数是否一致
    pub fn is_balanced(&self) -> bool {
        self.waiting_count + self.preparing_count + self.palletized_count == self.registered_count
    }
}
