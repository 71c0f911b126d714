// ==========================================
// 码板装车分配引擎 - 字段映射器
// ==========================================
// 职责: 源列名（中文/英文）→ ShipmentItem 字段 + 类型转换
// 空白单元格视为缺失
// ==========================================

use crate::domain::item::ShipmentItem;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::NaiveDate;

/// 标准字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    ExternalOrderId,
    ProductName,
    Customer,
    ProductStrategy,
    WarehouseArea,
    ArrivalDate,
    Quantity,
    WeightKg,
    VolumeM3,
    Remark,
}

impl Field {
    /// 可接受的列名（别名）
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Id => &["货品编号", "货品ID", "id"],
            Field::ExternalOrderId => &["外部订单号", "订单号", "external_order_id"],
            Field::ProductName => &["品名", "货品名称", "product_name"],
            Field::Customer => &["客户", "客户名称", "customer"],
            Field::ProductStrategy => &["产品策略", "product_strategy"],
            Field::WarehouseArea => &["库区", "warehouse_area"],
            Field::ArrivalDate => &["到货日期", "arrival_date"],
            Field::Quantity => &["数量", "quantity"],
            Field::WeightKg => &["重量", "重量(kg)", "weight_kg"],
            Field::VolumeM3 => &["体积", "体积(m3)", "volume_m3"],
            Field::Remark => &["备注", "remark"],
        }
    }

    fn name(&self) -> &'static str {
        self.aliases()[0]
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ItemFieldMapper;

impl ItemFieldMapper {
    /// 映射一行原始记录
    ///
    /// # 参数
    /// - row_number: 数据行序号（从 1 开始，用于错误定位）
    pub fn map_row(&self, row: &RawRow, row_number: usize) -> ImportResult<ShipmentItem> {
        let id = self
            .get_string(row, Field::Id)
            .ok_or(ImportError::PrimaryKeyMissing(row_number))?;

        let quantity = match self.get_string(row, Field::Quantity) {
            None => 1,
            Some(value) => value
                .parse::<u32>()
                .map_err(|_| ImportError::TypeConversionError {
                    row: row_number,
                    field: Field::Quantity.name().to_string(),
                    message: format!("无法解析为非负整数: {}", value),
                })?,
        };

        Ok(ShipmentItem {
            id,
            external_order_id: self.get_string(row, Field::ExternalOrderId).unwrap_or_default(),
            product_name: self.get_string(row, Field::ProductName).unwrap_or_default(),
            customer: self.get_string(row, Field::Customer).unwrap_or_default(),
            product_strategy: self.get_string(row, Field::ProductStrategy).unwrap_or_default(),
            warehouse_area: self.get_string(row, Field::WarehouseArea).unwrap_or_default(),
            arrival_date: self.parse_date(row, Field::ArrivalDate, row_number)?,
            quantity,
            weight_kg: self.parse_non_negative(row, Field::WeightKg, row_number)?,
            volume_m3: self.parse_non_negative(row, Field::VolumeM3, row_number)?,
            remark: self.get_string(row, Field::Remark),
        })
    }

    /// 映射全部行，遇到第一个错误即停止
    pub fn map_rows(&self, rows: &[RawRow]) -> ImportResult<Vec<ShipmentItem>> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| self.map_row(row, idx + 1))
            .collect()
    }

    /// 提取字符串字段，按别名顺序取第一个非空值
    fn get_string(&self, row: &RawRow, field: Field) -> Option<String> {
        field
            .aliases()
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn parse_non_negative(
        &self,
        row: &RawRow,
        field: Field,
        row_number: usize,
    ) -> ImportResult<Option<f64>> {
        let value = match self.get_string(row, field) {
            None => return Ok(None),
            Some(value) => value,
        };
        let parsed = value
            .parse::<f64>()
            .map_err(|_| ImportError::TypeConversionError {
                row: row_number,
                field: field.name().to_string(),
                message: format!("无法解析为浮点数: {}", value),
            })?;
        if parsed < 0.0 || !parsed.is_finite() {
            return Err(ImportError::NegativeValue {
                row: row_number,
                field: field.name().to_string(),
                value: parsed,
            });
        }
        Ok(Some(parsed))
    }

    /// 解析日期（YYYY-MM-DD / YYYYMMDD / YYYY/MM/DD）
    fn parse_date(
        &self,
        row: &RawRow,
        field: Field,
        row_number: usize,
    ) -> ImportResult<Option<NaiveDate>> {
        let value = match self.get_string(row, field) {
            None => return Ok(None),
            Some(value) => value,
        };
        // Excel 日期单元格可能带时间部分
        let date_part = value.split_whitespace().next().unwrap_or("");
        ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
            .map(Some)
            .ok_or(ImportError::DateFormatError {
                row: row_number,
                field: field.name().to_string(),
                value,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_maps_chinese_headers() {
        let raw = row(&[
            ("货品编号", " ITM001 "),
            ("外部订单号", "SO-88"),
            ("品名", "冷柜"),
            ("客户", "华东物流"),
            ("库区", "A-03"),
            ("到货日期", "2026-05-01"),
            ("数量", "4"),
            ("重量", "120.5"),
        ]);
        let item = ItemFieldMapper.map_row(&raw, 1).unwrap();

        assert_eq!(item.id, "ITM001");
        assert_eq!(item.external_order_id, "SO-88");
        assert_eq!(item.warehouse_area, "A-03");
        assert_eq!(item.arrival_date, NaiveDate::from_ymd_opt(2026, 5, 1));
        assert_eq!(item.quantity, 4);
        assert_eq!(item.weight_kg, Some(120.5));
        assert_eq!(item.volume_m3, None);
        assert_eq!(item.remark, None);
    }

    #[test]
    fn test_maps_english_headers_and_compact_date() {
        let raw = row(&[
            ("id", "X1"),
            ("external_order_id", "EXT"),
            ("arrival_date", "20260120"),
            ("remark", "易碎"),
        ]);
        let item = ItemFieldMapper.map_row(&raw, 3).unwrap();
        assert_eq!(item.arrival_date, NaiveDate::from_ymd_opt(2026, 1, 20));
        assert_eq!(item.quantity, 1);
        assert_eq!(item.remark.as_deref(), Some("易碎"));
    }

    #[test]
    fn test_missing_id_reports_row() {
        let raw = row(&[("货品编号", "  "), ("客户", "甲")]);
        let err = ItemFieldMapper.map_row(&raw, 7).unwrap_err();
        assert!(matches!(err, ImportError::PrimaryKeyMissing(7)));
    }

    #[test]
    fn test_invalid_values() {
        let bad_date = row(&[("id", "A"), ("到货日期", "05/01/2026")]);
        assert!(matches!(
            ItemFieldMapper.map_row(&bad_date, 1),
            Err(ImportError::DateFormatError { .. })
        ));

        let bad_qty = row(&[("id", "A"), ("数量", "-1")]);
        assert!(matches!(
            ItemFieldMapper.map_row(&bad_qty, 1),
            Err(ImportError::TypeConversionError { .. })
        ));

        let negative = row(&[("id", "A"), ("体积", "-0.5")]);
        assert!(matches!(
            ItemFieldMapper.map_row(&negative, 1),
            Err(ImportError::NegativeValue { .. })
        ));
    }

    #[test]
    fn test_map_rows_numbers_from_one() {
        let rows = vec![row(&[("id", "A")]), row(&[("客户", "乙")])];
        let err = ItemFieldMapper.map_rows(&rows).unwrap_err();
        assert!(matches!(err, ImportError::PrimaryKeyMissing(2)));
    }
}
