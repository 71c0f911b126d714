// ==========================================
// 码板装车分配引擎 - 接入层
// ==========================================
// 职责: 外部货品数据接入，生成完整货品记录
// 支持: Excel, CSV, 内存批次
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod intake;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::ItemFieldMapper;
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use intake::{
    fetch_one, gather, FileIntakeSource, IntakeBatch, IntakeFailure, IntakeSource,
    StaticIntakeSource,
};
