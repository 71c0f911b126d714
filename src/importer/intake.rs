// ==========================================
// 码板装车分配引擎 - 货品接入源
// ==========================================
// 职责: 从外部来源取得完整货品记录，供 PoolStore::seed_waiting 使用
// 文件解析为阻塞 IO，放到 spawn_blocking 中执行
// ==========================================

use crate::domain::item::ShipmentItem;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::ItemFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

// ==========================================
// IntakeSource Trait
// ==========================================
#[async_trait]
pub trait IntakeSource: Send + Sync {
    /// 来源标识（用于日志与失败报告）
    fn name(&self) -> String;

    /// 取得本来源的全部货品
    async fn fetch(&self) -> ImportResult<Vec<ShipmentItem>>;
}

// ==========================================
// FileIntakeSource - CSV / Excel 文件
// ==========================================
pub struct FileIntakeSource {
    path: PathBuf,
    mapper: ItemFieldMapper,
}

impl FileIntakeSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mapper: ItemFieldMapper,
        }
    }
}

#[async_trait]
impl IntakeSource for FileIntakeSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> ImportResult<Vec<ShipmentItem>> {
        let path = self.path.clone();
        let mapper = self.mapper;

        let items = tokio::task::spawn_blocking(move || -> ImportResult<Vec<ShipmentItem>> {
            let rows = UniversalFileParser.parse(&path)?;
            mapper.map_rows(&rows)
        })
        .await??;

        info!(source = %self.name(), count = items.len(), "文件解析完成");
        Ok(items)
    }
}

// ==========================================
// StaticIntakeSource - 内存中的固定批次
// ==========================================
pub struct StaticIntakeSource {
    name: String,
    items: Vec<ShipmentItem>,
}

impl StaticIntakeSource {
    pub fn new(name: impl Into<String>, items: Vec<ShipmentItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[async_trait]
impl IntakeSource for StaticIntakeSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn fetch(&self) -> ImportResult<Vec<ShipmentItem>> {
        Ok(self.items.clone())
    }
}

// ==========================================
// 多来源并发汇集
// ==========================================

/// 单个来源失败的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeFailure {
    pub source: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeBatch {
    pub items: Vec<ShipmentItem>,    // 去重后的货品（按来源顺序）
    pub duplicates: Vec<String>,     // 批内重复的货品ID
    pub failures: Vec<IntakeFailure>,
}

impl IntakeBatch {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.failures.is_empty()
    }
}

/// 并发读取所有来源；单个来源失败不影响其他来源
pub async fn gather(sources: &[Box<dyn IntakeSource>]) -> IntakeBatch {
    let tasks = sources.iter().map(|source| async move {
        let name = source.name();
        let result = source.fetch().await;
        (name, result)
    });

    let mut batch = IntakeBatch::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (name, result) in join_all(tasks).await {
        match result {
            Ok(items) => {
                for item in items {
                    if seen.insert(item.id.clone()) {
                        batch.items.push(item);
                    } else {
                        warn!(source = %name, item_id = %item.id, "接入批次内货品ID重复，已跳过");
                        batch.duplicates.push(item.id);
                    }
                }
            }
            Err(e) => {
                error!(source = %name, error = %e, "接入来源读取失败");
                batch.failures.push(IntakeFailure {
                    source: name,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        sources = sources.len(),
        items = batch.items.len(),
        duplicates = batch.duplicates.len(),
        failed = batch.failures.len(),
        "接入汇集完成"
    );
    batch
}

/// 单来源便捷入口：失败即返回错误
pub async fn fetch_one(source: &dyn IntakeSource) -> ImportResult<Vec<ShipmentItem>> {
    let items = source.fetch().await?;
    if items.is_empty() {
        warn!(source = %source.name(), "接入来源为空");
    }
    Ok(items)
}
