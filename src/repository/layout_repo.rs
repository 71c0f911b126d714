// ==========================================
// 码板装车分配引擎 - 面板布局仓储
// ==========================================
// 职责: config_kv 表中固定键的读写（scope_id='global'）
// 读: 缺失/损坏 → 默认布局，不报错
// 写: 每次拖拽结束写入
// ==========================================

use crate::config::config_keys;
use crate::db::{ensure_config_schema, open_sqlite_connection};
use crate::domain::layout::PanelLayout;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct LayoutRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LayoutRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        {
            let conn = repo.get_conn()?;
            ensure_config_schema(&conn)?;
        }
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取原始存储值
    pub fn load_raw(&self) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let raw = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![config_keys::PANEL_LAYOUT],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    /// 读取布局，缺失或损坏时回落默认值
    ///
    /// 仅数据库本身不可用时返回错误
    pub fn load(&self) -> RepositoryResult<PanelLayout> {
        let raw = self.load_raw()?;
        match raw.as_deref().map(|value| (value, PanelLayout::parse(value))) {
            Some((_, Some(layout))) => Ok(layout),
            Some((value, None)) => {
                tracing::warn!(raw_value = %value, "面板布局存储值损坏，使用默认布局");
                Ok(PanelLayout::default())
            }
            None => {
                tracing::debug!("未找到面板布局，使用默认布局");
                Ok(PanelLayout::default())
            }
        }
    }

    /// 读取布局；数据库不可用也回落默认值
    pub fn load_or_default(&self) -> PanelLayout {
        self.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "读取面板布局失败，使用默认布局");
            PanelLayout::default()
        })
    }

    /// 写入布局
    pub fn save(&self, layout: &PanelLayout) -> RepositoryResult<()> {
        if !layout.is_valid() {
            return Err(RepositoryError::ValidationError(format!(
                "面板宽度必须为非负有限数: {:?}",
                layout.widths()
            )));
        }
        let value = serde_json::to_string(layout)?;

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![config_keys::PANEL_LAYOUT, value],
        )?;

        tracing::debug!(widths = ?layout.widths(), "面板布局已保存");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn repo_in_memory() -> LayoutRepository {
        let conn = Connection::open_in_memory().unwrap();
        LayoutRepository::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_missing_layout_is_default() {
        let repo = repo_in_memory();
        assert_eq!(repo.load().unwrap(), PanelLayout::default());
        assert_eq!(repo.load_raw().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let repo = repo_in_memory();
        repo.save(&PanelLayout([20.0, 50.0, 30.0])).unwrap();
        assert_eq!(repo.load().unwrap(), PanelLayout([20.0, 50.0, 30.0]));

        repo.save(&PanelLayout([33.0, 34.0, 33.0])).unwrap();
        assert_eq!(repo.load().unwrap().widths(), [33.0, 34.0, 33.0]);
    }

    #[test]
    fn test_corrupt_value_falls_back() {
        let repo = repo_in_memory();
        {
            let conn = repo.get_conn().unwrap();
            conn.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, 'garbage')",
                params![config_keys::PANEL_LAYOUT],
            )
            .unwrap();
        }
        assert_eq!(repo.load().unwrap(), PanelLayout::default());
    }

    #[test]
    fn test_rejects_invalid_widths() {
        let repo = repo_in_memory();
        let err = repo.save(&PanelLayout([f64::NAN, 50.0, 50.0])).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
        assert_eq!(repo.load_raw().unwrap(), None);
    }

    #[test]
    fn test_survives_reopen() {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        LayoutRepository::new(&db_path)
            .unwrap()
            .save(&PanelLayout([10.0, 60.0, 30.0]))
            .unwrap();

        let reopened = LayoutRepository::new(&db_path).unwrap();
        assert_eq!(reopened.load_or_default(), PanelLayout([10.0, 60.0, 30.0]));
    }
}
