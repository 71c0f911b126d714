// ==========================================
// 码板装车分配引擎 - API层错误类型
// ==========================================
// 职责: 把引擎/仓储/接入错误转换为面向用户的错误消息
// ==========================================

use crate::engine::error::EngineError;
use crate::i18n;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("无效的状态转换: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 接入错误
    // ==========================================
    #[error("货品接入失败: {0}")]
    ImportError(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 前端使用的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::DatabaseConnectionError(_) => "DATABASE_CONNECTION_ERROR",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// 按当前语言生成的错误消息（返回前端时使用）
    pub fn localized_message(&self) -> String {
        let (key, detail) = match self {
            ApiError::InvalidStateTransition { from, to } => {
                return i18n::t_with_args(
                    "error.invalid_state_transition",
                    &[("from", from.as_str()), ("to", to.as_str())],
                );
            }
            ApiError::InvalidInput(msg) => ("error.invalid_input", msg.clone()),
            ApiError::NotFound(msg) => ("error.not_found", msg.clone()),
            ApiError::BusinessRuleViolation(msg) => ("error.business_rule_violation", msg.clone()),
            ApiError::DatabaseError(msg) => ("error.database_error", msg.clone()),
            ApiError::DatabaseConnectionError(msg) => {
                ("error.database_connection_error", msg.clone())
            }
            ApiError::ImportError(msg) => ("error.import_error", msg.clone()),
            ApiError::ValidationError(msg) => ("error.validation_error", msg.clone()),
            ApiError::InternalError(msg) => ("error.internal_error", msg.clone()),
            ApiError::Other(err) => ("error.other", err.to_string()),
        };
        i18n::t_with_args(key, &[("detail", detail.as_str())])
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::PalletNotFound { pallet_id } => ApiError::NotFound(i18n::t_with_args(
                "error.pallet_not_found",
                &[("pallet_id", pallet_id.as_str())],
            )),
            EngineError::EmptyPalletName => {
                ApiError::InvalidInput(i18n::t("error.empty_pallet_name"))
            }
            EngineError::IllegalTransition { from, to } => ApiError::InvalidStateTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            },
            EngineError::InvariantViolation(msg) => ApiError::InternalError(msg),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::SerializationError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件不存在: {}", path)),
            ImportError::UnsupportedFormat(_) => ApiError::InvalidInput(err.to_string()),
            ImportError::PrimaryKeyMissing(_)
            | ImportError::TypeConversionError { .. }
            | ImportError::DateFormatError { .. }
            | ImportError::NegativeValue { .. } => ApiError::ValidationError(err.to_string()),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PalletStatus;

    #[test]
    fn test_engine_error_conversion() {
        let api_err: ApiError = EngineError::pallet_not_found("PLT-1").into();
        match api_err {
            ApiError::NotFound(msg) => assert!(msg.contains("PLT-1")),
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let api_err: ApiError = EngineError::IllegalTransition {
            from: PalletStatus::Available,
            to: PalletStatus::Shipping,
        }
        .into();
        match api_err {
            ApiError::InvalidStateTransition { from, to } => {
                assert_eq!(from, "available");
                assert_eq!(to, "shipping");
            }
            other => panic!("Expected InvalidStateTransition, got {:?}", other),
        }

        let api_err: ApiError = EngineError::EmptyPalletName.into();
        assert_eq!(api_err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Layout".to_string(),
            id: "global".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Layout"));
                assert!(msg.contains("global"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let api_err: ApiError = RepositoryError::LockError("poisoned".to_string()).into();
        assert_eq!(api_err.code(), "DATABASE_CONNECTION_ERROR");
    }

    #[test]
    fn test_import_error_conversion() {
        let api_err: ApiError = ImportError::PrimaryKeyMissing(4).into();
        match api_err {
            ApiError::ValidationError(msg) => assert!(msg.contains("行 4")),
            other => panic!("Expected ValidationError, got {:?}", other),
        }

        let api_err: ApiError = ImportError::CsvParseError("bad quote".to_string()).into();
        assert_eq!(api_err.code(), "IMPORT_ERROR");
    }

    #[test]
    fn test_localized_message_follows_locale() {
        let _guard = crate::i18n::LOCALE_TEST_LOCK.lock().unwrap();

        i18n::set_locale("zh-CN");
        let api_err: ApiError = EngineError::pallet_not_found("PLT-1").into();
        assert_eq!(api_err.localized_message(), "资源未找到: 货板 PLT-1 不存在");
        let api_err: ApiError = EngineError::IllegalTransition {
            from: PalletStatus::Shipping,
            to: PalletStatus::Available,
        }
        .into();
        assert_eq!(
            api_err.localized_message(),
            "无效的状态转换: shipping → available"
        );

        i18n::set_locale("en");
        let api_err: ApiError = EngineError::pallet_not_found("PLT-1").into();
        assert_eq!(api_err.localized_message(), "Not found: Pallet PLT-1 not found");
        let api_err: ApiError = EngineError::EmptyPalletName.into();
        assert_eq!(
            api_err.localized_message(),
            "Invalid input: Pallet name must not be empty"
        );
        let api_err = ApiError::DatabaseError("disk full".to_string());
        assert_eq!(api_err.localized_message(), "Database error: disk full");

        i18n::set_locale("zh-CN");
    }
}
