// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库，中文为默认语言，另支持英文
// 覆盖: 调拨结果提示、返回前端的错误消息
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 切换语言（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use pallet_loading::i18n::t;
/// let msg = t("transfer.noop.no_pallets");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息，替换 `%{name}` 占位符
///
/// # 示例
/// ```no_run
/// use pallet_loading::i18n::t_with_args;
/// let msg = t_with_args("transfer.applied_items", &[("count", "3")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

// locale 为进程级全局状态，切换语言的测试需持有此锁
#[cfg(test)]
pub(crate) static LOCALE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_switch() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(current_locale(), "en");
        set_locale("zh-CN");
        assert_eq!(current_locale(), "zh-CN");
    }

    #[test]
    fn test_transfer_messages() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("zh-CN");
        let msg = t_with_args("transfer.applied_items", &[("count", "3")]);
        assert_eq!(msg, "已调拨 3 件货品");
        assert!(t("transfer.noop.no_pallets").contains("新建货板"));

        set_locale("en");
        let msg = t_with_args("transfer.applied_pallets", &[("count", "2")]);
        assert_eq!(msg, "Updated 2 pallet(s)");

        set_locale("zh-CN");
    }

    #[test]
    fn test_error_messages() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args("error.pallet_not_found", &[("pallet_id", "PLT-1")]);
        assert_eq!(msg, "Pallet PLT-1 not found");

        set_locale("zh-CN");
        let msg = t_with_args(
            "error.invalid_state_transition",
            &[("from", "shipping"), ("to", "available")],
        );
        assert_eq!(msg, "无效的状态转换: shipping → available");
    }
}
