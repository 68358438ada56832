//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_journal_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum JournalError {
            $($variant(String),)*
        }

        impl JournalError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(JournalError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(JournalError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(JournalError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl JournalError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        JournalError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_journal_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Authentication("E012", "Authentication Error"),
    AlreadyExists("E014", "Resource Already Exists"),
    InvalidToken("E015", "Invalid Token"),
    Mail("E016", "Mail Delivery Error"),
}

impl JournalError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for JournalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for JournalError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for JournalError {
    fn from(err: sea_orm::DbErr) -> Self {
        JournalError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for JournalError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        JournalError::InvalidToken(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(JournalError::cache_connection("test").code(), "E001");
        assert_eq!(JournalError::database_config("test").code(), "E003");
        assert_eq!(JournalError::validation("test").code(), "E007");
        assert_eq!(JournalError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            JournalError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            JournalError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = JournalError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_domain_error_codes() {
        assert_eq!(JournalError::not_found("Student not found").code(), "E008");
        assert_eq!(JournalError::already_exists("dup").code(), "E014");
        assert_eq!(
            JournalError::invalid_token("expired").error_type(),
            "Invalid Token"
        );
    }

    #[test]
    fn test_db_error_conversion() {
        let err: JournalError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_format_simple() {
        let err = JournalError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
