use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum SubtrackError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    Network(String),
}

impl SubtrackError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SubtrackError::DatabaseConfig(_) => "E001",
            SubtrackError::DatabaseConnection(_) => "E002",
            SubtrackError::DatabaseOperation(_) => "E003",
            SubtrackError::Validation(_) => "E004",
            SubtrackError::NotFound(_) => "E005",
            SubtrackError::Serialization(_) => "E006",
            SubtrackError::Network(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SubtrackError::DatabaseConfig(_) => "Database Configuration Error",
            SubtrackError::DatabaseConnection(_) => "Database Connection Error",
            SubtrackError::DatabaseOperation(_) => "Database Operation Error",
            SubtrackError::Validation(_) => "Validation Error",
            SubtrackError::NotFound(_) => "Resource Not Found",
            SubtrackError::Serialization(_) => "Serialization Error",
            SubtrackError::Network(_) => "Network Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SubtrackError::DatabaseConfig(msg) => msg,
            SubtrackError::DatabaseConnection(msg) => msg,
            SubtrackError::DatabaseOperation(msg) => msg,
            SubtrackError::Validation(msg) => msg,
            SubtrackError::NotFound(msg) => msg,
            SubtrackError::Serialization(msg) => msg,
            SubtrackError::Network(msg) => msg,
        }
    }

    /// HTTP status the API layer maps this error to
    pub fn http_status(&self) -> StatusCode {
        match self {
            SubtrackError::Validation(_) => StatusCode::BAD_REQUEST,
            SubtrackError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SubtrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SubtrackError {}

// 便捷的构造函数
impl SubtrackError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SubtrackError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SubtrackError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SubtrackError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SubtrackError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SubtrackError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SubtrackError::Serialization(msg.into())
    }

    pub fn network<T: Into<String>>(msg: T) -> Self {
        SubtrackError::Network(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SubtrackError {
    fn from(err: sea_orm::DbErr) -> Self {
        SubtrackError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SubtrackError {
    fn from(err: std::io::Error) -> Self {
        SubtrackError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SubtrackError {
    fn from(err: serde_json::Error) -> Self {
        SubtrackError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SubtrackError>;
