//! 错误类型定义

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// 未知的属性标签（配置关键字或数字标签）
    #[error("Invalid attribute passed: {0}")]
    InvalidAttribute(String),

    #[error("命令 '{command}' 执行失败: {reason}")]
    CommandFailed { command: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件解析失败: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
