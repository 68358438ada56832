//! 配置管理：config.toml → config.{APP_ENV}.toml → JOURNAL__* 环境变量 → 常用环境变量

mod r#impl;
mod structs;

pub use r#impl::DEFAULT_JWT_SECRET;
pub use structs::*;
