//! 显示用的格式化函数

use crate::package_manager::Depend;
use chrono::{DateTime, TimeZone};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 字节数换算为带单位的字符串，保留两位小数
pub fn size_to_string(size: i64) -> String {
    // 用 f64 计算，不用单精度 float；进位规则相同，只在严格大于 1024 时进位
    let mut value = size as f64;
    let mut unit = 0;

    while value > 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.2} {}", value, SIZE_UNITS[unit])
}

/// 去掉首尾的空格、制表符和换行；None 视为空串
pub fn trim_str(s: Option<&str>) -> String {
    match s {
        Some(s) => s.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\n').to_string(),
        None => String::new(),
    }
}

pub fn list_to_string<S: AsRef<str>>(items: &[S], delim: &str) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(delim)
}

pub fn deplist_to_string(deps: &[Depend], delim: &str) -> String {
    deps.iter()
        .map(Depend::compute_string)
        .collect::<Vec<_>>()
        .join(delim)
}

/// ctime 风格（不带换行）："Thu Jan  1 00:00:00 1970"
pub fn format_build_date<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(tz)
            .format("%a %b %e %H:%M:%S %Y")
            .to_string(),
        None => String::new(),
    }
}
