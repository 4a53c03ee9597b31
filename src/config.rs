use crate::error::Result;
use crate::package::Attribute;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 查询用的 pacman 命令
    pub pacman: String,
    /// 列表显示的列
    pub columns: Vec<Attribute>,
    pub sort_by: Attribute,
    /// 过滤时参与匹配的属性
    pub filter_attributes: Vec<Attribute>,
    /// 是否显示不属于任何同步仓库的本地包
    pub show_foreign: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacman: "pacman".to_string(),
            columns: vec![
                Attribute::Name,
                Attribute::Repo,
                Attribute::Version,
                Attribute::InstallState,
            ],
            sort_by: Attribute::Name,
            filter_attributes: vec![Attribute::Name, Attribute::Desc],
            show_foreign: true,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/lian-pkgview/config.toml")
    }

    pub fn load_or_default() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// 文件不存在时使用默认配置
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            log::debug!("已加载配置: {}", path.display());
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 至少保留一列
    pub fn visible_columns(&self) -> Vec<Attribute> {
        let columns: Vec<Attribute> = self
            .columns
            .iter()
            .copied()
            .filter(|a| *a != Attribute::None)
            .collect();
        if columns.is_empty() {
            vec![Attribute::Name]
        } else {
            columns
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns = [\"name\", \"isize\", \"updatestate\"]").unwrap();
        writeln!(file, "sort_by = \"isize\"").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(
            config.columns,
            vec![Attribute::Name, Attribute::ISize, Attribute::UpdateState]
        );
        assert_eq!(config.sort_by, Attribute::ISize);
        assert_eq!(config.pacman, "pacman");
        assert!(config.show_foreign);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "columns = [\"name\", \"colour\"]").unwrap();

        assert!(matches!(Config::load_from(file.path()), Err(Error::Config(_))));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config {
            columns: vec![Attribute::Name, Attribute::BuildDate],
            show_foreign: false,
            ..Default::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("builddate"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_column_list_falls_back_to_name() {
        let config = Config {
            columns: vec![Attribute::None],
            ..Default::default()
        };
        assert_eq!(config.visible_columns(), vec![Attribute::Name]);
    }
}
