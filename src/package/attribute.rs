//! 列属性标签

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 包记录上可按标签读取的属性，UI 用它来决定显示哪些列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Attribute {
    #[default]
    None,
    Name,
    Version,
    Url,
    Repo,
    Packager,
    BuildDate,
    InstallState,
    UpdateState,
    Desc,
    Arch,
    Licenses,
    Groups,
    Depends,
    OptDepends,
    Conflicts,
    Provides,
    Replaces,
    RequiredBy,
    OptionalFor,
    Signature,
    Size,
    ISize,
}

impl Attribute {
    /// 按数字标签顺序排列的全部属性
    pub const ALL: [Attribute; 23] = [
        Attribute::None,
        Attribute::Name,
        Attribute::Version,
        Attribute::Url,
        Attribute::Repo,
        Attribute::Packager,
        Attribute::BuildDate,
        Attribute::InstallState,
        Attribute::UpdateState,
        Attribute::Desc,
        Attribute::Arch,
        Attribute::Licenses,
        Attribute::Groups,
        Attribute::Depends,
        Attribute::OptDepends,
        Attribute::Conflicts,
        Attribute::Provides,
        Attribute::Replaces,
        Attribute::RequiredBy,
        Attribute::OptionalFor,
        Attribute::Signature,
        Attribute::Size,
        Attribute::ISize,
    ];

    #[cfg(test)]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// 配置文件中使用的关键字
    pub fn keyword(self) -> &'static str {
        match self {
            Attribute::None => "none",
            Attribute::Name => "name",
            Attribute::Version => "version",
            Attribute::Url => "url",
            Attribute::Repo => "repo",
            Attribute::Packager => "packager",
            Attribute::BuildDate => "builddate",
            Attribute::InstallState => "installstate",
            Attribute::UpdateState => "updatestate",
            Attribute::Desc => "desc",
            Attribute::Arch => "arch",
            Attribute::Licenses => "licenses",
            Attribute::Groups => "groups",
            Attribute::Depends => "depends",
            Attribute::OptDepends => "optdepends",
            Attribute::Conflicts => "conflicts",
            Attribute::Provides => "provides",
            Attribute::Replaces => "replaces",
            Attribute::RequiredBy => "requiredby",
            Attribute::OptionalFor => "optionalfor",
            Attribute::Signature => "signature",
            Attribute::Size => "size",
            Attribute::ISize => "isize",
        }
    }

    /// 列标题 / 详情面板标签
    pub fn label(self) -> &'static str {
        match self {
            Attribute::None => "",
            Attribute::Name => "Name",
            Attribute::Version => "Version",
            Attribute::Url => "URL",
            Attribute::Repo => "Repository",
            Attribute::Packager => "Packager",
            Attribute::BuildDate => "Build Date",
            Attribute::InstallState => "Install Reason",
            Attribute::UpdateState => "Update State",
            Attribute::Desc => "Description",
            Attribute::Arch => "Architecture",
            Attribute::Licenses => "Licenses",
            Attribute::Groups => "Groups",
            Attribute::Depends => "Depends On",
            Attribute::OptDepends => "Optional Deps",
            Attribute::Conflicts => "Conflicts With",
            Attribute::Provides => "Provides",
            Attribute::Replaces => "Replaces",
            Attribute::RequiredBy => "Required By",
            Attribute::OptionalFor => "Optional For",
            Attribute::Signature => "Signature",
            Attribute::Size => "Download Size",
            Attribute::ISize => "Installed Size",
        }
    }

    /// 是否可以通过 `numeric_attr` 取数值
    pub fn is_numeric(self) -> bool {
        matches!(self, Attribute::BuildDate | Attribute::Size | Attribute::ISize)
    }
}

impl TryFrom<u8> for Attribute {
    type Error = Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        Attribute::ALL
            .get(tag as usize)
            .copied()
            .ok_or_else(|| Error::InvalidAttribute(format!("tag {}", tag)))
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Attribute::ALL
            .iter()
            .copied()
            .find(|a| a.keyword() == needle)
            .ok_or_else(|| Error::InvalidAttribute(s.to_string()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl Serialize for Attribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.keyword())
    }
}

impl<'de> Deserialize<'de> for Attribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
