//! 包记录 — 把包数据库中的句柄转换为便于显示的快照

pub mod attribute;
pub mod format;

pub use attribute::Attribute;
pub use format::{deplist_to_string, list_to_string, size_to_string, trim_str};

use crate::error::{Error, Result};
use crate::package_manager::{vercmp, PkgDb, PkgHandle, PkgReason};
use chrono::Local;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::cmp::Ordering;

/// 可选依赖在详情面板中换行后的对齐缩进
const OPTDEPENDS_DELIM: &str = "\n            ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateState {
    NotInstalled,
    UpdateAvailable,
    UpToDate,
}

impl UpdateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateState::NotInstalled => "not installed",
            UpdateState::UpdateAvailable => "update available",
            UpdateState::UpToDate => "up to date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallReason {
    NotInstalled,
    Explicit,
    AsDeps,
}

impl InstallReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallReason::NotInstalled => "not installed",
            InstallReason::Explicit => "explicit",
            InstallReason::AsDeps => "as dependency",
        }
    }
}

/// 浏览器里为包标记的待执行操作（只做标记，不执行）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[default]
    None,
    Install,
    Remove,
    Upgrade,
    Reinstall,
}

impl Operation {
    /// 列表中的单字符标记
    pub fn marker(&self) -> &'static str {
        match self {
            Operation::None => " ",
            Operation::Install => "+",
            Operation::Remove => "-",
            Operation::Upgrade => "^",
            Operation::Reinstall => "*",
        }
    }
}

/// 包记录快照：构造时从句柄拷贝全部字段，之后只有列序号和待执行操作可变
#[derive(Debug, Clone, Serialize)]
pub struct Package {
    name: String,
    url: String,
    packager: String,
    desc: String,
    version: String,
    local_version: String,
    repo: String,
    build_date: i64,
    arch: String,
    size: i64,
    isize: i64,
    size_str: String,
    isize_str: String,
    licenses: String,
    groups: String,
    optdepends: String,
    conflicts: String,
    provides: String,
    replaces: String,
    depends: String,
    requiredby: String,
    optionalfor: String,
    signature: String,
    update_state: UpdateState,
    reason: InstallReason,
    col_index: usize,
    op: Operation,
}

impl Package {
    pub fn new<P, D>(pkg: &P, localdb: &D) -> Self
    where
        P: PkgHandle,
        D: PkgDb,
    {
        let name = trim_str(Some(pkg.name()));
        let localpkg = localdb.get_pkg(&name);

        let version = trim_str(Some(pkg.version()));
        let size = pkg.size();
        let isize = pkg.isize();

        let mut record = Package {
            name,
            url: trim_str(pkg.url()),
            packager: trim_str(pkg.packager()),
            desc: trim_str(pkg.desc()),
            version,
            local_version: String::new(),
            repo: trim_str(pkg.db_name()),
            build_date: pkg.build_date(),
            arch: trim_str(pkg.arch()),
            size,
            isize,
            size_str: size_to_string(size),
            isize_str: size_to_string(isize),
            licenses: list_to_string(pkg.licenses(), " "),
            groups: list_to_string(pkg.groups(), " "),
            optdepends: deplist_to_string(pkg.optdepends(), OPTDEPENDS_DELIM),
            conflicts: deplist_to_string(pkg.conflicts(), " "),
            provides: deplist_to_string(pkg.provides(), " "),
            replaces: deplist_to_string(pkg.replaces(), " "),
            depends: deplist_to_string(pkg.depends(), " "),
            requiredby: String::new(),
            optionalfor: String::new(),
            signature: (if pkg.has_signature() { "Yes" } else { "None" }).to_string(),
            update_state: UpdateState::NotInstalled,
            reason: InstallReason::NotInstalled,
            col_index: 0,
            op: Operation::None,
        };

        if let Some(local) = localpkg {
            record.local_version = local.version().to_string();
            record.update_state = if vercmp(&record.version, &record.local_version) == Ordering::Greater {
                UpdateState::UpdateAvailable
            } else {
                UpdateState::UpToDate
            };
            record.requiredby = list_to_string(&local.compute_requiredby(), " ");
            record.optionalfor = list_to_string(&local.compute_optionalfor(), " ");
            record.reason = match local.reason() {
                PkgReason::Depend => InstallReason::AsDeps,
                PkgReason::Explicit => InstallReason::Explicit,
            };
        }

        record
    }

    /// 按标签取显示字符串
    pub fn attr(&self, attr: Attribute) -> String {
        match attr {
            Attribute::Name => self.name().to_string(),
            Attribute::Version => self.version(),
            Attribute::Url => self.url().to_string(),
            Attribute::Repo => self.repo().to_string(),
            Attribute::Packager => self.packager().to_string(),
            Attribute::BuildDate => self.build_date(),
            Attribute::InstallState => self.reason().to_string(),
            Attribute::UpdateState => self.update_state().to_string(),
            Attribute::Desc => self.desc().to_string(),
            Attribute::Arch => self.arch().to_string(),
            Attribute::Licenses => self.licenses().to_string(),
            Attribute::Groups => self.groups().to_string(),
            Attribute::Depends => self.depends().to_string(),
            Attribute::OptDepends => self.optdepends().to_string(),
            Attribute::Conflicts => self.conflicts().to_string(),
            Attribute::Provides => self.provides().to_string(),
            Attribute::Replaces => self.replaces().to_string(),
            Attribute::RequiredBy => self.requiredby().to_string(),
            Attribute::OptionalFor => self.optionalfor().to_string(),
            Attribute::Signature => self.signature().to_string(),
            Attribute::Size => self.size().to_string(),
            Attribute::ISize => self.isize().to_string(),
            Attribute::None => String::new(),
        }
    }

    /// 按数字标签取显示字符串，未知标签报错
    #[cfg(test)]
    pub fn attr_by_tag(&self, tag: u8) -> Result<String> {
        Ok(self.attr(Attribute::try_from(tag)?))
    }

    /// 数值属性：构建时间（unix 秒）和两种大小（字节）
    pub fn numeric_attr(&self, attr: Attribute) -> Result<i64> {
        match attr {
            Attribute::BuildDate => Ok(self.build_date),
            Attribute::Size => Ok(self.size),
            Attribute::ISize => Ok(self.isize),
            other => Err(Error::InvalidAttribute(other.keyword().to_string())),
        }
    }

    pub fn set_col_index(&mut self, index: usize) {
        self.col_index = index;
    }

    pub fn col_index(&self) -> usize {
        self.col_index
    }

    pub fn set_op(&mut self, op: Operation) {
        self.op = op;
    }

    pub fn op(&self) -> Operation {
        self.op
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// 有更新时附带本地版本
    pub fn version(&self) -> String {
        if self.update_state == UpdateState::UpdateAvailable {
            return format!("{} (local: {})", self.version, self.local_version);
        }
        self.version.clone()
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn reason(&self) -> &'static str {
        self.reason.as_str()
    }

    #[cfg(test)]
    pub fn reason_kind(&self) -> InstallReason {
        self.reason
    }

    pub fn packager(&self) -> &str {
        &self.packager
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn build_date(&self) -> String {
        format::format_build_date(self.build_date, &Local)
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn licenses(&self) -> &str {
        &self.licenses
    }

    pub fn groups(&self) -> &str {
        &self.groups
    }

    pub fn depends(&self) -> &str {
        &self.depends
    }

    pub fn optdepends(&self) -> &str {
        &self.optdepends
    }

    pub fn conflicts(&self) -> &str {
        &self.conflicts
    }

    pub fn provides(&self) -> &str {
        &self.provides
    }

    pub fn replaces(&self) -> &str {
        &self.replaces
    }

    pub fn requiredby(&self) -> &str {
        &self.requiredby
    }

    pub fn optionalfor(&self) -> &str {
        &self.optionalfor
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn size(&self) -> &str {
        &self.size_str
    }

    pub fn isize(&self) -> &str {
        &self.isize_str
    }

    pub fn update_state(&self) -> &'static str {
        self.update_state.as_str()
    }

    pub fn update_state_kind(&self) -> UpdateState {
        self.update_state
    }

    /// 任一指定属性匹配即为命中
    pub fn matches(&self, re: &Regex, attrs: &[Attribute]) -> bool {
        attrs.iter().any(|&a| re.is_match(&self.attr(a)))
    }

    /// 按属性排序；数值属性按数值比较，其余按字符串，相同时按包名
    pub fn cmp_by(&self, other: &Package, attr: Attribute) -> Ordering {
        let primary = if attr.is_numeric() {
            self.numeric_attr(attr)
                .ok()
                .cmp(&other.numeric_attr(attr).ok())
        } else {
            self.attr(attr).cmp(&other.attr(attr))
        };
        primary.then_with(|| self.name.cmp(&other.name))
    }

    /// 详情面板的 (标签, 值) 列表
    pub fn info_lines(&self) -> Vec<(&'static str, String)> {
        Attribute::ALL
            .iter()
            .filter(|a| **a != Attribute::None)
            .map(|&a| (a.label(), self.attr(a)))
            .collect()
    }
}

/// 大小写不敏感的过滤正则
pub fn search_regex(pattern: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}
