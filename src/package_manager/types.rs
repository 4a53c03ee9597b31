//! 包数据库相关数据类型定义

use std::collections::HashMap;

/// 依赖版本约束运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepMod {
    #[default]
    Any,
    Eq,
    Ge,
    Le,
    Gt,
    Lt,
}

impl DepMod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepMod::Any => "",
            DepMod::Eq => "=",
            DepMod::Ge => ">=",
            DepMod::Le => "<=",
            DepMod::Gt => ">",
            DepMod::Lt => "<",
        }
    }
}

/// 依赖条目，如 `glibc>=2.38` 或可选依赖 `git: 版本控制支持`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Depend {
    pub name: String,
    pub depmod: DepMod,
    pub version: Option<String>,
    pub desc: Option<String>,
}

impl Depend {
    /// 解析 pacman 输出中的依赖字符串
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        // 可选依赖的描述以 ": " 分隔，版本号本身可能带 epoch 冒号
        let (target, desc) = match s.find(": ") {
            Some(pos) => (&s[..pos], Some(s[pos + 2..].trim().to_string())),
            None => (s, None),
        };
        let desc = desc.filter(|d| !d.is_empty());

        let ops = [
            (">=", DepMod::Ge),
            ("<=", DepMod::Le),
            ("=", DepMod::Eq),
            (">", DepMod::Gt),
            ("<", DepMod::Lt),
        ];
        let op_pos = target.find(|c: char| c == '<' || c == '>' || c == '=');
        if let Some(pos) = op_pos {
            let rest = &target[pos..];
            for (token, depmod) in ops {
                if let Some(version) = rest.strip_prefix(token) {
                    return Depend {
                        name: target[..pos].to_string(),
                        depmod,
                        version: Some(version.to_string()),
                        desc,
                    };
                }
            }
        }

        Depend {
            name: target.to_string(),
            depmod: DepMod::Any,
            version: None,
            desc,
        }
    }

    /// 还原成 pacman 风格的依赖字符串
    pub fn compute_string(&self) -> String {
        let mut s = self.name.clone();
        if self.depmod != DepMod::Any {
            if let Some(version) = &self.version {
                s.push_str(self.depmod.as_str());
                s.push_str(version);
            }
        }
        if let Some(desc) = &self.desc {
            s.push_str(": ");
            s.push_str(desc);
        }
        s
    }
}

/// 本地包的安装原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PkgReason {
    #[default]
    Explicit,
    Depend,
}

/// 包句柄的只读查询接口
pub trait PkgHandle {
    fn name(&self) -> &str;
    fn version(&self) -> &str;
    fn desc(&self) -> Option<&str>;
    fn url(&self) -> Option<&str>;
    fn packager(&self) -> Option<&str>;
    fn db_name(&self) -> Option<&str>;
    /// 构建时间（unix 秒）
    fn build_date(&self) -> i64;
    fn arch(&self) -> Option<&str>;
    /// 下载大小（字节）
    fn size(&self) -> i64;
    /// 安装后大小（字节）
    fn isize(&self) -> i64;
    fn licenses(&self) -> &[String];
    fn groups(&self) -> &[String];
    fn depends(&self) -> &[Depend];
    fn optdepends(&self) -> &[Depend];
    fn conflicts(&self) -> &[Depend];
    fn provides(&self) -> &[Depend];
    fn replaces(&self) -> &[Depend];
    fn has_signature(&self) -> bool;
    fn reason(&self) -> PkgReason;
    fn compute_requiredby(&self) -> Vec<String>;
    fn compute_optionalfor(&self) -> Vec<String>;
}

/// 包数据库的只读查询接口
pub trait PkgDb {
    type Pkg: PkgHandle;

    fn name(&self) -> &str;
    fn get_pkg(&self, name: &str) -> Option<&Self::Pkg>;
}

/// 从 pacman -Si / -Qi 解析出的单个包
#[derive(Debug, Clone, Default)]
pub struct RawPackage {
    pub name: String,
    pub version: String,
    pub desc: Option<String>,
    pub url: Option<String>,
    pub packager: Option<String>,
    pub db_name: Option<String>,
    pub build_date: i64,
    pub arch: Option<String>,
    pub size: i64,
    pub isize: i64,
    pub licenses: Vec<String>,
    pub groups: Vec<String>,
    pub depends: Vec<Depend>,
    pub optdepends: Vec<Depend>,
    pub conflicts: Vec<Depend>,
    pub provides: Vec<Depend>,
    pub replaces: Vec<Depend>,
    pub signed: bool,
    pub reason: PkgReason,
    pub required_by: Vec<String>,
    pub optional_for: Vec<String>,
}

impl PkgHandle for RawPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn packager(&self) -> Option<&str> {
        self.packager.as_deref()
    }

    fn db_name(&self) -> Option<&str> {
        self.db_name.as_deref()
    }

    fn build_date(&self) -> i64 {
        self.build_date
    }

    fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    fn size(&self) -> i64 {
        self.size
    }

    fn isize(&self) -> i64 {
        self.isize
    }

    fn licenses(&self) -> &[String] {
        &self.licenses
    }

    fn groups(&self) -> &[String] {
        &self.groups
    }

    fn depends(&self) -> &[Depend] {
        &self.depends
    }

    fn optdepends(&self) -> &[Depend] {
        &self.optdepends
    }

    fn conflicts(&self) -> &[Depend] {
        &self.conflicts
    }

    fn provides(&self) -> &[Depend] {
        &self.provides
    }

    fn replaces(&self) -> &[Depend] {
        &self.replaces
    }

    fn has_signature(&self) -> bool {
        self.signed
    }

    fn reason(&self) -> PkgReason {
        self.reason
    }

    fn compute_requiredby(&self) -> Vec<String> {
        self.required_by.clone()
    }

    fn compute_optionalfor(&self) -> Vec<String> {
        self.optional_for.clone()
    }
}

/// 一个仓库（或本地库）中的包集合
#[derive(Debug, Clone, Default)]
pub struct Database {
    name: String,
    packages: Vec<RawPackage>,
    index: HashMap<String, usize>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 加入一个包；同名包已存在时保留先加入的
    pub fn insert(&mut self, pkg: RawPackage) -> bool {
        if self.index.contains_key(&pkg.name) {
            return false;
        }
        self.index.insert(pkg.name.clone(), self.packages.len());
        self.packages.push(pkg);
        true
    }

    pub fn packages(&self) -> &[RawPackage] {
        &self.packages
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }
}

impl PkgDb for Database {
    type Pkg = RawPackage;

    fn name(&self) -> &str {
        &self.name
    }

    fn get_pkg(&self, name: &str) -> Option<&RawPackage> {
        self.index.get(name).and_then(|&i| self.packages.get(i))
    }
}
