//! 包管理器模块 — 通过 pacman 只读查询包数据库

pub mod parser;
pub mod types;
pub mod vercmp;

// 重新导出常用类型和函数
pub use types::{Database, DepMod, Depend, PkgDb, PkgHandle, PkgReason, RawPackage};
pub use vercmp::vercmp;

use crate::error::{Error, Result};
use crate::package::Package;
use parser::parse_packages;
use std::process::Command;

/// 本地库名称
pub const LOCAL_DB: &str = "local";

#[derive(Debug, Clone)]
pub struct PackageManager {
    pub command: String,
}

impl PackageManager {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// 以 C locale 执行查询，保证字段名为英文；去掉 COLUMNS 以减少折行
    fn query(&self, args: &[&str]) -> Result<String> {
        let display = format!("{} {}", self.command, args.join(" "));
        log::debug!("执行查询: {}", display);

        let output = Command::new(&self.command)
            .args(args)
            .env("LC_ALL", "C")
            .env_remove("COLUMNS")
            .output()
            .map_err(|e| Error::CommandFailed {
                command: display.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: display,
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// 本地已安装包 (pacman -Qi)
    pub fn load_local(&self) -> Result<Database> {
        let raw = self.query(&["-Qi"])?;
        let mut db = Database::new(LOCAL_DB);
        for pkg in parse_packages(&raw) {
            db.insert(pkg);
        }
        log::info!("本地库: {} 个包", db.len());
        Ok(db)
    }

    /// 同步仓库中的全部包 (pacman -Si)，按仓库分组并保持仓库顺序
    pub fn load_sync(&self) -> Result<Vec<Database>> {
        let raw = self.query(&["-Si"])?;
        Ok(group_by_repo(parse_packages(&raw)))
    }

    /// 构建浏览用的完整包列表
    pub fn load_catalog(&self, include_foreign: bool) -> Result<Vec<Package>> {
        let local = self.load_local()?;
        let sync = self.load_sync()?;
        Ok(build_catalog(&sync, &local, include_foreign))
    }
}

fn group_by_repo(packages: Vec<RawPackage>) -> Vec<Database> {
    let mut dbs: Vec<Database> = Vec::new();
    for pkg in packages {
        let repo = pkg.db_name.clone().unwrap_or_default();
        match dbs.iter_mut().find(|db| db.name() == repo) {
            Some(db) => {
                db.insert(pkg);
            }
            None => {
                let mut db = Database::new(repo);
                db.insert(pkg);
                dbs.push(db);
            }
        }
    }
    for db in &dbs {
        log::info!("仓库 {}: {} 个包", db.name(), db.len());
    }
    dbs
}

/// 同步包在前（同名包以先出现的仓库为准），随后是外部包（仅本地安装）
pub fn build_catalog(sync: &[Database], local: &Database, include_foreign: bool) -> Vec<Package> {
    let mut seen = std::collections::HashSet::new();
    let mut catalog = Vec::new();

    for db in sync {
        for pkg in db.packages() {
            if seen.insert(pkg.name.clone()) {
                catalog.push(Package::new(pkg, local));
            }
        }
    }

    if include_foreign {
        for pkg in local.packages() {
            if !seen.contains(&pkg.name) {
                let mut foreign = pkg.clone();
                foreign.db_name = Some(LOCAL_DB.to_string());
                catalog.push(Package::new(&foreign, local));
            }
        }
    }

    for (i, pkg) in catalog.iter_mut().enumerate() {
        pkg.set_col_index(i);
    }
    catalog
}
