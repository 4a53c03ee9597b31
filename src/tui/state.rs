use crate::config::Config;
use crate::package::{search_regex, Attribute, Operation, Package, UpdateState};

// ========== 枚举 ==========

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Loading,
    List,
    Filter, // '/': 输入过滤正则
    Info,   // Enter: 详情面板
}

// ========== 事件 ==========

#[derive(Debug)]
pub enum AppEvent {
    CatalogLoaded(Vec<Package>),
    Error(String),
}

// ========== 应用状态 ==========

pub struct App {
    pub config: Config,
    pub mode: AppMode,
    pub packages: Vec<Package>,
    /// 过滤后可见包在 packages 中的下标
    pub visible: Vec<usize>,
    pub selected: usize,
    pub filter: String,
    pub sort_by: Attribute,
    pub info_scroll: usize,
    pub status: String,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let sort_by = config.sort_by;
        Self {
            config,
            mode: AppMode::Loading,
            packages: Vec::new(),
            visible: Vec::new(),
            selected: 0,
            filter: String::new(),
            sort_by,
            info_scroll: 0,
            status: "正在读取包数据库...".to_string(),
            should_quit: false,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogLoaded(packages) => {
                log::info!("已载入 {} 个包", packages.len());
                self.packages = packages;
                self.sort();
                self.apply_filter();
                self.mode = AppMode::List;
            }
            AppEvent::Error(msg) => {
                log::error!("{}", msg);
                self.status = msg;
                self.mode = AppMode::List;
            }
        }
    }

    pub fn selected_package(&self) -> Option<&Package> {
        self.visible
            .get(self.selected)
            .and_then(|&i| self.packages.get(i))
    }

    fn selected_package_mut(&mut self) -> Option<&mut Package> {
        let index = *self.visible.get(self.selected)?;
        self.packages.get_mut(index)
    }

    /// 按当前排序属性重排，并刷新列序号
    pub fn sort(&mut self) {
        let attr = self.sort_by;
        self.packages.sort_by(|a, b| a.cmp_by(b, attr));
        for (i, pkg) in self.packages.iter_mut().enumerate() {
            pkg.set_col_index(i);
        }
    }

    /// 在显示列之间轮换排序属性
    pub fn cycle_sort(&mut self) {
        let columns = self.config.visible_columns();
        let next = columns
            .iter()
            .position(|a| *a == self.sort_by)
            .map(|i| columns[(i + 1) % columns.len()])
            .unwrap_or(columns[0]);
        self.sort_by = next;
        self.sort();
        self.apply_filter();
        self.status = format!("排序: {}", next.label());
    }

    /// 重新计算可见列表；正则无效时保留原列表并提示
    pub fn apply_filter(&mut self) {
        if self.filter.trim().is_empty() {
            self.visible = (0..self.packages.len()).collect();
        } else {
            match search_regex(&self.filter) {
                Ok(re) => {
                    let attrs = &self.config.filter_attributes;
                    self.visible = self
                        .packages
                        .iter()
                        .enumerate()
                        .filter(|(_, pkg)| pkg.matches(&re, attrs))
                        .map(|(i, _)| i)
                        .collect();
                }
                Err(e) => {
                    self.status = e.to_string();
                    return;
                }
            }
        }
        self.selected = self.selected.min(self.visible.len().saturating_sub(1));
        self.status = format!("{} / {} 个包", self.visible.len(), self.packages.len());
    }

    pub fn move_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn move_down(&mut self, n: usize) {
        let max = self.visible.len().saturating_sub(1);
        self.selected = self.selected.saturating_add(n).min(max);
    }

    /// 循环切换待执行操作：未安装 → 安装；已安装 → 卸载 / 升级或重装
    pub fn cycle_op(&mut self) {
        let Some(pkg) = self.selected_package_mut() else {
            return;
        };
        let next = match (pkg.update_state_kind(), pkg.op()) {
            (UpdateState::NotInstalled, Operation::None) => Operation::Install,
            (UpdateState::NotInstalled, _) => Operation::None,
            (_, Operation::None) => Operation::Remove,
            (UpdateState::UpdateAvailable, Operation::Remove) => Operation::Upgrade,
            (UpdateState::UpToDate, Operation::Remove) => Operation::Reinstall,
            _ => Operation::None,
        };
        pkg.set_op(next);
    }

    /// 已标记操作的包
    pub fn marked(&self) -> Vec<&Package> {
        self.packages
            .iter()
            .filter(|p| p.op() != Operation::None)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package_manager::{build_catalog, Database, PkgReason, RawPackage, LOCAL_DB};

    fn raw(name: &str, version: &str, desc: &str, isize: i64) -> RawPackage {
        RawPackage {
            name: name.to_string(),
            version: version.to_string(),
            desc: Some(desc.to_string()),
            db_name: Some("extra".to_string()),
            isize,
            ..Default::default()
        }
    }

    fn loaded_app() -> App {
        let mut extra = Database::new("extra");
        extra.insert(raw("vim", "9.1-1", "Vi Improved", 4096));
        extra.insert(raw("git", "2.46-1", "version control", 2048));
        extra.insert(raw("neovim", "0.10-1", "Vim-fork focused on extensibility", 8192));

        let mut local = Database::new(LOCAL_DB);
        local.insert(RawPackage {
            name: "git".to_string(),
            version: "2.45-1".to_string(),
            reason: PkgReason::Explicit,
            ..Default::default()
        });

        let mut app = App::new(Config::default());
        app.handle_event(AppEvent::CatalogLoaded(build_catalog(&[extra], &local, true)));
        app
    }

    fn visible_names(app: &App) -> Vec<&str> {
        app.visible.iter().map(|&i| app.packages[i].name()).collect()
    }

    #[test]
    fn loading_sorts_by_name() {
        let app = loaded_app();
        assert_eq!(app.mode, AppMode::List);
        assert_eq!(visible_names(&app), vec!["git", "neovim", "vim"]);
        assert_eq!(app.packages[2].col_index(), 2);
    }

    #[test]
    fn filter_matches_name_or_description() {
        let mut app = loaded_app();
        app.filter = "vim".to_string();
        app.apply_filter();
        assert_eq!(visible_names(&app), vec!["neovim", "vim"]);

        app.filter = "CONTROL".to_string();
        app.apply_filter();
        assert_eq!(visible_names(&app), vec!["git"]);
    }

    #[test]
    fn invalid_filter_keeps_previous_list() {
        let mut app = loaded_app();
        app.filter = "[".to_string();
        app.apply_filter();
        assert_eq!(app.visible.len(), 3);
        assert!(app.status.contains("regex"));
    }

    #[test]
    fn sorting_by_installed_size() {
        let mut app = loaded_app();
        app.sort_by = Attribute::ISize;
        app.sort();
        app.apply_filter();
        assert_eq!(visible_names(&app), vec!["git", "vim", "neovim"]);
    }

    #[test]
    fn cycle_sort_walks_visible_columns() {
        let mut app = loaded_app();
        assert_eq!(app.sort_by, Attribute::Name);
        app.cycle_sort();
        assert_eq!(app.sort_by, Attribute::Repo);
    }

    #[test]
    fn selection_is_clamped() {
        let mut app = loaded_app();
        app.move_down(10);
        assert_eq!(app.selected, 2);
        app.move_up(5);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn marking_operations() {
        let mut app = loaded_app();
        // git 已安装且有更新
        app.cycle_op();
        assert_eq!(app.selected_package().unwrap().op(), Operation::Remove);
        app.cycle_op();
        assert_eq!(app.selected_package().unwrap().op(), Operation::Upgrade);
        app.cycle_op();
        assert_eq!(app.selected_package().unwrap().op(), Operation::None);

        app.move_down(1);
        app.cycle_op();
        assert_eq!(app.selected_package().unwrap().op(), Operation::Install);
        assert_eq!(app.marked().len(), 1);
    }
}
