use super::layout;
use super::state::{App, AppMode};
use super::theme::{BLUE, BRIGHT_WHITE, DIM, PINK, SEL_BG, UPDATE};
use crate::package::{Attribute, Package, UpdateState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Margin, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// 标签列宽度（含冒号）
const LABEL_WIDTH: usize = 17;

/// 处理浏览模式按键
pub fn handle_key(key: KeyEvent, app: &mut App, page: usize) {
    match app.mode {
        AppMode::Loading => {
            if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                app.should_quit = true;
            }
        }
        AppMode::List => handle_list_key(key, app, page),
        AppMode::Filter => handle_filter_key(key, app),
        AppMode::Info => handle_info_key(key, app, page),
    }
}

fn handle_list_key(key: KeyEvent, app: &mut App, page: usize) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.move_up(1),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(1),
        KeyCode::PageUp => app.move_up(page),
        KeyCode::PageDown => app.move_down(page),
        KeyCode::Home | KeyCode::Char('g') => app.selected = 0,
        KeyCode::End | KeyCode::Char('G') => app.move_down(usize::MAX),
        KeyCode::Char('/') => app.mode = AppMode::Filter,
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char(' ') => app.cycle_op(),
        KeyCode::Enter => {
            if app.selected_package().is_some() {
                app.info_scroll = 0;
                app.mode = AppMode::Info;
            }
        }
        _ => {}
    }
}

/// 过滤输入：每次按键即时刷新列表
fn handle_filter_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => app.mode = AppMode::List,
        KeyCode::Esc => {
            app.filter.clear();
            app.apply_filter();
            app.mode = AppMode::List;
        }
        KeyCode::Backspace => {
            app.filter.pop();
            app.apply_filter();
        }
        KeyCode::Char(c) => {
            // 忽略带 Ctrl/Alt 修饰的字符
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return;
            }
            app.filter.push(c);
            app.apply_filter();
        }
        _ => {}
    }
}

fn handle_info_key(key: KeyEvent, app: &mut App, page: usize) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.mode = AppMode::List,
        KeyCode::Up | KeyCode::Char('k') => app.info_scroll = app.info_scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => app.info_scroll += 1,
        KeyCode::PageUp => app.info_scroll = app.info_scroll.saturating_sub(page),
        KeyCode::PageDown => app.info_scroll += page,
        KeyCode::Char(' ') => app.cycle_op(),
        _ => {}
    }
}

/// 详情面板滚动边界
pub fn clamp_info_scroll(app: &mut App, visible: usize) {
    let total = app.selected_package().map(info_text_lines).map_or(0, |l| l.len());
    app.info_scroll = app.info_scroll.min(total.saturating_sub(visible));
}

/// 详情面板文本：多行值的续行与首行对齐
pub fn info_text_lines(pkg: &Package) -> Vec<String> {
    let mut lines = Vec::new();
    for (label, value) in pkg.info_lines() {
        let mut parts = value.split('\n');
        let first = parts.next().unwrap_or("");
        lines.push(format!("{:<width$}: {}", label, first, width = LABEL_WIDTH - 2));
        for rest in parts {
            lines.push(format!("{:<width$}{}", "", rest.trim_start(), width = LABEL_WIDTH));
        }
    }
    lines
}

/// 表格单元格只显示一行
fn cell_text(pkg: &Package, attr: Attribute) -> String {
    pkg.attr(attr)
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

fn column_width(attr: Attribute) -> Constraint {
    match attr {
        Attribute::Desc | Attribute::Depends | Attribute::OptDepends | Attribute::RequiredBy => {
            Constraint::Fill(1)
        }
        Attribute::Name | Attribute::Url | Attribute::Packager => Constraint::Length(28),
        Attribute::Version | Attribute::BuildDate => Constraint::Length(26),
        _ => Constraint::Length(16),
    }
}

pub fn render(f: &mut Frame, app: &App) {
    let chunks = layout::main_layout(f.area());

    let title = if app.filter.is_empty() {
        format!("lian-pkgview · 排序: {}", app.sort_by.label())
    } else {
        format!("lian-pkgview · 排序: {} · 过滤: {}", app.sort_by.label(), app.filter)
    };
    layout::render_header(f, &title, chunks[0]);

    match app.mode {
        AppMode::Info => render_info(f, app, chunks[1]),
        _ => render_table(f, app, chunks[1]),
    }

    let footer = match app.mode {
        AppMode::Loading => format!("{}  [q] 退出", app.status),
        AppMode::Filter => format!("/{}▏  [Enter] 确认  [Esc] 清除", app.filter),
        AppMode::Info => "[j/k] 滚动  [Space] 标记操作  [Esc] 返回".to_string(),
        AppMode::List => format!(
            "{}  [/] 过滤  [s] 排序  [Space] 标记  [Enter] 详情  [q] 退出",
            app.status
        ),
    };
    layout::render_footer(f, &footer, chunks[2]);
}

fn render_table(f: &mut Frame, app: &App, area: Rect) {
    let columns = app.config.visible_columns();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE));

    // 边框 2 行 + 表头 1 行
    let page = (area.height as usize).saturating_sub(3).max(1);
    let start = (app.selected + 1).saturating_sub(page);

    let header = Row::new(
        std::iter::once(Cell::from(" "))
            .chain(columns.iter().map(|c| Cell::from(c.label())))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(PINK).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .visible
        .iter()
        .skip(start)
        .take(page)
        .filter_map(|&i| app.packages.get(i))
        .map(|pkg| {
            let style = match pkg.update_state_kind() {
                UpdateState::UpdateAvailable => Style::default().fg(UPDATE),
                UpdateState::UpToDate => Style::default().fg(BRIGHT_WHITE),
                UpdateState::NotInstalled => Style::default().fg(DIM),
            };
            let cells = std::iter::once(Cell::from(pkg.op().marker()).style(Style::default().fg(PINK)))
                .chain(columns.iter().map(|&c| Cell::from(cell_text(pkg, c))));
            Row::new(cells.collect::<Vec<_>>()).style(style)
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(1))
        .chain(columns.iter().map(|&c| column_width(c)))
        .collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(SEL_BG).add_modifier(Modifier::BOLD));

    let mut state = TableState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.selected - start));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_info(f: &mut Frame, app: &App, area: Rect) {
    let Some(pkg) = app.selected_package() else {
        return;
    };

    let block = Block::default()
        .title(format!(" {} ", pkg.name()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let lines: Vec<Line> = info_text_lines(pkg)
        .into_iter()
        .skip(app.info_scroll)
        .take(padded.height as usize)
        .map(Line::from)
        .collect();

    f.render_widget(Paragraph::new(lines), padded);
}
