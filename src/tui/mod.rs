mod browse;
mod layout;
pub mod state;
mod theme;

use crate::config::Config;
use crate::package_manager::PackageManager;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{App, AppEvent};
use std::io;
use tokio::sync::mpsc;

pub async fn run(config: Config) -> Result<()> {
    // 终端初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let pm = PackageManager::new(config.pacman.clone());
    let include_foreign = config.show_foreign;
    let mut app = App::new(config);

    let (tx, mut rx) = mpsc::channel(8);

    // 异步读取包数据库
    let tx_clone = tx.clone();
    tokio::spawn(async move {
        let loaded = tokio::task::spawn_blocking(move || pm.load_catalog(include_foreign)).await;
        let event = match loaded {
            Ok(Ok(packages)) => AppEvent::CatalogLoaded(packages),
            Ok(Err(e)) => AppEvent::Error(format!("读取包数据库失败: {}", e)),
            Err(e) => AppEvent::Error(format!("读取任务异常退出: {}", e)),
        };
        let _ = tx_clone.send(event).await;
    });

    // 主循环
    loop {
        let term_size = terminal.size()?;
        let page = layout::visible_content_height(term_size.height).max(1);
        browse::clamp_info_scroll(&mut app, page);

        terminal.draw(|f| browse::render(f, &app))?;

        // 处理事件
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        app.should_quit = true;
                    }
                    _ => browse::handle_key(key, &mut app, page),
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }

        if app.should_quit {
            break;
        }
    }

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    for pkg in app.marked() {
        println!("{} {}", pkg.op().marker(), pkg.name());
    }

    Ok(())
}
