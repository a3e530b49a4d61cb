mod config;
mod models;
mod storage;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, info};
use ratatui::prelude::*;
use simplelog::{Config as LogConfig, WriteLogger};

use crate::config::{Config, config_path, load_config};
use crate::storage::{FileStore, Store};
use crate::ui::{App, render};

/// 日志写入文件，终端留给界面；初始化失败则不记录
fn init_logging(data_dir: &Path, level: LevelFilter) {
    let log_path = data_dir.join("nightform.log");
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
        let _ = WriteLogger::init(level, LogConfig::default(), file);
    }
}

fn main() -> Result<()> {
    // 配置文件 (~/.config/nightform/config.toml)
    let config_path = config_path()?;
    let config: Config = load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;

    // 数据目录 (~/.local/share/nightform/)
    let data_dir = config.resolve_data_dir()?;
    init_logging(&data_dir, config.log_filter()?);
    info!("starting with data dir {}", data_dir.display());

    // 加载状态
    let store = Store::new(Box::new(FileStore::new(&data_dir)), config.storage_key.clone());
    let state = store.load();

    // 创建应用状态
    let mut app = App::new(state, store, config);

    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // 补存此前失败的写入
    app.flush()
        .with_context(|| format!("failed to save state under {}", app.store().key()))?;
    info!("exiting");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        let quit = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                ui::handle_key_event(app, key.code)
            }
            Event::Mouse(mouse) => ui::handle_mouse_event(app, mouse, Instant::now()),
            _ => false,
        };
        if quit {
            break;
        }
    }
    Ok(())
}
