pub mod app;
mod event;
pub mod form;
pub mod keymap;
pub mod theme;
mod ui;

use anyhow::Result;

use crate::store::TaskStore;
use crate::tasks::Controller;

pub fn run<S: TaskStore>(controller: Controller<S>, theme: theme::Theme) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = app::App::new(controller, theme);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
