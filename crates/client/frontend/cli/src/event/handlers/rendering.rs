//! Rendering handlers.

use anyhow::Result;
use kot_frontend_core::EventConsumer;

use super::super::EventLoop;
use crate::presentation::{terminal::Tui, ui};

impl EventLoop {
    /// Render current state using ViewModel.
    pub(in crate::event) fn render(&mut self, terminal: &mut Tui) -> Result<()> {
        let ctx = ui::RenderContext {
            view_model: self.consumer.view(),
            messages: self.consumer.message_log(),
            app_state: &self.app_state,
            ui: &self.cli_config.ui,
        };

        ui::render_with_view_model(terminal, &ctx)
    }
}
