use std::time::Duration;

use arboard::Clipboard;
use crossbeam_channel::{Receiver, Sender};
use engine::{
    keys::{KeyConfig, KEYPAD_LAYOUT, VIRTUAL_KEYS},
    CalculatorSession, FeedbackCategory, HistoryEntry, HistoryLog,
};
use serde::{Deserialize, Serialize};

use crate::{
    audio::SoundEngine,
    backend_bridge::commands::BackendCommand,
    config::StartupConfig,
    controller::{
        events::{UiError, UiErrorContext, UiEvent},
        input::KeyboardInput,
        orchestration::dispatch_backend_command,
    },
    ui::{theme, widgets},
};

pub const WINDOW_STATE_STORAGE_KEY: &str = "nebula_calc.window";

const KEYPAD_COLUMNS: f32 = 4.0;

/// Window layout remembered by eframe between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedWindowState {
    pub history_open: bool,
}

pub struct CalculatorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    session: CalculatorSession,
    sound: SoundEngine,
    keyboard: KeyboardInput,
    muted_override: Option<bool>,
    preferences_ready: bool,
    history_open: bool,
    status: String,
    status_banner: Option<String>,
    theme_applied: bool,
}

impl CalculatorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: &StartupConfig,
        mut sound: SoundEngine,
        window_state: Option<PersistedWindowState>,
    ) -> Self {
        sound.init();
        if let Some(muted) = startup.muted {
            sound.set_muted(muted);
        }
        let mut app = Self {
            cmd_tx,
            ui_rx,
            session: CalculatorSession::new(),
            sound,
            keyboard: KeyboardInput::new(),
            muted_override: startup.muted,
            preferences_ready: false,
            history_open: window_state.unwrap_or_default().history_open,
            status: String::new(),
            status_banner: None,
            theme_applied: false,
        };
        app.queue(BackendCommand::LoadPreferences);
        app
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::PreferencesLoaded { history, muted } => {
                    self.merge_loaded_history(history);
                    self.sound.set_muted(self.muted_override.unwrap_or(muted));
                    self.finish_startup();
                }
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => {
                    tracing::warn!(
                        context = ?err.context(),
                        category = ?err.category(),
                        "{}",
                        err.message()
                    );
                    if err.context() == UiErrorContext::BackendStartup {
                        self.finish_startup();
                    }
                    self.status_banner = Some(err.to_string());
                }
            }
        }
    }

    /// Entries recorded before the stored log arrived stay on top. The merged
    /// log is saved back so the earlier save of fresh entries alone does not win.
    fn merge_loaded_history(&mut self, loaded: HistoryLog) {
        if self.session.history().is_empty() {
            self.session.replace_history(loaded);
            return;
        }
        let merged = self
            .session
            .history()
            .entries()
            .iter()
            .chain(loaded.entries())
            .cloned()
            .collect();
        self.session.replace_history(HistoryLog::from_entries(merged));
        let history = self.session.history().clone();
        self.queue(BackendCommand::SaveHistory { history });
    }

    fn finish_startup(&mut self) {
        if self.preferences_ready {
            return;
        }
        self.preferences_ready = true;
        self.sound.play(FeedbackCategory::Startup);
    }

    fn press(&mut self, key: &KeyConfig) {
        let outcome = self.session.dispatch(key.action);
        self.sound.play(outcome.feedback);
        if let Some(entry) = &outcome.recorded {
            tracing::debug!(
                expression = %entry.expression,
                result = %entry.result,
                "recorded calculation"
            );
            let history = self.session.history().clone();
            self.queue(BackendCommand::SaveHistory { history });
        }
    }

    fn recall(&mut self, entry: &HistoryEntry) {
        self.session.recall(entry);
        self.sound.play(FeedbackCategory::KeyClick);
    }

    fn clear_history(&mut self) {
        self.session.clear_history();
        self.sound.play(FeedbackCategory::Clear);
        self.queue(BackendCommand::ClearHistory);
    }

    fn toggle_history(&mut self) {
        self.history_open = !self.history_open;
        self.sound.play(if self.history_open {
            FeedbackCategory::PanelOpen
        } else {
            FeedbackCategory::PanelClose
        });
    }

    fn toggle_muted(&mut self) {
        let muted = !self.sound.is_muted();
        self.sound.set_muted(muted);
        self.muted_override = None;
        self.queue(BackendCommand::SaveMuted { muted });
    }

    fn copy_result(&mut self) {
        let state = self.session.state();
        if state.is_error() {
            return;
        }
        let text = state.display.clone();
        let copied =
            Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.clone()));
        match copied {
            Ok(()) => self.status = format!("Copied {text}"),
            Err(err) => {
                let err = UiError::from_message(UiErrorContext::Clipboard, err.to_string());
                self.status_banner = Some(err.to_string());
            }
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());
        if events.iter().any(|event| matches!(event, egui::Event::Copy)) {
            self.copy_result();
        }
        let pressed = self.keyboard.handle_events(&events);
        if pressed.is_empty() {
            return;
        }
        // A focused keypad button would also react to Enter.
        if let Some(id) = ctx.memory(|mem| mem.focused()) {
            ctx.memory_mut(|mem| mem.surrender_focus(id));
        }
        for key in pressed {
            self.press(key);
        }
    }

    fn show_title_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("title_bar")
            .frame(
                egui::Frame::NONE
                    .fill(theme::BG_DEEP)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("NEBULA CALC")
                            .size(16.0)
                            .strong()
                            .color(theme::NEON_CYAN),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let history_label = if self.history_open {
                            "Close history"
                        } else {
                            "Open history"
                        };
                        if ui
                            .add(widgets::icon_btn("🕐", self.history_open))
                            .on_hover_text(history_label)
                            .clicked()
                        {
                            self.toggle_history();
                        }
                        let muted = self.sound.is_muted();
                        let (icon, hint) = if muted {
                            ("🔇", "Unmute sounds")
                        } else {
                            ("🔊", "Mute sounds")
                        };
                        if ui
                            .add_enabled(
                                self.sound.is_initialized(),
                                widgets::icon_btn(icon, !muted),
                            )
                            .on_hover_text(hint)
                            .clicked()
                        {
                            self.toggle_muted();
                        }
                    });
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        if self.status.is_empty() && self.status_banner.is_none() {
            return;
        }
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::NONE
                    .fill(theme::BG_SURFACE)
                    .inner_margin(egui::Margin::symmetric(12, 6)),
            )
            .show(ctx, |ui| {
                if let Some(banner) = self.status_banner.clone() {
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(banner).color(theme::ERROR));
                        if ui.small_button("Dismiss").clicked() {
                            self.status_banner = None;
                        }
                    });
                }
                if !self.status.is_empty() {
                    ui.label(egui::RichText::new(&self.status).color(theme::TEXT_SECONDARY));
                }
            });
    }

    fn show_history_panel(&mut self, ctx: &egui::Context) {
        if !self.history_open {
            return;
        }
        let mut recalled = None;
        let mut clear = false;
        egui::SidePanel::right("history_panel")
            .resizable(false)
            .exact_width(260.0)
            .frame(
                egui::Frame::NONE
                    .fill(theme::BG_SURFACE)
                    .inner_margin(egui::Margin::symmetric(12, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("History").size(16.0).strong());
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let has_entries = !self.session.history().is_empty();
                        if ui
                            .add_enabled(has_entries, egui::Button::new("Clear"))
                            .clicked()
                        {
                            clear = true;
                        }
                    });
                });
                ui.separator();
                if self.session.history().is_empty() {
                    ui.label(egui::RichText::new("No calculations yet").color(theme::TEXT_DIM));
                    return;
                }
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for entry in self.session.history().entries() {
                            if widgets::history_row(ui, entry) {
                                recalled = Some(entry.clone());
                            }
                        }
                    });
            });

        if let Some(entry) = recalled {
            self.recall(&entry);
        }
        if clear {
            self.clear_history();
        }
    }

    fn show_display(&mut self, ui: &mut egui::Ui) {
        let state = self.session.state().clone();
        let accent = if state.is_error() {
            theme::ERROR
        } else {
            theme::GLASS_BORDER
        };
        egui::Frame::new()
            .fill(theme::DISPLAY_FILL)
            .stroke(egui::Stroke::new(1.5, accent))
            .corner_radius(egui::CornerRadius::same(theme::PANEL_ROUNDING))
            .inner_margin(egui::Margin::symmetric(16, 12))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    let expression = if state.expression.is_empty() {
                        " ".to_string()
                    } else {
                        state.expression.clone()
                    };
                    ui.label(
                        egui::RichText::new(expression)
                            .size(15.0)
                            .color(theme::TEXT_SECONDARY),
                    );
                    let color = if state.is_error() {
                        theme::ERROR
                    } else {
                        theme::TEXT_PRIMARY
                    };
                    let readout = ui
                        .add(
                            egui::Label::new(
                                egui::RichText::new(&state.display)
                                    .size(widgets::display_font_size(&state.display))
                                    .color(color)
                                    .strong(),
                            )
                            .sense(egui::Sense::click()),
                        )
                        .on_hover_text("Click to copy");
                    if readout.clicked() {
                        self.copy_result();
                    }
                    let message = state.error_message().unwrap_or(" ");
                    ui.label(egui::RichText::new(message).size(13.0).color(theme::NEON_PINK));
                });
            });
    }

    fn show_keypad(&mut self, ui: &mut egui::Ui) {
        let spacing = ui.spacing().item_spacing.x;
        let unit = ((ui.available_width() - spacing * (KEYPAD_COLUMNS - 1.0)) / KEYPAD_COLUMNS)
            .max(40.0);
        let active = self.keyboard.active_key();
        let mut pressed = None;

        for row in KEYPAD_LAYOUT.iter() {
            ui.horizontal(|ui| {
                for key in row.iter() {
                    let width = widgets::key_width(unit, key.grid_span, spacing);
                    let response = ui
                        .add(widgets::keypad_button(key, width, active == Some(key.id)))
                        .on_hover_text(key.aria_label);
                    if response.clicked() {
                        pressed = Some(key);
                    }
                }
            });
        }
        ui.horizontal(|ui| {
            for key in VIRTUAL_KEYS.iter() {
                let width = widgets::key_width(unit, 1, spacing);
                if ui
                    .add(widgets::keypad_button(key, width, active == Some(key.id)))
                    .on_hover_text(key.aria_label)
                    .clicked()
                {
                    pressed = Some(key);
                }
            }
        });

        if let Some(key) = pressed {
            self.press(key);
        }
    }

    fn show_calculator(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::NONE
                    .fill(theme::BG_DEEP)
                    .inner_margin(egui::Margin::symmetric(16, 14)),
            )
            .show(ctx, |ui| {
                self.show_display(ui);
                ui.add_space(12.0);
                self.show_keypad(ui);
            });
    }
}

impl eframe::App for CalculatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        if !self.theme_applied {
            theme::apply(ctx);
            self.theme_applied = true;
        }

        self.handle_keyboard(ctx);
        self.show_title_bar(ctx);
        self.show_status_bar(ctx);
        self.show_history_panel(ctx);
        self.show_calculator(ctx);

        // Backend events arrive without input; keep polling at a low rate.
        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedWindowState {
            history_open: self.history_open,
        };
        if let Ok(serialized) = serde_json::to_string(&state) {
            storage.set_string(WINDOW_STATE_STORAGE_KEY, serialized);
        }
    }
}

impl Drop for CalculatorApp {
    fn drop(&mut self) {
        self.sound.dispose();
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
