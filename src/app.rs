//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components. Job state
//! lives in the [`Orchestrator`]; App only translates actions into requests.

use crate::action::Action;
use crate::component::Component;
use crate::components::wizard::WizardStep;
use crate::components::{
    ConfirmDialog, DirectoryPrompt, HelpDialog, LogView, PresetMenu, QuitDialog,
    ToolDetailsDialog, Wizard,
};
use crate::config::Config;
use crate::error::TransitionError;
use crate::model::job::JobPhase;
use crate::model::modal::{DirectoryPurpose, Modal, ModalStack};
use crate::orchestrator::{Orchestrator, Session};
use crate::services::{SystemHost, SystemToolProbe, ToolStatusMonitor};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{layout::Rect, Frame};
use std::path::PathBuf;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    pub orchestrator: Orchestrator<SystemHost>,

    /// Persisted preferences, updated whenever a job is confirmed
    pub config: Config,
    config_path: Option<PathBuf>,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// One-line notice shown until the next key press
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub wizard: Wizard,
    pub log_view: LogView,
    pub quit_dialog: QuitDialog,
    pub confirm_dialog: ConfirmDialog,
    pub directory_prompt: DirectoryPrompt,
    pub preset_menu: PresetMenu,
    pub tool_details: ToolDetailsDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Build the app on the real host, tools and config location
    pub fn new(config: Config) -> App {
        let work_dir = config.work_dir();
        let probe = SystemToolProbe::new(&work_dir, config.update_check_minutes);
        let monitor = ToolStatusMonitor::new(Arc::new(probe));
        let session = Session::new(config.job_settings(), monitor);
        let orchestrator = Orchestrator::new(SystemHost::new(work_dir), session);
        Self::with_parts(config, Config::config_path(), orchestrator)
    }

    pub fn with_parts(
        config: Config,
        config_path: Option<PathBuf>,
        orchestrator: Orchestrator<SystemHost>,
    ) -> App {
        let wizard = Wizard::new(&orchestrator.session().settings);
        App {
            orchestrator,
            config,
            config_path,
            modals: ModalStack::new(),
            should_quit: false,
            status_message: None,
            wizard,
            log_view: LogView::default(),
            quit_dialog: QuitDialog::default(),
            confirm_dialog: ConfirmDialog,
            directory_prompt: DirectoryPrompt::default(),
            preset_menu: PresetMenu::default(),
            tool_details: ToolDetailsDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    /// Push the wizard's edits into the session while edits are allowed
    fn sync_settings(&mut self) {
        if let Some(settings) = self.orchestrator.settings_mut() {
            self.wizard.write_settings(settings);
        }
    }

    fn save_config(&mut self) {
        let settings = self.orchestrator.session().settings.clone();
        self.config.remember(&settings);
        let result = match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => Err(anyhow::anyhow!("Could not determine config path")),
        };
        if let Err(e) = result {
            log::error!("failed to save config: {:#}", e);
        }
    }

    fn start_job(&mut self) {
        match self.orchestrator.confirm() {
            Ok(()) => {
                self.modals.remove_where(|m| matches!(m, Modal::StartConfirm));
                self.log_view.reset();
                self.save_config();
            }
            // the dialog keeps Start greyed out until acknowledged
            Err(TransitionError::AcknowledgementRequired) => {}
            Err(e) => {
                log::warn!("confirm refused: {}", e);
                self.modals.remove_where(|m| matches!(m, Modal::StartConfirm));
                self.status_message = Some(e.to_string());
            }
        }
    }

    fn set_directory(&mut self, purpose: DirectoryPurpose, path: PathBuf) -> Option<Action> {
        if matches!(self.modals.top(), Some(Modal::DirectoryPrompt { .. })) {
            self.modals.pop();
        }
        let Some(settings) = self.orchestrator.settings_mut() else {
            self.status_message = Some("Settings are locked while a job is active".to_string());
            return None;
        };
        match purpose {
            DirectoryPurpose::Output => {
                settings.set_output_directory(Some(path));
                None
            }
            DirectoryPurpose::Transcode => {
                settings.set_tool_directory(Some(path));
                // a new FFmpeg location needs a new probe
                Some(Action::CheckTools)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.status_message = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(match self.modals.top() {
                Some(Modal::QuitConfirm) => Some(Action::ForceQuit),
                _ => Some(Action::OpenQuitDialog),
            });
        }
        if key.code == KeyCode::F(1) && self.modals.is_empty() {
            return Ok(Some(Action::OpenHelp));
        }

        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else if self.orchestrator.phase().shows_log() {
            self.log_view.handle_key_event(key)
        } else {
            self.wizard.handle_key_event(key)
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.modals.is_empty() && self.orchestrator.phase().shows_log() {
            self.log_view.handle_mouse_event(mouse)
        } else {
            Ok(None)
        }
    }

    fn handle_paste(&mut self, text: String) -> Result<Option<Action>> {
        match self.modals.top() {
            Some(Modal::DirectoryPrompt { .. }) => self.directory_prompt.handle_paste(text),
            Some(_) => Ok(None),
            None if self.orchestrator.phase().shows_log() => Ok(None),
            None => self.wizard.handle_paste(text),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.orchestrator.poll();
            }
            Action::ForceQuit => {
                self.orchestrator.shutdown();
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Wizard
            // ─────────────────────────────────────────────────────────────────
            Action::NextStep | Action::PrevStep | Action::ToggleSelectionMode => {
                return self.wizard.update(action);
            }
            Action::SettingsEdited => self.sync_settings(),
            Action::OpenPresetMenu => {
                self.preset_menu.selected_index = 0;
                self.modals.push(Modal::PresetMenu { selected_index: 0 });
            }
            Action::OpenDirectoryPrompt(purpose) => {
                let settings = &self.orchestrator.session().settings;
                let current = match purpose {
                    DirectoryPurpose::Output => settings.output_directory.as_deref(),
                    DirectoryPurpose::Transcode => settings.tool_directory.as_deref(),
                };
                self.directory_prompt.open(purpose, current);
                self.modals.push(Modal::DirectoryPrompt { purpose });
            }
            Action::SetDirectory(purpose, path) => {
                return Ok(self.set_directory(purpose, path));
            }
            Action::CheckTools => self.orchestrator.check_tools(),
            Action::OpenToolDetails(kind) => {
                self.tool_details.scroll_offset = 0;
                self.modals.push(Modal::ToolDetails { kind });
            }

            // ─────────────────────────────────────────────────────────────────
            // Job
            // ─────────────────────────────────────────────────────────────────
            Action::RequestStart => {
                self.sync_settings();
                match self.orchestrator.request_start() {
                    Ok(risks) => {
                        log::debug!("start requested with {} risk(s)", risks.len());
                        self.modals.push(Modal::StartConfirm);
                    }
                    Err(e) => self.status_message = Some(e.to_string()),
                }
            }
            Action::ToggleAcknowledge => {
                if let JobPhase::Confirming { acknowledged } = self.orchestrator.phase() {
                    if let Err(e) = self.orchestrator.set_acknowledged(!acknowledged) {
                        log::warn!("acknowledge refused: {}", e);
                    }
                }
            }
            Action::ResetJob => match self.orchestrator.reset() {
                Ok(()) => {
                    self.wizard.step = WizardStep::Urls;
                    self.log_view.reset();
                }
                Err(TransitionError::Busy) => {
                    self.status_message =
                        Some("yt-dlp is still running; reset is available once it finishes".to_string());
                }
                Err(e) => self.status_message = Some(e.to_string()),
            },

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (delegate to LogView)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp
            | Action::ScrollDown
            | Action::PageUp
            | Action::PageDown
            | Action::ScrollToBottom => {
                self.log_view.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                if self.modals.top() != Some(&Modal::QuitConfirm) {
                    self.modals.push(Modal::QuitConfirm);
                }
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                if matches!(self.modals.top(), Some(Modal::StartConfirm)) {
                    if let Err(e) = self.orchestrator.cancel() {
                        log::warn!("cancel refused: {}", e);
                    }
                }
                self.modals.pop();
            }
            Action::ConfirmModal => match self.modals.top().cloned() {
                Some(Modal::StartConfirm) => self.start_job(),
                Some(Modal::PresetMenu { .. }) => {
                    if let Some(preset) = self.preset_menu.selected() {
                        self.wizard.apply_preset(preset);
                    }
                    self.modals.pop();
                    return Ok(Some(Action::SettingsEdited));
                }
                _ => {}
            },
            Action::ModalUp | Action::ModalDown => {
                if let Some(Modal::PresetMenu { selected_index }) = self.modals.top_mut() {
                    self.preset_menu.update(action)?;
                    *selected_index = self.preset_menu.selected_index;
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let phase = self.orchestrator.phase();
        let session = self.orchestrator.session();
        if phase.shows_log() {
            let elapsed = self.orchestrator.run().map(|run| run.elapsed());
            self.log_view.draw_with_log(
                frame,
                area,
                &session.log,
                phase,
                elapsed,
                self.status_message.as_deref(),
            )?;
        } else {
            self.wizard.draw_with_session(
                frame,
                area,
                &session.settings,
                session.statuses(),
                self.status_message.as_deref(),
            )?;
        }

        // bottom to top, so the active modal ends up in front
        let modals: Vec<Modal> = self.modals.iter().cloned().collect();
        for modal in &modals {
            self.draw_modal(frame, area, modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::StartConfirm => self.confirm_dialog.handle_key_event(key),
            Modal::DirectoryPrompt { .. } => self.directory_prompt.handle_key_event(key),
            Modal::PresetMenu { .. } => self.preset_menu.handle_key_event(key),
            Modal::ToolDetails { .. } => self.tool_details.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => {
                self.quit_dialog.job_running = self.orchestrator.is_processing();
                self.quit_dialog.draw(frame, area)
            }
            Modal::StartConfirm => {
                let acknowledged = matches!(
                    self.orchestrator.phase(),
                    JobPhase::Confirming { acknowledged: true }
                );
                self.confirm_dialog.draw_with_risks(
                    frame,
                    area,
                    &self.orchestrator.risks(),
                    acknowledged,
                    self.orchestrator.can_confirm(),
                )
            }
            Modal::DirectoryPrompt { .. } => self.directory_prompt.draw(frame, area),
            Modal::PresetMenu { .. } => self.preset_menu.draw(frame, area),
            Modal::ToolDetails { kind } => {
                let status = self.orchestrator.session().statuses().get(*kind);
                self.tool_details.draw_with_status(frame, area, *kind, status)
            }
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::job::JobOutcome;
    use crate::model::log_buffer::LineKind;
    use crate::model::settings::SelectionMode;
    use crate::services::tools::tests::FakeProbe;
    use std::time::{Duration, Instant};

    struct Fixture {
        app: App,
        dir: tempfile::TempDir,
    }

    fn fixture(tools_ok: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let probe = FakeProbe {
            download: if tools_ok {
                Ok("2024.08.06".to_string())
            } else {
                Err("offline".to_string())
            },
            transcode_ok: tools_ok,
        };
        let config = Config::default();
        let monitor = ToolStatusMonitor::new(Arc::new(probe));
        let session = Session::new(config.job_settings(), monitor);
        let orchestrator =
            Orchestrator::new(SystemHost::new(dir.path().join("work")), session);
        let app = App::with_parts(config, Some(dir.path().join("config.json")), orchestrator);
        Fixture { app, dir }
    }

    fn key(app: &mut App, code: KeyCode) {
        let action = app.handle_key_event(KeyEvent::from(code)).unwrap();
        dispatch(app, action);
    }

    fn dispatch(app: &mut App, action: Option<Action>) {
        let mut current = action;
        while let Some(a) = current {
            current = app.update(a).unwrap();
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            key(app, KeyCode::Char(c));
        }
    }

    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.orchestrator.session().statuses().any_loading() && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_typed_urls_reach_the_session() {
        let Fixture { mut app, .. } = fixture(true);
        type_text(&mut app, "http://a");
        key(&mut app, KeyCode::Enter);
        let pasted = app.handle_paste("http://b\r\n".to_string()).unwrap();
        dispatch(&mut app, pasted);

        let settings = &app.orchestrator.session().settings;
        assert_eq!(settings.url_count(), 2);
        assert_eq!(settings.url_list[0], "http://a");
    }

    #[test]
    fn test_entering_start_step_checks_tools() {
        let Fixture { mut app, .. } = fixture(false);
        key(&mut app, KeyCode::Tab);
        key(&mut app, KeyCode::Tab);
        assert_eq!(app.wizard.step, WizardStep::Start);
        settle(&mut app);
        let statuses = app.orchestrator.session().statuses();
        assert_eq!(statuses.download.error(), Some("yt-dlp error: offline"));
    }

    #[test]
    fn test_preset_menu_appends_to_custom_options() {
        let Fixture { mut app, .. } = fixture(true);
        key(&mut app, KeyCode::Tab);
        key(&mut app, KeyCode::Char(' '));
        assert_eq!(
            app.orchestrator.session().settings.selection_mode,
            SelectionMode::Custom
        );

        dispatch(&mut app, Some(Action::OpenPresetMenu));
        key(&mut app, KeyCode::Down);
        assert_eq!(app.modals.top(), Some(&Modal::PresetMenu { selected_index: 1 }));
        key(&mut app, KeyCode::Enter);
        assert!(app.modals.is_empty());
        assert_eq!(
            app.orchestrator.session().settings.custom_options,
            r#"-f "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best""#
        );
    }

    #[test]
    fn test_directory_prompt_cancel_is_noop() {
        let Fixture { mut app, dir } = fixture(true);
        dispatch(&mut app, Some(Action::OpenDirectoryPrompt(DirectoryPurpose::Output)));
        type_text(&mut app, &dir.path().display().to_string());
        key(&mut app, KeyCode::Esc);
        assert!(app.modals.is_empty());
        assert_eq!(app.orchestrator.session().settings.output_directory, None);

        dispatch(&mut app, Some(Action::OpenDirectoryPrompt(DirectoryPurpose::Output)));
        let pasted = app
            .handle_paste(dir.path().display().to_string())
            .unwrap();
        dispatch(&mut app, pasted);
        key(&mut app, KeyCode::Enter);
        assert!(app.modals.is_empty());
        assert_eq!(
            app.orchestrator.session().settings.output_directory.as_deref(),
            Some(dir.path())
        );
    }

    #[test]
    fn test_cancelled_confirmation_returns_to_idle() {
        let Fixture { mut app, .. } = fixture(false);
        dispatch(&mut app, Some(Action::RequestStart));
        assert_eq!(app.modals.top(), Some(&Modal::StartConfirm));
        assert!(!app.orchestrator.can_confirm());

        // Enter without acknowledging leaves the dialog up
        key(&mut app, KeyCode::Enter);
        assert_eq!(app.modals.top(), Some(&Modal::StartConfirm));

        key(&mut app, KeyCode::Esc);
        assert!(app.modals.is_empty());
        assert_eq!(app.orchestrator.phase(), JobPhase::Idle);
    }

    #[test]
    fn test_start_without_binary_fails_into_log_and_resets() {
        let Fixture { mut app, dir } = fixture(false);
        type_text(&mut app, "http://a");
        dispatch(&mut app, Some(Action::RequestStart));
        key(&mut app, KeyCode::Char(' '));
        key(&mut app, KeyCode::Enter);

        // no yt-dlp binary in the work directory, so the launch fails
        assert!(app.modals.is_empty());
        assert_eq!(
            app.orchestrator.phase(),
            JobPhase::Terminal(JobOutcome::Failure)
        );
        let log = &app.orchestrator.session().log;
        assert_eq!(log.count_kind(LineKind::Error), 1);
        assert!(log
            .iter()
            .any(|l| l.kind == LineKind::Error && l.text.starts_with("Process failed:")));
        assert!(dir.path().join("work").join("url-list.txt").exists());
        assert!(dir.path().join("config.json").exists());

        key(&mut app, KeyCode::Char('r'));
        assert_eq!(app.orchestrator.phase(), JobPhase::Idle);
        assert_eq!(app.wizard.step, WizardStep::Urls);
        assert!(app.orchestrator.session().log.is_empty());
        assert_eq!(app.orchestrator.session().settings.url_count(), 1);
    }

    #[test]
    fn test_quit_flow() {
        let Fixture { mut app, .. } = fixture(true);
        key(&mut app, KeyCode::Esc);
        assert_eq!(app.modals.top(), Some(&Modal::QuitConfirm));
        key(&mut app, KeyCode::Char('n'));
        assert!(!app.should_quit);

        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        dispatch(&mut app, action);
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        dispatch(&mut app, action);
        assert!(app.should_quit);
    }
}
