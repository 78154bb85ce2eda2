//! Job wizard component
//!
//! Three steps: the URL list, download settings, and the Start step with tool
//! status and directories. The wizard owns the text being edited and writes it
//! into the job settings whenever it changes.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::calculate_screen_layout;
use crate::model::modal::DirectoryPurpose;
use crate::model::presets::append_preset;
use crate::model::settings::{JobSettings, SelectionMode};
use crate::model::tool_status::{ToolKind, ToolStatus, ToolStatuses};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Urls,
    Settings,
    Start,
}

impl WizardStep {
    fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Urls => Some(WizardStep::Settings),
            WizardStep::Settings => Some(WizardStep::Start),
            WizardStep::Start => None,
        }
    }

    fn prev(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Urls => None,
            WizardStep::Settings => Some(WizardStep::Urls),
            WizardStep::Start => Some(WizardStep::Settings),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WizardStep::Urls => "Enter URLs",
            WizardStep::Settings => "Download Settings",
            WizardStep::Start => "Start",
        }
    }

    fn step_number(&self) -> usize {
        match self {
            WizardStep::Urls => 1,
            WizardStep::Settings => 2,
            WizardStep::Start => 3,
        }
    }
}

/// Focused field on the settings step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Mode,
    CustomOptions,
}

pub struct Wizard {
    pub step: WizardStep,
    pub url_input: String,
    pub selection_mode: SelectionMode,
    pub custom_input: String,
    pub field: SettingsField,
}

impl Wizard {
    pub fn new(settings: &JobSettings) -> Self {
        Self {
            step: WizardStep::Urls,
            url_input: settings.url_text(),
            selection_mode: settings.selection_mode,
            custom_input: settings.custom_options.clone(),
            field: SettingsField::Mode,
        }
    }

    /// Copy the edited text into `settings`
    pub fn write_settings(&self, settings: &mut JobSettings) {
        settings.set_url_text(&self.url_input);
        settings.selection_mode = self.selection_mode;
        settings.custom_options = self.custom_input.clone();
    }

    pub fn apply_preset(&mut self, preset: &str) {
        self.custom_input = append_preset(&self.custom_input, preset);
    }

    fn advance_step(&mut self) -> Option<Action> {
        let next = self.step.next()?;
        self.step = next;
        // the Start step always shows fresh tool status
        (next == WizardStep::Start).then_some(Action::CheckTools)
    }

    fn go_back(&mut self) {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
    }

    fn toggle_mode(&mut self) {
        self.selection_mode = self.selection_mode.toggled();
        if self.selection_mode == SelectionMode::Automatic {
            self.field = SettingsField::Mode;
        }
    }

    fn editing_custom(&self) -> bool {
        self.field == SettingsField::CustomOptions && self.selection_mode == SelectionMode::Custom
    }

    fn handle_urls_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab => Some(Action::NextStep),
            KeyCode::Esc => Some(Action::OpenQuitDialog),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.url_input.clear();
                Some(Action::SettingsEdited)
            }
            KeyCode::Enter => {
                self.url_input.push('\n');
                Some(Action::SettingsEdited)
            }
            KeyCode::Backspace => {
                self.url_input.pop();
                Some(Action::SettingsEdited)
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.url_input.push(c);
                Some(Action::SettingsEdited)
            }
            _ => None,
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab => return Some(Action::NextStep),
            KeyCode::BackTab | KeyCode::Esc => return Some(Action::PrevStep),
            KeyCode::Char('p') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::OpenPresetMenu)
            }
            KeyCode::Up => {
                self.field = SettingsField::Mode;
                return None;
            }
            KeyCode::Down => {
                if self.selection_mode == SelectionMode::Custom {
                    self.field = SettingsField::CustomOptions;
                }
                return None;
            }
            _ => {}
        }

        if self.editing_custom() {
            match key.code {
                KeyCode::Backspace => {
                    self.custom_input.pop();
                    Some(Action::SettingsEdited)
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.custom_input.push(c);
                    Some(Action::SettingsEdited)
                }
                _ => None,
            }
        } else {
            match key.code {
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                    Some(Action::ToggleSelectionMode)
                }
                _ => None,
            }
        }
    }

    fn handle_start_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('s') => Some(Action::RequestStart),
            KeyCode::Char('o') => Some(Action::OpenDirectoryPrompt(DirectoryPurpose::Output)),
            KeyCode::Char('f') => Some(Action::OpenDirectoryPrompt(DirectoryPurpose::Transcode)),
            KeyCode::Char('r') => Some(Action::CheckTools),
            KeyCode::Char('1') => Some(Action::OpenToolDetails(ToolKind::Download)),
            KeyCode::Char('2') => Some(Action::OpenToolDetails(ToolKind::Transcode)),
            KeyCode::BackTab | KeyCode::Esc | KeyCode::Backspace => Some(Action::PrevStep),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            _ => None,
        }
    }
}

impl Component for Wizard {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match self.step {
            WizardStep::Urls => self.handle_urls_key(key),
            WizardStep::Settings => self.handle_settings_key(key),
            WizardStep::Start => self.handle_start_key(key),
        };
        Ok(action)
    }

    fn handle_paste(&mut self, text: String) -> Result<Option<Action>> {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        match self.step {
            WizardStep::Urls => {
                self.url_input.push_str(&text);
                Ok(Some(Action::SettingsEdited))
            }
            WizardStep::Settings if self.editing_custom() => {
                let flat: Vec<&str> = text.split_whitespace().collect();
                let joined = flat.join(" ");
                if !self.custom_input.is_empty() && !self.custom_input.ends_with(' ') {
                    self.custom_input.push(' ');
                }
                self.custom_input.push_str(&joined);
                Ok(Some(Action::SettingsEdited))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextStep => Ok(self.advance_step()),
            Action::PrevStep => {
                self.go_back();
                Ok(None)
            }
            Action::ToggleSelectionMode => {
                self.toggle_mode();
                Ok(Some(Action::SettingsEdited))
            }
            _ => Ok(None),
        }
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // The Start step needs settings and tool status, so we use draw_with_session
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

impl Wizard {
    pub fn draw_with_session(
        &self,
        frame: &mut Frame,
        area: Rect,
        settings: &JobSettings,
        statuses: &ToolStatuses,
        status_message: Option<&str>,
    ) -> Result<()> {
        frame.render_widget(Clear, area);
        let layout = calculate_screen_layout(area, status_message.is_some());

        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " ytdlp-tui ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    " Step {} of 3: {}",
                    self.step.step_number(),
                    self.step.title()
                ),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, layout.title);

        match self.step {
            WizardStep::Urls => self.draw_urls(frame, layout.body, settings),
            WizardStep::Settings => self.draw_settings(frame, layout.body),
            WizardStep::Start => self.draw_start(frame, layout.body, settings, statuses),
        }

        if let (Some(area), Some(message)) = (layout.status, status_message) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}", message),
                    Style::default().fg(Color::Yellow),
                )),
                area,
            );
        }

        let help = Paragraph::new(Line::from(help_spans(self.step)))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, layout.help);
        Ok(())
    }

    fn draw_urls(&self, frame: &mut Frame, area: Rect, settings: &JobSettings) {
        let mut lines: Vec<Line> = self
            .url_input
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled(
                "_",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        // keep the cursor line in view
        let visible = area.height.saturating_sub(2) as usize;
        let scroll = lines.len().saturating_sub(visible);

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(
                        " Download URLs ({}) - one per line ",
                        settings.url_count()
                    ))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((scroll as u16, 0));
        frame.render_widget(paragraph, area);
    }

    fn draw_settings(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(area);

        let mode_focused = self.field == SettingsField::Mode;
        let radio = |mode: SelectionMode| {
            let selected = self.selection_mode == mode;
            let marker = if selected { "(•) " } else { "( ) " };
            let mut style = Style::default();
            if selected {
                style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
            }
            Span::styled(format!("{}{}", marker, mode.label()), style)
        };
        let mode_lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::raw("  "),
                radio(SelectionMode::Automatic),
                Span::raw("    "),
                radio(SelectionMode::Custom),
            ]),
        ];
        let mode_widget = Paragraph::new(mode_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Selection Mode ")
                .border_style(focus_style(mode_focused)),
        );
        frame.render_widget(mode_widget, chunks[0]);

        let custom_lines = match self.selection_mode {
            SelectionMode::Automatic => vec![Line::from(Span::styled(
                "yt-dlp chooses formats itself. Switch to Custom to pass your own options.",
                Style::default().fg(Color::DarkGray),
            ))],
            SelectionMode::Custom => {
                let cursor = if self.editing_custom() { "_" } else { "" };
                vec![
                    Line::from(vec![
                        Span::styled("> ", Style::default().fg(Color::Cyan)),
                        Span::styled(
                            format!("{}{}", self.custom_input, cursor),
                            Style::default()
                                .fg(Color::White)
                                .add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(""),
                    Line::from(Span::styled(
                        "Ctrl+P picks from common option presets",
                        Style::default().fg(Color::DarkGray),
                    )),
                ]
            }
        };
        let custom_widget = Paragraph::new(custom_lines)
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Custom Options ")
                    .border_style(focus_style(self.editing_custom())),
            );
        frame.render_widget(custom_widget, chunks[1]);
    }

    fn draw_start(
        &self,
        frame: &mut Frame,
        area: Rect,
        settings: &JobSettings,
        statuses: &ToolStatuses,
    ) {
        let label_style = Style::default().fg(Color::Cyan);
        let mut lines = vec![
            Line::from(Span::styled(
                "Tools",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        for (key, kind) in [("1", ToolKind::Download), ("2", ToolKind::Transcode)] {
            let (badge, color) = tool_badge(statuses.get(kind));
            lines.push(Line::from(vec![
                Span::styled(format!("  [{}] ", key), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<16}", kind.label()), label_style),
                Span::styled(badge, Style::default().fg(color)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Directories",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let output = match &settings.output_directory {
            Some(dir) => Span::raw(dir.display().to_string()),
            None => Span::styled("not set", Style::default().fg(Color::Red)),
        };
        lines.push(Line::from(vec![
            Span::styled("  Output:  ", label_style),
            output,
        ]));
        let transcode = match &settings.tool_directory {
            Some(dir) => Span::raw(dir.display().to_string()),
            None => Span::styled("from PATH", Style::default().fg(Color::DarkGray)),
        };
        lines.push(Line::from(vec![
            Span::styled("  FFmpeg:  ", label_style),
            transcode,
        ]));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Job",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("  URLs:    ", label_style),
            Span::raw(settings.url_count().to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Mode:    ", label_style),
            Span::raw(settings.selection_mode.label()),
        ]));
        if let Some(custom) = settings.effective_custom_options() {
            lines.push(Line::from(vec![
                Span::styled("  Options: ", label_style),
                Span::raw(custom.to_string()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[ Enter  Start download ]",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));

        let paragraph = Paragraph::new(lines)
            .wrap(ratatui::widgets::Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Ready to Start ")
                    .border_style(Style::default().fg(Color::Green)),
            );
        frame.render_widget(paragraph, area);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Short status text and colour for a tool badge
pub fn tool_badge(status: &ToolStatus) -> (String, Color) {
    match status {
        ToolStatus::Loading => ("⏳ checking...".to_string(), Color::Yellow),
        ToolStatus::Ready { version, .. } => (format!("✓ {}", version.trim()), Color::Green),
        ToolStatus::Failed { error } => {
            let first = error.lines().next().unwrap_or_default();
            (format!("✗ {}", first), Color::Red)
        }
    }
}

fn help_spans(step: WizardStep) -> Vec<Span<'static>> {
    let key = |k: &'static str, color: Color| {
        Span::styled(k, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    match step {
        WizardStep::Urls => vec![
            key(" Tab ", Color::Green),
            Span::raw("Next  "),
            key(" Enter ", Color::Cyan),
            Span::raw("New line  "),
            key(" Ctrl+U ", Color::Magenta),
            Span::raw("Clear  "),
            key(" F1 ", Color::Cyan),
            Span::raw("Help  "),
            key(" Esc ", Color::Yellow),
            Span::raw("Quit"),
        ],
        WizardStep::Settings => vec![
            key(" Tab ", Color::Green),
            Span::raw("Next  "),
            key(" Esc ", Color::Yellow),
            Span::raw("Back  "),
            key(" ↑/↓ ", Color::Cyan),
            Span::raw("Field  "),
            key(" Space ", Color::Cyan),
            Span::raw("Toggle mode  "),
            key(" Ctrl+P ", Color::Magenta),
            Span::raw("Presets"),
        ],
        WizardStep::Start => vec![
            key(" Enter ", Color::Green),
            Span::raw("Start  "),
            key(" o ", Color::Cyan),
            Span::raw("Output dir  "),
            key(" f ", Color::Cyan),
            Span::raw("FFmpeg dir  "),
            key(" r ", Color::Magenta),
            Span::raw("Recheck  "),
            key(" 1/2 ", Color::Magenta),
            Span::raw("Details  "),
            key(" Esc ", Color::Yellow),
            Span::raw("Back"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    fn press(wizard: &mut Wizard, code: KeyCode) -> Option<Action> {
        wizard.handle_key_event(KeyEvent::from(code)).unwrap()
    }

    fn ctrl(wizard: &mut Wizard, c: char) -> Option<Action> {
        wizard
            .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
            .unwrap()
    }

    #[test]
    fn test_step_navigation_checks_tools_on_start() {
        let mut wizard = Wizard::new(&JobSettings::default());
        assert_eq!(wizard.update(Action::NextStep).unwrap(), None);
        assert_eq!(wizard.step, WizardStep::Settings);
        assert_eq!(
            wizard.update(Action::NextStep).unwrap(),
            Some(Action::CheckTools)
        );
        assert_eq!(wizard.step, WizardStep::Start);
        assert_eq!(wizard.update(Action::NextStep).unwrap(), None);
        assert_eq!(wizard.step, WizardStep::Start);

        wizard.update(Action::PrevStep).unwrap();
        wizard.update(Action::PrevStep).unwrap();
        wizard.update(Action::PrevStep).unwrap();
        assert_eq!(wizard.step, WizardStep::Urls);
    }

    #[test]
    fn test_url_typing_and_settings_sync() {
        let mut wizard = Wizard::new(&JobSettings::default());
        for c in "http://a".chars() {
            assert_eq!(press(&mut wizard, KeyCode::Char(c)), Some(Action::SettingsEdited));
        }
        press(&mut wizard, KeyCode::Enter);
        press(&mut wizard, KeyCode::Char('x'));
        press(&mut wizard, KeyCode::Backspace);

        let mut settings = JobSettings::default();
        wizard.write_settings(&mut settings);
        assert_eq!(settings.url_list, vec!["http://a".to_string()]);

        ctrl(&mut wizard, 'u');
        assert!(wizard.url_input.is_empty());
        assert_eq!(press(&mut wizard, KeyCode::Esc), Some(Action::OpenQuitDialog));
    }

    #[test]
    fn test_paste_normalises_line_endings() {
        let mut wizard = Wizard::new(&JobSettings::default());
        let action = wizard
            .handle_paste("http://a\r\nhttp://b\rhttp://c".to_string())
            .unwrap();
        assert_eq!(action, Some(Action::SettingsEdited));
        assert_eq!(wizard.url_input, "http://a\nhttp://b\nhttp://c");
    }

    #[test]
    fn test_custom_options_only_editable_in_custom_mode() {
        let mut wizard = Wizard::new(&JobSettings::default());
        wizard.step = WizardStep::Settings;

        // automatic mode: Down keeps focus on the mode selector
        press(&mut wizard, KeyCode::Down);
        assert_eq!(wizard.field, SettingsField::Mode);
        assert_eq!(
            press(&mut wizard, KeyCode::Char(' ')),
            Some(Action::ToggleSelectionMode)
        );
        wizard.update(Action::ToggleSelectionMode).unwrap();
        assert_eq!(wizard.selection_mode, SelectionMode::Custom);

        press(&mut wizard, KeyCode::Down);
        assert_eq!(wizard.field, SettingsField::CustomOptions);
        press(&mut wizard, KeyCode::Char('-'));
        press(&mut wizard, KeyCode::Char('x'));
        assert_eq!(wizard.custom_input, "-x");

        wizard
            .handle_paste("--audio-format\nmp3".to_string())
            .unwrap();
        assert_eq!(wizard.custom_input, "-x --audio-format mp3");

        assert_eq!(ctrl(&mut wizard, 'p'), Some(Action::OpenPresetMenu));

        press(&mut wizard, KeyCode::Up);
        wizard.update(Action::ToggleSelectionMode).unwrap();
        assert_eq!(wizard.selection_mode, SelectionMode::Automatic);
        assert_eq!(wizard.field, SettingsField::Mode);
    }

    #[test]
    fn test_apply_preset_appends() {
        let mut wizard = Wizard::new(&JobSettings {
            custom_options: "--embed-subs ".to_string(),
            ..Default::default()
        });
        wizard.apply_preset("--extract-audio");
        assert_eq!(wizard.custom_input, "--embed-subs --extract-audio");
    }

    #[test]
    fn test_start_step_keys() {
        let mut wizard = Wizard::new(&JobSettings::default());
        wizard.step = WizardStep::Start;
        assert_eq!(press(&mut wizard, KeyCode::Enter), Some(Action::RequestStart));
        assert_eq!(
            press(&mut wizard, KeyCode::Char('f')),
            Some(Action::OpenDirectoryPrompt(DirectoryPurpose::Transcode))
        );
        assert_eq!(
            press(&mut wizard, KeyCode::Char('2')),
            Some(Action::OpenToolDetails(ToolKind::Transcode))
        );
        assert_eq!(press(&mut wizard, KeyCode::Char('r')), Some(Action::CheckTools));
        assert_eq!(wizard.handle_paste("ignored".to_string()).unwrap(), None);
    }

    #[test]
    fn test_tool_badge_text() {
        assert_eq!(tool_badge(&ToolStatus::Loading).1, Color::Yellow);
        let (text, color) = tool_badge(&ToolStatus::Ready {
            version: "2024.08.06\n".to_string(),
            full_output: String::new(),
        });
        assert_eq!(text, "✓ 2024.08.06");
        assert_eq!(color, Color::Green);
        let (text, _) = tool_badge(&ToolStatus::Failed {
            error: "Failed to launch ffmpeg: not found\nmore".to_string(),
        });
        assert_eq!(text, "✗ Failed to launch ffmpeg: not found");
    }
}
