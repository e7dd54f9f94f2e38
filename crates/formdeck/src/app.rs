#![forbid(unsafe_code)]

//! Application model: tab registry, message routing, notification modal.
//!
//! Three forms live side by side; switching tabs never touches their
//! state. While the submit notification is up it behaves like a modal
//! alert: every key except quit is swallowed until Enter or Escape
//! dismisses it. Background question fetches finish through
//! [`AppMsg::QuestionsFetched`] and are applied even while the modal is
//! showing, subject to the survey's token check.

use std::sync::Arc;

use formdeck_runtime::{
    Cmd, Color, Event, KeyCode, KeyEvent, Model, RequestToken, Style, Surface,
};
use tracing::info;

use crate::forms::event::EventRegistrationForm;
use crate::forms::job::JobApplicationForm;
use crate::forms::survey::SurveyForm;
use crate::forms::FormEffect;
use crate::questions::{QuestionSource, QuestionSourceError};

/// The three form tabs, in bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTab {
    EventRegistration,
    JobApplication,
    Survey,
}

impl FormTab {
    /// All tabs in display order.
    pub const ALL: [Self; 3] = [Self::EventRegistration, Self::JobApplication, Self::Survey];

    /// The tab bar label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::EventRegistration => "Event Registration",
            Self::JobApplication => "Job Application",
            Self::Survey => "Survey",
        }
    }

    /// Position in the bar, zero-based.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }

    /// Tab at a zero-based position, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The next tab, wrapping.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The previous tab, wrapping.
    #[must_use]
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Messages the application model handles.
#[derive(Debug)]
pub enum AppMsg {
    /// A key for the active form.
    Screen(KeyEvent),
    /// Jump to a specific tab.
    SwitchTab(FormTab),
    /// Cycle to the next tab.
    NextTab,
    /// Cycle to the previous tab.
    PrevTab,
    /// Close the submit notification.
    DismissNotification,
    /// A background question fetch finished.
    QuestionsFetched {
        token: RequestToken,
        result: Result<Vec<String>, QuestionSourceError>,
    },
    /// Terminal changed size; the next frame redraws anyway.
    Redraw,
    /// Exit the application.
    Quit,
}

impl From<Event> for AppMsg {
    fn from(event: Event) -> Self {
        match event {
            Event::Resize { .. } => Self::Redraw,
            Event::Key(key) => {
                if key.ctrl() && key.is_char('c') {
                    return Self::Quit;
                }
                if key.ctrl() {
                    match key.code {
                        KeyCode::Right => return Self::NextTab,
                        KeyCode::Left => return Self::PrevTab,
                        _ => {}
                    }
                }
                if let KeyCode::F(n) = key.code
                    && let Some(tab) = FormTab::from_index(n.saturating_sub(1) as usize)
                {
                    return Self::SwitchTab(tab);
                }
                Self::Screen(key)
            }
        }
    }
}

/// Top-level state: the active tab, the three forms, and the modal.
pub struct AppModel {
    active: FormTab,
    event_form: EventRegistrationForm,
    job_form: JobApplicationForm,
    survey_form: SurveyForm,
    notification: Option<String>,
    questions: Arc<dyn QuestionSource>,
}

impl AppModel {
    /// A fresh model on the event registration tab.
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionSource>) -> Self {
        Self {
            active: FormTab::EventRegistration,
            event_form: EventRegistrationForm::new(),
            job_form: JobApplicationForm::new(),
            survey_form: SurveyForm::new(),
            notification: None,
            questions,
        }
    }

    /// Start on a specific tab.
    #[must_use]
    pub fn with_tab(mut self, tab: FormTab) -> Self {
        self.active = tab;
        self
    }

    /// The active tab.
    #[must_use]
    pub fn active_tab(&self) -> FormTab {
        self.active
    }

    /// The notification body, while one is showing.
    #[must_use]
    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// The survey form, for inspection in tests.
    #[must_use]
    pub fn survey(&self) -> &SurveyForm {
        &self.survey_form
    }

    fn route_key(&mut self, key: &KeyEvent) -> Cmd<AppMsg> {
        let effect = match self.active {
            FormTab::EventRegistration => self.event_form.handle_key(key),
            FormTab::JobApplication => self.job_form.handle_key(key),
            FormTab::Survey => self.survey_form.handle_key(key),
        };
        self.apply_effect(effect)
    }

    fn apply_effect(&mut self, effect: FormEffect) -> Cmd<AppMsg> {
        match effect {
            FormEffect::None => Cmd::none(),
            FormEffect::Submit(body) => {
                info!(tab = self.active.title(), "form submitted");
                self.notification = Some(body);
                Cmd::none()
            }
            FormEffect::FetchQuestions { topic, token } => {
                let source = Arc::clone(&self.questions);
                Cmd::task(move || AppMsg::QuestionsFetched {
                    token,
                    result: source.fetch(topic),
                })
            }
        }
    }

    /// Handle a message while the notification modal is up. Only quit,
    /// dismissal keys, and background results get through.
    fn update_modal(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        match msg {
            AppMsg::Quit => Cmd::quit(),
            AppMsg::DismissNotification => {
                self.notification = None;
                Cmd::none()
            }
            AppMsg::Screen(key)
                if matches!(key.code, KeyCode::Enter | KeyCode::Escape) =>
            {
                self.notification = None;
                Cmd::none()
            }
            AppMsg::QuestionsFetched { token, result } => {
                self.survey_form.apply_questions(token, result);
                Cmd::none()
            }
            _ => Cmd::none(),
        }
    }

    fn draw_tab_bar(&self, surface: &mut Surface) {
        let mut x = 1;
        for tab in FormTab::ALL {
            let label = format!(" F{} {} ", tab.index() + 1, tab.title());
            let style = if tab == self.active {
                Style::new().reverse().bold()
            } else {
                Style::new()
            };
            x = surface.set_str(x, 0, &label, style) + 1;
        }
        surface.fill_row(1, '-', Style::new().fg(Color::DarkGrey));
    }

    fn draw_footer(&self, surface: &mut Surface) {
        let y = surface.height().saturating_sub(1);
        surface.set_str(
            0,
            y,
            "Tab next field | Enter submit | Ctrl+Left/Right switch form | Ctrl+C quit",
            Style::new().fg(Color::DarkGrey),
        );
    }

    fn draw_notification(&self, surface: &mut Surface, body: &str) {
        let width = surface.width();
        let height = surface.height();
        let box_x = 4.min(width.saturating_sub(1));
        let box_w = width.saturating_sub(box_x * 2);
        let border = Style::new().fg(Color::Yellow);

        surface.set_str(box_x, 2, &"=".repeat(box_w as usize), border);
        let mut y = 3;
        for line in body.lines() {
            if y >= height.saturating_sub(3) {
                surface.set_str(box_x + 2, y, "...", Style::new());
                y += 1;
                break;
            }
            surface.set_str(box_x + 2, y, line, Style::new());
            y += 1;
        }
        surface.set_str(
            box_x + 2,
            y,
            "Press Enter to continue",
            Style::new().bold(),
        );
        surface.set_str(box_x, y + 1, &"=".repeat(box_w as usize), border);
    }
}

impl Model for AppModel {
    type Message = AppMsg;

    fn update(&mut self, msg: AppMsg) -> Cmd<AppMsg> {
        if self.notification.is_some() {
            return self.update_modal(msg);
        }
        match msg {
            AppMsg::Screen(key) => self.route_key(&key),
            AppMsg::SwitchTab(tab) => {
                self.active = tab;
                Cmd::none()
            }
            AppMsg::NextTab => {
                self.active = self.active.next();
                Cmd::none()
            }
            AppMsg::PrevTab => {
                self.active = self.active.prev();
                Cmd::none()
            }
            AppMsg::DismissNotification | AppMsg::Redraw => Cmd::none(),
            AppMsg::QuestionsFetched { token, result } => {
                self.survey_form.apply_questions(token, result);
                Cmd::none()
            }
            AppMsg::Quit => Cmd::quit(),
        }
    }

    fn view(&self, surface: &mut Surface) {
        self.draw_tab_bar(surface);
        match self.active {
            FormTab::EventRegistration => self.event_form.draw(surface, 3),
            FormTab::JobApplication => self.job_form.draw(surface, 3),
            FormTab::Survey => self.survey_form.draw(surface, 3),
        }
        self.draw_footer(surface);
        if let Some(body) = &self.notification {
            self.draw_notification(surface, body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::CannedQuestionSource;
    use formdeck_runtime::Modifiers;

    fn model() -> AppModel {
        AppModel::new(Arc::new(CannedQuestionSource::new()))
    }

    fn key(code: KeyCode) -> AppMsg {
        AppMsg::Screen(KeyEvent::new(code))
    }

    // -- Message mapping --

    #[test]
    fn ctrl_c_maps_to_quit() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert!(matches!(AppMsg::from(event), AppMsg::Quit));
    }

    #[test]
    fn function_keys_map_to_tabs() {
        let event = Event::key(KeyCode::F(2));
        assert!(matches!(
            AppMsg::from(event),
            AppMsg::SwitchTab(FormTab::JobApplication)
        ));
        let event = Event::key(KeyCode::F(9));
        assert!(matches!(AppMsg::from(event), AppMsg::Screen(_)));
    }

    #[test]
    fn ctrl_arrows_cycle_tabs() {
        let right = Event::Key(KeyEvent::new(KeyCode::Right).with_modifiers(Modifiers::CTRL));
        assert!(matches!(AppMsg::from(right), AppMsg::NextTab));
        let left = Event::Key(KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::CTRL));
        assert!(matches!(AppMsg::from(left), AppMsg::PrevTab));
    }

    #[test]
    fn resize_maps_to_redraw() {
        let event = Event::Resize {
            width: 80,
            height: 24,
        };
        assert!(matches!(AppMsg::from(event), AppMsg::Redraw));
    }

    // -- Tab switching --

    #[test]
    fn tab_cycling_wraps() {
        let mut app = model();
        app.update(AppMsg::NextTab);
        assert_eq!(app.active_tab(), FormTab::JobApplication);
        app.update(AppMsg::NextTab);
        app.update(AppMsg::NextTab);
        assert_eq!(app.active_tab(), FormTab::EventRegistration);
        app.update(AppMsg::PrevTab);
        assert_eq!(app.active_tab(), FormTab::Survey);
    }

    #[test]
    fn switching_tabs_preserves_form_state() {
        let mut app = model();
        app.update(key(KeyCode::Char('A')));
        app.update(key(KeyCode::Char('d')));
        app.update(AppMsg::SwitchTab(FormTab::Survey));
        app.update(key(KeyCode::Char('x')));
        app.update(AppMsg::SwitchTab(FormTab::EventRegistration));
        assert_eq!(app.event_form.record().name, "Ad");
        assert_eq!(app.survey_form.record().full_name, "x");
    }

    #[test]
    fn tab_switch_does_not_trigger_validation() {
        let mut app = model();
        app.update(AppMsg::NextTab);
        assert!(app.event_form.errors().is_empty());
        assert!(app.job_form.errors().is_empty());
    }

    // -- Notification modal --

    fn submit_valid_event_form(app: &mut AppModel) {
        app.event_form.fill_valid();
        app.update(key(KeyCode::Enter));
    }

    #[test]
    fn valid_submit_raises_notification() {
        let mut app = model();
        submit_valid_event_form(&mut app);
        let body = app.notification().expect("notification should be up");
        assert!(body.starts_with("Form Submitted:"));
    }

    #[test]
    fn modal_swallows_form_input() {
        let mut app = model();
        submit_valid_event_form(&mut app);
        app.update(key(KeyCode::Char('z')));
        app.update(AppMsg::NextTab);
        assert!(app.notification().is_some());
        assert_eq!(app.active_tab(), FormTab::EventRegistration);
        assert_eq!(app.event_form.record().name, "Ada Lovelace");
    }

    #[test]
    fn enter_dismisses_the_modal() {
        let mut app = model();
        submit_valid_event_form(&mut app);
        app.update(key(KeyCode::Enter));
        assert!(app.notification().is_none());
    }

    #[test]
    fn escape_dismisses_the_modal() {
        let mut app = model();
        submit_valid_event_form(&mut app);
        app.update(key(KeyCode::Escape));
        assert!(app.notification().is_none());
    }

    #[test]
    fn quit_works_while_modal_is_up() {
        let mut app = model();
        submit_valid_event_form(&mut app);
        let cmd = app.update(AppMsg::Quit);
        assert!(matches!(cmd, Cmd::Quit));
    }

    // -- Question fetch plumbing --

    #[test]
    fn topic_change_spawns_a_fetch_task() {
        let mut app = model();
        app.update(AppMsg::SwitchTab(FormTab::Survey));
        let effect = app.survey_form.select_topic("Technology");
        let cmd = app.apply_effect(effect);
        let Cmd::Task(task) = cmd else {
            panic!("expected a background task");
        };

        // Run the task inline, the way the runtime would on a thread.
        let msg = task();
        let AppMsg::QuestionsFetched { token, ref result } = msg else {
            panic!("expected a fetch result message");
        };
        assert_eq!(token, app.survey().current_token());
        assert!(result.is_ok());

        app.update(msg);
        assert!(!app.survey().question_prompts().is_empty());
    }

    #[test]
    fn fetch_result_lands_even_while_modal_is_up() {
        let mut app = model();
        app.update(AppMsg::SwitchTab(FormTab::Survey));
        let effect = app.survey_form.select_topic("Health");
        let cmd = app.apply_effect(effect);
        let Cmd::Task(task) = cmd else {
            panic!("expected a background task");
        };
        let msg = task();

        app.update(AppMsg::SwitchTab(FormTab::EventRegistration));
        submit_valid_event_form(&mut app);
        assert!(app.notification().is_some());

        app.update(msg);
        assert!(!app.survey().question_prompts().is_empty());
    }

    // -- Rendering --

    #[test]
    fn view_renders_tab_bar_and_active_form() {
        let app = model();
        let mut surface = Surface::new(90, 24);
        app.view(&mut surface);
        assert!(surface.row_text(0).contains("Event Registration"));
        assert!(surface.row_text(0).contains("Survey"));
        assert!(surface.row_text(3).contains("Name:"));
        assert!(surface.row_text(23).contains("Ctrl+C quit"));
    }

    #[test]
    fn view_overlays_notification() {
        let mut app = model();
        submit_valid_event_form(&mut app);
        let mut surface = Surface::new(90, 30);
        app.view(&mut surface);
        assert!(surface.row_text(3).contains("Form Submitted:"));
        let rendered: Vec<String> = (0..30).map(|y| surface.row_text(y)).collect();
        assert!(rendered.iter().any(|r| r.contains("Press Enter to continue")));
    }
}
