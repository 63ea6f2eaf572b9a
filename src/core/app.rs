//! Application state shared between the event loop, renderer, and commands.

use std::error::Error;
use std::path::PathBuf;

use crate::core::config::{Config, ThemeColor};
use crate::core::session::ChatSession;
use crate::core::transport::{QueryParams, QueryService};
use crate::ui::appearance::{detect_preferred_appearance, Appearance};
use crate::ui::theme::Theme;
use crate::utils::direction::TextDirection;

pub struct App {
    pub session: ChatSession,
    pub input: String,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub exit_requested: bool,
    pub config: Config,
    pub theme: Theme,
    pub dark_mode: bool,
    pub client: reqwest::Client,
    pub base_url: String,
    pub query: QueryService,
    config_path: Option<PathBuf>,
}

impl App {
    /// Build the app from loaded preferences. `config_path` is where
    /// preference changes are written back; `None` disables persistence
    /// (preferences then last for the session only).
    pub fn new(
        base_url: String,
        config: Config,
        config_path: Option<PathBuf>,
        query: QueryService,
    ) -> Result<Self, Box<dyn Error>> {
        let dark_mode = config.dark_mode.unwrap_or_else(|| {
            matches!(detect_preferred_appearance(), Some(Appearance::Dark))
        });
        let theme_color = config.theme_color.unwrap_or_default();
        let theme = Theme::resolve(theme_color, dark_mode);

        let mut session = ChatSession::new();
        if let Some(direction) = config.text_direction {
            session.set_direction(direction);
        }

        Ok(App {
            session,
            input: String::new(),
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
            config,
            theme,
            dark_mode,
            client: QueryService::build_client()?,
            base_url,
            query,
            config_path,
        })
    }

    /// Hand the input to the session controller and, if accepted, put the
    /// query on the wire. Returns whether the send was accepted.
    ///
    /// A direction flip detected from the prompt is a preference change like
    /// any other and is written back to the store.
    pub fn dispatch_prompt(&mut self, text: &str) -> bool {
        let previous_direction = self.session.direction();
        match self.session.begin_send(text) {
            Some((request, generation)) => {
                if self.session.direction() != previous_direction {
                    self.config.text_direction = Some(self.session.direction());
                    self.persist_preferences();
                }
                self.query.spawn_query(QueryParams {
                    client: self.client.clone(),
                    base_url: self.base_url.clone(),
                    request,
                    generation,
                });
                true
            }
            None => false,
        }
    }

    pub fn spawn_upload(&self, stack_id: String, files: Vec<PathBuf>) {
        self.query.spawn_upload(
            self.client.clone(),
            self.base_url.clone(),
            stack_id,
            files,
        );
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.config.dark_mode = Some(self.dark_mode);
        self.rebuild_theme();
        self.persist_preferences();
        self.dark_mode
    }

    pub fn set_theme_color(&mut self, color: ThemeColor) {
        self.config.theme_color = Some(color);
        self.rebuild_theme();
        self.persist_preferences();
    }

    pub fn toggle_direction(&mut self) -> TextDirection {
        let direction = self.session.toggle_direction();
        self.config.text_direction = Some(direction);
        self.persist_preferences();
        direction
    }

    fn rebuild_theme(&mut self) {
        let color = self.config.theme_color.unwrap_or_default();
        self.theme = Theme::resolve(color, self.dark_mode);
    }

    /// Best-effort write-back; an unavailable store is not an error the
    /// user sees.
    fn persist_preferences(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to_path(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to save preferences");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::config::THEME_COLORS;

    pub(crate) fn test_app() -> App {
        let (query, _rx) = QueryService::new();
        let config = Config {
            dark_mode: Some(false),
            ..Config::default()
        };
        App::new("http://localhost:8000".to_string(), config, None, query).expect("app")
    }

    #[test]
    fn dark_mode_toggle_updates_config_and_theme() {
        let mut app = test_app();
        let light_background = app.theme.background_color;

        assert!(app.toggle_dark_mode());
        assert_eq!(app.config.dark_mode, Some(true));
        assert_ne!(app.theme.background_color, light_background);

        assert!(!app.toggle_dark_mode());
        assert_eq!(app.config.dark_mode, Some(false));
    }

    #[test]
    fn theme_color_changes_are_recorded() {
        let mut app = test_app();
        for color in THEME_COLORS {
            app.set_theme_color(color);
            assert_eq!(app.config.theme_color, Some(color));
        }
    }

    #[tokio::test]
    async fn detected_prompt_direction_is_written_to_preferences() {
        let mut app = test_app();

        assert!(app.dispatch_prompt("سلام"));
        assert_eq!(app.config.text_direction, Some(TextDirection::Rtl));

        // First send is generation 1; settle it so the next one is accepted.
        app.session
            .resolve(1, crate::core::transport::QueryOutcome::Failed);

        assert!(app.dispatch_prompt("hello again"));
        assert_eq!(app.config.text_direction, Some(TextDirection::Ltr));
    }

    #[test]
    fn direction_toggle_round_trips_through_config() {
        let mut app = test_app();
        assert_eq!(app.toggle_direction(), TextDirection::Rtl);
        assert_eq!(app.config.text_direction, Some(TextDirection::Rtl));
        assert_eq!(app.toggle_direction(), TextDirection::Ltr);
    }
}
