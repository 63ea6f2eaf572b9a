//! Terminal theme resolution.
//!
//! A theme is the product of the accent palette entry and the dark/light
//! flag, resolved once into ratatui styles. The renderer consumes the
//! resolved styles; nothing mutates terminal state globally.

use ratatui::style::{Color, Modifier, Style};

use crate::core::config::ThemeColor;

#[derive(Debug, Clone)]
pub struct Theme {
    pub background_color: Color,
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub assistant_text_style: Style,
    pub notice_text_style: Style,

    pub title_style: Style,
    pub pending_indicator_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
}

impl Theme {
    pub fn resolve(color: ThemeColor, dark: bool) -> Self {
        let accent = accent_color(color);
        if dark {
            Theme {
                background_color: Color::Rgb(17, 24, 39),
                user_prefix_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
                user_text_style: Style::default().fg(Color::Rgb(229, 231, 235)),
                assistant_text_style: Style::default().fg(Color::Rgb(243, 244, 246)),
                notice_text_style: Style::default().fg(Color::Rgb(156, 163, 175)),

                title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
                pending_indicator_style: Style::default()
                    .fg(accent)
                    .add_modifier(Modifier::ITALIC),
                input_border_style: Style::default().fg(accent),
                input_title_style: Style::default().fg(Color::Rgb(156, 163, 175)),
                input_text_style: Style::default().fg(Color::Rgb(243, 244, 246)),
            }
        } else {
            Theme {
                background_color: Color::Rgb(249, 250, 251),
                user_prefix_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
                user_text_style: Style::default().fg(Color::Rgb(31, 41, 55)),
                assistant_text_style: Style::default().fg(Color::Rgb(17, 24, 39)),
                notice_text_style: Style::default().fg(Color::Rgb(107, 114, 128)),

                title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
                pending_indicator_style: Style::default()
                    .fg(accent)
                    .add_modifier(Modifier::ITALIC),
                input_border_style: Style::default().fg(accent),
                input_title_style: Style::default().fg(Color::Rgb(107, 114, 128)),
                input_text_style: Style::default().fg(Color::Rgb(31, 41, 55)),
            }
        }
    }
}

fn accent_color(color: ThemeColor) -> Color {
    match color {
        ThemeColor::Indigo => Color::Rgb(99, 102, 241),
        ThemeColor::Emerald => Color::Rgb(16, 185, 129),
        ThemeColor::Rose => Color::Rgb(244, 63, 94),
        ThemeColor::Amber => Color::Rgb(245, 158, 11),
        ThemeColor::Blue => Color::Rgb(59, 130, 246),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::THEME_COLORS;

    #[test]
    fn dark_and_light_backgrounds_differ() {
        let dark = Theme::resolve(ThemeColor::Indigo, true);
        let light = Theme::resolve(ThemeColor::Indigo, false);
        assert_ne!(dark.background_color, light.background_color);
    }

    #[test]
    fn every_palette_entry_has_a_distinct_accent() {
        let mut accents = Vec::new();
        for color in THEME_COLORS {
            let accent = accent_color(color);
            assert!(!accents.contains(&accent));
            accents.push(accent);
        }
    }
}
