//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── cards ──────────────────────────────────────────────────
    pub fn card_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn card_selected_border_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_title_style() -> Style {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn card_meta_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn rating_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn placeholder_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    // ── indicators ─────────────────────────────────────────────
    pub fn spinner_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn end_of_results_style() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn fallback_style() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
    }

    pub fn error_style() -> Style {
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
