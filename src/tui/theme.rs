//! Parchment color theme for the tracker TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::session::CombatantType;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Leather brown: borders, buttons, focused items.
pub const PRIMARY: Color = Color::Rgb(0x8B, 0x5E, 0x3C);
/// Light leather: secondary borders, hints.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0xA4, 0x71, 0x49);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Torch yellow: the combatant whose turn it is.
pub const ACCENT: Color = Color::Rgb(0xFF, 0xEB, 0x3B);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Parchment: base background.
pub const BG_BASE: Color = Color::Rgb(0xFD, 0xF6, 0xE3);
/// Aged parchment: entry form and modals.
pub const BG_SURFACE: Color = Color::Rgb(0xF6, 0xE4, 0xB0);
/// Off-white: list rows.
pub const BG_ROW: Color = Color::Rgb(0xFE, 0xFE, 0xFE);

// ── Text ────────────────────────────────────────────────────────────────────

/// Ink.
pub const TEXT: Color = Color::Rgb(0x4B, 0x2E, 0x20);
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x6A, 0x58);
pub const TEXT_DIM: Color = Color::Rgb(0xB0, 0xA0, 0x90);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xB7, 0x1C, 0x1C);
pub const SUCCESS: Color = Color::Rgb(0x2E, 0x7D, 0x32);
pub const WARNING: Color = Color::Rgb(0xE6, 0x51, 0x00);
pub const INFO: Color = Color::Rgb(0x15, 0x65, 0xC0);

// ── Domain ──────────────────────────────────────────────────────────────────

pub const PLAYER: Color = Color::Rgb(0x2E, 0x7D, 0x32);
pub const MONSTER: Color = Color::Rgb(0xB7, 0x1C, 0x1C);

pub fn type_color(combatant_type: CombatantType) -> Color {
    match combatant_type {
        CombatantType::Player => PLAYER,
        CombatantType::Monster => MONSTER,
    }
}

pub fn type_icon(combatant_type: CombatantType) -> &'static str {
    match combatant_type {
        CombatantType::Player => "🧝",
        CombatantType::Monster => "🐉",
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Bold ink for titles.
pub fn title() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Row of the combatant whose turn it is.
pub fn current_turn() -> Style {
    Style::default()
        .fg(TEXT)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Selected (cursor) row.
pub fn highlight() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

/// Entry form mode badge.
pub fn insert_badge() -> Style {
    Style::default()
        .fg(TEXT)
        .bg(BG_SURFACE)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
