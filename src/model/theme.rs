use ratatui::style::Color;

use super::{PartKind, SessionStatus};

pub struct Theme;

impl Theme {
    // ── Base palette ────────────────────────────────────────────
    pub const BACKGROUND: Color = Color::Rgb(18, 18, 24);
    pub const SURFACE: Color = Color::Rgb(28, 28, 38);
    pub const TEXT: Color = Color::Rgb(225, 225, 235);
    pub const MUTED_TEXT: Color = Color::Rgb(100, 105, 120);
    pub const SEPARATOR: Color = Color::Rgb(45, 45, 58);

    // ── Accent colors ───────────────────────────────────────────
    pub const ACCENT: Color = Color::Rgb(80, 200, 200);
    pub const ACCENT_WARM: Color = Color::Rgb(230, 160, 60);
    pub const ACCENT_PURPLE: Color = Color::Rgb(170, 130, 255);

    // ── Semantic colors ─────────────────────────────────────────
    pub const SUCCESS: Color = Color::Rgb(80, 210, 120);
    pub const WARNING: Color = Color::Rgb(230, 180, 60);
    pub const ERROR: Color = Color::Rgb(230, 80, 80);
    pub const INFO: Color = Color::Rgb(80, 180, 220);

    // ── UI chrome ───────────────────────────────────────────────
    pub const HEADER_BG: Color = Color::Rgb(24, 24, 32);
    pub const FOOTER_BG: Color = Color::Rgb(24, 24, 32);
    pub const PANEL_BORDER: Color = Color::Rgb(50, 50, 65);
    pub const ACTIVE_BORDER: Color = Color::Rgb(80, 200, 200);
    pub const SELECTION_BG: Color = Color::Rgb(40, 55, 75);

    // ── Transcript roles ────────────────────────────────────────
    pub const ROLE_USER: Color = Color::Rgb(80, 180, 220);
    pub const ROLE_ASSISTANT: Color = Color::Rgb(170, 130, 255);

    // ── Session status ──────────────────────────────────────────
    pub const STATUS_IDLE: Color = Color::Rgb(100, 105, 120);
    pub const STATUS_BUSY: Color = Color::Rgb(230, 160, 60);
    pub const STATUS_RETRY: Color = Color::Rgb(230, 80, 80);

    /// Get color for a tree node's status dot
    pub fn session_status_color(status: &SessionStatus) -> Color {
        match status {
            SessionStatus::Idle => Self::STATUS_IDLE,
            SessionStatus::Busy => Self::STATUS_BUSY,
            SessionStatus::Retry { .. } => Self::STATUS_RETRY,
            SessionStatus::Other(_) => Self::INFO,
        }
    }

    /// Get color for a transcript part label
    pub fn part_color(kind: PartKind) -> Color {
        match kind {
            PartKind::Text => Self::TEXT,
            PartKind::Tool | PartKind::ToolInvocation => Self::ACCENT_WARM,
            PartKind::Reasoning => Self::MUTED_TEXT,
            PartKind::File | PartKind::Patch | PartKind::Snapshot => Self::INFO,
            PartKind::Agent | PartKind::Subtask => Self::ACCENT_PURPLE,
            PartKind::Retry => Self::WARNING,
            PartKind::StepStart | PartKind::StepFinish | PartKind::Compaction => Self::SEPARATOR,
            PartKind::Unknown => Self::MUTED_TEXT,
        }
    }
}
