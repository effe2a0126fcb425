// MediAdmin - ui/theme.rs
//
// Colour scheme, notification colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::app::notifications::NotificationKind;
use egui::Color32;

/// Text colour for a notification kind.
pub fn notification_colour(kind: NotificationKind) -> Color32 {
    match kind {
        NotificationKind::Error => Color32::from_rgb(248, 113, 113),   // Red 400
        NotificationKind::Warning => Color32::from_rgb(251, 191, 36),  // Amber 400
        NotificationKind::Info => Color32::from_rgb(134, 239, 172),    // Green 300
    }
}

/// Subtle background tint for a notification kind.
pub fn notification_bg_colour(kind: NotificationKind) -> Color32 {
    match kind {
        NotificationKind::Error => Color32::from_rgba_premultiplied(185, 28, 28, 40),
        NotificationKind::Warning => Color32::from_rgba_premultiplied(217, 119, 6, 35),
        NotificationKind::Info => Color32::from_rgba_premultiplied(22, 163, 74, 30),
    }
}

/// Accent for the active navigation link and stat counters.
pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246); // Blue 500

/// Status bar colours.
pub const STATUS_BG: Color32 = Color32::from_rgb(31, 41, 55);      // Gray 800
pub const STATUS_TEXT: Color32 = Color32::from_rgb(209, 213, 219);  // Gray 300

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 260.0;
pub const ROW_HEIGHT: f32 = 22.0;
pub const STAT_CARD_MIN_WIDTH: f32 = 110.0;
pub const ACTION_MENU_WIDTH: f32 = 180.0;
pub const NOTIFICATION_WIDTH: f32 = 360.0;
pub const MODAL_MIN_WIDTH: f32 = 360.0;
