// MediAdmin - ui/panels/notifications.rs
//
// Transient notifications overlay, anchored to the top-right corner.

use crate::app::i18n::Translator;
use crate::app::view::ListView;
use crate::ui::theme;

pub fn render(ctx: &egui::Context, view: &mut ListView, t: &dyn Translator) {
    if view.notifications().is_empty() {
        return;
    }

    let mut dismissed = None;
    egui::Area::new(egui::Id::new("notifications"))
        .order(egui::Order::Foreground)
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 40.0])
        .show(ctx, |ui| {
            ui.set_max_width(theme::NOTIFICATION_WIDTH);
            for note in view.notifications().active() {
                egui::Frame::new()
                    .fill(theme::notification_bg_colour(note.kind))
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(theme::notification_colour(note.kind), note.text(t));
                            if ui.small_button("\u{2715}").clicked() {
                                dismissed = Some(note.id);
                            }
                        });
                        ui.weak(note.raised_at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string());
                    });
                ui.add_space(4.0);
            }
        });

    if let Some(id) = dismissed {
        view.dismiss_notification(id);
    }
}
