// MediAdmin - ui/panels/stats.rs
//
// Row of clickable stat counters above the events table.

use crate::app::i18n::Translator;
use crate::app::view::ListView;
use crate::ui::theme;

pub fn render(ui: &mut egui::Ui, view: &mut ListView, t: &dyn Translator) {
    let counters = view.stat_counters(t);
    if counters.is_empty() {
        return;
    }

    let mut activated = None;
    ui.horizontal_wrapped(|ui| {
        for counter in &counters {
            let text = egui::RichText::new(format!("{}\n{}", counter.count, counter.label));
            let button =
                egui::Button::new(text).min_size(egui::vec2(theme::STAT_CARD_MIN_WIDTH, 44.0));
            if ui.add(button).clicked() {
                activated = Some(counter.index);
            }
        }
    });

    if let Some(index) = activated {
        view.activate_stat(index);
    }
}
