// MediAdmin - ui/panels/nav.rs
//
// Navigation links between the resource views. Only kinds the user may
// view are listed.

use crate::app::i18n::Translator;
use crate::app::view::ListView;
use crate::ui::theme;

pub fn render(ui: &mut egui::Ui, view: &mut ListView, t: &dyn Translator) {
    let mut requested = None;
    for link in view.nav_links() {
        let text = egui::RichText::new(t.translate(link.kind.nav_key()));
        let text = if link.active {
            text.strong().color(theme::ACCENT)
        } else {
            text
        };
        if ui.selectable_label(link.active, text).clicked() {
            requested = Some(link.kind);
        }
    }
    if let Some(kind) = requested {
        view.request_navigation(kind);
    }
}
