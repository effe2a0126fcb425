// MediAdmin - ui/panels/modals.rs
//
// Modal dialogs opened from the action bar: new resource and bulk delete
// confirmation. Both are only reachable when the view granted access.

use crate::app::i18n::Translator;
use crate::app::view::{ListView, Modal};
use crate::core::model::ResourceKind;
use crate::ui::theme;

pub fn render(ctx: &egui::Context, view: &mut ListView, t: &dyn Translator) {
    match view.modal() {
        Some(Modal::NewResource) => new_resource(ctx, view, t),
        Some(Modal::DeleteResources) => confirm_delete(ctx, view, t),
        None => {}
    }
}

fn new_resource(ctx: &egui::Context, view: &mut ListView, t: &dyn Translator) {
    let title_key = match view.kind() {
        ResourceKind::Events => "NEW_RESOURCE.EVENTS",
        ResourceKind::Series => "NEW_RESOURCE.SERIES",
    };

    let mut open = true;
    let mut close = false;
    egui::Window::new(t.translate(title_key))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(theme::MODAL_MIN_WIDTH)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(t.translate("NEW_RESOURCE.HINT"));
            ui.add_space(8.0);
            close = ui.button(t.translate("CLOSE")).clicked();
        });

    if !open || close {
        view.close_modal();
    }
}

fn confirm_delete(ctx: &egui::Context, view: &mut ListView, t: &dyn Translator) {
    let confirm_key = match view.kind() {
        ResourceKind::Events => "BULK_ACTIONS.DELETE.EVENTS.CONFIRM",
        ResourceKind::Series => "BULK_ACTIONS.DELETE.SERIES.CONFIRM",
    };
    let count = view.table().selection_len();

    let mut open = true;
    let mut cancel = false;
    let mut confirm = false;
    egui::Window::new(t.translate(view.kind().delete_key()))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .min_width(theme::MODAL_MIN_WIDTH)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(t.translate_with(confirm_key, &[("count", count.to_string())]));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                cancel = ui.button(t.translate("CANCEL")).clicked();
                confirm = ui.button(t.translate("CONFIRM")).clicked();
            });
        });

    if confirm {
        match view.delete_selected() {
            Ok(issued) => tracing::debug!(issued, "Bulk delete confirmed"),
            Err(e) => tracing::warn!(error = %e, "Bulk delete refused"),
        }
    } else if !open || cancel {
        view.close_modal();
    }
}
