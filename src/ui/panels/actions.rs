// MediAdmin - ui/panels/actions.rs
//
// Action bar above the table: the "add" button and the bulk action
// dropdown. Controls the user lacks permission for are not rendered.
//
// The dropdown registers its on-screen bounds (button plus open menu) with
// the view every frame so pointer presses elsewhere close it.

use crate::app::i18n::Translator;
use crate::app::view::{ActionControl, ListView, Modal};
use crate::core::pointer::Bounds;
use crate::ui::theme;

fn to_bounds(rect: egui::Rect) -> Bounds {
    Bounds::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

pub fn render(ui: &mut egui::Ui, view: &mut ListView, t: &dyn Translator) {
    let kind = view.kind();
    let controls = view.action_controls();
    let mut open_modal = None;
    let mut toggle_menu = false;

    let button_rect = ui
        .horizontal(|ui| {
            if controls.contains(&ActionControl::Create)
                && ui.button(format!("+ {}", t.translate(kind.create_key()))).clicked()
            {
                open_modal = Some(Modal::NewResource);
            }

            let caption = format!("{} \u{25be}", t.translate("BULK_ACTIONS.CAPTION"));
            let response = ui.add_enabled(view.actions_enabled(), egui::Button::new(caption));
            if response.clicked() {
                toggle_menu = true;
            }
            if view.table().has_selection() {
                ui.weak(t.translate_with(
                    "BULK_ACTIONS.SELECTED",
                    &[("count", view.table().selection_len().to_string())],
                ));
            }
            response.rect
        })
        .inner;

    let mut container = to_bounds(button_rect);
    if view.menu_open() {
        let area = egui::Area::new(egui::Id::new("bulk_action_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(button_rect.left_bottom())
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(theme::ACTION_MENU_WIDTH);
                    if controls.contains(&ActionControl::Delete) {
                        if ui.button(t.translate(kind.delete_key())).clicked() {
                            open_modal = Some(Modal::DeleteResources);
                        }
                    } else {
                        ui.weak(t.translate("BULK_ACTIONS.NONE"));
                    }
                });
            });
        container = container.union(&to_bounds(area.response.rect));
    }
    view.set_action_container(container);

    if toggle_menu {
        view.toggle_action_menu();
    }
    if let Some(modal) = open_modal {
        view.open_modal(modal);
    }
}
