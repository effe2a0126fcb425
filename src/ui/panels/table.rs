// MediAdmin - ui/panels/table.rs
//
// Resource table: caption, row summary, selectable rows and pagination.
// Rows are opaque backend records rendered through the column templates.

use crate::app::i18n::Translator;
use crate::app::view::{ListView, ViewPhase};
use crate::ui::{columns, theme};

/// Render the table panel (central area).
pub fn render(ui: &mut egui::Ui, view: &mut ListView, t: &dyn Translator) {
    let kind = view.kind();

    ui.horizontal(|ui| {
        ui.heading(t.translate(kind.caption_key()));
        ui.weak(t.translate_with(
            "TABLE_SUMMARY",
            &[("numberOfRows", view.table().total().to_string())],
        ));
        if view.fetches_in_flight() > 0 {
            ui.spinner();
        }
    });

    if view.phase() == ViewPhase::Loading && view.table().row_count() == 0 {
        ui.centered_and_justified(|ui| {
            ui.label(t.translate("LOADING"));
        });
        return;
    }

    let cols = columns::columns_for(kind);
    let mut toggled: Vec<usize> = Vec::new();

    egui::ScrollArea::vertical()
        .id_salt("resource_table")
        .auto_shrink([false, true])
        .max_height(ui.available_height() - theme::ROW_HEIGHT * 2.0)
        .show(ui, |ui| {
            egui::Grid::new(("resource_grid", kind.as_str()))
                .num_columns(cols.len() + 1)
                .striped(true)
                .min_row_height(theme::ROW_HEIGHT)
                .spacing([12.0, 4.0])
                .show(ui, |ui| {
                    ui.label("");
                    for col in cols {
                        ui.strong(t.translate(col.label_key));
                    }
                    ui.end_row();

                    for (index, row) in view.table().rows().iter().enumerate() {
                        let mut selected = view.table().is_selected(index);
                        if ui.checkbox(&mut selected, "").changed() {
                            toggled.push(index);
                        }
                        for col in cols {
                            let text = columns::cell_text(row, col.field);
                            if col.translate && !text.is_empty() {
                                ui.label(t.translate(&text));
                            } else {
                                ui.label(text);
                            }
                        }
                        ui.end_row();
                    }
                });
        });

    for index in toggled {
        view.toggle_row(index);
    }

    ui.separator();
    pagination(ui, view, t);
}

fn pagination(ui: &mut egui::Ui, view: &mut ListView, t: &dyn Translator) {
    let mut previous = false;
    let mut next = false;

    ui.horizontal(|ui| {
        let table = view.table();
        previous = ui
            .add_enabled(
                table.has_previous_page(),
                egui::Button::new(t.translate("TABLE_PREVIOUS")),
            )
            .clicked();
        ui.label(t.translate_with(
            "TABLE_PAGINATION",
            &[
                ("page", (table.current_page() + 1).to_string()),
                ("pages", table.page_count().to_string()),
            ],
        ));
        next = ui
            .add_enabled(table.has_next_page(), egui::Button::new(t.translate("TABLE_NEXT")))
            .clicked();
    });

    if previous {
        view.previous_page();
    }
    if next {
        view.next_page();
    }
}
