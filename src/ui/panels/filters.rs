// MediAdmin - ui/panels/filters.rs
//
// Filter controls sidebar: free-text search, one control per filter served
// by the backend, and a clear button. Every edit reloads the table from the
// first page.

use crate::app::i18n::Translator;
use crate::app::view::ListView;
use crate::core::model::Filter;

/// Render the filter controls.
pub fn render(ui: &mut egui::Ui, view: &mut ListView, t: &dyn Translator) {
    ui.heading(t.translate("FILTERS.CAPTION"));
    ui.separator();

    // Text search
    let mut text = view.filters().text_filter().to_string();
    let response = ui.add(
        egui::TextEdit::singleline(&mut text).hint_text(t.translate("FILTERS.TEXT_PLACEHOLDER")),
    );
    if response.changed() {
        view.set_text_filter(&text);
    }

    ui.separator();

    // Edits are collected and applied after rendering so the filter list
    // is not borrowed while the view changes.
    let filters: Vec<Filter> = view.filters().filters().into_iter().cloned().collect();
    let mut edits: Vec<(String, String)> = Vec::new();

    egui::Grid::new("filter_controls")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            for filter in &filters {
                ui.label(t.translate(&filter.label));
                if let Some(value) = filter_control(ui, filter, t) {
                    edits.push((filter.name.clone(), value));
                }
                ui.end_row();
            }
        });

    for (name, value) in edits {
        view.edit_filter(&name, &value);
    }

    ui.separator();
    let active = view.filters().active_count();
    if ui
        .add_enabled(active > 0, egui::Button::new(t.translate("FILTERS.CLEAR")))
        .clicked()
    {
        view.clear_filters();
    }
}

/// One filter control. Returns the new value if the user changed it.
fn filter_control(ui: &mut egui::Ui, filter: &Filter, t: &dyn Translator) -> Option<String> {
    let mut value = filter.value.clone();

    if filter.options.is_empty() {
        let response = ui.add(egui::TextEdit::singleline(&mut value).desired_width(140.0));
        return (response.lost_focus() && value != filter.value).then_some(value);
    }

    let selected = filter
        .options
        .iter()
        .find(|o| o.value == filter.value)
        .map(|o| t.translate(&o.label))
        .unwrap_or_else(|| t.translate("FILTERS.ANY"));

    egui::ComboBox::from_id_salt(format!("filter_{}", filter.name))
        .selected_text(selected)
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut value, String::new(), t.translate("FILTERS.ANY"));
            for option in &filter.options {
                ui.selectable_value(&mut value, option.value.clone(), t.translate(&option.label));
            }
        });

    (value != filter.value).then_some(value)
}
