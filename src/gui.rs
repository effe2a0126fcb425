// MediAdmin - gui.rs
//
// Top-level eframe::App implementation.
// Owns the mounted list view, drives its frame loop, and wires the panels.

use crate::app::i18n::{Catalog, Translator};
use crate::app::view::{ListView, ViewDeps};
use crate::core::access::Capability;
use crate::core::model::ResourceKind;
use crate::ui;
use crate::util::constants;
use std::time::{Duration, Instant};

/// The MediAdmin application.
pub struct AdminApp {
    deps: ViewDeps,
    catalog: Catalog,
    /// The mounted view. None when the user may view no resource kind.
    view: Option<ListView>,
    config_warnings: Vec<String>,
}

impl AdminApp {
    /// Create the application and mount the initial view.
    ///
    /// `initial` is honoured only if the user may view it; otherwise the
    /// first permitted kind is used.
    pub fn new(
        deps: ViewDeps,
        catalog: Catalog,
        initial: Option<ResourceKind>,
        config_warnings: Vec<String>,
    ) -> Self {
        let mut app = Self {
            deps,
            catalog,
            view: None,
            config_warnings,
        };
        match app.first_viewable(initial) {
            Some(kind) => app.navigate(kind, Instant::now()),
            None => tracing::warn!("User may not view any resource kind"),
        }
        app
    }

    fn can_view(&self, kind: ResourceKind) -> bool {
        self.deps
            .permissions
            .for_kind(kind)
            .allows(Capability::View, self.deps.user.as_ref())
    }

    fn first_viewable(&self, preferred: Option<ResourceKind>) -> Option<ResourceKind> {
        preferred
            .into_iter()
            .chain(ResourceKind::all().iter().copied())
            .find(|k| self.can_view(*k))
    }

    /// Unmount the current view and mount a fresh one of `kind`.
    fn navigate(&mut self, kind: ResourceKind, now: Instant) {
        if let Some(mut old) = self.view.take() {
            old.unmount();
        }
        tracing::info!(kind = %kind, "Navigating");
        let mut view = ListView::new(kind, self.deps.clone());
        view.mount(now);
        self.view = Some(view);
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let t: &dyn Translator = &self.catalog;
        ui.horizontal(|ui| {
            match self.deps.user.as_ref() {
                Some(user) => ui.label(
                    egui::RichText::new(
                        t.translate_with("SIGNED_IN_AS", &[("user", user.username.clone())]),
                    )
                    .color(ui::theme::STATUS_TEXT),
                ),
                None => ui.label(t.translate("NOT_SIGNED_IN")),
            };

            if !self.config_warnings.is_empty() {
                ui.separator();
                ui.colored_label(
                    egui::Color32::from_rgb(251, 191, 36),
                    t.translate_with(
                        "CONFIG_WARNINGS",
                        &[("count", self.config_warnings.len().to_string())],
                    ),
                )
                .on_hover_text(self.config_warnings.join("\n"));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(at) = self.view.as_ref().and_then(ListView::last_refreshed) {
                    let time = at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string();
                    ui.label(t.translate_with("LAST_REFRESHED", &[("time", time)]));
                }
            });
        });
    }
}

impl eframe::App for AdminApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Frame loop: apply finished requests, advance the timer, route
        // pointer presses to the outside-click listener.
        let mut navigate_to = None;
        if let Some(view) = self.view.as_mut() {
            view.poll();
            view.tick(now);
            if ctx.input(|i| i.pointer.any_pressed()) {
                if let Some(pos) = ctx.input(|i| i.pointer.interact_pos()) {
                    view.pointer_down(pos.x, pos.y);
                }
            }
            navigate_to = view.take_navigation();
        }
        if let Some(kind) = navigate_to {
            self.navigate(kind, now);
        }

        // Top bar: title and navigation.
        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(constants::APP_NAME);
                ui.separator();
                if let Some(view) = self.view.as_mut() {
                    ui::panels::nav::render(ui, view, &self.catalog);
                }
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar")
            .frame(egui::Frame::new().fill(ui::theme::STATUS_BG).inner_margin(4.0))
            .show(ctx, |ui| self.status_bar(ui));

        let Some(view) = self.view.as_mut() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(self.catalog.translate("NO_ACCESS"));
                });
            });
            return;
        };

        // Left sidebar: filters.
        egui::SidePanel::left("filters")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_filters")
                    .auto_shrink([false; 2])
                    .show(ui, |ui| {
                        ui::panels::filters::render(ui, view, &self.catalog);
                    });
            });

        // Central panel: stats (events only), action bar, table.
        egui::CentralPanel::default().show(ctx, |ui| {
            if view.kind() == ResourceKind::Events {
                ui::panels::stats::render(ui, view, &self.catalog);
                ui.add_space(6.0);
            }
            ui::panels::actions::render(ui, view, &self.catalog);
            ui.separator();
            ui::panels::table::render(ui, view, &self.catalog);
        });

        // Overlays
        ui::panels::modals::render(ctx, view, &self.catalog);
        ui::panels::notifications::render(ctx, view, &self.catalog);

        // Repaint scheduling: poll quickly while requests are in flight,
        // otherwise wake for the next timer tick or notification expiry.
        if view.fetches_in_flight() > 0 {
            ctx.request_repaint_after(Duration::from_millis(constants::UI_POLL_INTERVAL_MS));
        } else {
            let mut wake = view
                .time_until_refresh(now)
                .unwrap_or(Duration::from_secs(constants::DEFAULT_REFRESH_INTERVAL_SECS));
            if !view.notifications().is_empty() {
                wake = wake.min(Duration::from_secs(1));
            }
            ctx.request_repaint_after(wake);
        }
    }

    /// Called by eframe when the application window is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(view) = self.view.as_mut() {
            view.unmount();
        }
    }
}
