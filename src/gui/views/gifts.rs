//! Sent gifts view
//!
//! The gift table with per-row cancel, the cancel confirmation dialog,
//! and CSV export of the current list.

use crate::config::{get_account_explorer_url, get_tx_explorer_url};
use crate::gift_list::{GiftRow, GiftTableRow, GIFT_TABLE_HEADERS};
use crate::gui::app::GuiApp;
use crate::gui::helpers::{default_export_file_name, write_gifts_csv};
use crate::gui::notifications::NotificationEntry;
use crate::gui::theme::AppTheme;
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

const ROW_HEIGHT: f32 = 28.0;

impl GuiApp {
    pub(crate) fn view_gifts(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "[G]", "SENT GIFTS");
        ui.add_space(self.theme.spacing_md);

        if !self.config.has_module() {
            ui.colored_label(
                self.theme.warning,
                "⚠ MODULE_ADDRESS is not set. Add it to your environment or .env file to load gifts.",
            );
            ui.add_space(self.theme.spacing_sm);
        }
        self.render_wallet_warning(ui);
        ui.add_space(self.theme.spacing_sm);

        self.render_gifts_toolbar(ui);
        ui.add_space(self.theme.spacing_sm);

        if let Some(err) = self.gifts.view.error() {
            ui.colored_label(self.theme.error, format!("[XX] Failed to load gifts: {}", err));
            ui.add_space(self.theme.spacing_xs);
        }

        let panel_width = AppTheme::responsive_width(ui, 520.0, 900.0, 1100.0);
        self.theme.frame_panel().show(ui, |ui| {
            ui.set_min_width(panel_width);
            self.render_gift_table(ui);
        });

        ui.add_space(self.theme.spacing_md);
        self.render_cancel_status(ui);
    }

    fn render_gifts_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let loading = self.gifts.is_loading();
            if ui
                .add_enabled(
                    !loading && self.config.has_module(),
                    self.theme.button_secondary(if loading { "[..] Loading" } else { "[R] Refresh" }),
                )
                .on_hover_text("Reload the gift list from the node")
                .clicked()
            {
                let request = self.gifts.view.request_reload();
                self.start_fetch(request);
            }

            let has_gifts = !self.gifts.view.gifts().is_empty();
            if ui
                .add_enabled(has_gifts, self.theme.button_secondary("[E] Export CSV"))
                .on_hover_text("Save the listed gifts as a CSV file")
                .clicked()
            {
                self.export_gifts_csv();
            }

            if loading {
                ui.spinner();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let count = self.gifts.view.gifts().len();
                ui.label(
                    RichText::new(format!("{} active gift{}", count, if count == 1 { "" } else { "s" }))
                        .color(self.theme.text_secondary),
                );
            });
        });
    }

    fn export_gifts_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .set_file_name(default_export_file_name())
            .save_file()
        else {
            return;
        };

        let result = std::fs::File::create(&path)
            .map_err(anyhow::Error::from)
            .and_then(|file| write_gifts_csv(file, self.gifts.view.gifts()));
        let message = match result {
            Ok(()) => format!("Exported {} gifts to {}", self.gifts.view.gifts().len(), path.display()),
            Err(e) => format!("Failed to export gifts: {}", e),
        };
        self.notifications.push_back(NotificationEntry::new(message));
    }

    fn render_gift_table(&mut self, ui: &mut egui::Ui) {
        let table = self.gifts.view.table();
        let busy = self.is_busy();
        let network_key = self.config.network_key.clone();
        let mut clicked: Option<GiftRow> = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(200.0).at_least(140.0))
            .column(Column::initial(140.0).at_least(110.0))
            .column(Column::initial(140.0).at_least(100.0))
            .column(Column::remainder().at_least(110.0))
            .header(24.0, |mut header| {
                for title in GIFT_TABLE_HEADERS {
                    header.col(|ui| {
                        ui.label(RichText::new(title).strong().color(self.theme.text_secondary));
                    });
                }
            })
            .body(|mut body| {
                for row in &table.rows {
                    let GiftTableRow::Gift(gift) = row else {
                        continue;
                    };
                    body.row(ROW_HEIGHT, |mut table_row| {
                        table_row.col(|ui| {
                            ui.monospace(&gift.short_address).on_hover_text(&gift.full_address);
                            if let Some(url) = get_account_explorer_url(&network_key, &gift.full_address) {
                                if ui
                                    .small_button("↗")
                                    .on_hover_text("View recipient in explorer")
                                    .clicked()
                                {
                                    if let Err(e) = open::that(&url) {
                                        tracing::warn!("Failed to open explorer: {}", e);
                                    }
                                }
                            }
                        });
                        table_row.col(|ui| {
                            ui.label(&gift.release_date).on_hover_text(&gift.release_datetime);
                        });
                        table_row.col(|ui| {
                            ui.label(RichText::new(&gift.amount_inline).color(self.theme.accent_green))
                                .on_hover_text(&gift.amount_detail);
                        });
                        table_row.col(|ui| {
                            if ui
                                .add_enabled(!busy, self.theme.button_danger("✖ Cancel"))
                                .on_hover_text("Cancel this gift and return the funds")
                                .on_disabled_hover_text("A transaction is already in progress")
                                .clicked()
                            {
                                clicked = Some(gift.clone());
                            }
                        });
                    });
                }
            });

        // The table widget cannot span columns, so the empty row is drawn under it
        for row in &table.rows {
            if let GiftTableRow::Empty { message, .. } = row {
                ui.add_space(self.theme.spacing_sm);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(*message).color(self.theme.text_secondary));
                });
            }
        }

        if clicked.is_some() {
            self.gifts.confirm_target = clicked;
        }
    }

    fn render_cancel_status(&mut self, ui: &mut egui::Ui) {
        if let Some(status) = &self.gifts.status {
            let color = if status.starts_with("[OK]") {
                self.theme.success
            } else if status.starts_with("[XX]") {
                self.theme.error
            } else if status.starts_with("[!!]") {
                self.theme.warning
            } else {
                self.theme.info
            };
            self.theme.frame_surface().show(ui, |ui| {
                ui.label(RichText::new(status).color(color));
            });
        }

        if let Some(hash) = self.gifts.last_tx_hash.clone() {
            ui.add_space(self.theme.spacing_xs);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Last transaction:").small().color(self.theme.text_secondary));
                ui.monospace(RichText::new(crate::units::truncate_address(&hash)).small())
                    .on_hover_text(&hash);
                if ui.add(egui::Button::new("📋").small()).on_hover_text("Copy hash").clicked() {
                    ui.output_mut(|o| o.copied_text = hash.clone());
                }
                if let Some(url) = get_tx_explorer_url(&self.config.network_key, &hash) {
                    if ui
                        .link(RichText::new("View in explorer").small().color(self.theme.accent_blue))
                        .clicked()
                    {
                        if let Err(e) = open::that(&url) {
                            self.notifications
                                .push_back(NotificationEntry::new(format!("Failed to open URL: {}", e)));
                        }
                    }
                }
            });
        }
    }

    /// Modal asking the user to confirm a cancel before anything is submitted.
    pub(crate) fn render_cancel_dialog(&mut self, ctx: &egui::Context) {
        let Some(target) = self.gifts.confirm_target.clone() else {
            return;
        };
        let busy = self.is_busy();
        let mut close = false;
        let mut confirmed = false;

        egui::Window::new("Are you absolutely sure?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label("This will cancel the gift for");
                    ui.label(RichText::new(&target.short_address).strong().monospace())
                        .on_hover_text(&target.full_address);
                    ui.label(format!("and return the {} to your wallet.", target.amount_inline));
                });
                ui.add_space(self.theme.spacing_md);
                ui.horizontal(|ui| {
                    if ui.add(self.theme.button_small("Nevermind")).clicked() {
                        close = true;
                    }
                    if ui
                        .add_enabled(!busy, self.theme.button_primary("Continue"))
                        .on_disabled_hover_text("A transaction is already in progress")
                        .clicked()
                    {
                        confirmed = true;
                    }
                });
            });

        if confirmed {
            self.gifts.confirm_target = None;
            self.start_cancel(target.full_address);
        } else if close {
            self.gifts.confirm_target = None;
        }
    }
}
