//! Dashboard view implementation
//!
//! Network and wallet status, the operation log and the about section.

use crate::config::{find_network, get_account_explorer_url};
use crate::gui::app::{GuiApp, GuiSection, EMPTY_LOG_TEXT};
use crate::gui::helpers::{latency_level, LatencyLevel};
use crate::gui::notifications::NotificationEntry;
use anyhow::anyhow;
use eframe::egui::{self, RichText};

impl GuiApp {
    /// Main dashboard view
    pub(crate) fn view_dashboard(&mut self, ui: &mut egui::Ui) {
        if self.log_view.content == EMPTY_LOG_TEXT && self.log_view.job.is_none() {
            self.refresh_logs();
        }

        self.render_section_header(ui, "[H]", "DASHBOARD");
        ui.add_space(self.theme.spacing_md);

        self.render_network_status_panel(ui);
        ui.add_space(self.theme.spacing_md);
        self.render_wallet_panel(ui);

        ui.add_space(self.theme.spacing_lg);
        self.render_dashboard_logs(ui);

        ui.add_space(self.theme.spacing_lg);
        self.render_about_panel(ui);
    }

    /// Render a consistent section header with retro ASCII styling
    pub(crate) fn render_section_header(&self, ui: &mut egui::Ui, icon: &str, title: &str) {
        let header_text = self.theme.section_header_text(icon, title);
        let separator = "=".repeat(40);

        ui.label(RichText::new(&separator).size(14.0).color(self.theme.primary));
        ui.label(RichText::new(&header_text).size(24.0).strong().color(self.theme.text_primary));
        ui.label(RichText::new(&separator).size(14.0).color(self.theme.primary));
    }

    fn render_network_status_panel(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("[@] Network Status").size(16.0).strong().color(self.theme.text_primary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let is_checking = self.node_status.job.is_some();
                    if ui
                        .add_enabled(!is_checking, egui::Button::new(if is_checking { "⏳" } else { "🔄" }).small())
                        .on_hover_text("Check node connection")
                        .clicked()
                    {
                        self.start_node_check();
                    }

                    if is_checking {
                        ui.label(RichText::new("Checking...").small().color(self.theme.warning));
                    } else if let Some(latency) = self.node_status.latency_ms {
                        let (status_color, status_text) = match latency_level(latency) {
                            LatencyLevel::Good => (self.theme.success, format!("🟢 {}ms", latency)),
                            LatencyLevel::Slow => (self.theme.warning, format!("🟡 {}ms", latency)),
                            LatencyLevel::Bad => (self.theme.error, format!("🔴 {}ms", latency)),
                        };
                        ui.label(RichText::new(status_text).small().color(status_color));
                    }
                });
            });
            ui.add_space(self.theme.spacing_sm);

            egui::Grid::new("network_status_grid")
                .num_columns(2)
                .spacing([self.theme.spacing_md, self.theme.spacing_xs])
                .show(ui, |ui| {
                    ui.label(RichText::new("Network:").color(self.theme.text_secondary));
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(self.config.network_label()).strong().color(self.theme.accent_green));
                        if find_network(&self.config.network_key).is_some_and(|n| n.is_testnet) {
                            ui.label(RichText::new("(test network)").small().color(self.theme.warning));
                        }
                    });
                    ui.end_row();

                    ui.label(RichText::new("Node:").color(self.theme.text_secondary));
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&self.config.node_url).small().color(self.theme.accent_green));
                        if ui.add(egui::Button::new("📋").small()).on_hover_text("Copy node URL").clicked() {
                            ui.output_mut(|o| o.copied_text = self.config.node_url.clone());
                        }
                    });
                    ui.end_row();

                    if let Some(ledger) = &self.node_status.ledger {
                        ui.label(RichText::new("Chain ID:").color(self.theme.text_secondary));
                        ui.label(RichText::new(ledger.chain_id.to_string()).color(self.theme.accent_green));
                        ui.end_row();

                        ui.label(RichText::new("Ledger version:").color(self.theme.text_secondary));
                        ui.label(RichText::new(ledger.ledger_version.to_string()).color(self.theme.accent_green));
                        ui.end_row();

                        ui.label(RichText::new("Block height:").color(self.theme.text_secondary));
                        ui.label(RichText::new(ledger.block_height.to_string()).color(self.theme.accent_green));
                        ui.end_row();
                    }
                });

            if let Some(err) = &self.node_status.error {
                ui.add_space(self.theme.spacing_xs);
                ui.colored_label(self.theme.error, format!("[XX] {}", err));
            }

            ui.add_space(self.theme.spacing_sm);
            ui.horizontal(|ui| {
                ui.label(RichText::new("Need to change settings?").small().color(self.theme.text_secondary));
                if ui.link(RichText::new("Go to Settings").small().color(self.theme.accent_blue)).clicked() {
                    self.navigate(GuiSection::Settings);
                }
            });
        });
    }

    fn render_wallet_panel(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("[W] Wallet & Contract").size(16.0).strong().color(self.theme.text_primary));
            ui.add_space(self.theme.spacing_sm);

            let status = self.stable_wallet_status().clone();
            let (r, g, b) = status.color();

            egui::Grid::new("wallet_status_grid")
                .num_columns(2)
                .spacing([self.theme.spacing_md, self.theme.spacing_xs])
                .show(ui, |ui| {
                    ui.label(RichText::new("Backend:").color(self.theme.text_secondary));
                    ui.label(RichText::new(self.config.wallet_backend.display_name()).color(self.theme.accent_green));
                    ui.end_row();

                    ui.label(RichText::new("After cancel:").color(self.theme.text_secondary));
                    ui.label(RichText::new(self.config.confirmation_policy.display_name()).color(self.theme.accent_green))
                        .on_hover_text(self.config.confirmation_policy.description());
                    ui.end_row();

                    ui.label(RichText::new("Status:").color(self.theme.text_secondary));
                    ui.label(RichText::new(status.display_text()).color(egui::Color32::from_rgb(r, g, b)));
                    ui.end_row();

                    if let Some(address) = status.address() {
                        ui.label(RichText::new("Account:").color(self.theme.text_secondary));
                        ui.horizontal(|ui| {
                            ui.monospace(RichText::new(address).small());
                            if ui.add(egui::Button::new("📋").small()).on_hover_text("Copy address").clicked() {
                                ui.output_mut(|o| o.copied_text = address.to_string());
                            }
                            if let Some(url) = get_account_explorer_url(&self.config.network_key, address) {
                                if ui.link(RichText::new("Explorer").small().color(self.theme.accent_blue)).clicked() {
                                    if let Err(e) = open::that(&url) {
                                        self.notifications
                                            .push_back(NotificationEntry::new(format!("Failed to open URL: {}", e)));
                                    }
                                }
                            }
                        });
                        ui.end_row();
                    }

                    if self.config.has_module() {
                        ui.label(RichText::new("View function:").color(self.theme.text_secondary));
                        ui.monospace(RichText::new(self.config.view_gifts_function()).small());
                        ui.end_row();

                        ui.label(RichText::new("Cancel function:").color(self.theme.text_secondary));
                        ui.monospace(RichText::new(self.config.remove_gift_function()).small());
                        ui.end_row();
                    }
                });

            if !self.config.has_module() {
                ui.add_space(self.theme.spacing_xs);
                ui.colored_label(
                    self.theme.warning,
                    "⚠ MODULE_ADDRESS is not set. Gifts cannot be loaded or cancelled.",
                );
            }
            if status.has_problem() {
                self.render_wallet_warning(ui);
            }
        });
    }

    pub(crate) fn refresh_logs(&mut self) {
        if self.log_view.job.is_none() {
            self.log_view.scroll_to_bottom = true;
            self.log_view.job = Some(self.spawn_job(|| async move {
                match crate::operation_log::read_log() {
                    Ok(content) if content.is_empty() => Ok(EMPTY_LOG_TEXT.to_string()),
                    Ok(content) => Ok(content),
                    Err(e) => Err(anyhow!("Failed to read log file: {}", e)),
                }
            }));
        }
    }

    fn render_dashboard_logs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(RichText::new("[#] Operation Log").size(18.0));
            ui.add_space(self.theme.spacing_sm);
            let is_loading = self.log_view.job.is_some();
            if ui
                .add_enabled(
                    !is_loading,
                    self.theme.button_small(if is_loading { "[..]" } else { "[R] Refresh" }),
                )
                .clicked()
            {
                self.refresh_logs();
            }
        });
        ui.add_space(self.theme.spacing_xs);

        if let Some(err) = &self.log_view.error {
            ui.colored_label(self.theme.error, err);
        }

        let scroll_to_bottom = self.log_view.scroll_to_bottom;
        self.theme.frame_surface().show(ui, |ui| {
            ui.set_min_height(240.0);
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .max_height(360.0)
                .animated(true)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.monospace(&self.log_view.content);
                    if scroll_to_bottom {
                        let bottom = ui.label("");
                        bottom.scroll_to_me(Some(egui::Align::BOTTOM));
                    }
                });
        });

        self.log_view.scroll_to_bottom = false;
    }

    fn render_about_panel(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("About Gifter").size(16.0).strong().color(self.theme.text_primary));
            ui.add_space(self.theme.spacing_sm);

            egui::Grid::new("about_grid")
                .num_columns(2)
                .spacing([self.theme.spacing_md, self.theme.spacing_xs])
                .show(ui, |ui| {
                    ui.label(RichText::new("Version:").color(self.theme.text_secondary));
                    ui.label(RichText::new(env!("CARGO_PKG_VERSION")).strong().color(self.theme.accent_green));
                    ui.end_row();

                    ui.label(RichText::new("Settings file:").color(self.theme.text_secondary));
                    let settings_path = crate::user_settings::UserSettings::settings_path_display();
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&settings_path).small().color(self.theme.text_secondary));
                        if ui.add(egui::Button::new("📋").small()).on_hover_text("Copy path").clicked() {
                            ui.output_mut(|o| o.copied_text = settings_path.clone());
                        }
                    });
                    ui.end_row();

                    ui.label(RichText::new("Log file:").color(self.theme.text_secondary));
                    let log_path = crate::operation_log::log_file_path();
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&log_path).small().color(self.theme.text_secondary));
                        if ui.add(egui::Button::new("📋").small()).on_hover_text("Copy path").clicked() {
                            ui.output_mut(|o| o.copied_text = log_path.clone());
                        }
                    });
                    ui.end_row();
                });

            ui.add_space(self.theme.spacing_sm);
            ui.horizontal(|ui| {
                if ui.link(RichText::new("📖 Aptos docs").color(self.theme.accent_blue)).clicked() {
                    if let Err(e) = open::that("https://aptos.dev") {
                        self.notifications.push_back(NotificationEntry::new(format!("Failed to open URL: {}", e)));
                    }
                }
                ui.separator();
                if ui.link(RichText::new("🔎 Explorer").color(self.theme.accent_blue)).clicked() {
                    if let Err(e) = open::that("https://explorer.aptoslabs.com") {
                        self.notifications.push_back(NotificationEntry::new(format!("Failed to open URL: {}", e)));
                    }
                }
            });
        });
    }
}
