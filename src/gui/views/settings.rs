//! Settings view implementation
//!
//! Contains the settings panel rendering including:
//! - Network & node URL configuration
//! - Wallet backend and CLI profile
//! - Confirmation policy after a cancel
//! - Wallet status refresh interval

use crate::config::{find_network, validate_node_url, NETWORKS};
use crate::confirmation::ConfirmationPolicy;
use crate::gui::app::GuiApp;
use crate::gui::notifications::NotificationEntry;
use crate::wallet::WalletBackend;
use eframe::egui::{self, RichText};

const REFRESH_PRESETS: [(u64, &str); 4] = [(0, "Off"), (5, "5s"), (10, "10s"), (30, "30s")];

impl GuiApp {
    /// Render the settings view
    pub(crate) fn view_settings(&mut self, ui: &mut egui::Ui) {
        self.render_section_header(ui, "[*]", "SETTINGS");
        ui.add_space(self.theme.spacing_md);

        // Config is frozen while a cancel is in flight
        let busy = self.is_busy();
        if busy {
            ui.colored_label(
                self.theme.warning,
                "⏳ A transaction is in progress. Settings are locked until it finishes.",
            );
            ui.add_space(self.theme.spacing_sm);
        }

        ui.add_enabled_ui(!busy, |ui| {
            self.render_network_settings(ui);
            ui.add_space(self.theme.spacing_lg);
            self.render_wallet_settings(ui);
            ui.add_space(self.theme.spacing_lg);
            self.render_confirmation_settings(ui);
            ui.add_space(self.theme.spacing_lg);
            self.render_refresh_settings(ui);
        });
    }

    fn save_and_apply(&mut self, success: &str) {
        match self.user_settings.save() {
            Ok(()) => self.notifications.push_back(NotificationEntry::new(success)),
            Err(e) => self
                .notifications
                .push_back(NotificationEntry::new(format!("Failed to save settings: {}", e))),
        }
        self.apply_settings();
    }

    fn render_network_settings(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Network & Node").size(18.0).strong().color(self.theme.text_primary));
            ui.add_space(self.theme.spacing_sm);

            ui.group(|ui| {
                ui.label(RichText::new("[~] Network").strong().color(self.theme.accent_blue));
                ui.add_space(self.theme.spacing_xs);

                let mut selected: Option<&'static str> = None;
                ui.horizontal(|ui| {
                    for network in NETWORKS.iter() {
                        let is_selected = self.config.network_key == network.key;
                        if ui.selectable_label(is_selected, network.label).clicked() && !is_selected {
                            selected = Some(network.key);
                        }
                    }
                });
                if let Some(key) = selected {
                    self.select_network(key);
                }

                ui.add_space(self.theme.spacing_xs);
                ui.label(
                    RichText::new("Switching networks reloads the gift list and rechecks the wallet.")
                        .small()
                        .color(self.theme.text_secondary),
                );
            });

            ui.add_space(self.theme.spacing_md);

            ui.group(|ui| {
                ui.label(RichText::new("[@] Custom Node URL").strong().color(self.theme.accent_blue));
                ui.add_space(self.theme.spacing_xs);

                let default_node = find_network(&self.config.network_key)
                    .map(|n| n.default_node)
                    .unwrap_or_default();
                let mut apply = false;
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.settings_pending_node_url)
                            .hint_text(default_node)
                            .desired_width(380.0),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        apply = true;
                    }
                    if ui.add(self.theme.button_small("Apply")).clicked() {
                        apply = true;
                    }
                    if ui.add(self.theme.button_small("Reset")).clicked() {
                        self.settings_pending_node_url.clear();
                        apply = true;
                    }
                });

                if apply {
                    let pending = self.settings_pending_node_url.trim().to_string();
                    let valid = pending.is_empty() || validate_node_url(&pending).is_ok();
                    if valid {
                        let key = self.config.network_key.clone();
                        self.user_settings.set_custom_node_url(&key, pending);
                        self.save_and_apply("Node URL updated.");
                    } else if let Err(e) = validate_node_url(&pending) {
                        self.notifications.push_back(NotificationEntry::new(e.to_string()));
                    }
                }

                ui.add_space(self.theme.spacing_xs);
                ui.label(
                    RichText::new(format!(
                        "Leave empty to use APTOS_NODE_URL or the default ({}).",
                        default_node
                    ))
                    .small()
                    .color(self.theme.text_secondary),
                );
            });
        });
    }

    fn render_wallet_settings(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Wallet").size(18.0).strong().color(self.theme.text_primary));
            ui.add_space(self.theme.spacing_sm);

            let mut backend = self.user_settings.wallet_backend;
            for option in WalletBackend::ALL {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut backend, option, "");
                    ui.vertical(|ui| {
                        ui.label(RichText::new(option.display_name()).strong());
                        ui.label(RichText::new(option.description()).small().color(self.theme.text_secondary));
                    });
                });
                ui.add_space(self.theme.spacing_xs);
            }
            if backend != self.user_settings.wallet_backend {
                self.user_settings.wallet_backend = backend;
                self.save_and_apply(&format!("Wallet backend set to {}.", backend.display_name()));
            }

            if backend == WalletBackend::AptosCli {
                ui.add_space(self.theme.spacing_sm);
                ui.horizontal(|ui| {
                    ui.label("CLI profile:");
                    ui.add(egui::TextEdit::singleline(&mut self.settings_pending_cli_profile).desired_width(160.0));
                    let changed = self.settings_pending_cli_profile.trim() != self.user_settings.cli_profile;
                    if changed && ui.add(self.theme.button_small("Save")).clicked() {
                        self.user_settings.cli_profile = self.settings_pending_cli_profile.trim().to_string();
                        self.save_and_apply("CLI profile updated.");
                    }
                    if changed {
                        ui.label(RichText::new("(unsaved changes)").small().color(self.theme.warning));
                    }
                });
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Install the aptos CLI:").small().color(self.theme.text_secondary));
                    if ui.link(RichText::new("aptos.dev/tools/aptos-cli").small()).clicked() {
                        if let Err(e) = open::that("https://aptos.dev/tools/aptos-cli/") {
                            tracing::warn!("Failed to open URL: {}", e);
                        }
                    }
                });
            } else {
                ui.add_space(self.theme.spacing_xs);
                ui.colored_label(
                    self.theme.info,
                    "ℹ The key is read from APTOS_PRIVATE_KEY and never written to disk.",
                );
            }
        });
    }

    fn render_confirmation_settings(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("After Cancelling").size(18.0).strong().color(self.theme.text_primary));
            ui.add_space(self.theme.spacing_sm);

            let current = self.config.confirmation_policy;
            let mut policy = current;
            let is_poll = matches!(policy, ConfirmationPolicy::PollForFinality { .. });

            ui.horizontal(|ui| {
                if ui.radio(!is_poll, "Fixed settle delay").clicked() && is_poll {
                    policy = ConfirmationPolicy::FixedDelay { delay_ms: 0 };
                }
                if ui.radio(is_poll, "Poll for finality").clicked() && !is_poll {
                    policy = ConfirmationPolicy::poll_default();
                }
            });
            ui.add_space(self.theme.spacing_xs);

            egui::Grid::new("confirmation_grid")
                .num_columns(2)
                .spacing([self.theme.spacing_md, self.theme.spacing_xs])
                .show(ui, |ui| match &mut policy {
                    ConfirmationPolicy::FixedDelay { delay_ms } => {
                        ui.label("Settle delay:");
                        ui.add(egui::DragValue::new(delay_ms).speed(100).clamp_range(0..=60_000).suffix(" ms"));
                        ui.end_row();
                    }
                    ConfirmationPolicy::PollForFinality { interval_ms, timeout_ms } => {
                        ui.label("Poll interval:");
                        ui.add(egui::DragValue::new(interval_ms).speed(100).clamp_range(200..=10_000).suffix(" ms"));
                        ui.end_row();
                        ui.label("Give up after:");
                        ui.add(egui::DragValue::new(timeout_ms).speed(1_000).clamp_range(1_000..=300_000).suffix(" ms"));
                        ui.end_row();
                    }
                });

            ui.add_space(self.theme.spacing_xs);
            ui.label(RichText::new(policy.description()).small().color(self.theme.text_secondary));

            if policy != current {
                self.user_settings.confirmation_policy = Some(policy);
                self.config.confirmation_policy = policy;
                if let Err(e) = self.user_settings.save() {
                    self.notifications
                        .push_back(NotificationEntry::new(format!("Failed to save settings: {}", e)));
                }
            }

            if self.user_settings.confirmation_policy.is_some() {
                ui.add_space(self.theme.spacing_xs);
                if ui
                    .add(self.theme.button_small("Use default"))
                    .on_hover_text("Go back to the delay from TRANSACTION_DELAY_MILLISECONDS")
                    .clicked()
                {
                    self.user_settings.confirmation_policy = None;
                    self.save_and_apply("Confirmation policy reset.");
                }
            }
        });
    }

    fn render_refresh_settings(&mut self, ui: &mut egui::Ui) {
        self.theme.frame_panel().show(ui, |ui| {
            ui.label(RichText::new("Wallet Status").size(18.0).strong().color(self.theme.text_primary));
            ui.add_space(self.theme.spacing_sm);

            ui.horizontal(|ui| {
                ui.label("Status check interval:");
                let mut interval = self.user_settings.wallet_refresh_interval_secs as i32;
                if ui
                    .add(egui::DragValue::new(&mut interval).speed(1).clamp_range(0..=120).suffix(" sec"))
                    .changed()
                {
                    self.user_settings.wallet_refresh_interval_secs = interval as u64;
                    if let Err(e) = self.user_settings.save() {
                        self.notifications.push_back(NotificationEntry::new(format!("Failed to save: {}", e)));
                    }
                }

                for (secs, label) in REFRESH_PRESETS {
                    if ui.small_button(label).clicked() {
                        self.user_settings.wallet_refresh_interval_secs = secs;
                        if let Err(e) = self.user_settings.save() {
                            self.notifications.push_back(NotificationEntry::new(format!("Failed to save: {}", e)));
                        }
                    }
                }
            });

            ui.add_space(self.theme.spacing_xs);
            let interval_text = if self.user_settings.wallet_refresh_interval_secs == 0 {
                "Auto-check disabled. Use the [R] button in the top bar to check manually.".to_string()
            } else {
                format!(
                    "The wallet is checked every {} seconds. Connecting or switching accounts reloads the gift list.",
                    self.user_settings.wallet_refresh_interval_secs
                )
            };
            ui.label(RichText::new(interval_text).small().color(self.theme.text_secondary));
        });
    }
}
