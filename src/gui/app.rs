//! Main GUI application module
//!
//! Contains the GuiApp struct, its state types and the frame loop.

use crate::{
    config::{Config, NETWORKS},
    gift_list::{
        cancel_gift, fetch_gifts, CancelOutcome, FetchOutcome,
        GiftListView, GiftRow, ReloadRequest,
    },
    operation_lock::OperationLock,
    operation_log,
    rpc::LedgerInfo,
    user_settings::UserSettings,
    wallet::{self, WalletStatus},
};
use anyhow::{anyhow, Result};
use eframe::{egui, egui::RichText, App, Frame, NativeOptions};
use std::collections::VecDeque;

use super::async_job::{self, AsyncJob};
use super::helpers::truncate_message;
use super::notifications::{
    cancel_status_message, failure_hint, wallet_status_change_notification, NotificationEntry,
};
use super::theme::{configure_style, AppTheme};

/// GUI section enum for navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuiSection {
    Dashboard,
    SentGifts,
    Settings,
}

pub(crate) struct CancelJob {
    pub(crate) recipient: String,
    pub(crate) job: AsyncJob<CancelOutcome>,
}

pub(crate) struct GiftsState {
    pub(crate) view: GiftListView,
    /// In-flight fetches tagged with the reload generation that issued them
    pub(crate) fetch_jobs: Vec<(u64, AsyncJob<FetchOutcome>)>,
    pub(crate) cancel_jobs: Vec<CancelJob>,
    /// Row whose cancel button was clicked, awaiting confirmation
    pub(crate) confirm_target: Option<GiftRow>,
    pub(crate) status: Option<String>,
    pub(crate) last_tx_hash: Option<String>,
}

impl GiftsState {
    fn new(view: GiftListView) -> Self {
        Self {
            view,
            fetch_jobs: Vec::new(),
            cancel_jobs: Vec::new(),
            confirm_target: None,
            status: None,
            last_tx_hash: None,
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.fetch_jobs.iter().any(|(_, job)| job.is_running())
    }
}

pub(crate) struct LogViewState {
    pub(crate) content: String,
    pub(crate) job: Option<AsyncJob<String>>,
    pub(crate) error: Option<String>,
    /// Flag to scroll to bottom on next render
    pub(crate) scroll_to_bottom: bool,
}

pub(crate) const EMPTY_LOG_TEXT: &str = "No logs yet. Cancel a gift to generate entries.";

impl Default for LogViewState {
    fn default() -> Self {
        Self {
            content: EMPTY_LOG_TEXT.to_string(),
            job: None,
            error: None,
            scroll_to_bottom: true,
        }
    }
}

#[derive(Default)]
pub(crate) struct NodeStatus {
    pub(crate) latency_ms: Option<u64>,
    pub(crate) ledger: Option<LedgerInfo>,
    pub(crate) error: Option<String>,
    pub(crate) job: Option<AsyncJob<(u64, LedgerInfo)>>,
}

pub struct GuiApp {
    pub(crate) config: Config,
    pub(crate) user_settings: UserSettings,
    pub(crate) theme: AppTheme,
    pub(crate) section: GuiSection,
    pub(crate) previous_section: GuiSection,
    pub(crate) notifications: VecDeque<NotificationEntry>,
    pub(crate) show_notifications_popup: bool,
    pub(crate) notification_toast_visible: bool,
    pub(crate) notification_toast_close_time: Option<std::time::Instant>,
    pub(crate) last_notification_count: usize,
    pub(crate) gifts: GiftsState,
    /// Read side of the operation lock; the gift list view owns the writer
    pub(crate) busy: OperationLock,
    pub(crate) log_view: LogViewState,
    pub(crate) node_status: NodeStatus,
    // Wallet status
    pub(crate) wallet_status: WalletStatus,
    pub(crate) last_stable_wallet_status: WalletStatus, // Status before "Checking" - used for change detection
    pub(crate) wallet_status_job: Option<AsyncJob<WalletStatus>>,
    pub(crate) last_status_check: std::time::Instant,
    // Settings page editing state
    pub(crate) settings_pending_node_url: String,
    pub(crate) settings_pending_cli_profile: String,
}

impl GuiApp {
    fn new(config: Config, ctx: &egui::Context) -> Self {
        let theme = AppTheme::default();
        configure_style(ctx, &theme);

        let user_settings = UserSettings::load();
        let (writer, _) = OperationLock::new();
        let view = GiftListView::new(writer);
        let busy = view.lock_reader();
        let settings_pending_node_url = user_settings
            .get_custom_node_url(&config.network_key)
            .cloned()
            .unwrap_or_default();
        let settings_pending_cli_profile = user_settings.cli_profile.clone();

        let mut app = Self {
            config,
            user_settings,
            theme,
            section: GuiSection::SentGifts,
            previous_section: GuiSection::SentGifts,
            notifications: VecDeque::with_capacity(20),
            show_notifications_popup: false,
            notification_toast_visible: false,
            notification_toast_close_time: None,
            last_notification_count: 0,
            gifts: GiftsState::new(view),
            busy,
            log_view: LogViewState::default(),
            node_status: NodeStatus::default(),
            wallet_status: WalletStatus::Unknown("Not checked yet".to_string()),
            last_stable_wallet_status: WalletStatus::Unknown("Not checked yet".to_string()),
            wallet_status_job: None,
            last_status_check: std::time::Instant::now(),
            settings_pending_node_url,
            settings_pending_cli_profile,
        };
        if !app.config.has_module() {
            app.notifications.push_back(NotificationEntry::new(
                "MODULE_ADDRESS is not set. Gifts cannot be loaded until it is configured.",
            ));
        }
        app.start_wallet_status_check();
        app
    }

    pub(crate) fn spawn_job<T, FutBuilder, Fut>(&self, builder: FutBuilder) -> AsyncJob<T>
    where
        T: Send + 'static,
        FutBuilder: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T>> + 'static,
    {
        async_job::spawn_job(builder)
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Rebuild the config from the saved settings and start over with it.
    pub(crate) fn apply_settings(&mut self) {
        self.config = self.user_settings.to_config();
        self.settings_pending_node_url = self
            .user_settings
            .get_custom_node_url(&self.config.network_key)
            .cloned()
            .unwrap_or_default();
        self.node_status = NodeStatus::default();
        self.gifts.view.clear();
        self.gifts.status = None;
        self.gifts.last_tx_hash = None;
        let request = self.gifts.view.request_reload();
        self.start_fetch(request);
        self.start_wallet_status_check();
    }

    pub(crate) fn select_network(&mut self, key: &str) {
        self.user_settings.selected_network_key = key.to_string();
        if let Err(e) = self.user_settings.save() {
            self.notifications
                .push_back(NotificationEntry::new(format!("Failed to save settings: {}", e)));
        }
        self.apply_settings();
        self.notifications.push_back(NotificationEntry::new(format!(
            "Switched to {}",
            self.config.network_label()
        )));
    }

    pub(crate) fn start_wallet_status_check(&mut self) {
        if !matches!(self.wallet_status, WalletStatus::Checking) {
            self.last_stable_wallet_status = self.wallet_status.clone();
        }
        self.wallet_status = WalletStatus::Checking;
        self.last_status_check = std::time::Instant::now();

        let config = self.config.clone();
        self.wallet_status_job = Some(self.spawn_job(move || async move {
            Ok(wallet::check_wallet_status(&config).await)
        }));
    }

    /// Wallet status to reason about; skips the transient "Checking" state.
    pub(crate) fn stable_wallet_status(&self) -> &WalletStatus {
        if matches!(self.wallet_status, WalletStatus::Checking) {
            &self.last_stable_wallet_status
        } else {
            &self.wallet_status
        }
    }

    pub(crate) fn get_wallet_warning_message(&self) -> Option<String> {
        match self.stable_wallet_status() {
            WalletStatus::Connected { .. } | WalletStatus::Checking => None,
            WalletStatus::Disconnected => Some(format!(
                "⚠ No wallet connected ({}). {}",
                self.config.wallet_backend.display_name(),
                failure_hint("not connected").unwrap_or_default()
            )),
            WalletStatus::Unknown(msg) => Some(format!("⚠ Wallet status unknown: {}", msg)),
        }
    }

    pub(crate) fn start_fetch(&mut self, request: ReloadRequest) {
        if !self.config.has_module() {
            return;
        }
        let config = self.config.clone();
        let generation = request.generation;
        let job = self.spawn_job(move || async move {
            let client = config.rest_client()?;
            let function = config.view_gifts_function();
            Ok(fetch_gifts(&client, &function, request.account.as_deref()).await)
        });
        self.gifts.fetch_jobs.push((generation, job));
    }

    pub(crate) fn start_cancel(&mut self, recipient: String) {
        let config = self.config.clone();
        let lock = self.gifts.view.lock_writer();
        let target = recipient.clone();
        tracing::info!("Cancelling gift for {}", recipient);
        let job = self.spawn_job(move || async move {
            let wallet = wallet::build_wallet(&config)?;
            let rpc = config.rest_client()?;
            let function = config.remove_gift_function();
            Ok(cancel_gift(
                wallet.as_ref(),
                &rpc,
                &lock,
                &function,
                &target,
                config.confirmation_policy,
            )
            .await)
        });
        self.gifts.status = Some(format!("[..] Cancelling gift for {}...", recipient));
        self.gifts.cancel_jobs.push(CancelJob { recipient, job });
    }

    pub(crate) fn start_node_check(&mut self) {
        let config = self.config.clone();
        self.node_status.job = Some(self.spawn_job(move || async move {
            let client = config.rest_client()?;
            let start = std::time::Instant::now();
            let info = client.ledger_info().await?;
            Ok((start.elapsed().as_millis() as u64, info))
        }));
    }

    /// Sample the wallet and the operation lock and feed the gift list trigger.
    fn observe_dependencies(&mut self) {
        let status = self.stable_wallet_status().clone();
        let requests = self.gifts.view.sample(status.address(), status.is_connected());
        for request in requests {
            self.start_fetch(request);
        }
    }

    fn poll_jobs(&mut self) {
        // Gift fetches
        let mut finished = Vec::new();
        self.gifts.fetch_jobs.retain_mut(|(generation, job)| match job.poll() {
            Some(res) => {
                finished.push((*generation, res));
                false
            }
            None => true,
        });
        for (generation, res) in finished {
            let current = self.gifts.view.is_current(generation);
            match res {
                Ok(outcome) => {
                    let failure = match &outcome {
                        FetchOutcome::Failed(e) => Some(e.to_string()),
                        _ => None,
                    };
                    self.gifts.view.apply_fetch(generation, outcome);
                    if let (true, Some(msg)) = (current, failure) {
                        self.notifications
                            .push_back(NotificationEntry::new(format!("Failed to load gifts: {}", msg)));
                    }
                }
                Err(e) if current => {
                    self.notifications
                        .push_back(NotificationEntry::new(format!("Failed to load gifts: {}", e)));
                }
                Err(_) => {}
            }
        }

        // Cancels
        let mut completed = Vec::new();
        self.gifts.cancel_jobs.retain_mut(|cancel| match cancel.job.poll() {
            Some(res) => {
                completed.push((cancel.recipient.clone(), res));
                false
            }
            None => true,
        });
        for (recipient, res) in completed {
            self.finish_cancel(&recipient, res);
        }

        // Operation log
        if let Some(job) = &mut self.log_view.job {
            if let Some(res) = job.poll() {
                match res {
                    Ok(content) => {
                        self.log_view.content = content;
                        self.log_view.error = None;
                        self.log_view.scroll_to_bottom = true;
                    }
                    Err(e) => {
                        self.log_view.error = Some(e.to_string());
                    }
                }
                self.log_view.job = None;
            }
        }

        // Node status
        if let Some(job) = &mut self.node_status.job {
            if let Some(res) = job.poll() {
                match res {
                    Ok((latency, info)) => {
                        self.node_status.latency_ms = Some(latency);
                        self.node_status.ledger = Some(info);
                        self.node_status.error = None;
                    }
                    Err(e) => {
                        self.node_status.latency_ms = None;
                        self.node_status.error = Some(e.to_string());
                    }
                }
                self.node_status.job = None;
            }
        }

        // Wallet status
        if let Some(job) = &mut self.wallet_status_job {
            if let Some(res) = job.poll() {
                let new_status = match res {
                    Ok(status) => status,
                    Err(_) => WalletStatus::Unknown("Check failed".to_string()),
                };
                if let Some(notification) =
                    wallet_status_change_notification(&self.last_stable_wallet_status, &new_status)
                {
                    self.notifications.push_back(NotificationEntry::new(notification));
                }
                self.last_stable_wallet_status = new_status.clone();
                self.wallet_status = new_status;
                self.wallet_status_job = None;
            }
        }

        // Auto-refresh wallet status based on user-configured interval
        let refresh_interval = self.user_settings.wallet_refresh_interval_secs;
        if refresh_interval > 0
            && self.wallet_status_job.is_none()
            && self.last_status_check.elapsed().as_secs() >= refresh_interval
        {
            self.start_wallet_status_check();
        }

        self.observe_dependencies();

        while self.notifications.len() > 50 {
            self.notifications.pop_front();
        }
    }

    fn finish_cancel(&mut self, recipient: &str, res: Result<CancelOutcome>) {
        let (status, details) = match &res {
            Ok(outcome) => {
                if let Some(hash) = outcome.hash() {
                    self.gifts.last_tx_hash = Some(hash.to_string());
                }
                let mut details = format!("recipient={}\noutcome={}", recipient, outcome.summary());
                if let Some(url) = outcome
                    .hash()
                    .and_then(|h| crate::config::get_tx_explorer_url(&self.config.network_key, h))
                {
                    details.push_str(&format!("\nexplorer={}", url));
                }
                (cancel_status_message(outcome), details)
            }
            Err(e) => {
                let msg = e.to_string();
                let status = match failure_hint(&msg) {
                    Some(hint) => format!("[XX] Cancel failed: {}\n\n{}", msg, hint),
                    None => format!("[XX] Cancel failed: {}", msg),
                };
                (status, format!("recipient={}\nerror={}", recipient, msg))
            }
        };

        let failed = res.as_ref().map(|o| o.is_failure()).unwrap_or(true);
        self.notifications.push_back(NotificationEntry::new(if failed {
            format!("Cancel failed for {}", crate::units::truncate_address(recipient))
        } else {
            format!("Gift for {} cancelled", crate::units::truncate_address(recipient))
        }));
        self.gifts.status = Some(status);

        let details = format!(
            "{}\nbackend={}\nnode={}",
            details,
            self.config.wallet_backend.display_name(),
            self.config.node_url
        );
        if let Err(e) = operation_log::append_log("cancel_gift", &self.config.network_key, details) {
            tracing::warn!("Failed to write operation log: {}", e);
        }
        self.refresh_logs();
    }

    pub(crate) fn navigate(&mut self, section: GuiSection) {
        self.previous_section = self.section;
        self.section = section;
        if section == GuiSection::Dashboard {
            if self.previous_section != GuiSection::Dashboard || self.log_view.content == EMPTY_LOG_TEXT {
                self.refresh_logs();
            }
            if self.node_status.job.is_none() && self.node_status.latency_ms.is_none() {
                self.start_node_check();
            }
            self.log_view.scroll_to_bottom = true;
        }
    }

    /// Render a wallet warning message in the UI if the wallet has a connection problem.
    pub(crate) fn render_wallet_warning(&self, ui: &mut egui::Ui) {
        if let Some(warning) = self.get_wallet_warning_message() {
            ui.add_space(self.theme.spacing_xs);
            ui.label(RichText::new(warning).color(self.theme.warning).size(12.0));
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(10.0);
            ui.horizontal_wrapped(|ui| {
                ui.heading(RichText::new("🎁 Gifter").size(26.0).color(self.theme.primary));
                ui.label(
                    RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                        .size(12.0)
                        .color(self.theme.text_secondary),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    // Network selector (rightmost), locked while a transaction is in flight
                    let busy = self.is_busy();
                    let mut selected_key: Option<&'static str> = None;
                    ui.add_enabled_ui(!busy, |ui| {
                        egui::ComboBox::from_id_source("network_selector")
                            .selected_text(self.config.network_label())
                            .width(140.0)
                            .show_ui(ui, |ui| {
                                for network in NETWORKS.iter() {
                                    let is_selected = self.config.network_key == network.key;
                                    if ui.selectable_label(is_selected, network.label).clicked() && !is_selected {
                                        selected_key = Some(network.key);
                                    }
                                }
                            })
                            .response
                            .on_disabled_hover_text("Network cannot change while a transaction is in progress");
                    });
                    if let Some(key) = selected_key {
                        self.select_network(key);
                    }

                    ui.add_space(self.theme.spacing_sm);

                    // Wallet status indicator
                    let (status_icon, status_hover) = match &self.wallet_status {
                        WalletStatus::Connected { address } => ("●", format!("Connected: {}", address)),
                        WalletStatus::Disconnected => ("●", "No wallet connected".to_string()),
                        WalletStatus::Checking => ("◐", "Checking wallet status...".to_string()),
                        WalletStatus::Unknown(msg) => ("●", format!("Unknown: {}", msg)),
                    };
                    let (r, g, b) = self.wallet_status.color();
                    let status_color = egui::Color32::from_rgb(r, g, b);

                    egui::Frame::none()
                        .fill(self.theme.surface)
                        .rounding(4.0)
                        .inner_margin(egui::Margin::symmetric(8.0, 4.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                let checking = self.wallet_status_job.is_some();
                                if ui
                                    .add_enabled(
                                        !checking,
                                        egui::Button::new(
                                            RichText::new(if checking { "↻" } else { "[R]" })
                                                .color(self.theme.text_primary)
                                                .size(11.0),
                                        )
                                        .fill(self.theme.secondary)
                                        .small(),
                                    )
                                    .on_hover_text("Refresh wallet status")
                                    .clicked()
                                {
                                    self.start_wallet_status_check();
                                }
                                ui.label(RichText::new(status_icon).color(status_color).size(14.0))
                                    .on_hover_text(&status_hover);
                                let label = match self.stable_wallet_status().address() {
                                    Some(address) => crate::units::truncate_address(address),
                                    None => "Wallet".to_string(),
                                };
                                ui.label(RichText::new(label).color(self.theme.text_secondary).size(12.0))
                                    .on_hover_text(&status_hover);
                            });
                        });

                    if self.is_busy() {
                        ui.add_space(self.theme.spacing_sm);
                        ui.spinner();
                        ui.label(
                            RichText::new("Transaction in progress")
                                .color(self.theme.warning)
                                .size(12.0),
                        );
                    }
                });
            });
        });
    }

    fn render_notifications(&mut self, ctx: &egui::Context) {
        // Check for new notifications and trigger toast
        let current_notification_count = self.notifications.len();
        if current_notification_count > self.last_notification_count {
            self.notification_toast_visible = true;
            self.notification_toast_close_time =
                Some(std::time::Instant::now() + std::time::Duration::from_secs(5));
        }
        self.last_notification_count = current_notification_count;

        if let Some(close_time) = self.notification_toast_close_time {
            if std::time::Instant::now() >= close_time {
                self.notification_toast_visible = false;
                self.notification_toast_close_time = None;
            }
        }

        let notification_count = self.notifications.len();
        let has_notifications = notification_count > 0;
        let latest_notification = self.notifications.back().map(|n| n.message.clone());

        egui::Area::new(egui::Id::new("notification_overlay"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(self.theme.surface)
                    .rounding(6.0)
                    .stroke(egui::Stroke::new(1.0, self.theme.primary))
                    .inner_margin(egui::Margin::symmetric(8.0, 6.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let icon_color = if has_notifications {
                                self.theme.accent_green
                            } else {
                                self.theme.text_secondary
                            };
                            if ui
                                .add(
                                    egui::Button::new(RichText::new("[!]").size(14.0).color(icon_color).strong())
                                        .fill(egui::Color32::TRANSPARENT)
                                        .stroke(egui::Stroke::NONE),
                                )
                                .on_hover_text("Click to view notification history")
                                .clicked()
                            {
                                self.show_notifications_popup = !self.show_notifications_popup;
                            }

                            if self.notification_toast_visible {
                                if let Some(ref msg) = latest_notification {
                                    ui.add_space(4.0);
                                    ui.label(
                                        RichText::new(truncate_message(msg, 48))
                                            .size(12.0)
                                            .color(self.theme.text_primary),
                                    );
                                }
                            } else if has_notifications {
                                ui.add_space(2.0);
                                ui.label(
                                    RichText::new(notification_count.to_string())
                                        .size(10.0)
                                        .color(self.theme.accent_orange),
                                );
                            }
                        });
                    });
            });

        if self.show_notifications_popup {
            egui::Window::new("[#] Notification History")
                .collapsible(false)
                .resizable(true)
                .default_width(450.0)
                .default_height(350.0)
                .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -50.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("{} notifications", self.notifications.len()))
                                .color(self.theme.text_secondary),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.add(self.theme.button_small("[X] Close")).clicked() {
                                self.show_notifications_popup = false;
                            }
                            if ui.add(self.theme.button_small("[C] Clear")).clicked() {
                                self.notifications.clear();
                            }
                        });
                    });
                    ui.separator();

                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .max_height(280.0)
                        .show(ui, |ui| {
                            if self.notifications.is_empty() {
                                ui.label(RichText::new("No notifications yet.").color(self.theme.text_secondary));
                            } else {
                                for notification in self.notifications.iter().rev() {
                                    ui.horizontal(|ui| {
                                        ui.label(
                                            RichText::new(format!("[{}]", notification.time_ago()))
                                                .size(11.0)
                                                .color(self.theme.text_secondary),
                                        );
                                        ui.label(
                                            RichText::new(&notification.message)
                                                .size(12.0)
                                                .color(self.theme.text_primary),
                                        );
                                    });
                                    ui.add_space(3.0);
                                }
                            }
                        });
                });
        }
    }

    fn render_nav(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("nav")
            .resizable(false)
            .default_width(170.0)
            .frame(
                egui::Frame::none()
                    .fill(self.theme.surface)
                    .stroke(egui::Stroke::new(1.0, self.theme.secondary)),
            )
            .show(ctx, |ui| {
                ui.add_space(self.theme.spacing_md);

                let nav_items = [
                    (GuiSection::Dashboard, "[H] Dashboard"),
                    (GuiSection::SentGifts, "[G] Sent Gifts"),
                    (GuiSection::Settings, "[*] Settings"),
                ];

                for (section, label) in nav_items {
                    let selected = self.section == section;
                    ui.horizontal(|ui| {
                        if selected {
                            ui.add_space(2.0);
                            let (rect, _) = ui.allocate_exact_size(egui::vec2(3.0, 20.0), egui::Sense::hover());
                            ui.painter().rect_filled(rect, 0.0, self.theme.primary);
                            ui.add_space(4.0);
                        } else {
                            ui.add_space(9.0);
                        }

                        let text_color = if selected {
                            self.theme.text_primary
                        } else {
                            self.theme.text_secondary
                        };
                        let response = ui.add(
                            egui::Button::new(RichText::new(label).size(13.0).color(text_color))
                                .fill(egui::Color32::TRANSPARENT)
                                .stroke(egui::Stroke::NONE),
                        );
                        if response.clicked() {
                            self.navigate(section);
                        }
                    });
                    ui.add_space(self.theme.spacing_xs);
                }
            });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_jobs();

        self.render_top_bar(ctx);
        self.render_notifications(ctx);
        self.render_nav(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(self.theme.spacing_md);
            egui::ScrollArea::vertical().show(ui, |ui| match self.section {
                GuiSection::Dashboard => self.view_dashboard(ui),
                GuiSection::SentGifts => self.view_gifts(ui),
                GuiSection::Settings => self.view_settings(ui),
            });
        });

        self.render_cancel_dialog(ctx);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}

pub fn launch(mut config: Config) -> Result<()> {
    let user_settings = UserSettings::load();
    if crate::config::find_network(&user_settings.selected_network_key).is_some() {
        config = user_settings.to_config();
    }
    tracing::info!(
        "Starting on {} ({}) with {}",
        config.network_label(),
        config.node_url,
        config.wallet_backend.display_name()
    );

    let app_creator = move |cc: &eframe::CreationContext<'_>| {
        Box::new(GuiApp::new(config.clone(), &cc.egui_ctx)) as Box<dyn App>
    };

    let viewport = egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]);
    let native_options = NativeOptions {
        viewport,
        persist_window: true,
        ..Default::default()
    };

    eframe::run_native("Gifter - Aptos Birthday Gifts", native_options, Box::new(app_creator))
        .map_err(|e| anyhow!("Failed to start GUI: {}", e))
}
