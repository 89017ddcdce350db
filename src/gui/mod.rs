use std::sync::Arc;

use egui::{Color32, RichText};
use reqwest::Client;

use crate::config::Config;
use crate::flight::Action;
use crate::route::Route;
use crate::storage::TokenStore;

mod admin;
pub mod state;
mod voter;

use state::AppState;

const ERROR_COLOR: Color32 = Color32::from_rgb(0xf3, 0x8b, 0xa8);
const SUCCESS_COLOR: Color32 = Color32::from_rgb(0xa6, 0xe3, 0xa1);
const ACCENT_COLOR: Color32 = Color32::from_rgb(0xf5, 0xc2, 0xe7);

pub struct VotingApp {
    state: AppState,
}

impl VotingApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &Config,
        client: Client,
        store: Arc<dyn TokenStore>,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        catppuccin_egui::set_theme(&cc.egui_ctx, catppuccin_egui::MOCHA);
        Self {
            state: AppState::new(cc.egui_ctx.clone(), config, client, store, runtime),
        }
    }
}

impl eframe::App for VotingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui_main(ctx, &mut self.state);
    }
}

pub fn ui_main(ctx: &egui::Context, state: &mut AppState) {
    state.process_events();

    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        egui::Frame::default()
            .outer_margin(egui::vec2(0.0, 4.0))
            .show(ui, |ui| header(ui, state));
    });

    egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Voter: {} | Admin: {}",
                signed_in_label(state.voter.is_authenticated()),
                signed_in_label(state.admin.is_authenticated()),
            ));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(&state.status_message);
            });
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| match state.route {
                Route::Login => voter::login(ui, state),
                Route::Voting => voter::voting(ui, state),
                Route::History => voter::history(ui, state),
                Route::AdminLogin => admin::login(ui, state),
                Route::AdminDashboard => admin::dashboard(ui, state),
                Route::AdminContestants => admin::contestants(ui, state),
                Route::AdminVotingLines => admin::voting_lines(ui, state),
            });
    });
}

fn header(ui: &mut egui::Ui, state: &mut AppState) {
    let mut target = None;
    let mut logout = false;

    ui.horizontal(|ui| {
        ui.with_layout(egui::Layout::left_to_right(egui::Align::Center), |ui| {
            if state.route.is_admin() {
                ui.heading("Idol Admin");
                if state.admin.is_authenticated() {
                    for route in Route::ADMIN_NAV {
                        if ui
                            .selectable_label(state.route == route, route.title())
                            .clicked()
                        {
                            target = Some(route);
                        }
                    }
                }
            } else {
                ui.heading(state.route.title());
                if state.voter.is_authenticated() {
                    if ui
                        .selectable_label(state.route == Route::Voting, "Vote")
                        .clicked()
                    {
                        target = Some(Route::Voting);
                    }
                    if ui
                        .selectable_label(state.route == Route::History, "History")
                        .clicked()
                    {
                        target = Some(Route::History);
                    }
                }
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let signed_in = if state.route.is_admin() {
                state.admin.is_authenticated()
            } else {
                state.voter.is_authenticated()
            };
            if signed_in && ui.button("Logout").clicked() {
                logout = true;
            }
            let switch = if state.route.is_admin() {
                ("Voter", Route::Login)
            } else {
                ("Admin", Route::AdminLogin)
            };
            if ui.button(switch.0).clicked() {
                target = Some(switch.1);
            }
        });
    });

    if logout {
        if state.route.is_admin() {
            state.admin_logout();
        } else {
            state.logout();
        }
    } else if let Some(route) = target {
        state.navigate(route);
    }
}

fn signed_in_label(signed_in: bool) -> &'static str {
    if signed_in {
        "Signed in"
    } else {
        "Not signed in"
    }
}

fn error_label(ui: &mut egui::Ui, text: &str) {
    if !text.is_empty() {
        ui.colored_label(ERROR_COLOR, text);
    }
}

fn success_label(ui: &mut egui::Ui, text: &str) {
    if !text.is_empty() {
        ui.colored_label(SUCCESS_COLOR, text);
    }
}

fn loading_label(ui: &mut egui::Ui, state: &AppState, action: Action, text: &str) -> bool {
    if state.is_busy(action) {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new(text).italics());
        });
        true
    } else {
        false
    }
}
