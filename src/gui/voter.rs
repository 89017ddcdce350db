use egui::RichText;

use super::state::{AppState, LoginStep};
use super::{error_label, loading_label, success_label, ACCENT_COLOR};
use crate::flight::Action;
use crate::login::LoginMethod;

pub fn login(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        let Some(method) = state.login.method else {
            ui.spinner();
            ui.label("Detecting your location...");
            return;
        };

        let mut send = false;
        let mut verify = false;
        let mut back = false;

        match state.login.step {
            LoginStep::EnterIdentifier => {
                ui.heading("Login to Vote");
                ui.add_space(12.0);
                egui::Grid::new("identifier_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label(method.label());
                        ui.add(
                            egui::TextEdit::singleline(&mut state.login.identifier)
                                .hint_text(method.hint()),
                        );
                        ui.end_row();
                    });
                ui.add_space(12.0);
                let busy = state.is_busy(Action::SendOtp);
                if ui.add_enabled(!busy, egui::Button::new("Send OTP")).clicked() {
                    send = true;
                }
                if method == LoginMethod::Mobile {
                    ui.label(RichText::new("We will text a one-time code to this number.").small());
                }
            }
            LoginStep::EnterOtp => {
                ui.heading("Verify OTP");
                ui.label(format!("An OTP was sent to {}", state.login.identifier.trim()));
                ui.add_space(12.0);
                egui::Grid::new("otp_grid").num_columns(2).show(ui, |ui| {
                    ui.label("Enter 6-Digit OTP");
                    ui.add(egui::TextEdit::singleline(&mut state.login.otp).hint_text("______"));
                    ui.end_row();
                });
                ui.add_space(12.0);
                let busy = state.is_busy(Action::VerifyOtp);
                ui.horizontal(|ui| {
                    if ui.button("Back").clicked() {
                        back = true;
                    }
                    if ui
                        .add_enabled(!busy, egui::Button::new("Verify & Login"))
                        .clicked()
                    {
                        verify = true;
                    }
                });
            }
        }

        ui.add_space(8.0);
        error_label(ui, &state.login.error);
        success_label(ui, &state.login.message);

        if send {
            state.send_otp();
        } else if verify {
            state.verify_otp();
        } else if back {
            state.login.step = LoginStep::EnterIdentifier;
            state.login.otp.clear();
            state.login.error.clear();
            state.login.message.clear();
        }
    });
}

pub fn voting(ui: &mut egui::Ui, state: &mut AppState) {
    if loading_label(ui, state, Action::LoadVotingState, "Loading Voting Booth...") {
        return;
    }
    error_label(ui, &state.booth_error);

    if state.booth.is_none() {
        if ui.button("Retry").clicked() {
            state.load_voting_state();
        }
        return;
    }
    let Some(booth) = state.booth.as_ref() else {
        return;
    };

    let mut voted_for = None;
    let mut submit = false;

    ui.heading(&booth.line().name);
    ui.horizontal(|ui| {
        ui.label("You have");
        ui.label(
            RichText::new(booth.remaining().to_string())
                .strong()
                .color(ACCENT_COLOR),
        );
        ui.label("votes remaining.");
    });
    ui.add_space(12.0);

    let can_vote = booth.can_vote();
    egui::Grid::new("contestant_grid")
        .num_columns(3)
        .spacing([24.0, 12.0])
        .striped(true)
        .show(ui, |ui| {
            for contestant in booth.contestants() {
                ui.vertical(|ui| {
                    ui.label(RichText::new(&contestant.name).heading());
                    if let Some(details) = &contestant.details {
                        ui.label(details);
                    }
                });
                if ui
                    .add_enabled(can_vote, egui::Button::new(RichText::new("♥").size(24.0)))
                    .clicked()
                {
                    voted_for = Some(contestant.id);
                }
                ui.label(
                    RichText::new(booth.pending_for(contestant.id).to_string())
                        .size(28.0)
                        .color(ACCENT_COLOR),
                );
                ui.end_row();
            }
        });

    let pending = booth.tracker().total_pending();
    if pending > 0 {
        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            let label = if booth.is_submitting() {
                "Submitting...".to_owned()
            } else {
                format!("Submit My {} Votes", pending)
            };
            if ui
                .add_enabled(booth.can_submit(), egui::Button::new(label))
                .clicked()
            {
                submit = true;
            }
        });
    }

    if let Some(id) = voted_for {
        state.vote_for(id);
    }
    if submit {
        state.submit_votes();
    }
}

pub fn history(ui: &mut egui::Ui, state: &mut AppState) {
    if loading_label(ui, state, Action::LoadHistory, "Loading history...") {
        return;
    }
    error_label(ui, &state.history_error);

    if state.history.is_empty() {
        if state.history_error.is_empty() {
            ui.label("You have not cast any votes yet.");
        }
        return;
    }

    egui::Grid::new("history_grid")
        .num_columns(4)
        .striped(true)
        .show(ui, |ui| {
            ui.strong("Voting Period");
            ui.strong("Contestant");
            ui.strong("Votes Cast");
            ui.strong("Date of Vote");
            ui.end_row();

            for entry in &state.history {
                ui.vertical(|ui| {
                    ui.label(&entry.voting_line_name);
                    ui.label(RichText::new(&entry.voting_line_dates).small());
                });
                ui.label(&entry.contestant_name);
                ui.label(
                    RichText::new(entry.vote_count.to_string())
                        .strong()
                        .color(ACCENT_COLOR),
                );
                ui.label(RichText::new(&entry.voted_at).small());
                ui.end_row();
            }
        });
}
