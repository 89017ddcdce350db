use egui::{Color32, RichText};

use super::state::AppState;
use super::{error_label, loading_label, success_label, ACCENT_COLOR, SUCCESS_COLOR};
use crate::flight::Action;
use crate::models::{Gender, VotingLineId};

pub fn login(ui: &mut egui::Ui, state: &mut AppState) {
    let mut submit = false;
    ui.vertical_centered(|ui| {
        ui.add_space(12.0);
        ui.heading("Admin Login");
        ui.add_space(12.0);
        egui::Grid::new("admin_login_grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Username");
                ui.text_edit_singleline(&mut state.admin_login.username);
                ui.end_row();

                ui.label("Password");
                ui.add(egui::TextEdit::singleline(&mut state.admin_login.password).password(true));
                ui.end_row();
            });
        ui.add_space(12.0);
        let busy = state.is_busy(Action::AdminLogin);
        if ui.add_enabled(!busy, egui::Button::new("Login")).clicked() {
            submit = true;
        }
        error_label(ui, &state.admin_login.error);
    });
    if submit {
        state.admin_login();
    }
}

pub fn dashboard(ui: &mut egui::Ui, state: &mut AppState) {
    let mut selected = state.dashboard.selected;

    ui.horizontal(|ui| {
        ui.heading("Voting Dashboard");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let current = state
                .dashboard
                .lines
                .iter()
                .find(|l| Some(l.id) == selected)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| "Select...".to_owned());
            egui::ComboBox::from_label("Select Voting Line:")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for line in &state.dashboard.lines {
                        ui.selectable_value(&mut selected, Some(line.id), &line.name);
                    }
                });
        });
    });
    ui.add_space(12.0);
    error_label(ui, &state.dashboard.error);

    if let Some(stats) = &state.dashboard.stats {
        ui.vertical_centered(|ui| {
            ui.heading(format!("{} - Live Results", stats.voting_line_name));
        });
        ui.add_space(8.0);
        let peak = stats.peak().max(1) as f32;
        egui::Grid::new("stats_grid")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                for stat in &stats.stats {
                    ui.label(&stat.contestant_name);
                    ui.add(
                        egui::ProgressBar::new(stat.total_votes as f32 / peak)
                            .desired_width(320.0)
                            .fill(ACCENT_COLOR)
                            .text(format!("{} votes", stat.total_votes)),
                    );
                    ui.end_row();
                }
            });
        if stats.stats.is_empty() {
            ui.label("No votes recorded yet.");
        }
    } else if !loading_label(ui, state, Action::LoadDashboardStats, "Loading stats...")
        && state.dashboard.lines.is_empty()
    {
        ui.label("No voting lines found.");
    }

    if let Some(id) = selected {
        if state.dashboard.selected != Some(id) {
            state.select_dashboard_line(id);
        }
    }
}

pub fn contestants(ui: &mut egui::Ui, state: &mut AppState) {
    let mut submit = false;

    ui.columns(2, |columns| {
        let ui = &mut columns[0];
        ui.heading("Add New Contestant");
        ui.add_space(8.0);
        let form = &mut state.contestants.form;
        egui::Grid::new("contestant_form")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut form.name);
                ui.end_row();

                ui.label("Age");
                ui.text_edit_singleline(&mut form.age);
                ui.end_row();

                ui.label("Gender");
                egui::ComboBox::from_id_salt("gender")
                    .selected_text(form.gender.as_str())
                    .show_ui(ui, |ui| {
                        for gender in Gender::ALL {
                            ui.selectable_value(&mut form.gender, gender, gender.as_str());
                        }
                    });
                ui.end_row();

                ui.label("Details");
                ui.text_edit_multiline(&mut form.details);
                ui.end_row();

                ui.label("Image file");
                ui.add(egui::TextEdit::singleline(&mut form.image_path).hint_text("optional path"));
                ui.end_row();
            });
        ui.add_space(8.0);
        let busy = state.is_busy(Action::CreateContestant);
        if ui
            .add_enabled(!busy, egui::Button::new("Add Contestant"))
            .clicked()
        {
            submit = true;
        }
        error_label(ui, &state.contestants.error);
        success_label(ui, &state.contestants.success);

        let ui = &mut columns[1];
        ui.heading("Current Contestants");
        ui.add_space(8.0);
        if state.contestants.contestants.is_empty() {
            ui.label("No contestants found.");
        }
        for c in &state.contestants.contestants {
            ui.group(|ui| {
                ui.label(RichText::new(&c.name).strong());
                let age = c.age.map(|a| a.to_string()).unwrap_or_default();
                let gender = c.gender.as_deref().unwrap_or("");
                ui.label(format!("{}, {}", age, gender));
            });
        }
    });

    if submit {
        state.create_contestant();
    }
}

pub fn voting_lines(ui: &mut egui::Ui, state: &mut AppState) {
    let mut create = false;
    let mut toggled: Option<(VotingLineId, bool)> = None;
    let mut picked = None;

    ui.columns(2, |columns| {
        let ui = &mut columns[0];
        ui.heading("Create New Line");
        ui.add_space(8.0);
        let form = &mut state.voting_lines.form;
        egui::Grid::new("voting_line_form")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Line Name");
                ui.text_edit_singleline(&mut form.name);
                ui.end_row();

                ui.label("Start Time");
                ui.add(egui::TextEdit::singleline(&mut form.start).hint_text("2025-01-31T18:00"));
                ui.end_row();

                ui.label("End Time");
                ui.add(egui::TextEdit::singleline(&mut form.end).hint_text("2025-01-31T22:00"));
                ui.end_row();

                ui.label("Max Votes Per User");
                ui.text_edit_singleline(&mut form.max_votes);
                ui.end_row();
            });
        ui.label("Select Contestants");
        egui::ScrollArea::vertical()
            .id_salt("line_contestants")
            .max_height(160.0)
            .show(ui, |ui| {
                for c in &state.voting_lines.contestants {
                    let mut checked = form.is_selected(c.id);
                    if ui.checkbox(&mut checked, &c.name).changed() {
                        picked = Some(c.id);
                    }
                }
            });
        ui.add_space(8.0);
        let busy = state.is_busy(Action::CreateVotingLine);
        if ui.add_enabled(!busy, egui::Button::new("Create Line")).clicked() {
            create = true;
        }
        error_label(ui, &state.voting_lines.error);

        let ui = &mut columns[1];
        ui.heading("Existing Voting Lines");
        ui.add_space(8.0);
        if state.voting_lines.lines.is_empty() {
            ui.label("No voting lines found.");
        }
        let toggling = state.is_busy(Action::ToggleVotingLine);
        for line in &state.voting_lines.lines {
            let frame = if line.is_active {
                egui::Frame::group(ui.style()).stroke(egui::Stroke::new(2.0, SUCCESS_COLOR))
            } else {
                egui::Frame::group(ui.style())
            };
            frame.show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&line.name).strong());
                        ui.label(format!("Votes per user: {}", line.max_votes_per_user));
                        if let Some(start) = &line.start_time {
                            ui.label(RichText::new(format!("Starts: {}", start)).small());
                        }
                        if let Some(end) = &line.end_time {
                            ui.label(RichText::new(format!("Ends: {}", end)).small());
                        }
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                        let (label, color) = if line.is_active {
                            ("Deactivate", Color32::from_rgb(0xf9, 0xe2, 0xaf))
                        } else {
                            ("Activate", SUCCESS_COLOR)
                        };
                        let button = egui::Button::new(RichText::new(label).color(color));
                        if ui.add_enabled(!toggling, button).clicked() {
                            toggled = Some((line.id, !line.is_active));
                        }
                    });
                });
                let names: Vec<&str> = line.contestants.iter().map(|c| c.name.as_str()).collect();
                let eligible = if names.is_empty() {
                    "None".to_owned()
                } else {
                    names.join(", ")
                };
                ui.label(RichText::new(format!("Eligible Contestants: {}", eligible)).small());
            });
        }
    });

    if let Some(id) = picked {
        state.voting_lines.form.toggle(id);
    }
    if create {
        state.create_voting_line();
    }
    if let Some((id, active)) = toggled {
        state.toggle_voting_line(id, active);
    }
}
