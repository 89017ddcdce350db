use std::future::Future;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use log::{debug, info, warn};
use reqwest::Client;

use crate::admin::{ContestantForm, VotingLineForm};
use crate::api::{admin, auth, contestants, vote, voting_lines};
use crate::booth::{fetch_booth, SubmissionOutcome, VotingBooth};
use crate::config::Config;
use crate::error::ApiError;
use crate::flight::{Action, FlightGuard, SingleFlight};
use crate::login::{detect_login_method, validate_identifier, IpApiLookup, LoginMethod};
use crate::models::{
    Contestant, ContestantId, DashboardStats, VoteHistoryEntry, VotingLine, VotingLineId,
};
use crate::route::Route;
use crate::session::{SessionContext, SessionKind};
use crate::storage::TokenStore;

/// Results of background requests, drained by the UI thread every frame.
pub enum UiEvent {
    LoginMethodDetected(LoginMethod),
    OtpSent(Result<(), ApiError>),
    OtpVerified(Result<String, ApiError>),
    AdminLoggedIn(Result<String, ApiError>),
    VotingStateLoaded(Result<VotingBooth, ApiError>),
    VotesSubmitted(SubmissionOutcome),
    HistoryLoaded(Result<Vec<VoteHistoryEntry>, ApiError>),
    ContestantsLoaded(Result<Vec<Contestant>, ApiError>),
    ContestantCreated(Result<Contestant, ApiError>),
    VotingLinesLoaded(Result<Vec<VotingLine>, ApiError>),
    VotingLineCreated(Result<VotingLine, ApiError>),
    VotingLineToggled(Result<(), ApiError>),
    DashboardStatsLoaded(VotingLineId, Result<DashboardStats, ApiError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    EnterIdentifier,
    EnterOtp,
}

pub struct LoginScreen {
    /// `None` until the location lookup settles.
    pub method: Option<LoginMethod>,
    pub step: LoginStep,
    pub identifier: String,
    pub otp: String,
    pub error: String,
    pub message: String,
}

impl Default for LoginScreen {
    fn default() -> Self {
        Self {
            method: None,
            step: LoginStep::EnterIdentifier,
            identifier: String::new(),
            otp: String::new(),
            error: String::new(),
            message: String::new(),
        }
    }
}

#[derive(Default)]
pub struct AdminLoginScreen {
    pub username: String,
    pub password: String,
    pub error: String,
}

#[derive(Default)]
pub struct DashboardScreen {
    pub lines: Vec<VotingLine>,
    pub selected: Option<VotingLineId>,
    pub stats: Option<DashboardStats>,
    pub error: String,
}

impl DashboardScreen {
    fn select(&mut self, line_id: VotingLineId) {
        self.selected = Some(line_id);
        self.stats = None;
        self.error.clear();
    }

    /// Stats fetched for any other line than the selected one are stale.
    fn shows(&self, line_id: VotingLineId) -> bool {
        self.selected == Some(line_id)
    }
}

#[derive(Default)]
pub struct ContestantsScreen {
    pub contestants: Vec<Contestant>,
    pub form: ContestantForm,
    pub error: String,
    pub success: String,
}

#[derive(Default)]
pub struct VotingLinesScreen {
    pub lines: Vec<VotingLine>,
    pub contestants: Vec<Contestant>,
    pub form: VotingLineForm,
    pub error: String,
}

pub struct AppState {
    client: Client,
    api_url: String,
    geo_lookup_url: String,
    runtime: tokio::runtime::Runtime,
    ctx: egui::Context,
    event_sender: Sender<UiEvent>,
    event_receiver: Receiver<UiEvent>,
    pub flights: SingleFlight,
    pub voter: SessionContext,
    pub admin: SessionContext,
    pub route: Route,
    pub status_message: String,
    pub login: LoginScreen,
    pub booth: Option<VotingBooth>,
    pub booth_error: String,
    pub history: Vec<VoteHistoryEntry>,
    pub history_error: String,
    pub admin_login: AdminLoginScreen,
    pub dashboard: DashboardScreen,
    pub contestants: ContestantsScreen,
    pub voting_lines: VotingLinesScreen,
}

impl AppState {
    pub fn new(
        ctx: egui::Context,
        config: &Config,
        client: Client,
        store: Arc<dyn TokenStore>,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        let (event_sender, event_receiver) = std::sync::mpsc::channel();
        let mut state = Self {
            client,
            api_url: config.api_url.clone(),
            geo_lookup_url: config.geo_lookup_url.clone(),
            runtime,
            ctx,
            event_sender,
            event_receiver,
            flights: SingleFlight::new(),
            voter: SessionContext::restore(SessionKind::Voter, Arc::clone(&store)),
            admin: SessionContext::restore(SessionKind::Admin, store),
            route: Route::Login,
            status_message: "Idle".to_owned(),
            login: LoginScreen::default(),
            booth: None,
            booth_error: String::new(),
            history: Vec::new(),
            history_error: String::new(),
            admin_login: AdminLoginScreen::default(),
            dashboard: DashboardScreen::default(),
            contestants: ContestantsScreen::default(),
            voting_lines: VotingLinesScreen::default(),
        };
        state.navigate(Route::Login);
        state
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.flights.is_in_flight(action)
    }

    /// Runs `task` on the runtime while holding the slot for `action`.
    fn spawn<F>(&mut self, action: Action, task: impl FnOnce(Client, String) -> F)
    where
        F: Future<Output = UiEvent> + Send + 'static,
    {
        let flight = match self.flights.begin(action) {
            Ok(flight) => flight,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };
        let future = task(self.client.clone(), self.api_url.clone());
        self.dispatch(flight, future);
    }

    fn dispatch<F>(&self, flight: FlightGuard, future: F)
    where
        F: Future<Output = UiEvent> + Send + 'static,
    {
        let sender = self.event_sender.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = future.await;
            drop(flight);
            if sender.send(event).is_err() {
                warn!("UI is gone, dropping result");
            }
            ctx.request_repaint();
        });
    }

    /// Switches screens, applying the session guards and kicking off the
    /// screen's initial fetches.
    pub fn navigate(&mut self, route: Route) {
        let route = route.resolve(&self.voter, &self.admin);
        info!("Navigating to {:?}", route);
        self.route = route;
        match route {
            Route::Login => {
                if self.login.method.is_none() {
                    self.detect_login_method();
                }
            }
            Route::Voting => self.load_voting_state(),
            Route::History => self.load_history(),
            Route::AdminLogin => {}
            Route::AdminDashboard => self.load_voting_lines(),
            Route::AdminContestants => self.load_contestants(),
            Route::AdminVotingLines => {
                self.load_voting_lines();
                self.load_contestants();
            }
        }
    }

    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
    }

    // --- Voter login

    fn detect_login_method(&mut self) {
        let lookup = IpApiLookup::new(self.client.clone(), self.geo_lookup_url.clone());
        self.spawn(Action::DetectLocation, |_, _| async move {
            UiEvent::LoginMethodDetected(detect_login_method(&lookup).await)
        });
    }

    pub fn send_otp(&mut self) {
        self.login.error.clear();
        self.login.message.clear();
        let method = self.login.method.unwrap_or(LoginMethod::Email);
        let identifier = match validate_identifier(method, &self.login.identifier) {
            Ok(identifier) => identifier,
            Err(e) => {
                self.login.error = e.to_string();
                return;
            }
        };
        self.spawn(Action::SendOtp, |client, base_url| async move {
            let result = auth::send_otp(&client, &base_url, &identifier).await;
            UiEvent::OtpSent(result.map(|_| ()))
        });
    }

    pub fn verify_otp(&mut self) {
        self.login.error.clear();
        self.login.message.clear();
        let method = self.login.method.unwrap_or(LoginMethod::Email);
        let identifier = match validate_identifier(method, &self.login.identifier) {
            Ok(identifier) => identifier,
            Err(e) => {
                self.login.error = e.to_string();
                return;
            }
        };
        let otp = self.login.otp.clone();
        self.spawn(Action::VerifyOtp, |client, base_url| async move {
            UiEvent::OtpVerified(auth::verify_otp(&client, &base_url, &identifier, &otp).await)
        });
    }

    pub fn logout(&mut self) {
        self.voter.end();
        self.booth = None;
        self.booth_error.clear();
        self.history.clear();
        self.history_error.clear();
        self.login = LoginScreen {
            method: self.login.method,
            ..LoginScreen::default()
        };
        self.status_message = "Logged out".to_owned();
        self.navigate(Route::Login);
    }

    // --- Voting booth

    /// Refreshes the booth. Skipped while a submission is out, since the
    /// outstanding votes belong to the current booth.
    pub fn load_voting_state(&mut self) {
        let token = match self.voter.token() {
            Ok(token) => token.to_owned(),
            Err(_) => return self.navigate(Route::Login),
        };
        if self.is_busy(Action::SubmitVotes) {
            debug!("Keeping the current booth until the submission settles");
            return;
        }
        self.booth_error.clear();
        self.spawn(Action::LoadVotingState, |client, base_url| async move {
            UiEvent::VotingStateLoaded(fetch_booth(&client, &base_url, &token).await)
        });
    }

    pub fn vote_for(&mut self, contestant: ContestantId) {
        if let Some(booth) = self.booth.as_mut() {
            booth.vote(contestant);
        }
    }

    pub fn submit_votes(&mut self) {
        self.booth_error.clear();
        let Some(booth) = self.booth.as_mut() else {
            return;
        };
        let submission = match booth.begin_submission(&self.voter, &self.flights) {
            Ok(submission) => submission,
            Err(e) => {
                self.status_message = e.to_string();
                return;
            }
        };
        let client = self.client.clone();
        let base_url = self.api_url.clone();
        let sender = self.event_sender.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let outcome = submission.send(&client, &base_url).await;
            if sender.send(UiEvent::VotesSubmitted(outcome)).is_err() {
                warn!("UI is gone, dropping submission result");
            }
            ctx.request_repaint();
        });
    }

    pub fn load_history(&mut self) {
        let token = match self.voter.token() {
            Ok(token) => token.to_owned(),
            Err(_) => return self.navigate(Route::Login),
        };
        self.history_error.clear();
        self.spawn(Action::LoadHistory, |client, base_url| async move {
            UiEvent::HistoryLoaded(vote::get_vote_history(&client, &base_url, &token).await)
        });
    }

    // --- Admin

    pub fn admin_login(&mut self) {
        self.admin_login.error.clear();
        let username = self.admin_login.username.trim().to_owned();
        let password = self.admin_login.password.clone();
        if username.is_empty() || password.is_empty() {
            self.admin_login.error = "Username and password are required.".to_owned();
            return;
        }
        self.spawn(Action::AdminLogin, |client, base_url| async move {
            UiEvent::AdminLoggedIn(auth::admin_login(&client, &base_url, &username, &password).await)
        });
    }

    pub fn admin_logout(&mut self) {
        self.admin.end();
        self.dashboard = DashboardScreen::default();
        self.contestants = ContestantsScreen::default();
        self.voting_lines = VotingLinesScreen::default();
        self.admin_login = AdminLoginScreen::default();
        self.status_message = "Admin logged out".to_owned();
        self.navigate(Route::AdminLogin);
    }

    fn admin_token(&mut self) -> Option<String> {
        match self.admin.token() {
            Ok(token) => Some(token.to_owned()),
            Err(_) => {
                self.navigate(Route::AdminLogin);
                None
            }
        }
    }

    pub fn load_voting_lines(&mut self) {
        let Some(token) = self.admin_token() else {
            return;
        };
        self.spawn(Action::LoadVotingLines, |client, base_url| async move {
            UiEvent::VotingLinesLoaded(
                voting_lines::list_voting_lines(&client, &base_url, &token).await,
            )
        });
    }

    pub fn load_contestants(&mut self) {
        self.spawn(Action::LoadContestants, |client, base_url| async move {
            UiEvent::ContestantsLoaded(contestants::list_contestants(&client, &base_url).await)
        });
    }

    pub fn select_dashboard_line(&mut self, line_id: VotingLineId) {
        self.dashboard.select(line_id);
        self.load_dashboard_stats();
    }

    /// Fetches stats for the selected line. While another line's stats are
    /// in flight this waits for them; their arrival triggers the refetch.
    fn load_dashboard_stats(&mut self) {
        let Some(line_id) = self.dashboard.selected else {
            return;
        };
        if self.is_busy(Action::LoadDashboardStats) {
            debug!("Stats for voting line {} queued behind the current load", line_id);
            return;
        }
        let Some(token) = self.admin_token() else {
            return;
        };
        self.spawn(Action::LoadDashboardStats, |client, base_url| async move {
            let result = admin::get_dashboard_stats(&client, &base_url, &token, line_id).await;
            UiEvent::DashboardStatsLoaded(line_id, result)
        });
    }

    pub fn create_contestant(&mut self) {
        self.contestants.error.clear();
        self.contestants.success.clear();
        let draft = match self.contestants.form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.contestants.error = e.to_string();
                return;
            }
        };
        let Some(token) = self.admin_token() else {
            return;
        };
        self.spawn(Action::CreateContestant, |client, base_url| async move {
            let result = match draft.load().await {
                Ok(contestant) => {
                    contestants::create_contestant(&client, &base_url, &token, contestant).await
                }
                Err(e) => Err(e),
            };
            UiEvent::ContestantCreated(result)
        });
    }

    pub fn create_voting_line(&mut self) {
        self.voting_lines.error.clear();
        let line = match self.voting_lines.form.validate() {
            Ok(line) => line,
            Err(e) => {
                self.voting_lines.error = e.to_string();
                return;
            }
        };
        let Some(token) = self.admin_token() else {
            return;
        };
        self.spawn(Action::CreateVotingLine, |client, base_url| async move {
            UiEvent::VotingLineCreated(
                voting_lines::create_voting_line(&client, &base_url, &token, &line).await,
            )
        });
    }

    pub fn toggle_voting_line(&mut self, line_id: VotingLineId, active: bool) {
        self.voting_lines.error.clear();
        let Some(token) = self.admin_token() else {
            return;
        };
        self.spawn(Action::ToggleVotingLine, |client, base_url| async move {
            UiEvent::VotingLineToggled(
                voting_lines::set_voting_line_active(&client, &base_url, &token, line_id, active)
                    .await,
            )
        });
    }

    // --- Results

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::LoginMethodDetected(method) => {
                info!("Login method: {:?}", method);
                self.login.method = Some(method);
            }
            UiEvent::OtpSent(Ok(())) => {
                self.login.message =
                    "OTP sent successfully! Please check your terminal/email.".to_owned();
                self.login.step = LoginStep::EnterOtp;
            }
            UiEvent::OtpSent(Err(e)) => {
                warn!("Send OTP failed: {}", e);
                self.login.error = "Failed to send OTP. Please try again.".to_owned();
            }
            UiEvent::OtpVerified(Ok(token)) => {
                self.voter.authenticate(token);
                self.login.otp.clear();
                self.login.message = "Login Successful! Redirecting...".to_owned();
                self.status_message = "Logged in".to_owned();
                self.navigate(Route::Voting);
            }
            UiEvent::OtpVerified(Err(e)) => {
                warn!("OTP verification failed: {}", e);
                self.login.error = "Invalid or expired OTP. Please try again.".to_owned();
            }
            UiEvent::AdminLoggedIn(Ok(token)) => {
                self.admin.authenticate(token);
                self.admin_login.password.clear();
                self.status_message = "Admin logged in".to_owned();
                self.navigate(Route::AdminDashboard);
            }
            UiEvent::AdminLoggedIn(Err(e)) => {
                warn!("Admin login failed: {}", e);
                self.admin_login.error = "Invalid username or password.".to_owned();
            }
            UiEvent::VotingStateLoaded(result) => match self.voter.guard(result) {
                Ok(_) if self.booth.as_ref().is_some_and(VotingBooth::is_submitting) => {
                    warn!("Dropping refreshed booth, a submission is still out");
                }
                Ok(booth) => self.booth = Some(booth),
                Err(e) => {
                    self.booth = None;
                    self.on_voter_error(e, Self::voting_state_message);
                }
            },
            UiEvent::VotesSubmitted(outcome) => {
                let Some(booth) = self.booth.as_mut() else {
                    return;
                };
                match booth.finish_submission(&mut self.voter, outcome) {
                    Ok(count) => {
                        self.status_message = format!("{} votes submitted successfully!", count);
                    }
                    Err(e) => self.on_voter_error(e, |_| {
                        "Failed to submit votes. Please try again.".to_owned()
                    }),
                }
            }
            UiEvent::HistoryLoaded(result) => match self.voter.guard(result) {
                Ok(history) => self.history = history,
                Err(e) => self.on_voter_error(e, |_| "Could not fetch vote history.".to_owned()),
            },
            UiEvent::ContestantsLoaded(result) => match result {
                Ok(list) => {
                    self.voting_lines.contestants = list.clone();
                    self.contestants.contestants = list;
                }
                Err(e) => {
                    warn!("Listing contestants failed: {}", e);
                    self.contestants.error = "Failed to fetch contestants.".to_owned();
                    self.voting_lines.error = "Failed to fetch contestants.".to_owned();
                }
            },
            UiEvent::ContestantCreated(result) => match self.admin.guard(result) {
                Ok(_) => {
                    self.contestants.success = "Contestant created successfully!".to_owned();
                    self.contestants.form.reset();
                    self.load_contestants();
                }
                Err(e) => self.on_admin_error(e, |e| match e {
                    ApiError::ValidationFailed(msg) => msg.clone(),
                    _ => "Failed to create contestant.".to_owned(),
                }),
            },
            UiEvent::VotingLinesLoaded(result) => match self.admin.guard(result) {
                Ok(lines) => {
                    let first = lines.first().map(|l| l.id);
                    self.dashboard.lines = lines.clone();
                    self.voting_lines.lines = lines;
                    if self.route == Route::AdminDashboard && self.dashboard.selected.is_none() {
                        if let Some(id) = first {
                            self.select_dashboard_line(id);
                        }
                    }
                }
                Err(e) => self.on_admin_error(e, |_| "Failed to fetch voting lines.".to_owned()),
            },
            UiEvent::VotingLineCreated(result) => match self.admin.guard(result) {
                Ok(line) => {
                    self.status_message = format!("Voting line {} created", line.name);
                    self.voting_lines.form.reset();
                    self.load_voting_lines();
                }
                Err(e) => self.on_admin_error(e, |_| "Failed to create voting line.".to_owned()),
            },
            UiEvent::VotingLineToggled(result) => match self.admin.guard(result) {
                Ok(()) => self.load_voting_lines(),
                Err(e) => {
                    self.on_admin_error(e, |_| "Failed to change voting line status.".to_owned())
                }
            },
            UiEvent::DashboardStatsLoaded(line_id, _) if !self.dashboard.shows(line_id) => {
                debug!("Discarding stats for voting line {}", line_id);
                self.load_dashboard_stats();
            }
            UiEvent::DashboardStatsLoaded(_, result) => match self.admin.guard(result) {
                Ok(stats) => self.dashboard.stats = Some(stats),
                Err(e) => self.on_admin_error(e, |_| {
                    "Failed to fetch stats for this voting line.".to_owned()
                }),
            },
        }
    }

    fn voting_state_message(error: &ApiError) -> String {
        match error {
            ApiError::NotAvailable => "Voting is currently closed. Please check back later.",
            _ => "Voting is unavailable right now. Please try again later.",
        }
        .to_owned()
    }

    /// A voter request failed. A rejected token has already ended the session
    /// and sends the voter back to login; anything else is shown as-is.
    fn on_voter_error(&mut self, error: ApiError, message: impl Fn(&ApiError) -> String) {
        warn!("Voter request failed: {}", error);
        if error.is_unauthorized() || !self.voter.is_authenticated() {
            self.status_message = "Session expired, please log in again.".to_owned();
            self.navigate(Route::Login);
            return;
        }
        let text = message(&error);
        match self.route {
            Route::History => self.history_error = text,
            _ => self.booth_error = text,
        }
    }

    fn on_admin_error(&mut self, error: ApiError, message: impl Fn(&ApiError) -> String) {
        warn!("Admin request failed: {}", error);
        if error.is_unauthorized() || !self.admin.is_authenticated() {
            self.status_message = "Admin session expired, please log in again.".to_owned();
            self.navigate(Route::AdminLogin);
            return;
        }
        let text = message(&error);
        match self.route {
            Route::AdminDashboard => self.dashboard.error = text,
            Route::AdminContestants => self.contestants.error = text,
            _ => self.voting_lines.error = text,
        }
    }
}
