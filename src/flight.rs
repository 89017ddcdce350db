use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::error::ApiError;

/// User-triggered request kinds. At most one of each may be outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    DetectLocation,
    SendOtp,
    VerifyOtp,
    AdminLogin,
    LoadVotingState,
    SubmitVotes,
    LoadHistory,
    LoadContestants,
    CreateContestant,
    LoadVotingLines,
    CreateVotingLine,
    ToggleVotingLine,
    LoadDashboardStats,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::DetectLocation => "Location lookup",
            Action::SendOtp => "Sending OTP",
            Action::VerifyOtp => "OTP verification",
            Action::AdminLogin => "Admin login",
            Action::LoadVotingState => "Loading the voting booth",
            Action::SubmitVotes => "Vote submission",
            Action::LoadHistory => "Loading vote history",
            Action::LoadContestants => "Loading contestants",
            Action::CreateContestant => "Creating a contestant",
            Action::LoadVotingLines => "Loading voting lines",
            Action::CreateVotingLine => "Creating a voting line",
            Action::ToggleVotingLine => "Changing voting line status",
            Action::LoadDashboardStats => "Loading dashboard stats",
        };
        f.write_str(name)
    }
}

/// Tracks which actions currently have a request outstanding.
#[derive(Clone, Default)]
pub struct SingleFlight {
    inflight: Arc<Mutex<HashSet<Action>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `action`, or fails with [`ApiError::Busy`] if it is already claimed.
    /// The claim is released when the returned guard drops.
    pub fn begin(&self, action: Action) -> Result<FlightGuard, ApiError> {
        let mut inflight = lock(&self.inflight);
        if !inflight.insert(action) {
            warn!("Rejected duplicate request: {}", action);
            return Err(ApiError::Busy(action));
        }
        debug!("Request started: {}", action);
        Ok(FlightGuard {
            action,
            inflight: Arc::clone(&self.inflight),
        })
    }

    pub fn is_in_flight(&self, action: Action) -> bool {
        lock(&self.inflight).contains(&action)
    }
}

pub struct FlightGuard {
    action: Action,
    inflight: Arc<Mutex<HashSet<Action>>>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        lock(&self.inflight).remove(&self.action);
        debug!("Request finished: {}", self.action);
    }
}

fn lock(set: &Mutex<HashSet<Action>>) -> MutexGuard<'_, HashSet<Action>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}
