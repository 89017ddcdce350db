use crate::session::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Voting,
    History,
    AdminLogin,
    AdminDashboard,
    AdminContestants,
    AdminVotingLines,
}

impl Route {
    pub const ADMIN_NAV: [Route; 3] = [
        Route::AdminDashboard,
        Route::AdminContestants,
        Route::AdminVotingLines,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login to Vote",
            Route::Voting => "Voting Booth",
            Route::History => "My Vote History",
            Route::AdminLogin => "Admin Login",
            Route::AdminDashboard => "Dashboard",
            Route::AdminContestants => "Contestants",
            Route::AdminVotingLines => "Voting Lines",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Route::AdminLogin
                | Route::AdminDashboard
                | Route::AdminContestants
                | Route::AdminVotingLines
        )
    }

    /// The screen actually shown for `self` given the current sessions.
    pub fn resolve(self, voter: &SessionContext, admin: &SessionContext) -> Route {
        match self {
            Route::Voting | Route::History if !voter.is_authenticated() => Route::Login,
            Route::Login if voter.is_authenticated() => Route::Voting,
            Route::AdminDashboard | Route::AdminContestants | Route::AdminVotingLines
                if !admin.is_authenticated() =>
            {
                Route::AdminLogin
            }
            Route::AdminLogin if admin.is_authenticated() => Route::AdminDashboard,
            other => other,
        }
    }
}
