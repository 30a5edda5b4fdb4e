use std::fmt;

/// One stage in the lifecycle of a per-account scrape run.
///
/// Stages the dashboard does not know about yet arrive as [`ScrapingStatus::Unknown`]
/// and carry their raw wire name, so a newer backend never breaks the UI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScrapingStatus {
    Pending,
    AcquiringPermit,
    LoginStarted,
    LoginSuccess,
    LoginFailed,
    ScrapingStarted,
    ScrapingBankStarted,
    ScrapingCcStarted,
    ScrapingSuccess,
    ScrapingFailed,
    LogoutStarted,
    LogoutSuccess,
    LogoutFailed,
    Completed,
    Error,
    Unknown(String),
}

/// Coarse classification used for the progress icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusClass {
    #[default]
    Loading,
    Success,
    Error,
}

impl ScrapingStatus {
    /// Every known stage, in lifecycle order.
    pub const KNOWN: [ScrapingStatus; 15] = [
        ScrapingStatus::Pending,
        ScrapingStatus::AcquiringPermit,
        ScrapingStatus::LoginStarted,
        ScrapingStatus::LoginSuccess,
        ScrapingStatus::LoginFailed,
        ScrapingStatus::ScrapingStarted,
        ScrapingStatus::ScrapingBankStarted,
        ScrapingStatus::ScrapingCcStarted,
        ScrapingStatus::ScrapingSuccess,
        ScrapingStatus::ScrapingFailed,
        ScrapingStatus::LogoutStarted,
        ScrapingStatus::LogoutSuccess,
        ScrapingStatus::LogoutFailed,
        ScrapingStatus::Completed,
        ScrapingStatus::Error,
    ];

    /// Parses a wire name such as `"LOGIN_STARTED"`. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "PENDING" => Self::Pending,
            "ACQUIRING_PERMIT" => Self::AcquiringPermit,
            "LOGIN_STARTED" => Self::LoginStarted,
            "LOGIN_SUCCESS" => Self::LoginSuccess,
            "LOGIN_FAILED" => Self::LoginFailed,
            "SCRAPING_STARTED" => Self::ScrapingStarted,
            "SCRAPING_BANK_STARTED" => Self::ScrapingBankStarted,
            "SCRAPING_CC_STARTED" => Self::ScrapingCcStarted,
            "SCRAPING_SUCCESS" => Self::ScrapingSuccess,
            "SCRAPING_FAILED" => Self::ScrapingFailed,
            "LOGOUT_STARTED" => Self::LogoutStarted,
            "LOGOUT_SUCCESS" => Self::LogoutSuccess,
            "LOGOUT_FAILED" => Self::LogoutFailed,
            "COMPLETED" => Self::Completed,
            "ERROR" => Self::Error,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire name of the stage.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::AcquiringPermit => "ACQUIRING_PERMIT",
            Self::LoginStarted => "LOGIN_STARTED",
            Self::LoginSuccess => "LOGIN_SUCCESS",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::ScrapingStarted => "SCRAPING_STARTED",
            Self::ScrapingBankStarted => "SCRAPING_BANK_STARTED",
            Self::ScrapingCcStarted => "SCRAPING_CC_STARTED",
            Self::ScrapingSuccess => "SCRAPING_SUCCESS",
            Self::ScrapingFailed => "SCRAPING_FAILED",
            Self::LogoutStarted => "LOGOUT_STARTED",
            Self::LogoutSuccess => "LOGOUT_SUCCESS",
            Self::LogoutFailed => "LOGOUT_FAILED",
            Self::Completed => "COMPLETED",
            Self::Error => "ERROR",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    /// Human readable badge text. Unknown stages echo their raw name.
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::AcquiringPermit => "Waiting for a free slot",
            Self::LoginStarted => "Logging in",
            Self::LoginSuccess => "Logged in",
            Self::LoginFailed => "Login failed",
            Self::ScrapingStarted => "Scraping started",
            Self::ScrapingBankStarted => "Scraping bank transactions",
            Self::ScrapingCcStarted => "Scraping credit card transactions",
            Self::ScrapingSuccess => "Scraping finished",
            Self::ScrapingFailed => "Scraping failed",
            Self::LogoutStarted => "Logging out",
            Self::LogoutSuccess => "Logged out",
            Self::LogoutFailed => "Logout failed",
            Self::Completed => "Completed",
            Self::Error => "Error",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn class(&self) -> StatusClass {
        match self {
            Self::LoginFailed | Self::ScrapingFailed | Self::LogoutFailed | Self::Error => {
                StatusClass::Error
            }
            Self::Completed => StatusClass::Success,
            Self::Pending
            | Self::AcquiringPermit
            | Self::LoginStarted
            | Self::LoginSuccess
            | Self::ScrapingStarted
            | Self::ScrapingBankStarted
            | Self::ScrapingCcStarted
            | Self::ScrapingSuccess
            | Self::LogoutStarted
            | Self::LogoutSuccess
            | Self::Unknown(_) => StatusClass::Loading,
        }
    }

    pub fn is_error(&self) -> bool {
        self.class() == StatusClass::Error
    }
}

/// Classifies an optional stage; an absent stage is still loading.
pub fn classify(status: Option<&ScrapingStatus>) -> StatusClass {
    status.map(ScrapingStatus::class).unwrap_or_default()
}

impl fmt::Display for ScrapingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
