use std::fmt;

/// The closed set of codes returned to the point of sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    /// "00"
    Approved,
    /// "51"
    InsufficientFunds,
    /// "07"
    Error,
}

impl ResponseCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "00",
            Self::InsufficientFunds => "51",
            Self::Error => "07",
        }
    }

    /// Renders the payload forwarded verbatim by the transport, e.g. `{"code": "00"}`.
    pub fn to_payload(&self) -> String {
        format!("{{\"code\": \"{}\"}}", self.as_str())
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclineReason {
    InsufficientFunds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// No balance record exists for the resolved category.
    NotFound,
    /// The deadline elapsed before the unit of work completed.
    Timeout,
    /// Any other fault: store errors, resolver errors, panics.
    Fault,
}

/// Internal result of one authorization, kept richer than the wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Approved,
    Declined(DeclineReason),
    Failed(FailureReason),
}

impl AuthorizationOutcome {
    pub fn code(&self) -> ResponseCode {
        match self {
            Self::Approved => ResponseCode::Approved,
            Self::Declined(DeclineReason::InsufficientFunds) => ResponseCode::InsufficientFunds,
            Self::Failed(_) => ResponseCode::Error,
        }
    }
}

impl From<AuthorizationOutcome> for ResponseCode {
    fn from(outcome: AuthorizationOutcome) -> Self {
        outcome.code()
    }
}
