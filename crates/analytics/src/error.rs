use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid evaluation policy: {0}")]
    Policy(#[from] risk::RiskError),

    #[error("The {quantity} of {date} is out of range for the given goal and amounts")]
    OutOfRange {
        date: NaiveDate,
        quantity: &'static str,
    },

    #[error("The period's {0} is out of range")]
    TotalOutOfRange(&'static str),
}
