use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid date: {input}")]
    InvalidDate {
        input: String,
    },

    #[error("invalid amount: {input}")]
    InvalidAmount {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("invalid interest rate: {input}")]
    InvalidRate {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("interest rate out of range: {rate}")]
    RateOutOfRange {
        rate: Rate,
    },

    #[error("invalid principal: {amount}")]
    InvalidPrincipal {
        amount: Money,
    },

    #[error("missing loan term: {field}")]
    MissingTerm {
        field: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
