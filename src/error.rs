use thiserror::Error;

pub type Result<T> = std::result::Result<T, SettlementError>;

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),
    #[error("unsupported settlement mode: {0}")]
    UnsupportedSettlementMode(String),
    #[error("amount overflow while computing {0}")]
    AmountOverflow(&'static str),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}
