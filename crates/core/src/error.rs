use thiserror::Error;

#[derive(Error, Debug)]
pub enum BurnerError {
    /// A replacement board document was rejected before touching the store.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
