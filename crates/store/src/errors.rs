use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Request(String),

    #[error("malformed item: {0}")]
    Codec(String),

    #[error("missing attribute `{field}` on {partition} record")]
    MissingAttribute {
        partition: &'static str,
        field: &'static str,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
