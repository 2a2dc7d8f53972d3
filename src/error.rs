// Error conditions surfaced to the routing layer

use thiserror::Error;

/// Things an operation can refer to that might not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    CartEntry,
    Item,
    ParentItem,
    User,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::CartEntry => write!(f, "cart entry"),
            Entity::Item => write!(f, "item"),
            Entity::ParentItem => write!(f, "parent item"),
            Entity::User => write!(f, "user"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ShopError {
    /// Backing file missing or undecodable. Distinct from an empty collection.
    #[error("Collection '{collection}' is unavailable: {reason}")]
    StoreUnavailable { collection: String, reason: String },

    #[error("Missing or invalid parameter: {0}")]
    MissingParameter(&'static str),

    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Condition tag, without context, for mapping to a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StoreUnavailable,
    MissingParameter,
    NotFound,
    InvalidState,
    Internal,
}

impl ShopError {
    pub fn not_found(entity: Entity, id: impl ToString) -> Self {
        ShopError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            ShopError::MissingParameter(_) => ErrorKind::MissingParameter,
            ShopError::NotFound { .. } => ErrorKind::NotFound,
            ShopError::InvalidState(_) => ErrorKind::InvalidState,
            ShopError::InvalidCollection(_) | ShopError::Io(_) | ShopError::Serialization(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShopError>;

/// Reject a zero identifier before it reaches a collection
pub(crate) fn require_id(value: u64, name: &'static str) -> Result<u64> {
    if value == 0 {
        return Err(ShopError::MissingParameter(name));
    }
    Ok(value)
}
