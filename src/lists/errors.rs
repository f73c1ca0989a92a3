use thiserror::Error;

/// Validation failures of State Container operations.
/// The store is left unchanged whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Cannot delete the last remaining list")]
    LastList,
    #[error("List not found: {0}")]
    ListNotFound(String),
}

/// Errors from exporting or importing a snapshot document.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Invalid file format: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid file format: missing \"lists\" object")]
    MissingLists,
    #[error("Invalid file format: \"lists\" contains no lists")]
    EmptyLists,
    #[error("Invalid list entry: {0}")]
    InvalidList(serde_json::Error),
    #[error("Failed to serialize export: {0}")]
    Serialize(serde_json::Error),
}
