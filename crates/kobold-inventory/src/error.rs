//! Inventory error types.

/// Errors raised while resolving, saving, loading or replicating equipment.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// An id that the equipment database does not define.
    #[error("unknown equipment id {0}")]
    UnknownEquipment(i16),

    /// Two database entries share an id.
    #[error("duplicate equipment id {0} in database")]
    DuplicateEquipmentId(i16),

    /// A save file declared a negative item count.
    #[error("negative equipment count {0}")]
    NegativeCount(i32),

    /// More items than the replication format can carry.
    #[error("{0} items exceed the replication limit")]
    TooMany(usize),

    /// Reading or writing a save stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Postcard encoding or decoding of a snapshot failed.
    #[error("snapshot encoding error: {0}")]
    Postcard(#[from] postcard::Error),

    /// The equipment database file could not be parsed.
    #[error("failed to parse equipment database: {0}")]
    Database(#[from] ron::error::SpannedError),
}
