use crate::actor::ActorId;
use crate::item::ItemId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when reading or writing records.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested actor ID does not exist in the store.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// No actor with the given name exists in the store.
    #[error("no actor named \"{0}\"")]
    UnknownActor(String),

    /// An actor with the same name already exists.
    #[error("actor already exists: \"{0}\"")]
    DuplicateName(String),

    /// The requested item is not owned by the actor.
    #[error("item {item} not found on actor {actor}")]
    ItemNotFound {
        /// The actor whose inventory was searched.
        actor: ActorId,
        /// The missing item.
        item: ItemId,
    },

    /// A record failed validation before being written.
    #[error("validation error: {0}")]
    Validation(String),
}
