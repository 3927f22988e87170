/// Failure of a tree query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// `min`/`max` was asked of a tree without any values.
    #[error("the tree is empty")]
    EmptyTree,
    /// The requested value is not stored in the tree.
    #[error("value not found in the tree")]
    NotFound,
}
