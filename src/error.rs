use crate::buffer::AllocError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShadowError {
    #[error("failed to allocate shadow buffer: {0}")]
    Allocation(#[from] AllocError),
}
