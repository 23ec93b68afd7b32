use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum PoolError {
    #[error("pool is full")]
    Full,
}

pub(crate) const DEFAULT_CAPACITY: usize = 4096;
