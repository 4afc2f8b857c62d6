mod cache;
mod fetch;
mod io;
mod policy;

pub use cache::CacheError;
pub use fetch::FetchError;
pub use io::IoError;
pub use policy::PolicyError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

pub type Result<T> = std::result::Result<T, Error>;
