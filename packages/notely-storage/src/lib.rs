pub mod db;
pub mod local;
pub mod models;
pub mod queries;
pub mod schema;
pub mod store;
pub mod time_serde;

mod error;

pub use error::Error;
pub use store::{BoxFuture, NoteScope, Store};

pub type Result<T, E = Error> = std::result::Result<T, E>;
