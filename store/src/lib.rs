pub mod archive;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod retry;


pub use archive::{ArchiveSink, NoopArchive, SqliteArchive};
pub use config::StoreConfig;
pub use error::StoreError;
pub use models::{ArchivedPlayer, MatchArchive, RoomDocument};
pub use repository::RoomStore;
pub use retry::RetryPolicy;
