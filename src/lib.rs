//! Root crate facade for the ShareNotes paste service.

pub use sharenotes_core::{
    base62, snowflake, token, IssuedToken, SnowflakeError, SnowflakeGenerator, TokenGenerator,
};
pub use sharenotes_server::{
    config, create_app, error, handlers, models, resolve_bind_address, run_sweep, schema,
    serve_router, spawn_expiry_sweeper, storage, AppError, AppState, Config, PasteStorage,
    StorageKind, StoredPaste, DEFAULT_PORT,
};
