use indexmap::IndexMap;
pub use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    types::Json,
    ConnectOptions,
    PgConnection,
    PgPool,
};

pub mod action_log;
pub mod conference;
pub mod conference_speaker;
pub mod meeting;
pub mod migrations;
pub mod organization;
pub mod participatory_space_link;
pub mod user;

/// Localized text as stored in `jsonb` columns: locale → value.
pub type Translations = IndexMap<String, String>;
