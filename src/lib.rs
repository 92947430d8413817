pub mod auth;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod pagination;
pub mod store;

/// Custom data passed to all commands
pub struct Data {
    pub config: config::Config,
    pub triggers: store::triggers::TriggerStore,
    pub prefixes: store::prefixes::PrefixStore,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
