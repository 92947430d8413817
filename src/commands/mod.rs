pub mod help;
pub mod owner;
pub mod prefix;
pub mod trigger;

use crate::{Data, Error};
use tracing::{debug, error};

// Embed accent colors, matching the Discord palette.
pub(crate) const BLUE: u32 = 0x5865F2;
pub(crate) const GREEN: u32 = 0x57F287;
pub(crate) const RED: u32 = 0xED4245;
pub(crate) const ORANGE: u32 = 0xE67E22;

/// Every command registered with the framework.
pub fn list() -> Vec<poise::Command<Data, Error>> {
    vec![
        trigger::trigger(),
        prefix::serverprefix(),
        help::help(),
        owner::reload(),
        owner::backup(),
        owner::shutdown(),
    ]
}

pub(crate) fn embed(title: &str, description: &str, color: u32) -> poise::serenity_prelude::CreateEmbed {
    poise::serenity_prelude::CreateEmbed::new()
        .title(title.to_string())
        .description(description.to_string())
        .color(color)
}

pub(crate) async fn send_embed(
    ctx: crate::Context<'_>,
    title: &str,
    description: &str,
    color: u32,
) -> Result<(), Error> {
    ctx.send(poise::CreateReply::default().embed(embed(title, description, color)))
        .await?;
    Ok(())
}

/// Framework-level error handler. Input errors get a formatted reply;
/// anything unexpected is logged and answered with a generic message, and the
/// process keeps running.
pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command '{}' failed: {}",
                ctx.command().qualified_name,
                error
            );
            let _ = ctx
                .say("❌ An error occurred while running this command.")
                .await;
        }
        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            let input = input.unwrap_or_default();
            let _ = ctx.say(format!("❌ Bad argument `{input}`: {error}")).await;
        }
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            // The check already told the invoker why.
            debug!(
                "Check denied '{}' for {}",
                ctx.command().qualified_name,
                ctx.author().id
            );
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}
