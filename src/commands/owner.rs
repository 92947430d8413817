use crate::{auth, Context, Error};
use chrono::Utc;
use std::fs;
use tracing::info;

/// Reload the trigger and prefix stores from disk (Owner only)
#[poise::command(
    slash_command,
    prefix_command,
    check = "auth::owner_check",
    hide_in_help
)]
pub async fn reload(ctx: Context<'_>) -> Result<(), Error> {
    ctx.data().triggers.reload()?;
    ctx.data().prefixes.reload()?;

    let triggers = &ctx.data().triggers;
    info!("Stores reloaded by owner {}", ctx.author().id);
    ctx.say(format!(
        "🔄 Reloaded stores: {} trigger(s) across {} guild(s), {} guild prefix(es).",
        triggers.total(),
        triggers.guild_count(),
        ctx.data().prefixes.len()
    ))
    .await?;
    Ok(())
}

/// Copy the data files into a timestamped backup directory (Owner only)
#[poise::command(
    slash_command,
    prefix_command,
    check = "auth::owner_check",
    hide_in_help
)]
pub async fn backup(ctx: Context<'_>) -> Result<(), Error> {
    let backup_dir = ctx
        .data()
        .config
        .data_dir
        .join("backups")
        .join(format!("backup-{}", Utc::now().format("%Y%m%d-%H%M%S")));
    fs::create_dir_all(&backup_dir)?;

    let mut copied = 0;
    for source in [ctx.data().triggers.path(), ctx.data().prefixes.path()] {
        if source.exists() {
            let Some(file_name) = source.file_name() else {
                continue;
            };
            fs::copy(source, backup_dir.join(file_name))?;
            copied += 1;
        }
    }

    info!(
        "Backed up {} data file(s) to {}",
        copied,
        backup_dir.display()
    );
    ctx.say(format!(
        "💾 Backed up {copied} data file(s) to `{}`.",
        backup_dir.display()
    ))
    .await?;
    Ok(())
}

/// Shut down the bot (Owner only)
#[poise::command(
    slash_command,
    prefix_command,
    check = "auth::owner_check",
    hide_in_help
)]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), Error> {
    info!("Shutdown command received from owner {}", ctx.author().id);
    ctx.say("👋 Shutting down...").await?;
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}
