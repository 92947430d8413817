use crate::commands::{send_embed, BLUE, GREEN, RED};
use crate::store::StoreError;
use crate::{auth, Context, Error};

/// Show or change this server's command prefix
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn serverprefix(
    ctx: Context<'_>,
    #[description = "New prefix for this server (5 characters max)"] new_prefix: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;

    // Without an argument this is a read-only lookup anyone may run.
    let Some(new_prefix) = new_prefix else {
        let current = ctx
            .data()
            .prefixes
            .get(guild_id.get(), &ctx.data().config.prefix);
        send_embed(
            ctx,
            "Server Prefix",
            &format!("The current prefix for this server is: `{current}`"),
            BLUE,
        )
        .await?;
        return Ok(());
    };

    if !auth::check(&ctx, auth::Tier::Manager).await {
        ctx.say("❌ You need the Manage Server permission to change the server prefix.")
            .await?;
        return Ok(());
    }

    match ctx.data().prefixes.set(guild_id.get(), &new_prefix) {
        Ok(()) => {
            send_embed(
                ctx,
                "Prefix Updated",
                &format!("The server prefix has been updated to: `{new_prefix}`"),
                GREEN,
            )
            .await?;
        }
        Err(StoreError::PrefixTooLong) => {
            send_embed(
                ctx,
                "Error",
                "The prefix cannot be longer than 5 characters.",
                RED,
            )
            .await?;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
