use crate::commands::{embed, send_embed, BLUE, GREEN, ORANGE, RED};
use crate::dispatch::is_image_url;
use crate::pagination::paginate;
use crate::store::triggers::TriggerRecord;
use crate::{auth, Context, Error};
use chrono::Utc;
use poise::serenity_prelude as serenity;
use tracing::info;

const TRIGGERS_PER_PAGE: usize = 25;
const RESPONSE_PREVIEW_CHARS: usize = 50;

/// Manage message triggers
#[poise::command(
    slash_command,
    prefix_command,
    subcommands("create", "delete", "get", "list"),
    guild_only
)]
pub async fn trigger(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;
    let prefix = ctx
        .data()
        .prefixes
        .get(guild_id.get(), &ctx.data().config.prefix);

    let usage = embed("Trigger Commands", "Create and manage auto-responses.", BLUE).field(
        "Available Commands",
        format!(
            "`{prefix}trigger create <name> [response]` - Create a new trigger\n\
             `{prefix}trigger delete <name>` - Delete a trigger\n\
             `{prefix}trigger get <name>` - Get information about a trigger\n\
             `{prefix}trigger list` - List all triggers"
        ),
        false,
    );
    ctx.send(poise::CreateReply::default().embed(usage)).await?;
    Ok(())
}

/// Create a new trigger
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    check = "auth::manager_check"
)]
pub async fn create(
    ctx: Context<'_>,
    #[description = "Name to match in messages"] name: String,
    #[description = "Attachment whose URL becomes the response"] attachment: Option<
        serenity::Attachment,
    >,
    #[description = "Response text or media URL"]
    #[rest]
    response: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;

    let name = name.trim().to_string();
    if name.is_empty() {
        send_embed(ctx, "Error", "Trigger name cannot be empty.", RED).await?;
        return Ok(());
    }

    let response = response
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    let response = match (response, attachment) {
        (Some(text), _) => text,
        (None, Some(attachment)) => attachment.url,
        (None, None) => {
            send_embed(
                ctx,
                "Error",
                "You must provide a response text or attachment.",
                RED,
            )
            .await?;
            return Ok(());
        }
    };

    let record = TriggerRecord {
        response,
        creator_id: ctx.author().id.get(),
        created_at: Utc::now(),
    };
    if ctx.data().triggers.add(guild_id.get(), &name, record)? {
        info!(
            "Trigger '{}' created in guild {} by {}",
            name,
            guild_id,
            ctx.author().id
        );
        send_embed(
            ctx,
            "Trigger Created",
            &format!("Trigger '{name}' has been created successfully."),
            GREEN,
        )
        .await?;
    } else {
        send_embed(
            ctx,
            "Error",
            &format!("Trigger '{name}' already exists."),
            RED,
        )
        .await?;
    }
    Ok(())
}

/// Delete a trigger
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    check = "auth::manager_check"
)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Name of the trigger to delete"]
    #[rest]
    name: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;

    if ctx.data().triggers.delete(guild_id.get(), &name)? {
        send_embed(
            ctx,
            "Trigger Deleted",
            &format!("Trigger '{name}' has been deleted successfully."),
            GREEN,
        )
        .await?;
    } else {
        send_embed(ctx, "Error", &format!("Trigger '{name}' not found."), RED).await?;
    }
    Ok(())
}

/// Get information about a trigger
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn get(
    ctx: Context<'_>,
    #[description = "Name of the trigger to look up"]
    #[rest]
    name: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;

    let Some(record) = ctx.data().triggers.get(guild_id.get(), &name) else {
        send_embed(
            ctx,
            "Trigger Not Found",
            &format!("Trigger '{name}' not found."),
            RED,
        )
        .await?;
        return Ok(());
    };

    let mut detail = serenity::CreateEmbed::new()
        .title(format!("Trigger: {name}"))
        .color(BLUE);
    if is_image_url(&record.response) {
        detail = detail
            .image(&record.response)
            .field("Response", format!("[Image]({})", record.response), false);
    } else {
        detail = detail.field("Response", record.response.clone(), false);
    }
    detail = detail
        .field("Created By", format!("<@{}>", record.creator_id), true)
        .field(
            "Created At",
            record.created_at.format("%Y-%m-%d").to_string(),
            true,
        );

    ctx.send(poise::CreateReply::default().embed(detail)).await?;
    Ok(())
}

/// List all triggers
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("Must be run in a guild")?;

    let triggers = ctx.data().triggers.list(guild_id.get());
    if triggers.is_empty() {
        send_embed(ctx, "No Triggers", "This server has no triggers.", ORANGE).await?;
        return Ok(());
    }

    let guild_name = ctx
        .guild()
        .map(|guild| guild.name.clone())
        .unwrap_or_else(|| "this server".to_string());
    let total = triggers.len();
    let page_count = total.div_ceil(TRIGGERS_PER_PAGE);

    let pages: Vec<serenity::CreateEmbed> = triggers
        .chunks(TRIGGERS_PER_PAGE)
        .enumerate()
        .map(|(index, chunk)| {
            let title = if page_count > 1 {
                format!(
                    "Triggers in {guild_name} (Page {}/{page_count})",
                    index + 1
                )
            } else {
                format!("Triggers in {guild_name}")
            };
            let mut page = serenity::CreateEmbed::new()
                .title(title)
                .description(format!("Total triggers: {total}"))
                .color(BLUE);
            for (name, record) in chunk {
                page = page.field(name.clone(), response_preview(&record.response), true);
            }
            page
        })
        .collect();

    paginate(ctx, pages).await
}

fn response_preview(response: &str) -> String {
    if is_image_url(response) {
        return "[Image]".to_string();
    }
    let mut preview: String = response.chars().take(RESPONSE_PREVIEW_CHARS).collect();
    if response.chars().count() > RESPONSE_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_long_responses() {
        let long = "a".repeat(60);
        let preview = response_preview(&long);
        assert_eq!(preview.chars().count(), RESPONSE_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));

        assert_eq!(response_preview("short"), "short");
    }

    #[test]
    fn preview_masks_image_urls() {
        assert_eq!(
            response_preview("https://cdn.example.com/cat.png"),
            "[Image]"
        );
    }
}
