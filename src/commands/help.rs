use crate::commands::{embed, BLUE, GREEN, ORANGE};
use crate::pagination::paginate;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Show help for bot commands
#[poise::command(slash_command, prefix_command)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Command to get help for"]
    #[rest]
    command: Option<String>,
) -> Result<(), Error> {
    let prefix = match ctx.guild_id() {
        Some(guild_id) => ctx
            .data()
            .prefixes
            .get(guild_id.get(), &ctx.data().config.prefix),
        None => ctx.data().config.prefix.clone(),
    };

    if let Some(command) = command {
        return command_help(ctx, &command).await;
    }

    let user = ctx.author().name.clone();
    let pages = vec![
        overview_page(&prefix, &user),
        trigger_page(&prefix, &user),
        server_page(&prefix, &user),
    ];
    paginate(ctx, pages).await
}

/// Detail view for a single command, looked up in the framework's registry.
async fn command_help(ctx: Context<'_>, name: &str) -> Result<(), Error> {
    let lookup = name.trim().trim_start_matches(&ctx.data().config.prefix);
    let commands = &ctx.framework().options().commands;
    let Some(command) = commands
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(lookup))
    else {
        ctx.say(format!("No command called `{lookup}` found.")).await?;
        return Ok(());
    };

    let description = command
        .description
        .clone()
        .unwrap_or_else(|| "No description available.".to_string());
    let mut detail = embed(&format!("Help: {}", command.name), &description, BLUE);
    if !command.subcommands.is_empty() {
        let subcommands = command
            .subcommands
            .iter()
            .map(|sub| format!("`{}`", sub.name))
            .collect::<Vec<_>>()
            .join(", ");
        detail = detail.field("Subcommands", subcommands, false);
    }

    ctx.send(poise::CreateReply::default().embed(detail)).await?;
    Ok(())
}

fn overview_page(prefix: &str, user: &str) -> serenity::CreateEmbed {
    embed(
        "Trigger Bot Help",
        "Welcome to the Trigger Bot! Here's an overview of available commands.",
        BLUE,
    )
    .field(
        "Command Categories",
        format!(
            "• **Trigger Commands** - Create and manage triggers\n\
             • **Server Commands** - Manage server-specific settings\n\n\
             Use `{prefix}help <command>` for more details on a command."
        ),
        false,
    )
    .footer(serenity::CreateEmbedFooter::new(format!(
        "Page 1 of 3 • Requested by {user}"
    )))
}

fn trigger_page(prefix: &str, user: &str) -> serenity::CreateEmbed {
    embed("Trigger Commands", "Commands to create and manage triggers", GREEN)
        .field(
            format!("{prefix}trigger create <name> [response]"),
            "Create a new trigger with text content and/or an attachment\n(Requires: Manage Server)",
            false,
        )
        .field(
            format!("{prefix}trigger delete <name>"),
            "Delete a trigger\n(Requires: Manage Server)",
            false,
        )
        .field(
            format!("{prefix}trigger get <name>"),
            "Get information about a specific trigger",
            false,
        )
        .field(
            format!("{prefix}trigger list"),
            "List all triggers with pagination",
            false,
        )
        .field(
            "Automatic Triggering",
            "Just type a trigger name in any message and the bot will respond with the trigger content!",
            false,
        )
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Page 2 of 3 • Requested by {user}"
        )))
}

fn server_page(prefix: &str, user: &str) -> serenity::CreateEmbed {
    embed(
        "Server Commands",
        "Commands to manage server-specific settings",
        ORANGE,
    )
    .field(
        format!("{prefix}serverprefix"),
        "Show the current server prefix",
        false,
    )
    .field(
        format!("{prefix}serverprefix <new_prefix>"),
        "Change the server prefix (5 characters max)\n(Requires: Manage Server)",
        false,
    )
    .field(
        format!("{prefix}help"),
        "Show this help message",
        false,
    )
    .footer(serenity::CreateEmbedFooter::new(format!(
        "Page 3 of 3 • Requested by {user}"
    )))
}
