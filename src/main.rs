use poise::serenity_prelude as serenity;
use tracing::{error, info};
use triggerbot::store::{prefixes::PrefixStore, triggers::TriggerStore};
use triggerbot::{commands, config::Config, dispatch, Data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::load()?;
    let token = config.token.clone();
    let default_prefix = config.prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::list(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(default_prefix),
                dynamic_prefix: Some(|ctx| {
                    Box::pin(async move {
                        let Some(guild_id) = ctx.guild_id else {
                            return Ok(None);
                        };
                        Ok(Some(
                            ctx.data
                                .prefixes
                                .get(guild_id.get(), &ctx.data.config.prefix),
                        ))
                    })
                }),
                mention_as_prefix: true,
                ..Default::default()
            },
            owners: config
                .owner_ids()
                .iter()
                .copied()
                .map(serenity::UserId::new)
                .collect(),
            on_error: |error| Box::pin(commands::on_error(error)),
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    match event {
                        serenity::FullEvent::Message { new_message } => {
                            // Trigger matching runs for every non-bot message,
                            // independent of command parsing.
                            if !new_message.author.bot {
                                if let Err(e) =
                                    dispatch::handle_message(ctx, new_message, data).await
                                {
                                    error!("Trigger dispatch failed: {e}");
                                }
                            }
                        }
                        serenity::FullEvent::GuildDelete { incomplete, .. } => {
                            // Skip outages; only drop state when actually removed.
                            if !incomplete.unavailable {
                                info!("Left guild {}", incomplete.id);
                                if let Err(e) = data.prefixes.delete(incomplete.id.get()) {
                                    error!(
                                        "Failed to drop prefix for guild {}: {e}",
                                        incomplete.id
                                    );
                                }
                            }
                        }
                        _ => {}
                    }
                    Ok(())
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {} (ID: {})", ready.user.name, ready.user.id);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                ctx.set_activity(Some(serenity::ActivityData::listening(format!(
                    "{}help",
                    config.prefix
                ))));

                let triggers = TriggerStore::open(&config.data_dir)?;
                let prefixes = PrefixStore::open(&config.data_dir)?;
                info!(
                    "Loaded {} trigger(s) across {} guild(s), {} guild prefix(es)",
                    triggers.total(),
                    triggers.guild_count(),
                    prefixes.len()
                );

                Ok(Data {
                    config,
                    triggers,
                    prefixes,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}
