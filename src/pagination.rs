use crate::{Context, Error};
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// How long the page-flip buttons stay live before the message drops to a
/// non-interactive state.
const PAGE_TIMEOUT: Duration = Duration::from_secs(60);

/// Send a sequence of embeds as a single message with ◀/▶ buttons. Only the
/// invoker can flip pages; after [`PAGE_TIMEOUT`] of inactivity the buttons
/// are disabled.
pub async fn paginate(ctx: Context<'_>, pages: Vec<serenity::CreateEmbed>) -> Result<(), Error> {
    if pages.is_empty() {
        return Ok(());
    }
    if pages.len() == 1 {
        let page = pages.into_iter().next().unwrap();
        ctx.send(poise::CreateReply::default().embed(page)).await?;
        return Ok(());
    }

    // Interaction ids are namespaced by the invocation so concurrent
    // paginators don't capture each other's presses.
    let ctx_id = ctx.id();
    let prev_id = format!("{ctx_id}prev");
    let next_id = format!("{ctx_id}next");

    let buttons = |disabled: bool| {
        serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&prev_id)
                .emoji('◀')
                .style(serenity::ButtonStyle::Primary)
                .disabled(disabled),
            serenity::CreateButton::new(&next_id)
                .emoji('▶')
                .style(serenity::ButtonStyle::Primary)
                .disabled(disabled),
        ])
    };

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(pages[0].clone())
                .components(vec![buttons(false)]),
        )
        .await?;

    let author_id = ctx.author().id;
    let mut current = 0usize;
    while let Some(press) = serenity::ComponentInteractionCollector::new(ctx)
        .filter(move |press| press.data.custom_id.starts_with(&ctx_id.to_string()))
        .timeout(PAGE_TIMEOUT)
        .await
    {
        if press.user.id != author_id {
            press
                .create_response(
                    ctx.serenity_context(),
                    serenity::CreateInteractionResponse::Acknowledge,
                )
                .await?;
            continue;
        }

        if press.data.custom_id == next_id {
            current = (current + 1).min(pages.len() - 1);
        } else if press.data.custom_id == prev_id {
            current = current.saturating_sub(1);
        } else {
            continue;
        }

        press
            .create_response(
                ctx.serenity_context(),
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(pages[current].clone()),
                ),
            )
            .await?;
    }

    // Timed out. Leave the current page up without controls.
    reply
        .edit(
            ctx,
            poise::CreateReply::default()
                .embed(pages[current].clone())
                .components(vec![buttons(true)]),
        )
        .await?;

    Ok(())
}
