use crate::{Data, Error};
use poise::serenity_prelude as serenity;
use tracing::debug;

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Scan the guild's triggers against an inbound message and send the first
/// match's response. Runs for every message, independent of command parsing;
/// at most one trigger response is sent.
pub async fn handle_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };
    let Some((name, record)) = data.triggers.find_match(guild_id.get(), &message.content) else {
        return Ok(());
    };

    debug!(
        "Trigger '{}' matched message {} in guild {}",
        name, message.id, guild_id
    );

    if is_image_url(&record.response) {
        let embed = serenity::CreateEmbed::new()
            .image(&record.response)
            .color(0x5865F2);
        message
            .channel_id
            .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
            .await?;
    } else {
        message.channel_id.say(&ctx.http, &record.response).await?;
    }

    Ok(())
}

/// A response is rendered as an image when it is an http(s) URL ending in a
/// known image extension.
pub fn is_image_url(response: &str) -> bool {
    let lower = response.to_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://"))
        && IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_urls_are_detected_by_extension() {
        assert!(is_image_url("https://cdn.example.com/cat.png"));
        assert!(is_image_url("http://example.com/photo.JPEG"));
        assert!(is_image_url("https://example.com/loop.gif"));
        assert!(is_image_url("https://example.com/pic.webp"));
    }

    #[test]
    fn plain_text_and_other_urls_are_not_images() {
        assert!(!is_image_url("hello there"));
        assert!(!is_image_url("https://example.com/page.html"));
        assert!(!is_image_url("https://example.com/cat.png?size=large"));
        // Extension without a URL scheme is just text.
        assert!(!is_image_url("cat.png"));
    }
}
