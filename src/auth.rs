use crate::config::Config;
use crate::{Context, Error};

/// Authorization tiers for administrative commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// Bot owner(s) listed in the config file.
    Owner,
    /// Owner, or a member holding Manage Server in the guild.
    Manager,
}

/// The authorization predicate. Every permission-gated command funnels
/// through here rather than re-checking permissions inline.
pub fn allowed(config: &Config, tier: Tier, user_id: u64, has_manage_guild: bool) -> bool {
    if config.is_owner(user_id) {
        return true;
    }
    matches!(tier, Tier::Manager) && has_manage_guild
}

pub async fn check(ctx: &Context<'_>, tier: Tier) -> bool {
    let has_manage_guild = match tier {
        Tier::Owner => false,
        Tier::Manager => manage_guild_permission(ctx).await,
    };
    allowed(&ctx.data().config, tier, ctx.author().id.get(), has_manage_guild)
}

async fn manage_guild_permission(ctx: &Context<'_>) -> bool {
    let Some(member) = ctx.author_member().await else {
        return false;
    };
    let Some(guild) = ctx.guild() else {
        return false;
    };
    guild.member_permissions(member.as_ref()).manage_guild()
}

/// Poise check for manager-tier commands. Tells the invoker before denying.
pub async fn manager_check(ctx: Context<'_>) -> Result<bool, Error> {
    if check(&ctx, Tier::Manager).await {
        return Ok(true);
    }
    ctx.say("❌ You need the Manage Server permission to use this command.")
        .await?;
    Ok(false)
}

/// Poise check for owner-only commands.
pub async fn owner_check(ctx: Context<'_>) -> Result<bool, Error> {
    if check(&ctx, Tier::Owner).await {
        return Ok(true);
    }
    ctx.say("❌ This command is restricted to the bot owner.")
        .await?;
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_owner(owner_id: u64) -> Config {
        serde_json::from_str(&format!(r#"{{"token": "t", "owner_id": {owner_id}}}"#)).unwrap()
    }

    #[test]
    fn owner_passes_both_tiers() {
        let config = config_with_owner(42);
        assert!(allowed(&config, Tier::Owner, 42, false));
        assert!(allowed(&config, Tier::Manager, 42, false));
    }

    #[test]
    fn manage_guild_passes_manager_tier_only() {
        let config = config_with_owner(42);
        assert!(allowed(&config, Tier::Manager, 7, true));
        assert!(!allowed(&config, Tier::Owner, 7, true));
    }

    #[test]
    fn regular_member_is_denied() {
        let config = config_with_owner(42);
        assert!(!allowed(&config, Tier::Manager, 7, false));
        assert!(!allowed(&config, Tier::Owner, 7, false));
    }

    #[test]
    fn owner_list_is_honored() {
        let config: Config =
            serde_json::from_str(r#"{"token": "t", "owner_id": [1, 2]}"#).unwrap();
        assert!(allowed(&config, Tier::Owner, 2, false));
        assert!(!allowed(&config, Tier::Owner, 3, false));
    }
}
