//! Device preference commands

use skytrack_domain::{LanguageCode, Result as DomainResult, ThemeColor, ThemeMode, UserPreferences};

use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub fn get_preferences(ctx: &AppContext) -> UserPreferences {
    ctx.preferences.current()
}

pub async fn set_language(ctx: &AppContext, language: LanguageCode) -> DomainResult<UserPreferences> {
    execute_command("preferences::set_language", || ctx.preferences.set_language(language)).await
}

pub async fn set_theme(ctx: &AppContext, theme: ThemeMode) -> DomainResult<UserPreferences> {
    execute_command("preferences::set_theme", || ctx.preferences.set_theme(theme)).await
}

pub async fn set_theme_color(
    ctx: &AppContext,
    theme_color: ThemeColor,
) -> DomainResult<UserPreferences> {
    execute_command("preferences::set_theme_color", || ctx.preferences.set_theme_color(theme_color))
        .await
}
