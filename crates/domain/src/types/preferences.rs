//! Device-local display preferences

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LanguageCode {
    #[default]
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Zh,
    Ja,
    Ko,
    Hi,
    Ar,
    Ru,
}

impl_domain_enum_conversions!(LanguageCode {
    En => "en",
    Es => "es",
    Fr => "fr",
    De => "de",
    It => "it",
    Pt => "pt",
    Zh => "zh",
    Ja => "ja",
    Ko => "ko",
    Hi => "hi",
    Ar => "ar",
    Ru => "ru",
});

/// Light/dark appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl_domain_enum_conversions!(ThemeMode {
    Light => "light",
    Dark => "dark",
    System => "system",
});

/// Accent color of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeColor {
    #[default]
    Blue,
    Red,
    Green,
    Purple,
    Orange,
    Pink,
    Emerald,
    Indigo,
}

impl_domain_enum_conversions!(ThemeColor {
    Blue => "blue",
    Red => "red",
    Green => "green",
    Purple => "purple",
    Orange => "orange",
    Pink => "pink",
    Emerald => "emerald",
    Indigo => "indigo",
});

/// Preferences kept on the device, independent of the signed-in principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub language: LanguageCode,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default)]
    pub theme_color: ThemeColor,
}
