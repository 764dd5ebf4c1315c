use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Icons referenced by the screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IconName {
    Close,
    Check,
    User,
    Heart,
    Plus,
    ArrowRight,
    ArrowLeft,
    Bookmark,
    Menu,
    Star,
    Trophy,
    Lightbulb,
}

impl IconName {
    pub const ALL: [IconName; 12] = [
        IconName::Close,
        IconName::Check,
        IconName::User,
        IconName::Heart,
        IconName::Plus,
        IconName::ArrowRight,
        IconName::ArrowLeft,
        IconName::Bookmark,
        IconName::Menu,
        IconName::Star,
        IconName::Trophy,
        IconName::Lightbulb,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IconName::Close => "close",
            IconName::Check => "check",
            IconName::User => "user",
            IconName::Heart => "heart",
            IconName::Plus => "plus",
            IconName::ArrowRight => "arrowRight",
            IconName::ArrowLeft => "arrowLeft",
            IconName::Bookmark => "bookmark",
            IconName::Menu => "menu",
            IconName::Star => "star",
            IconName::Trophy => "trophy",
            IconName::Lightbulb => "lightbulb",
        }
    }

    // Stroke paths on a 24x24 grid
    fn default_paths(&self) -> &'static str {
        match self {
            IconName::Close => r#"<path d="M18 6 6 18M6 6l12 12"/>"#,
            IconName::Check => r#"<path d="M20 6 9 17l-5-5"/>"#,
            IconName::User => r#"<path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#,
            IconName::Heart => r#"<path d="M20.8 4.6a5.5 5.5 0 0 0-7.8 0L12 5.7l-1-1.1a5.5 5.5 0 0 0-7.8 7.8l1 1.1L12 21l7.8-7.5 1-1.1a5.5 5.5 0 0 0 0-7.8z"/>"#,
            IconName::Plus => r#"<path d="M12 5v14M5 12h14"/>"#,
            IconName::ArrowRight => r#"<path d="M5 12h14M12 5l7 7-7 7"/>"#,
            IconName::ArrowLeft => r#"<path d="M19 12H5M12 19l-7-7 7-7"/>"#,
            IconName::Bookmark => r#"<path d="m19 21-7-5-7 5V5a2 2 0 0 1 2-2h10a2 2 0 0 1 2 2z"/>"#,
            IconName::Menu => r#"<path d="M3 6h18M3 12h18M3 18h18"/>"#,
            IconName::Star => r#"<path d="m12 2 3.1 6.3 6.9 1-5 4.9 1.2 6.8L12 17.8 5.8 21l1.2-6.8-5-4.9 6.9-1z"/>"#,
            IconName::Trophy => r#"<path d="M6 9H4.5a2.5 2.5 0 0 1 0-5H6M18 9h1.5a2.5 2.5 0 0 0 0-5H18M4 22h16M10 14.7V17c0 .6-.5 1-1 1.2-1.2.5-2 2-2 3.8M14 14.7V17c0 .6.5 1 1 1.2 1.2.5 2 2 2 3.8M18 2H6v7a6 6 0 0 0 12 0z"/>"#,
            IconName::Lightbulb => r#"<path d="M9 18h6M10 22h4M15.1 14c.2-1 .7-1.7 1.4-2.5A6 6 0 1 0 6 8c0 1.3.5 2.5 1.5 3.5.7.7 1.2 1.5 1.4 2.5"/>"#,
        }
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown icon '{0}'")]
pub struct ParseIconError(pub String);

impl FromStr for IconName {
    type Err = ParseIconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "close" => Ok(IconName::Close),
            "check" => Ok(IconName::Check),
            "user" => Ok(IconName::User),
            "heart" => Ok(IconName::Heart),
            "plus" => Ok(IconName::Plus),
            "arrowRight" => Ok(IconName::ArrowRight),
            "arrowLeft" => Ok(IconName::ArrowLeft),
            "bookmark" => Ok(IconName::Bookmark),
            "menu" => Ok(IconName::Menu),
            "star" => Ok(IconName::Star),
            "trophy" => Ok(IconName::Trophy),
            "lightbulb" => Ok(IconName::Lightbulb),
            _ => Err(ParseIconError(s.to_string())),
        }
    }
}

/// Name to markup lookup; the markup is opaque
pub trait IconSource: Send + Sync {
    fn markup(&self, name: IconName) -> Option<&str>;

    /// `data:` URL for use as an image source
    fn data_url(&self, name: IconName) -> Option<String> {
        self.markup(name)
            .map(|svg| format!("data:image/svg+xml,{}", urlencoding::encode(svg)))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticIcons {
    icons: HashMap<IconName, String>,
}

impl StaticIcons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in line icons for every `IconName`
    pub fn default_set() -> Self {
        IconName::ALL.iter().fold(Self::new(), |icons, name| {
            let svg = format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">{}</svg>"#,
                name.default_paths()
            );
            icons.with(*name, svg)
        })
    }

    pub fn with(mut self, name: IconName, markup: impl Into<String>) -> Self {
        self.icons.insert(name, markup.into());
        self
    }
}

impl IconSource for StaticIcons {
    fn markup(&self, name: IconName) -> Option<&str> {
        self.icons.get(&name).map(String::as_str)
    }
}
