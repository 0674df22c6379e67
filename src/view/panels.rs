//! Settings and profile panels

use super::truncate;
use crate::preferences::{find_model, Palette, Preferences, AVAILABLE_MODELS};
use crate::profile::{achievements, ProfileSnapshot, UsageBand};
use colored::Colorize;
use prettytable::{format, Table};

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// The settings panel: appearance, model, and chat toggles
pub fn settings_panel(prefs: &Preferences, palette: &Palette) -> String {
    let model = match find_model(&prefs.selected_model) {
        Some(m) => format!("{} ({}, {})", m.name, m.provider, m.id),
        None => prefs.selected_model.clone(),
    };

    let lines = [
        palette.accent("Settings").to_string(),
        String::new(),
        format!("  Theme:            {} ({})", prefs.theme, prefs.theme.description()),
        format!("  Model:            {}", model),
        format!("  Auto-save:        {}", on_off(prefs.auto_save)),
        format!("  Show timestamps:  {}", on_off(prefs.show_timestamps)),
    ];
    lines.join("\n")
}

/// Catalog of selectable models, the selected one starred
pub fn models_table(selected: &str) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "".bold(),
        "ID".bold(),
        "Name".bold(),
        "Provider".bold(),
        "Description".bold()
    ]);

    for model in AVAILABLE_MODELS {
        let marker = if model.id == selected { "*" } else { "" };
        table.add_row(prettytable::row![
            marker,
            model.id.cyan(),
            model.name,
            model.provider,
            model.description
        ]);
    }

    table
}

/// Text progress bar, coloured by usage band
///
/// # Examples
///
/// ```
/// use chatterm::view::panels::usage_bar;
///
/// colored::control::set_override(false);
/// assert_eq!(usage_bar(50, 10), "[#####-----]  50%");
/// ```
pub fn usage_bar(percentage: u8, width: usize) -> String {
    let pct = percentage.min(100) as usize;
    let filled = pct * width / 100;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(width - filled));
    let colored = bar.color(UsageBand::for_percentage(percentage).color());
    format!("[{}] {:>3}%", colored, pct)
}

fn section(palette: &Palette, title: &str) -> String {
    format!("\n{}", palette.accent(title))
}

/// The profile panel: account, usage, billing, achievements
pub fn profile_panel(snapshot: &ProfileSnapshot, palette: &Palette) -> String {
    let user = &snapshot.user;
    let usage = &snapshot.usage;
    let billing = &snapshot.billing;

    let mut out = vec![
        palette.accent("Profile").to_string(),
        format!("  {} <{}>", user.name.bold(), user.email),
        format!("  Member since {} · {}", user.join_date, user.plan),
        section(palette, "Usage"),
        format!("  Total chats:     {}", usage.total_chats),
        format!("  Total messages:  {}", usage.total_messages),
        format!(
            "  Tokens:          {} / {}  {}",
            usage.tokens_used,
            usage.tokens_limit,
            usage_bar(usage.token_percentage(), 20)
        ),
        format!(
            "  Requests today:  {} / {}  {}",
            usage.requests_today,
            usage.requests_limit,
            usage_bar(usage.request_percentage(), 20)
        ),
        section(palette, "Billing"),
        format!("  Plan:            {}", billing.plan),
        format!("  Amount:          {}", billing.amount),
        format!("  Next billing:    {}", billing.next_billing),
        format!("  Payment method:  {}", billing.payment_method),
    ];

    for record in &billing.history {
        out.push(format!(
            "    {}  {}  {}  {}",
            record.date,
            truncate(&record.description, 30),
            record.amount,
            palette.muted(&record.status)
        ));
    }

    out.push(section(palette, "Achievements"));
    for achievement in achievements(usage) {
        let mark = if achievement.earned {
            "★".yellow().to_string()
        } else {
            palette.muted("☆").to_string()
        };
        out.push(format!(
            "  {} {}  {}",
            mark,
            achievement.name,
            palette.muted(achievement.description)
        ));
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileConfig;
    use crate::preferences::theme::ResolvedTheme;
    use crate::preferences::Theme;
    use crate::profile::{ProfileSource, StaticProfileSource};

    fn palette() -> Palette {
        colored::control::set_override(false);
        Palette::for_theme(ResolvedTheme::Light)
    }

    #[test]
    fn test_settings_panel_names_catalog_model() {
        let prefs = Preferences {
            theme: Theme::Dark,
            ..Preferences::default()
        };
        let out = settings_panel(&prefs, &palette());
        assert!(out.contains("Theme:            dark"));
        assert!(out.contains("GPT-4o Mini (OpenAI, gpt-4o-mini)"));
        assert!(out.contains("Auto-save:        on"));
    }

    #[test]
    fn test_settings_panel_shows_unknown_model_verbatim() {
        let prefs = Preferences {
            selected_model: "local-llama".to_string(),
            ..Preferences::default()
        };
        assert!(settings_panel(&prefs, &palette()).contains("Model:            local-llama"));
    }

    #[test]
    fn test_usage_bar_widths() {
        colored::control::set_override(false);
        assert_eq!(usage_bar(0, 10), "[----------]   0%");
        assert_eq!(usage_bar(100, 10), "[##########] 100%");
        assert_eq!(usage_bar(255, 4), "[####] 100%");
    }

    #[test]
    fn test_models_table_lists_catalog() {
        assert_eq!(models_table("gpt-4o").len(), AVAILABLE_MODELS.len() + 1);
    }

    #[test]
    fn test_profile_panel_sections() {
        let snapshot = StaticProfileSource::new(ProfileConfig {
            tokens_used: 6000,
            ..ProfileConfig::default()
        })
        .snapshot(&[]);
        let out = profile_panel(&snapshot, &palette());
        for heading in ["Usage", "Billing", "Achievements", "Power User"] {
            assert!(out.contains(heading), "missing {}", heading);
        }
        assert!(out.contains("6000 / 10000"));
    }
}
