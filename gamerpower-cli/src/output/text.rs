//! Text output formatting with colors.

use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use gamerpower_core::{
    ActiveList, Giveaway, GiveawayType, Platform, ViewKind, ViewState, ViewValue,
};
use gamerpower_fetch::ProbeResult;
use gamerpower_store::Settings;
use serde_json::Value;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

const RULE_WIDTH: usize = 50;
const NAME_WIDTH: usize = 22;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Formats the compact summary: one line per view.
    pub fn format_summary(&self, views: &[ViewState], fetched_at: Option<DateTime<Utc>>) -> String {
        let mut lines = Vec::new();

        lines.push(self.bold("GamerPower Summary"));
        lines.push("─".repeat(RULE_WIDTH));

        for view in views {
            lines.push(format!(
                "{:<width$} {}",
                view.name,
                self.format_value(view),
                width = NAME_WIDTH
            ));
            if view.kind == ViewKind::TotalGiveaways {
                if let Some(breakdown) = self.format_type_breakdown(view) {
                    lines.push(format!("{:<width$} {}", "", breakdown, width = NAME_WIDTH));
                }
            }
        }

        lines.push(String::new());
        lines.push(self.format_footer(views, fetched_at));
        lines.join("\n")
    }

    /// Formats every view with its attributes.
    pub fn format_views(
        &self,
        views: &[ViewState],
        fetched_at: Option<DateTime<Utc>>,
        error: Option<&str>,
    ) -> String {
        let mut lines = Vec::new();

        for view in views {
            lines.push(format!("{} {}", self.bold(view.name), self.format_value(view)));
            lines.extend(self.format_attributes(view).into_iter().map(|l| format!("  {l}")));
            lines.push(String::new());
        }

        if let Some(error) = error {
            lines.push(self.format_error(error));
        }
        lines.push(self.format_footer(views, fetched_at));
        lines.join("\n")
    }

    /// Formats the value of a view, with currency formatting for USD.
    pub fn format_value(&self, view: &ViewState) -> String {
        match (&view.value, view.unit) {
            (ViewValue::Amount(Some(amount)), Some("USD")) => self.green(&format_money(*amount)),
            (value, _) if value.is_absent() => self.dim(&value.to_string()),
            (ViewValue::Count(count), _) => self.cyan(&count.to_string()),
            (value, _) => value.to_string(),
        }
    }

    fn format_attributes(&self, view: &ViewState) -> Vec<String> {
        let attrs = &view.attributes;
        let mut lines = Vec::new();

        match view.kind {
            ViewKind::TotalGiveaways => {
                if let Some(by_type) = attrs.get("by_type").and_then(Value::as_object) {
                    for (kind, count) in by_type {
                        lines.push(format!("{kind}: {count}"));
                    }
                }
                if let Some(active) = attrs.get("active_giveaways_count") {
                    lines.push(self.dim(&format!("API active count: {active}")));
                }
            }
            ViewKind::TotalWorth => {}
            ViewKind::LatestGiveaway => {
                for (key, label) in [
                    ("type", "Type"),
                    ("platforms", "Platforms"),
                    ("worth", "Worth"),
                    ("end_date", "Ends"),
                    ("open_giveaway_url", "Claim"),
                ] {
                    if let Some(text) = attrs.get(key).and_then(Value::as_str) {
                        lines.push(format!("{label}: {text}"));
                    }
                }
            }
            ViewKind::ActiveGiveawaysList => {
                let platforms = attrs
                    .get("by_platform")
                    .and_then(Value::as_object)
                    .map_or(0, serde_json::Map::len);
                lines.push(format!("Platforms: {platforms}"));

                let new_titles: Vec<&str> = attrs
                    .get("new_since_last_update")
                    .and_then(Value::as_array)
                    .map(|titles| {
                        titles
                            .iter()
                            .map(|t| t.as_str().unwrap_or("Unknown"))
                            .collect()
                    })
                    .unwrap_or_default();
                if new_titles.is_empty() {
                    lines.push(self.dim("New since last update: none"));
                } else {
                    lines.push(format!("New since last update: {}", new_titles.len()));
                    for title in new_titles {
                        lines.push(format!("  {} {}", self.green("+"), title));
                    }
                }
            }
        }

        lines
    }

    fn format_type_breakdown(&self, view: &ViewState) -> Option<String> {
        let by_type = view.attributes.get("by_type")?.as_object()?;
        if by_type.is_empty() {
            return None;
        }
        let parts: Vec<String> = by_type
            .iter()
            .map(|(kind, count)| format!("{kind} {count}"))
            .collect();
        Some(self.dim(&parts.join(" · ")))
    }

    fn format_footer(&self, views: &[ViewState], fetched_at: Option<DateTime<Utc>>) -> String {
        let attribution = views.first().map_or("", |v| v.attribution.as_str());
        match fetched_at {
            Some(at) => self.dim(&format!(
                "{} · updated {}",
                attribution,
                at.with_timezone(&Local).format("%H:%M:%S")
            )),
            None => self.dim(attribution),
        }
    }

    // ========================================================================
    // Active List
    // ========================================================================

    /// Formats the active list, either flat or grouped by platform.
    pub fn format_active_list(&self, list: &ActiveList, by_platform: bool) -> String {
        let mut lines = Vec::new();

        if by_platform {
            if list.by_platform.is_empty() {
                return self.dim("No active giveaways");
            }
            for (platform, titles) in list.by_platform.iter() {
                lines.push(format!("{} {}", self.bold(platform), self.dim(&format!("({})", titles.len()))));
                for title in titles {
                    lines.push(format!("  • {title}"));
                }
            }
            return lines.join("\n");
        }

        if list.giveaways.is_empty() {
            return self.dim("No active giveaways");
        }

        let new_titles: Vec<&str> = list
            .new_since_last_update
            .iter()
            .filter_map(Option::as_deref)
            .collect();

        for summary in &list.giveaways {
            let title = summary.title.as_deref().unwrap_or("Unknown");
            let marker = if new_titles.contains(&title) {
                self.green("+")
            } else {
                " ".to_string()
            };
            let worth = summary.worth.as_deref().unwrap_or("N/A");
            lines.push(format!(
                "{} {:>6}  {}  {}",
                marker,
                self.dim(&summary.id.to_string()),
                title,
                self.dim(&format!(
                    "[{}] {}",
                    summary.giveaway_type.as_deref().unwrap_or("?"),
                    worth
                ))
            ));
        }

        lines.join("\n")
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Formats one giveaway in full.
    pub fn format_giveaway(&self, giveaway: &Giveaway) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            self.bold(giveaway.title_or_unknown()),
            self.dim(&format!("#{}", giveaway.id))
        ));
        lines.push("─".repeat(RULE_WIDTH));

        let fields = [
            ("Type", giveaway.giveaway_type.as_deref()),
            ("Platforms", giveaway.platforms.as_deref()),
            ("Worth", giveaway.worth.as_deref()),
            ("Status", giveaway.status.as_deref()),
            ("Published", giveaway.published_date.as_deref()),
            ("Claim", giveaway.open_giveaway_url.as_deref()),
            ("Page", giveaway.gamerpower_url.as_deref()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                lines.push(format!("{:<11} {}", format!("{label}:"), value));
            }
        }
        if let Some(users) = giveaway.users {
            lines.push(format!("{:<11} {}", "Claimed:", users));
        }
        lines.push(format!(
            "{:<11} {}",
            "Ends:",
            self.format_end(giveaway.ends_at(), Utc::now().naive_utc())
        ));

        if let Some(description) = &giveaway.description {
            lines.push(String::new());
            lines.push(description.clone());
        }
        if let Some(instructions) = &giveaway.instructions {
            lines.push(String::new());
            lines.push(self.dim(instructions));
        }

        lines.join("\n")
    }

    /// Formats the line for an id the API did not return.
    pub fn format_not_found(&self, id: u64) -> String {
        format!("{} {}", self.yellow("Not found:"), self.dim(&format!("#{id}")))
    }

    /// Formats an end date relative to `now`.
    pub fn format_end(&self, ends_at: Option<NaiveDateTime>, now: NaiveDateTime) -> String {
        let Some(ends_at) = ends_at else {
            return self.dim("no end date");
        };

        if ends_at <= now {
            return self.red("ended");
        }

        let diff = ends_at - now;
        let text = if diff < Duration::hours(1) {
            let mins = diff.num_minutes();
            format!("in {} minute{}", mins, if mins == 1 { "" } else { "s" })
        } else if diff < Duration::hours(24) {
            let hours = diff.num_hours();
            let mins = diff.num_minutes() % 60;
            if mins > 0 {
                format!("in {hours}h {mins}m")
            } else {
                format!("in {} hour{}", hours, if hours == 1 { "" } else { "s" })
            }
        } else {
            let days = diff.num_days();
            format!("in {} day{}", days, if days == 1 { "" } else { "s" })
        };

        if diff < Duration::hours(24) {
            self.yellow(&text)
        } else {
            text
        }
    }

    // ========================================================================
    // Check
    // ========================================================================

    /// Formats a connectivity check.
    pub fn format_probe(&self, url: &str, result: &ProbeResult) -> String {
        let status = if result.reachable {
            self.green("reachable")
        } else {
            self.red("unreachable")
        };

        let mut line = format!("{} {} {}", self.bold("GamerPower API"), status, self.dim(url));
        if let Some(code) = result.status_code {
            line.push_str(&format!(" {}", self.dim(&format!("(HTTP {code})"))));
        }
        line.push_str(&format!(" {}", self.dim(&format!("{}ms", result.response_time_ms))));
        if let Some(error) = &result.error {
            line.push('\n');
            line.push_str(&self.format_error(error));
        }
        line
    }

    // ========================================================================
    // Config
    // ========================================================================

    /// Formats the stored settings.
    pub fn format_settings(&self, path: &str, settings: &Settings) -> String {
        let filter = &settings.filter;
        let platforms: Vec<&str> = filter.platforms().iter().map(Platform::key).collect();
        let types: Vec<&str> = filter.giveaway_types().iter().map(GiveawayType::key).collect();

        let all_or = |keys: Vec<&str>| {
            if keys.is_empty() {
                self.dim("all")
            } else {
                keys.join(", ")
            }
        };

        [
            format!("{} {}", self.bold("Settings"), self.dim(path)),
            "─".repeat(RULE_WIDTH),
            format!("{:<14} {}", "Platforms:", all_or(platforms)),
            format!("{:<14} {}", "Types:", all_or(types)),
            format!(
                "{:<14} {} minutes",
                "Interval:",
                filter.scan_interval_minutes()
            ),
            format!("{:<14} {}", "API:", self.blue(settings.effective_base_url())),
        ]
        .join("\n")
    }

    /// Formats the available filter keys.
    pub fn format_keys(&self) -> String {
        let mut lines = vec![self.bold("Platforms")];
        for platform in Platform::all() {
            lines.push(format!("  {:<18} {}", platform.key(), self.dim(platform.display_name())));
        }
        lines.push(String::new());
        lines.push(self.bold("Types"));
        for giveaway_type in GiveawayType::all() {
            lines.push(format!(
                "  {:<18} {}",
                giveaway_type.key(),
                self.dim(giveaway_type.display_name())
            ));
        }
        lines.join("\n")
    }

    /// Formats an error message.
    pub fn format_error(&self, error: &str) -> String {
        format!("{}: {}", self.red("Error"), error)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Formats a USD amount with thousands separators, e.g. `$1,234.56`.
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

// ============================================================================
// Tests
// ============================================================================
