//! Profile, usage, and billing data
//!
//! Profile data is read-only from the client's point of view. It comes from
//! a [`ProfileSource`]; the shipped [`StaticProfileSource`] reads user and
//! billing fields from configuration and derives the chat and message
//! counters from the chat list, so the panel is deterministic.
//!
//! Achievements are computed from the counters every time the panel is
//! shown and are never stored.

use crate::api::Chat;
use crate::config::ProfileConfig;
use colored::Color;

/// Who the user is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
    pub join_date: String,
    pub plan: String,
}

/// Usage counters shown as stats and progress bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsageStats {
    pub total_chats: u64,
    pub total_messages: u64,
    pub tokens_used: u64,
    pub tokens_limit: u64,
    pub requests_today: u64,
    pub requests_limit: u64,
}

/// One row of billing history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingRecord {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub status: String,
}

/// Current plan and payment details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingInfo {
    pub plan: String,
    pub next_billing: String,
    pub amount: String,
    pub payment_method: String,
    pub history: Vec<BillingRecord>,
}

/// Everything the profile panel shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub user: UserInfo,
    pub usage: UsageStats,
    pub billing: BillingInfo,
}

/// Read-only source of profile data
pub trait ProfileSource: Send + Sync {
    /// Build a snapshot, given the chats currently known to the client
    fn snapshot(&self, chats: &[Chat]) -> ProfileSnapshot;
}

/// Deterministic profile source backed by configuration
#[derive(Debug, Clone)]
pub struct StaticProfileSource {
    config: ProfileConfig,
}

impl StaticProfileSource {
    pub fn new(config: ProfileConfig) -> Self {
        Self { config }
    }
}

impl ProfileSource for StaticProfileSource {
    fn snapshot(&self, chats: &[Chat]) -> ProfileSnapshot {
        let c = &self.config;
        let counts = UsageStats::from_chats(chats);

        ProfileSnapshot {
            user: UserInfo {
                name: c.name.clone(),
                email: c.email.clone(),
                join_date: c.join_date.clone(),
                plan: c.plan.clone(),
            },
            usage: UsageStats {
                tokens_used: c.tokens_used,
                tokens_limit: c.tokens_limit,
                requests_today: c.requests_today,
                requests_limit: c.requests_limit,
                ..counts
            },
            billing: BillingInfo {
                plan: c.plan.clone(),
                next_billing: c.next_billing.clone(),
                amount: c.billing_amount.clone(),
                payment_method: c.payment_method.clone(),
                history: vec![BillingRecord {
                    date: c.join_date.clone(),
                    description: "Free usage".to_string(),
                    amount: c.billing_amount.clone(),
                    status: c.plan.clone(),
                }],
            },
        }
    }
}

impl UsageStats {
    /// Chat and message counters for a chat list; all other fields zero
    pub fn from_chats(chats: &[Chat]) -> Self {
        Self {
            total_chats: chats.len() as u64,
            total_messages: chats.iter().map(|c| u64::from(c.message_count)).sum(),
            ..Self::default()
        }
    }

    pub fn token_percentage(&self) -> u8 {
        usage_percentage(self.tokens_used, self.tokens_limit)
    }

    pub fn request_percentage(&self) -> u8 {
        usage_percentage(self.requests_today, self.requests_limit)
    }
}

/// Percentage of `limit` consumed, clamped to 0..=100
///
/// A zero limit reports 0.
///
/// # Examples
///
/// ```
/// use chatterm::profile::usage_percentage;
///
/// assert_eq!(usage_percentage(2500, 10000), 25);
/// assert_eq!(usage_percentage(20, 10), 100);
/// assert_eq!(usage_percentage(5, 0), 0);
/// ```
pub fn usage_percentage(used: u64, limit: u64) -> u8 {
    if limit == 0 {
        return 0;
    }
    let pct = used.saturating_mul(100) / limit;
    pct.min(100) as u8
}

/// Colour band of a usage bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageBand {
    Low,
    Medium,
    High,
}

impl UsageBand {
    /// Under 50% is low, under 80% medium, anything else high
    pub fn for_percentage(percentage: u8) -> Self {
        if percentage < 50 {
            Self::Low
        } else if percentage < 80 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Low => Color::Green,
            Self::Medium => Color::Yellow,
            Self::High => Color::Red,
        }
    }
}

/// A derived badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

/// Evaluate every achievement against `usage`
pub fn achievements(usage: &UsageStats) -> Vec<Achievement> {
    vec![
        Achievement {
            name: "First Chat",
            description: "Started your first conversation",
            earned: usage.total_chats >= 1,
        },
        Achievement {
            name: "Chatty",
            description: "Sent 100 messages",
            earned: usage.total_messages >= 100,
        },
        Achievement {
            name: "Explorer",
            description: "Created 10 chats",
            earned: usage.total_chats >= 10,
        },
        Achievement {
            name: "Power User",
            description: "Used 5000 tokens",
            earned: usage.tokens_used >= 5000,
        },
    ]
}
