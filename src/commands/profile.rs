//! Profile panel (`chatterm profile`, `/profile`)

use crate::profile::ProfileSource;
use crate::session::ChatSession;
use crate::view::panels;

/// Print the profile panel
///
/// Chat and message counters come from a fresh chat list; if the list
/// cannot be loaded the last known one is used.
pub async fn show_profile(session: &ChatSession, source: &dyn ProfileSource) {
    let chats = match session.load_chats().await {
        Some(chats) => chats,
        None => session.chats(),
    };
    let snapshot = source.snapshot(&chats);
    println!(
        "{}\n",
        panels::profile_panel(&snapshot, &session.settings().palette())
    );
}
