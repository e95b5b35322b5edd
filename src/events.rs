//! App events forwarded to the host for observability.
//!
//! Serialized as `{ "type": ..., "payload": ... }`, the shape the host bridge
//! already consumes.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AppEvent {
    /// A navigation committed inside the surface.
    Navigation {
        url: String,
        #[serde(rename = "canGoBack")]
        can_go_back: bool,
    },
    /// A URL was handed off to the system browser or an app.
    ExternalLink { url: String },
    /// A popup target was redirected into the current surface.
    InternalNavigation { url: String },
    /// Raw message posted by the page.
    Message(String),
}
