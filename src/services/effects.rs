// src/services/effects.rs

//! UI side effects consumed by the synchronizers.
//!
//! Rendering and routing live outside this crate; the core only emits toasts,
//! asks for confirmation, and requests navigation through these seams.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

/// Screen position hint for a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToastPosition {
    TopCenter,
    TopRight,
}

/// A transient notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub position: ToastPosition,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
            position: ToastPosition::TopRight,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Warning,
            message: message.into(),
            position: ToastPosition::TopCenter,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
            position: ToastPosition::TopRight,
        }
    }
}

/// Return-path state handed to the login view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Path to come back to after logging in
    pub from: String,
}

/// Toast and prompt surface.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a toast.
    fn notify(&self, toast: Toast);

    /// Ask the user a yes/no question.
    async fn confirm(&self, message: &str) -> bool;
}

/// Router surface.
pub trait Navigator: Send + Sync {
    /// Navigate to `path`, handing `state` to the destination view.
    fn navigate(&self, path: &str, state: NavigationState);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        assert_eq!(Toast::warning("w").position, ToastPosition::TopCenter);
        assert_eq!(Toast::success("s").position, ToastPosition::TopRight);
        assert_eq!(Toast::error("e").position, ToastPosition::TopRight);
    }

    #[test]
    fn test_position_wire_names() {
        assert_eq!(
            serde_json::to_string(&ToastPosition::TopCenter).unwrap(),
            "\"top-center\""
        );
        assert_eq!(
            serde_json::to_string(&ToastPosition::TopRight).unwrap(),
            "\"top-right\""
        );
    }
}
