use crate::lists::ListStore;
use std::time::Duration;

pub const REMINDER_DELAY: Duration = Duration::from_secs(5);
pub const REMINDER_TITLE: &str = "Shopping Reminder";
pub const REMINDER_BODY: &str = "Don't forget to check your shopping list!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Prompt,
}

pub trait NotificationPermission: Send + Sync {
    fn status(&self) -> PermissionStatus;
    fn request(&self) -> PermissionStatus;
}

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Platform without notification support.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeniedNotifications;

impl NotificationPermission for DeniedNotifications {
    fn status(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }

    fn request(&self) -> PermissionStatus {
        PermissionStatus::Denied
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _title: &str, _body: &str) {}
}

/// Update the notifications setting. Returns `true` when a reminder should be
/// scheduled: notifications were just switched on and permission is granted
/// (asking for it if the user was never asked).
pub fn enable_notifications(
    store: &mut ListStore,
    enabled: bool,
    permission: &dyn NotificationPermission,
) -> bool {
    if !store.set_notifications_enabled(enabled) {
        return false;
    }

    let status = match permission.status() {
        PermissionStatus::Prompt => permission.request(),
        status => status,
    };

    tracing::debug!(target: "system", ?status, "Notifications enabled");
    status == PermissionStatus::Granted
}

/// Wait `delay`, then show the shopping reminder if permission is granted.
/// Returns whether the reminder was shown.
pub async fn remind_after(
    delay: Duration,
    permission: &dyn NotificationPermission,
    notifier: &dyn Notifier,
) -> bool {
    tokio::time::sleep(delay).await;

    if permission.status() != PermissionStatus::Granted {
        tracing::debug!(target: "system", "Reminder skipped, notifications not permitted");
        return false;
    }

    notifier.notify(REMINDER_TITLE, REMINDER_BODY);
    true
}
