//! Capability interfaces for platform features the store depends on only
//! indirectly. Results flow back into the store through its ordinary
//! operations, never by touching state directly.

pub mod confirm;
pub mod dictation;
pub mod notifications;

pub use confirm::{
    confirm_and_delete_list, confirm_and_reset, AlwaysConfirm, ConfirmPrompt, NeverConfirm,
};
pub use dictation::{add_dictated_item, Dictation, NoDictation};
pub use notifications::{
    enable_notifications, remind_after, DeniedNotifications, NoopNotifier, NotificationPermission,
    Notifier, PermissionStatus, REMINDER_DELAY,
};
