pub mod activity;
pub mod announcements;
pub mod notifications;
pub mod root;
