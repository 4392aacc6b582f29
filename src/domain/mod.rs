pub mod activity;
pub mod announcement;
pub mod notification;
pub mod recipient;

pub use activity::*;
pub use announcement::*;
pub use notification::*;
pub use recipient::*;
