pub mod user;
pub mod category;
pub mod activity;
pub mod history;

pub use user::User;
pub use category::Category;
pub use activity::Activity;
pub use history::{record_completion, Completion, HistoryEntry, WeekRow};
