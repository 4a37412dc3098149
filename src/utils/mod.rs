pub mod slug;
pub mod time;

pub use slug::slugify;
pub use time::time_ago;
