pub mod user_ip;

pub use user_ip::record_user_ip;
