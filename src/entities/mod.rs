pub mod category;
pub mod comment;
pub mod game;
pub mod game_equipment;
pub mod user;
pub mod user_ip;

pub use game::Environment;
