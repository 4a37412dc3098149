pub mod comment;
pub mod game;

pub use comment::{AdminCommentRow, CommentFeedbackRequest, CommentView, ReplyResponse};
pub use game::{
    ActionRequest, AdminGameRow, CategoryGroup, CreateCategoryRequest, CreateGameRequest,
    GameDetail, GameStatsView, GameSummary, UpdateCategoryRequest, UpdateGameRequest,
};
