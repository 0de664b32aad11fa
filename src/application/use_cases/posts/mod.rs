pub mod create_post;
pub mod get_post;
pub mod list_user_posts;
pub mod update_post;
