//! Application Layer

pub mod posts;
pub mod users;

pub use posts::{GetPostUseCase, ListPostsUseCase, ManagePostUseCase, ToggleLikeUseCase};
pub use users::{FollowSide, FollowUseCase, GetUserUseCase, ListUsersUseCase, UpdateProfileUseCase};
