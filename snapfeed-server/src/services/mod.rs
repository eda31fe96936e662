mod posts_service;

pub use posts_service::PostsService;
