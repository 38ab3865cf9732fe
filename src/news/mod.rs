// src/news/mod.rs
pub mod cache;
pub mod dedup;
pub mod normalize;
pub mod providers;
pub mod select;
pub mod service;
pub mod similarity;
pub mod types;

pub use service::NewsService;
pub use types::{Article, CacheStatus, CachedResult, DisplayArticle, HeadlineProvider};
