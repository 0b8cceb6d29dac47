pub mod app;
pub mod config;
pub mod data;
pub mod icons;
pub mod services;
pub mod utils;
pub mod view;

pub use app::{update, App, Command, FetchResult, FilterMode, Message, Page};
pub use config::{FetchConfig, RepoRef};
pub use data::{Issue, LinkedPullRequest};
pub use view::ui;
