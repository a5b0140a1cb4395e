pub mod auth;
pub mod history;
pub mod mux;
pub mod pipeline;
pub mod shared;
pub mod synthesis;
pub mod video;
