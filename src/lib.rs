pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod model;
pub mod paths;
pub mod presentation;
pub mod reconcile;
pub mod stream;
pub mod tree;
pub mod view;
