pub mod admin;
pub mod api;
pub mod booth;
pub mod config;
pub mod error;
pub mod flight;
pub mod gui;
pub mod login;
pub mod models;
pub mod quota;
pub mod route;
pub mod session;
pub mod storage;
