// src/lib.rs

//! Memorials Library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod services;
pub mod storage;
pub mod utils;
