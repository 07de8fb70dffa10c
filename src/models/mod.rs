// src/models/mod.rs

pub mod course;
pub mod question;
pub mod submission;
pub mod user;
