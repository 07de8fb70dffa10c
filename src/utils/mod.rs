// src/utils/mod.rs

pub mod cookie;
pub mod hash;
pub mod jwt;
