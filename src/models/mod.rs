// src/models/mod.rs

pub mod assignment;
pub mod profile;
pub mod score;
