// src/placement/mod.rs

pub mod dismissal;
pub mod matcher;
pub mod resolver;
