// src/model/mod.rs

pub mod adapters;
pub mod ads;
pub mod catalog;
pub mod context;
pub mod policy;
