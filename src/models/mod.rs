// src/models/mod.rs

pub mod certificate;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod quiz;
pub mod user;
