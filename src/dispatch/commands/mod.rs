//! Verb handlers, grouped roughly by what they touch.

pub mod admin;
pub mod info;
pub mod items;
pub mod misc;
pub mod movement;
pub mod social;
