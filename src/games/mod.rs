//! Minigames playable from inside the world.

pub mod hangman;

pub use hangman::Hangman;
