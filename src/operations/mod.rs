//! Operations module provides functionality for interacting with Reddit

pub mod posts;
