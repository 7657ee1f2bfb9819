//! Database operations local to the fanshelf-ui service

pub mod settings;
