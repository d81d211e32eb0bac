//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod batch;
pub mod camera;
pub mod common;
pub mod filter;
pub mod geometry;
pub mod image;
pub mod image_io;
pub mod light;
pub mod parallel;
pub mod pipeline;
pub mod ray;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod settings;
pub mod shader;
pub mod shape;
pub mod spectrum;
pub mod texture;
