//! Asset Parsing Module
//!
//! Pure data-in/data-out glTF parsing, kept free of scene-graph and GPU
//! concerns so it can run on loader worker threads. The
//! [`loading`](crate::loading) module drives these parsers asynchronously;
//! the viewer binds the results into the scene on the event-loop thread.

pub mod gltf;

pub use gltf::{parse_character, parse_clip, CharacterAsset, NodeDesc, SkinDesc};
