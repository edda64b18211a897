//! Error Types
//!
//! This module defines the error types used throughout the viewer.
//!
//! # Overview
//!
//! The main error type [`VitrineError`] covers all failure modes including:
//! - GPU initialization failures
//! - Asset loading and decoding errors
//! - Window and event loop errors
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, VitrineError>`.

use thiserror::Error;

/// The main error type for the viewer.
#[derive(Error, Debug)]
pub enum VitrineError {
    // ========================================================================
    // GPU & Rendering Errors
    // ========================================================================
    /// Failed to request a compatible GPU adapter or surface.
    #[error("Failed to request WGPU adapter: {0}")]
    AdapterRequestFailed(String),

    /// Failed to create the GPU device.
    #[error("Failed to create WGPU device: {0}")]
    DeviceCreateFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to acquire the next surface frame.
    #[error("Failed to acquire surface frame: {0}")]
    SurfaceError(#[from] wgpu::SurfaceError),

    /// Window system error.
    #[error("Window system error: {0}")]
    WindowError(#[from] raw_window_handle::HandleError),

    /// Event loop error (winit).
    #[error("Event loop error: {0}")]
    EventLoopError(#[from] winit::error::EventLoopError),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The requested asset was not found or is missing a required part.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// glTF parsing or loading error.
    #[error("glTF error: {0}")]
    GltfError(String),

    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecodeError(String),
}

impl From<gltf::Error> for VitrineError {
    fn from(err: gltf::Error) -> Self {
        VitrineError::GltfError(err.to_string())
    }
}

impl From<image::ImageError> for VitrineError {
    fn from(err: image::ImageError) -> Self {
        VitrineError::ImageDecodeError(err.to_string())
    }
}

/// Alias for `Result<T, VitrineError>`.
pub type Result<T> = std::result::Result<T, VitrineError>;
