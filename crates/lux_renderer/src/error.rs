//! Error types for scene construction and texture loading.
//!
//! Rendering queries never fail; only building a scene can.

use thiserror::Error;

/// Errors raised while assembling a scene. These indicate an authoring
/// bug, not a transient condition.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("cannot build a bounding volume hierarchy from an empty object list")]
    EmptyObjectList,

    #[error("object has no bounding box over the requested time interval")]
    MissingBoundingBox,
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Errors that can occur while loading an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),
}
