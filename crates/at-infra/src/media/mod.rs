mod image_transform;

pub use image_transform::ImageMediaTransform;
