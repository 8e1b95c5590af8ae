use super::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an image within the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageKind {
    /// One of the two fixed ends of the band.
    Endpoint,
    /// A regular interior image, relaxed with the nudged force.
    Mobile,
    /// An interior image driven uphill along the tangent onto the saddle point.
    Climbing,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Endpoint => "endpoint",
            ImageKind::Mobile => "mobile",
            ImageKind::Climbing => "climbing",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub position: Point,
    pub kind: ImageKind,
}

impl Image {
    pub fn endpoint(position: Point) -> Self {
        Self {
            position,
            kind: ImageKind::Endpoint,
        }
    }

    pub fn mobile(position: Point) -> Self {
        Self {
            position,
            kind: ImageKind::Mobile,
        }
    }

    #[inline]
    pub fn is_endpoint(&self) -> bool {
        self.kind == ImageKind::Endpoint
    }

    #[inline]
    pub fn is_climbing(&self) -> bool {
        self.kind == ImageKind::Climbing
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.position.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::point::point_from;

    #[test]
    fn constructors_assign_expected_kinds() {
        let end = Image::endpoint(point_from(&[0.0, 1.0]));
        let mobile = Image::mobile(point_from(&[0.5, 1.0]));
        assert!(end.is_endpoint());
        assert!(!end.is_climbing());
        assert!(!mobile.is_endpoint());
        assert_eq!(mobile.kind, ImageKind::Mobile);
        assert_eq!(mobile.dimension(), 2);
    }

    #[test]
    fn kind_display_uses_kebab_case_names() {
        assert_eq!(ImageKind::Endpoint.to_string(), "endpoint");
        assert_eq!(ImageKind::Climbing.to_string(), "climbing");
    }
}
