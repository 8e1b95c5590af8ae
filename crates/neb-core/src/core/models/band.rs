use super::image::{Image, ImageKind};
use super::point::{self, Point};
use crate::core::surface::PotentialSurface;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandError {
    #[error("A band needs at least one interior image, got {0}")]
    TooFewImages(usize),

    #[error("Spring constant must be finite and non-negative, got {0}")]
    InvalidSpringConstant(f64),

    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Image {index} is not an interior image of a band with {len} images")]
    NotInterior { index: usize, len: usize },
}

/// An ordered chain of images between two fixed endpoints, bound to a potential surface.
///
/// The band owns `N + 2` images. Index `0` and index `N + 1` are the endpoints and never move;
/// [`update`](Band::update) only ever touches indices `1..=N`.
pub struct Band<'a, S: PotentialSurface + ?Sized> {
    images: Vec<Image>,
    surface: &'a S,
    spring_constant: f64,
}

impl<'a, S: PotentialSurface + ?Sized> Band<'a, S> {
    pub fn new(
        initial: Point,
        terminal: Point,
        surface: &'a S,
        n_images: usize,
        spring_constant: f64,
    ) -> Result<Self, BandError> {
        if !spring_constant.is_finite() || spring_constant < 0.0 {
            return Err(BandError::InvalidSpringConstant(spring_constant));
        }
        if let Some(dim) = surface.dimension() {
            if initial.len() != dim {
                return Err(BandError::DimensionMismatch {
                    context: "initial endpoint",
                    expected: dim,
                    found: initial.len(),
                });
            }
        }
        let images = Self::initialize(initial, terminal, n_images)?;
        Ok(Self {
            images,
            surface,
            spring_constant,
        })
    }

    /// Builds `n_images` interior images by linear interpolation between the two endpoints.
    ///
    /// Interior image `i` sits at `initial + i/(N+1)·(terminal − initial)`.
    pub fn initialize(
        initial: Point,
        terminal: Point,
        n_images: usize,
    ) -> Result<Vec<Image>, BandError> {
        if n_images == 0 {
            return Err(BandError::TooFewImages(n_images));
        }
        if initial.len() != terminal.len() {
            return Err(BandError::DimensionMismatch {
                context: "final endpoint",
                expected: initial.len(),
                found: terminal.len(),
            });
        }

        let segments = (n_images + 1) as f64;
        let mut images = Vec::with_capacity(n_images + 2);
        images.push(Image::endpoint(initial.clone()));
        for i in 1..=n_images {
            let t = i as f64 / segments;
            images.push(Image::mobile(point::lerp(&initial, &terminal, t)));
        }
        images.push(Image::endpoint(terminal));
        Ok(images)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[inline]
    pub fn interior_count(&self) -> usize {
        self.images.len() - 2
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.images[0].dimension()
    }

    #[inline]
    pub fn spring_constant(&self) -> f64 {
        self.spring_constant
    }

    #[inline]
    pub fn surface(&self) -> &'a S {
        self.surface
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn image(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }

    pub fn kinds(&self) -> Vec<ImageKind> {
        self.images.iter().map(|image| image.kind).collect()
    }

    /// Positions of the interior images, in band order.
    pub fn positions(&self) -> Vec<Point> {
        self.images[1..self.images.len() - 1]
            .iter()
            .map(|image| image.position.clone())
            .collect()
    }

    /// Positions of every image, endpoints included.
    pub fn all_positions(&self) -> Vec<Point> {
        self.images
            .iter()
            .map(|image| image.position.clone())
            .collect()
    }

    /// Overwrites the interior positions. Endpoints are never touched.
    pub fn update(&mut self, new_positions: Vec<Point>) -> Result<(), BandError> {
        let interior = self.interior_count();
        if new_positions.len() != interior {
            return Err(BandError::DimensionMismatch {
                context: "interior image count",
                expected: interior,
                found: new_positions.len(),
            });
        }
        let dim = self.dimension();
        if let Some(bad) = new_positions.iter().find(|p| p.len() != dim) {
            return Err(BandError::DimensionMismatch {
                context: "image coordinates",
                expected: dim,
                found: bad.len(),
            });
        }

        for (image, position) in self.images[1..=interior].iter_mut().zip(new_positions) {
            image.position = position;
        }
        Ok(())
    }

    /// Energies of every image (endpoints included) in one batched surface call.
    pub fn energies(&self) -> Vec<f64> {
        self.surface.batched_energy(&self.all_positions())
    }

    /// Gradients of every image, endpoints included.
    pub fn gradients(&self) -> Vec<Point> {
        self.images
            .iter()
            .map(|image| self.surface.gradient(&image.position))
            .collect()
    }

    pub fn reaction_coordinates(&self) -> Vec<f64> {
        point::reaction_coordinates(&self.all_positions())
    }

    /// Index (in full band numbering) of the interior image with the highest energy.
    ///
    /// `energies` must cover every image, endpoints included.
    pub fn highest_interior_image(&self, energies: &[f64]) -> Option<usize> {
        if energies.len() != self.images.len() {
            return None;
        }
        (1..=self.interior_count()).max_by(|&a, &b| {
            energies[a]
                .partial_cmp(&energies[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Marks one interior image as the climbing image; any previous climber becomes mobile.
    pub fn set_climbing(&mut self, index: usize) -> Result<(), BandError> {
        if index == 0 || index >= self.images.len() - 1 {
            return Err(BandError::NotInterior {
                index,
                len: self.images.len(),
            });
        }
        self.clear_climbing();
        self.images[index].kind = ImageKind::Climbing;
        Ok(())
    }

    pub fn clear_climbing(&mut self) {
        for image in self.images.iter_mut().filter(|image| image.is_climbing()) {
            image.kind = ImageKind::Mobile;
        }
    }

    pub fn climbing_image(&self) -> Option<usize> {
        self.images.iter().position(Image::is_climbing)
    }
}

impl<S: PotentialSurface + ?Sized> Clone for Band<'_, S> {
    fn clone(&self) -> Self {
        Self {
            images: self.images.clone(),
            surface: self.surface,
            spring_constant: self.spring_constant,
        }
    }
}

impl<S: PotentialSurface + ?Sized> fmt::Debug for Band<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Band")
            .field("surface", &self.surface.name())
            .field("spring_constant", &self.spring_constant)
            .field("images", &self.images)
            .finish()
    }
}
