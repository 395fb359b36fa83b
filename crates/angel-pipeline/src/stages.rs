//! # Decorative Stages
//!
//! Capabilities the pipeline calls after an identity has been dispatched.
//! They carry no correctness contract: the enhancer's output is not used
//! by the verifiable core, and a renderer failure is logged and dropped.

use angel_core::Signature;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric projection of a signature: each byte reduced modulo 255.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IdentityState {
    components: Vec<f64>,
}

impl IdentityState {
    /// Project `signature` into one component per byte.
    pub fn from_signature(signature: &Signature) -> Self {
        Self {
            components: signature
                .as_bytes()
                .iter()
                .map(|b| f64::from(b % 255))
                .collect(),
        }
    }

    /// Wrap components produced by an enhancer.
    pub fn from_components(components: Vec<f64>) -> Self {
        Self { components }
    }

    pub fn components(&self) -> &[f64] {
        &self.components
    }

    pub fn dimension(&self) -> usize {
        self.components.len()
    }
}

/// Output of a [`Renderer`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderArtifact {
    /// Renderer-defined label, e.g. the output medium.
    pub kind: String,
    /// Rendered values.
    pub values: Vec<f64>,
}

/// A renderer could not produce its artifact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

/// Transforms an identity's numeric state.
pub trait Enhancer: Send + Sync {
    fn enhance(&self, state: IdentityState) -> IdentityState;
}

/// Renders an identity. Fire-and-forget from the pipeline's point of view.
pub trait Renderer: Send + Sync {
    fn render(&self, signature: &Signature) -> Result<RenderArtifact, RenderError>;
}

/// Returns the state unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEnhancer;

impl Enhancer for NoopEnhancer {
    fn enhance(&self, state: IdentityState) -> IdentityState {
        state
    }
}

/// Produces an empty artifact.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&self, _signature: &Signature) -> Result<RenderArtifact, RenderError> {
        Ok(RenderArtifact {
            kind: "noop".to_string(),
            values: Vec::new(),
        })
    }
}

/// Fixed-width affine map: `out[i] = in[i % len] * scale + offset`.
///
/// Stands in for a learned transform. An empty state maps to an empty
/// state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineEnhancer {
    /// Number of output components.
    pub output_size: usize,
    pub scale: f64,
    pub offset: f64,
}

impl AffineEnhancer {
    /// Default coefficients.
    pub const SCALE: f64 = 0.5;
    pub const OFFSET: f64 = 0.3;

    pub fn new(output_size: usize) -> Self {
        Self {
            output_size,
            scale: Self::SCALE,
            offset: Self::OFFSET,
        }
    }
}

impl Enhancer for AffineEnhancer {
    fn enhance(&self, state: IdentityState) -> IdentityState {
        let input = state.components();
        if input.is_empty() {
            return IdentityState::default();
        }
        let components = (0..self.output_size)
            .map(|i| input[i % input.len()] * self.scale + self.offset)
            .collect();
        IdentityState::from_components(components)
    }
}

/// Projects the signature's `% 255` vector through a `dim × dim` matrix.
///
/// Only the first `dim` signature components take part; a shorter
/// signature is padded with zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRenderer {
    dim: usize,
    /// Row-major, `dim * dim` entries.
    matrix: Vec<f64>,
}

impl ProjectionRenderer {
    /// Renderer with a matrix drawn uniformly from `[0, 1)`.
    pub fn random(dim: usize) -> Self {
        let mut rng = rand::thread_rng();
        let matrix = (0..dim * dim).map(|_| rng.gen::<f64>()).collect();
        Self { dim, matrix }
    }

    /// Renderer with a caller-supplied row-major matrix.
    ///
    /// # Errors
    ///
    /// `RenderError` if `matrix` does not have `dim * dim` entries.
    pub fn with_matrix(dim: usize, matrix: Vec<f64>) -> Result<Self, RenderError> {
        if matrix.len() != dim * dim {
            return Err(RenderError(format!(
                "projection matrix has {} entries, expected {}",
                matrix.len(),
                dim * dim
            )));
        }
        Ok(Self { dim, matrix })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl Renderer for ProjectionRenderer {
    fn render(&self, signature: &Signature) -> Result<RenderArtifact, RenderError> {
        let state = IdentityState::from_signature(signature);
        let v = state.components();
        let values = self
            .matrix
            .chunks(self.dim.max(1))
            .take(self.dim)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, m)| m * v.get(j).copied().unwrap_or(0.0))
                    .sum::<f64>()
            })
            .collect();
        Ok(RenderArtifact {
            kind: format!("projection-{}d", self.dim),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_reduces_modulo_255() {
        let sig = Signature::from_bytes(vec![0u8, 1, 254, 255]);
        let state = IdentityState::from_signature(&sig);
        assert_eq!(state.components(), &[0.0, 1.0, 254.0, 0.0]);
        assert_eq!(state.dimension(), 4);
    }

    #[test]
    fn test_projection_of_ascii() {
        let state = IdentityState::from_signature(&Signature::from_bytes(b"id".to_vec()));
        assert_eq!(state.components(), &[105.0, 100.0]);
    }

    #[test]
    fn test_empty_signature_projects_to_empty_state() {
        let state = IdentityState::from_signature(&Signature::default());
        assert_eq!(state.dimension(), 0);
    }

    #[test]
    fn test_noop_enhancer_is_identity() {
        let state = IdentityState::from_components(vec![1.5, 2.5]);
        assert_eq!(NoopEnhancer.enhance(state.clone()), state);
    }

    #[test]
    fn test_affine_enhancer_cycles_input() {
        let state = IdentityState::from_components(vec![2.0, 4.0]);
        let out = AffineEnhancer::new(3).enhance(state);
        assert_eq!(out.components(), &[1.3, 2.3, 1.3]);
    }

    #[test]
    fn test_affine_enhancer_empty_input() {
        let out = AffineEnhancer::new(10).enhance(IdentityState::default());
        assert_eq!(out.dimension(), 0);
    }

    #[test]
    fn test_projection_identity_matrix() {
        let renderer =
            ProjectionRenderer::with_matrix(2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let artifact = renderer
            .render(&Signature::from_bytes(b"id-alpha".to_vec()))
            .unwrap();
        assert_eq!(artifact.kind, "projection-2d");
        assert_eq!(artifact.values, vec![105.0, 100.0]);
    }

    #[test]
    fn test_projection_pads_short_signature() {
        let renderer = ProjectionRenderer::with_matrix(3, vec![1.0; 9]).unwrap();
        let artifact = renderer.render(&Signature::from_bytes(vec![10u8])).unwrap();
        assert_eq!(artifact.values, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_projection_rejects_wrong_matrix_size() {
        assert!(ProjectionRenderer::with_matrix(2, vec![1.0; 3]).is_err());
    }

    #[test]
    fn test_random_projection_shape() {
        let renderer = ProjectionRenderer::random(5);
        assert_eq!(renderer.dim(), 5);
        let artifact = renderer
            .render(&Signature::from_bytes(b"id-alpha-001".to_vec()))
            .unwrap();
        assert_eq!(artifact.values.len(), 5);
        assert!(artifact.values.iter().all(|v| *v >= 0.0));
    }

    #[test]
    fn test_noop_renderer_succeeds() {
        let artifact = NoopRenderer.render(&Signature::default()).unwrap();
        assert_eq!(artifact.kind, "noop");
        assert!(artifact.values.is_empty());
    }
}
