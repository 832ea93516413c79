//! Inputs for the three operation-creation procedures and their parameter bags.
//!
//! A bag is optional. When supplied, omitted fields take the documented
//! defaults; when absent, nothing is stored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_GUIDANCE_SCALE: f64 = 7.5;
pub const DEFAULT_INFERENCE_STEPS: u32 = 50;
pub const DEFAULT_INPAINT_STRENGTH: f64 = 0.8;
pub const DEFAULT_STYLE_STRENGTH: f64 = 0.7;
pub const DEFAULT_MODIFICATION_STRENGTH: f64 = 0.8;

fn default_guidance_scale() -> f64 {
    DEFAULT_GUIDANCE_SCALE
}

fn default_inference_steps() -> u32 {
    DEFAULT_INFERENCE_STEPS
}

fn default_inpaint_strength() -> f64 {
    DEFAULT_INPAINT_STRENGTH
}

fn default_style_strength() -> f64 {
    DEFAULT_STYLE_STRENGTH
}

fn default_modification_strength() -> f64 {
    DEFAULT_MODIFICATION_STRENGTH
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema, Validate)]
pub struct ObjectRemovalParameters {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_inpaint_strength")]
    pub inpaint_strength: f64,
    #[validate(range(min = 1.0, max = 20.0))]
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
}

impl Default for ObjectRemovalParameters {
    fn default() -> Self {
        Self {
            inpaint_strength: DEFAULT_INPAINT_STRENGTH,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema, Validate)]
pub struct StyleTransferParameters {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_style_strength")]
    pub style_strength: f64,
    #[validate(range(min = 1.0, max = 20.0))]
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[validate(range(min = 10, max = 100))]
    #[serde(default = "default_inference_steps")]
    pub num_inference_steps: u32,
}

impl Default for StyleTransferParameters {
    fn default() -> Self {
        Self {
            style_strength: DEFAULT_STYLE_STRENGTH,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            num_inference_steps: DEFAULT_INFERENCE_STEPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema, Validate)]
pub struct ModificationParameters {
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_modification_strength")]
    pub modification_strength: f64,
    #[validate(range(min = 1.0, max = 20.0))]
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[validate(range(min = 10, max = 100))]
    #[serde(default = "default_inference_steps")]
    pub num_inference_steps: u32,
}

impl Default for ModificationParameters {
    fn default() -> Self {
        Self {
            modification_strength: DEFAULT_MODIFICATION_STRENGTH,
            guidance_scale: DEFAULT_GUIDANCE_SCALE,
            num_inference_steps: DEFAULT_INFERENCE_STEPS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct RemoveObjectRequest {
    pub image_id: i32,
    /// Serialized selection of the region to remove.
    #[validate(length(min = 1, message = "Mask data must not be empty"))]
    pub mask_data: String,
    #[validate(nested)]
    pub parameters: Option<ObjectRemovalParameters>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct StyleTransferRequest {
    pub image_id: i32,
    #[validate(length(min = 1, message = "Prompt must not be empty"))]
    pub prompt: String,
    #[validate(nested)]
    pub parameters: Option<StyleTransferParameters>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ModifyImageRequest {
    pub image_id: i32,
    #[validate(length(min = 1, message = "Prompt must not be empty"))]
    pub prompt: String,
    pub mask_data: Option<String>,
    #[validate(nested)]
    pub parameters: Option<ModificationParameters>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct OperationResultRequest {
    pub operation_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct ListOperationsRequest {
    #[serde(default)]
    pub image_id: Option<i32>,
}
