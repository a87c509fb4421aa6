//! Single-face detection using `ONNX` Runtime.
//!
//! Runs an SCRFD-style anchor-based detector and keeps only the
//! highest-scoring candidate. Multi-face handling is out of scope, which
//! lets the postprocessing collapse to an argmax over threshold-filtered
//! scores instead of full non-maximum suppression.

use ndarray::{Array2, Array4, CowArray};
use opencv::core::{Mat, Rect, Scalar, Size, CV_32F, CV_8UC3};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::{
    constants::{IMAGE_NORMALIZATION_OFFSET, IMAGE_NORMALIZATION_SCALE},
    Error, Result,
};

/// Feature-map strides of the detection head
const STRIDES: [i32; 3] = [8, 16, 32];

/// Anchors per feature-map cell
const NUM_ANCHORS: usize = 2;

/// Best face found in a frame
#[derive(Debug, Clone)]
pub struct FaceDetection {
    /// Bounding box in frame pixel coordinates
    pub bbox: Rect,
    /// Confidence score of the detection
    pub score: f32,
}

/// Anchor-based face detector returning at most one face per frame
pub struct FaceDetector {
    session: Session,
    input_size: (i32, i32),
    conf_threshold: f32,
    center_cache: HashMap<(i32, i32, i32), Array2<f32>>,
}

impl FaceDetector {
    /// Load the detector from an `ONNX` model file.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or has no inputs.
    pub fn new<P: AsRef<Path>>(model_path: P, conf_threshold: f32) -> Result<Self> {
        log::info!(
            "Initializing FaceDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("face_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input_meta = session
            .inputs
            .first()
            .ok_or_else(|| Error::ModelInput("Model has no inputs".to_string()))?;

        // Shape is [batch, channels, height, width]
        let input_size = if input_meta.dimensions.len() >= 4 {
            let height = input_meta.dimensions[2].unwrap_or(640) as i32;
            let width = input_meta.dimensions[3].unwrap_or(640) as i32;
            (width, height)
        } else {
            (640, 640)
        };

        Ok(Self {
            session,
            input_size,
            conf_threshold,
            center_cache: HashMap::new(),
        })
    }

    /// Detect the most confident face in a frame, if any clears the
    /// confidence threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails.
    pub fn detect_primary(&mut self, image: &Mat) -> Result<Option<FaceDetection>> {
        let img_width = image.cols();
        let img_height = image.rows();
        let (input_width, input_height) = self.input_size;

        // Letterbox: scale to fit, pad the remainder with black
        let ratio_img = img_height as f32 / img_width as f32;
        let ratio_model = input_height as f32 / input_width as f32;
        let (new_width, new_height) = if ratio_img > ratio_model {
            (((input_height as f32) / ratio_img) as i32, input_height)
        } else {
            (input_width, ((input_width as f32) * ratio_img) as i32)
        };
        let det_scale = new_height as f32 / img_height as f32;

        let mut resized = Mat::default();
        imgproc::resize(
            image,
            &mut resized,
            Size::new(new_width, new_height),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut det_img =
            Mat::new_rows_cols_with_default(input_height, input_width, CV_8UC3, Scalar::all(0.0))?;
        let mut roi = det_img.roi_mut(Rect::new(0, 0, new_width, new_height))?;
        resized.copy_to(&mut roi)?;

        let inputs = self.preprocess(&det_img)?;
        let best = self.forward(inputs)?;

        Ok(best.map(|(score, raw)| {
            let x1 = raw[0] / det_scale;
            let y1 = raw[1] / det_scale;
            let x2 = raw[2] / det_scale;
            let y2 = raw[3] / det_scale;
            FaceDetection {
                bbox: Rect::new(
                    x1.max(0.0) as i32,
                    y1.max(0.0) as i32,
                    ((x2 - x1).max(1.0) as i32).min(img_width),
                    ((y2 - y1).max(1.0) as i32).min(img_height),
                ),
                score,
            }
        }))
    }

    /// Normalize the padded frame and lay it out as NCHW
    fn preprocess(&self, image: &Mat) -> Result<Array4<f32>> {
        let mut rgb_image = Mat::default();
        imgproc::cvt_color(image, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0, 0.0)?;

        let height = float_image.rows() as usize;
        let width = float_image.cols() as usize;
        let channels = 3;

        let mut data = vec![0.0f32; height * width * channels];
        for row in 0..height {
            for col in 0..width {
                let pixel = float_image.at_2d::<opencv::core::Vec3f>(row as i32, col as i32)?;
                for ch in 0..channels {
                    data[(row * width + col) * channels + ch] =
                        (pixel[ch] - IMAGE_NORMALIZATION_OFFSET) / IMAGE_NORMALIZATION_SCALE;
                }
            }
        }

        let array = Array4::from_shape_vec((1, height, width, channels), data)
            .map_err(|e| Error::ModelFormat(format!("Failed to create array: {e}")))?;
        Ok(array.permuted_axes([0, 3, 1, 2]))
    }

    /// Run inference and return the best `(score, [x1, y1, x2, y2])`
    /// candidate over all strides, in padded-input coordinates.
    fn forward(&mut self, inputs: Array4<f32>) -> Result<Option<(f32, [f32; 4])>> {
        let input_height = inputs.shape()[2] as i32;
        let input_width = inputs.shape()[3] as i32;

        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;
        let outputs = self.session.run(vec![input_tensor])?;

        // Outputs are grouped as [scores x strides, bboxes x strides]
        let mut best: Option<(f32, [f32; 4])> = None;

        for (idx, &stride) in STRIDES.iter().enumerate() {
            let scores_output = outputs[idx].try_extract::<f32>()?;
            let scores_view = scores_output.view();
            let scores = scores_view
                .as_slice()
                .ok_or_else(|| Error::ModelOutput("Failed to read score tensor".to_string()))?;

            let bbox_output = outputs[idx + STRIDES.len()].try_extract::<f32>()?;
            let bbox_view = bbox_output.view();
            let distances = bbox_view
                .as_slice()
                .ok_or_else(|| Error::ModelOutput("Failed to read bbox tensor".to_string()))?;

            let centers = self.anchor_centers(input_height / stride, input_width / stride, stride);

            for (i, &score) in scores.iter().enumerate() {
                if score < self.conf_threshold {
                    continue;
                }
                if best.is_some_and(|(s, _)| s >= score) {
                    continue;
                }
                if i >= centers.shape()[0] || (i + 1) * 4 > distances.len() {
                    break;
                }
                let cx = centers[[i, 0]];
                let cy = centers[[i, 1]];
                let d = &distances[i * 4..(i + 1) * 4];
                best = Some((
                    score,
                    [
                        cx - d[0] * stride as f32,
                        cy - d[1] * stride as f32,
                        cx + d[2] * stride as f32,
                        cy + d[3] * stride as f32,
                    ],
                ));
            }
        }

        Ok(best)
    }

    /// Anchor centers for one feature map, cached per (height, width, stride)
    fn anchor_centers(&mut self, height: i32, width: i32, stride: i32) -> Array2<f32> {
        let key = (height, width, stride);
        if let Some(centers) = self.center_cache.get(&key) {
            return centers.clone();
        }

        let mut data = Vec::with_capacity((height * width) as usize * NUM_ANCHORS * 2);
        for y in 0..height {
            for x in 0..width {
                for _ in 0..NUM_ANCHORS {
                    data.push((x * stride) as f32);
                    data.push((y * stride) as f32);
                }
            }
        }

        let n_points = (height * width) as usize * NUM_ANCHORS;
        let centers = Array2::from_shape_vec((n_points, 2), data)
            .expect("anchor center layout is (n, 2) by construction");

        if self.center_cache.len() < 100 {
            self.center_cache.insert(key, centers.clone());
        }
        centers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_configuration() {
        assert_eq!(STRIDES.len(), 3);
        assert_eq!(NUM_ANCHORS, 2);
    }

    #[test]
    fn anchor_center_layout() {
        // replicate the generation logic for a 2x2 grid at stride 8
        let mut data = Vec::new();
        for y in 0..2 {
            for x in 0..2 {
                for _ in 0..NUM_ANCHORS {
                    data.push((x * 8) as f32);
                    data.push((y * 8) as f32);
                }
            }
        }
        let centers = Array2::from_shape_vec((8, 2), data).unwrap();
        assert_eq!(centers[[0, 0]], 0.0);
        assert_eq!(centers[[2, 0]], 8.0);
        assert_eq!(centers[[4, 1]], 8.0);
    }
}
