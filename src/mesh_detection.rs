//! Face mesh landmark detection using `ONNX` Runtime.
//!
//! Runs a MediaPipe-topology face mesh model over a square face crop and
//! maps the resulting 468 points back into frame pixel coordinates, packaged
//! as a validated [`LandmarkSet`].

use ndarray::{Array1, Array4, CowArray};
use opencv::core::{Mat, Rect, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

use crate::{
    constants::NUM_MESH_LANDMARKS,
    landmarks::LandmarkSet,
    utils::safe_cast::usize_to_i32,
    Error, Result,
};

/// Mesh model input size (square)
const MESH_INPUT_SIZE: i32 = 192;

/// Coordinates per landmark in the model output (x, y, z; z is discarded)
const COORDS_PER_LANDMARK: usize = 3;

/// Face mesh landmark detector
pub struct MeshDetector {
    session: Session,
    input_size: i32,
}

impl MeshDetector {
    /// Load the mesh model from an `ONNX` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or the runtime
    /// environment cannot be created.
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!(
            "Initializing MeshDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("mesh_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(Error::ModelInput("Model has no inputs".to_string()));
        }
        if session.outputs.is_empty() {
            return Err(Error::ModelOutput("Model has no outputs".to_string()));
        }

        Ok(Self {
            session,
            input_size: MESH_INPUT_SIZE,
        })
    }

    /// Detect the face mesh inside `face_box` of `frame`, returning
    /// landmarks in frame pixel coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the crop, inference, or output validation fails.
    pub fn detect(&self, frame: &Mat, face_box: Rect) -> Result<LandmarkSet> {
        let face_roi = Mat::roi(frame, face_box)?;
        let face_image = face_roi.try_clone()?;

        let input = self.preprocess(&face_image)?;
        let raw = self.forward(input)?;
        self.postprocess(&raw, face_box)
    }

    /// Resize the crop, normalize to [0, 1] and lay it out as NHWC
    #[allow(clippy::cast_sign_loss)] // OpenCV dimensions are positive
    fn preprocess(&self, face_image: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        let mut resized = Mat::default();
        imgproc::resize(
            face_image,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = vec![0.0f32; size * size * channels];
        for row in 0..size {
            for col in 0..size {
                let pixel =
                    float_image.at_2d::<opencv::core::Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                for ch in 0..channels {
                    data[(row * size + col) * channels + ch] = pixel[ch];
                }
            }
        }

        Array4::from_shape_vec((1, size, size, channels), data)
            .map_err(|e| Error::ModelFormat(format!("Failed to create array: {e}")))
    }

    /// Run forward pass through the model
    fn forward(&self, input: Array4<f32>) -> Result<Array1<f32>> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        let mesh_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| Error::ModelOutput("No output from model".to_string()))?;

        let mesh_tensor = mesh_output.try_extract::<f32>()?;
        let mesh_view = mesh_tensor.view();
        let mesh_data = mesh_view
            .as_slice()
            .ok_or_else(|| Error::ModelOutput("Failed to get output data".to_string()))?;

        Ok(Array1::from(mesh_data.to_vec()))
    }

    /// Scale model-space landmarks to the crop, offset by the crop origin,
    /// and validate the count.
    #[allow(clippy::cast_precision_loss)] // Precision loss acceptable for pixel coordinates
    fn postprocess(&self, raw: &Array1<f32>, face_box: Rect) -> Result<LandmarkSet> {
        let expected = NUM_MESH_LANDMARKS * COORDS_PER_LANDMARK;
        if raw.len() < expected {
            return Err(Error::ModelOutput(format!(
                "mesh output has {} values, expected at least {expected}",
                raw.len()
            )));
        }

        let scale_x = face_box.width as f32 / self.input_size as f32;
        let scale_y = face_box.height as f32 / self.input_size as f32;

        let points = (0..NUM_MESH_LANDMARKS)
            .map(|i| {
                let idx = i * COORDS_PER_LANDMARK;
                (
                    face_box.x as f32 + raw[idx] * scale_x,
                    face_box.y as f32 + raw[idx + 1] * scale_y,
                )
            })
            .collect();

        LandmarkSet::new(points)
    }
}
