//! Image preprocessing and the EfficientNet classifier backing `/predict`

use crate::error::GatewayError;
use image::GenericImageView;
use std::path::Path;
use tch::nn::{self, ModuleT};
use tch::vision::efficientnet;
use tch::{no_grad, Device, Tensor};

/// Side length of the square model input
pub const CROP_DIM: u32 = 224;

/// Target length of the shorter image side before cropping
const RESIZE_DIM: u32 = 256;

const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode raw image bytes into a normalized `[1, 3, 224, 224]` float tensor.
///
/// Resizes so the shorter side is exactly 256 px (aspect preserved), center
/// crops to 224x224, scales to `[0, 1]` and applies the per-channel ImageNet
/// normalization the network was trained with.
pub fn preprocess(bytes: &[u8]) -> Result<Tensor, GatewayError> {
    let img = image::load_from_memory(bytes).map_err(|e| GatewayError::Decode(e.to_string()))?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(GatewayError::Decode(
            "image has zero width or height".to_string(),
        ));
    }

    // Shorter side -> RESIZE_DIM, the other side scaled proportionally
    let (new_w, new_h) = if width <= height {
        let scaled = (height as f64 * RESIZE_DIM as f64 / width as f64).round() as u32;
        (RESIZE_DIM, scaled)
    } else {
        let scaled = (width as f64 * RESIZE_DIM as f64 / height as f64).round() as u32;
        (scaled, RESIZE_DIM)
    };
    let resized = img.resize_exact(new_w, new_h, image::imageops::FilterType::Triangle);

    let x0 = (new_w - CROP_DIM) / 2;
    let y0 = (new_h - CROP_DIM) / 2;
    let cropped = resized.crop_imm(x0, y0, CROP_DIM, CROP_DIM).to_rgb8();

    let dim = CROP_DIM as usize;
    let mut data = vec![0f32; 3 * dim * dim];
    for (x, y, pixel) in cropped.enumerate_pixels() {
        for c in 0..3 {
            data[c * dim * dim + y as usize * dim + x as usize] =
                (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
        }
    }

    let tensor = Tensor::from_slice(&data).view([1, 3, CROP_DIM as i64, CROP_DIM as i64]);
    Ok(tensor)
}

/// An EfficientNet-B0 classifier with a head sized to the label count.
///
/// Weights are loaded exactly once at startup; after that the model is
/// read-only and every forward pass runs without gradient tracking.
pub struct ImageClassifier {
    vs: nn::VarStore,
    net: Box<dyn ModuleT + Send>,
}

impl std::fmt::Debug for ImageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ImageClassifier {{ device: {:?} }}", self.vs.device())
    }
}

impl ImageClassifier {
    /// Build the network and load its weights from `path`.
    ///
    /// Fails with `WeightsLoad` if the artifact is missing or its tensor
    /// shapes do not match the model's parameters; callers treat that as a
    /// fatal startup condition.
    pub fn load(path: &Path, num_classes: i64) -> Result<Self, GatewayError> {
        let mut vs = nn::VarStore::new(Device::Cpu);
        let net = Box::new(efficientnet::b0(&vs.root(), num_classes));
        vs.load(path).map_err(|source| GatewayError::WeightsLoad {
            path: path.to_path_buf(),
            source,
        })?;
        vs.freeze();
        Ok(ImageClassifier { vs, net })
    }

    /// One forward pass in inference mode, returning per-class scores
    pub fn scores(&self, input: &Tensor) -> Result<Vec<f32>, GatewayError> {
        let input = input.to_device(self.vs.device());
        let output = no_grad(|| self.net.forward_t(&input, false));
        let scores = Vec::<f32>::try_from(&output.squeeze())?;
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_preprocess_shape() {
        for (w, h) in [(640, 480), (480, 640), (256, 256), (50, 300)] {
            let tensor = preprocess(&png_bytes(w, h)).unwrap();
            assert_eq!(tensor.size(), vec![1, 3, 224, 224]);
        }
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let bytes = png_bytes(320, 200);
        let a = preprocess(&bytes).unwrap();
        let b = preprocess(&bytes).unwrap();
        let a = Vec::<f32>::try_from(&a.view([-1])).unwrap();
        let b = Vec::<f32>::try_from(&b.view([-1])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_preprocess_values_are_finite() {
        let tensor = preprocess(&png_bytes(300, 260)).unwrap();
        let values = Vec::<f32>::try_from(&tensor.view([-1])).unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_preprocess_rejects_garbage() {
        let err = preprocess(b"definitely not an image").unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[test]
    fn test_missing_weights_file() {
        let err = ImageClassifier::load(Path::new("/nonexistent/weights.ot"), 4).unwrap_err();
        assert!(matches!(err, GatewayError::WeightsLoad { .. }));
    }
}
