//! Mip-chain texture encoder implementation.
//!
//! Provides a `TextureEncoder` that compresses an RGBA image and its
//! reduced-size levels into one raw block stream.

use image::RgbaImage;

use crate::codec::{BlockFormat, IntelCodec};
use crate::image::Image;
use crate::pipeline::{chain_footprint, MipChainPipeline, PipelineConfig, PipelineError};
use crate::texture::{TextureEncoder, TextureError};

/// Raw mip-chain texture encoder.
///
/// # Example
///
/// ```
/// use mipchain::codec::BlockFormat;
/// use mipchain::texture::{MipChainEncoder, TextureEncoder};
///
/// let encoder = MipChainEncoder::new(BlockFormat::Bc7);
///
/// assert_eq!(encoder.extension(), "bc7");
/// assert_eq!(encoder.name(), "Mip chain BC7");
/// ```
#[derive(Debug, Clone)]
pub struct MipChainEncoder {
    format: BlockFormat,
    config: PipelineConfig,
    name: String,
}

impl MipChainEncoder {
    /// Create an encoder with the default pipeline configuration.
    pub fn new(format: BlockFormat) -> Self {
        Self {
            format,
            config: PipelineConfig::default(),
            name: format!("Mip chain {}", format),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn format(&self) -> BlockFormat {
        self.format
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn pipeline(&self) -> MipChainPipeline<IntelCodec> {
        MipChainPipeline::new(IntelCodec::new(self.format), self.config)
    }
}

impl TextureEncoder for MipChainEncoder {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, TextureError> {
        let pipeline = self.pipeline();
        pipeline.validate()?;
        let image = Image::from_rgba_image(image.clone()).map_err(PipelineError::from)?;

        let mut output = vec![0u8; pipeline.required_len(image.width(), image.height())];
        let report = pipeline.run(image, &mut output)?;
        output.truncate(report.total_bytes);
        Ok(output)
    }

    fn expected_size(&self, width: u32, height: u32) -> usize {
        chain_footprint(
            width,
            height,
            self.config.codec.block,
            self.format.block_bytes(),
            self.config.min_dimension,
        )
    }

    fn extension(&self) -> &str {
        self.format.extension()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BlockFootprint, Profile, Quality};
    use std::sync::Arc;

    fn bc(format: BlockFormat) -> MipChainEncoder {
        MipChainEncoder::new(format).with_config(
            PipelineConfig::default()
                .with_quality(Quality::Fastest)
                .with_threads(2),
        )
    }

    #[test]
    fn test_new_defaults() {
        let encoder = MipChainEncoder::new(BlockFormat::Astc);
        assert_eq!(encoder.format(), BlockFormat::Astc);
        assert_eq!(encoder.config().codec.block, BlockFootprint::FOUR_BY_FOUR);
        assert_eq!(encoder.name(), "Mip chain ASTC");
        assert_eq!(encoder.extension(), "astc");
    }

    #[test]
    fn test_expected_size_4096_bc1() {
        let encoder = MipChainEncoder::new(BlockFormat::Bc1);

        // 6 levels: 4096, 2048, 1024, 512, 256, 128
        // 1024² + 512² + 256² + 128² + 64² + 32² blocks × 8 bytes
        assert_eq!(encoder.expected_size(4096, 4096), 11_182_080);
    }

    #[test]
    fn test_expected_size_bc3_doubles_bc1() {
        let bc1 = MipChainEncoder::new(BlockFormat::Bc1);
        let bc3 = MipChainEncoder::new(BlockFormat::Bc3);
        assert_eq!(
            bc3.expected_size(1024, 512),
            bc1.expected_size(1024, 512) * 2
        );
    }

    #[test]
    fn test_expected_size_astc_6x6() {
        let encoder = MipChainEncoder::new(BlockFormat::Astc).with_config(
            PipelineConfig::default().with_block(BlockFootprint::new_2d(6, 6)),
        );
        // 64, 32, 16: 11² + 6² + 3² blocks × 16 bytes
        assert_eq!(encoder.expected_size(64, 64), (121 + 36 + 9) * 16);
    }

    #[test]
    fn test_encode_matches_expected_size() {
        for format in [BlockFormat::Bc1, BlockFormat::Bc3, BlockFormat::Bc7] {
            let encoder = bc(format);
            let data = encoder.encode(&RgbaImage::new(64, 32)).unwrap();
            assert_eq!(data.len(), encoder.expected_size(64, 32), "{}", format);
        }
    }

    #[test]
    fn test_encode_astc_small_image() {
        let encoder = MipChainEncoder::new(BlockFormat::Astc)
            .with_config(PipelineConfig::default().with_threads(1));
        let data = encoder.encode(&RgbaImage::new(4, 4)).unwrap();
        assert_eq!(data.len(), 16);
    }

    #[test]
    fn test_encode_zero_dimensions() {
        let encoder = MipChainEncoder::new(BlockFormat::Bc1);
        let result = encoder.encode(&RgbaImage::new(0, 0));

        match result {
            Err(TextureError::InvalidDimensions { width, height, .. }) => {
                assert_eq!(width, 0);
                assert_eq!(height, 0);
            }
            other => panic!("Expected InvalidDimensions error, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_zero_block_is_config_error() {
        let encoder = MipChainEncoder::new(BlockFormat::Astc)
            .with_config(PipelineConfig::default().with_block(BlockFootprint::new_2d(0, 0)));

        assert_eq!(encoder.expected_size(16, 16), 0);
        let result = encoder.encode(&RgbaImage::new(16, 16));
        assert!(matches!(result, Err(TextureError::UnsupportedFormat(ref msg)) if msg == "block size 0x0"));
    }

    #[test]
    fn test_encode_rejects_hdr_profile() {
        let encoder = MipChainEncoder::new(BlockFormat::Astc)
            .with_config(PipelineConfig::default().with_profile(Profile::Hdr));
        let result = encoder.encode(&RgbaImage::new(8, 8));
        assert!(matches!(result, Err(TextureError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_as_trait_object() {
        let encoder: Arc<dyn TextureEncoder> = Arc::new(MipChainEncoder::new(BlockFormat::Bc1));
        assert_eq!(encoder.extension(), "bc1");
        assert_eq!(encoder.name(), "Mip chain BC1");
        assert_eq!(encoder.expected_size(4096, 4096), 11_182_080);
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MipChainEncoder>();
    }
}
