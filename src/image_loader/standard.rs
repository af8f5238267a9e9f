use super::ImageLoaderBackend;
use crate::core::{ColorLayout, ImageHeader};
use crate::storage::ImageSource;
use anyhow::{Context, Result};
use image::{ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;

/// `image` クレートによる標準的な画像ローダー実装
#[derive(Clone, Debug, Default)]
pub struct StandardImageLoader;

impl StandardImageLoader {
    pub fn new() -> Self {
        Self
    }

    /// 拡張子をヒントにしつつ、内容からフォーマットを推定したリーダーを作る
    fn reader(
        path: &Path,
        source: Box<dyn ImageSource>,
    ) -> Result<ImageReader<Box<dyn ImageSource>>> {
        let mut reader = ImageReader::new(source);
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }

        reader
            .with_guessed_format()
            .with_context(|| format!("Failed to read image signature: {}", path.display()))
    }
}

impl ImageLoaderBackend for StandardImageLoader {
    fn read_header(&self, path: &Path, source: Box<dyn ImageSource>) -> Result<ImageHeader> {
        let reader = Self::reader(path, source)?;
        let format = reader.format();

        let decoder = reader
            .into_decoder()
            .with_context(|| format!("Failed to decode image header: {}", path.display()))?;
        let (width, height) = decoder.dimensions();

        Ok(ImageHeader {
            width,
            height,
            format,
            color: ColorLayout::from_color_type(decoder.color_type()),
        })
    }

    fn decode_full(&self, path: &Path, source: Box<dyn ImageSource>) -> Result<ImageHeader> {
        let reader = Self::reader(path, source)?;
        let format = reader.format();

        let image = reader
            .decode()
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;

        Ok(ImageHeader {
            width: image.width(),
            height: image.height(),
            format,
            color: ColorLayout::from_color_type(image.color()),
        })
    }

    fn strategy_name(&self) -> &'static str {
        "Standard"
    }
}
