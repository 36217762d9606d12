//! Image utilities: decoding, EXIF orientation, JPEG round-trips and
//! embedding as PDF image XObjects

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, GenericImageView, RgbImage};
use log::debug;
use pdf_writer::{Filter, Pdf, Ref};

use crate::error::{ReportError, ReportResult};
use crate::image_source::ImageSource;
use crate::quality::MAX_QUALITY;

/// Loads captured photos and prepares them for the page
#[derive(Clone)]
pub struct ImageProcessor {
    source: Arc<dyn ImageSource>,
}

impl ImageProcessor {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self { source }
    }

    /// Fetch and decode an image, rotated upright from its EXIF orientation
    pub fn load(&self, locator: &str) -> ReportResult<DynamicImage> {
        let data = self.source.fetch(locator)?;
        decode_image(locator, &data)
    }

    /// Upright pixel dimensions of an image (full decode)
    pub fn dimensions(&self, locator: &str) -> ReportResult<(u32, u32)> {
        self.load(locator).map(|img| img.dimensions())
    }
}

/// Decode encoded image bytes and apply the EXIF orientation tag
pub fn decode_image(locator: &str, data: &[u8]) -> ReportResult<DynamicImage> {
    let img = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ReportError::image_load(locator, format!("failed to read image format: {}", e)))?
        .decode()
        .map_err(|e| ReportError::image_load(locator, format!("failed to decode image: {}", e)))?;
    let orientation = read_exif_orientation(data);
    if orientation != 1 {
        debug!("Image {} carries EXIF orientation {}", locator, orientation);
    }
    Ok(apply_orientation(img, orientation))
}

/// Read the EXIF orientation tag; 1 (upright) when absent or unreadable
pub fn read_exif_orientation(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    let exif = match exif::Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif,
        Err(_) => return 1,
    };
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1)
}

/// Apply an EXIF orientation value to a decoded image
pub fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Composite an image over an opaque white background
pub fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);
    for (src, dst) in rgba.pixels().zip(rgb.pixels_mut()) {
        let alpha = u32::from(src.0[3]);
        for c in 0..3 {
            let value = (u32::from(src.0[c]) * alpha + 255 * (255 - alpha)) / 255;
            dst.0[c] = value as u8;
        }
    }
    rgb
}

/// Encode an image as baseline JPEG at `quality` (1-100)
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> ReportResult<Vec<u8>> {
    let rgb = flatten_on_white(img);
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, MAX_QUALITY));
        encoder
            .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
            .map_err(|e| ReportError::ImageEncode(e.to_string()))?;
    }
    Ok(out)
}

/// Push an image through the lossy codec at `quality` and decode it back
///
/// This is how the engine previews what a photo will weigh in the final
/// document. Quality 100 or more returns the image untouched.
pub fn recompress(img: DynamicImage, quality: u8) -> ReportResult<DynamicImage> {
    if quality >= MAX_QUALITY {
        return Ok(img);
    }
    let jpeg = encode_jpeg(&img, quality)?;
    drop(img);
    image::load_from_memory(&jpeg).map_err(|e| ReportError::ImageEncode(e.to_string()))
}

/// Embed JPEG bytes as a DCT-encoded image XObject
pub fn add_jpeg_to_pdf(pdf: &mut Pdf, image_id: Ref, jpeg: &[u8], width: u32, height: u32) {
    let mut xobject = pdf.image_xobject(image_id, jpeg);
    xobject.filter(Filter::DctDecode);
    xobject.width(width as i32);
    xobject.height(height as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
}

/// Embed an image losslessly (Flate) with an optional soft mask for alpha
///
/// `smask_id` is only used when the image has an alpha channel.
pub fn add_image_to_pdf(pdf: &mut Pdf, img: &DynamicImage, image_id: Ref, smask_id: Ref) {
    let has_alpha = img.color().has_alpha();
    let (width, height) = img.dimensions();

    let (rgb, alpha) = if has_alpha {
        let rgba = img.to_rgba8();
        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        let mut alpha = Vec::with_capacity((width * height) as usize);
        for chunk in rgba.as_raw().chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
            alpha.push(chunk[3]);
        }
        (rgb, Some(alpha))
    } else {
        (img.to_rgb8().into_raw(), None)
    };

    if let Some(alpha) = alpha {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&alpha, 6);
        let mut smask = pdf.image_xobject(smask_id, &compressed);
        smask.filter(Filter::FlateDecode);
        smask.width(width as i32);
        smask.height(height as i32);
        smask.color_space().device_gray();
        smask.bits_per_component(8);
    }

    let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&rgb, 6);
    let mut xobject = pdf.image_xobject(image_id, &compressed);
    xobject.filter(Filter::FlateDecode);
    xobject.width(width as i32);
    xobject.height(height as i32);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    if has_alpha {
        xobject.s_mask(smask_id);
    }
}
