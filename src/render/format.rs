use crate::foundation::error::{OrbitsetError, OrbitsetResult};

/// Image container written for each frame.
///
/// Parsed case-insensitively from the config (`"PNG"`, `"JPEG"`, ...), mirroring the format
/// names of common DCC render settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ImageFormat {
    /// Lossless PNG.
    #[default]
    Png,
    /// Baseline JPEG (alpha is dropped).
    Jpeg,
    /// Windows bitmap.
    Bmp,
    /// TIFF.
    Tiff,
    /// Truevision TGA.
    Targa,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tif",
            ImageFormat::Targa => "tga",
        }
    }

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Targa => "TARGA",
        }
    }

    /// Matching `image` crate encoder format.
    pub fn encoder(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Targa => image::ImageFormat::Tga,
        }
    }

    /// Whether the container stores an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ImageFormat::Jpeg | ImageFormat::Bmp)
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = OrbitsetError;

    fn from_str(s: &str) -> OrbitsetResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PNG" => Ok(ImageFormat::Png),
            "JPEG" | "JPG" => Ok(ImageFormat::Jpeg),
            "BMP" => Ok(ImageFormat::Bmp),
            "TIFF" | "TIF" => Ok(ImageFormat::Tiff),
            "TARGA" | "TGA" => Ok(ImageFormat::Targa),
            other => Err(OrbitsetError::config(format!(
                "unsupported output.format '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for ImageFormat {
    type Error = OrbitsetError;

    fn try_from(s: String) -> OrbitsetResult<Self> {
        s.parse()
    }
}

impl From<ImageFormat> for String {
    fn from(f: ImageFormat) -> Self {
        f.name().to_string()
    }
}
