/// Region used for the face analysis service when none is configured.
pub const DEFAULT_REGION: &str = "eu-central-1";

/// Largest image payload `DetectFaces` accepts as raw bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const DEFAULT_JPEG_QUALITY: u8 = 95;

pub const DEFAULT_CAMERA: &str = "0";

pub const WINDOW_NAME: &str = "output";
pub const QUIT_KEY: char = 'q';

pub const LABEL_FONT_NAME: &str = "NotoSans-Regular.ttf";
pub const LABEL_FONT_URL: &str =
    "https://github.com/notofonts/notofonts.github.io/raw/main/fonts/NotoSans/hinted/ttf/NotoSans-Regular.ttf";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];
