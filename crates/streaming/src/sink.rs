//! Sink traits implemented by the embedder's display layer.

/// Decoded RGBA bitmap, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Surface that blits decoded pixels (the bitmap canvas path).
pub trait BitmapSurface {
    fn present(&mut self, image: &RgbaImage);
    fn set_visible(&mut self, visible: bool);
}

/// Surface whose native decoder accepts an encoded data URI (the image
/// element path).
pub trait ImageSurface {
    fn present(&mut self, data_uri: &str);
    fn set_visible(&mut self, visible: bool);
}

/// Downstream decoder fed by the stream assembler.
///
/// `is_consuming` is the back-pressure signal: while it returns true the
/// assembler keeps buffering instead of handing over data.
pub trait StreamSink {
    /// True while the sink is mid-update and cannot accept another buffer.
    fn is_consuming(&self) -> bool;

    /// Accept one contiguous buffer. Only called when `is_consuming` is false.
    fn consume(&mut self, data: Vec<u8>);

    fn is_playing(&self) -> bool;

    /// Start playback. Starting an already-playing sink is a no-op.
    fn play(&mut self);
}
