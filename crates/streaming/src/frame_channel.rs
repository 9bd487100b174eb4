//! Inbound frame delivery with raw and compressed display paths.
//!
//! The channel owns exactly one current frame; each inbound update replaces
//! it wholesale. Exactly one display mode is active at a time — the mode of
//! the most recently received update — and switching hides the previous
//! surface before showing the new one. Event bindings are installed on both
//! surfaces by the embedder up front, so visibility is all that changes here.

use base64::Engine as _;

use crate::sink::{BitmapSurface, ImageSurface, RgbaImage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameDecodeError {
    /// Raw payload length does not match `width * height * 3`.
    SizeMismatch { expected: usize, actual: usize },
    /// Compressed payload is not valid base64 text.
    InvalidEncoding,
}

impl std::fmt::Display for FrameDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameDecodeError::SizeMismatch { expected, actual } => {
                write!(
                    f,
                    "raw frame size mismatch: expected={expected} actual={actual}"
                )
            }
            FrameDecodeError::InvalidEncoding => write!(f, "compressed frame is not valid base64"),
        }
    }
}

impl std::error::Error for FrameDecodeError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisplayMode {
    Raw,
    Compressed,
}

/// The latest complete frame, owned by the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameBuffer {
    Raw(RgbaImage),
    Encoded { data_uri: String },
}

type FrameObserver = Box<dyn FnMut(&FrameBuffer)>;

pub struct FrameChannel {
    bitmap: Box<dyn BitmapSurface>,
    image: Box<dyn ImageSurface>,
    mode: Option<DisplayMode>,
    current: Option<FrameBuffer>,
    observers: Vec<FrameObserver>,
}

impl FrameChannel {
    pub fn new(bitmap: Box<dyn BitmapSurface>, image: Box<dyn ImageSurface>) -> Self {
        Self {
            bitmap,
            image,
            mode: None,
            current: None,
            observers: Vec::new(),
        }
    }

    pub fn mode(&self) -> Option<DisplayMode> {
        self.mode
    }

    pub fn current_frame(&self) -> Option<&FrameBuffer> {
        self.current.as_ref()
    }

    /// Register a frame-ready callback, invoked after every successful
    /// update.
    pub fn subscribe(&mut self, observer: impl FnMut(&FrameBuffer) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Tightly packed RGB triples, expanded to RGBA with alpha forced to 255.
    ///
    /// A size mismatch drops the frame: the previous frame stays displayed
    /// and the error is returned for the caller to log.
    pub fn on_raw_frame(
        &mut self,
        bytes: &[u8],
        width: u32,
        height: u32,
    ) -> Result<(), FrameDecodeError> {
        let expected = width as usize * height as usize * 3;
        if bytes.len() != expected {
            return Err(FrameDecodeError::SizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for rgb in bytes.chunks_exact(3) {
            pixels.extend_from_slice(rgb);
            pixels.push(255);
        }
        let image = RgbaImage {
            width,
            height,
            pixels,
        };

        self.enter_mode(DisplayMode::Raw);
        self.bitmap.present(&image);
        self.current = Some(FrameBuffer::Raw(image));
        self.notify();
        Ok(())
    }

    /// Base64-encoded image payload, handed to the surface's native decoder
    /// as a data URI. No local pixel decoding happens on this path.
    pub fn on_compressed_frame(
        &mut self,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<(), FrameDecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|_| FrameDecodeError::InvalidEncoding)?;
        base64::engine::general_purpose::STANDARD
            .decode(text)
            .map_err(|_| FrameDecodeError::InvalidEncoding)?;

        let data_uri = format!("data:{mime_type};base64,{text}");

        self.enter_mode(DisplayMode::Compressed);
        self.image.present(&data_uri);
        self.current = Some(FrameBuffer::Encoded { data_uri });
        self.notify();
        Ok(())
    }

    fn enter_mode(&mut self, mode: DisplayMode) {
        if self.mode == Some(mode) {
            return;
        }
        match mode {
            DisplayMode::Raw => {
                self.image.set_visible(false);
                self.bitmap.set_visible(true);
            }
            DisplayMode::Compressed => {
                self.bitmap.set_visible(false);
                self.image.set_visible(true);
            }
        }
        self.mode = Some(mode);
    }

    fn notify(&mut self) {
        if let Some(frame) = &self.current {
            for observer in &mut self.observers {
                observer(frame);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{DisplayMode, FrameBuffer, FrameChannel, FrameDecodeError};
    use crate::sink::{BitmapSurface, ImageSurface, RgbaImage};

    #[derive(Debug, Default)]
    struct SurfaceLog {
        visible: Option<bool>,
        presented: usize,
        last_uri: Option<String>,
        last_image: Option<RgbaImage>,
    }

    #[derive(Clone, Default)]
    struct SharedSurface(Rc<RefCell<SurfaceLog>>);

    impl BitmapSurface for SharedSurface {
        fn present(&mut self, image: &RgbaImage) {
            let mut log = self.0.borrow_mut();
            log.presented += 1;
            log.last_image = Some(image.clone());
        }

        fn set_visible(&mut self, visible: bool) {
            self.0.borrow_mut().visible = Some(visible);
        }
    }

    impl ImageSurface for SharedSurface {
        fn present(&mut self, data_uri: &str) {
            let mut log = self.0.borrow_mut();
            log.presented += 1;
            log.last_uri = Some(data_uri.to_string());
        }

        fn set_visible(&mut self, visible: bool) {
            self.0.borrow_mut().visible = Some(visible);
        }
    }

    fn channel() -> (FrameChannel, SharedSurface, SharedSurface) {
        let bitmap = SharedSurface::default();
        let image = SharedSurface::default();
        let channel = FrameChannel::new(Box::new(bitmap.clone()), Box::new(image.clone()));
        (channel, bitmap, image)
    }

    #[test]
    fn raw_rgb_expands_to_rgba() {
        let (mut channel, bitmap, _) = channel();
        let rgb = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 0];
        channel.on_raw_frame(&rgb, 2, 2).unwrap();

        let log = bitmap.0.borrow();
        let image = log.last_image.as_ref().unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(
            image.pixels,
            vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 0, 255]
        );
    }

    #[test]
    fn size_mismatch_drops_frame_and_keeps_previous() {
        let (mut channel, bitmap, _) = channel();
        let good = [1, 2, 3];
        channel.on_raw_frame(&good, 1, 1).unwrap();

        let err = channel.on_raw_frame(&[1, 2, 3, 4], 1, 1).unwrap_err();
        assert_eq!(
            err,
            FrameDecodeError::SizeMismatch {
                expected: 3,
                actual: 4
            }
        );

        // Previous frame still displayed, no second present call.
        assert_eq!(bitmap.0.borrow().presented, 1);
        assert!(matches!(
            channel.current_frame(),
            Some(FrameBuffer::Raw(image)) if image.pixels == vec![1, 2, 3, 255]
        ));
    }

    #[test]
    fn compressed_frame_becomes_data_uri() {
        let (mut channel, _, image) = channel();
        // "hello" in base64.
        channel
            .on_compressed_frame(b"aGVsbG8=", "image/jpeg")
            .unwrap();
        assert_eq!(
            image.0.borrow().last_uri.as_deref(),
            Some("data:image/jpeg;base64,aGVsbG8=")
        );
    }

    #[test]
    fn invalid_base64_is_dropped() {
        let (mut channel, _, image) = channel();
        let err = channel
            .on_compressed_frame(b"!!!not-base64!!!", "image/jpeg")
            .unwrap_err();
        assert_eq!(err, FrameDecodeError::InvalidEncoding);
        assert_eq!(image.0.borrow().presented, 0);
        assert!(channel.current_frame().is_none());
    }

    #[test]
    fn surfaces_are_never_both_visible() {
        let (mut channel, bitmap, image) = channel();

        channel.on_raw_frame(&[9, 9, 9], 1, 1).unwrap();
        assert_eq!(channel.mode(), Some(DisplayMode::Raw));
        assert_eq!(bitmap.0.borrow().visible, Some(true));
        assert_eq!(image.0.borrow().visible, Some(false));

        channel.on_compressed_frame(b"aGVsbG8=", "image/png").unwrap();
        assert_eq!(channel.mode(), Some(DisplayMode::Compressed));
        assert_eq!(bitmap.0.borrow().visible, Some(false));
        assert_eq!(image.0.borrow().visible, Some(true));

        channel.on_raw_frame(&[9, 9, 9], 1, 1).unwrap();
        assert_eq!(bitmap.0.borrow().visible, Some(true));
        assert_eq!(image.0.borrow().visible, Some(false));
    }

    #[test]
    fn observers_fire_on_every_successful_update() {
        let (mut channel, _, _) = channel();
        let seen = Rc::new(RefCell::new(0usize));
        let seen_obs = Rc::clone(&seen);
        channel.subscribe(move |_| *seen_obs.borrow_mut() += 1);

        channel.on_raw_frame(&[1, 2, 3], 1, 1).unwrap();
        channel.on_compressed_frame(b"aGVsbG8=", "image/jpeg").unwrap();
        let _ = channel.on_raw_frame(&[1], 1, 1);

        assert_eq!(*seen.borrow(), 2);
    }
}
