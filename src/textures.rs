//! Planet material textures.
//!
//! The five rock maps load in the background at startup. Natively a
//! worker thread reads and decodes them; in the browser each one is
//! fetched and decoded in a `spawn_local` future. Either way decoded
//! images arrive over an `mpsc` channel that the engine drains once per
//! frame. Missing or broken files only log a warning; the planet keeps
//! the slot's 1×1 fallback.

use std::sync::mpsc;

use crate::error::GalaxyError;

/// One of the planet's material maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Albedo.
    Color,
    /// Height along the normal.
    Displacement,
    /// Tangent-space normal map.
    Normal,
    /// Ambient occlusion.
    AmbientOcclusion,
    /// Roughness (green channel).
    Roughness,
}

impl TextureSlot {
    /// All slots in binding order.
    pub const ALL: [Self; 5] = [
        Self::Color,
        Self::Displacement,
        Self::Normal,
        Self::AmbientOcclusion,
        Self::Roughness,
    ];

    /// Position in [`Self::ALL`], which is also the shader binding.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Color => 0,
            Self::Displacement => 1,
            Self::Normal => 2,
            Self::AmbientOcclusion => 3,
            Self::Roughness => 4,
        }
    }

    /// File name under the texture directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Color => "rock-color.jpg",
            Self::Displacement => "rock-disp.png",
            Self::Normal => "rock-normal.jpg",
            Self::AmbientOcclusion => "rock-occ.jpg",
            Self::Roughness => "rock-rough.jpg",
        }
    }

    /// Neutral pixel used until the real map arrives: white color, AO and
    /// roughness, a flat normal, and zero displacement.
    #[must_use]
    pub fn fallback_pixel(self) -> [u8; 4] {
        match self {
            Self::Color | Self::AmbientOcclusion | Self::Roughness => {
                [255, 255, 255, 255]
            }
            Self::Normal => [128, 128, 255, 255],
            Self::Displacement => [0, 0, 0, 255],
        }
    }
}

/// A decoded RGBA8 image bound for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    /// Destination slot.
    pub slot: TextureSlot,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels.
    pub rgba: Vec<u8>,
}

/// Decode an encoded image (format guessed from its header) to RGBA8.
///
/// # Errors
///
/// Returns [`GalaxyError::Texture`] if the bytes are not a supported
/// image.
pub fn decode(slot: TextureSlot, bytes: &[u8]) -> Result<DecodedTexture, GalaxyError> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(DecodedTexture {
        slot,
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Receiving end of a background texture load.
pub struct TextureLoader {
    rx: mpsc::Receiver<DecodedTexture>,
    finished: bool,
}

impl TextureLoader {
    /// Read and decode every slot from `dir` on a worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::ThreadSpawn`] if the worker cannot start.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn(dir: std::path::PathBuf) -> Result<Self, GalaxyError> {
        let (tx, rx) = mpsc::channel();
        let _ = std::thread::Builder::new()
            .name("texture-loader".into())
            .spawn(move || {
                for slot in TextureSlot::ALL {
                    let path = dir.join(slot.file_name());
                    let loaded = std::fs::read(&path)
                        .map_err(GalaxyError::Io)
                        .and_then(|bytes| decode(slot, &bytes));
                    match loaded {
                        Ok(texture) => {
                            log::debug!(
                                "decoded {} ({}x{})",
                                path.display(),
                                texture.width,
                                texture.height
                            );
                            if tx.send(texture).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            log::warn!("texture {} unavailable: {e}", path.display());
                        }
                    }
                }
            })
            .map_err(GalaxyError::ThreadSpawn)?;
        Ok(Self {
            rx,
            finished: false,
        })
    }

    /// Fetch and decode every slot from `base_url` in browser futures.
    #[cfg(all(feature = "web", target_arch = "wasm32"))]
    #[must_use]
    pub fn fetch(base_url: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        let base = base_url.trim_end_matches('/').to_owned();
        for slot in TextureSlot::ALL {
            let tx = tx.clone();
            let url = format!("{base}/{}", slot.file_name());
            wasm_bindgen_futures::spawn_local(async move {
                let loaded = web_fetch::fetch_bytes(&url)
                    .await
                    .and_then(|bytes| decode(slot, &bytes));
                match loaded {
                    Ok(texture) => {
                        log::debug!("decoded {url}");
                        let _ = tx.send(texture);
                    }
                    Err(e) => log::warn!("texture {url} unavailable: {e}"),
                }
            });
        }
        Self {
            rx,
            finished: false,
        }
    }

    /// Take every texture decoded since the last call.
    pub fn poll(&mut self) -> Vec<DecodedTexture> {
        let mut ready = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(texture) => ready.push(texture),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    self.finished = true;
                    break;
                }
            }
        }
        ready
    }

    /// Whether every load has completed or failed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web_fetch {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    use crate::error::GalaxyError;

    fn js_error(e: wasm_bindgen::JsValue) -> GalaxyError {
        GalaxyError::Texture(format!("{e:?}"))
    }

    pub(super) async fn fetch_bytes(url: &str) -> Result<Vec<u8>, GalaxyError> {
        let window = web_sys::window()
            .ok_or_else(|| GalaxyError::Texture("no window".into()))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        if !response.ok() {
            return Err(GalaxyError::Texture(format!(
                "HTTP {} for {url}",
                response.status()
            )));
        }
        let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
            .await
            .map_err(js_error)?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|i| [i as u8, 10, 20, 255])
            .collect();
        let image = image::RgbaImage::from_raw(width, height, pixels).unwrap();
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn drain_until_finished(loader: &mut TextureLoader) -> Vec<DecodedTexture> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut all = Vec::new();
        while !loader.is_finished() && Instant::now() < deadline {
            all.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        all.extend(loader.poll());
        all
    }

    #[test]
    fn decode_png_to_rgba() {
        let texture = decode(TextureSlot::Color, &png_bytes(3, 2)).unwrap();
        assert_eq!((texture.width, texture.height), (3, 2));
        assert_eq!(texture.rgba.len(), 3 * 2 * 4);
        assert_eq!(&texture.rgba[4..8], &[1, 10, 20, 255]);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = decode(TextureSlot::Normal, b"not an image").unwrap_err();
        assert!(matches!(err, GalaxyError::Texture(_)));
    }

    #[test]
    fn slots_map_to_distinct_files_and_bindings() {
        let names: std::collections::HashSet<_> =
            TextureSlot::ALL.iter().map(|s| s.file_name()).collect();
        assert_eq!(names.len(), 5);
        for (i, slot) in TextureSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
        assert_eq!(TextureSlot::Normal.fallback_pixel(), [128, 128, 255, 255]);
        assert_eq!(TextureSlot::Displacement.fallback_pixel()[0], 0);
    }

    #[test]
    fn missing_directory_finishes_empty() {
        let dir = std::env::temp_dir().join("galaxy-no-such-texture-dir");
        let mut loader = TextureLoader::spawn(dir).unwrap();
        let loaded = drain_until_finished(&mut loader);
        assert!(loaded.is_empty());
        assert!(loader.is_finished());
    }

    #[test]
    fn loads_present_files_and_skips_the_rest() {
        let dir = std::env::temp_dir().join(format!(
            "galaxy-texture-test-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("rock-disp.png"), png_bytes(4, 4)).unwrap();
        std::fs::write(dir.join("rock-occ.jpg"), b"corrupt").unwrap();

        let mut loader = TextureLoader::spawn(dir.clone()).unwrap();
        let loaded = drain_until_finished(&mut loader);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].slot, TextureSlot::Displacement);
        assert_eq!(loaded[0].width, 4);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
