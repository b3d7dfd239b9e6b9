// Image-based color picker
//
// Backs the drop-an-image color sampling panel: an uploaded image is
// decoded and uniformly scaled down onto a fixed-size canvas, pointer
// moves preview the color under the cursor, and a click hands the
// previewed color to the palette. The palette itself only ever sees hex
// strings, so an OS eyedropper result feeds the same path.
//
// Decode runs off the UI thread; a generation token ties a completed
// decode back to the load request that started it, so a newer load
// supersedes an older one that finishes late.

use image::imageops::FilterType;

/// States of the picker panel. Previewing is the transient
/// pointer-over-canvas state; it never mutates the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Empty,
    HasImage,
    Previewing,
}

/// A decoded, canvas-sized image the picker samples from.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pixels: image::RgbaImage,
}

impl Bitmap {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Uppercase `#RRGGBB` of the pixel at (x, y); None when out of
    /// bounds.
    pub fn sample_at(&self, x: u32, y: u32) -> Option<String> {
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return None;
        }
        let image::Rgba([r, g, b, _]) = *self.pixels.get_pixel(x, y);
        Some(format!("#{:02X}{:02X}{:02X}", r, g, b))
    }
}

/// Decode image bytes and scale the result down to fit within
/// `max_width` x `max_height` (uniform scale, never enlarged).
pub fn decode_bitmap(bytes: &[u8], max_width: u32, max_height: u32) -> Result<Bitmap, String> {
    let img = image::load_from_memory(bytes).map_err(|e| format!("Failed to decode image: {}", e))?;

    let scaled = if img.width() > max_width || img.height() > max_height {
        img.resize(max_width, max_height, FilterType::Lanczos3)
    } else {
        img
    };

    Ok(Bitmap {
        pixels: scaled.to_rgba8(),
    })
}

/// Off-thread decode for use inside UI event callbacks: submitting
/// returns immediately, completion installs via the generation token.
pub async fn decode_bitmap_async(
    bytes: Vec<u8>,
    max_width: u32,
    max_height: u32,
) -> Result<Bitmap, String> {
    tokio::task::spawn_blocking(move || decode_bitmap(&bytes, max_width, max_height))
        .await
        .map_err(|e| format!("Image decode task failed: {}", e))?
}

/// One picker panel: at most one canvas bitmap at a time.
#[derive(Debug, Default)]
pub struct ImagePicker {
    bitmap: Option<Bitmap>,
    preview: Option<String>,
    generation: u64,
}

impl ImagePicker {
    pub fn new() -> Self {
        ImagePicker::default()
    }

    pub fn state(&self) -> PickerState {
        match (&self.bitmap, &self.preview) {
            (None, _) => PickerState::Empty,
            (Some(_), None) => PickerState::HasImage,
            (Some(_), Some(_)) => PickerState::Previewing,
        }
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.bitmap.as_ref()
    }

    /// Color currently under the cursor, if previewing.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Register a new load request. The returned token must accompany
    /// the decoded bitmap to [`finish_load`](Self::finish_load); issuing
    /// a new token invalidates all earlier ones.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Install a decoded bitmap. Returns false (and discards the
    /// bitmap) when a newer load or a clear superseded this request.
    pub fn finish_load(&mut self, generation: u64, bitmap: Bitmap) -> bool {
        if generation != self.generation {
            return false;
        }
        self.bitmap = Some(bitmap);
        self.preview = None;
        true
    }

    /// Pointer move: preview the color under the cursor without
    /// touching the palette.
    pub fn preview_at(&mut self, x: u32, y: u32) -> Option<&str> {
        let hex = self.bitmap.as_ref()?.sample_at(x, y)?;
        self.preview = Some(hex);
        self.preview.as_deref()
    }

    /// Pointer click: resolve the color under the cursor for the caller
    /// to append to the palette, returning the panel to HasImage.
    pub fn pick_at(&mut self, x: u32, y: u32) -> Option<String> {
        let hex = self.bitmap.as_ref()?.sample_at(x, y)?;
        self.preview = None;
        Some(hex)
    }

    /// Discard the canvas bitmap and any preview; in-flight loads from
    /// before the clear are dropped when they complete.
    pub fn clear(&mut self) {
        self.bitmap = None;
        self.preview = None;
        self.generation += 1;
    }
}
