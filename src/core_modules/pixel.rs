// THEORY:
// The `pixel` module holds the two per-pixel transforms at either end of the
// convolution: RGB to a single gray channel on the way in, and gray back to a
// displayable RGB triple on the way out. Both are pure and stateless; they
// never look at neighbors and never look at time.
//
// The gray formula is not a perceptual luma. Each channel is divided by 8 with
// truncation and the three results are summed, so gray values stay within
// 0..=93 and the edge threshold is tuned to that range.
//
// It also owns the 24-bit stream word: the packed form a pixel takes on the
// video transport, red in the low byte and blue in the high byte.

pub mod pixel {
    use image::{GrayImage, Luma, Rgb, RgbImage};

    pub type Channel = u8;
    pub type RgbPixel = Rgb<Channel>;
    pub type GrayPixel = Luma<Channel>;
    /// A transport word carrying one RGB pixel in its low 24 bits.
    pub type VideoWord = u32;

    const CHANNEL_DIVISOR: Channel = 8;
    const CHANNEL_MASK: VideoWord = 0xFF;

    /// Grayscale intensity: `R/8 + G/8 + B/8` with truncating division.
    pub fn to_gray(pixel: &RgbPixel) -> GrayPixel {
        let [red, green, blue] = pixel.0;
        Luma([red / CHANNEL_DIVISOR + green / CHANNEL_DIVISOR + blue / CHANNEL_DIVISOR])
    }

    /// Replicates a gray value across all three channels.
    pub fn expand(pixel: &GrayPixel) -> RgbPixel {
        let [value] = pixel.0;
        Rgb([value, value, value])
    }

    pub fn rgb_to_gray(frame: &RgbImage) -> GrayImage {
        let (width, height) = frame.dimensions();
        GrayImage::from_fn(width, height, |x, y| to_gray(frame.get_pixel(x, y)))
    }

    pub fn gray_to_rgb(frame: &GrayImage) -> RgbImage {
        let (width, height) = frame.dimensions();
        RgbImage::from_fn(width, height, |x, y| expand(frame.get_pixel(x, y)))
    }

    /// Packs a pixel into a stream word (red bits 7:0, green 15:8, blue 23:16).
    pub fn pack(pixel: &RgbPixel) -> VideoWord {
        let [red, green, blue] = pixel.0;
        VideoWord::from(red) | (VideoWord::from(green) << 8) | (VideoWord::from(blue) << 16)
    }

    /// Unpacks a stream word. Bits above 23 are sideband and ignored.
    pub fn unpack(word: VideoWord) -> RgbPixel {
        Rgb([
            (word & CHANNEL_MASK) as Channel,
            ((word >> 8) & CHANNEL_MASK) as Channel,
            ((word >> 16) & CHANNEL_MASK) as Channel,
        ])
    }
}
