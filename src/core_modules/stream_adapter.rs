// THEORY:
// Stream adapters sit on the boundary between the video transport and the
// dense per-frame containers. They never touch pixel values; their whole
// contract is order and count. Exactly `W * H` pixels go in per frame, in
// raster order, and exactly `W * H` come out.
//
// A frame with the wrong pixel count is a fatal error for that frame. It is
// detected here, before anything reaches the window engine, which has no way
// to notice a short frame on its own.
//
// Two transports are supported: a stream of 24-bit pixel words (one word per
// pixel, as produced by the video front end) and a flat interleaved RGB byte
// buffer (what most capture and decode libraries hand out).

use crate::core_modules::geometry::FrameGeometry;
use crate::core_modules::pixel::pixel::{VideoWord, pack, unpack};
use crate::error::{FrameError, Result};
use image::RgbImage;
use tracing::warn;

const BYTES_PER_PIXEL: usize = 3;

/// Reads exactly one frame of pixel words from `stream`.
///
/// Words past the frame are left in the stream for the next call.
pub fn read_frame<I>(stream: &mut I, geometry: &FrameGeometry) -> Result<RgbImage>
where
    I: Iterator<Item = VideoWord>,
{
    let expected = geometry.pixel_count();
    let mut frame = RgbImage::new(geometry.width(), geometry.height());
    let mut received = 0usize;

    for (slot, word) in frame.pixels_mut().zip(stream.by_ref()) {
        *slot = unpack(word);
        received += 1;
    }

    if received < expected {
        warn!(expected, received, "dropping truncated frame");
        return Err(FrameError::Truncated { expected, received });
    }
    Ok(frame)
}

/// Writes every pixel of `frame` into `sink` as a stream word, in raster order.
pub fn write_frame<S>(frame: &RgbImage, geometry: &FrameGeometry, sink: &mut S) -> Result<usize>
where
    S: Extend<VideoWord>,
{
    geometry.check_dimensions(frame.dimensions())?;
    sink.extend(frame.pixels().map(pack));
    Ok(geometry.pixel_count())
}

/// Wraps a flat `R, G, B, R, G, B, ...` buffer holding exactly one frame.
pub fn frame_from_bytes(bytes: &[u8], geometry: &FrameGeometry) -> Result<RgbImage> {
    if bytes.len() % BYTES_PER_PIXEL != 0 {
        warn!(len = bytes.len(), "dropping frame with a partial pixel");
        return Err(FrameError::PartialPixel { len: bytes.len() });
    }

    let expected = geometry.pixel_count();
    let received = bytes.len() / BYTES_PER_PIXEL;
    if received < expected {
        warn!(expected, received, "dropping truncated frame");
        return Err(FrameError::Truncated { expected, received });
    }
    if received > expected {
        warn!(expected, received, "dropping oversized frame");
        return Err(FrameError::Overrun { expected, received });
    }

    RgbImage::from_raw(geometry.width(), geometry.height(), bytes.to_vec()).ok_or(FrameError::Truncated {
        expected,
        received,
    })
}

/// Flattens a frame back into interleaved RGB bytes.
pub fn frame_to_bytes(frame: &RgbImage, geometry: &FrameGeometry) -> Result<Vec<u8>> {
    geometry.check_dimensions(frame.dimensions())?;
    Ok(frame.as_raw().clone())
}

/// Splits a continuous word stream into consecutive frames.
///
/// A trailing partial frame is reported once as `Truncated`, then iteration
/// ends.
pub struct FrameReader<I: Iterator> {
    stream: std::iter::Peekable<I>,
    geometry: FrameGeometry,
    finished: bool,
}

impl<I> FrameReader<I>
where
    I: Iterator<Item = VideoWord>,
{
    pub fn new(stream: I, geometry: FrameGeometry) -> Self {
        Self {
            stream: stream.peekable(),
            geometry,
            finished: false,
        }
    }
}

impl<I> Iterator for FrameReader<I>
where
    I: Iterator<Item = VideoWord>,
{
    type Item = Result<RgbImage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.stream.peek().is_none() {
            return None;
        }
        let frame = read_frame(&mut self.stream, &self.geometry);
        if frame.is_err() {
            self.finished = true;
        }
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn geometry() -> FrameGeometry {
        FrameGeometry::new(3, 2).unwrap()
    }

    fn words(count: u32) -> Vec<VideoWord> {
        (0..count).map(|i| i | (i + 100) << 8 | (i + 200) << 16).collect()
    }

    #[test]
    fn read_keeps_raster_order() {
        let mut stream = words(6).into_iter();
        let frame = read_frame(&mut stream, &geometry()).unwrap();
        assert_eq!(frame.get_pixel(0, 0), &Rgb([0, 100, 200]));
        assert_eq!(frame.get_pixel(2, 0), &Rgb([2, 102, 202]));
        assert_eq!(frame.get_pixel(0, 1), &Rgb([3, 103, 203]));
        assert_eq!(frame.get_pixel(2, 1), &Rgb([5, 105, 205]));
    }

    #[test]
    fn read_leaves_the_next_frame_in_the_stream() {
        let mut stream = words(8).into_iter();
        read_frame(&mut stream, &geometry()).unwrap();
        assert_eq!(stream.count(), 2);
    }

    #[test]
    fn short_stream_is_truncated() {
        let mut stream = words(4).into_iter();
        assert_eq!(
            read_frame(&mut stream, &geometry()),
            Err(FrameError::Truncated { expected: 6, received: 4 })
        );
    }

    #[test]
    fn write_preserves_order_and_count() {
        let source = words(6);
        let frame = read_frame(&mut source.clone().into_iter(), &geometry()).unwrap();
        let mut sink = Vec::new();
        assert_eq!(write_frame(&frame, &geometry(), &mut sink), Ok(6));
        assert_eq!(sink, source);
    }

    #[test]
    fn write_rejects_foreign_dimensions() {
        let mut sink = Vec::new();
        let result = write_frame(&RgbImage::new(2, 3), &geometry(), &mut sink);
        assert!(matches!(result, Err(FrameError::DimensionMismatch { .. })));
        assert!(sink.is_empty());
    }

    #[test]
    fn byte_buffers_must_hold_exactly_one_frame() {
        let geometry = geometry();
        assert!(frame_from_bytes(&[7; 18], &geometry).is_ok());
        assert_eq!(
            frame_from_bytes(&[7; 15], &geometry),
            Err(FrameError::Truncated { expected: 6, received: 5 })
        );
        assert_eq!(
            frame_from_bytes(&[7; 21], &geometry),
            Err(FrameError::Overrun { expected: 6, received: 7 })
        );
        assert_eq!(frame_from_bytes(&[7; 17], &geometry), Err(FrameError::PartialPixel { len: 17 }));
    }

    #[test]
    fn bytes_round_trip_without_touching_values() {
        let bytes: Vec<u8> = (0..18).collect();
        let frame = frame_from_bytes(&bytes, &geometry()).unwrap();
        assert_eq!(frame.get_pixel(1, 0), &Rgb([3, 4, 5]));
        assert_eq!(frame_to_bytes(&frame, &geometry()).unwrap(), bytes);
    }

    #[test]
    fn reader_splits_back_to_back_frames() {
        let frames: Vec<_> = FrameReader::new(words(12).into_iter(), geometry()).collect();
        assert_eq!(frames.len(), 2);
        let second = frames[1].as_ref().unwrap();
        assert_eq!(second.get_pixel(0, 0), &Rgb([6, 106, 206]));
    }

    #[test]
    fn reader_reports_a_trailing_partial_frame_once() {
        let mut reader = FrameReader::new(words(8).into_iter(), geometry());
        assert!(reader.next().unwrap().is_ok());
        assert_eq!(
            reader.next(),
            Some(Err(FrameError::Truncated { expected: 6, received: 2 }))
        );
        assert!(reader.next().is_none());
    }

    #[test]
    fn empty_stream_has_no_frames() {
        assert!(FrameReader::new(std::iter::empty(), geometry()).next().is_none());
    }
}
