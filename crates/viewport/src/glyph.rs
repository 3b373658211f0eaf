//! Embedded "no preview" placeholder shown for files that are not images.

use image::RgbaImage;

use crate::types::DecodedImage;

pub const GLYPH_SIZE: u32 = 256;

const PAGE: [u8; 4] = [236, 236, 236, 255];
const OUTLINE: [u8; 4] = [96, 96, 96, 255];
const FOLD: [u8; 4] = [200, 200, 200, 255];
const MARK: [u8; 4] = [180, 48, 48, 255];
const CLEAR: [u8; 4] = [0, 0, 0, 0];

/// A generic document: a page with a folded corner and a cross, on a
/// transparent background.
pub fn placeholder() -> DecodedImage {
    let glyph = RgbaImage::from_fn(GLYPH_SIZE, GLYPH_SIZE, |x, y| {
        image::Rgba(glyph_pixel(x as i32, y as i32, GLYPH_SIZE as i32))
    });
    DecodedImage::from_rgba(glyph)
}

fn glyph_pixel(x: i32, y: i32, size: i32) -> [u8; 4] {
    let (left, right, top, bottom) = (48, size - 48, 16, size - 16);
    let fold = 56;
    let stroke = 6;

    let inside = x >= left && x < right && y >= top && y < bottom;
    // Top-right corner is folded over along the diagonal.
    let corner_x = x - (right - fold);
    let corner_y = y - top;
    let in_corner = corner_x >= 0 && corner_y < fold;

    if !inside || (in_corner && corner_x > corner_y) {
        CLEAR
    } else if in_corner && (corner_x - corner_y).abs() < stroke / 2 {
        OUTLINE
    } else if x < left + stroke || x >= right - stroke || y < top + stroke || y >= bottom - stroke
    {
        OUTLINE
    } else if in_corner && corner_y - corner_x < fold / 2 {
        FOLD
    } else if on_cross(x, y, size, stroke * 2) {
        MARK
    } else {
        PAGE
    }
}

fn on_cross(x: i32, y: i32, size: i32, thickness: i32) -> bool {
    let (lo, hi) = (size / 2 - 40, size / 2 + 40);
    let lower = size / 2 + 8;
    let (cy_lo, cy_hi) = (lower - 40, lower + 40);
    if x < lo || x >= hi || y < cy_lo || y >= cy_hi {
        return false;
    }
    let dx = x - lo;
    let dy = y - cy_lo;
    (dx - dy).abs() < thickness / 2 || (dx + dy - (hi - lo)).abs() < thickness / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &DecodedImage, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * image.width() + x) * 4) as usize;
        let bytes = &image.pixels()[offset..offset + 4];
        [bytes[0], bytes[1], bytes[2], bytes[3]]
    }

    #[test]
    fn placeholder_is_square_rgba() {
        let image = placeholder();
        assert_eq!(image.dimensions(), (GLYPH_SIZE, GLYPH_SIZE));
        assert_eq!(image.pixels().len(), (GLYPH_SIZE * GLYPH_SIZE * 4) as usize);
    }

    #[test]
    fn corners_are_transparent_and_page_is_opaque() {
        let image = placeholder();
        assert_eq!(pixel(&image, 0, 0)[3], 0);
        assert_eq!(pixel(&image, GLYPH_SIZE - 1, GLYPH_SIZE - 1)[3], 0);
        // Folded-away corner of the page.
        assert_eq!(pixel(&image, GLYPH_SIZE - 50, 18)[3], 0);
        // Page body, left of the cross.
        assert_eq!(pixel(&image, 70, 200), PAGE);
    }

    #[test]
    fn cross_is_drawn_through_the_centre() {
        let image = placeholder();
        let centre = GLYPH_SIZE / 2;
        assert_eq!(pixel(&image, centre, centre + 8), MARK);
    }
}
