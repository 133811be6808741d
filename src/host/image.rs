//! Bitmap to data URL encoding for `setImage`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::render::Bitmap;

const FILE_HEADER_LEN: u32 = 14;
const INFO_HEADER_LEN: u32 = 40;
const PIXELS_PER_METRE: i32 = 2835;

/// Encode `bitmap` as a `data:image/bmp;base64,...` URL.
pub fn data_url(bitmap: &Bitmap) -> String {
    format!("data:image/bmp;base64,{}", STANDARD.encode(encode_bmp(bitmap)))
}

/// Encode as an uncompressed 24-bit BMP. Alpha is dropped.
pub fn encode_bmp(bitmap: &Bitmap) -> Vec<u8> {
    let row_len = bitmap.width() * 3;
    let stride = (row_len + 3) & !3;
    let image_len = stride * bitmap.height();
    let offset = FILE_HEADER_LEN + INFO_HEADER_LEN;

    let mut out = Vec::with_capacity((offset + image_len) as usize);

    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(offset + image_len).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());

    out.extend_from_slice(&INFO_HEADER_LEN.to_le_bytes());
    out.extend_from_slice(&(bitmap.width() as i32).to_le_bytes());
    // Positive height: rows stored bottom-up.
    out.extend_from_slice(&(bitmap.height() as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&image_len.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METRE.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    let padding = (stride - row_len) as usize;
    let rows: Vec<&[u8]> = bitmap.rows().collect();
    for row in rows.iter().rev() {
        for rgba in row.chunks_exact(4) {
            out.extend_from_slice(&[rgba[2], rgba[1], rgba[0]]);
        }
        out.extend(std::iter::repeat(0u8).take(padding));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Tile, TILE_SIZE};
    use promdeck_types::{Rgb, StatusLevel};

    fn u32_at(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
    }

    #[test]
    fn tile_encodes_to_full_bmp() {
        let tile = Tile::render(StatusLevel::Warning, 1.0);
        let bmp = encode_bmp(&tile.image);

        let expected = 54 + TILE_SIZE * TILE_SIZE * 3;
        assert_eq!(&bmp[..2], b"BM");
        assert_eq!(u32_at(&bmp, 2), expected);
        assert_eq!(bmp.len(), expected as usize);
        assert_eq!(u32_at(&bmp, 10), 54);
        assert_eq!(u32_at(&bmp, 18), TILE_SIZE);
        assert_eq!(u32_at(&bmp, 22), TILE_SIZE);
        assert_eq!(u16::from_le_bytes([bmp[28], bmp[29]]), 24);
        // First pixel, stored as BGR.
        assert_eq!(&bmp[54..57], &[0x18, 0x81, 0xf4]);
    }

    #[test]
    fn rows_are_padded_to_four_bytes() {
        let bitmap = Bitmap::solid(3, 2, Rgb::new(1, 2, 3));
        let bmp = encode_bmp(&bitmap);

        // 3 px * 3 bytes = 9, padded to 12 per row.
        assert_eq!(bmp.len(), 54 + 12 * 2);
        assert_eq!(u32_at(&bmp, 34), 24);
        assert_eq!(&bmp[54..63], &[3, 2, 1, 3, 2, 1, 3, 2, 1]);
        assert_eq!(&bmp[63..66], &[0, 0, 0]);
    }

    #[test]
    fn data_url_is_base64_bmp() {
        let bitmap = Bitmap::solid(1, 1, Rgb::new(0, 0, 0));
        let url = data_url(&bitmap);

        let encoded = url.strip_prefix("data:image/bmp;base64,").unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, encode_bmp(&bitmap));
    }
}
