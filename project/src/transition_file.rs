//! Transition file loading: exactly 1,536 bytes holding 768 one-based
//! `(bx, by)` coordinate pairs, translated to the zero-based grid.

use cdg_core::transition::{FILE_COORD_COUNT, Transition};

use crate::assets::AssetError;

/// Expected file size in bytes.
pub const FILE_SIZE: usize = FILE_COORD_COUNT * 2;

/// Decode a transition file image.
pub fn decode(bytes: &[u8]) -> Result<Transition, AssetError> {
    if bytes.len() != FILE_SIZE {
        return Err(AssetError::BadTransitionLength { len: bytes.len() });
    }
    let coords = bytes
        .chunks_exact(2)
        .map(|pair| (pair[0].wrapping_sub(1), pair[1].wrapping_sub(1)))
        .collect();
    Ok(Transition::from_coords(coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_one_based_pairs() {
        let mut bytes = vec![0u8; FILE_SIZE];
        // First pair (1, 1) -> (0, 0); second (50, 18) -> (49, 17)
        bytes[0] = 1;
        bytes[1] = 1;
        bytes[2] = 50;
        bytes[3] = 18;
        // Remaining pairs left (0, 0): they wrap to (255, 255) and are
        // dropped as out-of-grid.
        let t = decode(&bytes).unwrap();
        assert_eq!(t.get(0), Some((0, 0)));
        assert_eq!(t.get(1), Some((49, 17)));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn full_sweep_round_trips() {
        let mut bytes = Vec::with_capacity(FILE_SIZE);
        // 768 pairs covering a 48x16 sub-grid, one-based
        for bx in 1..=48u8 {
            for by in 1..=16u8 {
                bytes.push(bx);
                bytes.push(by);
            }
        }
        let t = decode(&bytes).unwrap();
        assert_eq!(t.len(), FILE_COORD_COUNT);
        assert_eq!(t.get(0), Some((0, 0)));
        assert_eq!(t.get(767), Some((47, 15)));
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(matches!(
            decode(&[0u8; 100]),
            Err(AssetError::BadTransitionLength { len: 100 })
        ));
        assert!(matches!(
            decode(&vec![0u8; FILE_SIZE + 2]),
            Err(AssetError::BadTransitionLength { .. })
        ));
    }
}
