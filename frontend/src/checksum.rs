//! CRC-32 checksums over CDG streams, reported by inspect and logged
//! after every render. Reflected polynomial 0xEDB8_8320 (the common
//! ZIP/PNG variant), driven byte-wise from a precomputed table.

const POLYNOMIAL: u32 = 0xEDB8_8320;

/// CRC of a single seed byte pushed through eight reflected shifts.
const fn entry(seed: u8) -> u32 {
    let mut value = seed as u32;
    let mut bit = 0;
    while bit < 8 {
        value = if value & 1 == 1 {
            (value >> 1) ^ POLYNOMIAL
        } else {
            value >> 1
        };
        bit += 1;
    }
    value
}

const TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut seed = 0;
    while seed < 256 {
        table[seed] = entry(seed as u8);
        seed += 1;
    }
    table
};

/// CRC-32 of a whole byte stream.
pub fn crc32(bytes: &[u8]) -> u32 {
    !bytes.iter().fold(!0u32, |acc, &byte| {
        TABLE[((acc ^ u32::from(byte)) & 0xFF) as usize] ^ (acc >> 8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_check_value() {
        // The check value every CRC-32 variant table lists
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn empty_stream_is_zero() {
        assert_eq!(crc32(&[]), 0);
    }

    #[test]
    fn noop_frame_has_nonzero_checksum() {
        let frame = [0u8; 24];
        assert_ne!(crc32(&frame), 0);
        assert_eq!(crc32(&frame), crc32(&frame));
    }

    #[test]
    fn single_bit_flip_changes_checksum() {
        let mut stream = vec![0x09u8; 48];
        let before = crc32(&stream);
        stream[30] ^= 0x01;
        assert_ne!(crc32(&stream), before);
    }

    #[test]
    fn checksum_depends_on_byte_order() {
        assert_ne!(crc32(&[0x01, 0x02]), crc32(&[0x02, 0x01]));
    }
}
