//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use internet_checksum::Checksum;

// Computes the Internet checksum (RFC 1071) of the given data.
//
// An odd trailing byte is padded with zero. Any checksum or authentication
// fields covered by `data` must be zeroed beforehand.
pub fn create_checksum_ipv4(data: &[u8]) -> u16 {
    let mut cksum = Checksum::new();
    cksum.add_bytes(data);
    u16::from_be_bytes(cksum.checksum())
}

// Returns whether data that embeds its own Internet checksum is intact.
pub fn verify_checksum_ipv4(data: &[u8]) -> bool {
    create_checksum_ipv4(data) == 0
}

// Computes the ISO 8473 Fletcher checksum of the given data, with the
// checksum bytes placed at `offset` (RFC 905, Annex B).
//
// The two checksum bytes of `data` must be zeroed beforehand.
pub fn fletcher_checksum(data: &[u8], offset: usize) -> [u8; 2] {
    let checksum = fletcher::calc_fletcher16(data);
    let mut checkbyte0 = (checksum & 0x00FF) as i32;
    let mut checkbyte1 = ((checksum >> 8) & 0x00FF) as i32;

    // Adjust checksum value using scaling factor.
    let sop = (data.len() - offset - 1) as i32;
    let mut x = (sop * checkbyte0 - checkbyte1) % 255;
    if x <= 0 {
        x += 255;
    }
    checkbyte1 = 510 - checkbyte0 - x;
    if checkbyte1 > 255 {
        checkbyte1 -= 255;
    }
    checkbyte0 = x;
    [checkbyte0 as u8, checkbyte1 as u8]
}

// Returns whether data that embeds its own Fletcher checksum is intact.
pub fn verify_fletcher_checksum(data: &[u8]) -> bool {
    fletcher::calc_fletcher16(data) == 0
}

// ===== unit tests =====
