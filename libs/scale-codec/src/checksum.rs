//! Frame checksum algorithms
//!
//! - XOR: all covered bytes xor-ed together, one byte
//! - SUM: wrapping 8-bit sum of the covered bytes, one byte
//! - CRC16 (Modbus): polynomial 0xA001 reflected, initial 0xFFFF, sent low byte first

use tracing::{debug, warn};

use crate::config::{ChecksumAlgorithm, ChecksumConfig};
use crate::error::{DecodeError, Result};

/// XOR of all bytes
pub fn xor_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc ^ b)
}

/// Wrapping 8-bit sum of all bytes
pub fn sum_checksum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Calculate CRC16 for Modbus RTU
pub fn crc16_modbus(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;

    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc >>= 1;
                crc ^= 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

/// Append the CRC16 of `frame` in wire order (low byte first)
pub fn append_crc16(frame: &mut Vec<u8>) {
    let crc = crc16_modbus(frame);
    frame.extend_from_slice(&crc.to_le_bytes());
}

/// Check a frame whose last two bytes are its own CRC16, low byte first
pub fn verify_crc16_trailer(frame: &[u8]) -> bool {
    let Some(body_len) = frame.len().checked_sub(2) else {
        return false;
    };
    let (body, trailer) = frame.split_at(body_len);
    let received = u16::from_le_bytes([trailer[0], trailer[1]]);
    let calculated = crc16_modbus(body);
    if received != calculated {
        debug!(
            "CRC mismatch: calculated={:04X}, received={:04X}",
            calculated, received
        );
    }
    received == calculated
}

/// Verify a configured range checksum against the full frame
///
/// The checksum covers `[start, end)` and is read at `position`. When
/// `position` is absent the checksum sits at `end`, or right before the
/// `trailer_len` trailer bytes when `end` is absent too. Ranges outside the
/// frame are configuration errors, not mismatches.
pub fn verify_range(frame: &[u8], config: &ChecksumConfig, trailer_len: usize) -> Result<bool> {
    let width = config.algorithm.width();
    match config.algorithm {
        ChecksumAlgorithm::None => return Ok(true),
        ChecksumAlgorithm::Unsupported => {
            warn!("Unsupported checksum algorithm configured, verification skipped");
            return Ok(true);
        },
        _ => {},
    }

    let position = match (config.position, config.end) {
        (Some(position), _) => position,
        (None, Some(end)) => end,
        (None, None) => frame
            .len()
            .checked_sub(trailer_len)
            .and_then(|n| n.checked_sub(width))
            .ok_or_else(|| {
                DecodeError::ChecksumConfig(format!(
                    "frame of {} bytes too short for a {}-byte checksum",
                    frame.len(),
                    width
                ))
            })?,
    };
    let end = config.end.unwrap_or(position);

    let covered = frame.get(config.start..end).ok_or_else(|| {
        DecodeError::ChecksumConfig(format!(
            "range [{}, {}) outside {}-byte frame",
            config.start,
            end,
            frame.len()
        ))
    })?;
    let stored = position
        .checked_add(width)
        .and_then(|stop| frame.get(position..stop))
        .ok_or_else(|| {
            DecodeError::ChecksumConfig(format!(
                "position {} outside {}-byte frame",
                position,
                frame.len()
            ))
        })?;

    let valid = match config.algorithm {
        ChecksumAlgorithm::Xor => stored[0] == xor_checksum(covered),
        ChecksumAlgorithm::Sum => stored[0] == sum_checksum(covered),
        ChecksumAlgorithm::Crc16 | ChecksumAlgorithm::ModbusCrc => {
            u16::from_le_bytes([stored[0], stored[1]]) == crc16_modbus(covered)
        },
        ChecksumAlgorithm::None | ChecksumAlgorithm::Unsupported => true,
    };

    if !valid {
        debug!(
            algorithm = %config.algorithm,
            start = config.start,
            end,
            position,
            "Checksum mismatch"
        );
    }
    Ok(valid)
}
