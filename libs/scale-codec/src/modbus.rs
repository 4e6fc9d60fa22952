//! Modbus RTU helpers
//!
//! Function code constants, exception descriptions and the outbound
//! read-register request builder used to poll Modbus scales.

use crate::checksum::crc16_modbus;

/// Read holding registers
pub const READ_HOLDING_REGISTERS: u8 = 0x03;
/// Read input registers
pub const READ_INPUT_REGISTERS: u8 = 0x04;
/// Bit set in the function code of an exception response
pub const EXCEPTION_FLAG: u8 = 0x80;
/// Slave address + function code + exception code/byte count + CRC
pub const MIN_RESPONSE_LEN: usize = 5;

/// Verify if a function code marks an exception response
pub fn is_exception_function(function_code: u8) -> bool {
    function_code & EXCEPTION_FLAG != 0
}

/// Whether responses to this function carry a byte count and register payload
pub fn is_register_read(function_code: u8) -> bool {
    matches!(function_code, READ_HOLDING_REGISTERS | READ_INPUT_REGISTERS)
}

/// Get exception description
pub fn exception_description(exception_code: u8) -> &'static str {
    match exception_code {
        0x01 => "Illegal Function",
        0x02 => "Illegal Data Address",
        0x03 => "Illegal Data Value",
        0x04 => "Slave Device Failure",
        0x05 => "Acknowledge",
        0x06 => "Slave Device Busy",
        0x07 => "Negative Acknowledge",
        0x08 => "Memory Parity Error",
        0x0A => "Gateway Path Unavailable",
        0x0B => "Gateway Target Device Failed to Respond",
        _ => "Unknown Exception",
    }
}

/// Build an 8-byte read request: slave, function, start (BE), quantity (BE), CRC (LE)
pub fn build_read_request(slave_id: u8, function_code: u8, start: u16, quantity: u16) -> [u8; 8] {
    let [start_hi, start_lo] = start.to_be_bytes();
    let [qty_hi, qty_lo] = quantity.to_be_bytes();
    let body = [slave_id, function_code, start_hi, start_lo, qty_hi, qty_lo];
    let [crc_lo, crc_hi] = crc16_modbus(&body).to_le_bytes();

    [
        slave_id,
        function_code,
        start_hi,
        start_lo,
        qty_hi,
        qty_lo,
        crc_lo,
        crc_hi,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::verify_crc16_trailer;

    #[test]
    fn test_build_read_request() {
        let request = build_read_request(0x01, READ_HOLDING_REGISTERS, 0x0000, 0x0001);
        assert_eq!(request, [0x01, 0x03, 0x00, 0x00, 0x00, 0x01, 0x84, 0x0A]);

        let request = build_read_request(0x11, READ_INPUT_REGISTERS, 0x0100, 0x0004);
        assert_eq!(&request[..6], &[0x11, 0x04, 0x01, 0x00, 0x00, 0x04]);
        assert!(verify_crc16_trailer(&request));
    }

    #[test]
    fn test_exception_helpers() {
        assert!(is_exception_function(0x83));
        assert!(!is_exception_function(0x03));
        assert!(is_register_read(0x04));
        assert!(!is_register_read(0x06));
        assert_eq!(exception_description(0x02), "Illegal Data Address");
        assert_eq!(exception_description(0x0B), "Gateway Target Device Failed to Respond");
        assert_eq!(exception_description(0x7F), "Unknown Exception");
    }
}
