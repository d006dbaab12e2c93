//! Board layout
//!
//! Pin assignments are for a Pico driving a single WS2812 strip:
//! data on GPIO16, push button to ground on GPIO15, upload UART on
//! GPIO0 (TX) / GPIO1 (RX).

use povstaff_drivers::BankPartition;

/// Pixels on the strip
pub const NUM_LEDS: usize = 60;

/// Flash size on the Pico
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Flash reserved for the firmware image (must match memory.x)
pub const FIRMWARE_SIZE: u32 = 512 * 1024;

/// Image bank partition, everything behind the firmware
pub const BANK_PARTITION: BankPartition =
    BankPartition::new(FIRMWARE_SIZE, FLASH_SIZE as u32 - FIRMWARE_SIZE);

/// Upload baud rate
pub const UPLOAD_BAUDRATE: u32 = 921_600;
