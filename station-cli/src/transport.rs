//! Serial-port-backed `SensorTransport` (C1's wire, spec.md §4.1, §6.4).
//!
//! Reads one SHDLC-style frame at a time off a `serialport::SerialPort`,
//! the same crate the pack's PMS7003 driver uses for its UART link.

use std::io::{self, Read, Write};
use std::time::Duration;

use station_core::transport::SensorTransport;

const FLAG: u8 = 0x7E;
const READ_TIMEOUT: Duration = Duration::from_millis(500);

pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    pub fn open(device: &str, baud_rate: u32) -> anyhow::Result<Self> {
        let port = serialport::new(device, baud_rate)
            .timeout(READ_TIMEOUT)
            .open()?;
        Ok(Self { port })
    }
}

impl SensorTransport for SerialTransport {
    type Error = io::Error;

    fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(frame)
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.port.write_all(bytes)
    }

    /// Blocks byte-by-byte until the opening and closing `0x7E` delimiters
    /// have both been seen, or the port's own read timeout fires.
    fn read_frame(&mut self, buf: &mut Vec<u8>) -> Result<(), Self::Error> {
        buf.clear();
        let mut byte = [0u8; 1];

        loop {
            self.port.read_exact(&mut byte)?;
            if byte[0] == FLAG {
                buf.push(byte[0]);
                break;
            }
        }
        loop {
            self.port.read_exact(&mut byte)?;
            buf.push(byte[0]);
            if byte[0] == FLAG {
                break;
            }
        }
        Ok(())
    }
}
