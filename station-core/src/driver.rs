//! Particulate sensor driver (C2, spec.md §4.2).
//!
//! One instance per physical sensor, bound to one [`SensorTransport`].
//! Stateless over C1: every call encodes a fresh request and decodes a
//! fresh response, the way `dvdsk-sps30-async::Sps30`'s command methods do,
//! generalized here to a synchronous, non-`embedded-hal-async` transport
//! since the station runs its single cooperative loop on `std`.

use crate::codec;
use crate::error::{CodecError, DriverError};
use crate::transport::{Delay, SensorTransport};

const ADDR: u8 = 0x00;

#[repr(u8)]
enum Command {
    StartMeasurement = 0x00,
    StopMeasurement = 0x01,
    ReadConcentrations = 0x03,
    Sleep = 0x10,
    Wake = 0x11,
    DeviceInfo = 0xD0,
}

const SERIAL_SUBCOMMAND: u8 = 0x03;
const START_MODE_BYTES: [u8; 2] = [0x01, 0x03];
const WAKE_PULSE: [u8; 1] = [0xFF];
const MAX_SERIAL_LEN: usize = 32;

fn request(cmd: Command, data: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(3 + data.len());
    payload.push(ADDR);
    payload.push(cmd as u8);
    payload.push(data.len() as u8);
    payload.extend_from_slice(data);
    payload
}

fn response_data<'a>(frame: &'a [u8], cmd: Command) -> Result<&'a [u8], CodecError> {
    let [addr, got_cmd, status, length, data @ ..] = frame else {
        return Err(CodecError::PayloadTooShort {
            need: 4,
            got: frame.len(),
        });
    };
    let _ = addr;
    if *got_cmd != cmd as u8 {
        return Err(CodecError::Framing);
    }
    if *status != 0 {
        return Err(CodecError::Status(*status));
    }
    if *length as usize != data.len() {
        return Err(CodecError::PayloadTooShort {
            need: *length as usize,
            got: data.len(),
        });
    }
    Ok(data)
}

/// The four measured channels spec.md §4.2 calls out as `(4×real)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Concentrations {
    pub pm1_0: f32,
    pub pm2_5: f32,
    pub pm4_0: f32,
    pub pm10: f32,
}

impl Concentrations {
    fn from_data(data: &[u8]) -> Result<Self, CodecError> {
        let floats: Vec<f32> = data
            .chunks_exact(4)
            .map(|c| f32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        if floats.len() < 4 {
            return Err(CodecError::PayloadTooShort {
                need: 16,
                got: data.len(),
            });
        }
        Ok(Self {
            pm1_0: floats[0],
            pm2_5: floats[1],
            pm4_0: floats[2],
            pm10: floats[3],
        })
    }

    /// The four channels as a slice, in the order [`crate::stats`] consumes.
    pub fn as_array(&self) -> [f32; 4] {
        [self.pm1_0, self.pm2_5, self.pm4_0, self.pm10]
    }
}

/// Driver for one physical particulate sensor (spec.md §4.2).
pub struct ParticulateSensor<T> {
    transport: T,
}

impl<T> ParticulateSensor<T>
where
    T: SensorTransport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn exchange(&mut self, payload: &[u8]) -> Result<Vec<u8>, DriverError<T::Error, T::Error>> {
        let frame = codec::encode(payload);
        self.transport
            .write_frame(&frame)
            .map_err(DriverError::Write)?;

        let mut buf = Vec::new();
        self.transport
            .read_frame(&mut buf)
            .map_err(DriverError::Timeout)?;
        Ok(codec::decode(&buf)?)
    }

    /// Starts a measurement cycle (mode 0x01, float output format 0x03).
    pub fn start_measurement(&mut self) -> Result<(), DriverError<T::Error, T::Error>> {
        let req = request(Command::StartMeasurement, &START_MODE_BYTES);
        let frame = self.exchange(&req)?;
        response_data(&frame, Command::StartMeasurement)?;
        Ok(())
    }

    /// Returns the sensor to idle mode.
    pub fn stop_measurement(&mut self) -> Result<(), DriverError<T::Error, T::Error>> {
        let req = request(Command::StopMeasurement, &[]);
        let frame = self.exchange(&req)?;
        response_data(&frame, Command::StopMeasurement)?;
        Ok(())
    }

    /// Puts the sensor to sleep; the UART interface becomes unresponsive
    /// until [`Self::wake`].
    pub fn sleep(&mut self) -> Result<(), DriverError<T::Error, T::Error>> {
        let req = request(Command::Sleep, &[]);
        let frame = self.exchange(&req)?;
        response_data(&frame, Command::Sleep)?;
        Ok(())
    }

    /// Wakes the sensor: a single `0xFF` pulse, a settle delay, then the
    /// framed wake request (spec.md §4.2).
    pub fn wake<D: Delay>(
        &mut self,
        delay: &mut D,
        settle_ms: u32,
    ) -> Result<(), DriverError<T::Error, T::Error>> {
        self.transport
            .write_raw(&WAKE_PULSE)
            .map_err(DriverError::Write)?;
        delay.delay_ms(settle_ms);

        let req = request(Command::Wake, &[]);
        let frame = self.exchange(&req)?;
        response_data(&frame, Command::Wake)?;
        Ok(())
    }

    /// Reads the four concentration channels. Callers must have waited at
    /// least `DELAY_MS_SPS30_LECTURA` since [`Self::start_measurement`]; the
    /// driver itself does not track time (C5 owns scheduling).
    pub fn read_concentrations(
        &mut self,
    ) -> Result<Concentrations, DriverError<T::Error, T::Error>> {
        let req = request(Command::ReadConcentrations, &[]);
        let frame = self.exchange(&req)?;
        let data = response_data(&frame, Command::ReadConcentrations)?;
        Ok(Concentrations::from_data(data)?)
    }

    /// Reads the device serial number: subcommand `0x03` of the device-info
    /// request, NUL-trimmed ASCII up to 32 bytes.
    pub fn read_serial(&mut self) -> Result<String, DriverError<T::Error, T::Error>> {
        let req = request(Command::DeviceInfo, &[SERIAL_SUBCOMMAND]);
        let frame = self.exchange(&req)?;
        let data = response_data(&frame, Command::DeviceInfo)?;

        let trimmed = data
            .iter()
            .copied()
            .take_while(|&b| b != 0)
            .take(MAX_SERIAL_LEN)
            .collect::<Vec<u8>>();
        String::from_utf8(trimmed).map_err(|_| DriverError::InvalidSerial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct FakeTransport {
        responses: VecDeque<Vec<u8>>,
        sent: Vec<Vec<u8>>,
        raw_sent: Vec<Vec<u8>>,
    }

    impl FakeTransport {
        fn with_responses(responses: Vec<Vec<u8>>) -> Self {
            Self {
                responses: responses.into(),
                sent: Vec::new(),
                raw_sent: Vec::new(),
            }
        }
    }

    impl SensorTransport for FakeTransport {
        type Error = &'static str;

        fn write_frame(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
            self.sent.push(frame.to_vec());
            Ok(())
        }

        fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
            self.raw_sent.push(bytes.to_vec());
            Ok(())
        }

        fn read_frame(&mut self, buf: &mut Vec<u8>) -> Result<(), Self::Error> {
            match self.responses.pop_front() {
                Some(frame) => {
                    *buf = frame;
                    Ok(())
                }
                None => Err("no more canned responses"),
            }
        }
    }

    struct NoDelay;
    impl Delay for NoDelay {
        fn delay_ms(&mut self, _ms: u32) {}
    }

    fn ok_response(cmd: u8, data: &[u8]) -> Vec<u8> {
        let mut payload = vec![ADDR, cmd, 0, data.len() as u8];
        payload.extend_from_slice(data);
        codec::encode(&payload)
    }

    #[test]
    fn start_measurement_round_trips() {
        let response = ok_response(Command::StartMeasurement as u8, &[]);
        let mut sensor = ParticulateSensor::new(FakeTransport::with_responses(vec![response]));
        sensor.start_measurement().unwrap();
    }

    #[test]
    fn read_concentrations_decodes_four_floats() {
        let mut data = Vec::new();
        for v in [10.0f32, 20.0, 30.0, 40.0] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        let response = ok_response(Command::ReadConcentrations as u8, &data);
        let mut sensor = ParticulateSensor::new(FakeTransport::with_responses(vec![response]));
        let c = sensor.read_concentrations().unwrap();
        assert_eq!(c.as_array(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn read_serial_trims_at_nul() {
        let mut data = b"SN-001".to_vec();
        data.push(0);
        data.extend_from_slice(&[0u8; 10]);
        let response = ok_response(Command::DeviceInfo as u8, &data);
        let mut sensor = ParticulateSensor::new(FakeTransport::with_responses(vec![response]));
        assert_eq!(sensor.read_serial().unwrap(), "SN-001");
    }

    #[test]
    fn nonzero_status_is_reported_as_codec_error() {
        let response = codec::encode(&[ADDR, Command::StopMeasurement as u8, 7, 0]);
        let mut sensor = ParticulateSensor::new(FakeTransport::with_responses(vec![response]));
        let err = sensor.stop_measurement().unwrap_err();
        assert!(matches!(err, DriverError::Codec(CodecError::Status(7))));
    }

    #[test]
    fn wake_sends_pulse_before_framed_request() {
        let response = ok_response(Command::Wake as u8, &[]);
        let mut sensor = ParticulateSensor::new(FakeTransport::with_responses(vec![response]));
        let mut delay = NoDelay;
        sensor.wake(&mut delay, 50).unwrap();
        assert_eq!(sensor.transport.raw_sent, vec![WAKE_PULSE.to_vec()]);
    }
}
