//! Blocking `Delay` backed by `std::thread::sleep`.

use std::thread;
use std::time::Duration;

use station_core::transport::Delay;

#[derive(Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
