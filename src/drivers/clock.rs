// HealthNode - Tick Source
//
// Milliseconds since boot from the ESP high-resolution timer (wraps at ~49
// days, which the wrapping window arithmetic tolerates).

use crate::events::Tick;
use crate::hal::TickSource;

#[derive(Debug, Clone, Copy, Default)]
pub struct EspClock;

impl TickSource for EspClock {
    fn now(&self) -> Tick {
        unsafe { (esp_idf_sys::esp_timer_get_time() / 1000) as Tick }
    }
}
