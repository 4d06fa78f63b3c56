// HealthNode - Temperature ADC Driver
//
// One-shot ADC1 reads through the raw ESP-IDF API.  GPIO2 / ADC1_CHANNEL_2,
// 11 dB attenuation (0-3.3 V range), 12-bit.

use crate::error::{HardwareFault, Peripheral};
use crate::hal::TemperatureAdc;

pub struct OneshotAdc {
    handle: esp_idf_sys::adc_oneshot_unit_handle_t,
    channel: esp_idf_sys::adc_channel_t,
}

// SAFETY: The unit handle is owned by exactly one task (the temperature
// sampler) and never shared.
unsafe impl Send for OneshotAdc {}

impl OneshotAdc {
    pub fn new() -> Result<Self, HardwareFault> {
        let channel = esp_idf_sys::adc_channel_t_ADC_CHANNEL_2; // GPIO2

        unsafe {
            let mut handle: esp_idf_sys::adc_oneshot_unit_handle_t = core::ptr::null_mut();
            let unit_cfg = esp_idf_sys::adc_oneshot_unit_init_cfg_t {
                unit_id: esp_idf_sys::adc_unit_t_ADC_UNIT_1,
                ulp_mode: esp_idf_sys::adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
                ..core::mem::zeroed()
            };
            check(esp_idf_sys::adc_oneshot_new_unit(&unit_cfg, &mut handle))?;

            let chan_cfg = esp_idf_sys::adc_oneshot_chan_cfg_t {
                atten: esp_idf_sys::adc_atten_t_ADC_ATTEN_DB_11,
                bitwidth: esp_idf_sys::adc_bitwidth_t_ADC_BITWIDTH_12,
            };
            check(esp_idf_sys::adc_oneshot_config_channel(handle, channel, &chan_cfg))?;

            log::info!("Temperature ADC initialised (ADC1 CH{}, 12-bit)", crate::config::PIN_TEMPERATURE_ADC);
            Ok(Self { handle, channel })
        }
    }
}

impl TemperatureAdc for OneshotAdc {
    fn read_raw(&mut self) -> Result<u16, HardwareFault> {
        let mut raw: i32 = 0;
        // SAFETY: handle and channel were configured in `new`.
        check(unsafe { esp_idf_sys::adc_oneshot_read(self.handle, self.channel, &mut raw) })?;
        Ok(raw.clamp(0, i32::from(u16::MAX)) as u16)
    }
}

fn check(ret: esp_idf_sys::esp_err_t) -> Result<(), HardwareFault> {
    if ret == esp_idf_sys::ESP_OK {
        Ok(())
    } else {
        Err(HardwareFault::driver(Peripheral::TemperatureAdc, ret))
    }
}
