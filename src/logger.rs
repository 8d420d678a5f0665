//! `log` backend printing over the ESP32 UART/JTAG console

/// Install the console logger, honouring `ESP_LOG` for the level filter
pub fn init_logger() {
    esp_println::logger::init_logger_from_env();
    log::debug!("console logger installed");
}
