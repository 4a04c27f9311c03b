//! `vox devices` handler

use crate::application::ports::CaptureError;
use crate::infrastructure::{CpalInput, InputDeviceInfo};

use super::presenter::Presenter;

/// List the host's input devices, marking the default one
pub fn handle_devices(presenter: &Presenter) -> Result<(), CaptureError> {
    let devices = CpalInput::list_devices()?;

    if devices.is_empty() {
        presenter.warn("No audio input devices found on this system.");
        return Ok(());
    }

    for device in &devices {
        presenter.output(&format_device(device));
    }
    Ok(())
}

fn format_device(device: &InputDeviceInfo) -> String {
    let mut line = device.name.clone();
    if device.is_default {
        line.push_str(" [DEFAULT]");
    }
    match device.config {
        Some((rate, channels)) => line.push_str(&format!(" ({}Hz, {} channels)", rate, channels)),
        None => line.push_str(" (configuration unavailable)"),
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_device_is_marked() {
        let device = InputDeviceInfo {
            name: "Built-in Mic".into(),
            is_default: true,
            config: Some((48000, 2)),
        };
        assert_eq!(
            format_device(&device),
            "Built-in Mic [DEFAULT] (48000Hz, 2 channels)"
        );
    }

    #[test]
    fn missing_config_is_reported() {
        let device = InputDeviceInfo {
            name: "USB".into(),
            is_default: false,
            config: None,
        };
        assert_eq!(format_device(&device), "USB (configuration unavailable)");
    }
}
