// ldportal/src/transport/usb/descriptor.rs
//! Endpoint discovery from the configuration descriptor.

use rusb::{Device, Direction, TransferType, UsbContext};

/// Endpoint addresses used by the toy pad firmware when the descriptor
/// cannot be read.
pub const DEFAULT_IN_ENDPOINT: u8 = 0x81;
/// OUT endpoint fallback
pub const DEFAULT_OUT_ENDPOINT: u8 = 0x01;

/// Endpoint pair of the claimed interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    /// Interface number
    pub interface: u8,
    /// IN endpoint address
    pub in_ep: u8,
    /// OUT endpoint address
    pub out_ep: u8,
    /// Transfer type of the IN endpoint
    pub in_type: TransferType,
    /// Transfer type of the OUT endpoint
    pub out_type: TransferType,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            interface: 0,
            in_ep: DEFAULT_IN_ENDPOINT,
            out_ep: DEFAULT_OUT_ENDPOINT,
            in_type: TransferType::Interrupt,
            out_type: TransferType::Interrupt,
        }
    }
}

/// Inspect the first configuration and return the first IN/OUT endpoint of
/// the first interface that has both. Falls back to `Endpoints::default()`.
pub fn find_endpoints<T: UsbContext>(device: &Device<T>) -> Endpoints {
    let Ok(config) = device.config_descriptor(0) else {
        return Endpoints::default();
    };

    for interface in config.interfaces() {
        for interface_desc in interface.descriptors() {
            let mut input = None;
            let mut output = None;
            for endpoint_desc in interface_desc.endpoint_descriptors() {
                let ep = (endpoint_desc.address(), endpoint_desc.transfer_type());
                match endpoint_desc.direction() {
                    Direction::In if input.is_none() => input = Some(ep),
                    Direction::Out if output.is_none() => output = Some(ep),
                    _ => {}
                }
            }
            if let (Some((in_ep, in_type)), Some((out_ep, out_type))) = (input, output) {
                return Endpoints {
                    interface: interface_desc.interface_number(),
                    in_ep,
                    out_ep,
                    in_type,
                    out_type,
                };
            }
        }
    }

    Endpoints::default()
}
