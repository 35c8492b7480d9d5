//! Terminal QR rendering for the active address.

use alloy::primitives::Address;
use qrcode::QrCode;

use crate::error::{WalletError, WalletResult};

/// Renders the connected address as a scannable block and tracks whether it
/// is currently shown.
#[derive(Debug, Default)]
pub struct QrPresenter {
    visible: bool,
}

impl QrPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle visibility, returning the rendered code when turning it on.
    /// Fails with `NoActiveAddress` when no account is connected.
    pub fn toggle(&mut self, address: Option<Address>) -> WalletResult<Option<String>> {
        let address = address.ok_or(WalletError::NoActiveAddress)?;
        self.visible = !self.visible;
        if self.visible {
            render_address(&address).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Render an address as a unicode QR block for terminal display.
pub fn render_address(address: &Address) -> WalletResult<String> {
    let code = QrCode::new(address.to_string().as_bytes())
        .map_err(|e| WalletError::Qr(e.to_string()))?;
    Ok(code
        .render::<char>()
        .quiet_zone(true)
        .module_dimensions(2, 1)
        .dark_color('█')
        .light_color(' ')
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_without_address_fails() {
        let mut presenter = QrPresenter::new();
        assert!(matches!(
            presenter.toggle(None),
            Err(WalletError::NoActiveAddress)
        ));
        assert!(!presenter.is_visible());
    }

    #[test]
    fn test_toggle_cycles_visibility() {
        let mut presenter = QrPresenter::new();
        let address = Some(Address::repeat_byte(0x42));

        let shown = presenter.toggle(address).unwrap();
        assert!(shown.is_some());
        assert!(presenter.is_visible());

        let hidden = presenter.toggle(address).unwrap();
        assert!(hidden.is_none());
        assert!(!presenter.is_visible());
    }

    #[test]
    fn test_rendered_code_is_non_trivial() {
        let code = render_address(&Address::repeat_byte(0x42)).unwrap();
        assert!(code.lines().count() > 10);
        assert!(code.contains('█'));
    }
}
