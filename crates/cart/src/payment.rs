//! UPI payment links.
//!
//! Payment is manual: the customer scans a QR code holding a `upi://pay` link,
//! pays in their UPI app, then confirms the order. Nothing here talks to a
//! payment provider.

use rust_decimal::Decimal;

/// QR rendering service used for the checkout page.
const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// QR image edge in pixels.
const QR_SIZE: u32 = 200;

/// Default payee VPA.
pub const DEFAULT_VPA: &str = "merchant@upi";

/// Default payee display name.
pub const DEFAULT_PAYEE_NAME: &str = "FoodHub";

/// The merchant receiving UPI payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiPayee {
    /// Virtual payment address (e.g., `merchant@upi`).
    pub vpa: String,
    /// Name shown in the payer's UPI app.
    pub payee_name: String,
}

impl Default for UpiPayee {
    fn default() -> Self {
        Self {
            vpa: DEFAULT_VPA.to_string(),
            payee_name: DEFAULT_PAYEE_NAME.to_string(),
        }
    }
}

impl UpiPayee {
    #[must_use]
    pub fn new(vpa: impl Into<String>, payee_name: impl Into<String>) -> Self {
        Self {
            vpa: vpa.into(),
            payee_name: payee_name.into(),
        }
    }

    /// `upi://pay` deep link for `amount` rupees.
    #[must_use]
    pub fn payment_uri(&self, amount: Decimal) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={}&cu=INR",
            self.vpa,
            urlencoding::encode(&self.payee_name),
            amount.normalize()
        )
    }

    /// URL of a QR code image encoding [`Self::payment_uri`].
    #[must_use]
    pub fn qr_code_url(&self, amount: Decimal) -> String {
        format!(
            "{QR_SERVICE_URL}?size={QR_SIZE}x{QR_SIZE}&data={}",
            urlencoding::encode(&self.payment_uri(amount))
        )
    }
}
