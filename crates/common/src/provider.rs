//! Payment providers whose credentials may be stored per customer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A payment provider with its own credential column in the customer store.
///
/// Serialised as the lowercase column name (`"paypal"`, `"mercadopago"`, `"stripe"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// PayPal REST credentials (client id + client secret).
    Paypal,
    /// Mercado Pago application credentials.
    MercadoPago,
    /// Stripe publishable key + secret key.
    Stripe,
}

impl Provider {
    /// All known providers, in lookup order.
    pub const ALL: [Provider; 3] = [Provider::Paypal, Provider::MercadoPago, Provider::Stripe];

    /// Column label used in storage and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Provider::Paypal => "paypal",
            Provider::MercadoPago => "mercadopago",
            Provider::Stripe => "stripe",
        }
    }

    /// Parse a column label; `None` for providers this service does not know.
    pub fn from_label(label: &str) -> Option<Provider> {
        Provider::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_column_labels() {
        for provider in Provider::ALL {
            let json = serde_json::to_string(&provider).unwrap();
            assert_eq!(json, format!("\"{}\"", provider.label()));
            let back: Provider = serde_json::from_str(&json).unwrap();
            assert_eq!(back, provider);
        }
    }

    #[test]
    fn from_label() {
        assert_eq!(Provider::from_label("mercadopago"), Some(Provider::MercadoPago));
        assert_eq!(Provider::from_label("conekta"), None);
        assert_eq!(Provider::from_label("PayPal"), None);
    }

    #[test]
    fn unknown_label_rejected() {
        assert!(serde_json::from_str::<Provider>("\"venmo\"").is_err());
    }
}
