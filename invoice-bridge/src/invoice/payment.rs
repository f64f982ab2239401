//! Payment method mapping
//!
//! Shop gateway codes → provider payment-method ids.

use regex::Regex;
use std::sync::LazyLock;

/// Bank transfer (also the fallback)
pub const PAYMENT_BANK_TRANSFER: u32 = 1;
/// Cash on delivery
pub const PAYMENT_CASH_ON_DELIVERY: u32 = 4;
/// Online card payment
pub const PAYMENT_CARD: u32 = 8;
pub const PAYMENT_PAYPAL: u32 = 128;

/// Gateways with a known id
const KNOWN_GATEWAYS: &[(&str, u32)] = &[
    ("bacs", PAYMENT_BANK_TRANSFER),
    ("cheque", PAYMENT_BANK_TRANSFER),
    ("cod", PAYMENT_CASH_ON_DELIVERY),
    ("paypal", PAYMENT_PAYPAL),
    ("stripe", PAYMENT_CARD),
    ("stripe_cc", PAYMENT_CARD),
    ("woocommerce_payments", PAYMENT_CARD),
];

static CASH_ON_DELIVERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(cod|cash.*delivery|dobir)").expect("valid cash-on-delivery pattern")
});

static PAYPAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(paypal|pp_)").expect("valid paypal pattern"));

static CARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(card|credit|debit|visa|master|stripe)").expect("valid card pattern")
});

/// Map a gateway code to the provider's payment-method id
///
/// Exact table first, then keyword detection, then bank transfer.
pub fn map_payment_method(code: &str) -> u32 {
    if let Some((_, id)) = KNOWN_GATEWAYS.iter().find(|(known, _)| *known == code) {
        return *id;
    }

    if CASH_ON_DELIVERY.is_match(code) {
        PAYMENT_CASH_ON_DELIVERY
    } else if PAYPAL.is_match(code) {
        PAYMENT_PAYPAL
    } else if CARD.is_match(code) {
        PAYMENT_CARD
    } else {
        PAYMENT_BANK_TRANSFER
    }
}
