//! Product constants

/// Premium price, rupees per premium window
pub const PREMIUM_PRICE_INR: u64 = 10;

pub const CURRENCY: &str = "INR";

pub const PRODUCT_NAME: &str = "Lumina Temp Premium Access";

pub const PRODUCT_DESCRIPTION: &str = "1 Hour Premium Temperature Access";

pub const THEME_COLOR: &str = "#4f46e5";

pub const CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// Free window granted at application start
pub const TRIAL_WINDOW_MINUTES: i64 = 10;

/// Window bought by one premium payment
pub const PREMIUM_WINDOW_MINUTES: i64 = 60;

/// Window armed after an expiry or a failed payment; as long as a premium window
pub const REARM_WINDOW_MINUTES: i64 = PREMIUM_WINDOW_MINUTES;

/// How long the checkout widget may stay open without answering
pub const CHECKOUT_CALLBACK_TIMEOUT_SECS: u64 = 15 * 60;
