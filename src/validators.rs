use crate::config::{PasswordPolicy, RangeDefaults};

/// Checks the email format, requiring a TLD after the `@`.
///
/// The input is taken as-is: padding whitespace makes it invalid,
/// normalization is the caller's job.
pub fn is_valid_email(email: &str) -> bool {
    if !email_address::EmailAddress::is_valid(email) {
        return false;
    }

    // email_address accepts bare domains; require a dot after the @
    match email.rfind('@') {
        Some(at_pos) => email[at_pos + 1..].contains('.'),
        None => false,
    }
}

/// Checks a password against the configured policy:
/// length within bounds, upper and lower case present, enough digits,
/// no whitespace anywhere.
pub fn is_valid_password(password: &str, policy: &PasswordPolicy) -> bool {
    let len = password.chars().count();
    if len < policy.min_len || len > policy.max_len {
        return false;
    }

    if password.chars().any(|c| c.is_whitespace()) {
        return false;
    }

    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let digits = password.chars().filter(|c| c.is_ascii_digit()).count();

    has_uppercase && has_lowercase && digits >= policy.min_digits
}

/// Magnitude of a value for range checks: numbers measure as themselves,
/// strings by character length.
pub trait Measurable {
    fn measure(&self) -> f64;
}

macro_rules! impl_measurable_for_numbers {
    ($($t:ty),*) => {
        $(impl Measurable for $t {
            fn measure(&self) -> f64 {
                *self as f64
            }
        })*
    };
}

impl_measurable_for_numbers!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl Measurable for &str {
    fn measure(&self) -> f64 {
        self.chars().count() as f64
    }
}

impl Measurable for String {
    fn measure(&self) -> f64 {
        self.chars().count() as f64
    }
}

/// Inclusive range membership over [`Measurable`] values.
pub fn in_range<V: Measurable>(value: V, min: f64, max: f64) -> bool {
    let measured = value.measure();
    measured >= min && measured <= max
}

impl RangeDefaults {
    pub fn contains<V: Measurable>(&self, value: V) -> bool {
        in_range(value, self.min, self.max)
    }
}

/// Checks whether the input parses as an absolute URL.
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}
