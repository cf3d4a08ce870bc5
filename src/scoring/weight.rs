use crate::audit::Coefficient;

/// Weight used when a coefficient is missing or unusable.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Interpret an item coefficient as a definite weight.
///
/// This is the only place malformed weights are tolerated: absent, non-numeric,
/// non-finite and negative values all fall back to `DEFAULT_WEIGHT`. Zero is a
/// real weight; such an item adds nothing to either side of the ratio.
pub fn parse_weight(coeff: Option<&Coefficient>) -> f64 {
    let value = match coeff {
        Some(Coefficient::Number(n)) => Some(*n),
        Some(Coefficient::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(Coefficient::Other(_)) | None => None,
    };

    match value {
        Some(n) if n.is_finite() && n >= 0.0 => n,
        _ => DEFAULT_WEIGHT,
    }
}
