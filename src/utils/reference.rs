use rand::Rng;

use crate::entities::travel_item::ItemKind;

// No 0/O/1/I to keep references readable over the phone.
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a human-facing booking reference such as `FLT-7K2M9QX4`.
/// Uniqueness is enforced by the unique index on the booking table.
pub fn booking_reference(kind: ItemKind) -> String {
    let prefix = match kind {
        ItemKind::Flight => "FLT",
        ItemKind::Bus => "BUS",
        ItemKind::Trip => "TRP",
    };

    let mut rng = rand::thread_rng();
    let tail: String = (0..8)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();

    format!("{}-{}", prefix, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_has_kind_prefix_and_fixed_length() {
        let r = booking_reference(ItemKind::Flight);
        assert!(r.starts_with("FLT-"));
        assert_eq!(r.len(), 12);

        assert!(booking_reference(ItemKind::Bus).starts_with("BUS-"));
        assert!(booking_reference(ItemKind::Trip).starts_with("TRP-"));
    }

    #[test]
    fn reference_avoids_ambiguous_characters() {
        for _ in 0..50 {
            let r = booking_reference(ItemKind::Trip);
            assert!(!r[4..].contains(['0', 'O', '1', 'I']));
        }
    }
}
