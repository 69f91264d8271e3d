//! Wire byte order.
//!
//! Values are persisted most-significant byte first. On big-endian hosts every helper here is a
//! verbatim copy; on little-endian hosts each element's bytes are reversed.

/// Whether native values must be byte-swapped to reach wire order on this host.
pub const NEEDS_SWAP: bool = cfg!(target_endian = "little");

/// Copies one element of native-order bytes into wire order.
///
/// `native` and `wire` must have the same length, the width of one element.
#[inline(always)]
pub fn copy_to_wire(native: &[u8], wire: &mut [u8]) {
    wire.copy_from_slice(native);
    if NEEDS_SWAP {
        wire.reverse();
    }
}

/// Copies one element of wire-order bytes into native order.
#[inline(always)]
pub fn copy_from_wire(wire: &[u8], native: &mut [u8]) {
    native.copy_from_slice(wire);
    if NEEDS_SWAP {
        native.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_order_is_big_endian() {
        let mut wire = [0u8; 4];
        copy_to_wire(&0x0102_0304u32.to_ne_bytes(), &mut wire);
        assert_eq!(wire, [1, 2, 3, 4]);

        let mut native = [0u8; 4];
        copy_from_wire(&wire, &mut native);
        assert_eq!(u32::from_ne_bytes(native), 0x0102_0304);
    }

    #[test]
    fn single_byte_is_verbatim() {
        let mut wire = [0u8; 1];
        copy_to_wire(&[0xab], &mut wire);
        assert_eq!(wire, [0xab]);
    }

    #[test]
    fn round_trip_matches_to_be_bytes() {
        for value in [1.5f64, -0.0, f64::MAX, f64::MIN_POSITIVE] {
            let mut wire = [0u8; 8];
            copy_to_wire(&value.to_ne_bytes(), &mut wire);
            assert_eq!(wire, value.to_be_bytes());
        }
        let mut wire = [0u8; 2];
        copy_to_wire(&(-2i16).to_ne_bytes(), &mut wire);
        assert_eq!(wire, [0xff, 0xfe]);
    }
}
